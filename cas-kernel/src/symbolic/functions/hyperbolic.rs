//! Hyperbolic functions and their inverses.

use cas_error::Error;
use crate::error::complex_infinity;
use crate::symbolic::arith::{add, div, exp, log, neg, sqrt, sub};
use crate::symbolic::expr::{Expr, Node};
use super::pi_shift::extract_minus;
use super::OneArgKind;

/// How a function behaves under negation of its argument.
enum Parity {
    Odd,
    Even,
    Neither,
}

fn parity(kind: OneArgKind) -> Parity {
    use OneArgKind::*;
    match kind {
        Sinh | Tanh | Coth | ASinh | ATanh | ACoth => Parity::Odd,
        Cosh => Parity::Even,
        _ => Parity::Neither,
    }
}

/// Simplifies a hyperbolic function at the given argument.
pub(crate) fn reduce(kind: OneArgKind, arg: &Expr) -> Result<Option<Expr>, Error> {
    use OneArgKind::*;

    if arg.is_zero() {
        match kind {
            Sinh | Tanh | ASinh | ATanh => return Ok(Some(Expr::zero())),
            Cosh => return Ok(Some(Expr::one())),
            Coth | ASech => return Err(complex_infinity(format!("{}(0)", kind.name()))),
            _ => (),
        }
    }
    if arg.is_one() && matches!(kind, ACosh | ASech) {
        return Ok(Some(Expr::zero()));
    }
    if (arg.is_one() || arg.is_minus_one()) && matches!(kind, ATanh | ACoth) {
        return Err(complex_infinity(format!("{}({})", kind.name(), arg)));
    }
    if kind == ASinh && (arg.is_one() || arg.is_minus_one()) {
        // asinh(1) = log(1 + 2^(1/2)), asinh(-1) = log(2^(1/2) - 1)
        let sq2 = sqrt(&Expr::integer(2))?;
        let inner = if arg.is_one() { add(&Expr::one(), &sq2) } else { sub(&sq2, &Expr::one()) };
        return log(&inner).map(Some);
    }
    if let Some(value) = kind.evaluate_inexact(arg)? {
        return Ok(Some(value));
    }

    match (parity(kind), extract_minus(arg)) {
        (Parity::Odd, Some(negated)) => Ok(Some(neg(&kind.create(&negated)?))),
        (Parity::Even, Some(negated)) => kind.create(&negated).map(Some),
        _ => Ok(None),
    }
}

/// Rewrites `sinh`, `cosh`, `tanh` or `coth` in terms of the exponential function. Returns
/// [`None`] for any other expression.
pub fn expand_as_exp(expr: &Expr) -> Result<Option<Expr>, Error> {
    let Node::OneArg(kind, arg) = expr.node() else {
        return Ok(None);
    };
    let pos = exp(arg)?;
    let negative = exp(&neg(arg))?;
    let two = Expr::integer(2);
    let value = match kind {
        OneArgKind::Sinh => div(&sub(&pos, &negative), &two)?,
        OneArgKind::Cosh => div(&add(&pos, &negative), &two)?,
        OneArgKind::Tanh => div(&sub(&pos, &negative), &add(&pos, &negative))?,
        OneArgKind::Coth => div(&add(&pos, &negative), &sub(&pos, &negative))?,
        _ => return Ok(None),
    };
    Ok(Some(value))
}
