//! Closed-form derivatives of the built-in functions.

use cas_error::Error;
use crate::symbolic::arith::{add, div, exp, mul, neg, pow, sqrt, sub};
use crate::symbolic::expr::Expr;
use crate::symbolic::functions::{
    cosh,
    cot,
    csc,
    polygamma,
    sec,
    sinh,
    tan,
    tanh,
    OneArgKind,
    TwoArgKind,
};

fn squared(x: &Expr) -> Result<Expr, Error> {
    pow(x, &Expr::integer(2))
}

/// `1/sqrt(expr)`.
fn recip_sqrt(expr: &Expr) -> Result<Expr, Error> {
    pow(expr, &Expr::rational(-1, 2))
}

/// Computes `f'(arg)` for the built-in function `f`. The caller multiplies the result by the
/// derivative of `arg` to complete the chain rule.
///
/// Returns [`None`] for functions whose derivative has no closed form, and is deferred instead.
pub(super) fn function_derivative(kind: OneArgKind, arg: &Expr) -> Result<Option<Expr>, Error> {
    use OneArgKind::*;

    let one = Expr::one();
    let value = match kind {
        Log => pow(arg, &Expr::minus_one())?,
        Sin => Cos.create(arg)?,
        Cos => neg(&Sin.create(arg)?),
        Tan => add(&one, &squared(&tan(arg)?)?),
        Cot => neg(&add(&one, &squared(&cot(arg)?)?)),
        Csc => neg(&mul(&cot(arg)?, &csc(arg)?)),
        Sec => mul(&tan(arg)?, &sec(arg)?),
        ASin => recip_sqrt(&sub(&one, &squared(arg)?))?,
        ACos => neg(&recip_sqrt(&sub(&one, &squared(arg)?))?),
        ATan => div(&one, &add(&one, &squared(arg)?))?,
        ACot => div(&Expr::minus_one(), &add(&one, &squared(arg)?))?,
        ASec | ACsc => {
            // 1/(x^2*sqrt(1 - 1/x^2))
            let arg_squared = squared(arg)?;
            let root = sqrt(&sub(&one, &div(&one, &arg_squared)?))?;
            let value = div(&one, &mul(&arg_squared, &root))?;
            if kind == ASec { value } else { neg(&value) }
        },
        Sinh => cosh(arg)?,
        Cosh => sinh(arg)?,
        Tanh => sub(&one, &squared(&tanh(arg)?)?),
        Coth => neg(&pow(&sinh(arg)?, &Expr::integer(-2))?),
        ASinh => recip_sqrt(&add(&squared(arg)?, &one))?,
        ACosh => recip_sqrt(&sub(&squared(arg)?, &one))?,
        ATanh | ACoth => div(&one, &sub(&one, &squared(arg)?))?,
        ASech => {
            let root = sqrt(&sub(&one, &squared(arg)?))?;
            div(&Expr::minus_one(), &mul(&root, arg))?
        },
        Gamma => mul(&Gamma.create(arg)?, &polygamma(&Expr::zero(), arg)?),
        LambertW => {
            // W(x)/(x*(W(x) + 1))
            let w = LambertW.create(arg)?;
            div(&w, &mul(arg, &add(&w, &one)))?
        },
        DirichletEta | Abs => return Ok(None),
    };
    Ok(Some(value))
}

/// Returns true if `kind(a, b)` has a closed-form partial derivative in the argument at
/// `position` (0 or 1).
pub(super) fn has_partial(kind: TwoArgKind, position: usize) -> bool {
    use TwoArgKind::*;
    match kind {
        ATan2 | Beta => true,
        Zeta | PolyGamma | LowerGamma | UpperGamma => position == 1,
        KroneckerDelta => false,
    }
}

/// Computes the partial derivative of `kind(a, b)` in the argument at `position`, or [`None`]
/// where [`has_partial`] returns false.
pub(super) fn partial_derivative(
    kind: TwoArgKind,
    a: &Expr,
    b: &Expr,
    position: usize,
) -> Result<Option<Expr>, Error> {
    use TwoArgKind::*;

    if !has_partial(kind, position) {
        return Ok(None);
    }
    let one = Expr::one();
    let value = match kind {
        // atan2(num, den): den/(num^2 + den^2) and -num/(num^2 + den^2)
        ATan2 => {
            let norm = add(&squared(a)?, &squared(b)?);
            let value = if position == 0 { b.clone() } else { neg(a) };
            div(&value, &norm)?
        },
        Beta => {
            let own = if position == 0 { a } else { b };
            let digamma = |x: &Expr| polygamma(&Expr::zero(), x);
            let inner = sub(&digamma(own)?, &digamma(&add(a, b))?);
            mul(&kind.create(a, b)?, &inner)
        },
        Zeta => neg(&mul(a, &kind.create(&add(a, &one), b)?)),
        PolyGamma => kind.create(&add(a, &one), b)?,
        LowerGamma | UpperGamma => {
            // x^(s - 1)*E^(-x)
            let value = mul(&pow(b, &sub(a, &one))?, &exp(&neg(b))?);
            if kind == LowerGamma { value } else { neg(&value) }
        },
        KroneckerDelta => return Ok(None),
    };
    Ok(Some(value))
}
