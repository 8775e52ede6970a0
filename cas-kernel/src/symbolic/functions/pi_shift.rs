//! Reduction of circular function arguments modulo their period.
//!
//! An argument of the form `x + n*pi/12` is split into the integer `n` and the remainder `x`
//! with [`get_pi_shift`]. [`eval`] then reduces `n` modulo the period of the function, and decides
//! whether the function can be looked up in the exact table, rewritten as its co-function, or
//! only has its sign adjusted.

use crate::number::Number;
use crate::symbolic::arith::{add, mul, neg, sum};
use crate::symbolic::expr::{Expr, Node};
use rug::{ops::RemRounding, Integer, Rational};
use tracing::trace;
use super::table::pi_twelfths;

/// Returns `12*c` if it is an integer.
fn twelfths(c: &Number) -> Option<Integer> {
    match c.mul(&Number::from(12)) {
        Number::Integer(n) => Some(n),
        _ => None,
    }
}

/// Splits `arg` into `n*pi/12 + x`, returning `(n, x)`.
///
/// Returns [`None`] if `arg` has no `pi` term whose coefficient is a multiple of `1/12`; in
/// particular, `2*pi/5` is not split at all.
pub fn get_pi_shift(arg: &Expr) -> Option<(Integer, Expr)> {
    match arg.node() {
        Node::Add(terms) if terms.terms.len() > 1 => {
            let mut n = None;
            let mut rest = vec![Expr::number(terms.coef.clone())];
            for (term, coef) in &terms.terms {
                match (term.is_pi(), twelfths(coef)) {
                    (true, Some(k)) => n = Some(k),
                    _ => rest.push(mul(&Expr::number(coef.clone()), term)),
                }
            }
            n.map(|n| (n, sum(&rest)))
        },
        Node::Add(sum) => {
            let (term, coef) = sum.terms.iter().next()?;
            if !term.is_pi() {
                return None;
            }
            twelfths(coef).map(|n| (n, Expr::number(sum.coef.clone())))
        },
        Node::Mul(product) => {
            if product.factors.len() != 1 {
                return None;
            }
            let (base, exp) = product.factors.iter().next()?;
            if !base.is_pi() || !exp.is_one() {
                return None;
            }
            twelfths(&product.coef).map(|n| (n, Expr::zero()))
        },
        _ if arg.is_pi() => Some((Integer::from(12), Expr::zero())),
        _ => None,
    }
}

/// Returns true if the exact coefficient is negative.
fn is_negative_exact(coef: &Number) -> bool {
    coef.is_exact() && coef.is_negative()
}

/// Returns true if `arg` reads as the negation of a simpler expression: a product with a negative
/// exact coefficient, or a sum whose terms all have negative exact coefficients.
pub fn could_extract_minus(arg: &Expr) -> bool {
    match arg.node() {
        Node::Mul(product) => is_negative_exact(&product.coef),
        Node::Add(sum) => sum.terms.values().all(is_negative_exact),
        _ => false,
    }
}

/// Returns `-arg` if `arg` can be written as the negation of a simpler expression, including
/// when it is a negative exact number.
pub(crate) fn extract_minus(arg: &Expr) -> Option<Expr> {
    let negative_number = arg.as_number().is_some_and(is_negative_exact);
    (negative_number || could_extract_minus(arg)).then(|| neg(arg))
}

/// Returns the argument with its minus sign extracted, and whether a sign was extracted.
fn handle_minus(arg: Expr) -> (bool, Expr) {
    match extract_minus(&arg) {
        Some(negated) => (true, negated),
        None => (false, arg),
    }
}

/// The outcome of reducing a circular function's argument with [`eval`].
#[derive(Debug, Clone, PartialEq)]
pub struct Shift {
    /// If true, the function must be replaced by its co-function.
    pub cofunction: bool,

    /// The reduced argument.
    pub arg: Expr,

    /// If the argument is an exact multiple of `pi/12`, the index of its sine in the exact table.
    pub index: Option<usize>,

    /// The sign the result must be multiplied by, `1` or `-1`.
    pub sign: i64,
}

/// Reduces the argument of a circular function with the given period (in multiples of `pi`).
///
/// `odd` is true for functions satisfying `f(-x) = -f(x)`, and `conj_odd` is true for functions
/// whose co-function picks up an extra sign on a quarter-period shift.
pub fn eval(arg: &Expr, period: u32, odd: bool, conj_odd: bool) -> Shift {
    let Some((n, rem)) = get_pi_shift(arg) else {
        let (extracted, arg) = handle_minus(arg.clone());
        let sign = if odd && extracted { -1 } else { 1 };
        return Shift { cofunction: false, arg, index: None, sign };
    };

    let full = 12 * period;
    let m = n.rem_euc(Integer::from(full)).to_u32().unwrap_or_default();
    trace!(%arg, m, remainder = %rem, "reduced pi shift");

    if rem.is_zero() {
        return Shift { cofunction: false, arg: rem, index: Some(m as usize), sign: 1 };
    }

    if m % full == 0 {
        let (extracted, arg) = handle_minus(rem);
        let sign = if odd && extracted { -1 } else { 1 };
        Shift { cofunction: false, arg, index: None, sign }
    } else if m % 12 == 0 {
        let (extracted, arg) = handle_minus(rem);
        let sign = if odd && extracted { 1 } else { -1 };
        Shift { cofunction: false, arg, index: None, sign }
    } else if m % 6 == 0 {
        let (extracted, arg) = handle_minus(rem);
        let mut sign = if m == 6 { 1 } else { -1 };
        if !extracted && conj_odd {
            sign = -sign;
        }
        Shift { cofunction: true, arg, index: None, sign }
    } else {
        let arg = add(&rem, &pi_twelfths(&Integer::from(m)));
        Shift { cofunction: false, arg, index: None, sign: 1 }
    }
}

/// The rational multiple of `pi` in an expression, and the rest, if `pi` appears with a rational
/// coefficient.
pub(crate) fn pi_coefficient(arg: &Expr) -> Option<(Rational, Expr)> {
    get_pi_shift(arg).map(|(n, rem)| (Rational::from((n, Integer::from(12))), rem))
}
