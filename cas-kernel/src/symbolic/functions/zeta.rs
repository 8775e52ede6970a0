//! The Hurwitz zeta function and the Dirichlet eta function.

use cas_error::Error;
use crate::error::complex_infinity;
use crate::number::Number;
use crate::primitive::factorial;
use crate::symbolic::arith::{add, log, mul, neg, pow, sub};
use crate::symbolic::expr::{Expr, Node};
use rug::{Integer, Rational};
use tracing::debug;
use super::{OneArgKind, TwoArgKind};

/// The Bernoulli number `B_n`, with the convention `B_1 = -1/2`.
pub(crate) fn bernoulli(n: u32) -> Rational {
    // sum(binomial(m + 1, k) * B_k, k = 0..=m) = 0 for every m >= 1
    let mut numbers = vec![Rational::from(1)];
    for m in 1..=n {
        let mut acc = Rational::new();
        for (k, b) in numbers.iter().enumerate() {
            let binomial = Integer::from(Integer::binomial_u(m + 1, k as u32));
            acc += b.clone() * binomial;
        }
        numbers.push(-acc / (m + 1));
    }
    numbers.swap_remove(n as usize)
}

/// `zeta(s, 1)` for an integer `s`, where it has a closed form: a rational number for negative
/// `s`, and a rational multiple of `pi^s` for positive even `s`.
fn riemann_closed_form(s: i64) -> Result<Option<Expr>, Error> {
    if s < 0 {
        // zeta(-n) = -B_(n + 1) / (n + 1)
        let Ok(n) = u32::try_from(-s) else {
            return Ok(None);
        };
        let value = -bernoulli(n + 1) / (n + 1);
        return Ok(Some(Expr::number(value)));
    }
    if s == 0 || s % 2 == 1 {
        return Ok(None);
    }

    // zeta(2k) = 2^(2k - 1) * |B_2k| * pi^(2k) / (2k)!
    let Ok(k) = u32::try_from(s) else {
        return Ok(None);
    };
    let coef = Rational::from((Integer::from(1) << (k - 1), factorial(k))) * bernoulli(k).abs();
    Ok(Some(mul(&Expr::number(coef), &pow(&Expr::pi(), &Expr::integer(s))?)))
}

/// The generalized harmonic number `sum(1/k^s, k = 1..=n)`.
fn harmonic(n: u32, s: i64) -> Result<Number, Error> {
    let exp = Integer::from(-s);
    let mut total = Number::from(0);
    for k in 1..=n {
        total = total.add(&Number::from(Integer::from(k)).pow_int(&exp)?);
    }
    Ok(total)
}

/// Simplifies `zeta(s, a)`.
pub(crate) fn reduce_zeta(s: &Expr, a: &Expr) -> Result<Option<Expr>, Error> {
    if s.is_zero() {
        // zeta(0, a) = 1/2 - a, shifted down by one for a negative number a
        let constant = if a.as_number().is_some_and(Number::is_negative) {
            Expr::rational(-1, 2)
        } else {
            Expr::half()
        };
        return Ok(Some(sub(&constant, a)));
    }
    if s.is_one() {
        return Err(complex_infinity(format!("zeta(1, {})", a)));
    }
    if a.is_one() {
        if let Some(n) = s.as_number() {
            if let Some(eval) = n.get_eval() {
                return eval.zeta(n).map(|value| Some(Expr::number(value)));
            }
        }
    }

    let (Some(Number::Integer(s_int)), Some(Number::Integer(a_int))) = (s.as_number(), a.as_number()) else {
        return Ok(None);
    };
    let (Some(s_val), Some(a_val)) = (s_int.to_i64(), a_int.to_i64()) else {
        return Ok(None);
    };
    let Some(base) = riemann_closed_form(s_val)? else {
        return Ok(None);
    };

    // zeta(s, a) = zeta(s) - sum(1/k^s, k = 1..a) for a >= 1, and
    // zeta(s, a) = zeta(s) + sum(1/(-k)^s, k = 1..=-a) for a <= 0
    let value = if a_val >= 1 {
        let Ok(count) = u32::try_from(a_val - 1) else {
            return Ok(None);
        };
        sub(&base, &Expr::number(harmonic(count, s_val)?))
    } else if s_val > 0 {
        return Ok(None);
    } else {
        let Ok(count) = u32::try_from(-a_val) else {
            return Ok(None);
        };
        // (-k)^(-s) = (-1)^s * k^(-s)
        let sum = harmonic(count, s_val)?;
        let sum = if s_val % 2 == 0 { sum } else { sum.neg() };
        add(&base, &Expr::number(sum))
    };
    debug!(%s, %a, %value, "zeta closed form");
    Ok(Some(value))
}

/// `1 - 2^(1 - s)`, the factor relating the eta and zeta functions.
fn eta_factor(s: &Expr) -> Result<Expr, Error> {
    let power = pow(&Expr::integer(2), &sub(&Expr::one(), s))?;
    Ok(sub(&Expr::one(), &power))
}

/// Simplifies `dirichlet_eta(s)`.
pub(crate) fn reduce_dirichlet_eta(s: &Expr) -> Result<Option<Expr>, Error> {
    if s.is_one() {
        return log(&Expr::integer(2)).map(Some);
    }
    if let Some(value) = OneArgKind::DirichletEta.evaluate_inexact(s)? {
        return Ok(Some(value));
    }

    let zeta = TwoArgKind::Zeta.create(s, &Expr::one())?;
    if matches!(zeta.node(), Node::TwoArg(TwoArgKind::Zeta, ..)) {
        return Ok(None);
    }
    Ok(Some(mul(&eta_factor(s)?, &zeta)))
}

/// Rewrites `dirichlet_eta(s)` as `(1 - 2^(1 - s))*zeta(s)`, and `polygamma(n, x)` with a positive
/// integer `n` as `(-1)^(n + 1)*n!*zeta(n + 1, x)`. Returns [`None`] for any other expression.
pub fn rewrite_as_zeta(expr: &Expr) -> Result<Option<Expr>, Error> {
    match expr.node() {
        Node::OneArg(OneArgKind::DirichletEta, s) => {
            let zeta = TwoArgKind::Zeta.create(s, &Expr::one())?;
            Ok(Some(mul(&eta_factor(s)?, &zeta)))
        },
        Node::TwoArg(TwoArgKind::PolyGamma, n, x) => {
            let Some(Number::Integer(order)) = n.as_number() else {
                return Ok(None);
            };
            let Some(m) = order.to_u32().filter(|&m| m > 0) else {
                return Ok(None);
            };
            let zeta = TwoArgKind::Zeta.create(&add(n, &Expr::one()), x)?;
            let value = mul(&Expr::number(factorial(m)), &zeta);
            Ok(Some(if m % 2 == 0 { neg(&value) } else { value }))
        },
        _ => Ok(None),
    }
}
