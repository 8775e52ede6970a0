//! The gamma function and its relatives: the incomplete gamma functions, the beta function, and
//! the polygamma functions.
//!
//! Only special values are evaluated. `gamma` has closed forms at positive integers and at
//! half-integers. The incomplete gamma functions are expanded with integration by parts until they
//! reach `s = 1` (which has a closed form) or `s = 1/2` (which does not, and is left as a node).

use cas_error::Error;
use crate::error::{complex_infinity, not_implemented};
use crate::number::Number;
use crate::primitive::factorial;
use crate::symbolic::arith::{add, div, exp, log, mul, neg, pow, sqrt, sub, sum};
use crate::symbolic::expr::{Expr, Node};
use rug::{Integer, Rational};
use tracing::debug;
use super::{OneArgKind, TwoArgKind};

fn gamma(x: &Expr) -> Result<Expr, Error> {
    OneArgKind::Gamma.create(x)
}

/// Returns the value of `x` if it is an exact rational number with a denominator of two.
fn half_integer(x: &Expr) -> Option<&Rational> {
    match x.as_number() {
        Some(Number::Rational(r)) if *r.denom() == 2 => Some(r),
        _ => None,
    }
}

/// Returns true if `x` is an exact integer less than or equal to zero.
fn is_non_positive_integer(x: &Expr) -> bool {
    matches!(x.as_number(), Some(Number::Integer(n)) if n.cmp0().is_le())
}

/// `gamma(n) = (n - 1)!` for a positive integer `n`.
fn gamma_positive_integer(n: &Integer) -> Result<Expr, Error> {
    let k = Integer::from(n - 1).to_u32().ok_or_else(|| {
        not_implemented(format!("gamma({})", n), "the gamma function of integers this large")
    })?;
    Ok(Expr::number(factorial(k)))
}

/// `gamma(r)` for a rational `r` with a denominator of two, as a rational multiple of
/// `pi^(1/2)`:
///
/// - `gamma(n + 1/2) = (2n - 1)!! / 2^n * pi^(1/2)`
/// - `gamma(1/2 - n) = (-1)^n * 2^n / (2n - 1)!! * pi^(1/2)`
fn gamma_half_integer(r: &Rational) -> Result<Expr, Error> {
    let positive = r.cmp0().is_gt();
    let half = Integer::from(r.numer().abs_ref()) >> 1u32;
    let n = if positive { half } else { half + 1 };
    let n = n.to_u32().ok_or_else(|| {
        not_implemented(format!("gamma({})", r), "the gamma function of half-integers this large")
    })?;

    let double_factorial = match n {
        0 => Integer::from(1),
        _ => Integer::from(Integer::factorial_2(2 * n - 1)),
    };
    let power = Integer::from(1) << n;
    let coef = if positive {
        Rational::from((double_factorial, power))
    } else if n % 2 == 1 {
        Rational::from((-power, double_factorial))
    } else {
        Rational::from((power, double_factorial))
    };
    Ok(mul(&Expr::number(coef), &sqrt(&Expr::pi())?))
}

/// Simplifies `gamma(arg)`.
pub(crate) fn reduce_gamma(arg: &Expr) -> Result<Option<Expr>, Error> {
    match arg.as_number() {
        Some(Number::Integer(n)) if n.cmp0().is_gt() => gamma_positive_integer(n).map(Some),
        Some(Number::Integer(_)) => Err(complex_infinity(format!("gamma({})", arg))),
        Some(Number::Rational(r)) if *r.denom() == 2 => {
            debug!(%arg, "gamma of a half-integer");
            gamma_half_integer(r).map(Some)
        },
        _ => OneArgKind::Gamma.evaluate_inexact(arg),
    }
}

/// Simplifies `lowergamma(s, x)` or `uppergamma(s, x)`, depending on `kind`.
pub(crate) fn reduce_incomplete_gamma(
    kind: TwoArgKind,
    s: &Expr,
    x: &Expr,
) -> Result<Option<Expr>, Error> {
    match s.as_number() {
        Some(Number::Integer(n)) if *n == 1 => {
            let decay = exp(&neg(x))?;
            Ok(Some(match kind {
                TwoArgKind::LowerGamma => sub(&Expr::one(), &decay),
                _ => decay,
            }))
        },
        Some(Number::Integer(n)) if *n > 1 => step_down(kind, s, x).map(Some),
        Some(Number::Rational(r)) if *r.denom() == 2 => {
            if *r > 1 {
                step_down(kind, s, x).map(Some)
            } else if r.cmp0().is_lt() {
                step_up(kind, s, x).map(Some)
            } else {
                // s = 1/2 needs the error function
                Ok(None)
            }
        },
        _ => Ok(None),
    }
}

/// Lowers `s` by one with integration by parts:
///
/// - `lowergamma(s, x) = (s - 1)*lowergamma(s - 1, x) - x^(s - 1)*E^(-x)`
/// - `uppergamma(s, x) = (s - 1)*uppergamma(s - 1, x) + x^(s - 1)*E^(-x)`
fn step_down(kind: TwoArgKind, s: &Expr, x: &Expr) -> Result<Expr, Error> {
    let t = sub(s, &Expr::one());
    let boundary = mul(&pow(x, &t)?, &exp(&neg(x))?);
    let rest = mul(&t, &kind.create(&t, x)?);
    Ok(match kind {
        TwoArgKind::LowerGamma => sub(&rest, &boundary),
        _ => add(&rest, &boundary),
    })
}

/// Raises a negative `s` by one, solving the same recurrence for the lower order:
///
/// - `lowergamma(s, x) = (lowergamma(s + 1, x) + x^s*E^(-x))/s`
/// - `uppergamma(s, x) = (uppergamma(s + 1, x) - x^s*E^(-x))/s`
fn step_up(kind: TwoArgKind, s: &Expr, x: &Expr) -> Result<Expr, Error> {
    let next = kind.create(&add(s, &Expr::one()), x)?;
    let boundary = mul(&pow(x, s)?, &exp(&neg(x))?);
    let numerator = match kind {
        TwoArgKind::LowerGamma => add(&next, &boundary),
        _ => sub(&next, &boundary),
    };
    div(&numerator, s)
}

/// Simplifies `beta(x, y)`. The arguments of a canonical node are ordered so that `x >= y`.
pub(crate) fn reduce_beta(x: &Expr, y: &Expr) -> Result<Option<Expr>, Error> {
    if add(x, y).is_one() {
        return Err(complex_infinity(format!("beta({}, {})", x, y)));
    }

    let closed = |e: &Expr| e.is_integer() || half_integer(e).is_some();
    if closed(x) && closed(y) {
        if is_non_positive_integer(x) || is_non_positive_integer(y) {
            return Err(complex_infinity(format!("beta({}, {})", x, y)));
        }
        let total = add(x, y);
        if is_non_positive_integer(&total) {
            return Ok(Some(Expr::zero()));
        }
        debug!(%x, %y, "beta through gamma");
        return Ok(Some(div(&mul(&gamma(x)?, &gamma(y)?), &gamma(&total)?)?));
    }

    if x < y {
        return TwoArgKind::Beta.create(y, x).map(Some);
    }
    Ok(None)
}

/// Rewrites `beta(x, y)` as `gamma(x)*gamma(y)/gamma(x + y)`. Returns [`None`] for any other
/// expression.
pub fn rewrite_as_gamma(expr: &Expr) -> Result<Option<Expr>, Error> {
    let Node::TwoArg(TwoArgKind::Beta, x, y) = expr.node() else {
        return Ok(None);
    };
    let value = div(&mul(&gamma(x)?, &gamma(y)?), &gamma(&add(x, y))?)?;
    Ok(Some(value))
}

/// Simplifies `polygamma(n, x)`.
pub(crate) fn reduce_polygamma(n: &Expr, x: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(value) = x.as_number() {
        if !matches!(value, Number::Complex(_)) && !value.is_positive() {
            return Err(complex_infinity(format!("polygamma({}, {})", n, x)));
        }
    }
    if let (Some(order), Some(value)) = (n.as_number(), x.as_number()) {
        if let Some(eval) = value.get_eval().or_else(|| order.get_eval()) {
            return eval.polygamma(order, value).map(|v| Some(Expr::number(v)));
        }
    }

    if n.is_zero() {
        return digamma(x);
    }

    // polygamma(m, k) = m! * zeta(m + 1, k) for odd m
    match (n.as_number(), x.is_integer()) {
        (Some(Number::Integer(m)), true) if m.is_odd() && m.cmp0().is_gt() => {
            let Some(m) = m.to_u32() else {
                return Ok(None);
            };
            let zeta = TwoArgKind::Zeta.create(&add(n, &Expr::one()), x)?;
            Ok(Some(mul(&Expr::number(factorial(m)), &zeta)))
        },
        _ => Ok(None),
    }
}

/// `polygamma(0, r)` for `r` in `(0, 1]` with a denominator of at most four.
fn digamma_base(r: &Rational) -> Result<Option<Expr>, Error> {
    let log2 = log(&Expr::integer(2))?;
    let log3 = log(&Expr::integer(3))?;
    let half_pi = mul(&Expr::half(), &Expr::pi());
    let sqrt3_pi = mul(&mul(&Expr::rational(1, 6), &sqrt(&Expr::integer(3))?), &Expr::pi());
    let three_halves_log3 = mul(&Expr::rational(3, 2), &log3);

    let (num, den) = (r.numer().to_u32(), r.denom().to_u32());
    let rest = match (num, den) {
        (Some(1), Some(1)) => return Ok(Some(neg(&Expr::euler_gamma()))),
        (Some(1), Some(2)) => mul(&Expr::integer(-2), &log2),
        (Some(1), Some(3)) => neg(&add(&sqrt3_pi, &three_halves_log3)),
        (Some(2), Some(3)) => sub(&sqrt3_pi, &three_halves_log3),
        (Some(1), Some(4)) => neg(&add(&half_pi, &mul(&Expr::integer(3), &log2))),
        (Some(3), Some(4)) => sub(&half_pi, &mul(&Expr::integer(3), &log2)),
        _ => return Ok(None),
    };
    Ok(Some(sub(&rest, &Expr::euler_gamma())))
}

/// `polygamma(0, x)` for a positive rational `x` with a denominator of at most four, from the
/// value at the fractional part `r` of `x` and the recurrence
/// `polygamma(0, r + m) = polygamma(0, r) + sum(1/(r + k), k = 0..m)`.
fn digamma(x: &Expr) -> Result<Option<Expr>, Error> {
    let Some(value) = x.as_number().and_then(Number::as_rational) else {
        return Ok(None);
    };
    let m: Integer = value.clone().ceil().into_numer_denom().0 - 1;
    let r = value - &m;
    let Some(base) = digamma_base(&r)? else {
        return Ok(None);
    };
    let Some(m) = m.to_u32() else {
        return Ok(None);
    };

    let mut correction = Rational::new();
    for k in 0..m {
        correction += Rational::from(&r + k).recip();
    }
    debug!(%x, "digamma closed form");
    Ok(Some(sum(&[base, Expr::number(correction)])))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::error::ComplexInfinity;
    use crate::primitive::float;
    use crate::symbolic::functions::{beta, gamma, lowergamma, polygamma, uppergamma, zeta_hurwitz};
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn sqrt_pi() -> Expr {
        sqrt(&Expr::pi()).unwrap()
    }

    #[test]
    fn positive_integers() {
        assert_eq!(gamma(&Expr::one()).unwrap(), Expr::one());
        assert_eq!(gamma(&Expr::integer(4)).unwrap(), Expr::integer(6));
        assert_eq!(gamma(&Expr::integer(7)).unwrap(), Expr::integer(720));
    }

    #[test]
    fn half_integers() {
        assert_eq!(gamma(&Expr::half()).unwrap(), sqrt_pi());
        assert_eq!(
            gamma(&Expr::rational(3, 2)).unwrap(),
            div(&sqrt_pi(), &Expr::integer(2)).unwrap(),
        );
        assert_eq!(
            gamma(&Expr::rational(-1, 2)).unwrap(),
            mul(&Expr::integer(-2), &sqrt_pi()),
        );
        assert_eq!(
            gamma(&Expr::rational(-3, 2)).unwrap(),
            mul(&Expr::rational(4, 3), &sqrt_pi()),
        );
        assert_eq!(
            gamma(&Expr::rational(7, 2)).unwrap(),
            mul(&Expr::rational(15, 8), &sqrt_pi()),
        );
    }

    #[test]
    fn poles() {
        assert!(gamma(&Expr::zero()).unwrap_err().is::<ComplexInfinity>());
        assert!(gamma(&Expr::integer(-2)).unwrap_err().is::<ComplexInfinity>());
    }

    #[test]
    fn opaque_arguments() {
        assert_eq!(gamma(&x()).unwrap().to_string(), "gamma(x)");
        assert_eq!(gamma(&Expr::rational(1, 3)).unwrap().to_string(), "gamma(1/3)");
    }

    #[test]
    fn inexact_argument() {
        let value = gamma(&Expr::number(float(5))).unwrap();
        let Some(Number::Float(f)) = value.as_number() else {
            panic!("expected a float, got {}", value);
        };
        assert_float_absolute_eq!(f.to_f64(), 24.0, 1e-12);
    }

    #[test]
    fn incomplete_gamma_integer_order() {
        let decay = exp(&neg(&x())).unwrap();
        assert_eq!(lowergamma(&Expr::one(), &x()).unwrap(), sub(&Expr::one(), &decay));
        assert_eq!(uppergamma(&Expr::one(), &x()).unwrap(), decay);

        // lowergamma(2, x) = 1 - E^(-x) - x*E^(-x)
        let expected = sub(&sub(&Expr::one(), &decay), &mul(&x(), &decay));
        assert_eq!(lowergamma(&Expr::integer(2), &x()).unwrap(), expected);

        // uppergamma(2, x) = E^(-x) + x*E^(-x)
        let expected = add(&decay, &mul(&x(), &decay));
        assert_eq!(uppergamma(&Expr::integer(2), &x()).unwrap(), expected);
    }

    #[test]
    fn incomplete_gamma_half_integer_order() {
        let half = lowergamma(&Expr::half(), &x()).unwrap();
        assert_eq!(half.to_string(), "lowergamma(1/2, x)");

        // uppergamma(-1/2, x) = -2*(uppergamma(1/2, x) - x^(-1/2)*E^(-x))
        let boundary = mul(
            &pow(&x(), &Expr::rational(-1, 2)).unwrap(),
            &exp(&neg(&x())).unwrap(),
        );
        let upper_half = uppergamma(&Expr::half(), &x()).unwrap();
        let expected = mul(&Expr::integer(-2), &sub(&upper_half, &boundary));
        assert_eq!(uppergamma(&Expr::rational(-1, 2), &x()).unwrap(), expected);
    }

    #[test]
    fn incomplete_gamma_opaque() {
        let y = Expr::symbol("y");
        assert_eq!(lowergamma(&y, &x()).unwrap().to_string(), "lowergamma(y, x)");
        assert_eq!(uppergamma(&Expr::zero(), &x()).unwrap().to_string(), "uppergamma(0, x)");
    }

    #[test]
    fn beta_values() {
        assert_eq!(beta(&Expr::integer(2), &Expr::integer(3)).unwrap(), Expr::rational(1, 12));
        assert_eq!(beta(&Expr::half(), &Expr::one()).unwrap(), Expr::integer(2));
        assert!(beta(&Expr::zero(), &Expr::integer(3)).unwrap_err().is::<ComplexInfinity>());
    }

    #[test]
    fn beta_pole() {
        let one_minus_x = sub(&Expr::one(), &x());
        assert!(beta(&x(), &one_minus_x).unwrap_err().is::<ComplexInfinity>());
    }

    #[test]
    fn beta_ordering() {
        let y = Expr::symbol("y");
        let a = beta(&x(), &y).unwrap();
        let b = beta(&y, &x()).unwrap();
        assert_eq!(a, b);

        let Node::TwoArg(TwoArgKind::Beta, first, second) = a.node() else {
            panic!("expected a beta node, got {}", a);
        };
        assert!(first >= second);
        assert!(TwoArgKind::Beta.is_canonical(first, second));
        assert!(!TwoArgKind::Beta.is_canonical(second, first));
    }

    #[test]
    fn beta_as_gamma() {
        let y = Expr::symbol("y");
        let node = beta(&x(), &y).unwrap();
        let expected = div(
            &mul(&gamma(&x()).unwrap(), &gamma(&y).unwrap()),
            &gamma(&add(&x(), &y)).unwrap(),
        ).unwrap();
        assert_eq!(rewrite_as_gamma(&node).unwrap(), Some(expected));
        assert_eq!(rewrite_as_gamma(&x()).unwrap(), None);
    }

    #[test]
    fn digamma_values() {
        let gamma_e = Expr::euler_gamma();
        let log2 = log(&Expr::integer(2)).unwrap();
        let zero = Expr::zero();

        assert_eq!(polygamma(&zero, &Expr::one()).unwrap(), neg(&gamma_e));
        assert_eq!(
            polygamma(&zero, &Expr::integer(3)).unwrap(),
            sub(&Expr::rational(3, 2), &gamma_e),
        );

        let at_half = sub(&mul(&Expr::integer(-2), &log2), &gamma_e);
        assert_eq!(polygamma(&zero, &Expr::half()).unwrap(), at_half);
        assert_eq!(
            polygamma(&zero, &Expr::rational(3, 2)).unwrap(),
            add(&at_half, &Expr::integer(2)),
        );

        let quarter = sub(
            &neg(&add(&mul(&Expr::half(), &Expr::pi()), &mul(&Expr::integer(3), &log2))),
            &gamma_e,
        );
        assert_eq!(polygamma(&zero, &Expr::rational(1, 4)).unwrap(), quarter);
    }

    #[test]
    fn polygamma_odd_order() {
        // polygamma(1, 1) = zeta(2) = pi^2/6
        let expected = mul(&Expr::rational(1, 6), &pow(&Expr::pi(), &Expr::integer(2)).unwrap());
        assert_eq!(polygamma(&Expr::one(), &Expr::one()).unwrap(), expected);

        let zeta = zeta_hurwitz(&Expr::integer(4), &Expr::integer(2)).unwrap();
        assert_eq!(
            polygamma(&Expr::integer(3), &Expr::integer(2)).unwrap(),
            mul(&Expr::integer(6), &zeta),
        );
    }

    #[test]
    fn polygamma_poles() {
        let zero = Expr::zero();
        assert!(polygamma(&zero, &zero).unwrap_err().is::<ComplexInfinity>());
        assert!(polygamma(&Expr::one(), &Expr::integer(-3)).unwrap_err().is::<ComplexInfinity>());
        assert_eq!(polygamma(&zero, &x()).unwrap().to_string(), "polygamma(0, x)");
    }
}
