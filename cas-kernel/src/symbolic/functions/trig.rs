//! Circular functions and their inverses.

use cas_error::Error;
use crate::error::{complex_infinity, not_implemented};
use crate::number::Number;
use crate::symbolic::arith::{add, div, mul, neg, sub};
use crate::symbolic::expr::{Expr, Node};
use std::cmp::Ordering;
use super::pi_shift::{eval, extract_minus};
use super::table::{inverse_lookup, pi_over, INVERSE_CST, INVERSE_TCT, SIN_TABLE};
use super::OneArgKind;

/// Parameters of the argument reduction of a circular function.
struct Circular {
    /// The period, in multiples of `pi`.
    period: u32,

    /// Whether `f(-x) = -f(x)`.
    odd: bool,

    /// Whether the co-function picks up an extra sign on a quarter-period shift.
    conj_odd: bool,

    cofunction: OneArgKind,
}

fn circular(kind: OneArgKind) -> Circular {
    use OneArgKind::*;
    let (period, odd, conj_odd, cofunction) = match kind {
        Sin => (2, true, false, Cos),
        Cos => (2, false, true, Sin),
        Tan => (1, true, true, Cot),
        Cot => (1, true, true, Tan),
        Csc => (2, true, false, Sec),
        Sec => (2, false, true, Csc),
        _ => unreachable!("{} is not a circular function", kind.name()),
    };
    Circular { period, odd, conj_odd, cofunction }
}

/// Multiplies by the sign `-1` or `1`.
fn with_sign(sign: i64, expr: Expr) -> Expr {
    if sign < 0 {
        neg(&expr)
    } else {
        expr
    }
}

/// `num/den` for exact table values, reporting a zero denominator as a pole of `kind`.
fn table_ratio(kind: OneArgKind, arg: &Expr, num: &Expr, den: &Expr) -> Result<Expr, Error> {
    if den.is_zero() {
        return Err(complex_infinity(format!("{}({})", kind.name(), arg)));
    }
    div(num, den)
}

/// The exact value of `kind(index*pi/12)`.
fn table_value(kind: OneArgKind, arg: &Expr, index: usize) -> Result<Expr, Error> {
    let sin = &SIN_TABLE[index % 24];
    let cos = &SIN_TABLE[(index + 6) % 24];
    let one = Expr::one();
    match kind {
        OneArgKind::Sin => Ok(sin.clone()),
        OneArgKind::Cos => Ok(cos.clone()),
        OneArgKind::Tan => table_ratio(kind, arg, sin, cos),
        OneArgKind::Cot => table_ratio(kind, arg, cos, sin),
        OneArgKind::Csc => table_ratio(kind, arg, &one, sin),
        _ => table_ratio(kind, arg, &one, cos),
    }
}

/// Simplifies `kind(f(x))` where `f` is an inverse circular function.
fn unwrap_inverse(kind: OneArgKind, arg: &Expr) -> Result<Option<Expr>, Error> {
    use OneArgKind::*;
    let Node::OneArg(inner, x) = arg.node() else {
        return Ok(None);
    };
    match (kind, inner) {
        (Sin, ASin) | (Cos, ACos) | (Tan, ATan) | (Cot, ACot) | (Csc, ACsc) | (Sec, ASec) => {
            Ok(Some(x.clone()))
        },
        (Sin, ACsc) | (Cos, ASec) | (Tan, ACot) | (Cot, ATan) | (Csc, ASin) | (Sec, ACos) => {
            div(&Expr::one(), x).map(Some)
        },
        _ => Ok(None),
    }
}

/// Simplifies a circular function at the given argument.
pub(crate) fn reduce_circular(kind: OneArgKind, arg: &Expr) -> Result<Option<Expr>, Error> {
    let params = circular(kind);

    if arg.is_zero() {
        return match kind {
            OneArgKind::Sin | OneArgKind::Tan => Ok(Some(Expr::zero())),
            OneArgKind::Cos | OneArgKind::Sec => Ok(Some(Expr::one())),
            _ => Err(complex_infinity(format!("{}(0)", kind.name()))),
        };
    }
    if let Some(value) = kind.evaluate_inexact(arg)? {
        return Ok(Some(value));
    }
    if let Some(value) = unwrap_inverse(kind, arg)? {
        return Ok(Some(value));
    }

    // f(-x) = -f(x) for odd f, f(x) for even f
    if let Some(negated) = extract_minus(arg) {
        let value = kind.create(&negated)?;
        return Ok(Some(if params.odd { neg(&value) } else { value }));
    }

    let shift = eval(arg, params.period, params.odd, params.conj_odd);
    if shift.cofunction {
        let value = params.cofunction.create(&shift.arg)?;
        return Ok(Some(with_sign(shift.sign, value)));
    }
    if let Some(index) = shift.index {
        return Ok(Some(with_sign(shift.sign, table_value(kind, arg, index)?)));
    }
    if shift.sign == 1 && shift.arg == *arg {
        return Ok(None);
    }
    Ok(Some(with_sign(shift.sign, kind.create(&shift.arg)?)))
}

/// `pi/2 - pi/k`.
fn complement(k: &rug::Rational) -> Expr {
    sub(&div_pi(2), &pi_over(k))
}

/// `pi/n` for an integer `n`.
fn div_pi(n: i64) -> Expr {
    mul(&Expr::rational(1, n), &Expr::pi())
}

/// Simplifies an inverse circular function at the given argument.
pub(crate) fn reduce_inverse(kind: OneArgKind, arg: &Expr) -> Result<Option<Expr>, Error> {
    use OneArgKind::*;

    let special = match kind {
        ASin if arg.is_zero() => Some(Expr::zero()),
        ASin if arg.is_one() => Some(div_pi(2)),
        ASin if arg.is_minus_one() => Some(div_pi(-2)),
        ACos if arg.is_zero() => Some(div_pi(2)),
        ACos if arg.is_one() => Some(Expr::zero()),
        ACos if arg.is_minus_one() => Some(Expr::pi()),
        ASec if arg.is_one() => Some(Expr::zero()),
        ASec if arg.is_minus_one() => Some(Expr::pi()),
        ACsc if arg.is_one() => Some(div_pi(2)),
        ACsc if arg.is_minus_one() => Some(div_pi(-2)),
        ATan if arg.is_zero() => Some(Expr::zero()),
        ATan if arg.is_one() => Some(div_pi(4)),
        ATan if arg.is_minus_one() => Some(div_pi(-4)),
        ACot if arg.is_zero() => Some(div_pi(2)),
        ACot if arg.is_one() => Some(div_pi(4)),
        ACot if arg.is_minus_one() => Some(mul(&Expr::rational(3, 4), &Expr::pi())),
        _ => None,
    };
    if special.is_some() {
        return Ok(special);
    }
    if matches!(kind, ASec | ACsc) && arg.is_zero() {
        return Err(complex_infinity(format!("{}(0)", kind.name())));
    }
    if let Some(value) = kind.evaluate_inexact(arg)? {
        return Ok(Some(value));
    }

    let value = match kind {
        ASin => inverse_lookup(&INVERSE_CST, arg).map(|k| pi_over(&k)),
        ACos => inverse_lookup(&INVERSE_CST, arg).map(|k| complement(&k)),
        ASec => inverse_lookup(&INVERSE_CST, &div(&Expr::one(), arg)?).map(|k| complement(&k)),
        ACsc => inverse_lookup(&INVERSE_CST, &div(&Expr::one(), arg)?).map(|k| pi_over(&k)),
        ATan => inverse_lookup(&INVERSE_TCT, arg).map(|k| pi_over(&k)),
        ACot => inverse_lookup(&INVERSE_TCT, arg).map(|k| complement(&k)),
        _ => unreachable!("{} is not an inverse circular function", kind.name()),
    };
    Ok(value)
}

/// Simplifies `atan2(num, den)`, the angle of the point `(den, num)`.
pub(crate) fn reduce_atan2(num: &Expr, den: &Expr) -> Result<Option<Expr>, Error> {
    let (n, d) = (num.as_number(), den.as_number());

    if num.is_zero() {
        if let Some(d) = d {
            return match d {
                d if d.is_negative() => Ok(Some(Expr::pi())),
                d if d.is_positive() => Ok(Some(Expr::zero())),
                _ => Err(not_implemented("atan2(0, 0)", "the angle of the origin")),
            };
        }
    }
    if den.is_zero() {
        return Ok(match n {
            Some(n) if n.is_positive() => Some(div_pi(2)),
            Some(n) if n.is_negative() => Some(div_pi(-2)),
            _ => None,
        });
    }

    if let (Some(n), Some(d)) = (n, d) {
        if let Some(eval) = n.get_eval().or_else(|| d.get_eval()) {
            return eval.atan2(n, d).map(|value| Some(Expr::number(value)));
        }
    }

    // the quadrant needs the sign of the denominator, and of the numerator when it is negative
    let Some(den_sign) = sign(den) else {
        return Ok(None);
    };
    let Some(k) = inverse_lookup(&INVERSE_TCT, &div(num, den)?) else {
        return Ok(None);
    };
    let angle = pi_over(&k);
    if den_sign == Ordering::Greater {
        return Ok(Some(angle));
    }
    Ok(match sign(num) {
        Some(Ordering::Greater) => Some(add(&angle, &Expr::pi())),
        Some(Ordering::Less) => Some(sub(&angle, &Expr::pi())),
        _ => None,
    })
}

/// The product of two signs.
fn times(a: Ordering, b: Ordering) -> Ordering {
    match (a, b) {
        (Ordering::Equal, _) | (_, Ordering::Equal) => Ordering::Equal,
        (a, b) if a == b => Ordering::Greater,
        _ => Ordering::Less,
    }
}

/// The sign of a real constant expression, if it can be read off its structure: numbers,
/// constants, real powers of positive values, and sums whose terms all have the same sign.
fn sign(expr: &Expr) -> Option<Ordering> {
    let zero = Number::from(0);
    match expr.node() {
        Node::Number(n) => n.cmp_value(&zero),
        Node::Constant(_) => Some(Ordering::Greater),
        Node::Pow(base, exp) => positive_power(base, exp),
        Node::Mul(product) => {
            for (base, exp) in &product.factors {
                positive_power(base, exp)?;
            }
            product.coef.cmp_value(&zero)
        },
        Node::Add(sum) => {
            let constant = sum.coef.cmp_value(&zero)?;
            let parts = sum.terms.iter()
                .map(|(term, coef)| Some(times(sign(term)?, coef.cmp_value(&zero)?)))
                .chain((constant != Ordering::Equal).then_some(Some(constant)));

            let mut result = None;
            for part in parts {
                let part = part?;
                match result {
                    None => result = Some(part),
                    Some(known) if known == part => (),
                    Some(_) => return None,
                }
            }
            result
        },
        _ => None,
    }
}

/// [`Ordering::Greater`] if `base^exp` is a real power of a positive value.
fn positive_power(base: &Expr, exp: &Expr) -> Option<Ordering> {
    exp.as_number()?.cmp_value(&Number::from(0))?;
    (sign(base)? == Ordering::Greater).then_some(Ordering::Greater)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::error::ComplexInfinity;
    use crate::number::Number;
    use crate::primitive::float;
    use crate::symbolic::functions::TwoArgKind;
    use crate::symbolic::arith::sqrt;
    use crate::symbolic::functions::{acos, acot, asec, asin, atan, atan2, cos, cot, csc, sec, sin, tan};
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn pi_times(num: i64, den: i64) -> Expr {
        mul(&Expr::rational(num, den), &Expr::pi())
    }

    #[test]
    fn values_at_zero() {
        assert_eq!(sin(&Expr::zero()).unwrap(), Expr::zero());
        assert_eq!(cos(&Expr::zero()).unwrap(), Expr::one());
        assert_eq!(tan(&Expr::zero()).unwrap(), Expr::zero());
        assert_eq!(sec(&Expr::zero()).unwrap(), Expr::one());
        assert!(cot(&Expr::zero()).unwrap_err().is::<ComplexInfinity>());
        assert!(csc(&Expr::zero()).unwrap_err().is::<ComplexInfinity>());
    }

    #[test]
    fn special_angles() {
        let sq2 = sqrt(&Expr::integer(2)).unwrap();
        let sq3 = sqrt(&Expr::integer(3)).unwrap();
        let two = Expr::integer(2);

        assert_eq!(sin(&pi_times(1, 3)).unwrap(), div(&sq3, &two).unwrap());
        assert_eq!(sin(&pi_times(1, 4)).unwrap(), div(&sq2, &two).unwrap());
        assert_eq!(
            sin(&pi_times(1, 12)).unwrap(),
            div(&sub(&sq3, &Expr::one()), &mul(&two, &sq2)).unwrap(),
        );
        assert_eq!(cos(&pi_times(1, 3)).unwrap(), Expr::half());
        assert_eq!(cos(&Expr::pi()).unwrap(), Expr::minus_one());
        assert_eq!(sin(&pi_times(-1, 4)).unwrap(), neg(&div(&sq2, &two).unwrap()));
        assert_eq!(tan(&pi_times(1, 4)).unwrap(), Expr::one());
        assert_eq!(csc(&pi_times(1, 6)).unwrap(), two);
    }

    #[test]
    fn poles() {
        assert!(tan(&pi_times(1, 2)).unwrap_err().is::<ComplexInfinity>());
        assert!(cot(&Expr::pi()).unwrap_err().is::<ComplexInfinity>());
        assert!(sec(&pi_times(3, 2)).unwrap_err().is::<ComplexInfinity>());
    }

    #[test]
    fn symmetry() {
        let y = mul(&x(), &Expr::symbol("y"));
        for y in [x(), y] {
            let minus_y = neg(&y);
            assert_eq!(sin(&minus_y).unwrap(), neg(&sin(&y).unwrap()));
            assert_eq!(cos(&minus_y).unwrap(), cos(&y).unwrap());
            assert_eq!(tan(&minus_y).unwrap(), neg(&tan(&y).unwrap()));
            assert_eq!(cot(&minus_y).unwrap(), neg(&cot(&y).unwrap()));
            assert_eq!(csc(&minus_y).unwrap(), neg(&csc(&y).unwrap()));
            assert_eq!(sec(&minus_y).unwrap(), sec(&y).unwrap());
        }
    }

    #[test]
    fn cofunctions() {
        let y = x();
        let quarter = add(&y, &pi_times(1, 2));
        assert_eq!(sin(&quarter).unwrap(), cos(&y).unwrap());
        assert_eq!(cos(&quarter).unwrap(), neg(&sin(&y).unwrap()));
        assert_eq!(tan(&quarter).unwrap(), neg(&cot(&y).unwrap()));
        assert_eq!(cot(&quarter).unwrap(), neg(&tan(&y).unwrap()));
        assert_eq!(csc(&quarter).unwrap(), sec(&y).unwrap());
        assert_eq!(sec(&quarter).unwrap(), neg(&csc(&y).unwrap()));

        let reflected = sub(&pi_times(1, 2), &y);
        assert_eq!(sin(&reflected).unwrap(), cos(&y).unwrap());
        assert_eq!(cos(&reflected).unwrap(), sin(&y).unwrap());
    }

    #[test]
    fn periodicity() {
        let y = x();
        for k in -3..=3 {
            let shifted = add(&y, &mul(&Expr::integer(2 * k), &Expr::pi()));
            assert_eq!(sin(&shifted).unwrap(), sin(&y).unwrap());
            assert_eq!(cos(&shifted).unwrap(), cos(&y).unwrap());

            let half_turns = add(&y, &mul(&Expr::integer(k), &Expr::pi()));
            assert_eq!(tan(&half_turns).unwrap(), tan(&y).unwrap());
        }
        let half_turn = add(&y, &Expr::pi());
        assert_eq!(sin(&half_turn).unwrap(), neg(&sin(&y).unwrap()));
        assert_eq!(sin(&sub(&Expr::pi(), &y)).unwrap(), sin(&y).unwrap());
    }

    #[test]
    fn remainder_keeps_pi() {
        let y = x();
        let arg = add(&y, &pi_times(25, 12));
        assert_eq!(sin(&arg).unwrap(), sin(&add(&y, &pi_times(1, 12))).unwrap());
        assert_eq!(sin(&arg).unwrap().to_string(), "sin(x + 1/12*pi)");
    }

    #[test]
    fn unique_canonical_form() {
        let y = x();
        assert_eq!(sin(&mul(&Expr::integer(2), &y)).unwrap(), sin(&add(&y, &y)).unwrap());
    }

    #[test]
    fn idempotent_construction() {
        let y = x();
        let arg = add(&y, &pi_times(1, 3));
        for node in [sin(&arg).unwrap(), cos(&y).unwrap(), tan(&pi_times(1, 5)).unwrap()] {
            let Node::OneArg(kind, inner) = node.node() else {
                panic!("expected a function node, got {}", node);
            };
            assert!(kind.is_canonical(inner));
            assert_eq!(kind.create(inner).unwrap(), node);
        }
    }

    #[test]
    fn inverse_composition() {
        let y = x();
        assert_eq!(sin(&asin(&y).unwrap()).unwrap(), y);
        assert_eq!(tan(&atan(&y).unwrap()).unwrap(), y);
        assert_eq!(cos(&asec(&y).unwrap()).unwrap(), div(&Expr::one(), &y).unwrap());
    }

    #[test]
    fn inverse_values() {
        let sq3 = sqrt(&Expr::integer(3)).unwrap();
        assert_eq!(asin(&Expr::half()).unwrap(), pi_times(1, 6));
        assert_eq!(asin(&Expr::minus_one()).unwrap(), pi_times(-1, 2));
        assert_eq!(acos(&Expr::half()).unwrap(), pi_times(1, 3));
        assert_eq!(acos(&Expr::rational(-1, 2)).unwrap(), pi_times(2, 3));
        assert_eq!(asec(&Expr::integer(2)).unwrap(), pi_times(1, 3));
        assert_eq!(atan(&sq3).unwrap(), pi_times(1, 3));
        assert_eq!(acot(&Expr::minus_one()).unwrap(), pi_times(3, 4));
        assert_eq!(acot(&sq3).unwrap(), pi_times(1, 6));
        assert_eq!(asin(&Expr::integer(2)).unwrap().to_string(), "asin(2)");
    }

    #[test]
    fn atan2_quadrants() {
        let one = Expr::one();
        let minus_one = Expr::minus_one();
        assert_eq!(atan2(&one, &one).unwrap(), pi_times(1, 4));
        assert_eq!(atan2(&one, &minus_one).unwrap(), pi_times(3, 4));
        assert_eq!(atan2(&minus_one, &minus_one).unwrap(), pi_times(-3, 4));
        assert_eq!(atan2(&Expr::zero(), &Expr::integer(-3)).unwrap(), Expr::pi());
        assert_eq!(atan2(&Expr::integer(2), &Expr::zero()).unwrap(), pi_times(1, 2));
        assert_eq!(atan2(&Expr::integer(-2), &Expr::zero()).unwrap(), pi_times(-1, 2));
        assert!(atan2(&Expr::zero(), &Expr::zero()).is_err());
        assert!(TwoArgKind::ATan2.is_canonical(&x(), &Expr::integer(2)));
    }

    #[test]
    fn inverse_at_five_twelfths() {
        let value = sin(&pi_times(5, 12)).unwrap();
        assert_eq!(asin(&value).unwrap(), pi_times(5, 12));
        assert_eq!(acos(&value).unwrap(), pi_times(1, 12));
        assert_eq!(asin(&neg(&value)).unwrap(), pi_times(-5, 12));

        let value = sin(&pi_times(1, 12)).unwrap();
        assert_eq!(asin(&value).unwrap(), pi_times(1, 12));
        assert_eq!(acos(&value).unwrap(), pi_times(5, 12));
    }

    #[test]
    fn atan2_surd_quadrants() {
        let sq3 = sqrt(&Expr::integer(3)).unwrap();
        let minus_sq3 = neg(&sq3);
        let one = Expr::one();
        let minus_one = Expr::minus_one();
        assert_eq!(atan2(&sq3, &one).unwrap(), pi_times(1, 3));
        assert_eq!(atan2(&sq3, &minus_one).unwrap(), pi_times(2, 3));
        assert_eq!(atan2(&minus_sq3, &minus_one).unwrap(), pi_times(-2, 3));
        assert_eq!(atan2(&minus_sq3, &one).unwrap(), pi_times(-1, 3));
        assert_eq!(atan2(&minus_sq3, &minus_sq3).unwrap(), pi_times(-3, 4));
    }

    #[test]
    fn atan2_unknown_sign_stays() {
        // sqrt(3)*x/x is a table tangent, but the quadrant depends on the sign of x
        let sq3 = sqrt(&Expr::integer(3)).unwrap();
        let node = atan2(&mul(&sq3, &x()), &x()).unwrap();
        assert!(matches!(node.node(), Node::TwoArg(TwoArgKind::ATan2, ..)));
        assert!(matches!(atan2(&x(), &Expr::one()).unwrap().node(), Node::TwoArg(..)));
    }

    #[test]
    fn inexact_arguments() {
        let value = sin(&Expr::number(float(0.5))).unwrap();
        let Some(Number::Float(f)) = value.as_number() else {
            panic!("expected a float, got {}", value);
        };
        assert_float_absolute_eq!(f.to_f64(), 0.5f64.sin(), 1e-12);
    }
}
