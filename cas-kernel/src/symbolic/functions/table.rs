//! Exact values of the circular functions at multiples of `pi/12`, and the inverse lookup tables
//! used to recognize them.

use crate::symbolic::arith::{add, mul, neg, sub};
use crate::symbolic::expr::Expr;
use once_cell::sync::Lazy;
use rug::{Integer, Rational};
use std::collections::HashMap;

/// `n^(1/2)`, for a positive integer `n` that is not a perfect square.
fn surd(n: i64) -> Expr {
    Expr::pow_raw(Expr::integer(n), Expr::half())
}

fn rational(num: i64, den: i64) -> Expr {
    Expr::rational(num, den)
}

/// Closed forms of the sines of the special angles.
struct Constants {
    /// `sin(pi/12) = (3^(1/2) - 1)/(2*2^(1/2))`
    c0: Expr,
    /// `sin(pi/6) = 1/2`
    c1: Expr,
    /// `sin(pi/4) = 2^(1/2)/2`
    c2: Expr,
    /// `sin(pi/3) = 3^(1/2)/2`
    c3: Expr,
    /// `sin(5*pi/12) = (3^(1/2) + 1)/(2*2^(1/2))`
    c4: Expr,
    /// `sin(pi/5) = (10 - 2*5^(1/2))^(1/2)/4`
    c5: Expr,
    /// `sin(pi/10) = (5^(1/2) - 1)/4`
    c6: Expr,
}

static CONSTANTS: Lazy<Constants> = Lazy::new(|| {
    let quarter = rational(1, 4);
    let half = Expr::half();
    let (sq2, sq3, sq5) = (surd(2), surd(3), surd(5));
    let ten_minus = sub(&Expr::integer(10), &mul(&Expr::integer(2), &sq5));
    Constants {
        c0: mul(&mul(&sub(&sq3, &Expr::one()), &sq2), &quarter),
        c1: half.clone(),
        c2: mul(&sq2, &half),
        c3: mul(&sq3, &half),
        c4: mul(&mul(&add(&sq3, &Expr::one()), &sq2), &quarter),
        c5: mul(&Expr::pow_raw(ten_minus, half.clone()), &quarter),
        c6: mul(&sub(&sq5, &Expr::one()), &quarter),
    }
});

/// `SIN_TABLE[n]` is the exact value of `sin(n*pi/12)`, for `n` in `0..24`.
pub(crate) static SIN_TABLE: Lazy<[Expr; 24]> = Lazy::new(|| {
    let c = &*CONSTANTS;
    let first = [
        Expr::zero(),
        c.c0.clone(),
        c.c1.clone(),
        c.c2.clone(),
        c.c3.clone(),
        c.c4.clone(),
        Expr::one(),
        c.c4.clone(),
        c.c3.clone(),
        c.c2.clone(),
        c.c1.clone(),
        c.c0.clone(),
    ];
    std::array::from_fn(|n| if n < 12 { first[n].clone() } else { neg(&first[n - 12]) })
});

/// Maps `sin(pi/k)` to `k`, for the special angles `pi/k`. `k` is rational, as in `pi/(12/5)`.
pub(crate) static INVERSE_CST: Lazy<HashMap<Expr, Rational>> = Lazy::new(|| {
    let c = &*CONSTANTS;
    let mut table = HashMap::new();
    for (value, index) in [
        (&c.c3, Rational::from(3)),
        (&c.c2, Rational::from(4)),
        (&c.c4, Rational::from((12, 5))),
        (&c.c0, Rational::from(12)),
        (&c.c5, Rational::from(5)),
        (&c.c6, Rational::from(10)),
        (&c.c1, Rational::from(6)),
    ] {
        table.insert(neg(value), -index.clone());
        table.insert(value.clone(), index);
    }
    table
});

/// Maps `tan(pi/k)` to `k`, for the special angles `pi/k`.
pub(crate) static INVERSE_TCT: Lazy<HashMap<Expr, Rational>> = Lazy::new(|| {
    let (sq2, sq3, sq5) = (surd(2), surd(3), surd(5));
    let one = Expr::one();
    let two = Expr::integer(2);
    let one_plus_sq2 = add(&one, &sq2);
    let five_plus = Expr::pow_raw(add(&Expr::integer(5), &mul(&two, &sq5)), Expr::half());

    let mut table = HashMap::new();
    for (value, index) in [
        (mul(&rational(1, 3), &sq3), Rational::from(6)),
        (sq3.clone(), Rational::from(3)),
        (one_plus_sq2.clone(), Rational::from((8, 3))),
        (sub(&sq2, &one), Rational::from(8)),
        (sub(&two, &sq3), Rational::from(12)),
        (five_plus, Rational::from((5, 2))),
        (one, Rational::from(4)),
    ] {
        table.insert(neg(&value), -index.clone());
        table.insert(value, index);
    }

    // -(1 + 2^(1/2)) can also be spelled as the sum -1 - 2^(1/2)
    table.insert(sub(&Expr::minus_one(), &sq2), Rational::from((-8, 3)));
    table
});

/// Looks up an exact value in one of the inverse tables, returning `k` if `value` is the sine
/// (or tangent) of `pi/k`.
pub(crate) fn inverse_lookup(table: &HashMap<Expr, Rational>, value: &Expr) -> Option<Rational> {
    table.get(value).cloned()
}

/// `pi/k` for a rational `k`.
pub(crate) fn pi_over(k: &Rational) -> Expr {
    let recip = Rational::from((k.denom().clone(), k.numer().clone()));
    mul(&Expr::number(recip), &Expr::pi())
}

/// `n*pi/12` for an integer `n`.
pub(crate) fn pi_twelfths(n: &Integer) -> Expr {
    let coef = Rational::from((n.clone(), Integer::from(12)));
    mul(&Expr::number(coef), &Expr::pi())
}

#[cfg(test)]
mod tests {
    use crate::symbolic::arith::{div, sqrt};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn table_is_antiperiodic() {
        for n in 0..12 {
            assert_eq!(SIN_TABLE[n + 12], neg(&SIN_TABLE[n]));
        }
        assert_eq!(SIN_TABLE[6], Expr::one());
        assert_eq!(SIN_TABLE[18], Expr::minus_one());
    }

    #[test]
    fn constants_match_arithmetic() {
        let sq2 = sqrt(&Expr::integer(2)).unwrap();
        let sq3 = sqrt(&Expr::integer(3)).unwrap();
        let c0 = div(&sub(&sq3, &Expr::one()), &mul(&Expr::integer(2), &sq2)).unwrap();
        assert_eq!(SIN_TABLE[1], c0);
        assert_eq!(SIN_TABLE[3], div(&sq2, &Expr::integer(2)).unwrap());
    }

    #[test]
    fn negated_tangent_forms() {
        let sq2 = surd(2);
        let summed = sub(&Expr::minus_one(), &sq2);
        let negated = neg(&add(&Expr::one(), &sq2));
        assert_eq!(inverse_lookup(&INVERSE_TCT, &summed), Some(Rational::from((-8, 3))));
        assert_eq!(inverse_lookup(&INVERSE_TCT, &negated), Some(Rational::from((-8, 3))));
    }

    #[test]
    fn sine_keys_name_their_angle() {
        // every key of a multiple of pi/12 is the table sine of that angle
        for (value, k) in INVERSE_CST.iter() {
            let twelfths = Rational::from(12) / k.clone();
            if *twelfths.denom() != 1 {
                continue;
            }
            let n = twelfths.numer().to_i64().unwrap().rem_euclid(24) as usize;
            assert_eq!(&SIN_TABLE[n], value, "sin(pi/{})", k);
        }
        assert_eq!(inverse_lookup(&INVERSE_CST, &SIN_TABLE[5]), Some(Rational::from((12, 5))));
        assert_eq!(inverse_lookup(&INVERSE_CST, &SIN_TABLE[1]), Some(Rational::from(12)));
    }

    #[cfg(feature = "numerical")]
    #[test]
    fn inverse_tables_match_values() {
        use assert_float_eq::assert_float_absolute_eq;
        use crate::evalf::evalf;

        let value = |expr: &Expr| evalf(expr).unwrap().to_float().to_f64();
        let angle = |k: &Rational| std::f64::consts::PI / k.to_f64();
        for (key, k) in INVERSE_CST.iter() {
            assert_float_absolute_eq!(value(key), angle(k).sin(), 1e-12);
        }
        for (key, k) in INVERSE_TCT.iter() {
            assert_float_absolute_eq!(value(key), angle(k).tan(), 1e-12);
        }
    }

    #[test]
    fn pi_fractions() {
        assert_eq!(pi_over(&Rational::from(4)).to_string(), "1/4*pi");
        assert_eq!(pi_twelfths(&Integer::from(12)), Expr::pi());
    }
}
