use cas_error::Error;
use crate::error::{complex_infinity, not_implemented};
use crate::number::Number;
use crate::symbolic::expr::{Expr, Node};
use crate::symbolic::functions::OneArgKind;
use rug::Integer;
use tracing::trace;
use super::{add::sub, mul::{self, mul, ProductBuilder}};

/// Simplifies `a^b`, returning [`None`] if the raw power is already canonical.
pub(crate) fn reduce(a: &Expr, b: &Expr) -> Result<Option<Expr>, Error> {
    if let Some(nb) = b.as_number() {
        if nb.is_zero() {
            return Ok(Some(Expr::number(nb.pow_int(&Integer::new())?)));
        }
    }
    if b.is_one() {
        return Ok(Some(a.clone()));
    }
    if a.is_zero() {
        if b.as_number().is_some_and(Number::is_negative) {
            return Err(complex_infinity(format!("0^{}", b)));
        }
        return Ok(Some(Expr::zero()));
    }
    if a.is_one() {
        return Ok(Some(Expr::one()));
    }
    if let (true, Some(Number::Integer(k))) = (a.is_minus_one(), b.as_number()) {
        let sign = if k.is_odd() { -1 } else { 1 };
        return Ok(Some(Expr::integer(sign)));
    }

    match (a.node(), b.as_number()) {
        (Node::Number(na), Some(nb)) => reduce_numbers(a, na, nb),
        (Node::Mul(product), Some(Number::Integer(k))) => {
            let mut builder = ProductBuilder::with_coef(product.coef.pow_int(k)?);
            for (base, exp) in &product.factors {
                builder.add_term(base.clone(), mul(exp, b));
            }
            Ok(Some(builder.build()))
        },
        (Node::Mul(product), Some(_)) => {
            let coef = &product.coef;
            if coef.is_one() || coef.is_minus_one() || matches!(coef, Number::Complex(_)) {
                return Ok(None);
            }

            // split off the positive part of the coefficient: (c*x)^b = c^b * x^b
            let (outer, inner) = if coef.is_negative() {
                (coef.neg(), Number::from(-1))
            } else {
                (coef.clone(), Number::from(1))
            };
            let rest = mul::from_dict(inner, product.factors.clone());
            Ok(Some(mul(&pow(&Expr::number(outer), b)?, &pow(&rest, b)?)))
        },
        (Node::Pow(base, exp), Some(Number::Integer(_))) => Ok(Some(pow(base, &mul(exp, b))?)),
        _ => Ok(None),
    }
}

/// Simplifies a number raised to a numeric power.
fn reduce_numbers(a: &Expr, na: &Number, nb: &Number) -> Result<Option<Expr>, Error> {
    match nb {
        Number::Integer(k) => Ok(Some(Expr::number(na.pow_int(k)?))),
        Number::Rational(r) => match na {
            Number::Integer(_) => {
                if r.cmp0().is_gt() && r.numer() < r.denom() {
                    return Ok(None);
                }

                // integer to a fractional power: a^(q + r) = a^q * a^r, with r in (0, 1)
                let whole = r.clone().floor().into_numer_denom().0;
                let rem = Expr::number(Number::from_rational(r.clone() - &whole));
                let int_part = Expr::number(na.pow_int(&whole)?);
                trace!(base = %a, exp = %nb, "splitting integer part of exponent");
                Ok(Some(mul(&int_part, &Expr::pow_raw(a.clone(), rem))))
            },
            Number::Rational(q) => {
                // (p/q)^b = p^b * q^(-b)
                let (num, den) = q.clone().into_numer_denom();
                let b = Expr::number(nb.clone());
                let num = pow(&Expr::number(num), &b)?;
                let den = pow(&Expr::number(den), &super::neg(&b))?;
                Ok(Some(mul(&num, &den)))
            },
            _ => Ok(na.pow(nb)?.map(Expr::number)),
        },
        _ => Ok(na.pow(nb)?.map(Expr::number)),
    }
}

/// Returns true if `base^exp` cannot be simplified.
pub(crate) fn is_canonical(base: &Expr, exp: &Expr) -> bool {
    matches!(reduce(base, exp), Ok(None))
}

/// Raises `a` to the power of `b`.
pub fn pow(a: &Expr, b: &Expr) -> Result<Expr, Error> {
    Ok(match reduce(a, b)? {
        Some(expr) => expr,
        None => Expr::pow_raw(a.clone(), b.clone()),
    })
}

/// The principal square root, `x^(1/2)`.
pub fn sqrt(x: &Expr) -> Result<Expr, Error> {
    pow(x, &Expr::half())
}

/// The exponential function, `E^x`.
pub fn exp(x: &Expr) -> Result<Expr, Error> {
    pow(&Expr::e(), x)
}

/// The natural logarithm.
pub fn log(x: &Expr) -> Result<Expr, Error> {
    OneArgKind::Log.create(x)
}

/// Simplifies `log(x)`.
pub(crate) fn reduce_log(x: &Expr) -> Result<Option<Expr>, Error> {
    if x.is_zero() {
        return Err(complex_infinity("log(0)"));
    }
    if x.is_one() {
        return Ok(Some(Expr::zero()));
    }
    if matches!(x.node(), Node::Constant(crate::symbolic::Constant::E)) {
        return Ok(Some(Expr::one()));
    }

    let Some(n) = x.as_number() else {
        return Ok(None);
    };
    if let Some(eval) = n.get_eval() {
        return eval.log(n).map(|value| Some(Expr::number(value)));
    }
    if n.is_negative() {
        return Err(not_implemented(
            format!("log({})", x),
            "the logarithm of a negative number",
        ));
    }
    if let Number::Rational(r) = n {
        let (num, den) = r.clone().into_numer_denom();
        let num = log(&Expr::number(num))?;
        let den = log(&Expr::number(den))?;
        return Ok(Some(sub(&num, &den)));
    }
    Ok(None)
}
