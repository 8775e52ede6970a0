//! Numeric evaluation of whole expression trees.
//!
//! Every number is promoted to a [`Float`](rug::Float) (or [`Complex`](rug::Complex)) at
//! [`PRECISION`](crate::primitive::PRECISION) bits before a function is applied to it, and every
//! function is evaluated through the same [`Evaluator`] the smart constructors use for inexact
//! arguments.

use cas_error::Error;
use crate::consts;
use crate::error::{not_implemented, FreeSymbol, Incomparable};
use crate::number::{Evaluator, Number};
use crate::symbolic::expr::{Constant, Expr, Node};
use crate::symbolic::functions::{MultiArgKind, OneArgKind, TwoArgKind};
use std::cmp::Ordering;
use tracing::trace;

/// Evaluates the expression to a number.
///
/// Returns [`FreeSymbol`] if the expression contains a symbol, and [`NotImplemented`] for nodes
/// with no numeric value, such as undefined functions or unevaluated derivatives.
///
/// [`NotImplemented`]: crate::error::NotImplemented
pub fn evalf(expr: &Expr) -> Result<Number, Error> {
    let value = eval_node(expr)?;
    trace!(%expr, %value, "evaluated");
    Ok(value.to_inexact())
}

/// Evaluates an expression to a number, keeping exact numbers exact where possible.
fn eval_node(expr: &Expr) -> Result<Number, Error> {
    match expr.node() {
        Node::Number(n) => Ok(n.clone()),
        Node::Symbol(name) => Err(Error::new(expr, FreeSymbol { name: name.clone() })),
        Node::Constant(c) => Ok(Number::Float(match c {
            Constant::Pi => consts::PI.clone(),
            Constant::E => consts::E.clone(),
            Constant::EulerGamma => consts::EULER_GAMMA.clone(),
        })),
        Node::Add(sum) => sum.terms.iter().try_fold(sum.coef.clone(), |acc, (term, coef)| {
            Ok(acc.add(&coef.mul(&eval_node(term)?)))
        }),
        Node::Mul(product) => product.factors.iter().try_fold(product.coef.clone(), |acc, (base, exp)| {
            Ok(acc.mul(&power(expr, &eval_node(base)?, &eval_node(exp)?)?))
        }),
        Node::Pow(base, exp) => power(expr, &eval_node(base)?, &eval_node(exp)?),
        Node::OneArg(kind, arg) => eval_one_arg(*kind, &eval_node(arg)?.to_inexact()),
        Node::TwoArg(kind, a, b) => eval_two_arg(expr, *kind, &eval_node(a)?, &eval_node(b)?),
        Node::MultiArg(kind, args) => {
            let values = args.iter().map(eval_node).collect::<Result<Vec<_>, Error>>()?;
            eval_multi_arg(expr, *kind, values)
        },
        Node::FunctionSymbol { name, .. } | Node::FunctionWrapper { name, .. } => {
            Err(not_implemented(expr, format!("numeric evaluation of `{}`", name)))
        },
        Node::Derivative { .. } | Node::Subs { .. } => {
            Err(not_implemented(expr, "numeric evaluation of an unevaluated derivative"))
        },
    }
}

/// The evaluator for an inexact number.
fn evaluator(n: &Number) -> &'static dyn Evaluator {
    match n.get_eval() {
        Some(eval) => eval,
        None => n.to_inexact().get_eval().unwrap_or(&crate::number::eval::REAL),
    }
}

/// Raises `base` to `exp`, falling back to inexact arithmetic where the exact power is not a
/// number, such as `2^(1/2)`.
fn power(expr: &Expr, base: &Number, exp: &Number) -> Result<Number, Error> {
    if let Some(value) = base.pow(exp)? {
        return Ok(value);
    }
    base.to_inexact()
        .pow(exp)?
        .ok_or_else(|| not_implemented(expr, "this power"))
}

fn eval_one_arg(kind: OneArgKind, x: &Number) -> Result<Number, Error> {
    kind.evaluate(evaluator(x), x)
}

fn eval_two_arg(expr: &Expr, kind: TwoArgKind, a: &Number, b: &Number) -> Result<Number, Error> {
    let (a_inexact, b_inexact) = (a.to_inexact(), b.to_inexact());
    let eval = evaluator(&a_inexact);
    match kind {
        TwoArgKind::ATan2 => eval.atan2(&a_inexact, &b_inexact),
        TwoArgKind::Zeta if b.is_one() => eval.zeta(&a_inexact),
        TwoArgKind::PolyGamma => evaluator(&b_inexact).polygamma(a, &b_inexact),
        TwoArgKind::Beta => {
            // gamma(x)*gamma(y)/gamma(x + y)
            let gamma = |n: &Number| eval_one_arg(OneArgKind::Gamma, n);
            let numerator = gamma(&a_inexact)?.mul(&gamma(&b_inexact)?);
            numerator.div(&gamma(&a_inexact.add(&b_inexact))?)
        },
        TwoArgKind::LowerGamma | TwoArgKind::UpperGamma => {
            let (Number::Float(s), Number::Float(x)) = (&a_inexact, &b_inexact) else {
                return Err(not_implemented(expr, "the complex incomplete gamma functions"));
            };
            let upper = Number::Float(s.clone().gamma_inc(x)).finite(|| expr.to_string())?;
            if kind == TwoArgKind::UpperGamma {
                return Ok(upper);
            }
            let complete = Number::Float(s.clone().gamma()).finite(|| expr.to_string())?;
            Ok(complete.sub(&upper))
        },
        TwoArgKind::KroneckerDelta => match a.cmp_value(b) {
            Some(Ordering::Equal) => Ok(Number::from(1)),
            Some(_) => Ok(Number::from(0)),
            None => Err(not_implemented(expr, "the Kronecker delta of complex numbers")),
        },
        TwoArgKind::Zeta => Err(not_implemented(expr, "numeric evaluation of the Hurwitz zeta function")),
    }
}

fn eval_multi_arg(expr: &Expr, kind: MultiArgKind, values: Vec<Number>) -> Result<Number, Error> {
    let wanted = match kind {
        MultiArgKind::Max => Ordering::Greater,
        MultiArgKind::Min => Ordering::Less,
        MultiArgKind::LeviCivita => {
            return Err(not_implemented(expr, "numeric evaluation of the Levi-Civita symbol"));
        },
    };

    let mut values = values.into_iter();
    let Some(mut best) = values.next() else {
        return Err(not_implemented(expr, "an empty extremum"));
    };
    for value in values {
        match value.cmp_value(&best) {
            Some(ordering) if ordering == wanted => best = value,
            Some(_) => (),
            None => {
                return Err(Error::new(expr, Incomparable {
                    lhs: best.to_string(),
                    rhs: value.to_string(),
                }));
            },
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::error::{FreeSymbol, NotImplemented};
    use crate::symbolic::arith::{add, div, mul, pow, sqrt};
    use crate::symbolic::functions::{
        beta,
        function_symbol,
        lowergamma,
        max,
        sin,
        uppergamma,
        zeta,
    };
    use pretty_assertions::assert_eq;
    use super::*;

    fn value(expr: &Expr) -> f64 {
        evalf(expr).unwrap().to_float().to_f64()
    }

    #[test]
    fn constants() {
        assert_float_absolute_eq!(value(&Expr::pi()), std::f64::consts::PI, 1e-12);
        assert_float_absolute_eq!(value(&Expr::e()), std::f64::consts::E, 1e-12);
        assert_float_absolute_eq!(value(&Expr::euler_gamma()), 0.5772156649015329, 1e-12);
    }

    #[test]
    fn exact_values_become_inexact() {
        let n = evalf(&Expr::rational(1, 4)).unwrap();
        assert!(!n.is_exact());
        assert_float_absolute_eq!(n.to_float().to_f64(), 0.25, 1e-15);
    }

    #[test]
    fn surds_and_sums() {
        // 2^(1/2) + pi/2
        let expr = add(
            &sqrt(&Expr::integer(2)).unwrap(),
            &div(&Expr::pi(), &Expr::integer(2)).unwrap(),
        );
        let expected = 2f64.sqrt() + std::f64::consts::FRAC_PI_2;
        assert_float_absolute_eq!(value(&expr), expected, 1e-12);
    }

    #[test]
    fn functions_of_constants() {
        // sin(1) stays symbolic, but evaluates numerically
        let expr = mul(&Expr::integer(3), &sin(&Expr::one()).unwrap());
        assert_float_absolute_eq!(value(&expr), 3.0 * 1f64.sin(), 1e-12);

        let expr = zeta(&Expr::integer(3)).unwrap();
        assert_float_absolute_eq!(value(&expr), 1.2020569031595942, 1e-12);

        let expr = pow(&Expr::e(), &Expr::pi()).unwrap();
        assert_float_absolute_eq!(value(&expr), std::f64::consts::E.powf(std::f64::consts::PI), 1e-9);
    }

    #[test]
    fn incomplete_gamma() {
        // lowergamma(1/2, 1) + uppergamma(1/2, 1) = gamma(1/2) = pi^(1/2)
        let s = Expr::half();
        let lower = lowergamma(&s, &Expr::one()).unwrap();
        let upper = uppergamma(&s, &Expr::one()).unwrap();
        let total = value(&lower) + value(&upper);
        assert_float_absolute_eq!(total, std::f64::consts::PI.sqrt(), 1e-12);
    }

    #[test]
    fn beta_of_surd() {
        // beta(2^(1/2), 2) = 1/(2^(1/2)*(2^(1/2) + 1))
        let sq2 = sqrt(&Expr::integer(2)).unwrap();
        let expr = beta(&sq2, &Expr::integer(2)).unwrap();
        let r = 2f64.sqrt();
        assert_float_absolute_eq!(value(&expr), 1.0 / (r * (r + 1.0)), 1e-12);
    }

    #[test]
    fn extremum_of_constants() {
        let expr = max(vec![Expr::pi(), Expr::e()]).unwrap();
        assert_float_absolute_eq!(value(&expr), std::f64::consts::PI, 1e-12);
    }

    #[test]
    fn errors() {
        let x = Expr::symbol("x");
        let err = evalf(&add(&x, &Expr::one())).unwrap_err();
        assert!(err.is::<FreeSymbol>());
        assert_eq!(err.kind::<FreeSymbol>().unwrap().name, "x");

        let f = function_symbol("f", vec![Expr::one()]);
        assert!(evalf(&f).unwrap_err().is::<NotImplemented>());
    }
}
