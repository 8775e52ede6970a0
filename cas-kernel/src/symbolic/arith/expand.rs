use cas_error::Error;
use crate::number::Number;
use crate::symbolic::expr::{Expr, Node};
use super::{add::sum, mul::mul, power::pow};

/// Returns the terms of an expression, as [`Expr::get_args`] would for a sum.
fn addends(expr: &Expr) -> Vec<Expr> {
    match expr.node() {
        Node::Add(_) => expr.get_args(),
        _ => vec![expr.clone()],
    }
}

/// Multiplies two expanded expressions, distributing over their terms.
fn distribute(a: &Expr, b: &Expr) -> Expr {
    let (lhs, rhs) = (addends(a), addends(b));
    let products = lhs.iter()
        .flat_map(|l| rhs.iter().map(move |r| mul(l, r)))
        .collect::<Vec<_>>();
    sum(&products)
}

/// Expands an expression, distributing products over sums and expanding positive integer powers
/// of sums.
///
/// Arguments of functions are not expanded.
pub fn expand(expr: &Expr) -> Result<Expr, Error> {
    match expr.node() {
        Node::Add(_) => {
            let terms = expr.get_args()
                .iter()
                .map(expand)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(sum(&terms))
        },
        Node::Mul(_) => {
            let mut result = Expr::one();
            for factor in expr.get_args() {
                result = distribute(&result, &expand(&factor)?);
            }
            Ok(result)
        },
        Node::Pow(base, exp) => {
            let base = expand(base)?;
            match (base.node(), exp.as_number()) {
                (Node::Add(_), Some(Number::Integer(n))) if n.cmp0().is_gt() => {
                    let n = n.to_u32().unwrap_or(u32::MAX);
                    let mut result = base.clone();
                    for _ in 1..n {
                        result = distribute(&result, &base);
                    }
                    Ok(result)
                },
                _ => pow(&base, exp),
            }
        },
        _ => Ok(expr.clone()),
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::arith::{add, sub};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn square_of_sum() {
        let x = Expr::symbol("x");
        let one_plus_x = add(&Expr::one(), &x);
        let squared = pow(&one_plus_x, &Expr::integer(2)).unwrap();
        let expected = sum(&[
            Expr::one(),
            mul(&Expr::integer(2), &x),
            pow(&x, &Expr::integer(2)).unwrap(),
        ]);
        assert_eq!(expand(&squared).unwrap(), expected);
    }

    #[test]
    fn difference_of_squares() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let product = mul(&add(&x, &y), &sub(&x, &y));
        let expected = sub(&pow(&x, &Expr::integer(2)).unwrap(), &pow(&y, &Expr::integer(2)).unwrap());
        assert_eq!(expand(&product).unwrap(), expected);
    }
}
