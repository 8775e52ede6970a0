//! Simultaneous substitution.

use cas_error::Error;
use crate::symbolic::derivative::{derivative, subs_node};
use crate::symbolic::expr::{Expr, Node};
use std::collections::BTreeMap;
use tracing::trace;

/// A substitution, mapping each expression to replace to its replacement.
pub type SubsMap = BTreeMap<Expr, Expr>;

impl Expr {
    /// Replaces every occurrence of each key of `dict` with its value, simultaneously: a
    /// replacement is never itself substituted again. Every node on the way back up is rebuilt
    /// through its smart constructor.
    ///
    /// Keys are matched structurally against whole nodes, so `2*x` can be replaced in `2*x + 1`,
    /// but not in `4*x`.
    pub fn subs(&self, dict: &SubsMap) -> Result<Expr, Error> {
        if let Some(value) = dict.get(self) {
            return Ok(value.clone());
        }

        match self.node() {
            Node::Derivative { arg, vars } => subs_derivative(arg, vars, dict),
            Node::Subs { arg, dict: inner } => subs_subs(arg, inner, dict),
            _ => {
                let args = self.get_args();
                if args.is_empty() {
                    return Ok(self.clone());
                }
                let replaced = args.iter()
                    .map(|arg| arg.subs(dict))
                    .collect::<Result<Vec<_>, Error>>()?;
                if replaced == args {
                    return Ok(self.clone());
                }
                self.rebuild(&replaced)
            },
        }
    }
}

/// Substitutes into `Derivative(arg, vars)`.
///
/// A pair is applied directly to `arg` and the variables if it renames a symbol to one `arg` does
/// not depend on, or if neither side of it depends on any differentiation variable. Any other
/// pair would not commute with differentiation, so it is deferred in a [`Node::Subs`] around the
/// result.
fn subs_derivative(arg: &Expr, vars: &[Expr], dict: &SubsMap) -> Result<Expr, Error> {
    let mut direct = SubsMap::new();
    let mut deferred = SubsMap::new();
    for (key, value) in dict {
        let pair = SubsMap::from([(key.clone(), value.clone())]);
        if arg.subs(&pair)? == *arg {
            continue;
        }

        let renames_symbol = key.is_symbol() && value.is_symbol() && arg.diff(value)?.is_zero();
        let mut commutes = true;
        if !renames_symbol {
            for var in vars {
                if !key.diff(var)?.is_zero() || !value.diff(var)?.is_zero() {
                    commutes = false;
                    break;
                }
            }
        }

        if renames_symbol || commutes {
            direct.insert(key.clone(), value.clone());
        } else {
            deferred.insert(key.clone(), value.clone());
        }
    }

    let vars = vars.iter()
        .map(|var| var.subs(&direct))
        .collect::<Result<Vec<_>, Error>>()?;
    let result = derivative(&arg.subs(&direct)?, &vars)?;
    if deferred.is_empty() {
        return Ok(result);
    }
    trace!(%result, pairs = deferred.len(), "deferring substitution");
    subs_node(&result, &deferred)
}

/// Substitutes into `Subs(arg, inner)`.
///
/// The values of `inner` are substituted. Pairs whose key would change a key of `inner` are
/// shadowed by it; the rest are applied to `arg`.
fn subs_subs(arg: &Expr, inner: &SubsMap, dict: &SubsMap) -> Result<Expr, Error> {
    let mut outer = SubsMap::new();
    for (key, value) in dict {
        let pair = SubsMap::from([(key.clone(), value.clone())]);
        let mut shadowed = false;
        for inner_key in inner.keys() {
            if inner_key.subs(&pair)? != *inner_key {
                shadowed = true;
                break;
            }
        }
        if !shadowed {
            outer.insert(key.clone(), value.clone());
        }
    }

    let values = inner.iter()
        .map(|(key, value)| Ok((key.clone(), value.subs(dict)?)))
        .collect::<Result<SubsMap, Error>>()?;
    subs_node(&arg.subs(&outer)?, &values)
}

#[cfg(test)]
mod tests {
    use crate::symbolic::arith::{add, mul, pow, sub};
    use crate::symbolic::functions::{cos, function_symbol, sin};
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    fn f(arg: Expr) -> Expr {
        function_symbol("f", vec![arg])
    }

    #[test]
    fn symbol_for_number() {
        // (x + 1)^2 at x = 2
        let expr = pow(&add(&x(), &Expr::one()), &Expr::integer(2)).unwrap();
        let dict = SubsMap::from([(x(), Expr::integer(2))]);
        assert_eq!(expr.subs(&dict).unwrap(), Expr::integer(9));
    }

    #[test]
    fn resimplifies() {
        let half_pi = mul(&Expr::half(), &Expr::pi());
        let dict = SubsMap::from([(x(), half_pi)]);
        assert_eq!(sin(&x()).unwrap().subs(&dict).unwrap(), Expr::one());
        assert_eq!(cos(&x()).unwrap().subs(&dict).unwrap(), Expr::zero());
    }

    #[test]
    fn simultaneous() {
        // x - 2*y with x and y swapped
        let expr = sub(&x(), &mul(&Expr::integer(2), &y()));
        let dict = SubsMap::from([(x(), y()), (y(), x())]);
        assert_eq!(expr.subs(&dict).unwrap(), sub(&y(), &mul(&Expr::integer(2), &x())));
    }

    #[test]
    fn whole_node_keys() {
        let two_x = mul(&Expr::integer(2), &x());
        let expr = add(&two_x, &Expr::one());
        let dict = SubsMap::from([(two_x, y())]);
        assert_eq!(expr.subs(&dict).unwrap(), add(&y(), &Expr::one()));

        let dict = SubsMap::from([(f(x()), Expr::integer(3))]);
        assert_eq!(mul(&f(x()), &y()).subs(&dict).unwrap(), mul(&Expr::integer(3), &y()));
    }

    #[test]
    fn untouched_expression_is_shared() {
        let expr = add(&sin(&x()).unwrap(), &y());
        let dict = SubsMap::from([(Expr::symbol("z"), Expr::one())]);
        assert!(expr.subs(&dict).unwrap().ptr_eq(&expr));
    }

    #[test]
    fn derivative_renamed() {
        let d = f(x()).diff(&x()).unwrap();
        let dict = SubsMap::from([(x(), y())]);
        assert_eq!(d.subs(&dict).unwrap(), f(y()).diff(&y()).unwrap());
    }

    #[test]
    fn derivative_at_point() {
        let d = f(x()).diff(&x()).unwrap();
        let dict = SubsMap::from([(x(), Expr::integer(2))]);
        let at = d.subs(&dict).unwrap();
        assert_eq!(at, subs_node(&d, &dict).unwrap());
        assert_eq!(at.to_string(), "Subs(Derivative(f(x), x), (x), (2))");
    }

    #[test]
    fn derivative_independent_pair() {
        let d = f(x()).diff(&x()).unwrap();
        let dict = SubsMap::from([(y(), Expr::integer(2))]);
        assert_eq!(d.subs(&dict).unwrap(), d);
    }

    #[test]
    fn subs_commutes_with_substitution() {
        let (a, b, c) = (Expr::symbol("a"), Expr::symbol("b"), Expr::symbol("c"));
        let d = f(a.clone()).diff(&a).unwrap();
        let node = subs_node(&d, &SubsMap::from([(a.clone(), b.clone())])).unwrap();

        let result = node.subs(&SubsMap::from([(b, c.clone())])).unwrap();
        assert_eq!(result, subs_node(&d, &SubsMap::from([(a, c)])).unwrap());
    }

    #[test]
    fn chain_rule_at_point() {
        // f(x^2)' at x = 3 is 6*Subs(Derivative(f(_x), _x), (_x), (9))
        let expr = f(pow(&x(), &Expr::integer(2)).unwrap());
        let derived = expr.diff(&x()).unwrap();
        let at = derived.subs(&SubsMap::from([(x(), Expr::integer(3))])).unwrap();

        let dummy = Expr::symbol("_x");
        let d = f(dummy.clone()).diff(&dummy).unwrap();
        let expected = mul(
            &Expr::integer(6),
            &subs_node(&d, &SubsMap::from([(dummy, Expr::integer(9))])).unwrap(),
        );
        assert_eq!(at, expected);
    }

    #[test]
    fn shadowed_key() {
        // the inner dummy is bound, so an outer substitution for it is ignored
        let dummy = Expr::symbol("_x");
        let d = f(dummy.clone()).diff(&dummy).unwrap();
        let node = subs_node(&d, &SubsMap::from([(dummy.clone(), x())])).unwrap();

        let result = node.subs(&SubsMap::from([(dummy, y())])).unwrap();
        assert_eq!(result, node);
    }
}
