use crate::number::Number;
use crate::symbolic::expr::{Expr, Node, Product, Sum};
use std::collections::BTreeMap;
use super::{is_unit, mul::{self, ProductBuilder}};

/// Accumulates the terms of a sum into a dictionary, combining like terms.
#[derive(Debug, Clone)]
pub(crate) struct SumBuilder {
    coef: Number,
    terms: BTreeMap<Expr, Number>,
}

impl Default for SumBuilder {
    fn default() -> Self {
        Self { coef: Number::from(0), terms: BTreeMap::new() }
    }
}

impl SumBuilder {
    /// Adds an expression to the sum.
    pub(crate) fn absorb(&mut self, expr: &Expr) {
        match expr.node() {
            Node::Number(n) => self.coef = self.coef.add(n),
            Node::Add(sum) => {
                self.coef = self.coef.add(&sum.coef);
                for (term, coef) in &sum.terms {
                    self.add_term(coef.clone(), term.clone());
                }
            },
            Node::Mul(product) if is_unit(&product.coef) => {
                self.add_term(Number::from(1), expr.clone());
            },
            Node::Mul(product) => {
                let term = mul::from_dict(Number::from(1), product.factors.clone());
                self.add_term(product.coef.clone(), term);
            },
            _ => self.add_term(Number::from(1), expr.clone()),
        }
    }

    /// Adds `coef * term` to the sum. A term whose coefficients cancel is removed.
    fn add_term(&mut self, coef: Number, term: Expr) {
        match self.terms.remove(&term) {
            Some(old) => {
                let new = old.add(&coef);
                if !new.is_zero() {
                    self.terms.insert(term, new);
                }
            },
            None => {
                if !coef.is_zero() {
                    self.terms.insert(term, coef);
                }
            },
        }
    }

    /// Converts the dictionary into the simplest expression representing it.
    pub(crate) fn build(self) -> Expr {
        from_dict(self.coef, self.terms)
    }
}

/// Builds the simplest expression for `coef + sum(c * t for t, c in terms)`.
pub(crate) fn from_dict(coef: Number, mut terms: BTreeMap<Expr, Number>) -> Expr {
    if terms.is_empty() {
        return Expr::number(coef);
    }
    if terms.len() == 1 && coef.is_zero() {
        if let Some((term, c)) = terms.pop_first() {
            if is_unit(&c) {
                return term;
            }
            return match term.node() {
                Node::Mul(product) => mul::from_dict(c, product.factors.clone()),
                Node::Pow(base, exp) => Expr::new(Node::Mul(Product {
                    coef: c,
                    factors: BTreeMap::from([(base.clone(), exp.clone())]),
                })),
                _ => Expr::new(Node::Mul(Product {
                    coef: c,
                    factors: BTreeMap::from([(term, Expr::one())]),
                })),
            };
        }
    }
    Expr::new(Node::Add(Sum { coef, terms }))
}

/// Adds two expressions.
pub fn add(a: &Expr, b: &Expr) -> Expr {
    let mut builder = SumBuilder::default();
    builder.absorb(a);
    builder.absorb(b);
    builder.build()
}

/// Adds any number of expressions. The empty sum is `0`.
pub fn sum<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> Expr {
    let mut builder = SumBuilder::default();
    for expr in exprs {
        builder.absorb(expr);
    }
    builder.build()
}

/// Subtracts `b` from `a`.
pub fn sub(a: &Expr, b: &Expr) -> Expr {
    add(a, &neg(b))
}

/// Negates an expression.
pub fn neg(a: &Expr) -> Expr {
    let mut builder = ProductBuilder::with_coef(Number::from(-1));
    builder.absorb(a);
    builder.build()
}

#[cfg(test)]
mod tests {
    use crate::symbolic::arith::mul;
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn single_scaled_term() {
        let x = Expr::symbol("x");
        let expr = add(&mul(&Expr::integer(3), &x), &Expr::zero());
        let Node::Mul(product) = expr.node() else { panic!("expected a product") };
        assert_eq!(product.coef, Number::from(3));
        assert_eq!(product.factors.get(&x), Some(&Expr::one()));
    }

    #[test]
    fn products_are_terms() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let xy = mul(&x, &y);
        let expr = add(&mul(&Expr::integer(2), &xy), &xy);
        assert_eq!(expr, mul(&Expr::integer(3), &xy));
    }

    #[test]
    fn empty_sum() {
        assert_eq!(sum([]), Expr::zero());
    }
}
