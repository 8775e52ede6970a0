use cas_error::Error;
use crate::number::Number;
use crate::symbolic::expr::{Expr, Node, Product};
use std::collections::BTreeMap;
use super::{add::add, is_unit, power::{self, pow}};

/// Accumulates the factors of a product into a dictionary, combining like bases.
#[derive(Debug, Clone)]
pub(crate) struct ProductBuilder {
    coef: Number,
    factors: BTreeMap<Expr, Expr>,
}

impl Default for ProductBuilder {
    fn default() -> Self {
        Self::with_coef(Number::from(1))
    }
}

impl ProductBuilder {
    pub(crate) fn with_coef(coef: Number) -> Self {
        Self { coef, factors: BTreeMap::new() }
    }

    /// Multiplies the product by an expression.
    pub(crate) fn absorb(&mut self, expr: &Expr) {
        match expr.node() {
            Node::Number(n) => self.coef = self.coef.mul(n),
            Node::Mul(product) => {
                self.coef = self.coef.mul(&product.coef);
                for (base, exp) in &product.factors {
                    self.add_term(base.clone(), exp.clone());
                }
            },
            Node::Pow(base, exp) => self.add_term(base.clone(), exp.clone()),
            _ => self.add_term(expr.clone(), Expr::one()),
        }
    }

    /// Multiplies the product by `base^exp`, adding the exponent to any existing power of the
    /// same base.
    pub(crate) fn add_term(&mut self, base: Expr, exp: Expr) {
        let exp = match self.factors.remove(&base) {
            Some(old) => add(&old, &exp),
            None => exp,
        };
        self.insert_power(base, exp);
    }

    /// Inserts `base^exp` into the dictionary, folding it into the coefficient when it evaluates
    /// to a number.
    fn insert_power(&mut self, base: Expr, exp: Expr) {
        if let Some(e) = exp.as_number() {
            if e.is_zero() {
                return;
            }
        }

        // a numeric power either folds into the coefficient or stays as a canonical surd
        if base.is_number() && exp.is_number() {
            match power::reduce(&base, &exp) {
                Ok(Some(value)) => self.absorb(&value),
                _ => {
                    self.factors.insert(base, exp);
                },
            }
            return;
        }

        // an integer power of a product or power distributes into the dictionary
        if let Some(Number::Integer(k)) = exp.as_number() {
            match base.node() {
                Node::Mul(product) => {
                    if let Ok(value) = product.coef.pow_int(k) {
                        self.coef = self.coef.mul(&value);
                    }
                    for (b, e) in &product.factors {
                        self.add_term(b.clone(), mul(e, &exp));
                    }
                    return;
                },
                Node::Pow(b, e) => {
                    self.add_term(b.clone(), mul(e, &exp));
                    return;
                },
                _ => (),
            }
        }

        self.factors.insert(base, exp);
    }

    /// Converts the dictionary into the simplest expression representing it.
    pub(crate) fn build(self) -> Expr {
        from_dict(self.coef, self.factors)
    }
}

/// Builds the simplest expression for `coef * product(b^e for b, e in factors)`.
pub(crate) fn from_dict(coef: Number, mut factors: BTreeMap<Expr, Expr>) -> Expr {
    if coef.is_zero() || factors.is_empty() {
        return Expr::number(coef);
    }
    if factors.len() == 1 && is_unit(&coef) {
        if let Some((base, exp)) = factors.pop_first() {
            return Expr::pow_raw(base, exp);
        }
    }
    Expr::new(Node::Mul(Product { coef, factors }))
}

/// Multiplies two expressions.
pub fn mul(a: &Expr, b: &Expr) -> Expr {
    let mut builder = ProductBuilder::default();
    builder.absorb(a);
    builder.absorb(b);
    builder.build()
}

/// Multiplies any number of expressions. The empty product is `1`.
pub fn product<'a>(exprs: impl IntoIterator<Item = &'a Expr>) -> Expr {
    let mut builder = ProductBuilder::default();
    for expr in exprs {
        builder.absorb(expr);
    }
    builder.build()
}

/// Divides `a` by `b`. Division by zero is reported as complex infinity.
pub fn div(a: &Expr, b: &Expr) -> Result<Expr, Error> {
    Ok(mul(a, &pow(b, &Expr::minus_one())?))
}
