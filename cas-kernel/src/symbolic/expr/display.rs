use crate::number::Number;
use std::fmt::{self, Display, Formatter};
use super::{Expr, Node};

/// Binding strength of an expression when printed, used to decide where parentheses go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Add,
    Mul,
    Pow,
    Atom,
}

impl Expr {
    fn precedence(&self) -> Precedence {
        match self.node() {
            Node::Number(n) => number_precedence(n),
            Node::Add(_) => Precedence::Add,
            Node::Mul(_) => Precedence::Mul,
            Node::Pow(..) => Precedence::Pow,
            _ => Precedence::Atom,
        }
    }
}

/// Negative numbers and fractions print with a sign or a slash, so they bind like a product.
fn number_precedence(n: &Number) -> Precedence {
    match n {
        Number::Rational(_) => Precedence::Mul,
        n if n.is_negative() => Precedence::Mul,
        _ => Precedence::Atom,
    }
}

/// Writes `expr`, wrapped in parentheses if it binds no tighter than `min`.
fn write_operand(f: &mut Formatter<'_>, expr: &Expr, min: Precedence) -> fmt::Result {
    if expr.precedence() <= min {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

/// Writes `base^exp`, or just `base` if `exp` is one.
fn write_power(f: &mut Formatter<'_>, base: &Expr, exp: &Expr) -> fmt::Result {
    if exp.is_one() {
        return write_operand(f, base, Precedence::Add);
    }
    write_operand(f, base, Precedence::Pow)?;
    write!(f, "^")?;
    write_operand(f, exp, Precedence::Pow)
}

/// Writes a comma-separated list of expressions.
fn write_list<'a>(f: &mut Formatter<'_>, exprs: impl IntoIterator<Item = &'a Expr>) -> fmt::Result {
    for (i, expr) in exprs.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", expr)?;
    }
    Ok(())
}

/// A term of a sum, `coef*term`.
struct Term<'a>(&'a Number, &'a Expr);

impl Display for Term<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Term(coef, term) = self;
        if coef.is_exact() && coef.is_minus_one() {
            write!(f, "-")?;
        } else if !(coef.is_exact() && coef.is_one()) {
            write!(f, "{}*", coef)?;
        }
        write_operand(f, term, Precedence::Add)
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.node() {
            Node::Number(n) => write!(f, "{}", n),
            Node::Symbol(name) => write!(f, "{}", name),
            Node::Constant(c) => write!(f, "{}", c.name()),
            Node::Add(sum) => {
                let mut pieces = sum.terms
                    .iter()
                    .map(|(term, coef)| Term(coef, term).to_string())
                    .collect::<Vec<_>>();
                if !sum.coef.is_zero() {
                    pieces.push(sum.coef.to_string());
                }

                for (i, piece) in pieces.iter().enumerate() {
                    match (i, piece.strip_prefix('-')) {
                        (0, _) => write!(f, "{}", piece)?,
                        (_, Some(rest)) => write!(f, " - {}", rest)?,
                        (_, None) => write!(f, " + {}", piece)?,
                    }
                }
                Ok(())
            },
            Node::Mul(product) => {
                let coef = &product.coef;
                if coef.is_exact() && coef.is_minus_one() {
                    write!(f, "-")?;
                } else if !(coef.is_exact() && coef.is_one()) {
                    write!(f, "{}*", coef)?;
                }
                for (i, (base, exp)) in product.factors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "*")?;
                    }
                    write_power(f, base, exp)?;
                }
                Ok(())
            },
            Node::Pow(base, exp) => write_power(f, base, exp),
            Node::OneArg(kind, arg) => write!(f, "{}({})", kind.name(), arg),
            Node::TwoArg(kind, a, b) => write!(f, "{}({}, {})", kind.name(), a, b),
            Node::MultiArg(kind, args) => {
                write!(f, "{}(", kind.name())?;
                write_list(f, args)?;
                write!(f, ")")
            },
            Node::FunctionSymbol { name, args } | Node::FunctionWrapper { name, args, .. } => {
                write!(f, "{}(", name)?;
                write_list(f, args)?;
                write!(f, ")")
            },
            Node::Derivative { arg, vars } => {
                write!(f, "Derivative({}, ", arg)?;
                write_list(f, vars)?;
                write!(f, ")")
            },
            Node::Subs { arg, dict } => {
                write!(f, "Subs({}, (", arg)?;
                write_list(f, dict.keys())?;
                write!(f, "), (")?;
                write_list(f, dict.values())?;
                write!(f, "))")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::arith::{add, div, mul, pow, sqrt, sub};
    use crate::symbolic::functions::{function_symbol, sin};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn sum_with_negative_term() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let expr = add(&sub(&x, &mul(&Expr::integer(2), &y)), &Expr::integer(3));
        assert_eq!(expr.to_string(), "x - 2*y + 3");
    }

    #[test]
    fn product_and_power() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let sum = add(&x, &y);
        let expr = mul(&Expr::integer(3), &pow(&sum, &Expr::integer(2)).unwrap());
        assert_eq!(expr.to_string(), "3*(x + y)^2");
    }

    #[test]
    fn surd() {
        let expr = div(&sqrt(&Expr::integer(3)).unwrap(), &Expr::integer(2)).unwrap();
        assert_eq!(expr.to_string(), "1/2*3^(1/2)");
    }

    #[test]
    fn function_calls() {
        let x = Expr::symbol("x");
        let f = function_symbol("f", vec![x.clone(), sin(&x).unwrap()]);
        assert_eq!(f.to_string(), "f(x, sin(x))");
    }
}
