use super::Expr;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// Every stored child is visited, including the exponents of products and the variables of
/// [`Node::Derivative`](super::Node::Derivative) nodes, but not the numeric coefficients of sums
/// and products, which are not expressions.
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression is the same handle as the last visited expression.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let children = expr.children();
            let done = match children.last() {
                Some(last) => self.is_last_visited(*last),
                None => true,
            };
            if done {
                return self.visit();
            }
            self.stack.extend(children.into_iter().rev());
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::functions::{function_symbol, sin};
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn post_order() {
        let x = Expr::symbol("x");
        let y = Expr::symbol("y");
        let sin_y = sin(&y).unwrap();
        let f = function_symbol("f", vec![x.clone(), sin_y.clone()]);
        let visited = f.post_order_iter().cloned().collect::<Vec<_>>();
        assert_eq!(visited, vec![x, y, sin_y, f]);
    }
}
