//! Canonical symbolic expressions.
//!
//! # Expression representation
//!
//! An expression is an [`Expr`], a cheap, thread-safe handle to an immutable [`Node`]. Nodes are
//! never mutated after construction, and children are shared freely between parents, so cloning
//! an [`Expr`] only increments a reference count.
//!
//! Sums and products are **flattened** into dictionaries: `2*x + 3*y + 1` is a single
//! [`Node::Add`] holding the constant `1` and the terms `{x: 2, y: 3}`, and `2*x^2*y` is a single
//! [`Node::Mul`] holding the coefficient `2` and the factors `{x: 2, y: 1}`. Like terms and like
//! factors are combined as the dictionaries are built, which is what makes the canonical form
//! unique.
//!
//! # Smart constructors
//!
//! Nodes are only ever built through smart constructors, such as [`arith::add`],
//! [`arith::pow`], or [`functions::sin`]. Each one checks whether its arguments can be
//! simplified, and builds the raw node only if they cannot:
//!
//! ```
//! use cas_kernel::symbolic::{arith::mul, functions::{cos, sin}, Expr};
//!
//! let x = Expr::symbol("x");
//! let minus_x = mul(&Expr::minus_one(), &x);
//!
//! // sin is odd, cos is even
//! assert_eq!(sin(&minus_x)?, mul(&Expr::minus_one(), &sin(&x)?));
//! assert_eq!(cos(&minus_x)?, cos(&x)?);
//! # Ok::<(), cas_error::Error>(())
//! ```
//!
//! # Calculus
//!
//! [`Expr::diff`] differentiates any expression with respect to a symbol. Functions whose
//! derivative has no closed form, such as an undefined function `f(x)`, differentiate to a
//! [`Node::Derivative`] node; when the chain rule must be applied through such a function, the
//! result is wrapped in a [`Node::Subs`] node evaluating the derivative at the inner expression.
//! [`Expr::subs`] substitutes expressions simultaneously, re-running every smart constructor on
//! the way back up.

pub mod arith;
pub mod derivative;
pub mod expr;
pub mod functions;
pub mod subs;

pub use expr::{Constant, Expr, Node, Product, Sum, TypeCode};
pub use subs::SubsMap;
