//! A symbolic mathematics kernel.
//!
//! Expressions are immutable trees of [`Expr`] nodes, always kept in a **canonical** form: every
//! node is built through a smart constructor that first tries to simplify its arguments (`sin(0)`
//! becomes `0`, `x + x` becomes `2*x`, `gamma(4)` becomes `6`), and only builds the node if no
//! simplification applies. Two mathematically identical inputs built through different paths
//! therefore compare equal structurally.
//!
//! ```
//! use cas_kernel::symbolic::{arith::{add, div}, functions::sin, Expr};
//!
//! let x = Expr::symbol("x");
//! let arg = add(&x, &div(&Expr::pi(), &Expr::integer(2))?);
//!
//! // sin(x + pi/2) = cos(x)
//! assert_eq!(sin(&arg)?.to_string(), "cos(x)");
//! # Ok::<(), cas_error::Error>(())
//! ```
//!
//! Smart constructors that can fail (at a pole, or where a closed form is not implemented yet)
//! return a [`cas_error::Error`] instead of a sentinel value.
//!
//! [`Expr`]: symbolic::Expr

pub mod consts;
pub mod error;
#[cfg(feature = "numerical")]
pub mod evalf;
pub mod number;
pub mod primitive;
pub mod symbolic;

pub use number::Number;
pub use symbolic::{Expr, Node, SubsMap};
