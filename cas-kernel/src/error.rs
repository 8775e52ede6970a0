//! Kinds of errors raised by smart constructors, differentiation, substitution, and numeric
//! evaluation.
//!
//! Every error is a [`cas_error::Error`] carrying the displayed form of the expression that could
//! not be built, and one of the kinds below.

use cas_attrs::ErrorKind;
use cas_error::{Error, ErrorKind};
use std::fmt::Display;

/// The expression is a pole of the function, and has the value of complex infinity.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "complex infinity is not yet implemented",
    label = "this expression is singular",
)]
pub struct ComplexInfinity;

/// The expression is well-defined, but its value cannot be expressed yet.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("{} is not yet implemented", self.feature),
    label = "while building this expression",
)]
pub struct NotImplemented {
    /// What is missing.
    pub feature: String,
}

/// A function requiring at least one argument was called without any.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` requires at least one argument", self.function),
    label = "no arguments given",
)]
pub struct EmptyArguments {
    /// The name of the function.
    pub function: &'static str,
}

/// A `Derivative` node was requested with no differentiation variables.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("these arguments do not form a canonical `{}` node", self.node),
    label = "this node",
    help = "differentiate with respect to at least one symbol",
)]
pub struct NonCanonical {
    /// The name of the node type.
    pub node: &'static str,
}

/// Differentiation was requested with respect to something other than a symbol.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot differentiate with respect to `{}`", self.expr),
    label = "this derivative",
    help = "differentiation variables must be symbols",
)]
pub struct NotASymbol {
    /// The offending differentiation variable.
    pub expr: String,
}

/// Numeric evaluation reached a symbol, which has no numeric value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` has no numeric value", self.name),
    label = "this expression contains a free symbol",
    help = "substitute a number for every symbol before evaluating",
)]
pub struct FreeSymbol {
    /// The name of the symbol.
    pub name: String,
}

/// Two numbers cannot be ordered, because at least one of them is complex.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("cannot compare `{}` and `{}`", self.lhs, self.rhs),
    label = "in this expression",
    help = "only real numbers can be compared",
)]
pub struct Incomparable {
    pub lhs: String,
    pub rhs: String,
}

/// Shorthand for a [`ComplexInfinity`] error raised while building `expr`.
pub(crate) fn complex_infinity(expr: impl Display) -> Error {
    Error::new(expr, ComplexInfinity)
}

/// Shorthand for a [`NotImplemented`] error raised while building `expr`.
pub(crate) fn not_implemented(expr: impl Display, feature: impl Into<String>) -> Error {
    Error::new(expr, NotImplemented { feature: feature.into() })
}
