//! Smart constructors for sums, products, and powers.
//!
//! Sums and products are built incrementally, by absorbing one operand at a time into a
//! dictionary ([`add::SumBuilder`] and [`mul::ProductBuilder`]). The dictionary is then converted
//! back into the simplest node that represents it: a sum with a single term and no constant is
//! just that term, a product with a single factor and a unit coefficient is just that power, and
//! so on.
//!
//! [`add`], [`sub`], [`neg`], and [`mul`] are total. [`div`], [`pow`], and the functions built on
//! them can fail, for example when dividing by zero.

pub(crate) mod add;
mod expand;
pub(crate) mod mul;
pub(crate) mod power;

pub use add::{add, neg, sub, sum};
pub use expand::expand;
pub use mul::{div, mul, product};
pub use power::{exp, log, pow, sqrt};

/// Returns true if the number is the exact integer `1`. A float `1.0` is not absorbed like an
/// exact one is.
pub(crate) fn is_unit(n: &crate::number::Number) -> bool {
    matches!(n, crate::number::Number::Integer(i) if *i == 1)
}
