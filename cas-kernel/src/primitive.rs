//! Functions to construct [`Integer`]s, [`Rational`]s, [`Float`]s, and [`Complex`] numbers from
//! various types.

use rug::{Assign, Complex, Float, Integer, Rational};

/// The number of bits of precision to use when computing inexact values.
pub const PRECISION: u32 = 1 << 9;

/// Creates an [`Integer`] with the given value.
pub fn int<T>(n: T) -> Integer
where
    Integer: From<T>,
{
    Integer::from(n)
}

/// Creates a [`Rational`] with the given numerator and denominator. The result is normalized.
///
/// Panics if the denominator is zero.
pub fn rational<N, D>(num: N, den: D) -> Rational
where
    Rational: From<(N, D)>,
{
    Rational::from((num, den))
}

/// Creates a [`Float`] with the given value.
pub fn float<T>(n: T) -> Float
where
    Float: Assign<T>,
{
    Float::with_val(PRECISION, n)
}

/// Creates a [`Complex`] with the given value.
pub fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(PRECISION, n)
}

/// Computes `n!` exactly.
pub fn factorial(n: u32) -> Integer {
    Integer::from(Integer::factorial(n))
}
