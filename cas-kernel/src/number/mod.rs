//! Scalar values appearing in expressions.
//!
//! A [`Number`] is either **exact** ([`Number::Integer`] or [`Number::Rational`]) or **inexact**
//! ([`Number::Float`] or [`Number::Complex`]). Arithmetic between numbers is closed: combining two
//! exact numbers stays exact, and any inexact operand promotes the result to the "widest" kind
//! involved (integer < rational < float < complex).
//!
//! Exact numbers participate in symbolic canonicalization (`sin(0)` folds to `0`, `2 * 3` folds
//! to `6`). Inexact numbers are evaluated instead, through the [`Evaluator`] returned by
//! [`Number::get_eval`].
//!
//! This module **must never** produce non-finite [`Float`]s (such as `NaN` or `Infinity`); every
//! operation that could produce one reports an error instead, since [`Hash`] and [`Eq`] for
//! [`Number`] rely on it.

pub mod eval;

use crate::error::complex_infinity;
use crate::primitive::{complex, float, int};
use cas_error::Error;
pub use eval::Evaluator;
use rug::{ops::Pow, Complex, Float, Integer, Rational};
use std::{cmp::Ordering, fmt, hash::{Hash, Hasher}};

/// An exact or inexact scalar value.
#[derive(Debug, Clone)]
pub enum Number {
    /// An integer, such as `2` or `-144`.
    Integer(Integer),

    /// A rational number with a denominator greater than one, such as `1/2`.
    Rational(Rational),

    /// A real floating-point number with [`PRECISION`](crate::primitive::PRECISION) bits of
    /// precision.
    Float(Float),

    /// A complex floating-point number with [`PRECISION`](crate::primitive::PRECISION) bits of
    /// precision.
    Complex(Complex),
}

impl Number {
    /// Creates a number from a [`Rational`], collapsing it into an [`Integer`] if the denominator
    /// is one.
    pub fn from_rational(r: Rational) -> Self {
        if *r.denom() == 1 {
            Self::Integer(r.into_numer_denom().0)
        } else {
            Self::Rational(r)
        }
    }

    /// Creates a number from a [`Complex`], collapsing it into a [`Float`] if the imaginary part is
    /// zero.
    pub fn from_complex(c: Complex) -> Self {
        if c.imag().is_zero() {
            Self::Float(c.into_real_imag().0)
        } else {
            Self::Complex(c)
        }
    }

    /// The rank of this number's kind, used for promotion and ordering.
    fn rank(&self) -> u8 {
        match self {
            Self::Integer(_) => 0,
            Self::Rational(_) => 1,
            Self::Float(_) => 2,
            Self::Complex(_) => 3,
        }
    }

    /// Returns true if the number is exact (an integer or rational).
    pub fn is_exact(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Rational(_))
    }

    /// Returns true if the number is an exact integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Integer(_))
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Integer(n) => n.cmp0() == Ordering::Equal,
            Self::Rational(n) => n.cmp0() == Ordering::Equal,
            Self::Float(n) => n.is_zero(),
            Self::Complex(n) => n.real().is_zero() && n.imag().is_zero(),
        }
    }

    pub fn is_one(&self) -> bool {
        match self {
            Self::Integer(n) => *n == 1,
            Self::Rational(_) => false,
            Self::Float(n) => *n == 1,
            Self::Complex(n) => *n.real() == 1 && n.imag().is_zero(),
        }
    }

    pub fn is_minus_one(&self) -> bool {
        match self {
            Self::Integer(n) => *n == -1,
            Self::Rational(_) => false,
            Self::Float(n) => *n == -1,
            Self::Complex(n) => *n.real() == -1 && n.imag().is_zero(),
        }
    }

    /// Returns true if the number is real and strictly negative. Complex numbers are neither
    /// negative nor positive.
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(n) => n.cmp0() == Ordering::Less,
            Self::Rational(n) => n.cmp0() == Ordering::Less,
            Self::Float(n) => n.cmp0() == Some(Ordering::Less),
            Self::Complex(_) => false,
        }
    }

    /// Returns true if the number is real and strictly positive.
    pub fn is_positive(&self) -> bool {
        match self {
            Self::Integer(n) => n.cmp0() == Ordering::Greater,
            Self::Rational(n) => n.cmp0() == Ordering::Greater,
            Self::Float(n) => n.cmp0() == Some(Ordering::Greater),
            Self::Complex(_) => false,
        }
    }

    /// Returns the integer value, if the number is an exact integer.
    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Self::Integer(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value as a [`Rational`], if the number is exact.
    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            Self::Integer(n) => Some(Rational::from(n)),
            Self::Rational(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Converts a real number to a [`Float`]. Complex numbers are converted to their real part.
    pub fn to_float(&self) -> Float {
        match self {
            Self::Integer(n) => float(n),
            Self::Rational(n) => float(n),
            Self::Float(n) => n.clone(),
            Self::Complex(n) => n.real().clone(),
        }
    }

    /// Converts the number to a [`Complex`].
    pub fn to_complex(&self) -> Complex {
        match self {
            Self::Complex(n) => n.clone(),
            other => complex((other.to_float(), 0)),
        }
    }

    /// Converts the number to an inexact number of the same magnitude.
    pub fn to_inexact(&self) -> Self {
        match self {
            Self::Complex(n) => Self::Complex(n.clone()),
            other => Self::Float(other.to_float()),
        }
    }

    /// Applies a binary operation, promoting both operands to the widest kind involved.
    fn binary(
        &self,
        rhs: &Self,
        int_op: impl FnOnce(&Integer, &Integer) -> Integer,
        rat_op: impl FnOnce(&Rational, &Rational) -> Rational,
        float_op: impl FnOnce(&Float, &Float) -> Float,
        complex_op: impl FnOnce(&Complex, &Complex) -> Complex,
    ) -> Self {
        match (self, rhs) {
            (Self::Integer(a), Self::Integer(b)) => Self::Integer(int_op(a, b)),
            (a, b) if a.is_exact() && b.is_exact() => {
                // both are exact, so both conversions succeed
                let (a, b) = (a.as_rational().unwrap_or_default(), b.as_rational().unwrap_or_default());
                Self::from_rational(rat_op(&a, &b))
            },
            (Self::Complex(_), _) | (_, Self::Complex(_)) => {
                Self::Complex(complex_op(&self.to_complex(), &rhs.to_complex()))
            },
            _ => Self::Float(float_op(&self.to_float(), &rhs.to_float())),
        }
    }

    pub fn add(&self, rhs: &Self) -> Self {
        self.binary(
            rhs,
            |a, b| Integer::from(a + b),
            |a, b| Rational::from(a + b),
            |a, b| float(a + b),
            |a, b| complex(a + b),
        )
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        self.binary(
            rhs,
            |a, b| Integer::from(a - b),
            |a, b| Rational::from(a - b),
            |a, b| float(a - b),
            |a, b| complex(a - b),
        )
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        self.binary(
            rhs,
            |a, b| Integer::from(a * b),
            |a, b| Rational::from(a * b),
            |a, b| float(a * b),
            |a, b| complex(a * b),
        )
    }

    /// Divides two numbers. Division by zero is reported as complex infinity.
    pub fn div(&self, rhs: &Self) -> Result<Self, Error> {
        if rhs.is_zero() {
            return Err(complex_infinity(format!("{}/{}", self, rhs)));
        }

        let result = match (self, rhs) {
            (a, b) if a.is_exact() && b.is_exact() => {
                let (a, b) = (a.as_rational().unwrap_or_default(), b.as_rational().unwrap_or_default());
                Self::from_rational(Rational::from(&a / &b))
            },
            (Self::Complex(_), _) | (_, Self::Complex(_)) => {
                Self::Complex(complex(&self.to_complex() / &rhs.to_complex()))
            },
            _ => Self::Float(float(&self.to_float() / &rhs.to_float())),
        };
        Ok(result)
    }

    pub fn neg(&self) -> Self {
        match self {
            Self::Integer(n) => Self::Integer(Integer::from(-n)),
            Self::Rational(n) => Self::Rational(Rational::from(-n)),
            Self::Float(n) => Self::Float(float(-n)),
            Self::Complex(n) => Self::Complex(complex(-n)),
        }
    }

    /// The absolute value (or modulus) of the number.
    pub fn abs(&self) -> Self {
        match self {
            Self::Integer(n) => Self::Integer(n.clone().abs()),
            Self::Rational(n) => Self::Rational(n.clone().abs()),
            Self::Float(n) => Self::Float(n.clone().abs()),
            Self::Complex(n) => Self::Float(n.clone().abs().into_real_imag().0),
        }
    }

    /// Raises the number to an integer power.
    pub fn pow_int(&self, exp: &Integer) -> Result<Self, Error> {
        if exp.cmp0() == Ordering::Less && self.is_zero() {
            return Err(complex_infinity(format!("{}^{}", self, exp)));
        }

        let result = match self {
            Self::Integer(_) | Self::Rational(_) => {
                let base = self.as_rational().unwrap_or_default();
                let Some(e) = exp.clone().abs().to_u32() else {
                    return Err(crate::error::not_implemented(
                        format!("{}^{}", self, exp),
                        "exact powers with exponents this large",
                    ));
                };
                let (num, den) = base.into_numer_denom();
                let powered = Rational::from((num.pow(e), den.pow(e)));
                if exp.cmp0() == Ordering::Less {
                    Self::from_rational(powered.recip())
                } else {
                    Self::from_rational(powered)
                }
            },
            Self::Float(n) => Self::Float(float(n.pow(exp))),
            Self::Complex(n) => Self::Complex(complex(n.pow(exp))),
        };
        result.finite(|| format!("{}^{}", self, exp))
    }

    /// Raises the number to a numeric power.
    ///
    /// Returns `Ok(None)` if the result is not a number, which is the case for an exact base
    /// with a non-integer exact exponent (such as `2^(1/2)`); those powers stay symbolic.
    pub fn pow(&self, exp: &Self) -> Result<Option<Self>, Error> {
        if let Self::Integer(e) = exp {
            return self.pow_int(e).map(Some);
        }
        if self.is_exact() && exp.is_exact() {
            return Ok(None);
        }
        if self.is_zero() && !exp.is_positive() {
            return Err(complex_infinity(format!("{}^{}", self, exp)));
        }

        let result = match (self, exp) {
            (Self::Complex(_), _) | (_, Self::Complex(_)) => {
                Self::from_complex(complex(self.to_complex().pow(&exp.to_complex())))
            },
            (base, e) if base.is_negative() => {
                Self::from_complex(complex(base.to_complex().pow(&e.to_complex())))
            },
            (base, e) => Self::Float(base.to_float().pow(&e.to_float())),
        };
        result.finite(|| format!("{}^{}", self, exp)).map(Some)
    }

    /// Returns the number unchanged if it is finite, or a complex infinity error otherwise.
    pub(crate) fn finite(self, expr: impl FnOnce() -> String) -> Result<Self, Error> {
        let finite = match &self {
            Self::Integer(_) | Self::Rational(_) => true,
            Self::Float(n) => n.is_finite(),
            Self::Complex(n) => n.real().is_finite() && n.imag().is_finite(),
        };
        if finite {
            Ok(self)
        } else {
            Err(complex_infinity(expr()))
        }
    }

    /// Compares two real numbers by value, regardless of their kind. Returns [`None`] if either
    /// number is complex.
    pub fn cmp_value(&self, rhs: &Self) -> Option<Ordering> {
        match (self, rhs) {
            (Self::Complex(_), _) | (_, Self::Complex(_)) => None,
            (a, b) if a.is_exact() && b.is_exact() => Some(a.as_rational().cmp(&b.as_rational())),
            (a, b) => a.to_float().partial_cmp(&b.to_float()),
        }
    }

    /// Returns the evaluator for this number, if it is inexact.
    ///
    /// Exact numbers have no evaluator, since functions of exact numbers are simplified
    /// symbolically instead.
    pub fn get_eval(&self) -> Option<&'static dyn Evaluator> {
        match self {
            Self::Integer(_) | Self::Rational(_) => None,
            Self::Float(_) => Some(&eval::REAL),
            Self::Complex(_) => Some(&eval::COMPLEX),
        }
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Self::Integer(int(n))
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::Integer(int(n))
    }
}

impl From<Integer> for Number {
    fn from(n: Integer) -> Self {
        Self::Integer(n)
    }
}

impl From<Rational> for Number {
    fn from(n: Rational) -> Self {
        Self::from_rational(n)
    }
}

impl From<Float> for Number {
    fn from(n: Float) -> Self {
        Self::Float(n)
    }
}

impl From<Complex> for Number {
    fn from(n: Complex) -> Self {
        Self::Complex(n)
    }
}

/// Numbers are ordered first by kind (integer < rational < float < complex), then by value. This
/// is the order used to canonicalize expressions, not the numeric order; see
/// [`Number::cmp_value`] for the latter.
impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a.cmp(b),
            (Self::Rational(a), Self::Rational(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Complex(a), Self::Complex(b)) => a.real()
                .partial_cmp(b.real())
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.imag().partial_cmp(b.imag()).unwrap_or(Ordering::Equal)),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

/// The value of a [`Float`] as `(mantissa, exponent)` with an odd mantissa, so that equal values
/// stored at different precisions give the same key.
fn float_key(n: &Float) -> Option<(Integer, i32)> {
    let (mut mantissa, mut exp) = n.to_integer_exp()?;
    if mantissa == 0 {
        return Some((mantissa, 0));
    }
    if let Some(zeros) = mantissa.find_one(0) {
        mantissa >>= zeros;
        exp += zeros as i32;
    }
    Some((mantissa, exp))
}

/// [`Hash`] is implemented manually to allow hashing [`Float`]s, which is valid only because
/// this module never produces non-finite values.
impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::Integer(n) => n.hash(state),
            Self::Rational(n) => n.hash(state),
            Self::Float(n) => float_key(n).hash(state),
            Self::Complex(n) => {
                float_key(n.real()).hash(state);
                float_key(n.imag()).hash(state);
            },
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{}", n),
            Self::Rational(n) => write!(f, "{}", n),
            Self::Float(n) => write!(f, "{}", n.to_f64()),
            Self::Complex(n) => write!(f, "({} + {}*I)", n.real().to_f64(), n.imag().to_f64()),
        }
    }
}
