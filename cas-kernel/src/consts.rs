//! Additional constants used in the library. This module consists of static constants that return
//! [`Float`]s with the given value, at [`PRECISION`] bits.
//!
//! [`PRECISION`]: crate::primitive::PRECISION

use once_cell::sync::Lazy;
use rug::{float::Constant, Float};
use super::primitive::float;

pub static ONE: Lazy<Float> = Lazy::new(|| float(1));

pub static TWO: Lazy<Float> = Lazy::new(|| float(2));

/// Euler's number.
pub static E: Lazy<Float> = Lazy::new(|| float(1).exp());

pub static PI: Lazy<Float> = Lazy::new(|| float(-1).acos());

/// The Euler-Mascheroni constant.
pub static EULER_GAMMA: Lazy<Float> = Lazy::new(|| float(Constant::Euler));
