//! Numeric evaluation of elementary and special functions at inexact arguments.
//!
//! Smart constructors never build a symbolic node around an inexact number: `sin(0.5)` is
//! evaluated immediately through the [`Evaluator`] of its argument. Real arguments are evaluated
//! with [`Float`] arithmetic, falling back to [`Complex`] arithmetic if the result leaves the real
//! domain (as in `asin(2.0)` or `log(-1.0)`).

use crate::consts::{ONE, TWO};
use crate::error::{complex_infinity, not_implemented};
use crate::primitive::{complex, float, PRECISION};
use cas_error::Error;
use rug::{ops::Pow, Complex, Float};
use super::Number;

/// The evaluator for real inexact numbers.
pub static REAL: RealEvaluator = RealEvaluator;

/// The evaluator for complex inexact numbers.
pub static COMPLEX: ComplexEvaluator = ComplexEvaluator;

/// Evaluates elementary and special functions at inexact arguments.
///
/// There is one method per function that the kernel knows how to simplify. Every method returns a
/// finite [`Number`], or an error if the function has a pole at the argument or cannot be
/// evaluated numerically.
pub trait Evaluator: Sync {
    fn sin(&self, x: &Number) -> Result<Number, Error>;
    fn cos(&self, x: &Number) -> Result<Number, Error>;
    fn tan(&self, x: &Number) -> Result<Number, Error>;
    fn cot(&self, x: &Number) -> Result<Number, Error>;
    fn csc(&self, x: &Number) -> Result<Number, Error>;
    fn sec(&self, x: &Number) -> Result<Number, Error>;
    fn asin(&self, x: &Number) -> Result<Number, Error>;
    fn acos(&self, x: &Number) -> Result<Number, Error>;
    fn atan(&self, x: &Number) -> Result<Number, Error>;
    fn acot(&self, x: &Number) -> Result<Number, Error>;
    fn asec(&self, x: &Number) -> Result<Number, Error>;
    fn acsc(&self, x: &Number) -> Result<Number, Error>;
    fn sinh(&self, x: &Number) -> Result<Number, Error>;
    fn cosh(&self, x: &Number) -> Result<Number, Error>;
    fn tanh(&self, x: &Number) -> Result<Number, Error>;
    fn coth(&self, x: &Number) -> Result<Number, Error>;
    fn asinh(&self, x: &Number) -> Result<Number, Error>;
    fn acosh(&self, x: &Number) -> Result<Number, Error>;
    fn atanh(&self, x: &Number) -> Result<Number, Error>;
    fn acoth(&self, x: &Number) -> Result<Number, Error>;
    fn asech(&self, x: &Number) -> Result<Number, Error>;
    fn log(&self, x: &Number) -> Result<Number, Error>;
    fn exp(&self, x: &Number) -> Result<Number, Error>;
    fn abs(&self, x: &Number) -> Result<Number, Error>;
    fn gamma(&self, x: &Number) -> Result<Number, Error>;
    fn zeta(&self, s: &Number) -> Result<Number, Error>;
    fn dirichlet_eta(&self, s: &Number) -> Result<Number, Error>;
    fn lambertw(&self, x: &Number) -> Result<Number, Error>;

    /// The four-quadrant inverse tangent of `y / x`.
    fn atan2(&self, y: &Number, x: &Number) -> Result<Number, Error>;

    /// The `n`th derivative of the digamma function at `x`.
    fn polygamma(&self, n: &Number, x: &Number) -> Result<Number, Error>;
}

/// Evaluates a function with a real implementation, retrying with the complex implementation if
/// the real result is `NaN`.
fn real_or_complex(
    name: &str,
    x: &Number,
    real: impl FnOnce(Float) -> Float,
    cplx: impl FnOnce(Complex) -> Complex,
) -> Result<Number, Error> {
    let result = real(x.to_float());
    if result.is_nan() {
        return complex_result(name, x, cplx(x.to_complex()));
    }
    Number::Float(result).finite(|| format!("{}({})", name, x))
}

/// Checks the result of a complex evaluation.
fn complex_result(name: &str, x: &Number, result: Complex) -> Result<Number, Error> {
    if result.real().is_nan() || result.imag().is_nan() {
        return Err(complex_infinity(format!("{}({})", name, x)));
    }
    Number::from_complex(result).finite(|| format!("{}({})", name, x))
}

/// Build methods that evaluate with [`Float`] arithmetic, falling back to [`Complex`] arithmetic.
macro_rules! build_real {
    ($($name:ident; $real:expr, $complex:expr),* $(,)?) => {
        $(
            fn $name(&self, x: &Number) -> Result<Number, Error> {
                real_or_complex(stringify!($name), x, $real, $complex)
            }
        )*
    };
}

/// Build methods that evaluate with [`Complex`] arithmetic.
macro_rules! build_complex {
    ($($name:ident; $complex:expr),* $(,)?) => {
        $(
            fn $name(&self, x: &Number) -> Result<Number, Error> {
                // NOTE: the closure call is contained within the macro, so we allow
                // the clippy::redundant_closure_call lint
                #[allow(clippy::redundant_closure_call)]
                complex_result(stringify!($name), x, ($complex)(x.to_complex()))
            }
        )*
    };
}

/// Evaluates functions at real [`Float`] arguments.
#[derive(Debug)]
pub struct RealEvaluator;

impl Evaluator for RealEvaluator {
    build_real! {
        sin; Float::sin, Complex::sin,
        cos; Float::cos, Complex::cos,
        tan; Float::tan, Complex::tan,
        cot; Float::cot, |n: Complex| n.tan().recip(),
        csc; Float::csc, |n: Complex| n.sin().recip(),
        sec; Float::sec, |n: Complex| n.cos().recip(),
        asin; Float::asin, Complex::asin,
        acos; Float::acos, Complex::acos,
        atan; Float::atan, Complex::atan,
        acot; |n: Float| n.recip().atan(), |n: Complex| n.recip().atan(),
        asec; |n: Float| n.recip().acos(), |n: Complex| n.recip().acos(),
        acsc; |n: Float| n.recip().asin(), |n: Complex| n.recip().asin(),
        sinh; Float::sinh, Complex::sinh,
        cosh; Float::cosh, Complex::cosh,
        tanh; Float::tanh, Complex::tanh,
        coth; Float::coth, |n: Complex| n.tanh().recip(),
        asinh; Float::asinh, Complex::asinh,
        acosh; Float::acosh, Complex::acosh,
        atanh; Float::atanh, Complex::atanh,
        acoth; |n: Float| n.recip().atanh(), |n: Complex| n.recip().atanh(),
        asech; |n: Float| n.recip().acosh(), |n: Complex| n.recip().acosh(),
        log; Float::ln, Complex::ln,
        exp; Float::exp, Complex::exp,
    }

    fn abs(&self, x: &Number) -> Result<Number, Error> {
        Ok(x.abs())
    }

    fn gamma(&self, x: &Number) -> Result<Number, Error> {
        Number::Float(x.to_float().gamma()).finite(|| format!("gamma({})", x))
    }

    fn zeta(&self, s: &Number) -> Result<Number, Error> {
        Number::Float(s.to_float().zeta()).finite(|| format!("zeta({})", s))
    }

    fn dirichlet_eta(&self, s: &Number) -> Result<Number, Error> {
        let s = s.to_float();
        if s == 1 {
            return Ok(Number::Float(TWO.clone().ln()));
        }
        // eta(s) = (1 - 2^(1 - s)) * zeta(s)
        let factor = float(&*ONE - TWO.clone().pow(float(&*ONE - &s)));
        Number::Float(factor * s.clone().zeta()).finite(|| format!("dirichlet_eta({})", s))
    }

    fn lambertw(&self, x: &Number) -> Result<Number, Error> {
        let x = x.to_float();
        let branch_point = float(-1) / crate::consts::E.clone();
        if x < branch_point {
            return Err(not_implemented(
                format!("lambertw({})", x.to_f64()),
                "the complex branches of the Lambert W function",
            ));
        }

        // Newton's method on w * e^w - x, starting from log(1 + x)
        let mut w = float(&*ONE + &x).ln();
        let tolerance = float(1) >> (PRECISION - 16);
        for _ in 0..200 {
            let ew = w.clone().exp();
            let f = float(&w * &ew) - &x;
            let df = ew * float(&w + &*ONE);
            if df.is_zero() {
                break;
            }
            let step = f / df;
            w -= &step;
            if step.abs() < tolerance {
                break;
            }
        }
        Number::Float(w).finite(|| format!("lambertw({})", x.to_f64()))
    }

    fn atan2(&self, y: &Number, x: &Number) -> Result<Number, Error> {
        if let (Number::Complex(_), _) | (_, Number::Complex(_)) = (y, x) {
            return COMPLEX.atan2(y, x);
        }
        Number::Float(y.to_float().atan2(&x.to_float()))
            .finite(|| format!("atan2({}, {})", y, x))
    }

    fn polygamma(&self, n: &Number, x: &Number) -> Result<Number, Error> {
        if n.is_zero() {
            return Number::Float(x.to_float().digamma()).finite(|| format!("polygamma(0, {})", x));
        }
        Err(not_implemented(
            format!("polygamma({}, {})", n, x),
            "numeric evaluation of polygamma of nonzero order",
        ))
    }
}

/// Evaluates functions at [`Complex`] arguments.
#[derive(Debug)]
pub struct ComplexEvaluator;

impl Evaluator for ComplexEvaluator {
    build_complex! {
        sin; Complex::sin,
        cos; Complex::cos,
        tan; Complex::tan,
        cot; |n: Complex| n.tan().recip(),
        csc; |n: Complex| n.sin().recip(),
        sec; |n: Complex| n.cos().recip(),
        asin; Complex::asin,
        acos; Complex::acos,
        atan; Complex::atan,
        acot; |n: Complex| n.recip().atan(),
        asec; |n: Complex| n.recip().acos(),
        acsc; |n: Complex| n.recip().asin(),
        sinh; Complex::sinh,
        cosh; Complex::cosh,
        tanh; Complex::tanh,
        coth; |n: Complex| n.tanh().recip(),
        asinh; Complex::asinh,
        acosh; Complex::acosh,
        atanh; Complex::atanh,
        acoth; |n: Complex| n.recip().atanh(),
        asech; |n: Complex| n.recip().acosh(),
        log; Complex::ln,
        exp; Complex::exp,
    }

    fn abs(&self, x: &Number) -> Result<Number, Error> {
        Ok(x.abs())
    }

    fn gamma(&self, x: &Number) -> Result<Number, Error> {
        Err(not_implemented(format!("gamma({})", x), "the complex gamma function"))
    }

    fn zeta(&self, s: &Number) -> Result<Number, Error> {
        Err(not_implemented(format!("zeta({})", s), "the complex zeta function"))
    }

    fn dirichlet_eta(&self, s: &Number) -> Result<Number, Error> {
        Err(not_implemented(format!("dirichlet_eta({})", s), "the complex Dirichlet eta function"))
    }

    fn lambertw(&self, x: &Number) -> Result<Number, Error> {
        Err(not_implemented(
            format!("lambertw({})", x),
            "the complex branches of the Lambert W function",
        ))
    }

    fn atan2(&self, y: &Number, x: &Number) -> Result<Number, Error> {
        Err(not_implemented(format!("atan2({}, {})", y, x), "atan2 of complex numbers"))
    }

    fn polygamma(&self, n: &Number, x: &Number) -> Result<Number, Error> {
        Err(not_implemented(format!("polygamma({}, {})", n, x), "the complex polygamma function"))
    }
}
