//! Built-in elementary and special functions.
//!
//! Every built-in function is a variant of [`OneArgKind`], [`TwoArgKind`], or [`MultiArgKind`],
//! depending on how many arguments it takes. Each variant has a `reduce` step, which returns the
//! simplified form of the function at the given arguments, or [`None`] if there is nothing to
//! simplify. The smart constructor (`create`) and the canonicality check (`is_canonical`) are both
//! derived from `reduce`, so a node is canonical exactly when its constructor would have built it.
//!
//! Functions without a closed form are represented by [`function_symbol`] (an undefined function
//! such as `f(x)`), or by [`function_wrapper`] (a function defined outside the kernel).

pub mod gamma;
pub mod hyperbolic;
pub mod misc;
pub mod pi_shift;
pub(crate) mod table;
pub mod trig;
pub mod wrapper;
pub mod zeta;

pub use wrapper::{function_symbol, function_wrapper, Payload, WrapperPayload};

use cas_error::Error;
use crate::number::{Evaluator, Number};
use crate::symbolic::arith::power::reduce_log;
use crate::symbolic::expr::{Expr, Node};

/// A built-in function of one argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OneArgKind {
    Log,
    Sin,
    Cos,
    Tan,
    Cot,
    Csc,
    Sec,
    ASin,
    ACos,
    ATan,
    ACot,
    ASec,
    ACsc,
    Sinh,
    Cosh,
    Tanh,
    Coth,
    ASinh,
    ACosh,
    ATanh,
    ACoth,
    ASech,
    Gamma,
    LambertW,
    DirichletEta,
    Abs,
}

impl OneArgKind {
    /// The name of the function, as displayed.
    pub fn name(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Cot => "cot",
            Self::Csc => "csc",
            Self::Sec => "sec",
            Self::ASin => "asin",
            Self::ACos => "acos",
            Self::ATan => "atan",
            Self::ACot => "acot",
            Self::ASec => "asec",
            Self::ACsc => "acsc",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Coth => "coth",
            Self::ASinh => "asinh",
            Self::ACosh => "acosh",
            Self::ATanh => "atanh",
            Self::ACoth => "acoth",
            Self::ASech => "asech",
            Self::Gamma => "gamma",
            Self::LambertW => "lambertw",
            Self::DirichletEta => "dirichlet_eta",
            Self::Abs => "abs",
        }
    }

    /// Simplifies the function at the given argument, returning [`None`] if the raw node is
    /// already canonical.
    pub(crate) fn reduce(self, arg: &Expr) -> Result<Option<Expr>, Error> {
        match self {
            Self::Log => reduce_log(arg),
            Self::Sin | Self::Cos | Self::Tan | Self::Cot | Self::Csc | Self::Sec => {
                trig::reduce_circular(self, arg)
            },
            Self::ASin | Self::ACos | Self::ATan | Self::ACot | Self::ASec | Self::ACsc => {
                trig::reduce_inverse(self, arg)
            },
            Self::Sinh | Self::Cosh | Self::Tanh | Self::Coth
                | Self::ASinh | Self::ACosh | Self::ATanh | Self::ACoth | Self::ASech => {
                hyperbolic::reduce(self, arg)
            },
            Self::Gamma => gamma::reduce_gamma(arg),
            Self::LambertW => misc::reduce_lambertw(arg),
            Self::DirichletEta => zeta::reduce_dirichlet_eta(arg),
            Self::Abs => misc::reduce_abs(arg),
        }
    }

    /// Builds the function at the given argument, simplifying it if possible.
    pub fn create(self, arg: &Expr) -> Result<Expr, Error> {
        Ok(match self.reduce(arg)? {
            Some(expr) => expr,
            None => Expr::one_arg(self, arg.clone()),
        })
    }

    /// Returns true if the raw node `self(arg)` is canonical.
    pub fn is_canonical(self, arg: &Expr) -> bool {
        matches!(self.reduce(arg), Ok(None))
    }

    /// Evaluates the function at a number, with the given evaluator.
    pub fn evaluate(self, eval: &dyn Evaluator, x: &Number) -> Result<Number, Error> {
        match self {
            Self::Log => eval.log(x),
            Self::Sin => eval.sin(x),
            Self::Cos => eval.cos(x),
            Self::Tan => eval.tan(x),
            Self::Cot => eval.cot(x),
            Self::Csc => eval.csc(x),
            Self::Sec => eval.sec(x),
            Self::ASin => eval.asin(x),
            Self::ACos => eval.acos(x),
            Self::ATan => eval.atan(x),
            Self::ACot => eval.acot(x),
            Self::ASec => eval.asec(x),
            Self::ACsc => eval.acsc(x),
            Self::Sinh => eval.sinh(x),
            Self::Cosh => eval.cosh(x),
            Self::Tanh => eval.tanh(x),
            Self::Coth => eval.coth(x),
            Self::ASinh => eval.asinh(x),
            Self::ACosh => eval.acosh(x),
            Self::ATanh => eval.atanh(x),
            Self::ACoth => eval.acoth(x),
            Self::ASech => eval.asech(x),
            Self::Gamma => eval.gamma(x),
            Self::LambertW => eval.lambertw(x),
            Self::DirichletEta => eval.dirichlet_eta(x),
            Self::Abs => eval.abs(x),
        }
    }

    /// If `arg` is an inexact number, evaluates the function at it.
    pub(crate) fn evaluate_inexact(self, arg: &Expr) -> Result<Option<Expr>, Error> {
        let Some(n) = arg.as_number() else {
            return Ok(None);
        };
        match n.get_eval() {
            Some(eval) => self.evaluate(eval, n).map(|value| Some(Expr::number(value))),
            None => Ok(None),
        }
    }
}

/// A built-in function of two arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TwoArgKind {
    ATan2,
    Zeta,
    KroneckerDelta,
    LowerGamma,
    UpperGamma,
    Beta,
    PolyGamma,
}

impl TwoArgKind {
    /// The name of the function, as displayed.
    pub fn name(self) -> &'static str {
        match self {
            Self::ATan2 => "atan2",
            Self::Zeta => "zeta",
            Self::KroneckerDelta => "kroneckerdelta",
            Self::LowerGamma => "lowergamma",
            Self::UpperGamma => "uppergamma",
            Self::Beta => "beta",
            Self::PolyGamma => "polygamma",
        }
    }

    /// Simplifies the function at the given arguments, returning [`None`] if the raw node is
    /// already canonical.
    pub(crate) fn reduce(self, a: &Expr, b: &Expr) -> Result<Option<Expr>, Error> {
        match self {
            Self::ATan2 => trig::reduce_atan2(a, b),
            Self::Zeta => zeta::reduce_zeta(a, b),
            Self::KroneckerDelta => misc::reduce_kronecker_delta(a, b),
            Self::LowerGamma => gamma::reduce_incomplete_gamma(self, a, b),
            Self::UpperGamma => gamma::reduce_incomplete_gamma(self, a, b),
            Self::Beta => gamma::reduce_beta(a, b),
            Self::PolyGamma => gamma::reduce_polygamma(a, b),
        }
    }

    /// Builds the function at the given arguments, simplifying it if possible.
    pub fn create(self, a: &Expr, b: &Expr) -> Result<Expr, Error> {
        Ok(match self.reduce(a, b)? {
            Some(expr) => expr,
            None => Expr::two_arg(self, a.clone(), b.clone()),
        })
    }

    /// Returns true if the raw node `self(a, b)` is canonical.
    pub fn is_canonical(self, a: &Expr, b: &Expr) -> bool {
        matches!(self.reduce(a, b), Ok(None))
    }
}

/// A built-in function of any number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MultiArgKind {
    LeviCivita,
    Max,
    Min,
}

impl MultiArgKind {
    /// The name of the function, as displayed.
    pub fn name(self) -> &'static str {
        match self {
            Self::LeviCivita => "levicivita",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    /// Simplifies the function at the given arguments, returning [`None`] if the raw node is
    /// already canonical.
    pub(crate) fn reduce(self, args: &[Expr]) -> Result<Option<Expr>, Error> {
        match self {
            Self::LeviCivita => misc::reduce_levi_civita(args),
            Self::Max | Self::Min => misc::reduce_extremum(self, args),
        }
    }

    /// Builds the function at the given arguments, simplifying it if possible.
    pub fn create(self, args: Vec<Expr>) -> Result<Expr, Error> {
        Ok(match self.reduce(&args)? {
            Some(expr) => expr,
            None => Expr::multi_arg(self, args),
        })
    }

    /// Returns true if the raw node `self(args)` is canonical.
    pub fn is_canonical(self, args: &[Expr]) -> bool {
        matches!(self.reduce(args), Ok(None))
    }
}

impl Expr {
    /// Builds a raw one-argument function node, which must already be canonical.
    pub(crate) fn one_arg(kind: OneArgKind, arg: Expr) -> Self {
        debug_assert!(kind.is_canonical(&arg), "non-canonical {}({})", kind.name(), arg);
        Self::new(Node::OneArg(kind, arg))
    }

    /// Builds a raw two-argument function node, which must already be canonical.
    pub(crate) fn two_arg(kind: TwoArgKind, a: Expr, b: Expr) -> Self {
        debug_assert!(kind.is_canonical(&a, &b), "non-canonical {}({}, {})", kind.name(), a, b);
        Self::new(Node::TwoArg(kind, a, b))
    }

    /// Builds a raw multi-argument function node, which must already be canonical.
    pub(crate) fn multi_arg(kind: MultiArgKind, args: Vec<Expr>) -> Self {
        debug_assert!(kind.is_canonical(&args), "non-canonical {} node", kind.name());
        Self::new(Node::MultiArg(kind, args))
    }
}

/// Build the public smart constructor of each one-argument function.
macro_rules! one_arg_functions {
    ($($(#[$attr:meta])* $name:ident => $kind:ident),* $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $name(arg: &Expr) -> Result<Expr, Error> {
                OneArgKind::$kind.create(arg)
            }
        )*
    };
}

/// Build the public smart constructor of each two-argument function.
macro_rules! two_arg_functions {
    ($($(#[$attr:meta])* $name:ident($a:ident, $b:ident) => $kind:ident),* $(,)?) => {
        $(
            $(#[$attr])*
            pub fn $name($a: &Expr, $b: &Expr) -> Result<Expr, Error> {
                TwoArgKind::$kind.create($a, $b)
            }
        )*
    };
}

one_arg_functions! {
    sin => Sin,
    cos => Cos,
    tan => Tan,
    cot => Cot,
    csc => Csc,
    sec => Sec,
    asin => ASin,
    acos => ACos,
    atan => ATan,
    acot => ACot,
    asec => ASec,
    acsc => ACsc,
    sinh => Sinh,
    cosh => Cosh,
    tanh => Tanh,
    coth => Coth,
    asinh => ASinh,
    acosh => ACosh,
    atanh => ATanh,
    acoth => ACoth,
    asech => ASech,
    /// The gamma function, `gamma(n) = (n - 1)!` for positive integers.
    gamma => Gamma,
    /// The principal branch of the Lambert W function, the inverse of `w*E^w`.
    lambertw => LambertW,
    /// The Dirichlet eta function, `(1 - 2^(1 - s)) * zeta(s)`.
    dirichlet_eta => DirichletEta,
    abs => Abs,
}

two_arg_functions! {
    /// The angle of the point `(den, num)` from the positive x-axis.
    atan2(num, den) => ATan2,
    /// The Hurwitz zeta function.
    zeta_hurwitz(s, a) => Zeta,
    kronecker_delta(i, j) => KroneckerDelta,
    /// The lower incomplete gamma function.
    lowergamma(s, x) => LowerGamma,
    /// The upper incomplete gamma function.
    uppergamma(s, x) => UpperGamma,
    /// The beta function, `gamma(x)*gamma(y)/gamma(x + y)`.
    beta(x, y) => Beta,
    /// The polygamma function, the `n + 1`-th derivative of `log(gamma(x))`.
    polygamma(n, x) => PolyGamma,
}

/// The Riemann zeta function, `zeta(s, 1)`.
pub fn zeta(s: &Expr) -> Result<Expr, Error> {
    TwoArgKind::Zeta.create(s, &Expr::one())
}

/// The Levi-Civita symbol of the given indices.
pub fn levi_civita(args: Vec<Expr>) -> Result<Expr, Error> {
    MultiArgKind::LeviCivita.create(args)
}

/// The largest of the given expressions.
pub fn max(args: Vec<Expr>) -> Result<Expr, Error> {
    MultiArgKind::Max.create(args)
}

/// The smallest of the given expressions.
pub fn min(args: Vec<Expr>) -> Result<Expr, Error> {
    MultiArgKind::Min.create(args)
}
