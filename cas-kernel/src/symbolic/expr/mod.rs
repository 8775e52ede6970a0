//! The [`Expr`] handle and the [`Node`] variants it can hold.
//!
//! # Equality and ordering
//!
//! Canonical forms are unique, so **structural** equality is also mathematical equality for
//! anything the smart constructors know how to simplify. Equality first compares pointers (many
//! parents share the same child), then the hash cached at construction, and only then the nodes
//! themselves.
//!
//! [`Ord`] is a total structural order: nodes are ordered first by their variant (see
//! [`TypeCode`]), then child by child. It has no mathematical meaning; it exists so that
//! expressions can key the [`BTreeMap`]s inside [`Sum`] and [`Product`], giving every sum and
//! product a single iteration order.

mod display;
mod iter;

pub use iter::ExprIter;

use cas_error::Error;
use crate::number::Number;
use crate::primitive::{int, rational};
use once_cell::sync::Lazy;
use std::{
    cmp::Ordering,
    collections::{hash_map::DefaultHasher, BTreeMap, BTreeSet},
    hash::{Hash, Hasher},
    sync::Arc,
};
use super::arith::{self, add, mul, pow};
use super::derivative::{derivative, subs_node};
use super::functions::{
    function_symbol,
    function_wrapper,
    MultiArgKind,
    OneArgKind,
    Payload,
    TwoArgKind,
};
use super::subs::SubsMap;

static ZERO: Lazy<Expr> = Lazy::new(|| Expr::new(Node::Number(Number::from(0))));
static ONE: Lazy<Expr> = Lazy::new(|| Expr::new(Node::Number(Number::from(1))));
static MINUS_ONE: Lazy<Expr> = Lazy::new(|| Expr::new(Node::Number(Number::from(-1))));
static HALF: Lazy<Expr> = Lazy::new(|| Expr::new(Node::Number(Number::from(rational(1, 2)))));
static PI: Lazy<Expr> = Lazy::new(|| Expr::new(Node::Constant(Constant::Pi)));
static E: Lazy<Expr> = Lazy::new(|| Expr::new(Node::Constant(Constant::E)));
static EULER_GAMMA: Lazy<Expr> = Lazy::new(|| Expr::new(Node::Constant(Constant::EulerGamma)));

/// A named mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Constant {
    /// The ratio of a circle's circumference to its diameter.
    Pi,

    /// Euler's number, the base of the natural logarithm.
    E,

    /// The Euler-Mascheroni constant.
    EulerGamma,
}

impl Constant {
    /// The name of the constant, as displayed.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pi => "pi",
            Self::E => "E",
            Self::EulerGamma => "EulerGamma",
        }
    }
}

/// A flattened sum, `coef + c_1*t_1 + c_2*t_2 + ...`.
///
/// Every term is a non-numeric expression that is not itself a sum, and every coefficient is
/// nonzero. A term that is a [`Node::Mul`] always has a coefficient of exactly `1`; its numeric
/// coefficient is moved into the term's coefficient instead.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sum {
    /// The constant term.
    pub coef: Number,

    /// Each term, mapped to its numeric coefficient.
    pub terms: BTreeMap<Expr, Number>,
}

/// A flattened product, `coef * b_1^e_1 * b_2^e_2 * ...`.
///
/// Every base is distinct and is not itself a product with an integer exponent, and every
/// exponent is nonzero. Numeric bases only appear with a proper fractional exponent, such as
/// `2^(1/2)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Product {
    /// The numeric coefficient.
    pub coef: Number,

    /// Each base, mapped to its exponent.
    pub factors: BTreeMap<Expr, Expr>,
}

/// The contents of an expression node.
///
/// The order of the variants is significant: it is the first key of the structural order of
/// [`Expr`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    /// A number, such as `2`, `1/3`, or `0.5`.
    Number(Number),

    /// A free symbol, such as `x`.
    Symbol(String),

    /// A named constant, such as `pi`.
    Constant(Constant),

    /// A flattened sum.
    Add(Sum),

    /// A flattened product.
    Mul(Product),

    /// A power whose base is not a product or power that could absorb the exponent.
    Pow(Expr, Expr),

    /// A built-in function of one argument, such as `sin(x)`.
    OneArg(OneArgKind, Expr),

    /// A built-in function of two arguments, such as `zeta(s, a)`.
    TwoArg(TwoArgKind, Expr, Expr),

    /// A built-in function of any number of arguments, such as `max(x, y, z)`.
    MultiArg(MultiArgKind, Vec<Expr>),

    /// An undefined function applied to arguments, such as `f(x, y)`.
    FunctionSymbol {
        name: String,
        args: Vec<Expr>,
    },

    /// A function defined outside the kernel, carrying an opaque payload.
    FunctionWrapper {
        name: String,
        args: Vec<Expr>,
        payload: Payload,
    },

    /// The unevaluated derivative of `arg` with respect to each of `vars` in turn. The variables
    /// are symbols, kept sorted.
    Derivative {
        arg: Expr,
        vars: Vec<Expr>,
    },

    /// `arg`, with each key of `dict` replaced by its value after `arg` is evaluated.
    Subs {
        arg: Expr,
        dict: SubsMap,
    },
}

/// Identifies the variant of a [`Node`], including which built-in function it applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeCode {
    Number,
    Symbol,
    Constant,
    Add,
    Mul,
    Pow,
    OneArg(OneArgKind),
    TwoArg(TwoArgKind),
    MultiArg(MultiArgKind),
    FunctionSymbol,
    FunctionWrapper,
    Derivative,
    Subs,
}

struct Inner {
    node: Node,
    hash: u64,
}

/// A handle to an immutable, canonical expression node.
///
/// For more information about this type, see the [module-level documentation](self).
#[derive(Clone)]
pub struct Expr(Arc<Inner>);

impl Expr {
    /// Wraps a node, computing its hash. This does not check that the node is canonical; callers
    /// are the raw constructors of each node type.
    pub(crate) fn new(node: Node) -> Self {
        let mut hasher = DefaultHasher::new();
        node.hash(&mut hasher);
        Self(Arc::new(Inner { hash: hasher.finish(), node }))
    }

    /// Creates a free symbol with the given name.
    pub fn symbol(name: impl Into<String>) -> Self {
        Self::new(Node::Symbol(name.into()))
    }

    /// Creates a number.
    pub fn number(n: impl Into<Number>) -> Self {
        Self::new(Node::Number(n.into()))
    }

    /// Creates an integer.
    pub fn integer(n: i64) -> Self {
        match n {
            0 => Self::zero(),
            1 => Self::one(),
            -1 => Self::minus_one(),
            _ => Self::number(int(n)),
        }
    }

    /// Creates the rational number `num / den`, normalized.
    ///
    /// Panics if `den` is zero.
    pub fn rational(num: i64, den: i64) -> Self {
        Self::number(rational(num, den))
    }

    pub fn zero() -> Self {
        ZERO.clone()
    }

    pub fn one() -> Self {
        ONE.clone()
    }

    pub fn minus_one() -> Self {
        MINUS_ONE.clone()
    }

    /// The rational number `1/2`.
    pub fn half() -> Self {
        HALF.clone()
    }

    pub fn pi() -> Self {
        PI.clone()
    }

    pub fn e() -> Self {
        E.clone()
    }

    pub fn euler_gamma() -> Self {
        EULER_GAMMA.clone()
    }

    /// Builds a raw [`Node::Pow`], or returns `base` if the exponent is exactly one. The power
    /// must already be canonical.
    pub(crate) fn pow_raw(base: Expr, exp: Expr) -> Self {
        if exp.is_one() {
            return base;
        }
        debug_assert!(arith::power::is_canonical(&base, &exp), "non-canonical power {}^{}", base, exp);
        Self::new(Node::Pow(base, exp))
    }

    /// The node this handle points to.
    pub fn node(&self) -> &Node {
        &self.0.node
    }

    /// Returns true if both handles point to the same node in memory.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self.node() {
            Node::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self.node(), Node::Number(_))
    }

    /// Returns the name of the symbol, if this is a [`Node::Symbol`].
    pub fn as_symbol(&self) -> Option<&str> {
        match self.node() {
            Node::Symbol(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self.node(), Node::Symbol(_))
    }

    /// Returns true if this is the exact integer `0`. The float `0.0` is not zero in this sense.
    pub fn is_zero(&self) -> bool {
        matches!(self.as_number(), Some(Number::Integer(n)) if n.is_zero())
    }

    /// Returns true if this is the exact integer `1`.
    pub fn is_one(&self) -> bool {
        matches!(self.as_number(), Some(Number::Integer(n)) if *n == 1)
    }

    /// Returns true if this is the exact integer `-1`.
    pub fn is_minus_one(&self) -> bool {
        matches!(self.as_number(), Some(Number::Integer(n)) if *n == -1)
    }

    /// Returns true if this is an exact integer.
    pub fn is_integer(&self) -> bool {
        matches!(self.as_number(), Some(Number::Integer(_)))
    }

    /// Returns true if this is the constant `pi`.
    pub fn is_pi(&self) -> bool {
        matches!(self.node(), Node::Constant(Constant::Pi))
    }

    /// Returns the type code of this expression.
    pub fn type_code(&self) -> TypeCode {
        match self.node() {
            Node::Number(_) => TypeCode::Number,
            Node::Symbol(_) => TypeCode::Symbol,
            Node::Constant(_) => TypeCode::Constant,
            Node::Add(_) => TypeCode::Add,
            Node::Mul(_) => TypeCode::Mul,
            Node::Pow(..) => TypeCode::Pow,
            Node::OneArg(kind, _) => TypeCode::OneArg(*kind),
            Node::TwoArg(kind, ..) => TypeCode::TwoArg(*kind),
            Node::MultiArg(kind, _) => TypeCode::MultiArg(*kind),
            Node::FunctionSymbol { .. } => TypeCode::FunctionSymbol,
            Node::FunctionWrapper { .. } => TypeCode::FunctionWrapper,
            Node::Derivative { .. } => TypeCode::Derivative,
            Node::Subs { .. } => TypeCode::Subs,
        }
    }

    /// Returns the arguments of the expression, in order. Building the same kind of node from
    /// these arguments with [`Expr::rebuild`] returns an equal expression.
    ///
    /// - A sum returns its constant term (if nonzero), followed by each term multiplied by its
    /// coefficient.
    /// - A product returns its coefficient (if not one), followed by each factor raised to its
    /// exponent.
    /// - A [`Node::Derivative`] returns the differentiated expression, followed by each variable.
    /// - A [`Node::Subs`] returns the wrapped expression, followed by every key, then every value.
    pub fn get_args(&self) -> Vec<Expr> {
        match self.node() {
            Node::Number(_) | Node::Symbol(_) | Node::Constant(_) => Vec::new(),
            Node::Add(sum) => {
                let mut args = Vec::with_capacity(sum.terms.len() + 1);
                if !sum.coef.is_zero() {
                    args.push(Expr::number(sum.coef.clone()));
                }
                args.extend(sum.terms.iter().map(|(term, coef)| {
                    mul(&Expr::number(coef.clone()), term)
                }));
                args
            },
            Node::Mul(product) => {
                let mut args = Vec::with_capacity(product.factors.len() + 1);
                if !matches!(&product.coef, Number::Integer(n) if *n == 1) {
                    args.push(Expr::number(product.coef.clone()));
                }
                args.extend(product.factors.iter().map(|(base, exp)| {
                    Expr::pow_raw(base.clone(), exp.clone())
                }));
                args
            },
            Node::Pow(base, exp) => vec![base.clone(), exp.clone()],
            Node::OneArg(_, arg) => vec![arg.clone()],
            Node::TwoArg(_, a, b) => vec![a.clone(), b.clone()],
            Node::MultiArg(_, args)
                | Node::FunctionSymbol { args, .. }
                | Node::FunctionWrapper { args, .. } => args.clone(),
            Node::Derivative { arg, vars } => {
                let mut args = vec![arg.clone()];
                args.extend(vars.iter().cloned());
                args
            },
            Node::Subs { arg, dict } => {
                let mut args = vec![arg.clone()];
                args.extend(dict.keys().cloned());
                args.extend(dict.values().cloned());
                args
            },
        }
    }

    /// Returns references to the direct children of this node, as stored. Unlike
    /// [`Expr::get_args`], the numeric coefficients of sums and products are not included.
    pub(crate) fn children(&self) -> Vec<&Expr> {
        match self.node() {
            Node::Number(_) | Node::Symbol(_) | Node::Constant(_) => Vec::new(),
            Node::Add(sum) => sum.terms.keys().collect(),
            Node::Mul(product) => product.factors
                .iter()
                .flat_map(|(base, exp)| [base, exp])
                .collect(),
            Node::Pow(base, exp) => vec![base, exp],
            Node::OneArg(_, arg) => vec![arg],
            Node::TwoArg(_, a, b) => vec![a, b],
            Node::MultiArg(_, args)
                | Node::FunctionSymbol { args, .. }
                | Node::FunctionWrapper { args, .. } => args.iter().collect(),
            Node::Derivative { arg, vars } => std::iter::once(arg).chain(vars).collect(),
            Node::Subs { arg, dict } => std::iter::once(arg)
                .chain(dict.keys())
                .chain(dict.values())
                .collect(),
        }
    }

    /// Builds a node of the same kind as this one from new arguments, running its smart
    /// constructor. `args` must be laid out as [`Expr::get_args`] returns them.
    pub fn rebuild(&self, args: &[Expr]) -> Result<Expr, Error> {
        match self.node() {
            Node::Number(_) | Node::Symbol(_) | Node::Constant(_) => Ok(self.clone()),
            Node::Add(_) => Ok(arith::sum(args)),
            Node::Mul(_) => Ok(arith::product(args)),
            Node::Pow(..) => pow(&args[0], &args[1]),
            Node::OneArg(kind, _) => kind.create(&args[0]),
            Node::TwoArg(kind, ..) => kind.create(&args[0], &args[1]),
            Node::MultiArg(kind, _) => kind.create(args.to_vec()),
            Node::FunctionSymbol { name, .. } => Ok(function_symbol(name.clone(), args.to_vec())),
            Node::FunctionWrapper { name, payload, .. } => {
                Ok(function_wrapper(name.clone(), args.to_vec(), payload.clone()))
            },
            Node::Derivative { .. } => derivative(&args[0], &args[1..]),
            Node::Subs { dict, .. } => {
                let n = dict.len();
                let dict = args[1..=n].iter()
                    .cloned()
                    .zip(args[n + 1..].iter().cloned())
                    .collect();
                subs_node(&args[0], &dict)
            },
        }
    }

    /// Returns an iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn post_order_iter(&self) -> ExprIter<'_> {
        ExprIter::new(self)
    }

    /// Returns the set of symbols appearing anywhere in the expression.
    pub fn free_symbols(&self) -> BTreeSet<Expr> {
        self.post_order_iter()
            .filter(|expr| expr.is_symbol())
            .cloned()
            .collect()
    }

    /// Returns true if a symbol with the given name appears anywhere in the expression.
    pub fn has_symbol(&self, name: &str) -> bool {
        self.post_order_iter().any(|expr| expr.as_symbol() == Some(name))
    }

    /// Returns true if the expression contains no symbols.
    pub fn is_constant(&self) -> bool {
        !self.post_order_iter().any(|expr| expr.is_symbol())
    }
}

impl Hash for Expr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.hash);
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || (self.0.hash == other.0.hash && self.node() == other.node())
    }
}

impl Eq for Expr {}

impl Ord for Expr {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.ptr_eq(other) {
            return Ordering::Equal;
        }
        self.node().cmp(other.node())
    }
}

impl PartialOrd for Expr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl From<Number> for Expr {
    fn from(n: Number) -> Self {
        Self::number(n)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

/// Implements an arithmetic operator for every combination of owned and borrowed [`Expr`]s,
/// through a total smart constructor.
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $func:path) => {
        impl std::ops::$trait<&Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $func(self, rhs)
            }
        }

        impl std::ops::$trait<Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $func(&self, &rhs)
            }
        }

        impl std::ops::$trait<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                $func(&self, rhs)
            }
        }

        impl std::ops::$trait<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                $func(self, &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add);
impl_binary_op!(Sub, sub, arith::sub);
impl_binary_op!(Mul, mul, mul);

impl std::ops::Neg for &Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        arith::neg(self)
    }
}

impl std::ops::Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        arith::neg(&self)
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::arith::pow;
    use crate::symbolic::functions::{function_symbol, sin};
    use pretty_assertions::assert_eq;
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    fn y() -> Expr {
        Expr::symbol("y")
    }

    #[test]
    fn shared_singletons() {
        assert!(Expr::zero().ptr_eq(&Expr::integer(0)));
        assert!(Expr::pi().ptr_eq(&Expr::pi()));
    }

    #[test]
    fn structural_equality() {
        let a = &x() + &y();
        let b = &y() + &x();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn type_code_order() {
        let mut exprs = vec![sin(&x()).unwrap(), x() * y(), Expr::integer(3), x()];
        exprs.sort();
        assert_eq!(exprs, vec![Expr::integer(3), x(), x() * y(), sin(&x()).unwrap()]);
        assert!(TypeCode::Number < TypeCode::OneArg(OneArgKind::Sin));
    }

    #[test]
    fn sum_args() {
        let expr = &(&Expr::integer(2) * &x()) + &Expr::integer(3);
        assert_eq!(expr.get_args(), vec![Expr::integer(3), &Expr::integer(2) * &x()]);
    }

    #[test]
    fn product_args() {
        let x_squared = pow(&x(), &Expr::integer(2)).unwrap();
        let expr = &Expr::integer(5) * &(&x_squared * &y());
        assert_eq!(expr.get_args(), vec![Expr::integer(5), x_squared, y()]);
    }

    #[test]
    fn rebuild_from_args() {
        let f = function_symbol("f", vec![x(), &x() + &y()]);
        let expr = &(&Expr::integer(3) * &f) + &sin(&y()).unwrap();
        for node in expr.post_order_iter() {
            assert_eq!(&node.rebuild(&node.get_args()).unwrap(), node);
        }
    }

    #[test]
    fn symbols() {
        let f = function_symbol("f", vec![x(), sin(&y()).unwrap()]);
        assert_eq!(f.free_symbols().into_iter().collect::<Vec<_>>(), vec![x(), y()]);
        assert!(f.has_symbol("y"));
        assert!(!f.has_symbol("z"));
        assert!(!f.is_constant());
        assert!(sin(&Expr::integer(2)).unwrap().is_constant());
    }
}
