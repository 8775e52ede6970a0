//! Symbolic differentiation, and the deferred [`Node::Derivative`] and [`Node::Subs`] nodes.
//!
//! Most expressions differentiate to a closed form. An undefined function such as `f(x)` does
//! not, so its derivative is the node `Derivative(f(x), x)`. Such a node is only meaningful when
//! every differentiation variable appears as a whole argument of the function, so the chain rule
//! through a compound argument, such as in `f(x^2)`, replaces the argument with a fresh dummy
//! symbol and evaluates the derivative at the original argument afterwards:
//!
//! ```text
//! d/dx f(x^2) = 2*x*Subs(Derivative(f(_x), _x), (_x), (x^2))
//! ```

mod function;

use cas_error::Error;
use crate::error::{not_implemented, NonCanonical, NotASymbol};
use crate::symbolic::arith::{log, mul, pow, product, sub, sum};
use crate::symbolic::expr::{Expr, Node};
use crate::symbolic::functions::{OneArgKind, TwoArgKind};
use crate::symbolic::subs::SubsMap;
use tracing::{debug, trace};

impl Expr {
    /// Differentiates the expression with respect to the symbol `x`.
    ///
    /// Returns [`NotASymbol`] if `x` is not a symbol.
    pub fn diff(&self, x: &Expr) -> Result<Expr, Error> {
        let Some(name) = x.as_symbol() else {
            return Err(Error::new(
                format!("diff({}, {})", self, x),
                NotASymbol { expr: x.to_string() },
            ));
        };
        if !self.has_symbol(name) {
            return Ok(Expr::zero());
        }

        match self.node() {
            Node::Number(_) | Node::Constant(_) => Ok(Expr::zero()),
            Node::Symbol(_) => Ok(Expr::one()),
            Node::Add(s) => {
                let terms = s.terms.iter()
                    .map(|(term, coef)| Ok(mul(&Expr::number(coef.clone()), &term.diff(x)?)))
                    .collect::<Result<Vec<_>, Error>>()?;
                Ok(sum(&terms))
            },
            Node::Mul(p) => {
                // (f*g*h)' = f'*g*h + f*g'*h + f*g*h'
                let coef = Expr::number(p.coef.clone());
                let factors = p.factors.iter()
                    .map(|(base, exp)| Expr::pow_raw(base.clone(), exp.clone()))
                    .collect::<Vec<_>>();
                let mut terms = Vec::new();
                for (i, factor) in factors.iter().enumerate() {
                    let d = factor.diff(x)?;
                    if d.is_zero() {
                        continue;
                    }
                    let mut parts = vec![coef.clone(), d];
                    parts.extend(factors.iter().enumerate().filter(|(j, _)| *j != i).map(|(_, f)| f.clone()));
                    terms.push(product(&parts));
                }
                Ok(sum(&terms))
            },
            Node::Pow(base, exp) => {
                if exp.is_number() {
                    // (b^n)' = n*b^(n - 1)*b'
                    let lowered = pow(base, &sub(exp, &Expr::one()))?;
                    Ok(product(&[exp.clone(), lowered, base.diff(x)?]))
                } else {
                    // (b^e)' = b^e*(e*log(b))'
                    let exponent = mul(exp, &log(base)?);
                    Ok(mul(self, &exponent.diff(x)?))
                }
            },
            Node::OneArg(OneArgKind::Abs, _) | Node::FunctionWrapper { .. } => {
                Ok(Expr::derivative_raw(self.clone(), vec![x.clone()]))
            },
            Node::OneArg(kind, arg) => match function::function_derivative(*kind, arg)? {
                Some(outer) => Ok(mul(&outer, &arg.diff(x)?)),
                None => chain_rule(self, x),
            },
            Node::TwoArg(..) | Node::MultiArg(..) | Node::FunctionSymbol { .. } => chain_rule(self, x),
            Node::Derivative { arg, vars } => diff_derivative(self, arg, vars, x),
            Node::Subs { arg, dict } => diff_subs(self, arg, dict, x),
        }
    }

    /// Builds a raw [`Node::Derivative`], sorting the variables. The node must already be
    /// canonical.
    pub(crate) fn derivative_raw(arg: Expr, mut vars: Vec<Expr>) -> Self {
        vars.sort();
        debug_assert!(is_canonical(&arg, &vars), "non-canonical Derivative({}, ...)", arg);
        Self::new(Node::Derivative { arg, vars })
    }
}

/// Returns the arguments of an opaque function application, each paired with whether the
/// derivative in that argument is deferred to a [`Node::Derivative`]. Returns [`None`] for nodes
/// that are not opaque function applications.
fn opaque_args(expr: &Expr) -> Option<Vec<(&Expr, bool)>> {
    match expr.node() {
        Node::FunctionSymbol { args, .. } | Node::MultiArg(_, args) => {
            Some(args.iter().map(|arg| (arg, true)).collect())
        },
        Node::OneArg(OneArgKind::DirichletEta, arg) => Some(vec![(arg, true)]),
        Node::TwoArg(kind, a, b) => Some(vec![
            (a, !function::has_partial(*kind, 0)),
            (b, !function::has_partial(*kind, 1)),
        ]),
        _ => None,
    }
}

/// Returns true if `expr` does not depend on the symbol `x`.
fn is_independent(expr: &Expr, x: &Expr) -> bool {
    matches!(expr.diff(x), Ok(d) if d.is_zero())
}

/// Returns true if `Derivative(arg, vars)` is a canonical node.
///
/// Every variable must be a symbol. Derivatives of `abs` and of functions defined outside the
/// kernel are always canonical. For any other opaque function application, each variable must
/// appear as exactly one whole argument in a deferred position, and no other argument may depend
/// on it. Nothing else has a canonical `Derivative` node.
pub fn is_canonical(arg: &Expr, vars: &[Expr]) -> bool {
    if vars.is_empty() || !vars.iter().all(Expr::is_symbol) {
        return false;
    }
    if matches!(arg.node(), Node::OneArg(OneArgKind::Abs, _) | Node::FunctionWrapper { .. }) {
        return true;
    }
    let Some(args) = opaque_args(arg) else {
        return false;
    };

    vars.iter().all(|var| {
        let mut found = false;
        for (a, deferred) in &args {
            if *a == var && *deferred && !found {
                found = true;
            } else if !is_independent(a, var) {
                return false;
            }
        }
        found
    })
}

/// Builds the derivative of `arg` with respect to each of `vars` in turn.
///
/// If `Derivative(arg, vars)` is canonical, the node is built. Otherwise, `arg` is
/// differentiated directly. At least one variable is required.
pub fn derivative(arg: &Expr, vars: &[Expr]) -> Result<Expr, Error> {
    if vars.is_empty() {
        return Err(Error::new(
            format!("Derivative({})", arg),
            NonCanonical { node: "Derivative" },
        ));
    }
    if is_canonical(arg, vars) {
        return Ok(Expr::derivative_raw(arg.clone(), vars.to_vec()));
    }
    vars.iter().try_fold(arg.clone(), |acc, var| acc.diff(var))
}

/// Returns a symbol named `_name`, prefixed with as many more underscores as needed to not
/// appear in `expr`.
fn dummy(expr: &Expr, name: &str) -> Expr {
    let mut name = format!("_{}", name);
    while expr.has_symbol(&name) {
        name.insert(0, '_');
    }
    Expr::symbol(name)
}

/// Applies the multivariate chain rule to an opaque function application.
///
/// Each argument that depends on `x` contributes its own derivative, multiplied by the partial
/// derivative of the function in that argument. A partial derivative with no closed form is
/// `Derivative(expr, x)` if that node is canonical, and otherwise the derivative in a fresh dummy
/// symbol, evaluated at the argument through a [`Node::Subs`].
fn chain_rule(expr: &Expr, x: &Expr) -> Result<Expr, Error> {
    let Some(args) = opaque_args(expr) else {
        return Err(not_implemented(format!("diff({}, {})", expr, x), "this derivative"));
    };
    let inner = args.iter()
        .map(|(arg, _)| arg.diff(x))
        .collect::<Result<Vec<_>, Error>>()?;
    let dependent = inner.iter().filter(|d| !d.is_zero()).count();

    let mut terms = Vec::new();
    for (i, ((arg, deferred), d)) in args.iter().zip(&inner).enumerate() {
        if d.is_zero() {
            continue;
        }
        if !deferred {
            let partial = match expr.node() {
                Node::TwoArg(kind, a, b) => function::partial_derivative(*kind, a, b, i)?,
                _ => None,
            };
            if let Some(partial) = partial {
                terms.push(mul(&partial, d));
                continue;
            }
        }
        if *arg == x && is_canonical(expr, std::slice::from_ref(x)) {
            terms.push(Expr::derivative_raw(expr.clone(), vec![x.clone()]));
            continue;
        }

        let name = match expr.node() {
            Node::TwoArg(TwoArgKind::KroneckerDelta, ..) if dependent == 2 => ["x1", "x2"][i],
            _ => "x",
        };
        let s = dummy(expr, name);
        let mut replaced = expr.get_args();
        replaced[i] = s.clone();
        let at_dummy = derivative(&expr.rebuild(&replaced)?, std::slice::from_ref(&s))?;
        let at_arg = subs_node(&at_dummy, &SubsMap::from([(s, (*arg).clone())]))?;
        debug!(%expr, %at_arg, "deferred chain rule");
        terms.push(mul(d, &at_arg));
    }
    Ok(sum(&terms))
}

/// Differentiates `Derivative(arg, vars)` with respect to `x`.
fn diff_derivative(expr: &Expr, arg: &Expr, vars: &[Expr], x: &Expr) -> Result<Expr, Error> {
    let inner = arg.diff(x)?;
    if inner.is_zero() {
        return Ok(inner);
    }

    let extended = || {
        let mut vars = vars.to_vec();
        vars.push(x.clone());
        Expr::derivative_raw(arg.clone(), vars)
    };
    if vars.contains(x) {
        return Ok(extended());
    }
    if matches!(inner.node(), Node::Derivative { arg: inner_arg, .. } if inner_arg == arg) {
        return Ok(extended());
    }

    trace!(%expr, %x, "differentiating derivative in new variable");
    vars.iter().try_fold(inner, |acc, var| acc.diff(var))
}

/// Differentiates `Subs(arg, dict)` with respect to `x`, by the chain rule through each value of
/// `dict`.
fn diff_subs(expr: &Expr, arg: &Expr, dict: &SubsMap, x: &Expr) -> Result<Expr, Error> {
    let mut terms = Vec::new();
    if !dict.contains_key(x) {
        terms.push(arg.diff(x)?.subs(dict)?);
    }
    for (key, value) in dict {
        let d = value.diff(x)?;
        if d.is_zero() {
            continue;
        }
        if !key.is_symbol() {
            return Err(not_implemented(
                format!("diff({}, {})", expr, x),
                "differentiating a substitution for a non-symbol",
            ));
        }
        terms.push(mul(&d, &arg.diff(key)?.subs(dict)?));
    }
    Ok(sum(&terms))
}

/// Builds `arg`, with each key of `dict` replaced by its value.
///
/// The replacement is deferred in a [`Node::Subs`] only if `arg` is a [`Node::Derivative`], and
/// applied directly otherwise. Pairs mapping a key to itself are dropped.
pub fn subs_node(arg: &Expr, dict: &SubsMap) -> Result<Expr, Error> {
    if !matches!(arg.node(), Node::Derivative { .. }) {
        return arg.subs(dict);
    }
    let dict = dict.iter()
        .filter(|(key, value)| key != value)
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect::<SubsMap>();
    if dict.is_empty() {
        return Ok(arg.clone());
    }
    Ok(Expr::new(Node::Subs { arg: arg.clone(), dict }))
}
