//! The Lambert W function, absolute values, the Kronecker delta, the Levi-Civita symbol, and the
//! `max` and `min` functions.

use cas_error::Error;
use crate::error::{EmptyArguments, Incomparable};
use crate::number::Number;
use crate::primitive::factorial;
use crate::symbolic::arith::{div, expand, log, mul, neg, sub};
use crate::symbolic::expr::{Expr, Node};
use rug::Integer;
use std::{cmp::Ordering, collections::BTreeSet};
use tracing::trace;
use super::{MultiArgKind, OneArgKind, TwoArgKind};

/// Simplifies `lambertw(arg)`.
pub(crate) fn reduce_lambertw(arg: &Expr) -> Result<Option<Expr>, Error> {
    if arg.is_zero() {
        return Ok(Some(Expr::zero()));
    }
    if *arg == Expr::e() {
        return Ok(Some(Expr::one()));
    }
    if *arg == div(&Expr::minus_one(), &Expr::e())? {
        return Ok(Some(Expr::minus_one()));
    }

    // lambertw(-log(2)/2) = log(1/2)
    let log2 = log(&Expr::integer(2))?;
    if *arg == mul(&Expr::rational(-1, 2), &log2) {
        return Ok(Some(neg(&log2)));
    }
    OneArgKind::LambertW.evaluate_inexact(arg)
}

/// Simplifies `abs(arg)`. Only numbers are simplified.
pub(crate) fn reduce_abs(arg: &Expr) -> Result<Option<Expr>, Error> {
    match arg.as_number() {
        Some(n) if n.is_exact() => Ok(Some(Expr::number(n.abs()))),
        _ => OneArgKind::Abs.evaluate_inexact(arg),
    }
}

/// Simplifies `kroneckerdelta(i, j)`. The arguments of a canonical node are ordered so that
/// `i <= j`.
pub(crate) fn reduce_kronecker_delta(i: &Expr, j: &Expr) -> Result<Option<Expr>, Error> {
    // expansion catches differences such as i - (i + 1)
    let difference = expand(&sub(i, j))?;
    match difference.as_number() {
        Some(n) if n.is_zero() => return Ok(Some(Expr::one())),
        Some(_) => return Ok(Some(Expr::zero())),
        None => (),
    }

    if i > j {
        return TwoArgKind::KroneckerDelta.create(j, i).map(Some);
    }
    Ok(None)
}

/// Simplifies `levicivita(args)`.
pub(crate) fn reduce_levi_civita(args: &[Expr]) -> Result<Option<Expr>, Error> {
    if args.iter().all(Expr::is_number) {
        // prod(a_j - a_i, i < j) / prod(i!)
        let mut value = Expr::one();
        let mut norm = Integer::from(1);
        for (i, a) in args.iter().enumerate() {
            for b in &args[i + 1..] {
                value = mul(&value, &sub(b, a));
            }
            norm *= factorial(i as u32);
        }
        return div(&value, &Expr::number(norm)).map(Some);
    }

    let distinct = args.iter().collect::<BTreeSet<_>>();
    if distinct.len() < args.len() {
        return Ok(Some(Expr::zero()));
    }
    Ok(None)
}

/// The displayed form of `kind(args)`, for error reports.
fn call_text(kind: MultiArgKind, args: &[Expr]) -> String {
    let args = args.iter().map(ToString::to_string).collect::<Vec<_>>();
    format!("{}({})", kind.name(), args.join(", "))
}

/// Returns whichever of the two numbers `kind` selects. On a tie, an inexact candidate replaces
/// an exact current value.
fn pick(
    kind: MultiArgKind,
    current: Number,
    candidate: &Number,
    text: impl Fn() -> String,
) -> Result<Number, Error> {
    let Some(ordering) = candidate.cmp_value(&current) else {
        return Err(Error::new(text(), Incomparable {
            lhs: current.to_string(),
            rhs: candidate.to_string(),
        }));
    };
    let wanted = match kind {
        MultiArgKind::Max => Ordering::Greater,
        _ => Ordering::Less,
    };
    let replace = ordering == wanted
        || (ordering == Ordering::Equal && current.is_exact() && !candidate.is_exact());
    Ok(if replace { candidate.clone() } else { current })
}

/// Simplifies `max(args)` or `min(args)`, depending on `kind`.
///
/// Nested calls of the same kind are flattened, every numeric argument is merged into one, and
/// the remaining arguments are de-duplicated and sorted.
pub(crate) fn reduce_extremum(kind: MultiArgKind, args: &[Expr]) -> Result<Option<Expr>, Error> {
    let text = || call_text(kind, args);
    if args.is_empty() {
        return Err(Error::new(text(), EmptyArguments { function: kind.name() }));
    }

    let flattened = args.iter().flat_map(|arg| match arg.node() {
        Node::MultiArg(inner, nested) if *inner == kind => nested.iter().collect::<Vec<_>>(),
        _ => vec![arg],
    });

    let mut best: Option<Number> = None;
    let mut rest = BTreeSet::new();
    for arg in flattened {
        let Some(n) = arg.as_number() else {
            rest.insert(arg.clone());
            continue;
        };
        best = Some(match best {
            Some(current) => pick(kind, current, n, text)?,
            None if matches!(n, Number::Complex(_)) => {
                return Err(Error::new(text(), Incomparable {
                    lhs: n.to_string(),
                    rhs: n.to_string(),
                }));
            },
            None => n.clone(),
        });
    }
    if let Some(n) = best {
        rest.insert(Expr::number(n));
    }

    let canonical = rest.into_iter().collect::<Vec<_>>();
    if canonical.len() == 1 {
        return Ok(canonical.into_iter().next());
    }
    if canonical.as_slice() == args {
        return Ok(None);
    }
    trace!(call = %text(), "merged extremum arguments");
    Ok(Some(Expr::multi_arg(kind, canonical)))
}

#[cfg(test)]
mod tests {
    use crate::primitive::{complex, float};
    use crate::symbolic::arith::add;
    use crate::symbolic::functions::{abs, kronecker_delta, lambertw, levi_civita, max, min};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(name: &str) -> Expr {
        Expr::symbol(name)
    }

    #[test]
    fn lambertw_values() {
        assert_eq!(lambertw(&Expr::zero()).unwrap(), Expr::zero());
        assert_eq!(lambertw(&Expr::e()).unwrap(), Expr::one());

        let minus_inv_e = neg(&div(&Expr::one(), &Expr::e()).unwrap());
        assert_eq!(lambertw(&minus_inv_e).unwrap(), Expr::minus_one());

        let log2 = log(&Expr::integer(2)).unwrap();
        let arg = div(&log2, &Expr::integer(-2)).unwrap();
        assert_eq!(lambertw(&arg).unwrap(), log(&Expr::half()).unwrap());
        assert_eq!(lambertw(&sym("x")).unwrap().to_string(), "lambertw(x)");
    }

    #[test]
    fn abs_values() {
        assert_eq!(abs(&Expr::integer(-3)).unwrap(), Expr::integer(3));
        assert_eq!(abs(&Expr::rational(-2, 7)).unwrap(), Expr::rational(2, 7));
        assert_eq!(abs(&Expr::number(float(-1.5))).unwrap(), Expr::number(float(1.5)));
        assert_eq!(abs(&sym("x")).unwrap().to_string(), "abs(x)");
    }

    #[test]
    fn kronecker_values() {
        let i = sym("i");
        assert_eq!(kronecker_delta(&i, &i).unwrap(), Expr::one());
        assert_eq!(kronecker_delta(&i, &add(&i, &Expr::one())).unwrap(), Expr::zero());
        assert_eq!(kronecker_delta(&Expr::one(), &Expr::integer(2)).unwrap(), Expr::zero());

        // 2*(i + 1) - 2*i only cancels once expanded
        let doubled = mul(&Expr::integer(2), &add(&i, &Expr::one()));
        let shifted = mul(&Expr::integer(2), &i);
        assert_eq!(kronecker_delta(&doubled, &shifted).unwrap(), Expr::zero());
    }

    #[test]
    fn kronecker_ordering() {
        let i = sym("i");
        let j = sym("j");
        let a = kronecker_delta(&i, &j).unwrap();
        assert_eq!(a, kronecker_delta(&j, &i).unwrap());
        assert_eq!(a.to_string(), "kroneckerdelta(i, j)");
        assert!(TwoArgKind::KroneckerDelta.is_canonical(&i, &j));
        assert!(!TwoArgKind::KroneckerDelta.is_canonical(&j, &i));
    }

    #[test]
    fn levi_civita_values() {
        let ints = |values: [i64; 3]| values.map(Expr::integer).to_vec();
        assert_eq!(levi_civita(ints([1, 2, 3])).unwrap(), Expr::one());
        assert_eq!(levi_civita(ints([1, 3, 2])).unwrap(), Expr::minus_one());
        assert_eq!(levi_civita(ints([2, 1, 2])).unwrap(), Expr::zero());

        let (i, j) = (sym("i"), sym("j"));
        assert_eq!(levi_civita(vec![i.clone(), j.clone(), i.clone()]).unwrap(), Expr::zero());
        assert_eq!(levi_civita(vec![i, j]).unwrap().to_string(), "levicivita(i, j)");
    }

    #[test]
    fn extremum_merges_numbers() {
        let x = sym("x");
        let args = vec![Expr::one(), Expr::integer(2), x.clone()];
        assert_eq!(max(args.clone()).unwrap().to_string(), "max(2, x)");
        assert_eq!(min(args).unwrap().to_string(), "min(1, x)");
        assert_eq!(max(vec![Expr::integer(3), Expr::rational(7, 2)]).unwrap(), Expr::rational(7, 2));
    }

    #[test]
    fn extremum_flattens_and_dedups() {
        let (x, y) = (sym("x"), sym("y"));
        let inner = max(vec![x.clone(), Expr::one()]).unwrap();
        let outer = max(vec![inner, Expr::integer(3), y.clone(), x.clone()]).unwrap();
        assert_eq!(outer.to_string(), "max(3, x, y)");
        assert_eq!(max(vec![x.clone(), x.clone()]).unwrap(), x);

        assert_eq!(max(vec![y.clone(), x.clone()]).unwrap(), max(vec![x.clone(), y.clone()]).unwrap());
        assert!(MultiArgKind::Max.is_canonical(&[x.clone(), y.clone()]));
        assert!(!MultiArgKind::Max.is_canonical(&[y, x]));
    }

    #[test]
    fn extremum_prefers_inexact_on_tie() {
        let inexact = Expr::number(float(1));
        assert_eq!(min(vec![Expr::one(), inexact.clone()]).unwrap(), inexact);
        assert_eq!(min(vec![inexact.clone(), Expr::one()]).unwrap(), inexact);
    }

    #[test]
    fn extremum_errors() {
        assert!(max(Vec::new()).unwrap_err().is::<EmptyArguments>());
        let i = Expr::number(complex((0, 1)));
        assert!(max(vec![i.clone(), Expr::one()]).unwrap_err().is::<Incomparable>());
        assert!(min(vec![i]).unwrap_err().is::<Incomparable>());
        assert_eq!(max(vec![Expr::one()]).unwrap(), Expr::one());
    }
}
