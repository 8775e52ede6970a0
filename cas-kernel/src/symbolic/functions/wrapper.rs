//! Undefined functions, and functions defined outside the kernel.

use crate::symbolic::expr::{Expr, Node};
use std::{any::Any, cmp::Ordering, fmt, hash::{Hash, Hasher}, sync::Arc};

/// Data owned by a function defined outside the kernel.
///
/// The kernel never inspects the payload. It is compared and hashed only to give
/// [`Node::FunctionWrapper`] nodes a total order, and it is dropped exactly once, when the last
/// expression referencing it is dropped.
pub trait WrapperPayload: fmt::Debug + Send + Sync + 'static {
    /// Returns the payload as [`Any`], so that implementations of [`WrapperPayload::compare`]
    /// can downcast the other payload.
    fn as_any(&self) -> &dyn Any;

    /// Compares this payload with the payload of another wrapper with the same name and
    /// arguments.
    fn compare(&self, other: &dyn WrapperPayload) -> Ordering;

    /// Feeds the payload into a hasher. Payloads that compare equal must hash equally.
    fn hash_payload(&self, state: &mut dyn Hasher);
}

/// A shared handle to a [`WrapperPayload`].
#[derive(Clone)]
pub struct Payload(Arc<dyn WrapperPayload>);

impl Payload {
    pub fn new(payload: impl WrapperPayload) -> Self {
        Self(Arc::new(payload))
    }

    /// Returns a reference to the payload.
    pub fn get(&self) -> &dyn WrapperPayload {
        self.0.as_ref()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl PartialEq for Payload {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Payload {}

impl Ord for Payload {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal;
        }
        self.0.compare(other.get())
    }
}

impl PartialOrd for Payload {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Hash for Payload {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash_payload(state);
    }
}

/// Applies an undefined function to arguments, such as `f(x, y)`.
pub fn function_symbol(name: impl Into<String>, args: Vec<Expr>) -> Expr {
    Expr::new(Node::FunctionSymbol { name: name.into(), args })
}

/// Applies a function defined outside the kernel to arguments.
pub fn function_wrapper(name: impl Into<String>, args: Vec<Expr>, payload: Payload) -> Expr {
    Expr::new(Node::FunctionWrapper { name: name.into(), args, payload })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use super::*;

    /// A payload counting how many times it has been dropped.
    #[derive(Debug)]
    struct Counted {
        id: u32,
        drops: Arc<AtomicUsize>,
    }

    impl Drop for Counted {
        fn drop(&mut self) {
            self.drops.fetch_add(1, AtomicOrdering::SeqCst);
        }
    }

    impl WrapperPayload for Counted {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn compare(&self, other: &dyn WrapperPayload) -> Ordering {
            match other.as_any().downcast_ref::<Counted>() {
                Some(other) => self.id.cmp(&other.id),
                None => Ordering::Less,
            }
        }

        fn hash_payload(&self, mut state: &mut dyn Hasher) {
            self.id.hash(&mut state);
        }
    }

    /// A payload whose comparison must never be reached.
    #[derive(Debug)]
    struct Unreachable;

    impl WrapperPayload for Unreachable {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn compare(&self, _: &dyn WrapperPayload) -> Ordering {
            panic!("payloads of differently named wrappers were compared");
        }

        fn hash_payload(&self, _: &mut dyn Hasher) {}
    }

    #[test]
    fn payload_dropped_once() {
        let drops = Arc::new(AtomicUsize::new(0));
        let x = Expr::symbol("x");
        let payload = Payload::new(Counted { id: 1, drops: drops.clone() });
        let wrapper = function_wrapper("g", vec![x.clone()], payload);

        let copies = vec![wrapper.clone(), wrapper.clone()];
        let parent = function_symbol("f", vec![wrapper.clone(), x]);
        drop(wrapper);
        drop(copies);
        assert_eq!(drops.load(AtomicOrdering::SeqCst), 0);

        drop(parent);
        assert_eq!(drops.load(AtomicOrdering::SeqCst), 1);
    }

    #[test]
    fn payload_decides_order() {
        let drops = Arc::new(AtomicUsize::new(0));
        let x = Expr::symbol("x");
        let a = function_wrapper("g", vec![x.clone()], Payload::new(Counted { id: 1, drops: drops.clone() }));
        let b = function_wrapper("g", vec![x.clone()], Payload::new(Counted { id: 2, drops: drops.clone() }));
        let c = function_wrapper("g", vec![x], Payload::new(Counted { id: 1, drops }));
        assert!(a < b);
        assert_eq!(a, c);
    }

    #[test]
    fn names_compared_first() {
        let x = Expr::symbol("x");
        let g = function_wrapper("g", vec![x.clone()], Payload::new(Unreachable));
        let h = function_wrapper("h", vec![x], Payload::new(Unreachable));
        assert!(g < h);
        assert_ne!(g, h);
    }
}
