//! Guard predicates for controlling transitions.
//!
//! A guard decides whether one alternative of a transition may fire. Guards
//! read the host context and must not mutate anything; resolution of a
//! transition is pure.

use super::context::Context;
use std::fmt;
use std::sync::Arc;

/// Pure predicate over the host context.
///
/// Guards are evaluated in declaration order while resolving a transition.
/// The first alternative whose guard passes is the one that fires.
///
/// # Example
///
/// ```rust
/// use statemap::core::{Context, Guard};
/// use statemap::{event_enum, state_enum};
///
/// state_enum! { pub enum Gate { Shut } }
/// event_enum! { pub enum Coin { Insert } }
///
/// struct Turnstile {
///     credit: u32,
/// }
///
/// impl Context for Turnstile {
///     type State = Gate;
///     type Event = Coin;
///     type Error = std::convert::Infallible;
///     type Args = ();
/// }
///
/// let paid = Guard::new(|t: &Turnstile| t.credit >= 2);
///
/// assert!(paid.check(&Turnstile { credit: 2 }));
/// assert!(!paid.check(&Turnstile { credit: 1 }));
/// ```
pub struct Guard<C: Context> {
    predicate: Arc<Predicate<C>>,
}

type Predicate<C> = dyn Fn(&C, Option<&<C as Context>::Args>) -> bool + Send + Sync;

impl<C: Context> Guard<C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync),
    /// since one table is shared by every machine built from it.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Self::with_args(move |context, _| predicate(context))
    }

    /// Create a guard that also reads the arguments of the event being
    /// resolved. They are `None` when the event was sent without any.
    pub fn with_args<F>(predicate: F) -> Self
    where
        F: Fn(&C, Option<&C::Args>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the guard allows the transition for this context.
    pub fn check(&self, context: &C) -> bool {
        self.check_with(context, None)
    }

    /// Check with the arguments of the event being resolved.
    pub fn check_with(&self, context: &C, args: Option<&C::Args>) -> bool {
        (self.predicate)(context, args)
    }
}

impl<C: Context> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C: Context> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState { Idle }
    }

    event_enum! {
        enum TestEvent { Go }
    }

    struct Counter {
        value: i32,
    }

    impl Context for Counter {
        type State = TestState;
        type Event = TestEvent;
        type Error = std::convert::Infallible;
        type Args = i32;
    }

    #[test]
    fn guard_allows_matching_contexts() {
        let guard = Guard::new(|c: &Counter| c.value > 0);

        assert!(guard.check(&Counter { value: 1 }));
        assert!(!guard.check(&Counter { value: 0 }));
    }

    #[test]
    fn guard_is_deterministic() {
        let context = Counter { value: 7 };
        let guard = Guard::new(|c: &Counter| c.value % 2 == 1);

        assert_eq!(guard.check(&context), guard.check(&context));
    }

    #[test]
    fn argument_guard_sees_event_arguments() {
        let guard = Guard::with_args(|c: &Counter, limit: Option<&i32>| {
            limit.is_some_and(|limit| c.value < *limit)
        });
        let context = Counter { value: 5 };

        assert!(guard.check_with(&context, Some(&6)));
        assert!(!guard.check_with(&context, Some(&5)));
        assert!(!guard.check(&context));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::new(|c: &Counter| c.value == 3);
        let cloned = guard.clone();

        assert!(cloned.check(&Counter { value: 3 }));
        assert!(!cloned.check(&Counter { value: 4 }));
    }
}
