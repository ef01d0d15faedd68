//! Builder API for ergonomic table construction.
//!
//! This module provides fluent builders and macros for assembling transition
//! tables by hand, with minimal boilerplate and full type safety. Tables
//! produced by a generator go through [`crate::description`] instead.

pub mod error;
pub mod macros;
pub mod table;
pub mod transition;

pub use error::BuildError;
pub use table::TableBuilder;
pub use transition::{TransitionBuilder, TransitionDef};

use crate::core::{Context, Guard};
use crate::table::{Source, Target, Transition, Trigger};

/// Create an unguarded transition without actions.
///
/// # Example
///
/// ```
/// use statemap::builder::simple_transition;
/// use statemap::core::Context;
/// use statemap::{event_enum, state_enum};
///
/// state_enum! { enum Step { Start, End } }
/// event_enum! { enum Tick { Next } }
///
/// struct Clock;
///
/// impl Context for Clock {
///     type State = Step;
///     type Event = Tick;
///     type Error = std::convert::Infallible;
///     type Args = ();
/// }
///
/// let def = simple_transition::<Clock>(Step::Start, Tick::Next, Step::End);
/// assert!(def.transition.actions.is_empty());
/// ```
pub fn simple_transition<C: Context>(from: C::State, on: C::Event, to: C::State) -> TransitionDef<C> {
    TransitionDef {
        source: Source::State(from),
        trigger: Trigger::Event(on),
        transition: Transition {
            target: Target::To(to),
            guard: None,
            actions: Vec::new(),
        },
    }
}

/// Create a transition guarded by a predicate over the host context.
pub fn guarded_transition<C, F>(from: C::State, on: C::Event, to: C::State, guard: F) -> TransitionDef<C>
where
    C: Context,
    F: Fn(&C) -> bool + Send + Sync + 'static,
{
    let mut def = simple_transition(from, on, to);
    def.transition.guard = Some(Guard::new(guard));
    def
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState { Start, Middle }
    }

    event_enum! {
        enum TestEvent { Step }
    }

    struct Walker {
        tired: bool,
    }

    impl Context for Walker {
        type State = TestState;
        type Event = TestEvent;
        type Error = std::convert::Infallible;
        type Args = ();
    }

    #[test]
    fn simple_transition_builds() {
        let def = simple_transition::<Walker>(TestState::Start, TestEvent::Step, TestState::Middle);

        assert_eq!(def.source, Source::State(TestState::Start));
        assert_eq!(def.transition.target, Target::To(TestState::Middle));
        assert!(def.transition.can_execute(&Walker { tired: true }));
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let def = guarded_transition::<Walker, _>(
            TestState::Start,
            TestEvent::Step,
            TestState::Middle,
            |w| !w.tired,
        );

        assert!(def.transition.can_execute(&Walker { tired: false }));
        assert!(!def.transition.can_execute(&Walker { tired: true }));
    }
}
