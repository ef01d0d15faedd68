//! Named callbacks executed as part of a transition.

use crate::core::Context;
use crate::engine::{DispatchResult, FsmError, StateMachine};
use std::fmt;
use std::sync::Arc;

type ActionFn<C> = dyn Fn(&mut StateMachine<C>) -> DispatchResult<C> + Send + Sync;

/// A named reference to host behavior.
///
/// Actions run synchronously on the dispatching call stack. They receive the
/// whole machine so they can reach the host context and raise further events;
/// a nested dispatch sees the state the outer transition started from, since
/// the outer commit happens only after every action has returned.
pub struct Action<C: Context> {
    name: Arc<str>,
    body: Arc<ActionFn<C>>,
}

impl<C: Context> Action<C> {
    /// Create an action with full access to the machine.
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut StateMachine<C>) -> DispatchResult<C> + Send + Sync + 'static,
    {
        Self {
            name: Arc::from(name.into()),
            body: Arc::new(body),
        }
    }

    /// Create an infallible action that only touches the host context.
    pub fn call<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Self::new(name, move |machine| {
            f(machine.context_mut());
            Ok(())
        })
    }

    /// Create an infallible context action that also reads the arguments of
    /// the event in flight.
    pub fn call_with<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C, Option<&C::Args>) + Send + Sync + 'static,
    {
        Self::new(name, move |machine| {
            let (context, args) = machine.context_and_args();
            f(context, args);
            Ok(())
        })
    }

    /// Create a fallible context action.
    ///
    /// An `Err` from `f` surfaces to the dispatch caller as
    /// [`FsmError::Action`] carrying this action's name.
    pub fn try_call<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), C::Error> + Send + Sync + 'static,
    {
        let name: Arc<str> = Arc::from(name.into());
        let label = Arc::clone(&name);
        Self {
            name,
            body: Arc::new(move |machine: &mut StateMachine<C>| {
                f(machine.context_mut()).map_err(|source| FsmError::Action {
                    action: label.to_string(),
                    source,
                })
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn run(&self, machine: &mut StateMachine<C>) -> DispatchResult<C> {
        (self.body)(machine)
    }
}

impl<C: Context> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            body: Arc::clone(&self.body),
        }
    }
}

impl<C: Context> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.name).finish()
    }
}
