//! One alternative of a table entry.

use super::action::Action;
use crate::core::{Context, Guard};
use serde::{Deserialize, Serialize};

/// Where a transition leaves the machine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Target<S> {
    /// Loopback: stay in the source state without running exit or entry
    /// actions.
    Stay,
    /// Move to the given state. Exit and entry actions run even when the
    /// target equals the source.
    To(S),
}

impl<S> Target<S> {
    /// The state the machine ends up in when leaving `from`.
    pub fn resolve<'a>(&'a self, from: &'a S) -> &'a S {
        match self {
            Self::Stay => from,
            Self::To(state) => state,
        }
    }

    /// Whether the transition leaves its source (runs exit and entry actions).
    pub fn is_external(&self) -> bool {
        matches!(self, Self::To(_))
    }
}

/// A guarded transition descriptor: target, optional guard, ordered actions.
pub struct Transition<C: Context> {
    pub target: Target<C::State>,
    pub guard: Option<Guard<C>>,
    pub actions: Vec<Action<C>>,
}

impl<C: Context> Transition<C> {
    /// Check whether this alternative may fire for the context (pure).
    pub fn can_execute(&self, context: &C) -> bool {
        self.can_execute_with(context, None)
    }

    /// Like [`can_execute`](Self::can_execute), with the event's arguments.
    pub fn can_execute_with(&self, context: &C, args: Option<&C::Args>) -> bool {
        self.guard.as_ref().is_none_or(|g| g.check_with(context, args))
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_some()
    }
}

impl<C: Context> Clone for Transition<C> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            guard: self.guard.clone(),
            actions: self.actions.clone(),
        }
    }
}

impl<C: Context> std::fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("target", &self.target)
            .field("guarded", &self.is_guarded())
            .field("actions", &self.actions)
            .finish()
    }
}
