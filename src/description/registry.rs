//! Name to code bindings for described machines.

use crate::builder::BuildError;
use crate::core::{Context, Guard};
use crate::engine::{DispatchResult, StateMachine};
use crate::table::Action;
use std::collections::HashMap;
use std::fmt;

/// Actions and guards a [`MachineDescription`](super::MachineDescription)
/// may refer to by name.
pub struct Registry<C: Context> {
    actions: HashMap<String, Action<C>>,
    guards: HashMap<String, Guard<C>>,
}

impl<C: Context> Registry<C> {
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
            guards: HashMap::new(),
        }
    }

    /// Bind an infallible context action.
    pub fn action<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        let name = name.into();
        self.bind(Action::call(name, f))
    }

    /// Bind an infallible action that reads the event's arguments.
    pub fn action_with<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C, Option<&C::Args>) + Send + Sync + 'static,
    {
        self.bind(Action::call_with(name, f))
    }

    /// Bind a fallible context action.
    pub fn try_action<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), C::Error> + Send + Sync + 'static,
    {
        self.bind(Action::try_call(name, f))
    }

    /// Bind an action that needs the whole machine, e.g. to raise events.
    pub fn machine_action<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut StateMachine<C>) -> DispatchResult<C> + Send + Sync + 'static,
    {
        self.bind(Action::new(name, f))
    }

    /// Bind a prebuilt action under its own name.
    pub fn bind(mut self, action: Action<C>) -> Self {
        self.actions.insert(action.name().to_string(), action);
        self
    }

    pub fn guard<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::new(predicate));
        self
    }

    pub fn guard_with<F>(mut self, name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C, Option<&C::Args>) -> bool + Send + Sync + 'static,
    {
        self.guards.insert(name.into(), Guard::with_args(predicate));
        self
    }

    pub fn contains_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn contains_guard(&self, name: &str) -> bool {
        self.guards.contains_key(name)
    }

    pub(crate) fn resolve_action(&self, name: &str) -> Result<Action<C>, BuildError> {
        self.actions
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownAction(name.to_string()))
    }

    pub(crate) fn resolve_guard(&self, name: &str) -> Result<Guard<C>, BuildError> {
        self.guards
            .get(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownGuard(name.to_string()))
    }
}

impl<C: Context> Default for Registry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Context> fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        let mut guards: Vec<_> = self.guards.keys().collect();
        actions.sort();
        guards.sort();
        f.debug_struct("Registry")
            .field("actions", &actions)
            .field("guards", &guards)
            .finish()
    }
}
