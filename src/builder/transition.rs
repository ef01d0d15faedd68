//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Context, Guard};
use crate::table::{Action, Source, Target, Transition, Trigger};

/// A transition together with the table slot it belongs to.
pub struct TransitionDef<C: Context> {
    pub source: Source<C::State>,
    pub trigger: Trigger<C::Event>,
    pub transition: Transition<C>,
}

/// Builder for constructing transitions with a fluent API.
pub struct TransitionBuilder<C: Context> {
    source: Option<Source<C::State>>,
    trigger: Option<Trigger<C::Event>>,
    target: Option<Target<C::State>>,
    guard: Option<Guard<C>>,
    actions: Vec<Action<C>>,
}

impl<C: Context> TransitionBuilder<C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            source: None,
            trigger: None,
            target: None,
            guard: None,
            actions: Vec::new(),
        }
    }

    /// Set the source state.
    pub fn from(mut self, state: C::State) -> Self {
        self.source = Some(Source::State(state));
        self
    }

    /// Declare the transition for every state (the machine-wide default state).
    pub fn from_any(mut self) -> Self {
        self.source = Some(Source::Any);
        self
    }

    /// Set the triggering event.
    pub fn on(mut self, event: C::Event) -> Self {
        self.trigger = Some(Trigger::Event(event));
        self
    }

    /// Make this the default transition of its source.
    pub fn otherwise(mut self) -> Self {
        self.trigger = Some(Trigger::Default);
        self
    }

    /// Set the target state.
    pub fn to(mut self, state: C::State) -> Self {
        self.target = Some(Target::To(state));
        self
    }

    /// Loop back without leaving the source state.
    pub fn stay(mut self) -> Self {
        self.target = Some(Target::Stay);
        self
    }

    /// Add a guard (optional).
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Add a guard using a closure (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Add a guard that also reads the event's arguments (optional).
    pub fn when_with<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&C, Option<&C::Args>) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::with_args(predicate));
        self
    }

    /// Append an action. Actions run in the order they were added.
    pub fn action(mut self, action: Action<C>) -> Self {
        self.actions.push(action);
        self
    }

    /// Append an infallible context action.
    pub fn call<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.action(Action::call(name, f))
    }

    /// Append an infallible context action that reads the event's arguments.
    pub fn call_with<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut C, Option<&C::Args>) + Send + Sync + 'static,
    {
        self.action(Action::call_with(name, f))
    }

    /// Build the transition.
    pub fn build(self) -> Result<TransitionDef<C>, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let trigger = self.trigger.ok_or(BuildError::MissingTrigger)?;
        let target = self.target.ok_or(BuildError::MissingTarget)?;

        Ok(TransitionDef {
            source,
            trigger,
            transition: Transition {
                target,
                guard: self.guard,
                actions: self.actions,
            },
        })
    }
}

impl<C: Context> Default for TransitionBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
