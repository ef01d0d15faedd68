//! Builder for constructing transition tables.

use crate::builder::error::BuildError;
use crate::builder::transition::{TransitionBuilder, TransitionDef};
use crate::core::{Context, Event, State};
use crate::table::{Action, Source, Target, TransitionTable, Trigger, UnhandledPolicy};

/// Builder for constructing transition tables with a fluent API.
pub struct TableBuilder<C: Context> {
    name: String,
    start: Option<C::State>,
    policy: UnhandledPolicy,
    states: Vec<C::State>,
    entry: Vec<(C::State, Action<C>)>,
    exit: Vec<(C::State, Action<C>)>,
    transitions: Vec<TransitionDef<C>>,
}

impl<C: Context> TableBuilder<C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            name: String::from("Machine"),
            start: None,
            policy: UnhandledPolicy::default(),
            states: Vec::new(),
            entry: Vec::new(),
            exit: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Name used in logs and traces.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the start state (required).
    pub fn start(mut self, state: C::State) -> Self {
        self.start = Some(state);
        self
    }

    pub fn policy(mut self, policy: UnhandledPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for [`UnhandledPolicy::Ignore`] (`true`) or
    /// [`UnhandledPolicy::Fatal`] (`false`).
    pub fn allow_unhandled(self, allow: bool) -> Self {
        self.policy(if allow {
            UnhandledPolicy::Ignore
        } else {
            UnhandledPolicy::Fatal
        })
    }

    /// Declare a state that is not mentioned by any transition.
    pub fn state(mut self, state: C::State) -> Self {
        self.states.push(state);
        self
    }

    /// Add an action run whenever `state` is entered.
    pub fn entry(mut self, state: C::State, action: Action<C>) -> Self {
        self.entry.push((state, action));
        self
    }

    /// Add an action run whenever `state` is left by an external transition.
    pub fn exit(mut self, state: C::State, action: Action<C>) -> Self {
        self.exit.push((state, action));
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<C>) -> Result<Self, BuildError> {
        let def = builder.build()?;
        self.transitions.push(def);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, def: TransitionDef<C>) -> Self {
        self.transitions.push(def);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, defs: Vec<TransitionDef<C>>) -> Self {
        self.transitions.extend(defs);
        self
    }

    /// Build the table.
    /// Returns an error if the start state is missing or an alternative is
    /// shadowed by an earlier unguarded one.
    pub fn build(self) -> Result<TransitionTable<C>, BuildError> {
        let start = self.start.ok_or(BuildError::MissingStartState)?;
        let mut table = TransitionTable::new(self.name, start, self.policy);

        for state in self.states {
            table.declare(state);
        }
        for (state, action) in self.entry {
            table.declare(state).entry.push(action);
        }
        for (state, action) in self.exit {
            table.declare(state).exit.push(action);
        }

        for def in self.transitions {
            let target = match &def.transition.target {
                Target::To(state) => Some(state.clone()),
                Target::Stay => None,
            };
            let labels = (source_label(&def.source), trigger_label(&def.trigger));

            let slot = table.slot(def.source, def.trigger);
            if slot.last().is_some_and(|t| !t.is_guarded()) {
                return Err(BuildError::UnreachableTransition {
                    state: labels.0,
                    event: labels.1,
                });
            }
            slot.push(def.transition);

            if let Some(state) = target {
                table.declare(state);
            }
        }

        Ok(table)
    }
}

impl<C: Context> Default for TableBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

fn source_label<S: State>(source: &Source<S>) -> String {
    match source {
        Source::State(state) => state.name().to_string(),
        Source::Any => String::from("Default"),
    }
}

fn trigger_label<V: Event>(trigger: &Trigger<V>) -> String {
    match trigger {
        Trigger::Event(event) => event.name().to_string(),
        Trigger::Default => String::from("Default"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState { Initial, Processing, Complete, Orphan }
    }

    event_enum! {
        enum TestEvent { Begin, Finish }
    }

    struct Job;

    impl Context for Job {
        type State = TestState;
        type Event = TestEvent;
        type Error = std::convert::Infallible;
        type Args = ();
    }

    fn t() -> TransitionBuilder<Job> {
        TransitionBuilder::new()
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = TableBuilder::<Job>::new().build();
        assert!(matches!(result, Err(BuildError::MissingStartState)));
    }

    #[test]
    fn start_state_alone_builds() {
        let table = TableBuilder::<Job>::new().start(TestState::Initial).build().unwrap();
        assert_eq!(table.start_state(), &TestState::Initial);
        assert_eq!(table.states().count(), 1);
    }

    #[test]
    fn fluent_api_builds_table() {
        let table = TableBuilder::new()
            .name("Jobs")
            .start(TestState::Initial)
            .state(TestState::Orphan)
            .transition(t().from(TestState::Initial).on(TestEvent::Begin).to(TestState::Processing))
            .unwrap()
            .transition(t().from(TestState::Processing).on(TestEvent::Finish).to(TestState::Complete))
            .unwrap()
            .build()
            .unwrap();

        let states: Vec<_> = table.states().cloned().collect();
        assert_eq!(
            states,
            vec![
                TestState::Initial,
                TestState::Orphan,
                TestState::Processing,
                TestState::Complete
            ]
        );
        assert!(table.contains_state(&TestState::Complete));
    }

    #[test]
    fn shadowed_alternative_is_rejected() {
        let result = TableBuilder::new()
            .start(TestState::Initial)
            .transition(t().from(TestState::Initial).on(TestEvent::Begin).to(TestState::Processing))
            .unwrap()
            .transition(
                t().from(TestState::Initial)
                    .on(TestEvent::Begin)
                    .when(|_: &Job| true)
                    .to(TestState::Complete),
            )
            .unwrap()
            .build();

        match result {
            Err(BuildError::UnreachableTransition { state, event }) => {
                assert_eq!(state, "Initial");
                assert_eq!(event, "Begin");
            }
            other => panic!("expected UnreachableTransition, got {other:?}"),
        }
    }

    #[test]
    fn guarded_alternatives_may_precede_unguarded() {
        let table = TableBuilder::new()
            .start(TestState::Initial)
            .transition(
                t().from(TestState::Initial)
                    .on(TestEvent::Begin)
                    .when(|_: &Job| false)
                    .to(TestState::Complete),
            )
            .unwrap()
            .transition(t().from(TestState::Initial).on(TestEvent::Begin).to(TestState::Processing))
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(table.lookup(&TestState::Initial, &TestEvent::Begin).unwrap().len(), 2);
    }

    #[test]
    fn allow_unhandled_sets_policy() {
        let table = TableBuilder::<Job>::new()
            .start(TestState::Initial)
            .allow_unhandled(true)
            .build()
            .unwrap();
        assert_eq!(table.policy(), UnhandledPolicy::Ignore);
    }
}
