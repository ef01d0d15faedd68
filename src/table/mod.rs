//! The transition table a machine is driven by.
//!
//! A table maps `(state, event)` to an ordered list of guarded transition
//! alternatives. It is assembled once, by [`TableBuilder`](crate::builder::TableBuilder)
//! or by compiling a [`MachineDescription`](crate::description::MachineDescription),
//! and is read-only afterwards. Engines share it through an `Arc`.
//!
//! # Resolution
//!
//! For a state `s` and an event `e` the table offers candidates from four
//! levels, in this order:
//!
//! 1. transitions declared on `s` for `e`
//! 2. machine-wide transitions declared for `e` in any state
//! 3. the default transition of `s`
//! 4. the machine-wide default transition
//!
//! Within a level, alternatives are tried in declaration order and the first
//! whose guard passes wins. When every guard of a level fails, resolution
//! falls through to the next level. When nothing fires, the event is
//! unhandled and the table's [`UnhandledPolicy`] decides what happens.

mod action;
mod transition;

pub use action::Action;
pub use transition::{Target, Transition};

use crate::core::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// What the engine does when no transition applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnhandledPolicy {
    /// Dispatch fails with [`FsmError::UnhandledTransition`](crate::engine::FsmError).
    #[default]
    Fatal,
    /// Dispatch succeeds without changing state; a warning is logged.
    Ignore,
}

/// Which states a transition is declared for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source<S> {
    State(S),
    /// The machine-wide default state.
    Any,
}

/// Which events a transition reacts to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger<V> {
    Event(V),
    /// Fallback for events without a matching entry.
    Default,
}

pub(crate) struct StateEntry<C: Context> {
    pub(crate) transitions: HashMap<C::Event, Vec<Transition<C>>>,
    pub(crate) default: Vec<Transition<C>>,
    pub(crate) entry: Vec<Action<C>>,
    pub(crate) exit: Vec<Action<C>>,
}

impl<C: Context> Default for StateEntry<C> {
    fn default() -> Self {
        Self {
            transitions: HashMap::new(),
            default: Vec::new(),
            entry: Vec::new(),
            exit: Vec::new(),
        }
    }
}

/// Immutable mapping from `(state, event)` to transition alternatives.
pub struct TransitionTable<C: Context> {
    name: String,
    start: C::State,
    policy: UnhandledPolicy,
    order: Vec<C::State>,
    states: HashMap<C::State, StateEntry<C>>,
    any_state: HashMap<C::Event, Vec<Transition<C>>>,
    any_default: Vec<Transition<C>>,
}

impl<C: Context> TransitionTable<C> {
    pub(crate) fn new(name: String, start: C::State, policy: UnhandledPolicy) -> Self {
        let mut table = Self {
            name,
            start: start.clone(),
            policy,
            order: Vec::new(),
            states: HashMap::new(),
            any_state: HashMap::new(),
            any_default: Vec::new(),
        };
        table.declare(start);
        table
    }

    /// Register a state, keeping declaration order.
    pub(crate) fn declare(&mut self, state: C::State) -> &mut StateEntry<C> {
        if !self.states.contains_key(&state) {
            self.order.push(state.clone());
        }
        self.states.entry(state).or_default()
    }

    /// The alternative list a `(source, trigger)` pair is stored in.
    pub(crate) fn slot(
        &mut self,
        source: Source<C::State>,
        trigger: Trigger<C::Event>,
    ) -> &mut Vec<Transition<C>> {
        match (source, trigger) {
            (Source::State(state), Trigger::Event(event)) => {
                self.declare(state).transitions.entry(event).or_default()
            }
            (Source::State(state), Trigger::Default) => &mut self.declare(state).default,
            (Source::Any, Trigger::Event(event)) => self.any_state.entry(event).or_default(),
            (Source::Any, Trigger::Default) => &mut self.any_default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The state `enter_start_state` moves to.
    pub fn start_state(&self) -> &C::State {
        &self.start
    }

    pub fn policy(&self) -> UnhandledPolicy {
        self.policy
    }

    /// Every state the table knows, in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &C::State> {
        self.order.iter()
    }

    pub fn contains_state(&self, state: &C::State) -> bool {
        self.states.contains_key(state)
    }

    /// Explicit alternatives for `(state, event)`: the state's own entry,
    /// else the machine-wide entry for the event.
    pub fn lookup(&self, state: &C::State, event: &C::Event) -> Option<&[Transition<C>]> {
        let [own, any, _, _] = self.levels(state, event);
        [own, any].into_iter().find(|level| !level.is_empty())
    }

    /// Default alternatives for `state`: its own default, else the
    /// machine-wide default.
    pub fn default_for(&self, state: &C::State) -> Option<&[Transition<C>]> {
        let own = self
            .states
            .get(state)
            .map(|entry| entry.default.as_slice())
            .unwrap_or_default();
        [own, self.any_default.as_slice()]
            .into_iter()
            .find(|level| !level.is_empty())
    }

    /// Find the transition that fires for `(state, event)` given the host
    /// context, walking every resolution level. Pure.
    pub fn resolve(&self, state: &C::State, event: &C::Event, context: &C) -> Option<&Transition<C>> {
        self.resolve_with(state, event, context, None)
    }

    /// Like [`resolve`](Self::resolve), passing the event's arguments to
    /// guards.
    pub fn resolve_with(
        &self,
        state: &C::State,
        event: &C::Event,
        context: &C,
        args: Option<&C::Args>,
    ) -> Option<&Transition<C>> {
        self.levels(state, event)
            .into_iter()
            .flatten()
            .find(|transition| transition.can_execute_with(context, args))
    }

    pub fn entry_actions(&self, state: &C::State) -> &[Action<C>] {
        self.states
            .get(state)
            .map(|entry| entry.entry.as_slice())
            .unwrap_or_default()
    }

    pub fn exit_actions(&self, state: &C::State) -> &[Action<C>] {
        self.states
            .get(state)
            .map(|entry| entry.exit.as_slice())
            .unwrap_or_default()
    }

    /// Events with an explicit entry reachable from `state`, either declared
    /// on the state or machine-wide.
    pub fn events_from(&self, state: &C::State) -> Vec<&C::Event> {
        let mut events: Vec<&C::Event> = self
            .states
            .get(state)
            .map(|entry| entry.transitions.keys().collect())
            .unwrap_or_default();
        for event in self.any_state.keys() {
            if !events.contains(&event) {
                events.push(event);
            }
        }
        events
    }

    /// `(state, event)` pairs, over the known states and the given events,
    /// with no explicit or default entry at all.
    ///
    /// Guards are not evaluated, so a pair whose alternatives are all guarded
    /// is considered covered.
    pub fn coverage_gaps(&self, events: &[C::Event]) -> Vec<(C::State, C::Event)> {
        let mut gaps = Vec::new();
        for state in &self.order {
            if self.default_for(state).is_some() {
                continue;
            }
            for event in events {
                if self.lookup(state, event).is_none() {
                    gaps.push((state.clone(), event.clone()));
                }
            }
        }
        gaps
    }

    fn levels(&self, state: &C::State, event: &C::Event) -> [&[Transition<C>]; 4] {
        let entry = self.states.get(state);
        let own = entry
            .and_then(|entry| entry.transitions.get(event))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let any = self
            .any_state
            .get(event)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let default = entry
            .map(|entry| entry.default.as_slice())
            .unwrap_or_default();
        [own, any, default, self.any_default.as_slice()]
    }
}

impl<C: Context> fmt::Debug for TransitionTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionTable")
            .field("name", &self.name)
            .field("start", &self.start)
            .field("policy", &self.policy)
            .field("states", &self.order)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{TableBuilder, TransitionBuilder};
    use crate::{event_enum, state_enum};

    state_enum! {
        enum Light { Red, Green, Yellow, Broken }
    }

    event_enum! {
        enum Signal { Next, Fault, Poke }
    }

    struct Controller {
        overridden: bool,
    }

    impl Context for Controller {
        type State = Light;
        type Event = Signal;
        type Error = std::convert::Infallible;
        type Args = ();
    }

    fn t() -> TransitionBuilder<Controller> {
        TransitionBuilder::new()
    }

    fn table() -> TransitionTable<Controller> {
        TableBuilder::new()
            .name("Lights")
            .start(Light::Red)
            .transition(t().from(Light::Red).on(Signal::Next).to(Light::Green))
            .unwrap()
            .transition(
                t().from(Light::Green)
                    .on(Signal::Next)
                    .when(|c: &Controller| c.overridden)
                    .to(Light::Red),
            )
            .unwrap()
            .transition(t().from(Light::Green).on(Signal::Next).to(Light::Yellow))
            .unwrap()
            .transition(t().from(Light::Yellow).on(Signal::Next).to(Light::Red))
            .unwrap()
            .transition(t().from_any().on(Signal::Fault).to(Light::Broken))
            .unwrap()
            .transition(t().from(Light::Broken).otherwise().stay())
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn lookup_finds_exact_entry() {
        let table = table();
        let found = table.lookup(&Light::Red, &Signal::Next).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].target, Target::To(Light::Green));
    }

    #[test]
    fn lookup_falls_back_to_machine_wide_entry() {
        let table = table();
        let found = table.lookup(&Light::Yellow, &Signal::Fault).unwrap();
        assert_eq!(found[0].target, Target::To(Light::Broken));
    }

    #[test]
    fn lookup_is_none_without_explicit_entry() {
        let table = table();
        assert!(table.lookup(&Light::Red, &Signal::Poke).is_none());
    }

    #[test]
    fn default_for_returns_state_default() {
        let table = table();
        let found = table.default_for(&Light::Broken).unwrap();
        assert_eq!(found[0].target, Target::Stay);
        assert!(table.default_for(&Light::Red).is_none());
    }

    #[test]
    fn resolve_respects_guard_order() {
        let table = table();
        let normal = Controller { overridden: false };
        let overridden = Controller { overridden: true };

        let t = table.resolve(&Light::Green, &Signal::Next, &normal).unwrap();
        assert_eq!(t.target, Target::To(Light::Yellow));

        let t = table.resolve(&Light::Green, &Signal::Next, &overridden).unwrap();
        assert_eq!(t.target, Target::To(Light::Red));
    }

    #[test]
    fn resolve_uses_default_when_no_entry() {
        let table = table();
        let ctx = Controller { overridden: false };
        let t = table.resolve(&Light::Broken, &Signal::Next, &ctx).unwrap();
        assert_eq!(t.target, Target::Stay);
        assert!(table.resolve(&Light::Red, &Signal::Poke, &ctx).is_none());
    }

    #[test]
    fn resolve_with_passes_arguments_to_guards() {
        struct Dispatcher;

        impl Context for Dispatcher {
            type State = Light;
            type Event = Signal;
            type Error = std::convert::Infallible;
            type Args = u8;
        }

        let table = TableBuilder::<Dispatcher>::new()
            .start(Light::Red)
            .transition(
                TransitionBuilder::new()
                    .from(Light::Red)
                    .on(Signal::Poke)
                    .when_with(|_: &Dispatcher, severity: Option<&u8>| severity.is_some_and(|s| *s >= 5))
                    .to(Light::Broken),
            )
            .unwrap()
            .transition(TransitionBuilder::new().from(Light::Red).on(Signal::Poke).stay())
            .unwrap()
            .build()
            .unwrap();

        let t = table.resolve_with(&Light::Red, &Signal::Poke, &Dispatcher, Some(&7)).unwrap();
        assert_eq!(t.target, Target::To(Light::Broken));

        let t = table.resolve_with(&Light::Red, &Signal::Poke, &Dispatcher, Some(&1)).unwrap();
        assert_eq!(t.target, Target::Stay);

        let t = table.resolve(&Light::Red, &Signal::Poke, &Dispatcher).unwrap();
        assert_eq!(t.target, Target::Stay);
    }

    #[test]
    fn states_keep_declaration_order() {
        let table = table();
        let states: Vec<_> = table.states().cloned().collect();
        assert_eq!(states, vec![Light::Red, Light::Green, Light::Yellow, Light::Broken]);
        assert_eq!(table.start_state(), &Light::Red);
        assert_eq!(table.name(), "Lights");
    }

    #[test]
    fn events_from_includes_machine_wide_events() {
        let table = table();
        let events = table.events_from(&Light::Red);
        assert_eq!(events.len(), 2);
        assert!(events.contains(&&Signal::Next));
        assert!(events.contains(&&Signal::Fault));
    }

    #[test]
    fn coverage_gaps_lists_unhandled_pairs() {
        let table = table();
        let gaps = table.coverage_gaps(&[Signal::Next, Signal::Fault, Signal::Poke]);
        assert_eq!(
            gaps,
            vec![
                (Light::Red, Signal::Poke),
                (Light::Green, Signal::Poke),
                (Light::Yellow, Signal::Poke),
            ]
        );
    }

    #[test]
    fn policy_defaults_to_fatal() {
        assert_eq!(table().policy(), UnhandledPolicy::Fatal);
    }
}
