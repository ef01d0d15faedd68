//! Generator output as data.
//!
//! A table generator emits a [`MachineDescription`]: states, events and
//! transitions, with actions and guards referred to by name. The host binds
//! those names to code in a [`Registry`] and compiles the description into a
//! [`TransitionTable`].
//!
//! # Example
//!
//! ```rust
//! use statemap::core::Context;
//! use statemap::description::{MachineDescription, Registry};
//! use statemap::engine::StateMachine;
//! use statemap::{event_enum, state_enum};
//!
//! state_enum! { pub enum Lock { Locked, Unlocked } }
//! event_enum! { pub enum Input { Coin, Push } }
//!
//! #[derive(Default)]
//! struct Turnstile {
//!     coins: u32,
//! }
//!
//! impl Context for Turnstile {
//!     type State = Lock;
//!     type Event = Input;
//!     type Error = std::convert::Infallible;
//!     type Args = ();
//! }
//!
//! let json = r#"{
//!     "name": "Turnstile",
//!     "start": "Locked",
//!     "states": [
//!         { "state": "Locked", "transitions": [
//!             { "event": "Coin", "to": "Unlocked", "actions": ["Count"] }
//!         ] },
//!         { "state": "Unlocked", "transitions": [
//!             { "event": "Push", "to": "Locked" },
//!             { "event": "Coin", "actions": ["Count"] }
//!         ] }
//!     ]
//! }"#;
//!
//! let registry = Registry::new().action("Count", |t: &mut Turnstile| t.coins += 1);
//! let table = MachineDescription::<Lock, Input>::from_json(json)
//!     .unwrap()
//!     .compile(&registry)
//!     .unwrap();
//!
//! let mut fsm = StateMachine::new(table, Turnstile::default());
//! fsm.enter_start_state().unwrap();
//! fsm.dispatch(Input::Coin).unwrap();
//! fsm.dispatch(Input::Coin).unwrap();
//! assert_eq!(fsm.state(), Some(&Lock::Unlocked));
//! assert_eq!(fsm.context().coins, 2);
//! ```

mod registry;

pub use registry::Registry;

use crate::builder::{BuildError, TableBuilder, TransitionBuilder};
use crate::core::Context;
use crate::table::TransitionTable;
use serde::{Deserialize, Serialize};

/// A complete machine as emitted by a generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, V: Serialize",
    deserialize = "S: Deserialize<'de>, V: Deserialize<'de>"
))]
pub struct MachineDescription<S, V> {
    pub name: String,
    pub start: S,
    /// Ignore events nothing handles instead of failing.
    #[serde(default)]
    pub allow_unhandled: bool,
    #[serde(default)]
    pub states: Vec<StateDescription<S, V>>,
    /// Transitions of the machine-wide default state.
    #[serde(default)]
    pub any_state: Vec<TransitionDescription<S, V>>,
}

/// One state with its entry/exit actions and outgoing transitions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, V: Serialize",
    deserialize = "S: Deserialize<'de>, V: Deserialize<'de>"
))]
pub struct StateDescription<S, V> {
    pub state: S,
    #[serde(default)]
    pub entry: Vec<String>,
    #[serde(default)]
    pub exit: Vec<String>,
    #[serde(default)]
    pub transitions: Vec<TransitionDescription<S, V>>,
}

/// One transition alternative.
///
/// A missing `event` makes it the default transition; a missing `to` makes
/// it a loopback that stays in the source state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize, V: Serialize",
    deserialize = "S: Deserialize<'de>, V: Deserialize<'de>"
))]
pub struct TransitionDescription<S, V> {
    #[serde(default)]
    pub event: Option<V>,
    #[serde(default)]
    pub to: Option<S>,
    #[serde(default)]
    pub guard: Option<String>,
    #[serde(default)]
    pub actions: Vec<String>,
}

impl<S, V> MachineDescription<S, V>
where
    S: for<'de> Deserialize<'de>,
    V: for<'de> Deserialize<'de>,
{
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl<S: Clone, V: Clone> MachineDescription<S, V> {
    /// Resolve every action and guard name and build the table.
    pub fn compile<C>(&self, registry: &Registry<C>) -> Result<TransitionTable<C>, BuildError>
    where
        C: Context<State = S, Event = V>,
    {
        let mut builder = TableBuilder::new()
            .name(self.name.clone())
            .start(self.start.clone())
            .allow_unhandled(self.allow_unhandled);

        for state in &self.states {
            builder = builder.state(state.state.clone());
            for name in &state.entry {
                builder = builder.entry(state.state.clone(), registry.resolve_action(name)?);
            }
            for name in &state.exit {
                builder = builder.exit(state.state.clone(), registry.resolve_action(name)?);
            }
            for transition in &state.transitions {
                let from = TransitionBuilder::new().from(state.state.clone());
                builder = builder.transition(transition.apply(from, registry)?)?;
            }
        }

        for transition in &self.any_state {
            let from = TransitionBuilder::new().from_any();
            builder = builder.transition(transition.apply(from, registry)?)?;
        }

        builder.build()
    }
}

impl<S: Clone, V: Clone> TransitionDescription<S, V> {
    fn apply<C>(
        &self,
        builder: TransitionBuilder<C>,
        registry: &Registry<C>,
    ) -> Result<TransitionBuilder<C>, BuildError>
    where
        C: Context<State = S, Event = V>,
    {
        let mut builder = match &self.event {
            Some(event) => builder.on(event.clone()),
            None => builder.otherwise(),
        };
        builder = match &self.to {
            Some(state) => builder.to(state.clone()),
            None => builder.stay(),
        };
        if let Some(name) = &self.guard {
            builder = builder.guard(registry.resolve_guard(name)?);
        }
        for name in &self.actions {
            builder = builder.action(registry.resolve_action(name)?);
        }
        Ok(builder)
    }
}
