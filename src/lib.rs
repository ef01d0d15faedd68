//! Statemap: a table-driven finite state machine runtime
//!
//! Statemap executes state machines whose structure is fixed at construction
//! time: a [`TransitionTable`] maps `(state, event)` pairs to guarded
//! transition alternatives, and a [`StateMachine`] binds one such table to a
//! host-supplied context object that guards read and actions mutate.
//!
//! # Core Concepts
//!
//! - **State / Event**: Type-safe symbols via the `State` and `Event` traits
//! - **Context**: The host object; also fixes the state, event and error types
//! - **Guards**: Pure predicates that choose between transition alternatives
//! - **Actions**: Named callbacks run on exit, on transition and on entry
//! - **Resolution**: State, then any-state, then defaults; first passing guard wins
//!
//! Tables are written by hand with the [`builder`] API or compiled from a
//! generator's JSON output with [`description`].
//!
//! # Example
//!
//! ```rust
//! use statemap::builder::{TableBuilder, TransitionBuilder};
//! use statemap::core::Context;
//! use statemap::engine::StateMachine;
//! use statemap::{event_enum, state_enum};
//!
//! state_enum! {
//!     pub enum Job { Queued, Running, Done }
//! }
//!
//! event_enum! {
//!     pub enum Signal { Run, Finish }
//! }
//!
//! #[derive(Default)]
//! struct Worker {
//!     runs: u32,
//! }
//!
//! impl Context for Worker {
//!     type State = Job;
//!     type Event = Signal;
//!     type Error = std::convert::Infallible;
//!     type Args = ();
//! }
//!
//! let table = TableBuilder::<Worker>::new()
//!     .name("Worker")
//!     .start(Job::Queued)
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(Job::Queued)
//!             .on(Signal::Run)
//!             .to(Job::Running)
//!             .call("CountRun", |w: &mut Worker| w.runs += 1),
//!     )
//!     .unwrap()
//!     .transition(TransitionBuilder::new().from(Job::Running).on(Signal::Finish).to(Job::Done))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let mut fsm = StateMachine::new(table, Worker::default());
//! fsm.enter_start_state().unwrap();
//! fsm.dispatch(Signal::Run).unwrap();
//! fsm.dispatch(Signal::Finish).unwrap();
//!
//! assert_eq!(fsm.state(), Some(&Job::Done));
//! assert_eq!(fsm.previous_state(), Some(&Job::Running));
//! assert_eq!(fsm.context().runs, 1);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod description;
pub mod engine;
pub mod table;

// Re-export commonly used types
pub use builder::{BuildError, TableBuilder, TransitionBuilder};
pub use config::{ConfigError, FsmConfig};
pub use self::core::{Context, Event, Guard, State, StateHistory};
pub use description::{MachineDescription, Registry};
pub use engine::{DispatchResult, FsmError, StateMachine};
pub use table::{Action, Target, TransitionTable, UnhandledPolicy};
