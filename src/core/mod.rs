//! Core state machine types.
//!
//! This module contains the vocabulary every other module is written in:
//! - State and event definitions via the `State` and `Event` traits
//! - The `Context` trait a host implements
//! - Guard predicates for transition control
//! - Transition history tracking

mod context;
mod guard;
mod history;
mod state;

pub use context::Context;
pub use guard::Guard;
pub use history::{StateHistory, TransitionRecord};
pub use state::{Event, State};
