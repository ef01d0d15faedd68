//! The dispatch engine.
//!
//! A [`StateMachine`] binds a shared [`TransitionTable`](crate::table::TransitionTable)
//! to one host context and one current-state cell. Everything is synchronous:
//! `dispatch` returns only after every action, nested dispatch included, has
//! finished.

mod error;
mod machine;
mod trace;

pub use error::{DispatchResult, FsmError};
pub use machine::StateMachine;
pub use trace::{TraceLog, TraceRecord, TraceSink, TracingSink};
