//! Errors surfaced by dispatch.

use crate::core::Context;
use thiserror::Error;

/// Errors that can occur while entering the start state or dispatching.
///
/// `E` is the host context's action error type.
#[derive(Debug, Error)]
pub enum FsmError<E> {
    #[error("State machine has not entered its start state")]
    Uninitialized,

    #[error("No transition for event '{event}' in state '{state}'")]
    UnhandledTransition { state: String, event: String },

    #[error("Action '{action}' failed: {source}")]
    Action {
        action: String,
        #[source]
        source: E,
    },
}

impl<E> FsmError<E> {
    /// The host error behind an action failure, if that is what this is.
    pub fn into_action_error(self) -> Option<E> {
        match self {
            Self::Action { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_unhandled(&self) -> bool {
        matches!(self, Self::UnhandledTransition { .. })
    }
}

/// Result of `enter_start_state`, `dispatch`, and every action.
pub type DispatchResult<C> = Result<(), FsmError<<C as Context>::Error>>;
