//! Build errors for table and transition builders.

use thiserror::Error;

/// Errors that can occur when building transition tables.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Start state not specified. Call .start(state) before .build()")]
    MissingStartState,

    #[error("Transition source not specified. Call .from(state) or .from_any()")]
    MissingSource,

    #[error("Transition event not specified. Call .on(event) or .otherwise()")]
    MissingTrigger,

    #[error("Transition target not specified. Call .to(state) or .stay()")]
    MissingTarget,

    #[error("Transition for '{event}' in '{state}' follows an unguarded alternative and can never fire")]
    UnreachableTransition { state: String, event: String },

    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Unknown guard '{0}'")]
    UnknownGuard(String),

    #[error("Invalid machine description: {0}")]
    Description(#[from] serde_json::Error),
}
