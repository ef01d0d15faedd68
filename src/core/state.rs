//! Traits for the closed sets a transition table is written over.
//!
//! States and events are plain enums in practice. Both traits only ask for a
//! stable name, which the engine uses in traces and error messages.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: the engine keeps the current and previous state by value
/// - `Eq` + `Hash`: states key the transition table
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: tables and traces can be exchanged as data
///
/// # Example
///
/// ```rust
/// use statemap::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// ```
pub trait State:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for the events a machine reacts to.
///
/// Same bounds as [`State`]; events key the per-state transition maps.
pub trait Event:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
