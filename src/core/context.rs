//! The host side of a state machine.

use super::state::{Event, State};

/// The object that owns domain state and defines the actions a table refers to.
///
/// The engine owns one context value per machine instance and never inspects it;
/// actions and guards are the only code that reads or mutates it.
///
/// # Example
///
/// ```rust
/// use statemap::core::Context;
/// use statemap::{event_enum, state_enum};
///
/// state_enum! {
///     pub enum Light { Off, On }
/// }
///
/// event_enum! {
///     pub enum Switch { Flip }
/// }
///
/// #[derive(Default)]
/// struct Lamp {
///     flips: u32,
/// }
///
/// impl Context for Lamp {
///     type State = Light;
///     type Event = Switch;
///     type Error = std::convert::Infallible;
///     type Args = ();
/// }
/// ```
pub trait Context: 'static {
    /// The closed set of states the table is written over.
    type State: State;

    /// The closed set of events the table reacts to.
    type Event: Event;

    /// Error returned by fallible actions.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Arguments that travel with an event delivered through
    /// [`StateMachine::dispatch_with`](crate::engine::StateMachine::dispatch_with).
    /// Guards and actions can read them while the event is in flight. Use `()`
    /// when events carry nothing; several values go in a tuple.
    type Args: Send + 'static;
}
