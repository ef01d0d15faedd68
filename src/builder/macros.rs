//! Macros for ergonomic state machine construction.

/// Generate a `State` implementation for a plain enum.
///
/// The enum derives `serde::Serialize` and `serde::Deserialize`, so the
/// calling crate needs `serde` (with `derive`) as a dependency.
///
/// # Example
///
/// ```
/// use statemap::core::State;
/// use statemap::state_enum;
///
/// state_enum! {
///     pub enum WorkflowState {
///         Start,
///         Processing,
///         Done,
///     }
/// }
///
/// assert_eq!(WorkflowState::Done.name(), "Done");
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $crate::__symbol_enum! {
            $crate::core::State;
            $(#[$meta])*
            $vis enum $name { $( $(#[$variant_meta])* $variant ),* }
        }
    };
}

/// Generate an `Event` implementation for a plain enum.
///
/// # Example
///
/// ```
/// use statemap::core::Event;
/// use statemap::event_enum;
///
/// event_enum! {
///     pub enum Input {
///         Zero,
///         One,
///     }
/// }
///
/// assert_eq!(Input::One.name(), "One");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $crate::__symbol_enum! {
            $crate::core::Event;
            $(#[$meta])*
            $vis enum $name { $( $(#[$variant_meta])* $variant ),* }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __symbol_enum {
    (
        $trait_path:path;
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $trait_path for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate one dispatch method per event on [`StateMachine`](crate::engine::StateMachine).
///
/// Each method is a thin wrapper over `StateMachine::dispatch`, so resolution
/// logic lives in one place. A method may declare typed parameters; it then
/// calls `dispatch_with`, passing a single parameter as is and several as a
/// tuple, which must match the context's `Args` type.
///
/// # Example
///
/// ```
/// use statemap::builder::{TableBuilder, TransitionBuilder};
/// use statemap::core::Context;
/// use statemap::engine::StateMachine;
/// use statemap::{dispatch_methods, event_enum, state_enum};
///
/// state_enum! { pub enum Door { Shut, Open } }
/// event_enum! { pub enum Push { Knock, Kick } }
///
/// struct House;
///
/// impl Context for House {
///     type State = Door;
///     type Event = Push;
///     type Error = std::convert::Infallible;
///     type Args = u32;
/// }
///
/// dispatch_methods! {
///     pub trait HouseEvents for House {
///         fn knock => Push::Knock;
///         fn kick(force: u32) => Push::Kick;
///     }
/// }
///
/// let table = TableBuilder::<House>::new()
///     .start(Door::Shut)
///     .transition(
///         TransitionBuilder::new()
///             .from(Door::Shut)
///             .on(Push::Kick)
///             .when_with(|_: &House, force: Option<&u32>| force.is_some_and(|f| *f > 10))
///             .to(Door::Open),
///     )
///     .unwrap()
///     .transition(TransitionBuilder::new().from(Door::Shut).on(Push::Kick).stay())
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let mut fsm = StateMachine::new(table, House);
/// fsm.enter_start_state().unwrap();
/// fsm.kick(3).unwrap();
/// assert_eq!(fsm.state(), Some(&Door::Shut));
/// fsm.kick(30).unwrap();
/// assert_eq!(fsm.state(), Some(&Door::Open));
/// assert!(fsm.knock().is_err());
/// ```
#[macro_export]
macro_rules! dispatch_methods {
    (
        $(#[$meta:meta])*
        $vis:vis trait $trait_name:ident for $ctx:ty {
            $(
                $(#[$method_meta:meta])*
                fn $method:ident $( ( $($arg:ident : $arg_ty:ty),+ $(,)? ) )? => $event:expr;
            )*
        }
    ) => {
        $(#[$meta])*
        $vis trait $trait_name {
            $(
                $(#[$method_meta])*
                fn $method(&mut self $( $(, $arg: $arg_ty)+ )?) -> $crate::engine::DispatchResult<$ctx>;
            )*
        }

        impl $trait_name for $crate::engine::StateMachine<$ctx> {
            $(
                fn $method(&mut self $( $(, $arg: $arg_ty)+ )?) -> $crate::engine::DispatchResult<$ctx> {
                    $crate::__dispatch_call!(self, $event $(, $($arg),+)?)
                }
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __dispatch_call {
    ($machine:ident, $event:expr) => {
        $machine.dispatch($event)
    };
    ($machine:ident, $event:expr, $arg:ident) => {
        $machine.dispatch_with($event, $arg)
    };
    ($machine:ident, $event:expr, $($arg:ident),+) => {
        $machine.dispatch_with($event, ($($arg),+))
    };
}
