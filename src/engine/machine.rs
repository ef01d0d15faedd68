//! State machine that executes table-driven transitions.

use crate::config::FsmConfig;
use crate::core::{Context, Event, State, StateHistory, TransitionRecord};
use crate::engine::error::{DispatchResult, FsmError};
use crate::engine::trace::{TraceRecord, TraceSink, TracingSink};
use crate::table::{Action, Transition, TransitionTable, UnhandledPolicy};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// One running instance of a transition table, bound to its host context.
///
/// The machine owns the context and a single current-state cell. Every call
/// runs to completion on the caller's stack; actions that dispatch further
/// events do so re-entrantly, and those nested events resolve against the
/// state the outer transition started from, because a transition commits
/// only after all of its actions have returned.
///
/// The machine performs no locking. Hosts that share one instance between
/// threads must serialize access themselves.
pub struct StateMachine<C: Context> {
    table: Arc<TransitionTable<C>>,
    context: C,
    state: Option<C::State>,
    previous: Option<C::State>,
    in_flight: Vec<InFlight<C>>,
    debug: bool,
    sink: Box<dyn TraceSink<C::State, C::Event>>,
    history: Option<StateHistory<C::State, C::Event>>,
}

/// An event whose transition is executing, with its arguments.
struct InFlight<C: Context> {
    event: C::Event,
    args: Option<C::Args>,
}

/// What a failed transition restores before returning its error.
struct Checkpoint<S> {
    state: Option<S>,
    previous: Option<S>,
    recorded: Option<u64>,
}

impl<C: Context> StateMachine<C> {
    /// Bind a table to a host context. The machine starts uninitialized;
    /// call [`enter_start_state`](Self::enter_start_state) before dispatching.
    pub fn new(table: impl Into<Arc<TransitionTable<C>>>, context: C) -> Self {
        Self {
            table: table.into(),
            context,
            state: None,
            previous: None,
            in_flight: Vec::new(),
            debug: false,
            sink: Box::new(TracingSink),
            history: None,
        }
    }

    /// Like [`new`](Self::new), applying the debug flag and history settings.
    pub fn with_config(
        table: impl Into<Arc<TransitionTable<C>>>,
        context: C,
        config: &FsmConfig,
    ) -> Self {
        let mut machine = Self::new(table, context);
        machine.set_debug_flag(config.debug);
        if config.record_history {
            machine.record_history(config.history_limit);
        }
        machine
    }

    /// Move to the table's start state and run its entry actions.
    ///
    /// Calling this again resets the machine: the previous state and the
    /// recorded history are cleared. If an entry action fails, the machine is
    /// already in the start state when the error is returned.
    pub fn enter_start_state(&mut self) -> DispatchResult<C> {
        let table = Arc::clone(&self.table);
        let start = table.start_state();

        if self.debug {
            self.sink.record(
                table.name(),
                TraceRecord::Enter {
                    state: start.clone(),
                },
            );
        }

        self.previous = None;
        if let Some(history) = self.history.as_mut() {
            history.clear();
        }
        self.state = Some(start.clone());

        self.run_actions(table.entry_actions(start))
    }

    /// Deliver one event.
    ///
    /// Resolution walks the table (see [`crate::table`]). Once a transition
    /// is found it is traced (if the debug flag is set), then the source's
    /// exit actions and the transition's actions run, then the target state
    /// is committed, then the target's entry actions run. Exit and entry
    /// actions are skipped for loopback transitions.
    ///
    /// A failing exit or transition action leaves the machine as it was
    /// before the call, undoing any commit made by a nested dispatch, and
    /// its error is returned unchanged. A failing entry action is the one
    /// exception: the target state is already committed and stays so.
    pub fn dispatch(&mut self, event: C::Event) -> DispatchResult<C> {
        self.deliver(event, None)
    }

    /// Deliver one event together with its arguments.
    ///
    /// Guards built with [`Guard::with_args`](crate::core::Guard::with_args)
    /// see the arguments during resolution, and actions read them through
    /// [`args`](Self::args) until the transition completes.
    pub fn dispatch_with(&mut self, event: C::Event, args: C::Args) -> DispatchResult<C> {
        self.deliver(event, Some(args))
    }

    /// Whether dispatching `event` now would find a transition, or be
    /// ignored by the table's policy. Runs no actions; argument guards are
    /// checked as if the event carried no arguments.
    pub fn can_handle(&self, event: &C::Event) -> bool {
        let Some(state) = self.state.as_ref() else {
            return false;
        };
        self.table.policy() == UnhandledPolicy::Ignore
            || self.table.resolve(state, event, &self.context).is_some()
    }

    /// The current state, or `None` before `enter_start_state`.
    pub fn state(&self) -> Option<&C::State> {
        self.state.as_ref()
    }

    /// Source state of the last committed transition.
    pub fn previous_state(&self) -> Option<&C::State> {
        self.previous.as_ref()
    }

    /// The event whose transition is executing right now (the innermost one
    /// during nested dispatch).
    pub fn transition(&self) -> Option<&C::Event> {
        self.in_flight.last().map(|flight| &flight.event)
    }

    /// Arguments of the event returned by [`transition`](Self::transition),
    /// if it was sent with [`dispatch_with`](Self::dispatch_with).
    pub fn args(&self) -> Option<&C::Args> {
        self.in_flight.last().and_then(|flight| flight.args.as_ref())
    }

    /// The host context together with the in-flight arguments.
    pub fn context_and_args(&mut self) -> (&mut C, Option<&C::Args>) {
        let args = self.in_flight.last().and_then(|flight| flight.args.as_ref());
        (&mut self.context, args)
    }

    pub fn is_in_transition(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Toggle tracing. Has no effect on how transitions resolve.
    pub fn set_debug_flag(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug_flag(&self) -> bool {
        self.debug
    }

    /// Replace the sink debug traces are written to.
    pub fn set_trace_sink<T>(&mut self, sink: T)
    where
        T: TraceSink<C::State, C::Event> + 'static,
    {
        self.sink = Box::new(sink);
    }

    /// Start keeping committed transitions, at most `limit` of them when set.
    pub fn record_history(&mut self, limit: Option<usize>) {
        self.history = Some(match limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        });
    }

    pub fn history(&self) -> Option<&StateHistory<C::State, C::Event>> {
        self.history.as_ref()
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    pub fn table(&self) -> &Arc<TransitionTable<C>> {
        &self.table
    }

    fn deliver(&mut self, event: C::Event, args: Option<C::Args>) -> DispatchResult<C> {
        let from = self.state.clone().ok_or(FsmError::Uninitialized)?;
        let table = Arc::clone(&self.table);

        let Some(transition) = table.resolve_with(&from, &event, &self.context, args.as_ref())
        else {
            return self.unhandled(from, event);
        };
        let to = transition.target.resolve(&from).clone();

        if self.debug {
            self.sink.record(
                table.name(),
                TraceRecord::Transition {
                    from: from.clone(),
                    event: event.clone(),
                    to: to.clone(),
                },
            );
        }

        self.in_flight.push(InFlight {
            event: event.clone(),
            args,
        });
        let outcome = self.execute(&table, transition, from, event, to);
        self.in_flight.pop();
        outcome
    }

    fn execute(
        &mut self,
        table: &TransitionTable<C>,
        transition: &Transition<C>,
        from: C::State,
        event: C::Event,
        to: C::State,
    ) -> DispatchResult<C> {
        let external = transition.target.is_external();
        let checkpoint = self.checkpoint();

        let leaving: &[Action<C>] = if external {
            table.exit_actions(&from)
        } else {
            &[]
        };
        let outcome = self
            .run_actions(leaving)
            .and_then(|()| self.run_actions(&transition.actions));
        if let Err(err) = outcome {
            self.restore(checkpoint);
            return Err(err);
        }

        self.commit(from, event, to.clone());

        if external {
            self.run_actions(table.entry_actions(&to))?;
        }
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint<C::State> {
        Checkpoint {
            state: self.state.clone(),
            previous: self.previous.clone(),
            recorded: self.history.as_ref().map(StateHistory::recorded),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint<C::State>) {
        self.state = checkpoint.state;
        self.previous = checkpoint.previous;
        if let (Some(history), Some(mark)) = (self.history.as_mut(), checkpoint.recorded) {
            history.rollback(mark);
        }
    }

    fn run_actions(&mut self, actions: &[Action<C>]) -> DispatchResult<C> {
        for action in actions {
            action.run(self)?;
        }
        Ok(())
    }

    fn commit(&mut self, from: C::State, event: C::Event, to: C::State) {
        tracing::trace!(
            machine = self.table.name(),
            from = from.name(),
            event = event.name(),
            to = to.name(),
            "commit"
        );
        if let Some(history) = self.history.as_mut() {
            history.record(TransitionRecord {
                from: from.clone(),
                event,
                to: to.clone(),
                timestamp: Utc::now(),
            });
        }
        self.previous = Some(from);
        self.state = Some(to);
    }

    fn unhandled(&mut self, state: C::State, event: C::Event) -> DispatchResult<C> {
        match self.table.policy() {
            UnhandledPolicy::Fatal => Err(FsmError::UnhandledTransition {
                state: state.name().to_string(),
                event: event.name().to_string(),
            }),
            UnhandledPolicy::Ignore => {
                tracing::warn!(
                    machine = self.table.name(),
                    state = state.name(),
                    event = event.name(),
                    "no transition, event ignored"
                );
                if self.debug {
                    self.sink
                        .record(self.table.name(), TraceRecord::Ignored { state, event });
                }
                Ok(())
            }
        }
    }
}

impl<C: Context> fmt::Debug for StateMachine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("table", &self.table.name())
            .field("state", &self.state)
            .field("previous", &self.previous)
            .field("transition", &self.transition())
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}
