//! Debug trace output.
//!
//! When a machine's debug flag is set, every transition is reported to a
//! [`TraceSink`] before its actions run. The default sink forwards to
//! `tracing`; hosts can install their own.

use crate::core::{Event, State};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};

/// One traced step of a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TraceRecord<S, V> {
    /// `enter_start_state` moved the machine to `state`.
    Enter { state: S },
    /// A transition was resolved and is about to run.
    Transition { from: S, event: V, to: S },
    /// No transition applied and the table's policy ignored the event.
    Ignored { state: S, event: V },
}

/// Receiver for debug trace records.
pub trait TraceSink<S, V>: Send {
    fn record(&mut self, machine: &str, record: TraceRecord<S, V>);
}

impl<S, V, F> TraceSink<S, V> for F
where
    F: FnMut(&str, TraceRecord<S, V>) + Send,
{
    fn record(&mut self, machine: &str, record: TraceRecord<S, V>) {
        self(machine, record)
    }
}

/// Emits each record as a `tracing` debug event.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl<S: State, V: Event> TraceSink<S, V> for TracingSink {
    fn record(&mut self, machine: &str, record: TraceRecord<S, V>) {
        match record {
            TraceRecord::Enter { state } => {
                tracing::debug!(machine, state = state.name(), "enter start state");
            }
            TraceRecord::Transition { from, event, to } => {
                tracing::debug!(
                    machine,
                    from = from.name(),
                    event = event.name(),
                    to = to.name(),
                    "transition"
                );
            }
            TraceRecord::Ignored { state, event } => {
                tracing::debug!(machine, state = state.name(), event = event.name(), "ignored");
            }
        }
    }
}

/// Shared in-memory trace buffer.
///
/// Clones share the same buffer, so a host can keep one handle and give
/// another to the machine.
#[derive(Debug)]
pub struct TraceLog<S, V> {
    records: Arc<Mutex<Vec<TraceRecord<S, V>>>>,
}

impl<S, V> TraceLog<S, V> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Copy of every record so far.
    pub fn records(&self) -> Vec<TraceRecord<S, V>>
    where
        S: Clone,
        V: Clone,
    {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<S, V> Clone for TraceLog<S, V> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<S, V> Default for TraceLog<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Send, V: Send> TraceSink<S, V> for TraceLog<S, V> {
    fn record(&mut self, _machine: &str, record: TraceRecord<S, V>) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record);
    }
}
