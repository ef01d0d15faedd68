//! Transition history tracking.
//!
//! The engine can keep an in-memory log of every committed transition. The
//! log is bounded when a limit is set, dropping the oldest records first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Record of a single committed transition.
///
/// # Example
///
/// ```rust
/// use statemap::core::TransitionRecord;
/// use chrono::Utc;
///
/// let record = TransitionRecord {
///     from: "Idle",
///     event: "Start",
///     to: "Running",
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.to, "Running");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S, V> {
    /// The state being transitioned from
    pub from: S,
    /// The event that fired the transition
    pub event: V,
    /// The state being transitioned to
    pub to: S,
    /// When the transition committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of committed transitions.
///
/// # Example
///
/// ```rust
/// use statemap::core::{StateHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = StateHistory::new();
///
/// history.record(TransitionRecord {
///     from: 'a',
///     event: 1,
///     to: 'b',
///     timestamp: Utc::now(),
/// });
/// history.record(TransitionRecord {
///     from: 'b',
///     event: 2,
///     to: 'c',
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&'a', &'b', &'c']);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StateHistory<S, V> {
    transitions: VecDeque<TransitionRecord<S, V>>,
    limit: Option<usize>,
    #[serde(default)]
    recorded: u64,
}

impl<S, V> Default for StateHistory<S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, V> StateHistory<S, V> {
    /// Create a new, unbounded, empty history.
    pub fn new() -> Self {
        Self {
            transitions: VecDeque::new(),
            limit: None,
            recorded: 0,
        }
    }

    /// Create a history that keeps at most `limit` records.
    ///
    /// A limit of zero keeps nothing.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(limit.min(1024)),
            limit: Some(limit),
            recorded: 0,
        }
    }

    /// Append a record, evicting the oldest one when the limit is reached.
    pub fn record(&mut self, transition: TransitionRecord<S, V>) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            while self.transitions.len() >= limit {
                self.transitions.pop_front();
            }
        }
        self.transitions.push_back(transition);
        self.recorded += 1;
    }

    /// Number of records ever appended, evicted ones included.
    pub(crate) fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Drop the records appended since [`recorded`](Self::recorded) returned
    /// `mark`. Records evicted by the limit in the meantime are not restored.
    pub(crate) fn rollback(&mut self, mark: u64) {
        let added = self.recorded.saturating_sub(mark);
        for _ in 0..added {
            if self.transitions.pop_back().is_none() {
                break;
            }
        }
        self.recorded = mark.min(self.recorded);
    }

    /// Drop every record, keeping the limit.
    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: the source of the oldest
    /// retained record, then the `to` state of each record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Iterate over the retained records, oldest first.
    pub fn transitions(&self) -> impl Iterator<Item = &TransitionRecord<S, V>> {
        self.transitions.iter()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(from: &'static str, event: u8, to: &'static str) -> TransitionRecord<&'static str, u8> {
        TransitionRecord {
            from,
            event,
            to,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<&str, u8> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::new();
        history.record(record("Initial", 0, "Processing"));
        history.record(record("Processing", 1, "Complete"));

        let path = history.get_path();
        assert_eq!(path, vec![&"Initial", &"Processing", &"Complete"]);
    }

    #[test]
    fn limit_evicts_oldest_records() {
        let mut history = StateHistory::with_limit(2);
        history.record(record("A", 0, "B"));
        history.record(record("B", 1, "C"));
        history.record(record("C", 2, "D"));

        assert_eq!(history.len(), 2);
        assert_eq!(history.get_path(), vec![&"B", &"C", &"D"]);
    }

    #[test]
    fn zero_limit_keeps_nothing() {
        let mut history = StateHistory::with_limit(0);
        history.record(record("A", 0, "B"));
        assert!(history.is_empty());
    }

    #[test]
    fn clear_drops_records() {
        let mut history = StateHistory::new();
        history.record(record("A", 0, "B"));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn rollback_drops_records_after_mark() {
        let mut history = StateHistory::new();
        history.record(record("A", 0, "B"));
        let mark = history.recorded();
        history.record(record("B", 1, "C"));
        history.record(record("C", 2, "D"));

        history.rollback(mark);

        assert_eq!(history.get_path(), vec![&"A", &"B"]);
        assert_eq!(history.recorded(), mark);
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history: StateHistory<String, u8> = StateHistory::new();
        history.record(TransitionRecord {
            from: "A".to_string(),
            event: 3,
            to: "B".to_string(),
            timestamp: Utc::now(),
        });

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<String, u8> = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(deserialized.get_path(), vec!["A", "B"]);
    }
}
