//! Transition history tracking.
//!
//! A bounded, serializable log of the transitions a machine performed.
//! Recording is optional and configured per machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single completed transition.
///
/// `source` is the state whose handler requested the transition and `target`
/// the state it asked for. `from` and `to` are the leaf states the machine
/// rested in before and after, which differ from `source`/`target` when the
/// handler sat on an ancestor or the target is composite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord<S> {
    /// Name of the event that caused the transition
    pub event: String,
    /// State that handled the event
    pub source: S,
    /// Requested target state
    pub target: S,
    /// Leaf state before the transition
    pub from: S,
    /// Leaf state after initial-substate descent
    pub to: S,
    /// Whether the transition was external
    pub external: bool,
    /// Machine version after the transition
    pub version: u64,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered, optionally bounded history of transitions.
///
/// When a limit is set, the oldest record is dropped once the limit is
/// reached.
///
/// # Example
///
/// ```rust
/// use strata::core::{TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::with_limit(2);
///
/// for (from, to) in [("a", "b"), ("b", "c"), ("c", "d")] {
///     history.record(TransitionRecord {
///         event: "Next".to_string(),
///         source: from,
///         target: to,
///         from,
///         to,
///         external: false,
///         version: 1,
///         timestamp: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.len(), 2);
/// assert_eq!(history.get_path(), vec![&"b", &"c", &"d"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory<S> {
    records: VecDeque<TransitionRecord<S>>,
    limit: Option<usize>,
}

impl<S> Default for TransitionHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> TransitionHistory<S> {
    /// Create a new unbounded history.
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            limit: None,
        }
    }

    /// Create a history keeping at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Append a record, evicting the oldest one when full.
    pub fn record(&mut self, record: TransitionRecord<S>) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            if self.records.len() >= limit {
                self.records.pop_front();
            }
        }
        self.records.push_back(record);
    }

    /// Leaf states visited, oldest first: the `from` of the first kept
    /// record, then the `to` of each record.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::new();
        if let Some(first) = self.records.front() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Time between the first and last kept record.
    ///
    /// Returns `None` if there are no records.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok()
        } else {
            None
        }
    }

    /// Kept records, oldest first.
    pub fn records(&self) -> &VecDeque<TransitionRecord<S>> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
