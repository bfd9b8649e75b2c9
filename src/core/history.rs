//! Transition history tracking.
//!
//! Every transition an instance fires, including eventless ones taken while
//! settling transient states, can be appended to a history for diagnostics
//! and checkpointing. Instances keep a bounded history: once the limit is
//! reached the oldest record is dropped for each new one.

use super::state::{Event, State};
use super::transition::TransitionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Records an instance keeps unless the builder sets another capacity.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// Record of a single fired transition.
///
/// # Example
///
/// ```rust
/// use chartwell::core::{TransitionKind, TransitionRecord};
/// use chartwell::{event_enum, state_enum};
/// use chrono::Utc;
///
/// state_enum! {
///     enum Pump { Root, Idle, Running }
/// }
/// event_enum! {
///     enum Command { Start }
/// }
///
/// let record = TransitionRecord {
///     source: Pump::Idle,
///     target: Pump::Running,
///     event: Some(Command::Start),
///     kind: TransitionKind::External,
///     from_leaf: Pump::Idle,
///     to_leaf: Pump::Running,
///     timestamp: Utc::now(),
/// };
/// assert!(!record.is_eventless());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionRecord<S: State, E: Event> {
    /// State that declared the transition (may be an ancestor of `from_leaf`)
    pub source: S,
    /// Declared target (may be composite)
    pub target: S,
    /// Triggering event, `None` for eventless transitions
    pub event: Option<E>,
    pub kind: TransitionKind,
    /// Active leaf before firing
    pub from_leaf: S,
    /// Active leaf after firing
    pub to_leaf: S,
    /// When the transition completed
    pub timestamp: DateTime<Utc>,
}

impl<S: State, E: Event> TransitionRecord<S, E> {
    pub fn is_eventless(&self) -> bool {
        self.event.is_none()
    }
}

/// Ordered history of fired transitions, oldest first.
///
/// The limit is not serialized; a resumed instance takes its limit from
/// the definition it resumes with.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct TransitionHistory<S: State, E: Event> {
    records: VecDeque<TransitionRecord<S, E>>,
    #[serde(skip)]
    limit: Option<usize>,
}

impl<S: State, E: Event> Default for TransitionHistory<S, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event> TransitionHistory<S, E> {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
            limit: None,
        }
    }

    /// Keep at most `limit` records, dropping the oldest ones now and on
    /// every later `record`.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self.trim();
        self
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Append a record, returning the extended history.
    pub fn record(mut self, record: TransitionRecord<S, E>) -> Self {
        self.records.push_back(record);
        self.trim();
        self
    }

    /// Drop every record, keeping the limit.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn trim(&mut self) {
        if let Some(limit) = self.limit {
            let excess = self.records.len().saturating_sub(limit);
            self.records.drain(..excess);
        }
    }

    /// Leaves visited, in order: the first `from_leaf`, then every `to_leaf`.
    ///
    /// Internal transitions repeat the current leaf.
    pub fn leaf_path(&self) -> Vec<S> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from_leaf);
        }
        path.extend(self.records.iter().map(|record| record.to_leaf));
        path
    }

    /// Time between the first and last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn records(&self) -> &VecDeque<TransitionRecord<S, E>> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
