//! Transitions and the table the dispatcher searches.

use super::action::Action;
use super::guard::Guard;
use super::state::{Event, State};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Whether firing a transition leaves and re-enters states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Exit up to the transition domain, run actions, enter the target.
    External,
    /// Run actions only; the configuration is untouched.
    Internal,
}

/// Condition attached to one alternative of a (state, event) pair.
pub enum GuardCondition<C> {
    /// No guard; always taken when reached.
    Always,
    /// Taken when the guard holds.
    When(Guard<C>),
    /// Taken when no earlier alternative for the same pair was.
    Otherwise,
}

impl<C> GuardCondition<C> {
    /// Whether this alternative fires, given that every earlier one did not.
    pub fn allows(&self, context: &C) -> bool {
        match self {
            Self::Always | Self::Otherwise => true,
            Self::When(guard) => guard.check(context),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Always => "always",
            Self::When(guard) => guard.label(),
            Self::Otherwise => "otherwise",
        }
    }
}

impl<C> Clone for GuardCondition<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Always => Self::Always,
            Self::When(guard) => Self::When(guard.clone()),
            Self::Otherwise => Self::Otherwise,
        }
    }
}

impl<C> std::fmt::Debug for GuardCondition<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::When(guard) => f.debug_tuple("When").field(guard).finish(),
            Self::Otherwise => f.write_str("Otherwise"),
        }
    }
}

/// One row of the transition table.
///
/// `event` is `None` for an eventless transition, which fires as soon as
/// its source leaf becomes active.
pub struct Transition<S: State, E: Event, C> {
    pub source: S,
    pub event: Option<E>,
    pub guard: GuardCondition<C>,
    /// Run in order, after exits and before entries.
    pub actions: Vec<Action<C>>,
    pub target: S,
    pub kind: TransitionKind,
}

impl<S: State, E: Event, C> Transition<S, E, C> {
    /// Check the guard against the context (pure).
    pub fn can_fire(&self, context: &C) -> bool {
        self.guard.allows(context)
    }

    pub fn is_eventless(&self) -> bool {
        self.event.is_none()
    }

    pub fn is_internal(&self) -> bool {
        self.kind == TransitionKind::Internal
    }
}

impl<S: State, E: Event, C> Clone for Transition<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            event: self.event,
            guard: self.guard.clone(),
            actions: self.actions.clone(),
            target: self.target,
            kind: self.kind,
        }
    }
}

impl<S: State, E: Event, C> std::fmt::Debug for Transition<S, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("source", &self.source)
            .field("event", &self.event)
            .field("guard", &self.guard)
            .field("actions", &self.actions)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Transitions grouped by (source, event), alternatives kept in declared order.
pub struct TransitionTable<S: State, E: Event, C> {
    entries: HashMap<(S, Option<E>), Vec<Transition<S, E, C>>>,
    len: usize,
}

impl<S: State, E: Event, C> Default for TransitionTable<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, E: Event, C> TransitionTable<S, E, C> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            len: 0,
        }
    }

    /// Append a transition after any existing alternatives for its pair.
    pub fn insert(&mut self, transition: Transition<S, E, C>) {
        self.entries
            .entry((transition.source, transition.event))
            .or_default()
            .push(transition);
        self.len += 1;
    }

    /// Alternatives declared on `state` for `event`, possibly empty.
    pub fn alternatives(&self, state: S, event: Option<E>) -> &[Transition<S, E, C>] {
        self.entries
            .get(&(state, event))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// True when `state` is transient.
    pub fn has_eventless(&self, state: S) -> bool {
        !self.alternatives(state, None).is_empty()
    }

    /// Every (source, event) group.
    pub fn groups(&self) -> impl Iterator<Item = (S, Option<E>, &[Transition<S, E, C>])> {
        self.entries
            .iter()
            .map(|((state, event), alternatives)| (*state, *event, alternatives.as_slice()))
    }

    /// Every transition, in no particular order across groups.
    pub fn iter(&self) -> impl Iterator<Item = &Transition<S, E, C>> {
        self.entries.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<S: State, E: Event, C> FromIterator<Transition<S, E, C>> for TransitionTable<S, E, C> {
    fn from_iter<I: IntoIterator<Item = Transition<S, E, C>>>(iter: I) -> Self {
        let mut table = Self::new();
        for transition in iter {
            table.insert(transition);
        }
        table
    }
}
