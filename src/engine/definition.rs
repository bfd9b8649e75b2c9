//! Immutable statechart definitions.

use crate::core::{Action, Event, Hierarchy, State, TransitionTable};
use std::collections::HashMap;

/// Entry and exit actions of one state, each run in declared order.
pub struct StateActions<C> {
    pub entry: Vec<Action<C>>,
    pub exit: Vec<Action<C>>,
}

impl<C> Default for StateActions<C> {
    fn default() -> Self {
        Self {
            entry: Vec::new(),
            exit: Vec::new(),
        }
    }
}

/// A validated statechart: state tree, transition table, and per-state actions.
///
/// Produced only by [`StatechartBuilder::build`](crate::builder::StatechartBuilder::build),
/// so every definition in hand is well formed. Definitions never change
/// after construction and are shared between instances through `Arc`.
pub struct MachineDefinition<S: State, E: Event, C> {
    hierarchy: Hierarchy<S>,
    transitions: TransitionTable<S, E, C>,
    actions: HashMap<S, StateActions<C>>,
    max_transient_chain: usize,
    record_history: bool,
    history_capacity: usize,
}

impl<S: State, E: Event, C> MachineDefinition<S, E, C> {
    pub(crate) fn new(
        hierarchy: Hierarchy<S>,
        transitions: TransitionTable<S, E, C>,
        actions: HashMap<S, StateActions<C>>,
        max_transient_chain: usize,
        record_history: bool,
        history_capacity: usize,
    ) -> Self {
        Self {
            hierarchy,
            transitions,
            actions,
            max_transient_chain,
            record_history,
            history_capacity,
        }
    }

    pub fn hierarchy(&self) -> &Hierarchy<S> {
        &self.hierarchy
    }

    pub fn transitions(&self) -> &TransitionTable<S, E, C> {
        &self.transitions
    }

    pub fn entry_actions(&self, state: S) -> &[Action<C>] {
        self.actions
            .get(&state)
            .map(|actions| actions.entry.as_slice())
            .unwrap_or(&[])
    }

    pub fn exit_actions(&self, state: S) -> &[Action<C>] {
        self.actions
            .get(&state)
            .map(|actions| actions.exit.as_slice())
            .unwrap_or(&[])
    }

    /// Most eventless transitions fired while settling after one step.
    pub fn max_transient_chain(&self) -> usize {
        self.max_transient_chain
    }

    pub fn records_history(&self) -> bool {
        self.record_history
    }

    /// Most records an instance's history keeps before dropping the oldest.
    pub fn history_capacity(&self) -> usize {
        self.history_capacity
    }
}

impl<S: State, E: Event, C> std::fmt::Debug for MachineDefinition<S, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineDefinition")
            .field("root", &self.hierarchy.root())
            .field("states", &self.hierarchy.len())
            .field("transitions", &self.transitions.len())
            .field("max_transient_chain", &self.max_transient_chain)
            .field("record_history", &self.record_history)
            .field("history_capacity", &self.history_capacity)
            .finish()
    }
}
