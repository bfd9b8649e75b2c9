//! Builder for constructing statechart definitions.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::builder::validation;
use crate::core::{
    Action, DefinitionError, Event, Hierarchy, State, StateDecl, Transition, TransitionTable,
    DEFAULT_HISTORY_CAPACITY,
};
use crate::engine::{MachineDefinition, StateActions};
use std::collections::{HashMap, HashSet};

/// Builder for constructing statechart definitions with a fluent API.
///
/// States are declared flat, each naming its parent; composite states name
/// their initial child with [`initial`](Self::initial). Nothing is checked
/// until [`build`](Self::build), which reports every problem it finds.
pub struct StatechartBuilder<S: State, E: Event, C> {
    declarations: Vec<StateDecl<S>>,
    initials: Vec<(S, S)>,
    actions: HashMap<S, StateActions<C>>,
    transitions: Vec<Transition<S, E, C>>,
    max_transient_chain: Option<usize>,
    record_history: bool,
    history_capacity: usize,
}

impl<S: State, E: Event, C> StatechartBuilder<S, E, C> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            initials: Vec::new(),
            actions: HashMap::new(),
            transitions: Vec::new(),
            max_transient_chain: None,
            record_history: true,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Declare the root state (required, exactly once).
    pub fn root(mut self, state: S) -> Self {
        self.declarations.push(StateDecl {
            id: state,
            parent: None,
            initial: None,
        });
        self
    }

    /// Declare `state` as a child of `parent`. Children keep declaration order.
    pub fn state(mut self, state: S, parent: S) -> Self {
        self.declarations.push(StateDecl {
            id: state,
            parent: Some(parent),
            initial: None,
        });
        self
    }

    /// Name the child entered by default when `parent` is entered.
    pub fn initial(mut self, parent: S, child: S) -> Self {
        self.initials.push((parent, child));
        self
    }

    /// Append an entry action to `state`.
    pub fn on_entry(mut self, state: S, action: Action<C>) -> Self {
        self.actions.entry(state).or_default().entry.push(action);
        self
    }

    /// Append an exit action to `state`.
    pub fn on_exit(mut self, state: S, action: Action<C>) -> Self {
        self.actions.entry(state).or_default().exit.push(action);
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<S, E, C>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: Transition<S, E, C>) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<Transition<S, E, C>>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Cap on eventless transitions fired while settling after one
    /// `init` or `handle_event`. Defaults to the number of states.
    pub fn max_transient_chain(mut self, limit: usize) -> Self {
        self.max_transient_chain = Some(limit);
        self
    }

    /// Whether instances keep a transition history. Defaults to true.
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Most records each instance's history keeps; older ones are dropped.
    /// Defaults to [`DEFAULT_HISTORY_CAPACITY`].
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the definition.
    ///
    /// Hierarchy problems are reported first; the transition table is only
    /// checked against a well-formed tree.
    pub fn build(self) -> Result<MachineDefinition<S, E, C>, BuildError> {
        let mut declarations = self.declarations;
        let declared: HashSet<S> = declarations.iter().map(|decl| decl.id).collect();

        let mut undeclared = Vec::new();
        let mut reported = HashSet::new();
        let mut report = |state: S, undeclared: &mut Vec<DefinitionError>| {
            if !declared.contains(&state) && reported.insert(state) {
                undeclared.push(DefinitionError::UnknownState {
                    state: state.name().to_string(),
                });
            }
        };

        for (parent, child) in self.initials {
            match declarations.iter_mut().rev().find(|decl| decl.id == parent) {
                Some(decl) => decl.initial = Some(child),
                None => report(parent, &mut undeclared),
            }
        }
        for state in self.actions.keys() {
            report(*state, &mut undeclared);
        }

        let hierarchy = match Hierarchy::from_declarations(&declarations) {
            Ok(hierarchy) if undeclared.is_empty() => hierarchy,
            Ok(_) => return Err(BuildError::MalformedHierarchy(undeclared)),
            Err(mut errors) => {
                errors.extend(undeclared);
                return Err(BuildError::MalformedHierarchy(errors));
            }
        };

        let table: TransitionTable<S, E, C> = self.transitions.into_iter().collect();
        validation::validate_transitions(&hierarchy, &table)
            .map_err(BuildError::InvalidDefinition)?;
        validation::validate_reachability(&hierarchy, &table)
            .map_err(BuildError::InvalidDefinition)?;

        if let Some(cycle) = validation::find_unguarded_transient_cycle(&hierarchy, &table) {
            return Err(BuildError::TransientLoop {
                cycle: cycle.iter().map(|s| s.name().to_string()).collect(),
            });
        }

        let max_transient_chain = self.max_transient_chain.unwrap_or(hierarchy.len());
        Ok(MachineDefinition::new(
            hierarchy,
            table,
            self.actions,
            max_transient_chain,
            self.record_history,
            self.history_capacity,
        ))
    }
}

impl<S: State, E: Event, C> Default for StatechartBuilder<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}
