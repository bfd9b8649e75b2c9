//! Exit, action, and entry sequencing.

use super::definition::MachineDefinition;
use super::dispatcher;
use super::error::EngineError;
use crate::core::{event_label, Action, Event, State, Transition, TransitionHistory, TransitionRecord};
use chrono::Utc;
use tracing::{debug, trace, warn};

/// Runs one step of an instance against a working copy of its configuration.
///
/// The working path is committed after each complete transition. When a
/// callback fails midway, the last committed path is what the instance
/// keeps; context changes made before the failure are not undone.
pub(crate) struct Executor<'a, S: State, E: Event, C> {
    definition: &'a MachineDefinition<S, E, C>,
    context: &'a mut C,
    path: Vec<S>,
    committed: Vec<S>,
    history: Option<&'a mut TransitionHistory<S, E>>,
}

impl<'a, S: State, E: Event, C> Executor<'a, S, E, C> {
    pub(crate) fn new(
        definition: &'a MachineDefinition<S, E, C>,
        context: &'a mut C,
        path: Vec<S>,
        history: Option<&'a mut TransitionHistory<S, E>>,
    ) -> Self {
        Self {
            definition,
            context,
            committed: path.clone(),
            path,
            history,
        }
    }

    /// Path as of the last complete transition.
    pub(crate) fn into_committed(self) -> Vec<S> {
        self.committed
    }

    /// Enter the root, descend through initial children, then settle.
    pub(crate) fn initialize(&mut self) -> Result<(), EngineError> {
        let root = self.definition.hierarchy().root();
        self.enter(root)?;
        self.descend()?;
        self.commit();
        debug!(leaf = ?self.path.last(), "machine initialized");
        self.settle()
    }

    /// Fire a selected transition and settle any transient leaf it lands on.
    pub(crate) fn fire(&mut self, transition: &Transition<S, E, C>) -> Result<(), EngineError> {
        self.fire_once(transition)?;
        if transition.is_internal() {
            return Ok(());
        }
        self.settle()
    }

    fn fire_once(&mut self, transition: &Transition<S, E, C>) -> Result<(), EngineError> {
        let from_leaf = self.path.last().copied().ok_or(EngineError::NotInitialized)?;

        if transition.is_internal() {
            self.run_actions(&transition.actions)?;
        } else {
            let keep = self.retained_depth(transition.source, transition.target);
            while self.path.len() > keep {
                self.exit_leaf()?;
            }
            self.run_actions(&transition.actions)?;
            let entered = self.definition.hierarchy().path(transition.target);
            for &state in entered.iter().skip(keep) {
                self.enter(state)?;
            }
            self.descend()?;
        }
        self.commit();

        let to_leaf = self.path.last().copied().unwrap_or(from_leaf);
        debug!(
            source = transition.source.name(),
            target = transition.target.name(),
            event = %event_label(transition.event),
            kind = ?transition.kind,
            leaf = to_leaf.name(),
            "transition fired"
        );

        if let Some(history) = self.history.as_deref_mut() {
            let record = TransitionRecord {
                source: transition.source,
                target: transition.target,
                event: transition.event,
                kind: transition.kind,
                from_leaf,
                to_leaf,
                timestamp: Utc::now(),
            };
            *history = std::mem::take(history).record(record);
        }
        Ok(())
    }

    /// Fire eventless transitions until the leaf is stable.
    fn settle(&mut self) -> Result<(), EngineError> {
        let limit = self.definition.max_transient_chain();
        let mut chain: Vec<S> = Vec::new();

        while let Some(&leaf) = self.path.last() {
            let Some(transition) = dispatcher::select(self.definition, &self.path, None, &*self.context)
            else {
                break;
            };
            chain.push(leaf);
            if chain.len() > limit {
                let chain: Vec<String> = chain.iter().map(|s| s.name().to_string()).collect();
                warn!(limit, chain = %chain.join(" -> "), "transient chain did not settle");
                return Err(EngineError::TransientLoop { chain, limit });
            }
            self.fire_once(transition)?;
        }
        Ok(())
    }

    /// States active at or above the transition domain stay active.
    ///
    /// The domain is the deepest proper ancestor of both ends; when one end
    /// is the root there is none and the whole path is exited.
    fn retained_depth(&self, source: S, target: S) -> usize {
        let hierarchy = self.definition.hierarchy();
        self.domain(source, target)
            .and_then(|domain| hierarchy.depth(domain))
            .map_or(0, |depth| depth + 1)
    }

    fn domain(&self, source: S, target: S) -> Option<S> {
        let hierarchy = self.definition.hierarchy();
        let lca = hierarchy.least_common_ancestor(source, target)?;
        if lca == source || lca == target {
            hierarchy.parent(lca)
        } else {
            Some(lca)
        }
    }

    fn enter(&mut self, state: S) -> Result<(), EngineError> {
        trace!(state = state.name(), "entering");
        let definition = self.definition;
        self.path.push(state);
        self.run_actions(definition.entry_actions(state))
    }

    fn exit_leaf(&mut self) -> Result<(), EngineError> {
        let Some(&state) = self.path.last() else {
            return Ok(());
        };
        trace!(state = state.name(), "exiting");
        let definition = self.definition;
        self.run_actions(definition.exit_actions(state))?;
        self.path.pop();
        Ok(())
    }

    /// Follow initial children from the current leaf down to a real leaf.
    fn descend(&mut self) -> Result<(), EngineError> {
        let definition = self.definition;
        let hierarchy = definition.hierarchy();
        while let Some(child) = self.path.last().and_then(|&s| hierarchy.initial_child(s)) {
            self.enter(child)?;
        }
        Ok(())
    }

    fn run_actions(&mut self, actions: &[Action<C>]) -> Result<(), EngineError> {
        for action in actions {
            action
                .run(self.context)
                .map_err(|source| EngineError::ActionFailed {
                    label: action.label().to_string(),
                    source,
                })?;
        }
        Ok(())
    }

    fn commit(&mut self) {
        self.committed.clone_from(&self.path);
    }
}
