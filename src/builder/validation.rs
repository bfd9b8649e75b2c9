//! Transition table checks, run once the hierarchy is known to be sound.

use crate::core::validation::{accumulate, check, Check};
use crate::core::{
    event_label, DefinitionError, Event, GuardCondition, Hierarchy, State, TransitionKind,
    TransitionTable,
};
use std::collections::{HashMap, HashSet};

/// Per-row and per-group checks on the transition table.
pub(crate) fn validate_transitions<S: State, E: Event, C>(
    hierarchy: &Hierarchy<S>,
    table: &TransitionTable<S, E, C>,
) -> Result<(), Vec<DefinitionError>> {
    let mut checks: Vec<Check> = Vec::new();

    for transition in table.iter() {
        let state = transition.source.name().to_string();
        let known_source = hierarchy.contains(transition.source);
        checks.push(check(known_source, || DefinitionError::UnknownSource {
            state: state.clone(),
            event: event_label(transition.event),
        }));
        checks.push(check(hierarchy.contains(transition.target), || {
            DefinitionError::UnknownTarget {
                state: state.clone(),
                target: transition.target.name().to_string(),
            }
        }));

        let internal = transition.kind == TransitionKind::Internal;
        checks.push(check(!internal || transition.target == transition.source, || {
            DefinitionError::InternalTargetMismatch {
                state: state.clone(),
                target: transition.target.name().to_string(),
            }
        }));

        if transition.is_eventless() {
            checks.push(check(!hierarchy.is_composite(transition.source), || {
                DefinitionError::EventlessOnComposite {
                    state: state.clone(),
                }
            }));
            checks.push(check(!internal, || DefinitionError::EventlessInternal {
                state: state.clone(),
            }));
        }
    }

    for (source, event, alternatives) in table.groups() {
        let state = source.name().to_string();
        let event = event_label(event);
        let last = alternatives.len().saturating_sub(1);

        let mut labels = HashSet::new();
        let mut otherwise_count = 0;
        for (index, alternative) in alternatives.iter().enumerate() {
            match &alternative.guard {
                GuardCondition::When(guard) => {
                    let fresh = labels.insert(guard.label());
                    checks.push(check(fresh, || DefinitionError::DuplicateGuard {
                        state: state.clone(),
                        event: event.clone(),
                        guard: guard.label().to_string(),
                    }));
                }
                GuardCondition::Otherwise => {
                    otherwise_count += 1;
                    checks.push(check(index == last, || DefinitionError::OtherwiseNotLast {
                        state: state.clone(),
                        event: event.clone(),
                    }));
                }
                GuardCondition::Always => {
                    checks.push(check(index == last, || {
                        DefinitionError::ShadowedAlternative {
                            state: state.clone(),
                            event: event.clone(),
                        }
                    }));
                }
            }
        }

        checks.push(check(otherwise_count <= 1, || {
            DefinitionError::DuplicateOtherwise {
                state: state.clone(),
                event: event.clone(),
            }
        }));
        let lonely = alternatives.len() == 1 && otherwise_count == 1;
        checks.push(check(!lonely, || DefinitionError::OnlyOtherwise {
            state: state.clone(),
            event: event.clone(),
        }));
    }

    accumulate(checks)
}

/// Every leaf must be reachable from the root.
///
/// A state counts as reachable when it is the root, a transition target of a
/// reachable state, the initial child of a reachable state, or an ancestor
/// of one (ancestors are active whenever a descendant is, so their
/// transitions can fire too).
pub(crate) fn validate_reachability<S: State, E: Event, C>(
    hierarchy: &Hierarchy<S>,
    table: &TransitionTable<S, E, C>,
) -> Result<(), Vec<DefinitionError>> {
    let mut targets: HashMap<S, Vec<S>> = HashMap::new();
    for transition in table.iter() {
        targets
            .entry(transition.source)
            .or_default()
            .push(transition.target);
    }

    let mut reachable = HashSet::new();
    let mut frontier = vec![hierarchy.root()];
    while let Some(state) = frontier.pop() {
        if !reachable.insert(state) {
            continue;
        }
        frontier.extend(hierarchy.parent(state));
        frontier.extend(hierarchy.initial_child(state));
        if let Some(next) = targets.get(&state) {
            frontier.extend(next.iter().copied());
        }
    }

    let checks = hierarchy
        .states()
        .filter(|state| hierarchy.is_leaf(*state))
        .map(|state| {
            check(reachable.contains(&state), || DefinitionError::UnreachableState {
                state: state.name().to_string(),
            })
        })
        .collect();

    accumulate(checks)
}

/// Find a cycle of leaves linked by eventless transitions whose first
/// alternative is unguarded. Such a cycle can never settle.
pub(crate) fn find_unguarded_transient_cycle<S: State, E: Event, C>(
    hierarchy: &Hierarchy<S>,
    table: &TransitionTable<S, E, C>,
) -> Option<Vec<S>> {
    let next = |leaf: S| -> Option<S> {
        let first = table.alternatives(leaf, None).first()?;
        matches!(first.guard, GuardCondition::Always).then(|| hierarchy.default_leaf(first.target))
    };

    let mut cleared: HashSet<S> = HashSet::new();
    for start in hierarchy.states() {
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(leaf) = current {
            if cleared.contains(&leaf) {
                break;
            }
            if let Some(position) = chain.iter().position(|s| *s == leaf) {
                let mut cycle: Vec<S> = chain[position..].to_vec();
                cycle.push(leaf);
                return Some(cycle);
            }
            chain.push(leaf);
            current = next(leaf);
        }
        cleared.extend(chain);
    }
    None
}
