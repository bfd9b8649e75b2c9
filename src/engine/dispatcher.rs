//! Transition selection.

use super::definition::MachineDefinition;
use crate::core::{event_label, Event, State, Transition};
use tracing::trace;

/// Pick the transition `event` fires from the active `path`, if any.
///
/// Levels are searched leaf first. The first level declaring any
/// alternative for the event decides alone: its alternatives are tried in
/// declared order, and when none passes the event is dropped without
/// consulting outer levels.
pub(crate) fn select<'a, S: State, E: Event, C>(
    definition: &'a MachineDefinition<S, E, C>,
    path: &[S],
    event: Option<E>,
    context: &C,
) -> Option<&'a Transition<S, E, C>> {
    let table = definition.transitions();
    let (level, alternatives) = path.iter().rev().find_map(|&state| {
        let alternatives = table.alternatives(state, event);
        (!alternatives.is_empty()).then_some((state, alternatives))
    })?;

    alternatives.iter().find(|transition| {
        let passed = transition.can_fire(context);
        trace!(
            state = level.name(),
            event = %event_label(event),
            guard = transition.guard.label(),
            passed,
            "guard evaluated"
        );
        passed
    })
}
