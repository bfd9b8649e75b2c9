//! Builder API for statechart construction.
//!
//! This module provides fluent builders, helper constructors, and macros for
//! declaring a statechart. Every definition is validated once, at build time;
//! a definition that builds is safe to run.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;
pub(crate) mod validation;

pub use crate::core::DefinitionError;
pub use error::BuildError;
pub use machine::StatechartBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Action, Event, Guard, GuardCondition, State, Transition, TransitionKind};

/// Create an unguarded external transition without actions.
///
/// # Example
///
/// ```
/// use chartwell::builder::simple_transition;
/// use chartwell::core::Transition;
/// use chartwell::{event_enum, state_enum};
///
/// state_enum! {
///     enum Lamp { Root, On, Off }
/// }
/// event_enum! {
///     enum Input { Press }
/// }
///
/// let transition: Transition<Lamp, Input, ()> = simple_transition(Lamp::Off, Input::Press, Lamp::On);
/// assert!(transition.can_fire(&()));
/// ```
pub fn simple_transition<S: State, E: Event, C>(from: S, event: E, to: S) -> Transition<S, E, C> {
    Transition {
        source: from,
        event: Some(event),
        guard: GuardCondition::Always,
        actions: Vec::new(),
        target: to,
        kind: TransitionKind::External,
    }
}

/// Create an external transition gated by a predicate on the context.
///
/// # Example
///
/// ```
/// use chartwell::builder::guarded_transition;
/// use chartwell::{event_enum, state_enum};
///
/// state_enum! {
///     enum Lamp { Root, On, Off }
/// }
/// event_enum! {
///     enum Input { Press }
/// }
///
/// let transition = guarded_transition(Lamp::Off, Input::Press, Lamp::On, "charged", |level: &u8| *level > 10);
/// assert!(transition.can_fire(&50));
/// assert!(!transition.can_fire(&5));
/// ```
pub fn guarded_transition<S, E, C, F>(
    from: S,
    event: E,
    to: S,
    label: impl Into<String>,
    predicate: F,
) -> Transition<S, E, C>
where
    S: State,
    E: Event,
    F: Fn(&C) -> bool + Send + Sync + 'static,
{
    Transition {
        guard: GuardCondition::When(Guard::new(label, predicate)),
        ..simple_transition(from, event, to)
    }
}

/// Create an unguarded internal transition running a single action.
pub fn internal_transition<S: State, E: Event, C>(
    state: S,
    event: E,
    action: Action<C>,
) -> Transition<S, E, C> {
    Transition {
        actions: vec![action],
        kind: TransitionKind::Internal,
        ..simple_transition(state, event, state)
    }
}
