//! Core statechart types.
//!
//! This module contains the static description of a statechart and the
//! values an instance carries around:
//! - State and event identity via the `State` and `Event` traits
//! - The state tree (`Hierarchy`) and its ancestor queries
//! - The transition table with guards and actions
//! - The active configuration and transition history
//! - Definition violations and the checks that collect them
//!
//! Nothing here runs callbacks on its own; execution lives in `engine`.

mod action;
mod configuration;
mod error;
mod guard;
mod hierarchy;
mod history;
mod state;
mod transition;
pub(crate) mod validation;

pub use action::{Action, ActionError};
pub use configuration::ActiveConfiguration;
pub use error::DefinitionError;
pub use guard::Guard;
pub use hierarchy::{Ancestors, Hierarchy, StateDecl};
pub use history::{TransitionHistory, TransitionRecord, DEFAULT_HISTORY_CAPACITY};
pub use state::{Event, State};
pub use transition::{GuardCondition, Transition, TransitionKind, TransitionTable};

/// Printable label for an optional event, `"eventless"` for `None`.
pub(crate) fn event_label<E: Event>(event: Option<E>) -> String {
    match event {
        Some(event) => event.name().to_string(),
        None => "eventless".to_string(),
    }
}
