//! Runtime errors.

use crate::core::ActionError;
use thiserror::Error;

/// Errors returned by [`MachineInstance`](super::MachineInstance) operations.
///
/// Unmatched events and guards that all evaluate false are not errors; they
/// yield [`Outcome::Ignored`](super::Outcome::Ignored).
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Machine is not initialized. Call .init() first")]
    NotInitialized,

    #[error("Machine is already initialized")]
    AlreadyInitialized,

    #[error("Eventless transitions did not settle within {limit} steps: {}", .chain.join(" -> "))]
    TransientLoop { chain: Vec<String>, limit: usize },

    #[error("Action \"{label}\" failed: {source}")]
    ActionFailed {
        label: String,
        #[source]
        source: ActionError,
    },
}
