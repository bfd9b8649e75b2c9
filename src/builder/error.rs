//! Errors raised while building a statechart definition.

use crate::core::DefinitionError;
use thiserror::Error;

/// Errors that can occur when building statechart definitions and transitions.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Malformed state hierarchy: {}", render(.0))]
    MalformedHierarchy(Vec<DefinitionError>),

    #[error("Invalid statechart definition: {}", render(.0))]
    InvalidDefinition(Vec<DefinitionError>),

    #[error("Eventless transitions never settle: {}", .cycle.join(" -> "))]
    TransientLoop { cycle: Vec<String> },

    #[error("Transition source state not specified. Call .from(state)")]
    MissingSource,

    #[error("Transition trigger not specified. Call .on(event) or .eventless()")]
    MissingTrigger,

    #[error("Transition target state not specified. Call .to(state) or .internal()")]
    MissingTarget,
}

impl BuildError {
    /// Individual violations, empty for errors that are not lists.
    pub fn violations(&self) -> &[DefinitionError] {
        match self {
            Self::MalformedHierarchy(errors) | Self::InvalidDefinition(errors) => errors,
            _ => &[],
        }
    }
}

fn render(errors: &[DefinitionError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
