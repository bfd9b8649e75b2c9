//! Violations found in a statechart definition.

use thiserror::Error;

/// A single problem found in a statechart definition.
///
/// Validation does not stop at the first problem; a failed build reports
/// every violation it found.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DefinitionError {
    #[error("State \"{state}\" is declared more than once")]
    DuplicateState { state: String },

    #[error("No root state declared. Call .root(state)")]
    NoRoot,

    #[error("Only one root state allowed, found: {}", .roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    #[error("State \"{state}\" names undeclared parent \"{parent}\"")]
    UnknownParent { state: String, parent: String },

    #[error("State \"{state}\" is not declared")]
    UnknownState { state: String },

    #[error("Composite state \"{state}\" has no initial child. Call .initial(parent, child)")]
    MissingInitialChild { state: String },

    #[error("Initial state \"{initial}\" is not a child of \"{state}\"")]
    InvalidInitialChild { state: String, initial: String },

    #[error("State \"{state}\" is part of a parent cycle")]
    Cycle { state: String },

    #[error("State \"{state}\" is unreachable")]
    UnreachableState { state: String },

    #[error("Transition on \"{event}\" declared on undeclared state \"{state}\"")]
    UnknownSource { state: String, event: String },

    #[error("Invalid transition target \"{target}\" in state \"{state}\"")]
    UnknownTarget { state: String, target: String },

    #[error("Internal transition in \"{state}\" must target itself, not \"{target}\"")]
    InternalTargetMismatch { state: String, target: String },

    #[error("Guard \"{guard}\" not unique for event \"{event}\" in state \"{state}\"")]
    DuplicateGuard {
        state: String,
        event: String,
        guard: String,
    },

    #[error("Otherwise alternative must be last for event \"{event}\" in state \"{state}\"")]
    OtherwiseNotLast { state: String, event: String },

    #[error("More than one otherwise alternative for event \"{event}\" in state \"{state}\"")]
    DuplicateOtherwise { state: String, event: String },

    #[error("Event \"{event}\" in state \"{state}\" has an otherwise alternative but no guarded one")]
    OnlyOtherwise { state: String, event: String },

    #[error("Unguarded alternative hides later ones for event \"{event}\" in state \"{state}\"")]
    ShadowedAlternative { state: String, event: String },

    #[error("Eventless transitions are only allowed on leaf states, not \"{state}\"")]
    EventlessOnComposite { state: String },

    #[error("Eventless transition in \"{state}\" cannot be internal")]
    EventlessInternal { state: String },
}
