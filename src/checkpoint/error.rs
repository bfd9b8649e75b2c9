//! Checkpoint error types.

use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Checkpoint was written by an incompatible format version
    #[error("Unsupported checkpoint version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Saved configuration is not a root-to-leaf path of the definition
    #[error("Checkpoint configuration does not fit the definition: {}", .path.join(" / "))]
    InconsistentConfiguration { path: Vec<String> },

    /// Only initialized instances can be checkpointed
    #[error("Cannot checkpoint an uninitialized machine")]
    Uninitialized,
}
