//! Execution of statechart definitions.
//!
//! A [`MachineDefinition`] is the validated, immutable product of the
//! builder. A [`MachineInstance`] pairs a shared definition with its own
//! active configuration and context, and processes one event at a time with
//! run-to-completion semantics.

mod definition;
mod dispatcher;
mod error;
mod executor;
mod instance;

pub use definition::{MachineDefinition, StateActions};
pub use error::EngineError;
pub use instance::{MachineInstance, Outcome, Phase};
