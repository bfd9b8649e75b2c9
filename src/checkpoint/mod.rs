//! Checkpoint and resume for statechart instances.
//!
//! A checkpoint captures where an instance is (its active configuration) and
//! how it got there (its transition history). Definitions and contexts are
//! not part of it: callbacks cannot be serialized, and the context belongs
//! to the caller, who supplies both again on resume.

use crate::core::{ActiveConfiguration, Event, State, TransitionHistory};
use crate::engine::{MachineDefinition, MachineInstance};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

pub mod error;

pub use error::CheckpointError;

/// Version identifier for checkpoint format
pub const CHECKPOINT_VERSION: u32 = 1;

/// Serializable snapshot of a running instance.
/// Does NOT include actions, guards, or the context.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Checkpoint<S: State, E: Event> {
    /// Checkpoint format version
    pub version: u32,

    /// Unique checkpoint identifier
    pub id: String,

    /// When checkpoint was created
    pub timestamp: DateTime<Utc>,

    /// Root-to-leaf active path
    pub configuration: Vec<S>,

    /// Transitions fired before the checkpoint
    pub history: TransitionHistory<S, E>,
}

impl<S: State, E: Event> Checkpoint<S, E> {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, CheckpointError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Parse JSON and check the format version.
    pub fn from_json(json: &str) -> Result<Self, CheckpointError> {
        let checkpoint: Self = serde_json::from_str(json)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    /// Serialize to compact bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CheckpointError> {
        bincode::serialize(self).map_err(|e| CheckpointError::SerializationFailed(e.to_string()))
    }

    /// Decode bincode and check the format version.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CheckpointError> {
        let checkpoint: Self = bincode::deserialize(bytes)
            .map_err(|e| CheckpointError::DeserializationFailed(e.to_string()))?;
        checkpoint.check_version()?;
        Ok(checkpoint)
    }

    fn check_version(&self) -> Result<(), CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::UnsupportedVersion {
                found: self.version,
                supported: CHECKPOINT_VERSION,
            });
        }
        Ok(())
    }
}

impl<S: State, E: Event, C> MachineInstance<S, E, C> {
    /// Snapshot the active configuration and history.
    pub fn checkpoint(&self) -> Result<Checkpoint<S, E>, CheckpointError> {
        if !self.is_initialized() {
            return Err(CheckpointError::Uninitialized);
        }

        Ok(Checkpoint {
            version: CHECKPOINT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            configuration: self.configuration().as_slice().to_vec(),
            history: self.history().clone(),
        })
    }

    /// Recreate an instance from a checkpoint.
    ///
    /// The instance comes back stable at the saved configuration; no entry
    /// action runs. The saved path must be a root-to-leaf path of
    /// `definition`.
    pub fn resume(
        definition: Arc<MachineDefinition<S, E, C>>,
        context: C,
        checkpoint: Checkpoint<S, E>,
    ) -> Result<Self, CheckpointError> {
        checkpoint.check_version()?;

        let configuration = ActiveConfiguration::from_path(checkpoint.configuration);
        if !configuration.is_consistent_with(definition.hierarchy()) {
            return Err(CheckpointError::InconsistentConfiguration {
                path: configuration.iter().map(|s| s.name().to_string()).collect(),
            });
        }

        debug!(id = %checkpoint.id, leaf = ?configuration.leaf(), "resuming from checkpoint");
        let history = checkpoint.history.with_limit(definition.history_capacity());
        Ok(Self::restore(definition, context, configuration, history))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{simple_transition, StatechartBuilder};
    use crate::core::{Action, DEFAULT_HISTORY_CAPACITY};
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState { Root, Working, Fetching, Parsing, Done }
    }

    event_enum! {
        enum TestEvent { Fetched, Parsed }
    }

    fn definition() -> Arc<MachineDefinition<TestState, TestEvent, u32>> {
        definition_keeping(DEFAULT_HISTORY_CAPACITY)
    }

    fn definition_keeping(capacity: usize) -> Arc<MachineDefinition<TestState, TestEvent, u32>> {
        let definition = StatechartBuilder::new()
            .root(TestState::Root)
            .state(TestState::Working, TestState::Root)
            .state(TestState::Fetching, TestState::Working)
            .state(TestState::Parsing, TestState::Working)
            .state(TestState::Done, TestState::Root)
            .initial(TestState::Root, TestState::Working)
            .initial(TestState::Working, TestState::Fetching)
            .on_entry(TestState::Parsing, Action::new("count", |n: &mut u32| *n += 1))
            .add_transition(simple_transition(
                TestState::Fetching,
                TestEvent::Fetched,
                TestState::Parsing,
            ))
            .add_transition(simple_transition(
                TestState::Parsing,
                TestEvent::Parsed,
                TestState::Done,
            ))
            .history_capacity(capacity)
            .build()
            .unwrap();
        Arc::new(definition)
    }

    fn running() -> MachineInstance<TestState, TestEvent, u32> {
        let mut machine = MachineInstance::new(definition(), 0);
        machine.init().unwrap();
        machine.handle_event(TestEvent::Fetched).unwrap();
        machine
    }

    #[test]
    fn uninitialized_machine_cannot_checkpoint() {
        let machine = MachineInstance::new(definition(), 0);
        assert!(matches!(machine.checkpoint(), Err(CheckpointError::Uninitialized)));
    }

    #[test]
    fn checkpoint_captures_configuration() {
        let checkpoint = running().checkpoint().unwrap();

        assert_eq!(checkpoint.version, CHECKPOINT_VERSION);
        assert!(uuid::Uuid::parse_str(&checkpoint.id).is_ok());
        assert_eq!(
            checkpoint.configuration,
            vec![TestState::Root, TestState::Working, TestState::Parsing]
        );
        assert_eq!(checkpoint.history.len(), 1);
    }

    #[test]
    fn checkpoint_ids_are_unique() {
        let machine = running();
        let first = machine.checkpoint().unwrap();
        let second = machine.checkpoint().unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn json_checkpoint_resumes() {
        let json = running().checkpoint().unwrap().to_json().unwrap();
        let checkpoint = Checkpoint::from_json(&json).unwrap();

        // Entry actions do not rerun on resume, so the context is as supplied.
        let mut machine = MachineInstance::resume(definition(), 7, checkpoint).unwrap();
        assert_eq!(machine.leaf(), Some(TestState::Parsing));
        assert_eq!(*machine.context(), 7);
        assert_eq!(machine.history().len(), 1);

        machine.handle_event(TestEvent::Parsed).unwrap();
        assert_eq!(machine.leaf(), Some(TestState::Done));
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn resumed_history_takes_the_definition_capacity() {
        let mut machine = running();
        machine.handle_event(TestEvent::Parsed).unwrap();
        let checkpoint = machine.checkpoint().unwrap();
        assert_eq!(checkpoint.history.len(), 2);

        let resumed = MachineInstance::resume(definition_keeping(1), 0, checkpoint).unwrap();
        assert_eq!(resumed.history().limit(), Some(1));
        assert_eq!(resumed.history().leaf_path(), vec![TestState::Parsing, TestState::Done]);
    }

    #[test]
    fn binary_checkpoint_resumes() {
        let bytes = running().checkpoint().unwrap().to_bytes().unwrap();
        let checkpoint: Checkpoint<TestState, TestEvent> = Checkpoint::from_bytes(&bytes).unwrap();

        let machine = MachineInstance::resume(definition(), 0, checkpoint).unwrap();
        assert_eq!(machine.active_child(TestState::Working), Some(TestState::Parsing));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let mut checkpoint = running().checkpoint().unwrap();
        checkpoint.version = 99;
        let json = checkpoint.to_json().unwrap();

        let result = Checkpoint::<TestState, TestEvent>::from_json(&json);
        assert!(matches!(
            result,
            Err(CheckpointError::UnsupportedVersion {
                found: 99,
                supported: CHECKPOINT_VERSION
            })
        ));
    }

    #[test]
    fn inconsistent_configuration_is_rejected() {
        let mut checkpoint = running().checkpoint().unwrap();
        checkpoint.configuration = vec![TestState::Root, TestState::Parsing];

        let result = MachineInstance::resume(definition(), 0, checkpoint);
        match result {
            Err(CheckpointError::InconsistentConfiguration { path }) => {
                assert_eq!(path, vec!["Root", "Parsing"]);
            }
            _ => panic!("Expected InconsistentConfiguration"),
        }
    }

    #[test]
    fn garbage_input_fails_to_deserialize() {
        let result = Checkpoint::<TestState, TestEvent>::from_json("not json");
        assert!(matches!(result, Err(CheckpointError::DeserializationFailed(_))));
    }
}
