//! Chartwell: a hierarchical statechart runtime.
//!
//! A statechart is a state machine whose states may nest. Chartwell takes an
//! immutable [`MachineDefinition`] (a state tree plus a transition table) and
//! drives any number of [`MachineInstance`]s through it with run-to-completion
//! semantics.
//!
//! # Core Concepts
//!
//! - **Hierarchy**: a tree of states, each composite state naming the child
//!   it enters by default
//! - **Active configuration**: the root-to-leaf path of active states
//! - **Transitions**: guarded, external or internal, optionally eventless
//! - **Context**: caller-owned data threaded through every guard and action
//!
//! Definitions are validated once, when built. Instances record the
//! transitions they fire and can be checkpointed and resumed; see
//! [`checkpoint`].
//!
//! # Example
//!
//! ```rust
//! use chartwell::builder::{StatechartBuilder, TransitionBuilder};
//! use chartwell::{event_enum, state_enum, MachineInstance};
//! use std::sync::Arc;
//!
//! state_enum! {
//!     enum Light {
//!         Root,
//!         On,
//!         Off,
//!     }
//! }
//!
//! event_enum! {
//!     enum Input {
//!         Press,
//!         Timeout,
//!     }
//! }
//!
//! let definition = StatechartBuilder::<Light, Input, ()>::new()
//!     .root(Light::Root)
//!     .state(Light::On, Light::Root)
//!     .state(Light::Off, Light::Root)
//!     .initial(Light::Root, Light::On)
//!     .transition(TransitionBuilder::new().from(Light::On).on(Input::Timeout).to(Light::Off))
//!     .unwrap()
//!     .transition(TransitionBuilder::new().from(Light::Off).on(Input::Press).to(Light::On))
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let mut light = MachineInstance::new(Arc::new(definition), ());
//! light.init().unwrap();
//! assert_eq!(light.leaf(), Some(Light::On));
//!
//! light.handle_event(Input::Timeout).unwrap();
//! assert_eq!(light.configuration().as_slice(), &[Light::Root, Light::Off]);
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod engine;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionError, ActiveConfiguration, Event, Guard, Hierarchy, State, TransitionHistory,
    TransitionKind, TransitionRecord,
};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use engine::{EngineError, MachineDefinition, MachineInstance, Outcome, Phase};
