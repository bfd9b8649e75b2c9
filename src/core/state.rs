//! Identity traits for states and events.
//!
//! States and events are plain identifiers. A statechart design supplies a
//! closed enumeration for each and the engine only ever copies, hashes and
//! compares them.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identifiers.
///
/// A state id names one node of the hierarchy. Ids are small `Copy` values,
/// usually fieldless enums generated with [`state_enum!`](crate::state_enum).
///
/// # Required Traits
///
/// - `Copy` + `Eq` + `Hash`: ids key the hierarchy and transition table
/// - `Debug`: ids show up in diagnostics
/// - `Serialize` + `Deserialize`: configurations are checkpointed
///
/// # Example
///
/// ```rust
/// use chartwell::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Root,
///     Open,
///     Closed,
/// }
///
/// impl State for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Root => "Root",
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// assert_eq!(Door::Open.name(), "Open");
/// ```
pub trait State:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for event identifiers.
///
/// Events carry no payload; anything a guard or action needs to know about
/// the outside world travels in the context instead.
pub trait Event:
    Copy + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the event's name for display/logging.
    fn name(&self) -> &str;
}
