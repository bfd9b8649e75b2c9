//! Guard predicates for gating transitions.
//!
//! Guards are boolean functions over the caller's context. The engine may
//! evaluate a guard any number of times, so guards must not mutate anything.

use std::fmt;
use std::sync::Arc;

/// Pure predicate that determines if a transition can fire.
///
/// Every guard carries a label. Labels identify alternatives when a state
/// defines several guarded transitions for one event, and they name the
/// guard in log output.
///
/// # Example
///
/// ```rust
/// use chartwell::core::Guard;
///
/// struct Sensor {
///     reading: i32,
/// }
///
/// let too_hot = Guard::new("reading > 90", |s: &Sensor| s.reading > 90);
///
/// assert!(too_hot.check(&Sensor { reading: 95 }));
/// assert!(!too_hot.check(&Sensor { reading: 20 }));
/// assert_eq!(too_hot.label(), "reading > 90");
/// ```
pub struct Guard<C> {
    label: String,
    predicate: Arc<dyn Fn(&C) -> bool + Send + Sync>,
}

impl<C> Guard<C> {
    /// Create a guard from a label and a pure predicate.
    ///
    /// The predicate must be deterministic for a given context and
    /// thread-safe (Send + Sync).
    pub fn new<F>(label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        Guard {
            label: label.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Evaluate the guard against the context.
    pub fn check(&self, context: &C) -> bool {
        (self.predicate)(context)
    }
}

impl<C> Clone for Guard<C> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<C> fmt::Debug for Guard<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").field("label", &self.label).finish()
    }
}
