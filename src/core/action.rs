//! Actions run on entry, on exit, and while a transition fires.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure reported by a fallible action.
///
/// The engine does not interpret it; it is handed back to whoever called
/// `init` or `handle_event`.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct ActionError {
    message: String,
}

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for ActionError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ActionError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

type ActionFn<C> = Arc<dyn Fn(&mut C) -> Result<(), ActionError> + Send + Sync>;

/// Labelled side effect on the caller's context.
///
/// # Example
///
/// ```rust
/// use chartwell::core::{Action, ActionError};
///
/// let bump = Action::new("count += 1", |count: &mut u32| *count += 1);
/// let refuse = Action::fallible("refuse", |_: &mut u32| Err(ActionError::new("nope")));
///
/// let mut count = 0;
/// bump.run(&mut count).unwrap();
/// assert_eq!(count, 1);
/// assert!(refuse.run(&mut count).is_err());
/// ```
pub struct Action<C> {
    label: String,
    run: ActionFn<C>,
}

impl<C> Action<C> {
    /// Wrap an infallible closure.
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            run: Arc::new(move |context: &mut C| {
                action(context);
                Ok(())
            }),
        }
    }

    /// Wrap a closure that may fail.
    pub fn fallible<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut C) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            run: Arc::new(action),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Run the action once against the context.
    pub fn run(&self, context: &mut C) -> Result<(), ActionError> {
        (self.run)(context)
    }
}

impl<C> Clone for Action<C> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

impl<C> fmt::Debug for Action<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("label", &self.label).finish()
    }
}
