//! Builder for constructing transitions.

use crate::builder::error::BuildError;
use crate::core::{Action, Event, Guard, GuardCondition, State, Transition, TransitionKind};

/// Builder for constructing transitions with a fluent API.
///
/// # Example
///
/// ```rust
/// use chartwell::builder::TransitionBuilder;
/// use chartwell::core::Transition;
/// use chartwell::{event_enum, state_enum};
///
/// state_enum! {
///     enum Valve { Root, Open, Shut }
/// }
/// event_enum! {
///     enum Cmd { Close }
/// }
///
/// let transition: Transition<Valve, Cmd, u32> = TransitionBuilder::new()
///     .from(Valve::Open)
///     .on(Cmd::Close)
///     .when("pressure ok", |pressure: &u32| *pressure < 100)
///     .run("count closes", |_pressure: &mut u32| {})
///     .to(Valve::Shut)
///     .build()
///     .unwrap();
///
/// assert!(transition.can_fire(&20));
/// assert!(!transition.can_fire(&120));
/// ```
pub struct TransitionBuilder<S: State, E: Event, C> {
    source: Option<S>,
    trigger: Option<Option<E>>,
    target: Option<S>,
    guard: GuardCondition<C>,
    actions: Vec<Action<C>>,
    kind: TransitionKind,
}

impl<S: State, E: Event, C> TransitionBuilder<S, E, C> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            source: None,
            trigger: None,
            target: None,
            guard: GuardCondition::Always,
            actions: Vec::new(),
            kind: TransitionKind::External,
        }
    }

    /// Set the state declaring the transition (required).
    pub fn from(mut self, state: S) -> Self {
        self.source = Some(state);
        self
    }

    /// Trigger on `event`.
    pub fn on(mut self, event: E) -> Self {
        self.trigger = Some(Some(event));
        self
    }

    /// Fire as soon as the source leaf is entered.
    pub fn eventless(mut self) -> Self {
        self.trigger = Some(None);
        self
    }

    /// Set the target state (required unless internal).
    pub fn to(mut self, state: S) -> Self {
        self.target = Some(state);
        self
    }

    /// Make this an internal transition: actions only, no exit or entry.
    pub fn internal(mut self) -> Self {
        self.kind = TransitionKind::Internal;
        self
    }

    /// Gate the transition on a guard.
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.guard = GuardCondition::When(guard);
        self
    }

    /// Gate the transition on a closure.
    pub fn when<F>(self, label: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(label, predicate))
    }

    /// Take this alternative when no earlier one for the same event did.
    pub fn otherwise(mut self) -> Self {
        self.guard = GuardCondition::Otherwise;
        self
    }

    /// Append an action; actions run in the order added.
    pub fn action(mut self, action: Action<C>) -> Self {
        self.actions.push(action);
        self
    }

    /// Append an infallible closure as an action.
    pub fn run<F>(self, label: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.action(Action::new(label, action))
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, E, C>, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let event = self.trigger.ok_or(BuildError::MissingTrigger)?;
        let target = match (self.target, self.kind) {
            (Some(target), _) => target,
            (None, TransitionKind::Internal) => source,
            (None, TransitionKind::External) => return Err(BuildError::MissingTarget),
        };

        Ok(Transition {
            source,
            event,
            guard: self.guard,
            actions: self.actions,
            target,
            kind: self.kind,
        })
    }
}

impl<S: State, E: Event, C> Default for TransitionBuilder<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}
