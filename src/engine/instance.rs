//! Running statechart instances.

use super::definition::MachineDefinition;
use super::dispatcher;
use super::error::EngineError;
use super::executor::Executor;
use crate::core::{ActiveConfiguration, Event, State, TransitionHistory};
use std::sync::Arc;
use tracing::debug;

/// Lifecycle of an instance. There is no terminal phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created, or `init` failed; `init` may be called (again).
    Uninitialized,
    /// Holding a configuration committed by `init` or a completed
    /// transition, ready for events.
    Stable,
}

/// What `handle_event` did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome<S: State> {
    /// An external transition fired; leaves before and after settling.
    Transitioned { from: S, to: S },
    /// An internal transition declared on `state` ran its actions.
    Internal { state: S },
    /// No transition matched, or every guard at the matching level failed.
    Ignored,
}

/// One running statechart: a shared definition plus per-instance
/// configuration, context, and history.
///
/// # Example
///
/// ```rust
/// use chartwell::builder::{guarded_transition, StatechartBuilder};
/// use chartwell::{event_enum, state_enum, MachineInstance, Outcome};
/// use std::sync::Arc;
///
/// state_enum! {
///     enum Door { Root, Closed, Open }
/// }
/// event_enum! {
///     enum Push { Handle }
/// }
///
/// let definition = StatechartBuilder::new()
///     .root(Door::Root)
///     .state(Door::Closed, Door::Root)
///     .state(Door::Open, Door::Root)
///     .initial(Door::Root, Door::Closed)
///     .add_transition(guarded_transition(Door::Closed, Push::Handle, Door::Open, "unlocked", |locked: &bool| !*locked))
///     .build()
///     .unwrap();
///
/// let mut door = MachineInstance::new(Arc::new(definition), true);
/// door.init().unwrap();
/// assert_eq!(door.handle_event(Push::Handle).unwrap(), Outcome::Ignored);
///
/// *door.context_mut() = false;
/// assert_eq!(
///     door.handle_event(Push::Handle).unwrap(),
///     Outcome::Transitioned { from: Door::Closed, to: Door::Open }
/// );
/// ```
pub struct MachineInstance<S: State, E: Event, C> {
    definition: Arc<MachineDefinition<S, E, C>>,
    context: C,
    configuration: ActiveConfiguration<S>,
    history: TransitionHistory<S, E>,
}

impl<S: State, E: Event, C> MachineInstance<S, E, C> {
    /// Create an uninitialized instance. No callback runs until [`init`](Self::init).
    pub fn new(definition: Arc<MachineDefinition<S, E, C>>, context: C) -> Self {
        let history = TransitionHistory::new().with_limit(definition.history_capacity());
        Self {
            definition,
            context,
            configuration: ActiveConfiguration::default(),
            history,
        }
    }

    /// Rebuild a stable instance from a saved configuration without running
    /// any callback. The caller has checked the configuration.
    pub(crate) fn restore(
        definition: Arc<MachineDefinition<S, E, C>>,
        context: C,
        configuration: ActiveConfiguration<S>,
        history: TransitionHistory<S, E>,
    ) -> Self {
        Self {
            definition,
            context,
            configuration,
            history,
        }
    }

    /// Enter the root and its initial descendants, running entry actions
    /// outermost first, then settle any transient leaf.
    ///
    /// Either the instance ends up settled, or it stays uninitialized and
    /// its history is emptied. Context changes made by actions that ran
    /// before a failure are kept.
    pub fn init(&mut self) -> Result<(), EngineError> {
        if self.is_initialized() {
            return Err(EngineError::AlreadyInitialized);
        }

        let definition = Arc::clone(&self.definition);
        let history = definition.records_history().then_some(&mut self.history);
        let mut executor = Executor::new(&definition, &mut self.context, Vec::new(), history);
        let result = executor.initialize();
        let committed = executor.into_committed();
        match result {
            Ok(()) => {
                self.commit(committed);
                Ok(())
            }
            Err(error) => {
                debug!(%error, "initialization abandoned");
                self.history.clear();
                Err(error)
            }
        }
    }

    /// Process one event to completion.
    pub fn handle_event(&mut self, event: E) -> Result<Outcome<S>, EngineError> {
        let from = self.leaf().ok_or(EngineError::NotInitialized)?;

        let definition = Arc::clone(&self.definition);
        let Some(transition) = dispatcher::select(
            &definition,
            self.configuration.as_slice(),
            Some(event),
            &self.context,
        ) else {
            debug!(state = from.name(), event = event.name(), "event ignored");
            return Ok(Outcome::Ignored);
        };

        let history = definition.records_history().then_some(&mut self.history);
        let path = self.configuration.as_slice().to_vec();
        let mut executor = Executor::new(&definition, &mut self.context, path, history);
        let result = executor.fire(transition);
        let committed = executor.into_committed();
        self.commit(committed);
        result?;

        if transition.is_internal() {
            return Ok(Outcome::Internal {
                state: transition.source,
            });
        }
        let to = self.leaf().unwrap_or(from);
        Ok(Outcome::Transitioned { from, to })
    }

    fn commit(&mut self, path: Vec<S>) {
        self.configuration = ActiveConfiguration::from_path(path);
    }

    pub fn definition(&self) -> &Arc<MachineDefinition<S, E, C>> {
        &self.definition
    }

    pub fn phase(&self) -> Phase {
        if self.configuration.is_empty() {
            Phase::Uninitialized
        } else {
            Phase::Stable
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.phase() == Phase::Stable
    }

    /// Root-to-leaf path of active states; empty before `init`.
    pub fn configuration(&self) -> &ActiveConfiguration<S> {
        &self.configuration
    }

    pub fn leaf(&self) -> Option<S> {
        self.configuration.leaf()
    }

    /// Active child of `parent`, `None` when `parent` is inactive or the leaf.
    pub fn active_child(&self, parent: S) -> Option<S> {
        self.configuration.active_child(parent)
    }

    pub fn is_active(&self, state: S) -> bool {
        self.configuration.contains(state)
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn into_context(self) -> C {
        self.context
    }

    /// Transitions fired so far, empty when history is disabled.
    pub fn history(&self) -> &TransitionHistory<S, E> {
        &self.history
    }
}

impl<S: State, E: Event, C: std::fmt::Debug> std::fmt::Debug for MachineInstance<S, E, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineInstance")
            .field("configuration", &self.configuration)
            .field("context", &self.context)
            .field("history", &self.history.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{StatechartBuilder, TransitionBuilder};
    use crate::core::{Action, ActionError};
    use crate::{event_enum, state_enum};

    state_enum! {
        enum TestState { Root, Idle, Ping, Pong, Broken }
    }

    event_enum! {
        enum TestEvent { Go, Break, Nothing }
    }

    #[derive(Debug, Default)]
    struct Ctx {
        bounce: bool,
        log: Vec<&'static str>,
    }

    fn builder() -> StatechartBuilder<TestState, TestEvent, Ctx> {
        builder_from(TestState::Idle)
    }

    fn builder_from(initial: TestState) -> StatechartBuilder<TestState, TestEvent, Ctx> {
        StatechartBuilder::new()
            .root(TestState::Root)
            .state(TestState::Idle, TestState::Root)
            .state(TestState::Ping, TestState::Root)
            .state(TestState::Pong, TestState::Root)
            .state(TestState::Broken, TestState::Root)
            .initial(TestState::Root, initial)
            .on_exit(TestState::Idle, Action::new("log idle exit", |c: &mut Ctx| c.log.push("exit idle")))
            .on_entry(
                TestState::Broken,
                Action::fallible("refuse entry", |c: &mut Ctx| {
                    c.log.push("enter broken");
                    Err(ActionError::new("broken"))
                }),
            )
            .transition(TransitionBuilder::new().from(TestState::Idle).on(TestEvent::Go).to(TestState::Ping))
            .unwrap()
            .transition(TransitionBuilder::new().from(TestState::Idle).on(TestEvent::Break).to(TestState::Broken))
            .unwrap()
            .transition(
                TransitionBuilder::new()
                    .from(TestState::Ping)
                    .eventless()
                    .when("bounce", |c: &Ctx| c.bounce)
                    .to(TestState::Pong),
            )
            .unwrap()
            .transition(
                TransitionBuilder::new()
                    .from(TestState::Pong)
                    .eventless()
                    .when("bounce", |c: &Ctx| c.bounce)
                    .to(TestState::Ping),
            )
            .unwrap()
            .transition(TransitionBuilder::new().from(TestState::Ping).on(TestEvent::Go).to(TestState::Idle))
            .unwrap()
            .transition(TransitionBuilder::new().from(TestState::Broken).on(TestEvent::Go).to(TestState::Idle))
            .unwrap()
    }

    fn instance(bounce: bool) -> MachineInstance<TestState, TestEvent, Ctx> {
        let definition = builder().build().unwrap();
        MachineInstance::new(
            Arc::new(definition),
            Ctx {
                bounce,
                ..Ctx::default()
            },
        )
    }

    #[test]
    fn events_before_init_are_rejected() {
        let mut machine = instance(false);

        assert_eq!(machine.phase(), Phase::Uninitialized);
        assert!(machine.configuration().is_empty());
        assert!(matches!(
            machine.handle_event(TestEvent::Go),
            Err(EngineError::NotInitialized)
        ));
    }

    #[test]
    fn init_twice_is_rejected() {
        let mut machine = instance(false);
        machine.init().unwrap();

        assert_eq!(machine.phase(), Phase::Stable);
        assert!(matches!(machine.init(), Err(EngineError::AlreadyInitialized)));
        assert_eq!(machine.leaf(), Some(TestState::Idle));
    }

    #[test]
    fn failed_entry_during_init_leaves_instance_uninitialized() {
        let definition = builder_from(TestState::Broken).build().unwrap();
        let mut machine = MachineInstance::new(Arc::new(definition), Ctx::default());

        let error = machine.init().unwrap_err();

        assert!(matches!(error, EngineError::ActionFailed { .. }));
        assert_eq!(machine.phase(), Phase::Uninitialized);
        assert!(machine.configuration().is_empty());
        assert_eq!(machine.context().log, vec!["enter broken"]);
        // Still uninitialized, so another attempt runs the entries again.
        assert!(matches!(machine.init(), Err(EngineError::ActionFailed { .. })));
        assert_eq!(machine.context().log, vec!["enter broken", "enter broken"]);
    }

    #[test]
    fn transient_loop_during_init_leaves_instance_uninitialized() {
        let definition = builder_from(TestState::Ping).max_transient_chain(3).build().unwrap();
        let mut machine = MachineInstance::new(
            Arc::new(definition),
            Ctx {
                bounce: true,
                ..Ctx::default()
            },
        );

        let error = machine.init().unwrap_err();

        assert!(matches!(error, EngineError::TransientLoop { limit: 3, .. }));
        assert_eq!(machine.phase(), Phase::Uninitialized);
        assert_eq!(machine.leaf(), None);
        assert!(machine.history().is_empty());

        machine.context_mut().bounce = false;
        machine.init().unwrap();
        assert_eq!(machine.phase(), Phase::Stable);
        assert_eq!(machine.leaf(), Some(TestState::Ping));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn history_keeps_only_the_newest_records() {
        let definition = builder().history_capacity(4).build().unwrap();
        let mut machine = MachineInstance::new(Arc::new(definition), Ctx::default());
        machine.init().unwrap();

        for _ in 0..10 {
            machine.handle_event(TestEvent::Go).unwrap();
            machine.handle_event(TestEvent::Go).unwrap();
        }

        assert_eq!(machine.history().len(), 4);
        assert_eq!(machine.history().limit(), Some(4));
        let newest = machine.history().records().back().unwrap();
        assert_eq!(newest.from_leaf, TestState::Ping);
        assert_eq!(newest.to_leaf, TestState::Idle);
    }

    #[test]
    fn unmatched_event_is_ignored() {
        let mut machine = instance(false);
        machine.init().unwrap();

        let outcome = machine.handle_event(TestEvent::Nothing).unwrap();

        assert_eq!(outcome, Outcome::Ignored);
        assert_eq!(machine.leaf(), Some(TestState::Idle));
        assert!(machine.context().log.is_empty());
        assert!(machine.history().is_empty());
    }

    #[test]
    fn guarded_transient_settles_when_guard_fails() {
        let mut machine = instance(false);
        machine.init().unwrap();

        let outcome = machine.handle_event(TestEvent::Go).unwrap();

        assert_eq!(
            outcome,
            Outcome::Transitioned {
                from: TestState::Idle,
                to: TestState::Ping
            }
        );
        assert!(machine.is_active(TestState::Ping));
        assert_eq!(machine.active_child(TestState::Root), Some(TestState::Ping));
    }

    #[test]
    fn runaway_transient_chain_is_stopped() {
        let mut machine = instance(true);
        machine.init().unwrap();

        let error = machine.handle_event(TestEvent::Go).unwrap_err();

        match error {
            EngineError::TransientLoop { chain, limit } => {
                assert_eq!(limit, 5);
                assert_eq!(chain.len(), 6);
                assert_eq!(chain.first().map(String::as_str), Some("Ping"));
            }
            other => panic!("Expected TransientLoop, got {other:?}"),
        }
        // Every completed step was committed.
        assert_eq!(machine.leaf(), Some(TestState::Pong));
        assert_eq!(machine.history().len(), 6);
    }

    #[test]
    fn configured_chain_limit_applies() {
        let definition = builder().max_transient_chain(1).build().unwrap();
        let mut machine = MachineInstance::new(
            Arc::new(definition),
            Ctx {
                bounce: true,
                ..Ctx::default()
            },
        );
        machine.init().unwrap();

        let error = machine.handle_event(TestEvent::Go).unwrap_err();
        assert!(matches!(error, EngineError::TransientLoop { limit: 1, .. }));
        assert_eq!(machine.leaf(), Some(TestState::Pong));
    }

    #[test]
    fn failed_entry_keeps_previous_configuration() {
        let mut machine = instance(false);
        machine.init().unwrap();

        let error = machine.handle_event(TestEvent::Break).unwrap_err();

        match error {
            EngineError::ActionFailed { label, source } => {
                assert_eq!(label, "refuse entry");
                assert_eq!(source.message(), "broken");
            }
            other => panic!("Expected ActionFailed, got {other:?}"),
        }
        assert_eq!(machine.leaf(), Some(TestState::Idle));
        assert_eq!(machine.context().log, vec!["exit idle", "enter broken"]);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn history_can_be_disabled() {
        let definition = builder().record_history(false).build().unwrap();
        let mut machine = MachineInstance::new(Arc::new(definition), Ctx::default());
        machine.init().unwrap();
        machine.handle_event(TestEvent::Go).unwrap();

        assert_eq!(machine.leaf(), Some(TestState::Ping));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn history_records_fired_transitions() {
        let mut machine = instance(false);
        machine.init().unwrap();
        machine.handle_event(TestEvent::Go).unwrap();

        let records = machine.history().records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].from_leaf, TestState::Idle);
        assert_eq!(records[0].to_leaf, TestState::Ping);
        assert_eq!(records[0].event, Some(TestEvent::Go));
    }

    #[test]
    fn into_context_returns_caller_data() {
        let mut machine = instance(false);
        machine.init().unwrap();
        machine.handle_event(TestEvent::Go).unwrap();

        let context = machine.into_context();
        assert_eq!(context.log, vec!["exit idle"]);
    }
}
