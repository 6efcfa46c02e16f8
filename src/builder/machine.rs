//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{Behavior, Clock, Guard, State, StateHistory, SystemClock, DEFAULT_HISTORY_CAPACITY};
use crate::engine::{Action, Route, StateMachine, StateSlot, Transition, Trigger};

/// Builder for constructing state machines with a fluent API.
///
/// States must be registered before any transition that names them. Every
/// fallible step returns `Result<Self, BuildError>` so setup stops at the
/// first configuration mistake.
///
/// ```rust
/// use tickstate::builder::{StateMachineBuilder, TransitionBuilder};
/// use tickstate::state_enum;
///
/// state_enum! {
///     enum Mode { Idle, Intaking }
/// }
///
/// struct Robot { should_intake: bool }
///
/// # fn main() -> Result<(), tickstate::builder::BuildError> {
/// let mut machine = StateMachineBuilder::<Mode, Robot>::new()
///     .state(Mode::Idle, ())?
///     .state(Mode::Intaking, ())?
///     .transition(
///         TransitionBuilder::new()
///             .from(Mode::Idle)
///             .when(|r: &Robot| r.should_intake)
///             .to(Mode::Intaking),
///     )?
///     .initial(Mode::Idle)
///     .build()?;
///
/// let mut robot = Robot { should_intake: true };
/// machine.tick(&mut robot);
/// assert!(machine.in_state(&Mode::Intaking));
/// # Ok(())
/// # }
/// ```
pub struct StateMachineBuilder<S: State, C, T = ()> {
    initial: Option<S>,
    slots: Vec<StateSlot<S, C, T>>,
    default_entry: Option<Action<S, C>>,
    default_exit: Option<Action<S, C>>,
    clock: Option<Box<dyn Clock>>,
    history_capacity: usize,
}

impl<S: State, C, T: Trigger> StateMachineBuilder<S, C, T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            slots: Vec::new(),
            default_entry: None,
            default_exit: None,
            clock: None,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }

    /// Register a state with its behavior. Use `()` for a state with no hooks.
    pub fn state<B>(mut self, state: S, behavior: B) -> Result<Self, BuildError>
    where
        B: Behavior<S, C> + 'static,
    {
        if state.name().trim().is_empty() {
            return Err(BuildError::EmptyStateName {
                state: format!("{:?}", state),
            });
        }
        if self.index_of(&state).is_some() {
            return Err(BuildError::DuplicateState {
                state: state.name().to_string(),
            });
        }
        self.slots.push(StateSlot::new(state, Box::new(behavior)));
        Ok(self)
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a transition using a builder.
    pub fn transition(self, builder: TransitionBuilder<S, C, T>) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.add_transition(transition)
    }

    /// Add a pre-built transition.
    ///
    /// Both ends must be registered. A trigger-keyed transition with the same
    /// trigger, target and internal flag as one already on the source state is
    /// ignored, guards or not; the first registration is kept. Condition-driven
    /// transitions are only ignored when both are unconditional.
    pub fn add_transition(mut self, transition: Transition<S, C, T>) -> Result<Self, BuildError> {
        let source = self.require(&transition.from)?;
        let target = self.require(&transition.to)?;
        let slot = &mut self.slots[source];

        if slot
            .routes
            .iter()
            .any(|route| route.transition.duplicates(&transition))
        {
            tracing::debug!(
                from = transition.from.name(),
                to = transition.to.name(),
                trigger = ?transition.trigger,
                "ignoring duplicate permit"
            );
            return Ok(self);
        }

        if let Some(timeout) = transition.condition.timeout() {
            if slot.timeout.is_some() {
                return Err(BuildError::DuplicateTimeout {
                    state: transition.from.name().to_string(),
                });
            }
            slot.timeout = Some(timeout);
        }

        slot.routes.push(Route { target, transition });
        Ok(self)
    }

    /// Add multiple pre-built transitions at once.
    pub fn transitions(
        self,
        transitions: impl IntoIterator<Item = Transition<S, C, T>>,
    ) -> Result<Self, BuildError> {
        transitions
            .into_iter()
            .try_fold(self, |builder, transition| builder.add_transition(transition))
    }

    /// Allow `from` to move to `to` whenever `trigger` is fired.
    pub fn permit(self, from: S, trigger: T, to: S) -> Result<Self, BuildError> {
        self.transition(TransitionBuilder::new().from(from).on(trigger).to(to))
    }

    /// Allow `from` to move to `to` when `trigger` is fired and `guard` holds.
    pub fn permit_if<F>(self, from: S, trigger: T, to: S, guard: F) -> Result<Self, BuildError>
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.transition(
            TransitionBuilder::new()
                .from(from)
                .on(trigger)
                .guard(Guard::new(guard))
                .to(to),
        )
    }

    /// Like [`permit`](Self::permit), without running entry or exit hooks.
    pub fn permit_internal(self, from: S, trigger: T, to: S) -> Result<Self, BuildError> {
        self.transition(
            TransitionBuilder::new()
                .from(from)
                .on(trigger)
                .internal()
                .to(to),
        )
    }

    /// Like [`permit_if`](Self::permit_if), without running entry or exit hooks.
    pub fn permit_internal_if<F>(
        self,
        from: S,
        trigger: T,
        to: S,
        guard: F,
    ) -> Result<Self, BuildError>
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.transition(
            TransitionBuilder::new()
                .from(from)
                .on(trigger)
                .guard(Guard::new(guard))
                .internal()
                .to(to),
        )
    }

    /// Action run on entry to every state without its own entry action.
    pub fn default_on_entry<F>(mut self, action: F) -> Self
    where
        F: FnMut(&S, &mut C) + Send + 'static,
    {
        self.default_entry = Some(Box::new(action));
        self
    }

    /// Action run on exit from every state without its own exit action.
    pub fn default_on_exit<F>(mut self, action: F) -> Self
    where
        F: FnMut(&S, &mut C) + Send + 'static,
    {
        self.default_exit = Some(Box::new(action));
        self
    }

    /// Entry action for `state`, replacing the machine default.
    pub fn on_entry_of<F>(mut self, state: &S, action: F) -> Result<Self, BuildError>
    where
        F: FnMut(&S, &mut C) + Send + 'static,
    {
        let index = self.require(state)?;
        self.slots[index].entry.action = Some(Box::new(action));
        Ok(self)
    }

    /// Exit action for `state`, replacing the machine default.
    pub fn on_exit_of<F>(mut self, state: &S, action: F) -> Result<Self, BuildError>
    where
        F: FnMut(&S, &mut C) + Send + 'static,
    {
        let index = self.require(state)?;
        self.slots[index].exit.action = Some(Box::new(action));
        Ok(self)
    }

    /// Stop the machine default entry action from running for `state`.
    pub fn disable_default_entry(mut self, state: &S) -> Result<Self, BuildError> {
        let index = self.require(state)?;
        self.slots[index].entry.use_default = false;
        Ok(self)
    }

    /// Stop the machine default exit action from running for `state`.
    pub fn disable_default_exit(mut self, state: &S) -> Result<Self, BuildError> {
        let index = self.require(state)?;
        self.slots[index].exit.use_default = false;
        Ok(self)
    }

    /// Clock used for timeouts and timestamps. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    /// Number of applied transitions kept in the machine's history.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Build the state machine.
    ///
    /// The initial state becomes current; its entry hooks do not run until
    /// [`StateMachine::start`] is called.
    pub fn build(self) -> Result<StateMachine<S, C, T>, BuildError> {
        let initial = self.initial.as_ref().ok_or(BuildError::MissingInitialState)?;
        let initial = self.require(initial)?;
        let clock = self.clock.unwrap_or_else(|| Box::new(SystemClock));

        Ok(StateMachine::new(
            self.slots,
            initial,
            self.default_entry,
            self.default_exit,
            clock,
            StateHistory::with_capacity(self.history_capacity),
        ))
    }

    fn index_of(&self, state: &S) -> Option<usize> {
        self.slots.iter().position(|slot| &slot.id == state)
    }

    fn require(&self, state: &S) -> Result<usize, BuildError> {
        self.index_of(state).ok_or_else(|| BuildError::UnknownState {
            state: state.name().to_string(),
        })
    }
}

impl<S: State, C, T: Trigger> Default for StateMachineBuilder<S, C, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Intaking,
        Scoring,
        Unnamed,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Intaking => "Intaking",
                Self::Scoring => "Scoring",
                Self::Unnamed => "",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Button {
        A,
        B,
    }

    type Builder = StateMachineBuilder<TestState, (), Button>;

    fn registered() -> Builder {
        Builder::new()
            .state(TestState::Idle, ())
            .and_then(|b| b.state(TestState::Intaking, ()))
            .and_then(|b| b.state(TestState::Scoring, ()))
            .unwrap()
    }

    #[test]
    fn builder_validates_required_fields() {
        let result = registered().build();
        assert!(matches!(result, Err(BuildError::MissingInitialState)));
    }

    #[test]
    fn unregistered_initial_state_is_rejected() {
        let result = Builder::new()
            .state(TestState::Idle, ())
            .unwrap()
            .initial(TestState::Scoring)
            .build();

        assert!(matches!(result, Err(BuildError::UnknownState { .. })));
    }

    #[test]
    fn empty_state_name_is_rejected() {
        let result = Builder::new().state(TestState::Unnamed, ());
        assert!(matches!(result, Err(BuildError::EmptyStateName { .. })));
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let result = registered().state(TestState::Idle, ());
        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateState {
                state: "Idle".to_string()
            })
        );
    }

    #[test]
    fn transition_to_unregistered_state_is_rejected() {
        let result = Builder::new()
            .state(TestState::Idle, ())
            .unwrap()
            .permit(TestState::Idle, Button::A, TestState::Scoring);

        assert_eq!(
            result.err(),
            Some(BuildError::UnknownState {
                state: "Scoring".to_string()
            })
        );
    }

    #[test]
    fn transition_from_unregistered_state_is_rejected() {
        let result = Builder::new()
            .state(TestState::Scoring, ())
            .unwrap()
            .permit(TestState::Idle, Button::A, TestState::Scoring);

        assert!(matches!(result, Err(BuildError::UnknownState { .. })));
    }

    #[test]
    fn duplicate_permit_is_ignored() {
        let machine = registered()
            .permit(TestState::Idle, Button::A, TestState::Intaking)
            .and_then(|b| b.permit(TestState::Idle, Button::A, TestState::Intaking))
            .and_then(|b| b.permit(TestState::Idle, Button::B, TestState::Intaking))
            .unwrap()
            .initial(TestState::Idle)
            .build()
            .unwrap();

        let count = machine
            .transitions_of(&TestState::Idle)
            .map(|transitions| transitions.count());
        assert_eq!(count, Some(2));
    }

    #[test]
    fn duplicate_guarded_permit_keeps_first_registration() {
        let mut machine = registered()
            .permit_if(TestState::Idle, Button::A, TestState::Intaking, |_| true)
            .and_then(|b| b.permit_if(TestState::Idle, Button::A, TestState::Intaking, |_| false))
            .unwrap()
            .initial(TestState::Idle)
            .build()
            .unwrap();

        let count = machine
            .transitions_of(&TestState::Idle)
            .map(|transitions| transitions.count());
        assert_eq!(count, Some(1));

        let info = machine.fire(Button::A, &mut ());
        assert_eq!(info.outcome, crate::engine::Outcome::Applied);
        assert!(machine.in_state(&TestState::Intaking));
    }

    #[test]
    fn second_timeout_on_state_is_rejected() {
        let result = registered()
            .transition(
                TransitionBuilder::new()
                    .from(TestState::Intaking)
                    .when_timeout(Duration::from_secs(2))
                    .to(TestState::Idle),
            )
            .and_then(|b| {
                b.transition(
                    TransitionBuilder::new()
                        .from(TestState::Intaking)
                        .when_timeout(Duration::from_secs(5))
                        .to(TestState::Scoring),
                )
            });

        assert_eq!(
            result.err(),
            Some(BuildError::DuplicateTimeout {
                state: "Intaking".to_string()
            })
        );
    }

    #[test]
    fn timeout_is_recorded_on_source_state() {
        let machine = registered()
            .transition(
                TransitionBuilder::new()
                    .from(TestState::Intaking)
                    .when_timeout(Duration::from_secs(2))
                    .to(TestState::Idle),
            )
            .unwrap()
            .initial(TestState::Idle)
            .build()
            .unwrap();

        assert_eq!(
            machine.timeout_of(&TestState::Intaking),
            Some(Duration::from_secs(2))
        );
        assert_eq!(machine.timeout_of(&TestState::Idle), None);
    }

    #[test]
    fn actions_require_registered_state() {
        let result = Builder::new().on_entry_of(&TestState::Idle, |_, _| {});
        assert!(matches!(result, Err(BuildError::UnknownState { .. })));

        let result = Builder::new().disable_default_exit(&TestState::Idle);
        assert!(matches!(result, Err(BuildError::UnknownState { .. })));
    }

    #[test]
    fn fluent_api_builds_machine() {
        let machine = registered()
            .permit(TestState::Idle, Button::A, TestState::Intaking)
            .and_then(|b| b.permit_if(TestState::Intaking, Button::B, TestState::Scoring, |_| true))
            .and_then(|b| b.permit_internal(TestState::Scoring, Button::A, TestState::Idle))
            .and_then(|b| {
                b.permit_internal_if(TestState::Scoring, Button::B, TestState::Idle, |_| false)
            })
            .unwrap()
            .initial(TestState::Idle)
            .history_capacity(4)
            .build()
            .unwrap();

        assert_eq!(machine.current_state(), &TestState::Idle);
        assert_eq!(machine.states().count(), 3);
        assert_eq!(machine.history().capacity(), 4);
    }
}
