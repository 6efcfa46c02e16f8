//! Tick-driven state machine engine.

use super::error::MachineError;
use super::select::{select, Decision, Selection};
use super::slot::{Action, StateSlot};
use super::transition::{Outcome, Transition, TransitionInfo, Trigger};
use crate::core::{
    elapsed_between, Clock, Control, Exit, GuardContext, State, StateHistory, StateTransition,
};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Finite state machine driven one tick at a time.
///
/// A tick has two phases which callers may also run separately, always in
/// this order:
///
/// 1. [`tick_periodic`](Self::tick_periodic) runs the current state's
///    `periodic` hook. The hook may finish the state or write the request slot.
/// 2. [`evaluate_and_apply`](Self::evaluate_and_apply) selects at most one
///    transition and applies it: exit hooks, pointer swap, `finished` cleared
///    and timeout rearmed, entry hooks.
///
/// Because evaluation follows the periodic phase, a state that finishes
/// during `periodic` can leave on the same tick.
///
/// The initial state is current as soon as the machine is built, but its
/// entry hooks only run when [`start`](Self::start) is called. Its timeout is
/// armed at build time.
pub struct StateMachine<S: State, C, T = ()> {
    slots: Vec<StateSlot<S, C, T>>,
    current: usize,
    initial: usize,
    request: Option<S>,
    default_entry: Option<Action<S, C>>,
    default_exit: Option<Action<S, C>>,
    clock: Box<dyn Clock>,
    last: Option<TransitionInfo<S, T>>,
    history: StateHistory<S>,
}

impl<S: State, C, T: Trigger> StateMachine<S, C, T> {
    pub(crate) fn new(
        mut slots: Vec<StateSlot<S, C, T>>,
        initial: usize,
        default_entry: Option<Action<S, C>>,
        default_exit: Option<Action<S, C>>,
        clock: Box<dyn Clock>,
        history: StateHistory<S>,
    ) -> Self {
        slots[initial].rearm(clock.now());
        Self {
            slots,
            current: initial,
            initial,
            request: None,
            default_entry,
            default_exit,
            clock,
            last: None,
            history,
        }
    }

    /// Get current state
    pub fn current_state(&self) -> &S {
        &self.slots[self.current].id
    }

    /// State the machine was built with.
    pub fn initial_state(&self) -> &S {
        &self.slots[self.initial].id
    }

    /// Check whether `candidate` is the current state.
    pub fn in_state(&self, candidate: &S) -> bool {
        self.current_state() == candidate
    }

    /// Whether the current state has finished since it was last entered.
    pub fn is_finished(&self) -> bool {
        self.slots[self.current].finished
    }

    /// Time elapsed since the current state was last entered.
    pub fn time_in_state(&self) -> Duration {
        elapsed_between(self.slots[self.current].entered_at, self.clock.now())
    }

    /// Registered states, in registration order.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.slots.iter().map(|slot| &slot.id)
    }

    /// Transitions out of `state`, in declaration order.
    ///
    /// Returns `None` if the state is not registered.
    pub fn transitions_of(
        &self,
        state: &S,
    ) -> Option<impl Iterator<Item = &Transition<S, C, T>>> {
        let index = self.index_of(state)?;
        Some(self.slots[index].routes.iter().map(|route| &route.transition))
    }

    /// Timeout configured on `state`, if any.
    pub fn timeout_of(&self, state: &S) -> Option<Duration> {
        self.index_of(state).and_then(|index| self.slots[index].timeout)
    }

    /// Record of the most recent evaluation or force, if there was one.
    pub fn last_transition_info(&self) -> Option<&TransitionInfo<S, T>> {
        self.last.as_ref()
    }

    /// Transitions applied so far, oldest first.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Current contents of the request slot.
    pub fn requested(&self) -> Option<&S> {
        self.request.as_ref()
    }

    /// Overwrite the request slot with `target`.
    ///
    /// The slot is not cleared when a `when_requested` guard reads it. Clear
    /// it explicitly (for instance from the destination's entry hook) if the
    /// request must not trigger again.
    pub fn request_transition(&mut self, target: S) -> Result<(), MachineError> {
        self.require(&target)?;
        self.request = Some(target);
        Ok(())
    }

    /// Empty the request slot.
    pub fn clear_request(&mut self) {
        self.request = None;
    }

    /// Enter the current state: rearm it and run its entry hooks.
    ///
    /// Intended for the initial state, whose entry hooks do not run on
    /// construction. Calling it again re-enters the current state.
    pub fn start(&mut self, context: &mut C) {
        let now = self.clock.now();
        self.slots[self.current].rearm(now);
        tracing::debug!(state = self.current_state().name(), "state machine started");
        self.enter_current(context);
    }

    /// Run the current state's periodic hook.
    pub fn tick_periodic(&mut self, context: &mut C) {
        let slot = &mut self.slots[self.current];
        let mut control = Control::new(&mut slot.finished, &mut self.request);
        slot.behavior.periodic(context, &mut control);
        if control.take_newly_finished() {
            slot.behavior.on_finish(context);
        }
    }

    /// Mark the current state finished. Only the first call per entry runs
    /// `on_finish`.
    pub fn finish_current(&mut self, context: &mut C) {
        let slot = &mut self.slots[self.current];
        if !slot.finished {
            slot.finished = true;
            slot.behavior.on_finish(context);
        }
    }

    /// Which condition-driven transition would fire now. No hooks run.
    pub fn evaluate(&self, context: &C) -> Decision<'_, S, C, T> {
        self.decide(None, context)
    }

    /// Which transition keyed on `trigger` would fire now. No hooks run.
    pub fn evaluate_trigger(&self, trigger: &T, context: &C) -> Decision<'_, S, C, T> {
        self.decide(Some(trigger), context)
    }

    /// Select a condition-driven transition and apply it.
    pub fn evaluate_and_apply(&mut self, context: &mut C) -> &TransitionInfo<S, T> {
        self.resolve(None, context)
    }

    /// Run both phases of a tick.
    pub fn tick(&mut self, context: &mut C) -> &TransitionInfo<S, T> {
        self.tick_periodic(context);
        self.evaluate_and_apply(context)
    }

    /// Select a transition keyed on `trigger` and apply it.
    pub fn fire(&mut self, trigger: T, context: &mut C) -> &TransitionInfo<S, T> {
        self.resolve(Some(trigger), context)
    }

    /// Move to `target` without consulting guards. Exit and entry hooks still
    /// run, with the exit reported as [`Exit::Forced`].
    pub fn force_state(&mut self, target: S, context: &mut C) -> Result<(), MachineError> {
        let index = self.require(&target)?;
        tracing::info!(
            from = self.current_state().name(),
            to = target.name(),
            "forcing state"
        );
        self.record_forced(target, index, false, Some(context));
        Ok(())
    }

    /// Move to `target` without consulting guards or running any hooks.
    ///
    /// `finished` is still cleared and the timeout rearmed.
    pub fn force_state_silently(&mut self, target: S) -> Result<(), MachineError> {
        let index = self.require(&target)?;
        tracing::info!(
            from = self.current_state().name(),
            to = target.name(),
            "forcing state without hooks"
        );
        self.record_forced(target, index, true, None);
        Ok(())
    }

    fn index_of(&self, state: &S) -> Option<usize> {
        self.slots.iter().position(|slot| &slot.id == state)
    }

    fn require(&self, state: &S) -> Result<usize, MachineError> {
        self.index_of(state).ok_or_else(|| MachineError::UnknownState {
            state: state.name().to_string(),
        })
    }

    fn guard_context<'a>(&'a self, context: &'a C, now: DateTime<Utc>) -> GuardContext<'a, S, C> {
        let slot = &self.slots[self.current];
        GuardContext::new(context, now)
            .finished(slot.finished)
            .deadline(slot.deadline)
            .requested(self.request.as_ref())
    }

    fn select_index(&self, trigger: Option<&T>, context: &C) -> Selection {
        let guard = self.guard_context(context, self.clock.now());
        let routes = &self.slots[self.current].routes;
        select(routes.iter().map(|route| &route.transition), trigger, &guard)
    }

    fn decide(&self, trigger: Option<&T>, context: &C) -> Decision<'_, S, C, T> {
        let routes = &self.slots[self.current].routes;
        match self.select_index(trigger, context) {
            Selection::Winner(index) => Decision::Transition(&routes[index].transition),
            Selection::NoMatch => Decision::NoMatch,
            Selection::Conflict(first, second) => Decision::Conflict {
                first: &routes[first].transition,
                second: &routes[second].transition,
            },
        }
    }

    fn resolve(&mut self, trigger: Option<T>, context: &mut C) -> &TransitionInfo<S, T> {
        let selection = self.select_index(trigger.as_ref(), context);
        let from = self.current_state().clone();

        let (to, description, outcome) = match selection {
            Selection::Winner(index) => {
                let route = &self.slots[self.current].routes[index];
                let target = route.target;
                let internal = route.transition.internal;
                let to = route.transition.to.clone();
                let description = route.transition.description.clone();

                tracing::debug!(
                    from = from.name(),
                    to = to.name(),
                    internal,
                    description = description.as_str(),
                    "applying transition"
                );
                let exit = if self.is_finished() {
                    Exit::Completed
                } else {
                    Exit::Interrupted
                };
                self.apply(target, internal, exit, false, Some(context));
                (Some(to), Some(description), Outcome::Applied)
            }
            Selection::NoMatch => {
                tracing::trace!(state = from.name(), trigger = ?trigger, "no transition matched");
                (None, None, Outcome::NoMatch)
            }
            Selection::Conflict(first, second) => {
                let routes = &self.slots[self.current].routes;
                tracing::warn!(
                    state = from.name(),
                    trigger = ?trigger,
                    first = routes[first].transition.description.as_str(),
                    second = routes[second].transition.description.as_str(),
                    "conflicting conditional transitions, staying put"
                );
                (None, None, Outcome::Conflict)
            }
        };

        let info = TransitionInfo {
            from,
            trigger,
            to,
            description,
            outcome,
            timestamp: self.clock.now(),
        };
        self.last.insert(info)
    }

    fn record_forced(&mut self, target: S, index: usize, silent: bool, context: Option<&mut C>) {
        let from = self.current_state().clone();
        self.apply(index, silent, Exit::Forced, true, context);
        self.last = Some(TransitionInfo {
            from,
            trigger: None,
            to: Some(target),
            description: None,
            outcome: Outcome::Forced,
            timestamp: self.clock.now(),
        });
    }

    /// Leave the current state for `target`. Hooks are skipped when
    /// `internal` is set or no context is supplied.
    fn apply(
        &mut self,
        target: usize,
        internal: bool,
        exit: Exit,
        forced: bool,
        mut context: Option<&mut C>,
    ) {
        let source = self.current;

        if !internal {
            if let Some(context) = context.as_deref_mut() {
                self.exit_current(context, exit);
            }
        }

        self.current = target;
        let now = self.clock.now();
        self.slots[target].rearm(now);

        if !internal {
            if let Some(context) = context.as_deref_mut() {
                self.enter_current(context);
            }
        }

        self.history.record(StateTransition {
            from: self.slots[source].id.clone(),
            to: self.slots[target].id.clone(),
            timestamp: now,
            internal,
            forced,
        });
    }

    fn exit_current(&mut self, context: &mut C, exit: Exit) {
        let slot = &mut self.slots[self.current];
        slot.behavior.on_exit(context, exit);
        slot.exit.run(self.default_exit.as_mut(), &slot.id, context);
    }

    fn enter_current(&mut self, context: &mut C) {
        let slot = &mut self.slots[self.current];
        let mut control = Control::new(&mut slot.finished, &mut self.request);
        slot.behavior.on_entry(context, &mut control);
        let newly_finished = control.take_newly_finished();
        slot.entry.run(self.default_entry.as_mut(), &slot.id, context);
        if newly_finished {
            slot.behavior.on_finish(context);
        }
    }
}
