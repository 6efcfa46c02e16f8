//! State identity and per-state behavior.
//!
//! A state is split into two halves: its identity (a plain value implementing
//! [`State`], used for lookup, equality and diagnostics) and its behavior (a
//! [`Behavior`] registered alongside it, holding the lifecycle hooks).

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Identity of a state machine state.
///
/// # Required Traits
///
/// - `Clone`: identities are copied into transitions, history and diagnostics
/// - `PartialEq`: identity comparison drives lookup and `in_state`
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: diagnostics records are serializable
///
/// # Example
///
/// ```rust
/// use tickstate::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Superstructure {
///     Idle,
///     Intaking,
///     Scoring,
/// }
///
/// impl State for Superstructure {
///     fn name(&self) -> &str {
///         match self {
///             Self::Idle => "Idle",
///             Self::Intaking => "Intaking",
///             Self::Scoring => "Scoring",
///         }
///     }
/// }
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    ///
    /// Must be non-empty; registering a state with an empty name is rejected.
    fn name(&self) -> &str;
}

/// Why a state is being left.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exit {
    /// The state had finished before a guarded transition moved away from it.
    Completed,

    /// A guarded transition moved away before the state finished.
    Interrupted,

    /// The machine was forced out of the state, bypassing guards.
    Forced,
}

impl Exit {
    /// True for any exit other than [`Exit::Completed`].
    pub fn is_abnormal(self) -> bool {
        !matches!(self, Exit::Completed)
    }
}

/// Handle given to hooks that may finish the state or write the request slot.
pub struct Control<'a, S: State> {
    finished: &'a mut bool,
    request: &'a mut Option<S>,
    newly_finished: bool,
}

impl<'a, S: State> Control<'a, S> {
    pub(crate) fn new(finished: &'a mut bool, request: &'a mut Option<S>) -> Self {
        Self {
            finished,
            request,
            newly_finished: false,
        }
    }

    /// Mark the current state finished.
    ///
    /// Only the first call since the last entry has any effect; the state's
    /// `on_finish` hook runs once, after the calling hook returns.
    pub fn finish(&mut self) {
        if !*self.finished {
            *self.finished = true;
            self.newly_finished = true;
        }
    }

    /// Whether the current state has finished since its last entry.
    pub fn is_finished(&self) -> bool {
        *self.finished
    }

    /// Overwrite the request slot with `target`.
    ///
    /// Unlike [`StateMachine::request_transition`](crate::engine::StateMachine::request_transition),
    /// the target is not checked against the registered states; an unknown
    /// target simply never satisfies a `when_requested` guard.
    pub fn request(&mut self, target: S) {
        *self.request = Some(target);
    }

    /// Empty the request slot.
    pub fn clear_request(&mut self) {
        *self.request = None;
    }

    /// Current contents of the request slot.
    pub fn requested(&self) -> Option<&S> {
        self.request.as_ref()
    }

    pub(crate) fn take_newly_finished(&mut self) -> bool {
        std::mem::take(&mut self.newly_finished)
    }
}

/// Lifecycle hooks of a state. Every hook defaults to a no-op.
///
/// Hooks run synchronously on the thread driving the machine and must not
/// block. The shared context is passed explicitly on every call.
pub trait Behavior<S: State, C>: Send {
    /// Runs when the machine makes this state current, after `finished` has
    /// been cleared and the timeout rearmed. Skipped for internal transitions.
    fn on_entry(&mut self, _context: &mut C, _control: &mut Control<'_, S>) {}

    /// Runs on every tick while this state is current, including ticks on
    /// which the state is also about to be left.
    fn periodic(&mut self, _context: &mut C, _control: &mut Control<'_, S>) {}

    /// Runs before the machine leaves this state. Skipped for internal
    /// transitions.
    fn on_exit(&mut self, _context: &mut C, _exit: Exit) {}

    /// Runs once per entry, the first time the state is finished.
    fn on_finish(&mut self, _context: &mut C) {}
}

impl<S: State, C> Behavior<S, C> for () {}

/// Behavior whose periodic hook is a closure.
pub struct PeriodicFn<F>(F);

/// Wrap a closure as a state's periodic hook.
///
/// ```rust
/// use tickstate::core::{periodic_fn, Control};
/// # use tickstate::state_enum;
/// # state_enum! { enum Mode { Idle, Spinning } }
///
/// struct Robot { has_note: bool }
///
/// let intake = periodic_fn(|robot: &mut Robot, control: &mut Control<'_, Mode>| {
///     if robot.has_note {
///         control.finish();
///     }
/// });
/// # let _ = intake;
/// ```
pub fn periodic_fn<S, C, F>(f: F) -> PeriodicFn<F>
where
    S: State,
    F: FnMut(&mut C, &mut Control<'_, S>) + Send,
{
    PeriodicFn(f)
}

impl<S, C, F> Behavior<S, C> for PeriodicFn<F>
where
    S: State,
    F: FnMut(&mut C, &mut Control<'_, S>) + Send,
{
    fn periodic(&mut self, context: &mut C, control: &mut Control<'_, S>) {
        (self.0)(context, control)
    }
}
