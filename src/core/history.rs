//! Transition history tracking.
//!
//! The engine keeps a bounded record of the transitions it applied, oldest
//! first. Evaluations that matched nothing are not recorded here; see
//! [`TransitionInfo`](crate::engine::TransitionInfo) for the latest outcome.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions retained by a machine.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Record of a single applied transition.
///
/// # Example
///
/// ```rust
/// use tickstate::core::StateTransition;
/// use tickstate::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Mode {
///         Idle,
///         Intaking,
///     }
/// }
///
/// let transition = StateTransition {
///     from: Mode::Idle,
///     to: Mode::Intaking,
///     timestamp: Utc::now(),
///     internal: false,
///     forced: false,
/// };
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// When the transition occurred, per the machine's clock
    pub timestamp: DateTime<Utc>,
    /// Entry and exit hooks were skipped
    pub internal: bool,
    /// Guards were bypassed via `force_state`
    pub forced: bool,
}

/// Bounded, ordered history of applied transitions.
///
/// Once `capacity` transitions are held, recording a new one drops the
/// oldest.
///
/// ```rust
/// use tickstate::core::{StateHistory, StateTransition};
/// use tickstate::state_enum;
/// use chrono::Utc;
///
/// state_enum! {
///     enum Phase { One, Two, Three }
/// }
///
/// let mut history = StateHistory::with_capacity(8);
/// for (from, to) in [(Phase::One, Phase::Two), (Phase::Two, Phase::Three)] {
///     history.record(StateTransition {
///         from,
///         to,
///         timestamp: Utc::now(),
///         internal: false,
///         forced: false,
///     });
/// }
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&Phase::One, &Phase::Two, &Phase::Three]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    capacity: usize,
    transitions: VecDeque<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// History retaining at most `capacity` transitions. A capacity of zero
    /// records nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
        }
    }

    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.capacity == 0 {
            return;
        }
        while self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns references to states in order: the `from` of the oldest
    /// retained transition, then the `to` state of each transition.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        for transition in &self.transitions {
            path.push(&transition.to);
        }
        path
    }

    /// Calculate total duration from first to last retained transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.front(), self.transitions.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    pub fn transitions(&self) -> impl Iterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}
