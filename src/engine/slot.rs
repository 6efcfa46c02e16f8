//! Per-state runtime record owned by the engine.

use super::transition::Transition;
use crate::core::{Behavior, State};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Entry or exit action run alongside a state's own hooks.
pub type Action<S, C> = Box<dyn FnMut(&S, &mut C) + Send>;

/// Entry or exit action configuration for one state.
pub(crate) struct ActionSlot<S, C> {
    pub(crate) action: Option<Action<S, C>>,
    pub(crate) use_default: bool,
}

impl<S, C> ActionSlot<S, C> {
    fn new() -> Self {
        Self {
            action: None,
            use_default: true,
        }
    }

    /// Per-state action first, then the machine default unless disabled.
    pub(crate) fn run(&mut self, default: Option<&mut Action<S, C>>, state: &S, context: &mut C) {
        if let Some(action) = self.action.as_mut() {
            action(state, context);
        } else if self.use_default {
            if let Some(default) = default {
                default(state, context);
            }
        }
    }
}

pub(crate) struct Route<S: State, C, T> {
    pub(crate) target: usize,
    pub(crate) transition: Transition<S, C, T>,
}

pub(crate) struct StateSlot<S: State, C, T> {
    pub(crate) id: S,
    pub(crate) behavior: Box<dyn Behavior<S, C>>,
    pub(crate) routes: Vec<Route<S, C, T>>,
    pub(crate) finished: bool,
    pub(crate) timeout: Option<Duration>,
    pub(crate) entered_at: DateTime<Utc>,
    pub(crate) deadline: Option<DateTime<Utc>>,
    pub(crate) entry: ActionSlot<S, C>,
    pub(crate) exit: ActionSlot<S, C>,
}

impl<S: State, C, T> StateSlot<S, C, T> {
    pub(crate) fn new(id: S, behavior: Box<dyn Behavior<S, C>>) -> Self {
        Self {
            id,
            behavior,
            routes: Vec::new(),
            finished: false,
            timeout: None,
            entered_at: DateTime::<Utc>::MIN_UTC,
            deadline: None,
            entry: ActionSlot::new(),
            exit: ActionSlot::new(),
        }
    }

    /// Clear `finished` and restart the timeout from `now`.
    pub(crate) fn rearm(&mut self, now: DateTime<Utc>) {
        self.finished = false;
        self.entered_at = now;
        self.deadline = self
            .timeout
            .and_then(|timeout| chrono::Duration::from_std(timeout).ok())
            .and_then(|timeout| now.checked_add_signed(timeout));
    }
}
