//! Transition conditions.
//!
//! A [`Condition`] is a conjunction of clauses. The empty conjunction is the
//! unconditional condition; anything else is conditional and takes part in
//! conflict detection.

use super::guard::Guard;
use super::state::State;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Everything a condition may read during one evaluation.
pub struct GuardContext<'a, S: State, C> {
    pub context: &'a C,
    pub(crate) finished: bool,
    pub(crate) deadline: Option<DateTime<Utc>>,
    pub(crate) now: DateTime<Utc>,
    pub(crate) requested: Option<&'a S>,
}

impl<'a, S: State, C> GuardContext<'a, S, C> {
    pub fn new(context: &'a C, now: DateTime<Utc>) -> Self {
        Self {
            context,
            finished: false,
            deadline: None,
            now,
            requested: None,
        }
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = finished;
        self
    }

    pub fn deadline(mut self, deadline: Option<DateTime<Utc>>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn requested(mut self, requested: Option<&'a S>) -> Self {
        self.requested = requested;
        self
    }

    fn timed_out(&self) -> bool {
        self.deadline.is_some_and(|deadline| self.now >= deadline)
    }
}

/// One term of a condition.
pub enum Clause<S: State, C> {
    /// Caller-supplied guard over the context.
    Check(Guard<C>),
    /// The current state has finished since its last entry.
    Finished,
    /// The current state's timeout has elapsed since its last entry.
    Timeout(Duration),
    /// The request slot holds this state.
    Requested(S),
}

impl<S: State, C> Clause<S, C> {
    fn test(&self, guard: &GuardContext<'_, S, C>) -> bool {
        match self {
            Clause::Check(check) => check.check(guard.context),
            Clause::Finished => guard.finished,
            Clause::Timeout(_) => guard.timed_out(),
            Clause::Requested(target) => guard.requested == Some(target),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Clause::Check(check) => check.label().unwrap_or("guard").to_string(),
            Clause::Finished => "finished".to_string(),
            Clause::Timeout(duration) => format!("timeout {:?}", duration),
            Clause::Requested(target) => format!("requested {}", target.name()),
        }
    }
}

impl<S: State, C> Clone for Clause<S, C> {
    fn clone(&self) -> Self {
        match self {
            Clause::Check(check) => Clause::Check(check.clone()),
            Clause::Finished => Clause::Finished,
            Clause::Timeout(duration) => Clause::Timeout(*duration),
            Clause::Requested(target) => Clause::Requested(target.clone()),
        }
    }
}

/// Conjunction of clauses gating a transition.
///
/// ```rust
/// use tickstate::core::{Condition, Guard, GuardContext};
/// # use tickstate::state_enum;
/// # state_enum! { enum Mode { Idle } }
/// use chrono::Utc;
///
/// let always: Condition<Mode, bool> = Condition::always();
/// let gated: Condition<Mode, bool> = Condition::always().and_check(Guard::new(|b: &bool| *b));
///
/// let ctx = GuardContext::new(&false, Utc::now());
/// assert!(always.is_unconditional());
/// assert!(always.test(&ctx));
/// assert!(!gated.test(&ctx));
/// ```
pub struct Condition<S: State, C> {
    clauses: Vec<Clause<S, C>>,
}

impl<S: State, C> Condition<S, C> {
    /// The constant-true condition.
    pub fn always() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    pub fn and(mut self, clause: Clause<S, C>) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn and_check(self, guard: Guard<C>) -> Self {
        self.and(Clause::Check(guard))
    }

    pub fn is_unconditional(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Evaluate every clause in order, stopping at the first false one.
    pub fn test(&self, guard: &GuardContext<'_, S, C>) -> bool {
        self.clauses.iter().all(|clause| clause.test(guard))
    }

    pub fn clauses(&self) -> &[Clause<S, C>] {
        &self.clauses
    }

    /// Timeout carried by this condition, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.clauses.iter().find_map(|clause| match clause {
            Clause::Timeout(duration) => Some(*duration),
            _ => None,
        })
    }

    pub fn describe(&self) -> String {
        if self.clauses.is_empty() {
            return "always".to_string();
        }
        self.clauses
            .iter()
            .map(Clause::describe)
            .collect::<Vec<_>>()
            .join(" and ")
    }
}

impl<S: State, C> Clone for Condition<S, C> {
    fn clone(&self) -> Self {
        Self {
            clauses: self.clauses.clone(),
        }
    }
}

impl<S: State, C> Default for Condition<S, C> {
    fn default() -> Self {
        Self::always()
    }
}
