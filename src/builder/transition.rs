//! Builder for constructing state transitions.

use crate::builder::error::BuildError;
use crate::core::{Clause, Condition, Guard, State};
use crate::engine::{Transition, Trigger};
use std::time::Duration;

/// Builder for constructing transitions with a fluent API.
///
/// Conditions added with `when`, `and_when`, `when_finished`,
/// `when_timeout` and `when_requested` are conjoined. A builder with none of
/// them produces an unconditional transition.
///
/// ```rust
/// use tickstate::builder::TransitionBuilder;
/// use tickstate::state_enum;
///
/// state_enum! {
///     enum Mode { Idle, Intaking }
/// }
///
/// struct Robot { should_intake: bool, arm_ready: bool }
///
/// let transition = TransitionBuilder::<Mode, Robot>::new()
///     .from(Mode::Idle)
///     .when(|r: &Robot| r.should_intake)
///     .and_when(|r: &Robot| r.arm_ready)
///     .to(Mode::Intaking)
///     .describe("driver asked for intake")
///     .build()
///     .unwrap();
///
/// assert!(!transition.is_unconditional());
/// assert_eq!(transition.description(), "driver asked for intake");
/// ```
pub struct TransitionBuilder<S: State, C, T = ()> {
    from: Option<S>,
    to: Option<S>,
    trigger: Option<T>,
    clauses: Vec<Clause<S, C>>,
    requested: bool,
    internal: bool,
    description: Option<String>,
}

impl<S: State, C, T: Trigger> TransitionBuilder<S, C, T> {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self {
            from: None,
            to: None,
            trigger: None,
            clauses: Vec::new(),
            requested: false,
            internal: false,
            description: None,
        }
    }

    /// Set the source state (required).
    pub fn from(mut self, state: S) -> Self {
        self.from = Some(state);
        self
    }

    /// Set the target state (required).
    pub fn to(mut self, state: S) -> Self {
        self.to = Some(state);
        self
    }

    /// Key this transition on `trigger`; it is then only considered by
    /// `fire(trigger)`.
    pub fn on(mut self, trigger: T) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Add a guard.
    pub fn guard(mut self, guard: Guard<C>) -> Self {
        self.clauses.push(Clause::Check(guard));
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Add a further guard; all guards must hold.
    pub fn and_when<F>(self, predicate: F) -> Self
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        self.when(predicate)
    }

    /// Require the source state to have finished.
    pub fn when_finished(mut self) -> Self {
        self.clauses.push(Clause::Finished);
        self
    }

    /// Require `duration` to have elapsed since the source state was entered.
    ///
    /// A state accepts only one timeout transition.
    pub fn when_timeout(mut self, duration: Duration) -> Self {
        self.clauses.push(Clause::Timeout(duration));
        self
    }

    /// Require the request slot to hold the target state.
    pub fn when_requested(mut self) -> Self {
        self.requested = true;
        self
    }

    /// Skip entry and exit hooks when this transition fires.
    pub fn internal(mut self) -> Self {
        self.internal = true;
        self
    }

    /// Human-readable description used in diagnostics and graph export.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<Transition<S, C, T>, BuildError> {
        let from = self.from.ok_or(BuildError::MissingFromState)?;
        let to = self.to.ok_or(BuildError::MissingToState)?;

        let timeouts = self
            .clauses
            .iter()
            .filter(|clause| matches!(clause, Clause::Timeout(_)))
            .count();
        if timeouts > 1 {
            return Err(BuildError::DuplicateTimeout {
                state: from.name().to_string(),
            });
        }

        let mut condition = self
            .clauses
            .into_iter()
            .fold(Condition::always(), Condition::and);
        if self.requested {
            condition = condition.and(Clause::Requested(to.clone()));
        }

        let description = match self.description {
            Some(description) if description.trim().is_empty() => {
                return Err(BuildError::EmptyDescription {
                    from: from.name().to_string(),
                    to: to.name().to_string(),
                })
            }
            Some(description) => description,
            None => condition.describe(),
        };

        Ok(Transition {
            from,
            to,
            trigger: self.trigger,
            condition,
            internal: self.internal,
            description,
        })
    }
}

impl<S: State, C, T: Trigger> Default for TransitionBuilder<S, C, T> {
    fn default() -> Self {
        Self::new()
    }
}
