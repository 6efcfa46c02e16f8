//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for declaring states,
//! transitions and entry/exit actions. All configuration mistakes surface as
//! [`BuildError`] before the machine ever ticks.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::StateMachineBuilder;
pub use transition::TransitionBuilder;

use crate::core::{Guard, State};
use crate::engine::Trigger;

/// Start an unconditional transition from `from` to `to`.
///
/// # Example
///
/// ```
/// use tickstate::builder::simple_transition;
/// use tickstate::state_enum;
///
/// state_enum! {
///     enum Mode {
///         Scoring,
///         Idle,
///     }
/// }
///
/// let transition = simple_transition::<Mode, ()>(Mode::Scoring, Mode::Idle)
///     .build()
///     .unwrap();
/// assert!(transition.is_unconditional());
/// ```
pub fn simple_transition<S, C>(from: S, to: S) -> TransitionBuilder<S, C>
where
    S: State,
{
    TransitionBuilder::new().from(from).to(to)
}

/// Start a transition from `from` to `to` gated by `guard`.
///
/// # Example
///
/// ```
/// use tickstate::builder::guarded_transition;
/// use tickstate::state_enum;
///
/// state_enum! {
///     enum Mode {
///         Idle,
///         Intaking,
///     }
/// }
///
/// struct Robot { has_piece: bool }
///
/// let transition = guarded_transition::<Mode, Robot, _>(
///     Mode::Idle,
///     Mode::Intaking,
///     |r| !r.has_piece,
/// )
/// .build()
/// .unwrap();
/// assert!(!transition.is_unconditional());
/// ```
pub fn guarded_transition<S, C, F>(from: S, to: S, guard: F) -> TransitionBuilder<S, C>
where
    S: State,
    F: Fn(&C) -> bool + Send + Sync + 'static,
{
    TransitionBuilder::new()
        .from(from)
        .guard(Guard::new(guard))
        .to(to)
}

/// Start a transition from `from` to `to` keyed on `trigger`.
pub fn triggered_transition<S, C, T>(from: S, trigger: T, to: S) -> TransitionBuilder<S, C, T>
where
    S: State,
    T: Trigger,
{
    TransitionBuilder::new().from(from).on(trigger).to(to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GuardContext;
    use chrono::Utc;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        Intaking,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::Intaking => "Intaking",
            }
        }
    }

    struct Robot {
        has_piece: bool,
    }

    #[test]
    fn simple_transition_builds() {
        let transition = simple_transition::<TestState, Robot>(TestState::Idle, TestState::Intaking)
            .build()
            .unwrap();

        assert_eq!(transition.from(), &TestState::Idle);
        assert_eq!(transition.to(), &TestState::Intaking);
        assert!(transition.is_unconditional());
    }

    #[test]
    fn guarded_transition_respects_guard() {
        let transition = guarded_transition::<TestState, Robot, _>(
            TestState::Idle,
            TestState::Intaking,
            |r| !r.has_piece,
        )
        .build()
        .unwrap();

        let empty = Robot { has_piece: false };
        let loaded = Robot { has_piece: true };
        assert!(transition
            .condition()
            .test(&GuardContext::new(&empty, Utc::now())));
        assert!(!transition
            .condition()
            .test(&GuardContext::new(&loaded, Utc::now())));
    }

    #[test]
    fn triggered_transition_carries_trigger() {
        let transition =
            triggered_transition::<TestState, Robot, u8>(TestState::Idle, 3, TestState::Intaking)
                .build()
                .unwrap();

        assert_eq!(transition.trigger(), Some(&3));
    }
}
