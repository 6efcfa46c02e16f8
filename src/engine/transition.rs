//! Transition records and per-evaluation diagnostics.

use crate::core::{Condition, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Event token selecting a pool of trigger-keyed transitions.
///
/// Implemented for every type meeting the bounds; `()` is used by machines
/// that only have condition-driven transitions.
pub trait Trigger: Clone + PartialEq + Debug + Send + Sync + 'static {}

impl<T> Trigger for T where T: Clone + PartialEq + Debug + Send + Sync + 'static {}

/// A configured transition out of one state. Immutable once built.
pub struct Transition<S: State, C, T> {
    pub(crate) from: S,
    pub(crate) to: S,
    pub(crate) trigger: Option<T>,
    pub(crate) condition: Condition<S, C>,
    pub(crate) internal: bool,
    pub(crate) description: String,
}

impl<S: State, C, T: Trigger> Transition<S, C, T> {
    pub fn from(&self) -> &S {
        &self.from
    }

    pub fn to(&self) -> &S {
        &self.to
    }

    /// Trigger this transition is keyed on; `None` for condition-driven ones.
    pub fn trigger(&self) -> Option<&T> {
        self.trigger.as_ref()
    }

    pub fn condition(&self) -> &Condition<S, C> {
        &self.condition
    }

    pub fn is_unconditional(&self) -> bool {
        self.condition.is_unconditional()
    }

    /// Entry and exit hooks are skipped when this transition fires.
    pub fn is_internal(&self) -> bool {
        self.internal
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Same trigger, destination and internal flag.
    ///
    /// Trigger-keyed permits match whatever their guards; condition-driven
    /// transitions only when both are unconditional.
    pub(crate) fn duplicates(&self, other: &Self) -> bool {
        let same_edge = self.internal == other.internal
            && self.trigger == other.trigger
            && self.to == other.to;
        if self.trigger.is_some() {
            same_edge
        } else {
            same_edge && self.is_unconditional() && other.is_unconditional()
        }
    }
}

impl<S: State, C, T: Trigger> Clone for Transition<S, C, T> {
    fn clone(&self) -> Self {
        Self {
            from: self.from.clone(),
            to: self.to.clone(),
            trigger: self.trigger.clone(),
            condition: self.condition.clone(),
            internal: self.internal,
            description: self.description.clone(),
        }
    }
}

impl<S: State, C, T: Trigger> Debug for Transition<S, C, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("trigger", &self.trigger)
            .field("internal", &self.internal)
            .field("description", &self.description)
            .finish()
    }
}

/// How an evaluation or force call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A transition matched and was applied
    Applied,

    /// `force_state` moved the machine, bypassing guards
    Forced,

    /// Nothing matched; the machine stayed put
    NoMatch,

    /// More than one conditional transition matched; the machine stayed put
    Conflict,
}

/// Diagnostic record of the most recent evaluation. Overwritten every call.
#[derive(Clone, Debug, Serialize)]
pub struct TransitionInfo<S: State, T> {
    /// State the machine was in when evaluated
    pub from: S,
    /// Trigger passed to `fire`, if any
    pub trigger: Option<T>,
    /// Destination of the resolved transition
    pub to: Option<S>,
    /// Description of the resolved transition
    pub description: Option<String>,
    pub outcome: Outcome,
    pub timestamp: DateTime<Utc>,
}

impl<S: State, T> TransitionInfo<S, T> {
    /// True when the machine moved.
    pub fn successful_transition(&self) -> bool {
        matches!(self.outcome, Outcome::Applied | Outcome::Forced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Guard;

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

    fn unconditional(trigger: Option<&'static str>) -> Transition<TestState, (), &'static str> {
        Transition {
            from: TestState::Idle,
            to: TestState::Intaking,
            trigger,
            condition: Condition::always(),
            internal: false,
            description: "always".to_string(),
        }
    }

    #[test]
    fn unconditional_permits_with_same_key_duplicate() {
        assert!(unconditional(Some("go")).duplicates(&unconditional(Some("go"))));
        assert!(!unconditional(Some("go")).duplicates(&unconditional(Some("stop"))));
        assert!(!unconditional(Some("go")).duplicates(&unconditional(None)));
    }

    #[test]
    fn guarded_permits_with_same_key_duplicate() {
        let guarded = Transition {
            condition: Condition::always().and_check(Guard::new(|_: &()| true)),
            ..unconditional(Some("go"))
        };
        assert!(guarded.duplicates(&guarded.clone()));
        assert!(guarded.duplicates(&unconditional(Some("go"))));

        let internal = Transition {
            internal: true,
            ..guarded.clone()
        };
        assert!(!internal.duplicates(&guarded));
    }

    #[test]
    fn guarded_condition_transitions_never_duplicate() {
        let guarded = Transition {
            condition: Condition::always().and_check(Guard::new(|_: &()| true)),
            ..unconditional(None)
        };
        assert!(!guarded.duplicates(&unconditional(None)));
        assert!(!guarded.duplicates(&guarded.clone()));
        assert!(unconditional(None).duplicates(&unconditional(None)));
    }

    #[test]
    fn success_flag_follows_outcome() {
        let info = |outcome: Outcome| TransitionInfo::<TestState, ()> {
            from: TestState::Idle,
            trigger: None,
            to: None,
            description: None,
            outcome,
            timestamp: Utc::now(),
        };

        assert!(info(Outcome::Applied).successful_transition());
        assert!(info(Outcome::Forced).successful_transition());
        assert!(!info(Outcome::NoMatch).successful_transition());
        assert!(!info(Outcome::Conflict).successful_transition());
    }

    #[test]
    fn info_serializes_to_json() {
        let info = TransitionInfo {
            from: TestState::Idle,
            trigger: Some("go".to_string()),
            to: Some(TestState::Intaking),
            description: Some("always".to_string()),
            outcome: Outcome::Applied,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["outcome"], "Applied");
        assert_eq!(json["to"], "Intaking");
        assert_eq!(json["trigger"], "go");
    }
}
