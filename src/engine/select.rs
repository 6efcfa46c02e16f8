//! Transition selection.
//!
//! Given the transitions of the current state, pick at most one winner:
//!
//! 1. Only transitions keyed on the requested trigger are candidates
//!    (`None` selects the condition-driven pool).
//! 2. Candidates are tested in declaration order.
//! 3. The first unconditional candidate wins and ends the scan, unless a
//!    conditional candidate before it already matched. That conditional then
//!    supersedes it and the scan continues past it.
//! 4. Two matching conditional candidates are a conflict and nothing wins,
//!    whether or not an unconditional candidate lies between them.
//!
//! Selection never runs hooks, so callers can ask which transition would
//! fire without side effects.

use super::transition::{Transition, Trigger};
use crate::core::{GuardContext, State};

/// Result of selection, as positions in the state's transition list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Selection {
    Winner(usize),
    NoMatch,
    Conflict(usize, usize),
}

pub(crate) fn select<'t, S, C, T, I>(
    transitions: I,
    trigger: Option<&T>,
    guard: &GuardContext<'_, S, C>,
) -> Selection
where
    S: State + 't,
    C: 't,
    T: Trigger,
    I: IntoIterator<Item = &'t Transition<S, C, T>>,
{
    let mut matched = None;

    for (index, transition) in transitions.into_iter().enumerate() {
        if transition.trigger.as_ref() != trigger {
            continue;
        }
        if !transition.condition.test(guard) {
            continue;
        }
        if transition.condition.is_unconditional() {
            match matched {
                None => return Selection::Winner(index),
                Some(_) => continue,
            }
        }
        match matched {
            None => matched = Some(index),
            Some(first) => return Selection::Conflict(first, index),
        }
    }

    matched.map_or(Selection::NoMatch, Selection::Winner)
}

/// Which transition an evaluation would apply.
pub enum Decision<'m, S: State, C, T> {
    Transition(&'m Transition<S, C, T>),
    NoMatch,
    Conflict {
        first: &'m Transition<S, C, T>,
        second: &'m Transition<S, C, T>,
    },
}

impl<'m, S: State, C, T> Decision<'m, S, C, T> {
    /// The winning transition, if any.
    pub fn transition(&self) -> Option<&'m Transition<S, C, T>> {
        match self {
            Decision::Transition(transition) => Some(*transition),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Decision::Conflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, Guard};
    use chrono::Utc;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Idle,
        A,
        B,
        C,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Idle => "Idle",
                Self::A => "A",
                Self::B => "B",
                Self::C => "C",
            }
        }
    }

    type Table = Vec<Transition<TestState, (), &'static str>>;

    fn unconditional(to: TestState) -> Transition<TestState, (), &'static str> {
        Transition {
            from: TestState::Idle,
            to,
            trigger: None,
            condition: Condition::always(),
            internal: false,
            description: "always".to_string(),
        }
    }

    fn conditional(to: TestState, result: bool) -> Transition<TestState, (), &'static str> {
        Transition {
            condition: Condition::always().and_check(Guard::new(move |_: &()| result)),
            ..unconditional(to)
        }
    }

    fn keyed(
        mut transition: Transition<TestState, (), &'static str>,
        trigger: &'static str,
    ) -> Transition<TestState, (), &'static str> {
        transition.trigger = Some(trigger);
        transition
    }

    fn run(table: &Table, trigger: Option<&&'static str>) -> Selection {
        let guard = GuardContext::new(&(), Utc::now());
        select(table, trigger, &guard)
    }

    #[test]
    fn empty_table_matches_nothing() {
        assert_eq!(run(&Vec::new(), None), Selection::NoMatch);
    }

    #[test]
    fn first_unconditional_wins() {
        let table = vec![unconditional(TestState::A), unconditional(TestState::B)];
        assert_eq!(run(&table, None), Selection::Winner(0));
    }

    #[test]
    fn earlier_unconditional_beats_later_true_conditional() {
        let table = vec![
            conditional(TestState::A, false),
            unconditional(TestState::B),
            conditional(TestState::C, true),
        ];
        assert_eq!(run(&table, None), Selection::Winner(1));
    }

    #[test]
    fn earlier_true_conditional_beats_later_unconditional() {
        let table = vec![conditional(TestState::A, true), unconditional(TestState::B)];
        assert_eq!(run(&table, None), Selection::Winner(0));
    }

    #[test]
    fn superseded_unconditional_does_not_hide_later_conflict() {
        let table = vec![
            conditional(TestState::A, true),
            unconditional(TestState::B),
            conditional(TestState::C, true),
        ];
        assert_eq!(run(&table, None), Selection::Conflict(0, 2));
    }

    #[test]
    fn superseded_unconditional_keeps_conditional_winner() {
        let table = vec![
            conditional(TestState::A, true),
            unconditional(TestState::B),
            conditional(TestState::C, false),
            unconditional(TestState::Idle),
        ];
        assert_eq!(run(&table, None), Selection::Winner(0));
    }

    #[test]
    fn two_true_conditionals_conflict() {
        let table = vec![
            conditional(TestState::A, true),
            conditional(TestState::B, false),
            conditional(TestState::C, true),
        ];
        assert_eq!(run(&table, None), Selection::Conflict(0, 2));
    }

    #[test]
    fn conflict_before_unconditional_still_fails_closed() {
        let table = vec![
            conditional(TestState::A, true),
            conditional(TestState::B, true),
            unconditional(TestState::C),
        ];
        assert_eq!(run(&table, None), Selection::Conflict(0, 1));
    }

    #[test]
    fn single_true_conditional_wins() {
        let table = vec![
            conditional(TestState::A, false),
            conditional(TestState::B, true),
        ];
        assert_eq!(run(&table, None), Selection::Winner(1));
    }

    #[test]
    fn trigger_filters_candidates() {
        let table = vec![
            keyed(unconditional(TestState::A), "stow"),
            keyed(unconditional(TestState::B), "intake"),
            unconditional(TestState::C),
        ];

        assert_eq!(run(&table, Some(&"intake")), Selection::Winner(1));
        assert_eq!(run(&table, Some(&"stow")), Selection::Winner(0));
        assert_eq!(run(&table, Some(&"climb")), Selection::NoMatch);
        assert_eq!(run(&table, None), Selection::Winner(2));
    }

    #[test]
    fn conflict_is_per_trigger() {
        let table = vec![
            keyed(conditional(TestState::A, true), "intake"),
            keyed(conditional(TestState::B, true), "stow"),
        ];
        assert_eq!(run(&table, Some(&"intake")), Selection::Winner(0));
    }

    #[test]
    fn decision_exposes_winner() {
        let table = vec![unconditional(TestState::A)];
        let decision: Decision<'_, TestState, (), &'static str> = Decision::Transition(&table[0]);

        assert_eq!(decision.transition().map(|t| t.to()), Some(&TestState::A));
        assert!(!decision.is_conflict());
        assert!(Decision::<TestState, (), &'static str>::NoMatch
            .transition()
            .is_none());
    }
}
