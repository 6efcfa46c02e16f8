//! Build errors for state machine and transition builders.

use thiserror::Error;

/// Errors that can occur while configuring a state machine.
///
/// All of them are configuration mistakes; setup should abort on the first one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("State {state} has an empty name")]
    EmptyStateName { state: String },

    #[error("State '{state}' is already registered")]
    DuplicateState { state: String },

    #[error("State '{state}' is not registered with this machine. Call .state(..) first")]
    UnknownState { state: String },

    #[error("State '{state}' already has a timeout transition")]
    DuplicateTimeout { state: String },

    #[error("Transition from '{from}' to '{to}' has an empty description")]
    EmptyDescription { from: String, to: String },

    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state)")]
    MissingToState,
}
