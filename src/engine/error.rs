//! Runtime errors raised by the engine.

use thiserror::Error;

/// Caller misuse detected while the machine is running.
///
/// Failing to find a transition is not an error; it is reported through
/// [`TransitionInfo`](crate::engine::TransitionInfo).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{state}' is not registered with this machine")]
    UnknownState { state: String },
}
