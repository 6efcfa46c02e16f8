//! The state machine engine.
//!
//! This module is the imperative shell around [`crate::core`]: it owns the
//! current-state pointer, runs lifecycle hooks and applies transitions.
//!
//! # Key Concepts
//!
//! - **Transitions**: declared per source state, tested in declaration order
//! - **Selection**: first unconditional wins unless a matching conditional
//!   precedes it, any two matching conditionals fail closed
//! - **Two-phase tick**: periodic hooks first, then evaluation
//! - **Diagnostics**: every evaluation leaves a [`TransitionInfo`]

mod error;
mod machine;
mod select;
mod slot;
mod transition;

pub use error::MachineError;
pub use machine::StateMachine;
pub use select::Decision;
pub(crate) use slot::{Route, StateSlot};
pub use slot::Action;
pub use transition::{Outcome, Transition, TransitionInfo, Trigger};
