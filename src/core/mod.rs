//! Core state machine types.
//!
//! This module contains the building blocks the engine is assembled from:
//! - State identity via the `State` trait and lifecycle hooks via `Behavior`
//! - Guards and conditions for transition control
//! - Clocks backing state timeouts
//! - Bounded transition history
//!
//! Nothing in this module drives a machine; see [`crate::engine`].

mod clock;
mod condition;
mod guard;
mod history;
mod state;

pub use clock::{Clock, ManualClock, SystemClock};
pub(crate) use clock::elapsed_between;
pub use condition::{Clause, Condition, GuardContext};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use state::{periodic_fn, Behavior, Control, Exit, PeriodicFn, State};
