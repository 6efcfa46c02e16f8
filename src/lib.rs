//! Tickstate: a finite state machine engine for periodically ticked control loops
//!
//! Tickstate is built around a "pure core, imperative shell" split. The core
//! (states, guards, conditions, history) holds no runtime state of its own and
//! can be tested in isolation; the engine owns the current-state pointer and
//! drives lifecycle hooks one tick at a time.
//!
//! # Core Concepts
//!
//! - **State**: identity via the `State` trait, lifecycle hooks via `Behavior`
//! - **Transitions**: declared per source state and gated by guards, the
//!   `finished` flag, a timeout or the request slot
//! - **Tick**: run the current state's periodic hook, then evaluate and apply
//!   at most one transition
//! - **Diagnostics**: every evaluation records a `TransitionInfo`, applied
//!   transitions are kept in a bounded history
//!
//! # Example
//!
//! ```rust
//! use tickstate::builder::{StateMachineBuilder, TransitionBuilder};
//! use tickstate::core::{periodic_fn, Control, ManualClock};
//! use tickstate::state_enum;
//! use std::time::Duration;
//!
//! state_enum! {
//!     enum Superstructure {
//!         Idle,
//!         Intaking,
//!     }
//! }
//!
//! struct Robot {
//!     should_intake: bool,
//!     has_note: bool,
//! }
//!
//! # fn main() -> Result<(), tickstate::builder::BuildError> {
//! let clock = ManualClock::new();
//! let mut machine = StateMachineBuilder::<Superstructure, Robot>::new()
//!     .state(Superstructure::Idle, ())?
//!     .state(
//!         Superstructure::Intaking,
//!         periodic_fn(|robot: &mut Robot, control: &mut Control<'_, Superstructure>| {
//!             if robot.has_note {
//!                 control.finish();
//!             }
//!         }),
//!     )?
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(Superstructure::Idle)
//!             .when(|r: &Robot| r.should_intake)
//!             .to(Superstructure::Intaking),
//!     )?
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(Superstructure::Intaking)
//!             .when_finished()
//!             .to(Superstructure::Idle),
//!     )?
//!     .transition(
//!         TransitionBuilder::new()
//!             .from(Superstructure::Intaking)
//!             .when_timeout(Duration::from_secs(2))
//!             .to(Superstructure::Idle),
//!     )?
//!     .initial(Superstructure::Idle)
//!     .clock(clock.clone())
//!     .build()?;
//!
//! let mut robot = Robot { should_intake: true, has_note: false };
//! machine.start(&mut robot);
//!
//! machine.tick(&mut robot);
//! assert!(machine.in_state(&Superstructure::Intaking));
//!
//! robot.should_intake = false;
//! clock.advance(Duration::from_millis(2100));
//! machine.tick(&mut robot);
//! assert!(machine.in_state(&Superstructure::Idle));
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod graph;
pub mod task;

// Re-export commonly used types
pub use crate::builder::{BuildError, StateMachineBuilder, TransitionBuilder};
pub use crate::core::{Behavior, Clock, Control, Exit, Guard, ManualClock, State, StateHistory};
pub use crate::engine::{Decision, MachineError, Outcome, StateMachine, TransitionInfo};
pub use crate::graph::MachineGraph;
pub use crate::task::{Task, TaskState};
