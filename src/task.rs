//! Adapter running an externally defined unit of work inside a state.
//!
//! A [`Task`] follows the common command lifecycle: initialize once, execute
//! every cycle until it reports finished, then end. [`TaskState`] maps that
//! lifecycle onto a state's [`Behavior`] hooks:
//!
//! | Task            | Behavior                        |
//! |-----------------|---------------------------------|
//! | `initialize`    | `on_entry`                      |
//! | `execute`       | `periodic`                      |
//! | `is_finished`   | `periodic`, then `finish()`     |
//! | `end`           | `on_exit`                       |
//!
//! `end` is told the task was interrupted whenever the exit was not
//! [`Exit::Completed`].

use crate::core::{Behavior, Control, Exit, State};

/// A unit of work driven by the machine while its state is current.
pub trait Task<C>: Send {
    fn initialize(&mut self, _context: &mut C) {}

    fn execute(&mut self, _context: &mut C) {}

    fn is_finished(&self, _context: &C) -> bool {
        false
    }

    /// `interrupted` is true if the state was left before it finished.
    fn end(&mut self, _context: &mut C, _interrupted: bool) {}
}

/// Behavior wrapping a [`Task`].
///
/// ```rust
/// use tickstate::builder::StateMachineBuilder;
/// use tickstate::task::{Task, TaskState};
/// use tickstate::state_enum;
///
/// state_enum! { enum Mode { Idle, Shooting } }
///
/// struct Robot { shots: u32 }
///
/// struct Shoot;
///
/// impl Task<Robot> for Shoot {
///     fn execute(&mut self, robot: &mut Robot) {
///         robot.shots += 1;
///     }
///
///     fn is_finished(&self, robot: &Robot) -> bool {
///         robot.shots >= 3
///     }
/// }
///
/// # fn main() -> Result<(), tickstate::builder::BuildError> {
/// let mut machine = StateMachineBuilder::<Mode, Robot>::new()
///     .state(Mode::Idle, ())?
///     .state(Mode::Shooting, TaskState::new(Shoot))?
///     .initial(Mode::Shooting)
///     .build()?;
///
/// let mut robot = Robot { shots: 0 };
/// machine.start(&mut robot);
/// for _ in 0..3 {
///     machine.tick(&mut robot);
/// }
/// assert!(machine.is_finished());
/// # Ok(())
/// # }
/// ```
pub struct TaskState<W> {
    task: W,
}

impl<W> TaskState<W> {
    pub fn new(task: W) -> Self {
        Self { task }
    }

    pub fn task(&self) -> &W {
        &self.task
    }

    pub fn into_inner(self) -> W {
        self.task
    }
}

impl<S, C, W> Behavior<S, C> for TaskState<W>
where
    S: State,
    W: Task<C>,
{
    fn on_entry(&mut self, context: &mut C, _control: &mut Control<'_, S>) {
        self.task.initialize(context);
    }

    fn periodic(&mut self, context: &mut C, control: &mut Control<'_, S>) {
        self.task.execute(context);
        if self.task.is_finished(context) {
            control.finish();
        }
    }

    fn on_exit(&mut self, context: &mut C, exit: Exit) {
        self.task.end(context, exit != Exit::Completed);
    }
}
