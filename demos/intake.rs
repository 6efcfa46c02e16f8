//! Simulated intake superstructure driven at 50 Hz.
//!
//! Logging runs at debug level, so the engine reports every applied
//! transition as it happens.

use std::time::Duration;
use tickstate::builder::{BuildError, StateMachineBuilder, TransitionBuilder};
use tickstate::core::{Behavior, Control, Exit, ManualClock, State};
use tickstate::state_enum;
use tickstate::task::{Task, TaskState};

state_enum! {
    enum Superstructure {
        Idle,
        Intaking,
        Scoring,
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Operator {
    Score,
    Cancel,
}

#[derive(Debug, Default)]
struct Robot {
    should_intake: bool,
    note_sensor: bool,
    roller_on: bool,
    shots: u32,
}

struct Intake;

impl Behavior<Superstructure, Robot> for Intake {
    fn on_entry(&mut self, robot: &mut Robot, _control: &mut Control<'_, Superstructure>) {
        robot.roller_on = true;
    }

    fn periodic(&mut self, robot: &mut Robot, control: &mut Control<'_, Superstructure>) {
        if robot.note_sensor {
            control.finish();
        }
    }

    fn on_exit(&mut self, robot: &mut Robot, exit: Exit) {
        robot.roller_on = false;
        tracing::info!(?exit, "intake stopped");
    }
}

struct Shoot {
    cycles: u32,
}

impl Task<Robot> for Shoot {
    fn initialize(&mut self, _robot: &mut Robot) {
        self.cycles = 0;
    }

    fn execute(&mut self, _robot: &mut Robot) {
        self.cycles += 1;
    }

    fn is_finished(&self, _robot: &Robot) -> bool {
        self.cycles >= 10
    }

    fn end(&mut self, robot: &mut Robot, interrupted: bool) {
        if !interrupted {
            robot.note_sensor = false;
            robot.shots += 1;
        }
    }
}

fn main() -> Result<(), BuildError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let clock = ManualClock::new();
    let mut machine = StateMachineBuilder::<Superstructure, Robot, Operator>::new()
        .state(Superstructure::Idle, ())?
        .state(Superstructure::Intaking, Intake)?
        .state(Superstructure::Scoring, TaskState::new(Shoot { cycles: 0 }))?
        .transition(
            TransitionBuilder::new()
                .from(Superstructure::Idle)
                .when(|r: &Robot| r.should_intake && !r.note_sensor)
                .to(Superstructure::Intaking)
                .describe("operator wants a note"),
        )?
        .transition(
            TransitionBuilder::new()
                .from(Superstructure::Intaking)
                .when_finished()
                .to(Superstructure::Idle)
                .describe("note acquired"),
        )?
        .transition(
            TransitionBuilder::new()
                .from(Superstructure::Intaking)
                .when_timeout(Duration::from_secs(3))
                .to(Superstructure::Idle)
                .describe("intake timed out"),
        )?
        .permit_if(
            Superstructure::Idle,
            Operator::Score,
            Superstructure::Scoring,
            |r| r.note_sensor,
        )?
        .permit(Superstructure::Scoring, Operator::Cancel, Superstructure::Idle)?
        .transition(
            TransitionBuilder::new()
                .from(Superstructure::Scoring)
                .when_finished()
                .to(Superstructure::Idle)
                .describe("shot complete"),
        )?
        .default_on_entry(|state: &Superstructure, _: &mut Robot| {
            tracing::info!(state = state.name(), "entered");
        })
        .initial(Superstructure::Idle)
        .clock(clock.clone())
        .build()?;

    println!("{}", machine.graph().to_dot());

    let mut robot = Robot::default();
    machine.start(&mut robot);

    let period = Duration::from_millis(20);
    for cycle in 0..400u32 {
        match cycle {
            10 => robot.should_intake = true,
            60 => robot.note_sensor = true,
            61 => robot.should_intake = false,
            100 => {
                machine.fire(Operator::Score, &mut robot);
            }
            200 => robot.should_intake = true,
            _ => {}
        }

        machine.tick(&mut robot);
        clock.advance(period);
    }

    tracing::info!(
        state = machine.current_state().name(),
        shots = robot.shots,
        roller_on = robot.roller_on,
        "simulation finished"
    );
    for transition in machine.history().transitions() {
        println!(
            "{} -> {} at {}",
            transition.from.name(),
            transition.to.name(),
            transition.timestamp
        );
    }

    Ok(())
}
