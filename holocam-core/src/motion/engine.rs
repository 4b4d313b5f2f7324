//! Stepping engine
//!
//! Runs in the step-timer context. Each tick advances every axis that has
//! not reached the in-flight target by one step, pulsing that axis'
//! driver. Directions are fixed when a move starts; axis motion is
//! monotonic so they never need recomputing mid-move.

use super::link::{MotionStatus, MoveReceiver};
use super::position::{Axis, Pose, AXIS_COUNT};
use crate::traits::{Direction, StepperDriver};

/// Driver slot for one axis
pub type AxisDriver<'a> = &'a mut (dyn StepperDriver + Send);

/// Engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EngineState {
    /// No move in flight
    Idle,
    /// Driving toward the in-flight target
    Stepping,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOutcome {
    /// Nothing to do; the timer can stop
    Idle,
    /// Stepped and the move is not done; tick again
    Stepped,
    /// The in-flight move reached its target
    Finished,
}

impl StepOutcome {
    /// Check if the timer must fire again
    pub fn needs_rearm(self) -> bool {
        matches!(self, StepOutcome::Stepped)
    }
}

/// Timer-side owner of the drivers and the physical position
pub struct StepEngine<'a> {
    receiver: MoveReceiver<'a>,
    drivers: [AxisDriver<'a>; AXIS_COUNT],
    current: Pose,
    target: Pose,
    directions: [Direction; AXIS_COUNT],
    state: EngineState,
    completed: u32,
}

impl<'a> StepEngine<'a> {
    /// Create an idle engine resting at `start`
    ///
    /// `drivers` are in axis order: X, Y, Theta, Phi.
    pub fn new(
        receiver: MoveReceiver<'a>,
        drivers: [AxisDriver<'a>; AXIS_COUNT],
        start: Pose,
    ) -> Self {
        Self {
            receiver,
            drivers,
            current: start,
            target: start,
            directions: [Direction::Positive; AXIS_COUNT],
            state: EngineState::Idle,
            completed: 0,
        }
    }

    /// Advance by one tick
    ///
    /// When idle, a waiting waypoint is picked up and its first step taken
    /// in the same tick. A waypoint equal to the current position finishes
    /// without any pulse.
    pub fn tick(&mut self) -> StepOutcome {
        if self.state == EngineState::Idle {
            let Some(waypoint) = self.receiver.take() else {
                return StepOutcome::Idle;
            };
            self.start_move(waypoint);
        }

        for axis in Axis::ALL {
            if self.current[axis] == self.target[axis] {
                continue;
            }
            let direction = self.directions[axis.index()];
            self.drivers[axis.index()].step(direction);
            self.current[axis] += direction.delta();
        }

        let outcome = if self.current == self.target {
            self.state = EngineState::Idle;
            self.completed = self.completed.wrapping_add(1);
            StepOutcome::Finished
        } else {
            StepOutcome::Stepped
        };

        self.receiver.publish(MotionStatus {
            current: self.current,
            completed: self.completed,
        });
        outcome
    }

    fn start_move(&mut self, waypoint: Pose) {
        self.target = waypoint;
        for axis in Axis::ALL {
            self.directions[axis.index()] = Direction::toward(self.current[axis], waypoint[axis]);
        }
        self.state = EngineState::Stepping;
    }

    /// Current engine state
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Position physically reached
    pub fn current(&self) -> Pose {
        self.current
    }

    /// In-flight (or last finished) target
    pub fn target(&self) -> Pose {
        self.target
    }
}
