//! Motion: waypoint queue and step generation
//!
//! The main loop owns the [`MotionController`] (pending waypoints, endgoal,
//! dispatch bookkeeping). The step-timer context owns the [`StepEngine`]
//! (drivers, current position, in-flight target). They only talk through a
//! [`MotionLink`].

pub mod controller;
pub mod engine;
pub mod link;
pub mod position;
pub mod queue;

pub use controller::MotionController;
pub use engine::{AxisDriver, EngineState, StepEngine, StepOutcome};
pub use link::{MotionLink, MotionStatus, MoveReceiver, MoveSender};
pub use position::{safe_add, Axis, Pose, Position, AXIS_COUNT, POSITION_MAX, POSITION_MIN};
pub use queue::{MovementQueue, MOVE_QUEUE_SIZE};

/// Motion operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Movement queue has no free slot; nothing was queued
    QueueFull,
    /// No homing routine exists for this axis
    HomingUnsupported(Axis),
}
