//! Hardware abstraction traits
//!
//! These traits define the interface between the motion logic and the
//! hardware-specific implementations in `holocam-drivers`.

pub mod power;
pub mod stepper;

pub use power::MotorPower;
pub use stepper::{CounterOnly, Direction, StepperDriver};
