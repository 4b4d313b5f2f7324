//! Stepper driver power control

pub mod enable;

pub use enable::DriverEnable;
