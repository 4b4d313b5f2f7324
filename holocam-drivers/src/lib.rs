//! Hardware driver implementations
//!
//! Concrete implementations of the traits defined in holocam-core, built
//! on the pin traits from holocam-hal:
//!
//! - Step/direction stepper drivers (A4988, TMC2209 in standalone mode, ...)
//! - Driver enable lines

#![no_std]
#![deny(unsafe_code)]

pub mod power;
pub mod stepper;
