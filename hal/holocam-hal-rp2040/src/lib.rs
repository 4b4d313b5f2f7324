//! RP2040-specific HAL for the positioning platform firmware
//!
//! Implements the shared `holocam-hal` traits on top of embassy-rp:
//!
//! - GPIO outputs for step, direction and enable lines
//! - UART configuration mapping and transmit wake-up

#![no_std]

pub mod gpio;
pub mod uart;

pub use gpio::RpOutput;
pub use uart::{embassy_config, SignalTransmit};
