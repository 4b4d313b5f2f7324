//! Board-agnostic core logic for the positioning platform firmware
//!
//! This crate contains everything between the UART wire and the step
//! pulses that does not depend on a specific chip:
//!
//! - Fixed-capacity single-producer/single-consumer ring buffer
//! - Interrupt-fed serial transport
//! - Movement queue and timer-driven stepping engine
//! - Protocol dispatch (wire commands → motion operations)
//! - Hardware capability traits (stepper, driver power)
//! - Configuration type definitions
//!
//! Work is split between two execution contexts: the cooperative main loop
//! and the interrupt context (UART receive, UART transmit-ready, step timer).
//! Every piece of state shared between them has exactly one writer; the
//! types here encode which side owns what.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod config;
pub mod motion;
pub mod ring;
pub mod serial;
pub mod traits;
