//! Holocam Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits shared by the
//! board-agnostic core, the concrete drivers, and the chip-specific
//! firmware. Keeping these traits free of any chip HAL lets the whole
//! command/motion pipeline be exercised on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  holocam-firmware (RP2040 binary)                            │
//! └──────────────────────────────────────────────────────────────┘
//!          │                   │                     │
//!          ▼                   ▼                     ▼
//! ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐
//! │ holocam-drivers  │ │ holocam-core     │ │ holocam-hal-rp2040   │
//! └──────────────────┘ └──────────────────┘ └──────────────────────┘
//!          │                   │                     │
//!          └───────────────────┼─────────────────────┘
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │  holocam-hal (this crate - traits)                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (step, direction, enable lines)
//! - [`uart::TransmitInterrupt`] - Arming the UART transmit-ready source

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use uart::{TransmitInterrupt, UartConfig};
