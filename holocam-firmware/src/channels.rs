//! Inter-task signals
//!
//! Both wake tasks on the interrupt executor from the main loop.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

/// A waypoint was handed to the stepping engine; start ticking
pub static STEP_KICK: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Bytes were queued in the TX ring; drain it to the UART
pub static TX_READY: Signal<CriticalSectionRawMutex, ()> = Signal::new();
