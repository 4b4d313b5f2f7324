//! Embassy async tasks
//!
//! The serial and stepper tasks run on the interrupt executor and stand in
//! for the UART and step-timer interrupt handlers. The controller task is
//! the main loop and runs in thread mode.

pub mod controller;
pub mod serial_rx;
pub mod serial_tx;
pub mod stepper;

pub use controller::{controller_task, HostDispatcher};
pub use serial_rx::serial_rx_task;
pub use serial_tx::serial_tx_task;
pub use stepper::stepper_task;
