//! UART glue
//!
//! The byte pump between the UART FIFOs and the software rings runs as a
//! task on the interrupt executor. "Arming the transmit interrupt" means
//! waking that task.

use embassy_rp::uart::{Config, DataBits, Parity, StopBits};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use holocam_hal::uart::{self, UartConfig};
use holocam_hal::TransmitInterrupt;

/// Map a board-agnostic UART configuration onto embassy-rp's
pub fn embassy_config(config: &UartConfig) -> Config {
    let mut cfg = Config::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        uart::DataBits::Seven => DataBits::DataBits7,
        uart::DataBits::Eight => DataBits::DataBits8,
    };
    cfg.parity = match config.parity {
        uart::Parity::None => Parity::ParityNone,
        uart::Parity::Even => Parity::ParityEven,
        uart::Parity::Odd => Parity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        uart::StopBits::One => StopBits::STOP1,
        uart::StopBits::Two => StopBits::STOP2,
    };
    cfg
}

/// Transmit wake-up delivered through an embassy [`Signal`]
pub struct SignalTransmit {
    signal: &'static Signal<CriticalSectionRawMutex, ()>,
}

impl SignalTransmit {
    pub const fn new(signal: &'static Signal<CriticalSectionRawMutex, ()>) -> Self {
        Self { signal }
    }
}

impl TransmitInterrupt for SignalTransmit {
    fn arm(&mut self) {
        self.signal.signal(());
    }
}
