//! UART serial communication abstractions
//!
//! The host link is a plain byte stream: 8 data bits, no parity, one stop
//! bit at a fixed baud rate. Byte movement between the wire and the
//! software ring buffers happens in interrupt context; the only thing the
//! main loop needs from the peripheral is a way to re-arm the
//! transmit-ready interrupt after queueing a byte.

/// Control over the UART transmit-ready interrupt source
///
/// The transmit interrupt handler disables its own source when the TX ring
/// runs dry. Whoever queues a byte afterwards must re-arm it, otherwise the
/// byte would sit in the ring until the next unrelated transmit.
pub trait TransmitInterrupt {
    /// Enable (or pend) the transmit-ready interrupt
    ///
    /// Must be idempotent: it is called after every queued byte.
    fn arm(&mut self);
}

impl<T: TransmitInterrupt + ?Sized> TransmitInterrupt for &mut T {
    fn arm(&mut self) {
        (**self).arm();
    }
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl UartConfig {
    /// 8N1 framing at the given baud rate
    pub const fn eight_n_one(baudrate: u32) -> Self {
        Self {
            baudrate,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self::eight_n_one(9600)
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    Seven,
    Eight,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Two,
}
