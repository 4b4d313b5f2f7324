//! Interrupt-fed serial transport
//!
//! Two byte rings sit between the UART interrupt handlers and the main
//! loop:
//!
//! ```text
//!            ┌──────────── RX ring ────────────┐
//! UART RX ──►│ SerialRxIsr::on_receive  ──push  │──pop──► SerialPort::read_byte
//!            └──────────────────────────────────┘
//!            ┌──────────── TX ring ────────────┐
//! UART TX ◄──│ SerialTxIsr::on_transmit_ready   │◄─push── SerialPort::write_byte
//!            └──────────────────────────────────┘
//! ```
//!
//! Complete lines are counted without scanning: the receive side counts
//! terminators it stored, the main loop counts terminators it read, and a
//! line is available whenever the two differ. Each counter has one writer.
//!
//! [`SerialPort`]'s blocking calls spin until the interrupt side makes
//! progress. They must only be called from the main loop.

use core::sync::atomic::{AtomicU32, Ordering};

use holocam_hal::TransmitInterrupt;
use holocam_protocol::LINE_END;

use crate::ring::{Consumer, Producer, RingBuffer};

/// Default size of each serial ring (holds one less)
pub const SERIAL_BUFFER_SIZE: usize = 256;

/// Counters written by the receive interrupt
struct RxCounters {
    lines: AtomicU32,
    dropped: AtomicU32,
}

impl RxCounters {
    const fn new() -> Self {
        Self {
            lines: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }
}

// Single writer: load + store is enough, and is all thumbv6m offers
fn bump(counter: &AtomicU32) {
    let value = counter.load(Ordering::Relaxed);
    counter.store(value.wrapping_add(1), Ordering::Release);
}

/// Backing storage for both serial rings
pub struct SerialBuffers<const N: usize = SERIAL_BUFFER_SIZE> {
    rx: RingBuffer<u8, N>,
    tx: RingBuffer<u8, N>,
    counters: RxCounters,
}

impl<const N: usize> SerialBuffers<N> {
    /// Create empty buffers
    pub const fn new() -> Self {
        Self {
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            counters: RxCounters::new(),
        }
    }

    /// Split into the main-loop port and the two interrupt-side halves
    ///
    /// `irq` re-arms the transmit-ready interrupt after the port queues a
    /// byte.
    pub fn split<I: TransmitInterrupt>(
        &mut self,
        irq: I,
    ) -> (SerialPort<'_, I, N>, SerialRxIsr<'_, N>, SerialTxIsr<'_, N>) {
        let (rx_producer, rx_consumer) = self.rx.split();
        let (tx_producer, tx_consumer) = self.tx.split();
        let counters = &self.counters;
        (
            SerialPort {
                rx: rx_consumer,
                tx: tx_producer,
                counters,
                lines_consumed: 0,
                irq,
            },
            SerialRxIsr {
                rx: rx_producer,
                counters,
            },
            SerialTxIsr { tx: tx_consumer },
        )
    }
}

impl<const N: usize> Default for SerialBuffers<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Main-loop end of the transport
pub struct SerialPort<'a, I, const N: usize = SERIAL_BUFFER_SIZE> {
    rx: Consumer<'a, u8, N>,
    tx: Producer<'a, u8, N>,
    counters: &'a RxCounters,
    /// Terminators read so far (wrapping)
    lines_consumed: u32,
    irq: I,
}

impl<I: TransmitInterrupt, const N: usize> SerialPort<'_, I, N> {
    /// Queue one byte for transmission, spinning while the TX ring is full
    pub fn write_byte(&mut self, byte: u8) {
        while self.tx.push(byte).is_err() {
            core::hint::spin_loop();
        }
        self.irq.arm();
    }

    /// Queue one byte if there is room
    pub fn try_write_byte(&mut self, byte: u8) -> bool {
        let queued = self.tx.push(byte).is_ok();
        if queued {
            self.irq.arm();
        }
        queued
    }

    /// Queue every byte of `bytes`, in order
    pub fn write_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    /// Take one received byte, spinning while the RX ring is empty
    pub fn read_byte(&mut self) -> u8 {
        loop {
            if let Some(byte) = self.try_read_byte() {
                return byte;
            }
            core::hint::spin_loop();
        }
    }

    /// Take one received byte if any is buffered
    pub fn try_read_byte(&mut self) -> Option<u8> {
        let byte = self.rx.pop().ok()?;
        if byte == LINE_END {
            self.lines_consumed = self.lines_consumed.wrapping_add(1);
        }
        Some(byte)
    }

    /// Check if a complete line is buffered
    ///
    /// Once this returns `true`, reading up to the next terminator will not
    /// block.
    pub fn line_available(&self) -> bool {
        self.counters.lines.load(Ordering::Acquire) != self.lines_consumed
    }

    /// Check if any byte is buffered
    pub fn byte_available(&self) -> bool {
        !self.rx.is_empty()
    }

    /// Check if the RX ring is full without holding a complete line
    ///
    /// Nothing more can arrive until the partial data is discarded.
    pub fn rx_stalled(&self) -> bool {
        !self.line_available() && self.rx.len() == RingBuffer::<u8, N>::CAPACITY
    }

    /// Discard the bytes buffered at the time of the call
    ///
    /// Bytes the receive interrupt adds meanwhile are left for the next line.
    pub fn discard_input(&mut self) -> usize {
        let buffered = self.rx.len();
        self.discard(buffered)
    }

    /// Discard up to `count` received bytes, oldest first
    pub fn discard(&mut self, count: usize) -> usize {
        let mut discarded = 0;
        while discarded < count && self.try_read_byte().is_some() {
            discarded += 1;
        }
        discarded
    }

    /// Bytes dropped by the receive interrupt because the ring was full
    pub fn dropped_bytes(&self) -> u32 {
        self.counters.dropped.load(Ordering::Acquire)
    }
}

/// Receive-interrupt end of the transport
pub struct SerialRxIsr<'a, const N: usize = SERIAL_BUFFER_SIZE> {
    rx: Producer<'a, u8, N>,
    counters: &'a RxCounters,
}

impl<const N: usize> SerialRxIsr<'_, N> {
    /// Store a byte taken off the wire
    ///
    /// When the ring is full the byte is dropped and counted; a dropped
    /// terminator does not count as a line. Returns whether it was stored.
    pub fn on_receive(&mut self, byte: u8) -> bool {
        if self.rx.push(byte).is_err() {
            bump(&self.counters.dropped);
            return false;
        }
        if byte == LINE_END {
            bump(&self.counters.lines);
        }
        true
    }
}

/// Transmit-ready-interrupt end of the transport
pub struct SerialTxIsr<'a, const N: usize = SERIAL_BUFFER_SIZE> {
    tx: Consumer<'a, u8, N>,
}

impl<const N: usize> SerialTxIsr<'_, N> {
    /// Next byte to put on the wire
    ///
    /// `None` means the ring ran dry: the handler should disable its
    /// interrupt source until the port re-arms it.
    pub fn on_transmit_ready(&mut self) -> Option<u8> {
        self.tx.pop().ok()
    }

    /// Check if bytes are waiting to go out
    pub fn pending(&self) -> bool {
        !self.tx.is_empty()
    }
}
