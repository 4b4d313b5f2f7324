//! Host UART receive task
//!
//! Moves bytes from the UART into the RX ring. Never blocks on the ring:
//! bytes that do not fit are dropped.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use holocam_core::serial::SerialRxIsr;

/// Bytes pulled from the UART per read
const RX_CHUNK: usize = 32;

#[embassy_executor::task]
pub async fn serial_rx_task(mut rx: BufferedUartRx, mut isr: SerialRxIsr<'static>) {
    info!("Serial RX task started");

    let mut buf = [0u8; RX_CHUNK];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) => {
                trace!("RX: {} bytes", n);
                let mut dropped = 0u32;
                for &byte in &buf[..n] {
                    if !isr.on_receive(byte) {
                        dropped += 1;
                    }
                }
                if dropped > 0 {
                    warn!("RX ring full, dropped {} bytes", dropped);
                }
            }
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
