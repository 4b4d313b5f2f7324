//! Host UART transmit task
//!
//! Sleeps until the main loop queues bytes, then drains the TX ring into
//! the UART. Going back to sleep when the ring is empty is the equivalent
//! of disabling the transmit-ready interrupt.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embedded_io_async::Write;

use holocam_core::serial::SerialTxIsr;

use crate::channels::TX_READY;

/// Bytes handed to the UART per write
const TX_CHUNK: usize = 16;

#[embassy_executor::task]
pub async fn serial_tx_task(mut tx: BufferedUartTx, mut isr: SerialTxIsr<'static>) {
    info!("Serial TX task started");

    let mut buf = [0u8; TX_CHUNK];

    loop {
        TX_READY.wait().await;

        loop {
            let mut len = 0;
            while len < TX_CHUNK {
                match isr.on_transmit_ready() {
                    Some(byte) => {
                        buf[len] = byte;
                        len += 1;
                    }
                    None => break,
                }
            }
            if len == 0 {
                break;
            }
            if let Err(e) = tx.write_all(&buf[..len]).await {
                warn!("UART write error: {:?}", e);
            }
        }
    }
}
