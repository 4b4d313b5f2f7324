//! Main loop
//!
//! Handles host commands and feeds the stepping engine. Runs on the
//! thread-mode executor: the transport's busy-waits here are preempted by
//! the serial tasks on the interrupt executor.

use defmt::*;
use embassy_futures::yield_now;

use holocam_core::command::{DispatchError, Dispatched, Dispatcher};
use holocam_drivers::power::DriverEnable;
use holocam_hal_rp2040::{RpOutput, SignalTransmit};

use crate::channels::STEP_KICK;

/// Dispatcher as wired on this board
pub type HostDispatcher =
    Dispatcher<'static, SignalTransmit, DriverEnable<RpOutput<'static>, 2>>;

#[embassy_executor::task]
pub async fn controller_task(mut dispatcher: HostDispatcher) {
    info!("Controller task started");

    let mut dropped_seen = 0u32;

    loop {
        match dispatcher.poll() {
            Ok(Some(Dispatched { command, result })) => match result {
                Ok(()) => debug!("Handled {:?}", command),
                Err(e) => warn!("{:?} failed: {:?}", command, e),
            },
            Ok(None) => {}
            Err(DispatchError::RxStalled { discarded }) => {
                warn!("RX ring filled without a line, discarded {} bytes", discarded);
            }
            Err(e) => warn!("Discarded line: {:?}", e),
        }

        if let Some(waypoint) = dispatcher.spin() {
            debug!("Moving to {:?}", waypoint);
            STEP_KICK.signal(());
        }

        let dropped = dispatcher.port().dropped_bytes();
        if dropped != dropped_seen {
            warn!("{} received bytes dropped so far", dropped);
            dropped_seen = dropped;
        }

        yield_now().await;
    }
}
