//! Step timer task
//!
//! Woken when the main loop hands over a waypoint. Ticks the stepping
//! engine at the configured interval until the move finishes, then sleeps
//! again.

use defmt::*;
use embassy_time::{Duration, Timer};

use holocam_core::motion::{StepEngine, StepOutcome};

use crate::channels::STEP_KICK;

#[embassy_executor::task]
pub async fn stepper_task(mut engine: StepEngine<'static>, interval: Duration) {
    info!("Stepper task started, tick every {} us", interval.as_micros());

    loop {
        STEP_KICK.wait().await;

        loop {
            match engine.tick() {
                StepOutcome::Stepped => Timer::after(interval).await,
                StepOutcome::Finished => {
                    debug!("Move finished at {:?}", engine.current());
                    break;
                }
                StepOutcome::Idle => break,
            }
        }
    }
}
