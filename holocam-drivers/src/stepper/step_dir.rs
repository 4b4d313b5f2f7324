//! Step/direction stepper driver
//!
//! Drives any stepper driver chip with a STEP and a DIR input. The step
//! line idles high; a step is a low pulse of configurable width, and the
//! driver steps on the rising edge that ends it.

use embedded_hal::delay::DelayNs;
use holocam_core::traits::{Direction, StepperDriver};
use holocam_hal::OutputPin;

/// Stepper driven through STEP and DIR pins
pub struct StepDirDriver<S, D, T> {
    step: S,
    dir: D,
    delay: T,
    /// Width of the low step pulse (µs)
    pulse_us: u32,
    /// DIR high means negative travel
    dir_inverted: bool,
}

impl<S: OutputPin, D: OutputPin, T: DelayNs> StepDirDriver<S, D, T> {
    /// Create a driver; the step line is put in its idle (high) state
    pub fn new(mut step: S, dir: D, delay: T, pulse_us: u32, dir_inverted: bool) -> Self {
        step.set_high();
        Self {
            step,
            dir,
            delay,
            pulse_us,
            dir_inverted,
        }
    }

    fn dir_level(&self, direction: Direction) -> bool {
        (direction == Direction::Positive) != self.dir_inverted
    }
}

impl<S: OutputPin, D: OutputPin, T: DelayNs> StepperDriver for StepDirDriver<S, D, T> {
    fn step(&mut self, direction: Direction) {
        let level = self.dir_level(direction);
        self.dir.set_state(level);
        self.step.set_low();
        self.delay.delay_us(self.pulse_us);
        self.step.set_high();
    }
}
