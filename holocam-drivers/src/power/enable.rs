//! Driver enable lines
//!
//! Most step/dir driver chips have an enable input, usually active-low.
//! Releasing it lets the motors spin freely.

use holocam_core::traits::MotorPower;
use holocam_hal::OutputPin;

/// One or more driver enable pins switched together
pub struct DriverEnable<P, const K: usize> {
    pins: [P; K],
    /// If true, energised = pin LOW
    active_low: bool,
    on: bool,
}

impl<P: OutputPin, const K: usize> DriverEnable<P, K> {
    /// Take control of the enable pins; the drivers start released
    pub fn new(pins: [P; K], active_low: bool) -> Self {
        let mut enable = Self {
            pins,
            active_low,
            on: true,
        };
        enable.set_energised(false);
        enable
    }

    /// Enable pins driven low to energise (A4988, TMC2209, DRV8825)
    pub fn active_low(pins: [P; K]) -> Self {
        Self::new(pins, true)
    }
}

impl<P: OutputPin, const K: usize> MotorPower for DriverEnable<P, K> {
    fn set_energised(&mut self, on: bool) {
        self.on = on;
        let level = on != self.active_low;
        for pin in &mut self.pins {
            pin.set_state(level);
        }
    }

    fn is_energised(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl MockPin {
        fn new() -> Self {
            Self { high: false }
        }
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_low_enable() {
        let mut enable = DriverEnable::active_low([MockPin::new(), MockPin::new()]);

        // Released: pins high
        assert!(!enable.is_energised());
        assert!(enable.pins.iter().all(|p| p.is_set_high()));

        enable.set_energised(true);
        assert!(enable.is_energised());
        assert!(enable.pins.iter().all(|p| p.is_set_low()));

        enable.set_energised(false);
        assert!(enable.pins.iter().all(|p| p.is_set_high()));
    }

    #[test]
    fn test_active_high_enable() {
        let mut enable = DriverEnable::new([MockPin::new()], false);
        assert!(enable.pins[0].is_set_low());

        enable.set_energised(true);
        assert!(enable.pins[0].is_set_high());
    }

    #[test]
    fn test_power_trait() {
        let mut enable = DriverEnable::active_low([MockPin::new()]);

        fn cycle<M: MotorPower>(m: &mut M) {
            assert!(!m.is_energised());
            m.set_energised(true);
            assert!(m.is_energised());
        }

        cycle(&mut enable);
    }
}
