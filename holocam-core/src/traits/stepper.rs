//! Stepper motor driver trait
//!
//! The stepping engine only ever asks a driver for one thing: "take one
//! step in this direction". Physical step/dir drivers and axes that are not
//! wired to hardware yet implement the same trait, so wiring up a real
//! driver for an axis later does not touch the engine.

/// Direction of travel along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Toward increasing position
    Positive,
    /// Toward decreasing position
    Negative,
}

impl Direction {
    /// Direction that takes `from` toward `to`
    ///
    /// Equal positions yield `Negative`; such an axis never steps anyway.
    pub fn toward(from: i16, to: i16) -> Self {
        if to > from {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }

    /// Position change produced by one step
    pub fn delta(self) -> i16 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }
}

/// Trait for stepper motor drivers
///
/// Called from the step-timer context, so implementations must not block
/// beyond the few microseconds a step pulse takes.
pub trait StepperDriver {
    /// Set the direction line and emit one step pulse
    fn step(&mut self, direction: Direction);
}

impl<D: StepperDriver + ?Sized> StepperDriver for &mut D {
    fn step(&mut self, direction: Direction) {
        (**self).step(direction);
    }
}

/// Driver for an axis with no hardware attached yet
///
/// The engine still advances the axis' position counter; nothing is pulsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterOnly;

impl StepperDriver for CounterOnly {
    fn step(&mut self, _direction: Direction) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_toward() {
        assert_eq!(Direction::toward(0, 5), Direction::Positive);
        assert_eq!(Direction::toward(5, 0), Direction::Negative);
        assert_eq!(Direction::toward(-3, -2), Direction::Positive);
    }

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::Positive.delta(), 1);
        assert_eq!(Direction::Negative.delta(), -1);
    }

    #[test]
    fn test_counter_only_is_a_driver() {
        let mut stub = CounterOnly;
        let driver: &mut dyn StepperDriver = &mut stub;
        driver.step(Direction::Positive);
    }
}
