//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::AXIS_COUNT;

/// Errors reported by [`MachineConfig::validate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate is zero
    ZeroBaudrate,
    /// Step pulse width is zero
    ZeroStepPulse,
    /// Step interval does not leave room for the pulse
    StepIntervalTooShort { interval_us: u32, pulse_us: u32 },
}

/// Host link settings (framing is fixed at 8N1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
}

impl SerialConfig {
    /// 9600 baud
    pub const DEFAULT: Self = Self { baudrate: 9600 };
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Step timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Time between step ticks (µs)
    pub step_interval_us: u32,
    /// How long the step line is held low per pulse (µs)
    pub step_pulse_us: u32,
}

impl MotionConfig {
    /// One step every 16 384 µs with a 2 µs pulse
    pub const DEFAULT: Self = Self {
        step_interval_us: 16_384,
        step_pulse_us: 2,
    };
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What drives an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DriverKind {
    /// Step/direction driver on GPIO
    StepDir,
    /// No hardware; only the position counter moves
    #[default]
    CounterOnly,
}

/// Per-axis configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisConfig {
    pub driver: DriverKind,
    /// Swap the meaning of the direction line
    pub dir_inverted: bool,
}

impl AxisConfig {
    /// Step/dir driver, direction not inverted
    pub const STEP_DIR: Self = Self {
        driver: DriverKind::StepDir,
        dir_inverted: false,
    };

    /// Position counter only
    pub const COUNTER_ONLY: Self = Self {
        driver: DriverKind::CounterOnly,
        dir_inverted: false,
    };
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MachineConfig {
    pub serial: SerialConfig,
    pub motion: MotionConfig,
    /// Axes in wire order: X, Y, Theta, Phi
    pub axes: [AxisConfig; AXIS_COUNT],
}

impl MachineConfig {
    /// X and Y wired to step/dir drivers, Theta and Phi counter-only
    pub const DEFAULT: Self = Self {
        serial: SerialConfig::DEFAULT,
        motion: MotionConfig::DEFAULT,
        axes: [
            AxisConfig::STEP_DIR,
            AxisConfig::STEP_DIR,
            AxisConfig::COUNTER_ONLY,
            AxisConfig::COUNTER_ONLY,
        ],
    };

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.serial.baudrate == 0 {
            return Err(ConfigError::ZeroBaudrate);
        }
        let MotionConfig {
            step_interval_us,
            step_pulse_us,
        } = self.motion;
        if step_pulse_us == 0 {
            return Err(ConfigError::ZeroStepPulse);
        }
        if step_interval_us <= step_pulse_us {
            return Err(ConfigError::StepIntervalTooShort {
                interval_us: step_interval_us,
                pulse_us: step_pulse_us,
            });
        }
        Ok(())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
