//! Machine configuration baked in from machine.toml

use holocam_core::config::{AxisConfig, DriverKind, MachineConfig, MotionConfig, SerialConfig};

include!(concat!(env!("OUT_DIR"), "/machine_config.rs"));
