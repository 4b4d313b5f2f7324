//! Configuration types
//!
//! Board-agnostic machine configuration. The firmware build reads it from
//! `machine.toml` and bakes it in as a constant; nothing is persisted at
//! runtime.

pub mod types;

pub use types::*;
