//! Host Serial Protocol
//!
//! This crate defines the byte-level contract between the host computer and
//! the positioning platform. Every frame is a *line*: an opcode byte, an
//! opcode-specific payload, and the terminator `0x0D`.
//!
//! # Protocol Overview
//!
//! ```text
//! ┌────────┬──────────────────────────────┬──────┐
//! │ OPCODE │ PAYLOAD                      │ 0x0D │
//! │ 1B     │ 0 or 4 × 3B codec positions  │ 1B   │
//! └────────┴──────────────────────────────┴──────┘
//! ```
//!
//! Positions travel as 3-byte codec frames (see [`codec`]) that can never
//! contain the terminator, so a receiver can count complete lines by
//! counting `0x0D` bytes without parsing anything.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod codec;
pub mod line;
pub mod messages;

pub use codec::{decode_position, encode_position, CODEC_FRAME_LEN};
pub use line::{Line, LineAssembler, LineError, MAX_LINE_LEN};
pub use messages::{Ack, Command, Positions, ProtocolError, Response, AXIS_COUNT};

/// Line terminator; never appears inside an encoded payload
pub const LINE_END: u8 = 0x0D;
