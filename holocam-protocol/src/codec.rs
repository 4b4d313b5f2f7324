//! Position codec
//!
//! A position is a signed 16-bit value. Sent as two raw bytes, either byte
//! could equal the line terminator `0x0D`, so each is sent with its least
//! significant bit cleared (an even byte is never `0x0D`) and the two
//! evicted bits travel in the low bits of a third byte:
//!
//! ```text
//! byte 0: high byte & 0xFE
//! byte 1: low byte  & 0xFE
//! byte 2: 0b0000_00HL   (H = LSB of high byte, L = LSB of low byte)
//! ```
//!
//! Byte 2 is at most `0x03`, so it cannot collide with the terminator either.

use crate::messages::{Positions, AXIS_COUNT};

/// Encoded size of one position
pub const CODEC_FRAME_LEN: usize = 3;

/// Encoded size of a full four-axis position set
pub const POSITIONS_LEN: usize = CODEC_FRAME_LEN * AXIS_COUNT;

const LOW_BIT: u8 = 0x01;
const HIGH_BIT: u8 = 0x02;

/// Encode one position into its 3-byte frame
pub fn encode_position(position: i16) -> [u8; CODEC_FRAME_LEN] {
    let [high, low] = position.to_be_bytes();
    [
        high & !LOW_BIT,
        low & !LOW_BIT,
        (low & LOW_BIT) | ((high & LOW_BIT) << 1),
    ]
}

/// Decode a 3-byte frame back into a position
///
/// Decoding ORs the evicted bits back in; stray bits set where the encoder
/// would have left zeros are not rejected.
pub fn decode_position(frame: [u8; CODEC_FRAME_LEN]) -> i16 {
    let high = frame[0] | ((frame[2] & HIGH_BIT) >> 1);
    let low = frame[1] | (frame[2] & LOW_BIT);
    i16::from_be_bytes([high, low])
}

/// Encode all four axes, X first
pub fn encode_positions(positions: &Positions) -> [u8; POSITIONS_LEN] {
    let mut out = [0u8; POSITIONS_LEN];
    for (chunk, &position) in out.chunks_exact_mut(CODEC_FRAME_LEN).zip(positions) {
        chunk.copy_from_slice(&encode_position(position));
    }
    out
}

/// Decode all four axes, X first
pub fn decode_positions(bytes: &[u8; POSITIONS_LEN]) -> Positions {
    let mut out = [0i16; AXIS_COUNT];
    for (position, chunk) in out.iter_mut().zip(bytes.chunks_exact(CODEC_FRAME_LEN)) {
        *position = decode_position([chunk[0], chunk[1], chunk[2]]);
    }
    out
}
