//! Line assembly
//!
//! Collects bytes until the terminator and hands back the completed line
//! without the terminator. A line that outgrows the buffer is discarded as
//! a whole at its terminator, so the assembler always resynchronises on the
//! next line.

use heapless::Vec;

use crate::LINE_END;

/// Longest line kept; anything longer is dropped
///
/// The longest valid command is an opcode plus four codec positions
/// (13 bytes).
pub const MAX_LINE_LEN: usize = 32;

/// A complete line, terminator stripped
pub type Line = Vec<u8, MAX_LINE_LEN>;

/// Errors that can occur while assembling a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// The line was longer than [`MAX_LINE_LEN`] and has been discarded
    Overflow,
}

/// Accumulates bytes into lines
#[derive(Debug, Clone, Default)]
pub struct LineAssembler {
    buffer: Line,
    overflowed: bool,
}

impl LineAssembler {
    /// Create an empty assembler
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            overflowed: false,
        }
    }

    /// Discard any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
    }

    /// Number of bytes of the partial line held so far
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte
    ///
    /// Returns `Ok(Some(line))` on the terminator, `Ok(None)` when more
    /// bytes are needed, or `Err` when the finished line had overflowed.
    pub fn feed(&mut self, byte: u8) -> Result<Option<Line>, LineError> {
        if byte == LINE_END {
            let overflowed = self.overflowed;
            let line = core::mem::take(&mut self.buffer);
            self.overflowed = false;
            if overflowed {
                return Err(LineError::Overflow);
            }
            return Ok(Some(line));
        }

        if self.buffer.push(byte).is_err() {
            self.overflowed = true;
        }
        Ok(None)
    }

    /// Feed multiple bytes
    ///
    /// Returns the first complete line found, if any. Bytes after that
    /// line's terminator are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Result<Option<Line>, LineError> {
        for &byte in bytes {
            if let Some(line) = self.feed(byte)? {
                return Ok(Some(line));
            }
        }
        Ok(None)
    }
}
