//! Command and response messages
//!
//! Commands flow host → device, responses device → host. Both are carried
//! as lines (see [`crate::line`]); the types here deal only with the bytes
//! between the start of a line and its terminator.

use heapless::Vec;

use crate::codec::{decode_positions, encode_positions, POSITIONS_LEN};
use crate::line::MAX_LINE_LEN;
use crate::LINE_END;

/// Number of axes carried in every position message (X, Y, Theta, Phi)
pub const AXIS_COUNT: usize = 4;

/// One position per axis, X first
pub type Positions = [i16; AXIS_COUNT];

/// Wire opcodes
pub mod opcode {
    // Host → device
    pub const MOVE_ABS: u8 = 0x01;
    pub const MOVE_REL: u8 = 0x02;
    pub const GET_POS: u8 = 0x03;
    pub const HOME_X: u8 = 0x04;
    pub const HOME_Y: u8 = 0x05;
    pub const START: u8 = 0x06;
    pub const STOP: u8 = 0x07;
    pub const ABORT: u8 = 0x08;
    pub const GET_TARGET: u8 = 0x0F;

    // Device → host
    pub const POSITIONS_RETURN: u8 = 0x0A;
    pub const SUCCESS: u8 = 0x0B;
    pub const FAILURE: u8 = 0x0C;
    pub const MOVE_ABS_RETURN: u8 = 0x0E;
    pub const MOVE_REL_RETURN: u8 = 0x10;
}

/// Longest encoded response, terminator included
pub const MAX_RESPONSE_LEN: usize = 1 + POSITIONS_LEN + 1;

/// Errors that can occur while parsing a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolError {
    /// Line carried no opcode
    EmptyLine,
    /// Opcode is not part of the protocol
    UnknownOpcode(u8),
    /// Payload shorter than the opcode requires
    Truncated { expected: usize, actual: usize },
}

/// Commands sent by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Queue an absolute waypoint
    MoveAbsolute(Positions),
    /// Queue a waypoint relative to the current endgoal
    MoveRelative(Positions),
    /// Report the position physically reached
    GetPosition,
    /// Home the X axis
    HomeX,
    /// Home the Y axis
    HomeY,
    /// Energise the stepper drivers
    Start,
    /// Drop queued waypoints and de-energise the drivers
    Stop,
    /// Drop queued waypoints
    Abort,
    /// Report the endgoal (last queued waypoint, or the in-flight target)
    GetTarget,
}

impl Command {
    /// Wire opcode for this command
    pub fn opcode(&self) -> u8 {
        match self {
            Command::MoveAbsolute(_) => opcode::MOVE_ABS,
            Command::MoveRelative(_) => opcode::MOVE_REL,
            Command::GetPosition => opcode::GET_POS,
            Command::HomeX => opcode::HOME_X,
            Command::HomeY => opcode::HOME_Y,
            Command::Start => opcode::START,
            Command::Stop => opcode::STOP,
            Command::Abort => opcode::ABORT,
            Command::GetTarget => opcode::GET_TARGET,
        }
    }

    /// Parse a command from a line (terminator already stripped)
    ///
    /// Bytes beyond what the opcode needs are ignored.
    pub fn parse(line: &[u8]) -> Result<Self, ProtocolError> {
        let (&op, payload) = line.split_first().ok_or(ProtocolError::EmptyLine)?;

        let command = match op {
            opcode::MOVE_ABS => Command::MoveAbsolute(parse_positions(payload)?),
            opcode::MOVE_REL => Command::MoveRelative(parse_positions(payload)?),
            opcode::GET_POS => Command::GetPosition,
            opcode::HOME_X => Command::HomeX,
            opcode::HOME_Y => Command::HomeY,
            opcode::START => Command::Start,
            opcode::STOP => Command::Stop,
            opcode::ABORT => Command::Abort,
            opcode::GET_TARGET => Command::GetTarget,
            other => return Err(ProtocolError::UnknownOpcode(other)),
        };

        Ok(command)
    }

    /// Encode this command as a complete line, terminator included
    pub fn encode(&self) -> Vec<u8, MAX_LINE_LEN> {
        let mut out = Vec::new();
        // Capacity covers the longest command, pushes cannot fail
        let _ = out.push(self.opcode());
        if let Command::MoveAbsolute(positions) | Command::MoveRelative(positions) = self {
            let _ = out.extend_from_slice(&encode_positions(positions));
        }
        let _ = out.push(LINE_END);
        out
    }
}

/// Outcome byte of a move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ack {
    Success,
    Failure,
}

impl Ack {
    fn to_byte(self) -> u8 {
        match self {
            Ack::Success => opcode::SUCCESS,
            Ack::Failure => opcode::FAILURE,
        }
    }
}

impl From<bool> for Ack {
    fn from(ok: bool) -> Self {
        if ok {
            Ack::Success
        } else {
            Ack::Failure
        }
    }
}

/// Responses sent by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// Reply to [`Command::MoveAbsolute`]
    MoveAbsolute(Ack),
    /// Reply to [`Command::MoveRelative`]
    MoveRelative(Ack),
    /// Reply to [`Command::GetPosition`] and [`Command::GetTarget`]
    Positions(Positions),
}

impl Response {
    /// Wire opcode for this response
    pub fn opcode(&self) -> u8 {
        match self {
            Response::MoveAbsolute(_) => opcode::MOVE_ABS_RETURN,
            Response::MoveRelative(_) => opcode::MOVE_REL_RETURN,
            Response::Positions(_) => opcode::POSITIONS_RETURN,
        }
    }

    /// Encode this response as a complete line, terminator included
    pub fn encode(&self) -> Vec<u8, MAX_RESPONSE_LEN> {
        let mut out = Vec::new();
        let _ = out.push(self.opcode());
        match self {
            Response::MoveAbsolute(ack) | Response::MoveRelative(ack) => {
                let _ = out.push(ack.to_byte());
            }
            Response::Positions(positions) => {
                let _ = out.extend_from_slice(&encode_positions(positions));
            }
        }
        let _ = out.push(LINE_END);
        out
    }

    /// Parse a response from a line (terminator already stripped)
    pub fn parse(line: &[u8]) -> Result<Self, ProtocolError> {
        let (&op, payload) = line.split_first().ok_or(ProtocolError::EmptyLine)?;

        match op {
            opcode::MOVE_ABS_RETURN => Ok(Response::MoveAbsolute(parse_ack(payload)?)),
            opcode::MOVE_REL_RETURN => Ok(Response::MoveRelative(parse_ack(payload)?)),
            opcode::POSITIONS_RETURN => Ok(Response::Positions(parse_positions(payload)?)),
            other => Err(ProtocolError::UnknownOpcode(other)),
        }
    }
}

fn parse_positions(payload: &[u8]) -> Result<Positions, ProtocolError> {
    let bytes: &[u8; POSITIONS_LEN] = payload
        .get(..POSITIONS_LEN)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(ProtocolError::Truncated {
            expected: POSITIONS_LEN,
            actual: payload.len(),
        })?;
    Ok(decode_positions(bytes))
}

fn parse_ack(payload: &[u8]) -> Result<Ack, ProtocolError> {
    match payload.first() {
        Some(&opcode::SUCCESS) => Ok(Ack::Success),
        Some(_) => Ok(Ack::Failure),
        None => Err(ProtocolError::Truncated {
            expected: 1,
            actual: 0,
        }),
    }
}
