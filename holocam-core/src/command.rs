//! Protocol dispatch
//!
//! Runs in the main loop. Waits for a complete line on the serial port,
//! parses it, applies it to the motion controller and driver power, and
//! writes the reply. Malformed lines are consumed whole and produce no
//! reply; the next line starts clean.

use holocam_hal::TransmitInterrupt;
use holocam_protocol::{Ack, Command, Line, LineAssembler, LineError, ProtocolError, Response};

use crate::motion::{Axis, MotionController, MotionError, Pose, MOVE_QUEUE_SIZE};
use crate::serial::{SerialPort, SERIAL_BUFFER_SIZE};
use crate::traits::MotorPower;

/// Reasons a received line was not executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DispatchError {
    /// Line too long; discarded
    Line(LineError),
    /// Line did not parse; discarded
    Protocol(ProtocolError),
    /// RX ring filled up without a terminator; its contents were discarded
    RxStalled { discarded: usize },
}

impl From<LineError> for DispatchError {
    fn from(e: LineError) -> Self {
        DispatchError::Line(e)
    }
}

impl From<ProtocolError> for DispatchError {
    fn from(e: ProtocolError) -> Self {
        DispatchError::Protocol(e)
    }
}

/// A command that was executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Dispatched {
    pub command: Command,
    /// Motion-level result; a queue-full move has already been reported to
    /// the host as a failure
    pub result: Result<(), MotionError>,
}

/// Main-loop command handler
pub struct Dispatcher<
    'a,
    I,
    P,
    const S: usize = SERIAL_BUFFER_SIZE,
    const Q: usize = MOVE_QUEUE_SIZE,
> {
    port: SerialPort<'a, I, S>,
    motion: MotionController<'a, Q>,
    power: P,
    assembler: LineAssembler,
    /// STOP arrived mid-move; release the drivers once the move finishes
    release_pending: bool,
}

impl<'a, I, P, const S: usize, const Q: usize> Dispatcher<'a, I, P, S, Q>
where
    I: TransmitInterrupt,
    P: MotorPower,
{
    /// Create a dispatcher; the drivers are energised straight away
    pub fn new(port: SerialPort<'a, I, S>, motion: MotionController<'a, Q>, mut power: P) -> Self {
        power.set_energised(true);
        Self {
            port,
            motion,
            power,
            assembler: LineAssembler::new(),
            release_pending: false,
        }
    }

    /// Handle at most one buffered line
    ///
    /// Returns `Ok(None)` when no complete line is waiting.
    pub fn poll(&mut self) -> Result<Option<Dispatched>, DispatchError> {
        if self.port.rx_stalled() {
            let discarded = self.port.discard_input();
            self.assembler.reset();
            return Err(DispatchError::RxStalled { discarded });
        }
        if !self.port.line_available() {
            return Ok(None);
        }

        let line = self.read_line()?;
        let command = Command::parse(&line)?;
        let result = self.execute(command);
        Ok(Some(Dispatched { command, result }))
    }

    /// Hand the next queued waypoint to the engine if it is idle
    ///
    /// Nothing is handed over while the drivers are released, and a release
    /// deferred by STOP takes effect here once the engine goes idle.
    pub fn spin(&mut self) -> Option<Pose> {
        if self.release_pending {
            if self.motion.is_moving() {
                return None;
            }
            self.release_pending = false;
            self.power.set_energised(false);
        }
        if !self.power.is_energised() {
            return None;
        }
        self.motion.spin()
    }

    fn read_line(&mut self) -> Result<Line, LineError> {
        // A terminator is buffered, so this ends without blocking for long
        loop {
            let byte = self.port.read_byte();
            if let Some(line) = self.assembler.feed(byte)? {
                return Ok(line);
            }
        }
    }

    fn execute(&mut self, command: Command) -> Result<(), MotionError> {
        match command {
            Command::MoveAbsolute(positions) => {
                let result = self.motion.enqueue_absolute(positions.into());
                self.respond(Response::MoveAbsolute(Ack::from(result.is_ok())));
                result
            }
            Command::MoveRelative(deltas) => {
                let result = self.motion.enqueue_relative(deltas.into());
                self.respond(Response::MoveRelative(Ack::from(result.is_ok())));
                result
            }
            Command::GetPosition => {
                let current = self.motion.current_position();
                self.respond(Response::Positions(current.into()));
                Ok(())
            }
            Command::GetTarget => {
                let endgoal = self.motion.target_position();
                self.respond(Response::Positions(endgoal.into()));
                Ok(())
            }
            Command::HomeX => self.motion.home(Axis::X),
            Command::HomeY => self.motion.home(Axis::Y),
            Command::Start => {
                self.release_pending = false;
                self.power.set_energised(true);
                Ok(())
            }
            Command::Stop => {
                self.motion.abort();
                // The in-flight move still needs powered drivers to finish
                if self.motion.is_moving() {
                    self.release_pending = true;
                } else {
                    self.power.set_energised(false);
                }
                Ok(())
            }
            Command::Abort => {
                self.motion.abort();
                Ok(())
            }
        }
    }

    fn respond(&mut self, response: Response) {
        self.port.write_all(&response.encode());
    }

    /// Motion controller, for status queries
    pub fn motion(&self) -> &MotionController<'a, Q> {
        &self.motion
    }

    /// Serial port, for overload counters
    pub fn port(&self) -> &SerialPort<'a, I, S> {
        &self.port
    }

    /// Driver power switch
    pub fn power(&self) -> &P {
        &self.power
    }
}
