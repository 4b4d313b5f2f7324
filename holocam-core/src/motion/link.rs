//! Main loop ↔ step timer link
//!
//! Two one-way channels, each with a single writer:
//!
//! - main → timer: a one-slot ring carrying the next whole waypoint.
//! - timer → main: a [`MotionStatus`] snapshot, replaced whole under a
//!   critical section so the main loop never sees a half-updated pose.
//!
//! "Is a move in flight" is derived on the main side from how many moves
//! it has sent versus how many the engine reports completed, so neither
//! side writes a flag the other also writes.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::position::Pose;
use crate::ring::{Consumer, Producer, RingBuffer, RingError};

/// Handoff ring size; holds a single waypoint
const HANDOFF_SIZE: usize = 2;

/// Snapshot published by the stepping engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionStatus {
    /// Position physically reached
    pub current: Pose,
    /// Number of moves finished since boot (wrapping)
    pub completed: u32,
}

/// Shared storage for both channels
pub struct MotionLink {
    handoff: RingBuffer<Pose, HANDOFF_SIZE>,
    status: Mutex<CriticalSectionRawMutex, Cell<MotionStatus>>,
}

impl MotionLink {
    /// Create a link for a machine resting at `start`
    pub const fn new(start: Pose) -> Self {
        Self {
            handoff: RingBuffer::new(),
            status: Mutex::new(Cell::new(MotionStatus {
                current: start,
                completed: 0,
            })),
        }
    }

    /// Split into the main-loop end and the step-timer end
    pub fn split(&mut self) -> (MoveSender<'_>, MoveReceiver<'_>) {
        let (producer, consumer) = self.handoff.split();
        let status = &self.status;
        (
            MoveSender {
                handoff: producer,
                status,
            },
            MoveReceiver {
                handoff: consumer,
                status,
            },
        )
    }
}

/// Main-loop end: sends waypoints, reads status
pub struct MoveSender<'a> {
    handoff: Producer<'a, Pose, HANDOFF_SIZE>,
    status: &'a Mutex<CriticalSectionRawMutex, Cell<MotionStatus>>,
}

impl MoveSender<'_> {
    /// Hand a waypoint to the engine
    ///
    /// Fails if the previous one has not been picked up yet.
    pub fn send(&mut self, waypoint: Pose) -> Result<(), RingError> {
        self.handoff.push(waypoint)
    }

    /// Check if the handoff slot is free
    pub fn is_clear(&self) -> bool {
        self.handoff.is_empty()
    }

    /// Latest snapshot published by the engine
    pub fn status(&self) -> MotionStatus {
        self.status.lock(|cell| cell.get())
    }
}

/// Step-timer end: receives waypoints, publishes status
pub struct MoveReceiver<'a> {
    handoff: Consumer<'a, Pose, HANDOFF_SIZE>,
    status: &'a Mutex<CriticalSectionRawMutex, Cell<MotionStatus>>,
}

impl MoveReceiver<'_> {
    /// Take the waypoint waiting in the handoff slot
    pub fn take(&mut self) -> Option<Pose> {
        self.handoff.pop().ok()
    }

    /// Replace the published snapshot
    pub fn publish(&mut self, status: MotionStatus) {
        self.status.lock(|cell| cell.set(status));
    }
}
