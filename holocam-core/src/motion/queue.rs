//! Movement queue
//!
//! Waypoints that have been requested but not started, plus the target of
//! the move most recently handed to the stepping engine. Owned entirely by
//! the main loop: the command dispatch pushes, the idle check pops.

use super::position::Pose;
use super::MotionError;
use crate::ring::RingBuffer;

/// Default ring size for pending waypoints (holds one less)
pub const MOVE_QUEUE_SIZE: usize = 64;

/// FIFO of pending waypoints
pub struct MovementQueue<const N: usize = MOVE_QUEUE_SIZE> {
    pending: RingBuffer<Pose, N>,
    /// Waypoint most recently taken for execution
    target: Pose,
}

impl<const N: usize> MovementQueue<N> {
    /// Create an empty queue whose last target is `start`
    pub const fn new(start: Pose) -> Self {
        Self {
            pending: RingBuffer::new(),
            target: start,
        }
    }

    /// Queue an absolute waypoint, stored verbatim
    pub fn enqueue_absolute(&mut self, waypoint: Pose) -> Result<(), MotionError> {
        self.pending
            .push(waypoint)
            .map_err(|_| MotionError::QueueFull)
    }

    /// Queue a waypoint offset from the current endgoal
    ///
    /// Each axis uses [`safe_add`](super::safe_add): an axis whose result
    /// would leave the position range keeps its endgoal value.
    pub fn enqueue_relative(&mut self, delta: Pose) -> Result<(), MotionError> {
        let waypoint = self.endgoal().offset_by(&delta);
        self.enqueue_absolute(waypoint)
    }

    /// Discard every pending waypoint
    ///
    /// A move already handed to the stepping engine is not affected.
    pub fn abort(&mut self) {
        self.pending.clear();
    }

    /// Where the machine ends up once everything queued has run
    ///
    /// The last queued waypoint, or the last taken target when nothing is
    /// queued.
    pub fn endgoal(&self) -> Pose {
        self.pending.back().unwrap_or(self.target)
    }

    /// Waypoint most recently taken for execution
    pub fn target(&self) -> Pose {
        self.target
    }

    /// Take the oldest waypoint for execution; it becomes the target
    pub fn take_next(&mut self) -> Option<Pose> {
        let next = self.pending.pop().ok()?;
        self.target = next;
        Some(next)
    }

    /// Number of pending waypoints
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Check if another waypoint would be refused
    pub fn is_full(&self) -> bool {
        self.pending.is_full()
    }
}

impl<const N: usize> Default for MovementQueue<N> {
    fn default() -> Self {
        Self::new(Pose::ORIGIN)
    }
}
