//! Main-loop side of motion

use super::link::MoveSender;
use super::position::{Axis, Pose};
use super::queue::{MovementQueue, MOVE_QUEUE_SIZE};
use super::MotionError;

/// Owns the movement queue and feeds the stepping engine
pub struct MotionController<'a, const N: usize = MOVE_QUEUE_SIZE> {
    queue: MovementQueue<N>,
    sender: MoveSender<'a>,
    /// Moves handed to the engine since boot (wrapping)
    dispatched: u32,
}

impl<'a, const N: usize> MotionController<'a, N> {
    /// Create a controller for a machine resting at `start`
    pub fn new(sender: MoveSender<'a>, start: Pose) -> Self {
        Self {
            queue: MovementQueue::new(start),
            sender,
            dispatched: 0,
        }
    }

    /// Queue an absolute waypoint
    pub fn enqueue_absolute(&mut self, waypoint: Pose) -> Result<(), MotionError> {
        self.queue.enqueue_absolute(waypoint)
    }

    /// Queue a waypoint relative to the endgoal
    pub fn enqueue_relative(&mut self, delta: Pose) -> Result<(), MotionError> {
        self.queue.enqueue_relative(delta)
    }

    /// Drop every pending waypoint; an in-flight move still completes
    pub fn abort(&mut self) {
        self.queue.abort();
    }

    /// Hand the next waypoint to the engine if it is idle
    ///
    /// Returns the waypoint handed over so the caller can kick the step
    /// timer.
    pub fn spin(&mut self) -> Option<Pose> {
        if self.is_moving() || !self.sender.is_clear() {
            return None;
        }
        let next = self.queue.take_next()?;
        // The slot was just seen clear and only we fill it
        self.sender.send(next).ok()?;
        self.dispatched = self.dispatched.wrapping_add(1);
        Some(next)
    }

    /// Check if a move is in flight
    pub fn is_moving(&self) -> bool {
        self.sender.status().completed != self.dispatched
    }

    /// Position physically reached, as last published by the engine
    pub fn current_position(&self) -> Pose {
        self.sender.status().current
    }

    /// Endgoal: the last queued waypoint, or the in-flight target
    pub fn target_position(&self) -> Pose {
        self.queue.endgoal()
    }

    /// Number of waypoints not yet started
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drive an axis to its endstop
    ///
    /// No board has endstops wired, so every axis reports unsupported.
    pub fn home(&mut self, axis: Axis) -> Result<(), MotionError> {
        Err(MotionError::HomingUnsupported(axis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::engine::{StepEngine, StepOutcome};
    use crate::motion::link::MotionLink;
    use crate::traits::CounterOnly;

    #[test]
    fn test_spin_dispatches_one_at_a_time() {
        let mut link = MotionLink::new(Pose::ORIGIN);
        let (sender, receiver) = link.split();
        let mut motion: MotionController<'_, 8> = MotionController::new(sender, Pose::ORIGIN);
        let (mut a, mut b, mut c, mut d) = (CounterOnly, CounterOnly, CounterOnly, CounterOnly);
        let mut engine = StepEngine::new(receiver, [&mut a, &mut b, &mut c, &mut d], Pose::ORIGIN);

        motion.enqueue_absolute(Pose::new(2, 0, 0, 0)).unwrap();
        motion.enqueue_absolute(Pose::new(0, 0, 0, 0)).unwrap();

        assert_eq!(motion.spin(), Some(Pose::new(2, 0, 0, 0)));
        assert!(motion.is_moving());
        // Busy: nothing else goes out
        assert_eq!(motion.spin(), None);

        assert_eq!(engine.tick(), StepOutcome::Stepped);
        assert_eq!(motion.spin(), None);
        assert_eq!(engine.tick(), StepOutcome::Finished);
        assert!(!motion.is_moving());
        assert_eq!(motion.current_position(), Pose::new(2, 0, 0, 0));

        assert_eq!(motion.spin(), Some(Pose::ORIGIN));
        assert_eq!(motion.spin(), None);
    }

    #[test]
    fn test_abort_leaves_in_flight_move() {
        let mut link = MotionLink::new(Pose::ORIGIN);
        let (sender, receiver) = link.split();
        let mut motion: MotionController<'_, 8> = MotionController::new(sender, Pose::ORIGIN);
        let (mut a, mut b, mut c, mut d) = (CounterOnly, CounterOnly, CounterOnly, CounterOnly);
        let mut engine = StepEngine::new(receiver, [&mut a, &mut b, &mut c, &mut d], Pose::ORIGIN);

        motion.enqueue_absolute(Pose::new(3, 0, 0, 0)).unwrap();
        motion.spin();
        engine.tick();
        motion.enqueue_absolute(Pose::new(9, 0, 0, 0)).unwrap();
        motion.enqueue_absolute(Pose::new(8, 0, 0, 0)).unwrap();

        motion.abort();
        assert_eq!(motion.pending(), 0);
        assert!(motion.is_moving());
        assert_eq!(motion.target_position(), Pose::new(3, 0, 0, 0));

        while engine.tick() != StepOutcome::Finished {}
        assert!(!motion.is_moving());
        assert_eq!(motion.current_position(), Pose::new(3, 0, 0, 0));
        assert_eq!(motion.spin(), None);
    }

    #[test]
    fn test_homing_unsupported() {
        let mut link = MotionLink::new(Pose::ORIGIN);
        let (sender, _receiver) = link.split();
        let mut motion: MotionController<'_> = MotionController::new(sender, Pose::ORIGIN);
        assert_eq!(motion.home(Axis::Y), Err(MotionError::HomingUnsupported(Axis::Y)));
    }
}
