//! Wire bytes in, step pulses and reply bytes out
//!
//! Each test wires the real transport, dispatcher, movement queue and
//! stepping engine together, with recording drivers on X and Y.

use std::sync::atomic::{AtomicU32, Ordering};

use holocam_core::command::{DispatchError, Dispatcher};
use holocam_core::motion::{
    MotionController, MotionLink, Pose, StepEngine, StepOutcome, POSITION_MAX, POSITION_MIN,
};
use holocam_core::serial::{SerialBuffers, SerialRxIsr, SerialTxIsr};
use holocam_core::traits::{CounterOnly, Direction, MotorPower, StepperDriver};
use holocam_hal::TransmitInterrupt;
use holocam_protocol::{Ack, Command, LineAssembler, Response, LINE_END};

const SERIAL: usize = 256;
const QUEUE: usize = 8;

struct NoIrq;

impl TransmitInterrupt for NoIrq {
    fn arm(&mut self) {}
}

#[derive(Default)]
struct Supply(bool);

impl MotorPower for Supply {
    fn set_energised(&mut self, on: bool) {
        self.0 = on;
    }

    fn is_energised(&self) -> bool {
        self.0
    }
}

#[derive(Default)]
struct Pulses {
    positive: AtomicU32,
    negative: AtomicU32,
}

impl Pulses {
    fn counts(&self) -> (u32, u32) {
        (
            self.positive.load(Ordering::Relaxed),
            self.negative.load(Ordering::Relaxed),
        )
    }
}

struct Recorder<'a>(&'a Pulses);

impl StepperDriver for Recorder<'_> {
    fn step(&mut self, direction: Direction) {
        let counter = match direction {
            Direction::Positive => &self.0.positive,
            Direction::Negative => &self.0.negative,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

struct Rig<'a> {
    rx: SerialRxIsr<'a, SERIAL>,
    tx: SerialTxIsr<'a, SERIAL>,
    dispatcher: Dispatcher<'a, NoIrq, Supply, SERIAL, QUEUE>,
    engine: StepEngine<'a>,
    x: &'a Pulses,
    y: &'a Pulses,
}

impl Rig<'_> {
    fn send(&mut self, command: Command) {
        for byte in command.encode() {
            self.rx.on_receive(byte);
        }
    }

    /// Run the main loop until no line is left, then spin once
    fn main_loop(&mut self) -> Vec<Result<(), DispatchError>> {
        let mut handled = Vec::new();
        loop {
            match self.dispatcher.poll() {
                Ok(None) => break,
                Ok(Some(_)) => handled.push(Ok(())),
                Err(e) => handled.push(Err(e)),
            }
        }
        self.dispatcher.spin();
        handled
    }

    fn request(&mut self, command: Command) -> Response {
        self.send(command);
        self.main_loop();
        let mut replies = self.replies();
        assert_eq!(replies.len(), 1, "expected one reply to {command:?}");
        replies.remove(0)
    }

    fn replies(&mut self) -> Vec<Response> {
        let mut assembler = LineAssembler::new();
        let mut replies = Vec::new();
        while let Some(byte) = self.tx.on_transmit_ready() {
            if let Some(line) = assembler.feed(byte).unwrap() {
                replies.push(Response::parse(&line).unwrap());
            }
        }
        replies
    }

    /// Tick until the in-flight move finishes; returns the tick count
    fn run_move(&mut self) -> usize {
        let mut ticks = 0;
        loop {
            ticks += 1;
            match self.engine.tick() {
                StepOutcome::Stepped => {}
                StepOutcome::Finished => return ticks,
                StepOutcome::Idle => panic!("no move in flight"),
            }
        }
    }
}

fn with_rig(test: impl FnOnce(&mut Rig<'_>)) {
    let mut buffers: SerialBuffers<SERIAL> = SerialBuffers::new();
    let (port, rx, tx) = buffers.split(NoIrq);
    let mut link = MotionLink::new(Pose::ORIGIN);
    let (sender, receiver) = link.split();

    let x_pulses = Pulses::default();
    let y_pulses = Pulses::default();
    let mut x = Recorder(&x_pulses);
    let mut y = Recorder(&y_pulses);
    let mut theta = CounterOnly;
    let mut phi = CounterOnly;

    let engine = StepEngine::new(
        receiver,
        [&mut x, &mut y, &mut theta, &mut phi],
        Pose::ORIGIN,
    );
    let motion: MotionController<'_, QUEUE> = MotionController::new(sender, Pose::ORIGIN);
    let dispatcher = Dispatcher::new(port, motion, Supply::default());

    let mut rig = Rig {
        rx,
        tx,
        dispatcher,
        engine,
        x: &x_pulses,
        y: &y_pulses,
    };
    test(&mut rig);
}

#[test]
fn move_abs_x5_takes_five_ticks() {
    with_rig(|rig| {
        assert_eq!(
            rig.request(Command::MoveAbsolute([5, 0, 0, 0])),
            Response::MoveAbsolute(Ack::Success)
        );

        for expected_x in 1..=5 {
            let outcome = rig.engine.tick();
            assert_eq!(rig.engine.current(), Pose::new(expected_x, 0, 0, 0));
            assert_eq!(rig.x.counts(), (expected_x as u32, 0));
            let expected = if expected_x == 5 {
                StepOutcome::Finished
            } else {
                StepOutcome::Stepped
            };
            assert_eq!(outcome, expected);
        }
        assert_eq!(rig.engine.tick(), StepOutcome::Idle);
        assert_eq!(rig.y.counts(), (0, 0));

        assert_eq!(
            rig.request(Command::GetPosition),
            Response::Positions([5, 0, 0, 0])
        );
        assert_eq!(
            rig.request(Command::GetTarget),
            Response::Positions([5, 0, 0, 0])
        );
    });
}

#[test]
fn negative_moves_pulse_negative() {
    with_rig(|rig| {
        rig.request(Command::MoveAbsolute([-3, 2, 9, -9]));
        assert_eq!(rig.run_move(), 9);
        assert_eq!(rig.x.counts(), (0, 3));
        assert_eq!(rig.y.counts(), (2, 0));
        assert_eq!(
            rig.request(Command::GetPosition),
            Response::Positions([-3, 2, 9, -9])
        );
    });
}

#[test]
fn full_queue_replies_failure() {
    with_rig(|rig| {
        // Hold the engine busy so nothing leaves the queue
        rig.request(Command::MoveAbsolute([100, 0, 0, 0]));
        for i in 1..QUEUE as i16 {
            assert_eq!(
                rig.request(Command::MoveAbsolute([i, i, 0, 0])),
                Response::MoveAbsolute(Ack::Success)
            );
        }
        assert_eq!(rig.dispatcher.motion().pending(), QUEUE - 1);

        assert_eq!(
            rig.request(Command::MoveAbsolute([50, 50, 50, 50])),
            Response::MoveAbsolute(Ack::Failure)
        );
        assert_eq!(
            rig.request(Command::MoveRelative([1, 0, 0, 0])),
            Response::MoveRelative(Ack::Failure)
        );
        assert_eq!(rig.dispatcher.motion().pending(), QUEUE - 1);
        let last = QUEUE as i16 - 1;
        assert_eq!(
            rig.request(Command::GetTarget),
            Response::Positions([last, last, 0, 0])
        );
    });
}

#[test]
fn relative_move_then_get_target() {
    with_rig(|rig| {
        assert_eq!(
            rig.request(Command::MoveRelative([3, -2, 0, 7])),
            Response::MoveRelative(Ack::Success)
        );
        assert_eq!(
            rig.request(Command::GetTarget),
            Response::Positions([3, -2, 0, 7])
        );
    });
}

#[test]
fn relative_move_at_range_edge_is_no_op() {
    with_rig(|rig| {
        rig.request(Command::MoveAbsolute([POSITION_MAX, POSITION_MIN, 0, 0]));
        rig.run_move();
        assert!(!rig.dispatcher.motion().is_moving());

        rig.request(Command::MoveRelative([1, -1, 5, 0]));
        assert_eq!(
            rig.request(Command::GetTarget),
            Response::Positions([POSITION_MAX, POSITION_MIN, 5, 0])
        );
    });
}

#[test]
fn waypoints_run_in_order() {
    with_rig(|rig| {
        let a = [2, 0, 0, 0];
        let b = [2, 3, 0, 0];
        let c = [0, 0, 1, 0];
        for waypoint in [a, b, c] {
            rig.send(Command::MoveAbsolute(waypoint));
        }
        rig.main_loop();
        rig.replies();

        let mut reached = Vec::new();
        for _ in 0..3 {
            rig.run_move();
            reached.push(rig.engine.current());
            rig.main_loop();
        }
        assert_eq!(reached, vec![Pose::from(a), Pose::from(b), Pose::from(c)]);
        assert_eq!(rig.engine.tick(), StepOutcome::Idle);
    });
}

#[test]
fn abort_keeps_in_flight_move() {
    with_rig(|rig| {
        rig.request(Command::MoveAbsolute([4, 0, 0, 0]));
        assert_eq!(rig.engine.tick(), StepOutcome::Stepped);

        rig.request(Command::MoveAbsolute([9, 9, 0, 0]));
        rig.request(Command::MoveAbsolute([8, 8, 0, 0]));
        assert_eq!(rig.dispatcher.motion().pending(), 2);

        rig.send(Command::Abort);
        rig.main_loop();
        assert!(rig.replies().is_empty());
        assert_eq!(rig.dispatcher.motion().pending(), 0);
        assert!(rig.dispatcher.motion().is_moving());

        assert_eq!(rig.run_move(), 3);
        rig.main_loop();
        assert!(!rig.dispatcher.motion().is_moving());
        assert_eq!(rig.engine.tick(), StepOutcome::Idle);
        assert_eq!(
            rig.request(Command::GetPosition),
            Response::Positions([4, 0, 0, 0])
        );
    });
}

#[test]
fn stop_mid_move_releases_after_the_move() {
    with_rig(|rig| {
        assert!(rig.dispatcher.power().is_energised());
        rig.request(Command::MoveAbsolute([10, 0, 0, 0]));
        assert_eq!(rig.engine.tick(), StepOutcome::Stepped);
        assert_eq!(rig.engine.tick(), StepOutcome::Stepped);
        rig.request(Command::MoveAbsolute([20, 0, 0, 0]));

        rig.send(Command::Stop);
        rig.main_loop();
        assert_eq!(rig.dispatcher.motion().pending(), 0);

        // Every remaining step is taken with the drivers still energised
        loop {
            assert!(rig.dispatcher.power().is_energised());
            let outcome = rig.engine.tick();
            rig.main_loop();
            if outcome == StepOutcome::Finished {
                break;
            }
        }
        assert!(!rig.dispatcher.power().is_energised());
        assert_eq!(rig.x.counts(), (10, 0));
        assert_eq!(
            rig.request(Command::GetPosition),
            Response::Positions([10, 0, 0, 0])
        );

        // Moves queued while released wait for START
        assert_eq!(
            rig.request(Command::MoveAbsolute([3, 0, 0, 0])),
            Response::MoveAbsolute(Ack::Success)
        );
        assert_eq!(rig.engine.tick(), StepOutcome::Idle);
        assert!(!rig.dispatcher.motion().is_moving());

        rig.send(Command::Start);
        rig.main_loop();
        assert!(rig.dispatcher.power().is_energised());
        assert_eq!(rig.run_move(), 7);
        assert_eq!(rig.x.counts(), (10, 7));
    });
}

#[test]
fn stop_when_idle_releases_at_once() {
    with_rig(|rig| {
        rig.send(Command::Stop);
        rig.main_loop();
        assert!(!rig.dispatcher.power().is_energised());
        assert!(rig.replies().is_empty());
    });
}

#[test]
fn garbage_line_resynchronises() {
    with_rig(|rig| {
        for &byte in &[0x01, 0x10, 0x20, LINE_END] {
            rig.rx.on_receive(byte);
        }
        rig.send(Command::GetPosition);

        let handled = rig.main_loop();
        assert_eq!(handled.len(), 2);
        assert!(handled[0].is_err());
        assert!(handled[1].is_ok());
        assert_eq!(rig.replies(), vec![Response::Positions([0, 0, 0, 0])]);
    });
}
