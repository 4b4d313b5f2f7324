//! Holocam - Positioning Platform Firmware
//!
//! Main firmware binary for RP2040-based controller boards. A host
//! computer queues absolute and relative waypoints for four axes (X, Y,
//! Theta, Phi) over a serial link; the firmware steps every axis toward
//! the current waypoint one step per timer tick.
//!
//! Two executors share the single core:
//!
//! - Interrupt executor (SWI_IRQ_1): UART receive, UART transmit and the
//!   step timer. Short, never blocking on the main loop.
//! - Thread-mode executor: the main loop, which may busy-wait on the
//!   serial rings because the interrupt executor preempts it.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::{Delay, Duration};
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use holocam_core::command::Dispatcher;
use holocam_core::config::DriverKind;
use holocam_core::motion::{
    Axis, AxisDriver, MotionController, MotionLink, Pose, StepEngine, AXIS_COUNT,
};
use holocam_core::serial::SerialBuffers;
use holocam_core::traits::CounterOnly;
use holocam_drivers::power::DriverEnable;
use holocam_drivers::stepper::StepDirDriver;
use holocam_hal::UartConfig;
use holocam_hal_rp2040::{embassy_config, RpOutput, SignalTransmit};

use crate::channels::TX_READY;
use crate::config::MACHINE_CONFIG;

mod boards;
mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Step/dir driver as wired on this board
type SocketStepper = StepDirDriver<RpOutput<'static>, RpOutput<'static>, Delay>;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

// UART driver FIFOs (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

// Cross-context state, split into single-owner halves at startup
static SERIAL: ConstStaticCell<SerialBuffers> = ConstStaticCell::new(SerialBuffers::new());
static LINK: ConstStaticCell<MotionLink> = ConstStaticCell::new(MotionLink::new(Pose::ORIGIN));

static X_STEPPER: StaticCell<SocketStepper> = StaticCell::new();
static Y_STEPPER: StaticCell<SocketStepper> = StaticCell::new();
static COUNTERS: StaticCell<[CounterOnly; AXIS_COUNT]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Holocam firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = &MACHINE_CONFIG;
    info!("Machine config: {:?}", config);

    let pins = boards::skr_pico_pins!(p);

    // Host serial link
    let uart_config = embassy_config(&UartConfig::eight_n_one(config.serial.baudrate));
    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (uart_tx, uart_rx) = uart.split();

    let (port, rx_isr, tx_isr) = SERIAL.take().split(SignalTransmit::new(&TX_READY));
    info!("UART initialized at {} baud", config.serial.baudrate);

    // Stepper drivers
    let pulse_us = config.motion.step_pulse_us;
    let x_stepper = X_STEPPER.init(StepDirDriver::new(
        RpOutput::new(pins.x.step, true),
        RpOutput::new(pins.x.dir, false),
        Delay,
        pulse_us,
        config.axes[Axis::X.index()].dir_inverted,
    ));
    let y_stepper = Y_STEPPER.init(StepDirDriver::new(
        RpOutput::new(pins.y.step, true),
        RpOutput::new(pins.y.dir, false),
        Delay,
        pulse_us,
        config.axes[Axis::Y.index()].dir_inverted,
    ));
    let [x_counter, y_counter, theta_counter, phi_counter] =
        COUNTERS.init([CounterOnly; AXIS_COUNT]).each_mut();

    let drivers: [AxisDriver<'static>; AXIS_COUNT] = [
        select_driver(Axis::X, Some(x_stepper), x_counter),
        select_driver(Axis::Y, Some(y_stepper), y_counter),
        select_driver(Axis::Theta, None, theta_counter),
        select_driver(Axis::Phi, None, phi_counter),
    ];

    // Released until the dispatcher energises them
    let enable = DriverEnable::new(
        [
            RpOutput::new(pins.x.enable, boards::ENABLE_ACTIVE_LOW),
            RpOutput::new(pins.y.enable, boards::ENABLE_ACTIVE_LOW),
        ],
        boards::ENABLE_ACTIVE_LOW,
    );
    info!("Stepper drivers initialized");

    let (sender, receiver) = LINK.take().split();
    let engine = StepEngine::new(receiver, drivers, Pose::ORIGIN);
    let motion = MotionController::new(sender, Pose::ORIGIN);
    let dispatcher = Dispatcher::new(port, motion, enable);

    // Interrupt-context work
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);
    high.spawn(tasks::serial_rx_task(uart_rx, rx_isr)).unwrap();
    high.spawn(tasks::serial_tx_task(uart_tx, tx_isr)).unwrap();
    let interval = Duration::from_micros(config.motion.step_interval_us as u64);
    high.spawn(tasks::stepper_task(engine, interval)).unwrap();

    // Main loop
    spawner.spawn(tasks::controller_task(dispatcher)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Pick the driver for an axis according to machine.toml
///
/// An axis configured as step/dir without a socket on this board falls
/// back to counting only.
fn select_driver(
    axis: Axis,
    socket: Option<&'static mut SocketStepper>,
    counter: &'static mut CounterOnly,
) -> AxisDriver<'static> {
    match (MACHINE_CONFIG.axes[axis.index()].driver, socket) {
        (DriverKind::StepDir, Some(stepper)) => stepper,
        (DriverKind::StepDir, None) => {
            warn!("{:?} has no driver socket, counting steps only", axis);
            counter
        }
        (DriverKind::CounterOnly, _) => counter,
    }
}
