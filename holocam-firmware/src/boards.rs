//! Board pin assignments
//!
//! BTT SKR Pico: the X and Y stepper sockets carry the two physical axes.
//! Theta and Phi have no socket. The host link is UART0 on GPIO0/GPIO1.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

/// STEP, DIR and EN lines of one driver socket
pub struct SocketPins {
    pub step: Peri<'static, AnyPin>,
    pub dir: Peri<'static, AnyPin>,
    pub enable: Peri<'static, AnyPin>,
}

/// Pins taken from the peripherals for the stepper sockets
pub struct BoardPins {
    pub x: SocketPins,
    pub y: SocketPins,
}

/// Driver enable inputs are active-low on the onboard TMC2209s
pub const ENABLE_ACTIVE_LOW: bool = true;

/// Take the SKR Pico socket pins out of `p`
///
/// X: STEP=GPIO11, DIR=GPIO10, EN=GPIO12
/// Y: STEP=GPIO6, DIR=GPIO5, EN=GPIO7
macro_rules! skr_pico_pins {
    ($p:ident) => {
        $crate::boards::BoardPins {
            x: $crate::boards::SocketPins {
                step: $p.PIN_11.into(),
                dir: $p.PIN_10.into(),
                enable: $p.PIN_12.into(),
            },
            y: $crate::boards::SocketPins {
                step: $p.PIN_6.into(),
                dir: $p.PIN_5.into(),
                enable: $p.PIN_7.into(),
            },
        }
    };
}

pub(crate) use skr_pico_pins;
