//! Axis positions
//!
//! A position is a signed step count per axis. Positions are stored in 16
//! bits but kept within the signed 8-bit range; the headroom lets a sum of
//! two in-range positions be computed without overflow before it is
//! checked.

use core::ops::{Index, IndexMut};

use holocam_protocol::Positions;

/// Step count along one axis
pub type Position = i16;

/// Lowest position an axis may be driven to by a relative move
pub const POSITION_MIN: Position = i8::MIN as Position;

/// Highest position an axis may be driven to by a relative move
pub const POSITION_MAX: Position = i8::MAX as Position;

/// Number of logical axes
pub const AXIS_COUNT: usize = 4;

/// Add two positions, refusing to leave `[POSITION_MIN, POSITION_MAX]`
///
/// If the sum would fall outside the range, `a` is returned unchanged:
/// the axis does not move rather than being clamped to the bound.
pub fn safe_add(a: Position, b: Position) -> Position {
    let sum = a as i32 + b as i32;
    if sum > POSITION_MAX as i32 || sum < POSITION_MIN as i32 {
        a
    } else {
        sum as Position
    }
}

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Theta,
    Phi,
}

impl Axis {
    /// All axes in wire order
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Theta, Axis::Phi];

    /// Index of this axis in a [`Pose`]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Theta => 2,
            Axis::Phi => 3,
        }
    }
}

/// One position per axis, always carried together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pose([Position; AXIS_COUNT]);

impl Pose {
    /// All axes at zero
    pub const ORIGIN: Pose = Pose([0; AXIS_COUNT]);

    /// Create a pose from per-axis positions
    pub const fn new(x: Position, y: Position, theta: Position, phi: Position) -> Self {
        Self([x, y, theta, phi])
    }

    /// Position of a single axis
    pub fn get(&self, axis: Axis) -> Position {
        self.0[axis.index()]
    }

    /// Per-axis positions, X first
    pub fn as_array(&self) -> &[Position; AXIS_COUNT] {
        &self.0
    }

    /// Offset every axis by `delta` using [`safe_add`]
    pub fn offset_by(&self, delta: &Pose) -> Pose {
        let mut out = *self;
        for (position, &d) in out.0.iter_mut().zip(delta.0.iter()) {
            *position = safe_add(*position, d);
        }
        out
    }
}

impl Index<Axis> for Pose {
    type Output = Position;

    fn index(&self, axis: Axis) -> &Position {
        &self.0[axis.index()]
    }
}

impl IndexMut<Axis> for Pose {
    fn index_mut(&mut self, axis: Axis) -> &mut Position {
        &mut self.0[axis.index()]
    }
}

impl From<Positions> for Pose {
    fn from(positions: Positions) -> Self {
        Self(positions)
    }
}

impl From<Pose> for Positions {
    fn from(pose: Pose) -> Self {
        pose.0
    }
}
