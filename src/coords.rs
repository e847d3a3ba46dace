//! Offset grid coordinates and world-space metrics
//!
//! Cells sit on integer (x, z) offsets; cell (x, z) is centred on world
//! position (x * CELL_SIZE, 0, z * CELL_SIZE). Elevation is stored in integer
//! steps and scaled by `ELEVATION_STEP` when converted to world height.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::direction::Direction;

/// World-space width of one cell.
pub const CELL_SIZE: f32 = 1.0;

/// World-space height of one elevation step.
pub const ELEVATION_STEP: f32 = 0.25;

/// Water and river surfaces sit this many steps below their nominal level.
pub const WATER_ELEVATION_OFFSET: f32 = -0.5;

/// A position in world space (y is up).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPosition {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Position on the ground plane.
    pub const fn flat(x: f32, z: f32) -> Self {
        Self { x, y: 0.0, z }
    }
}

impl Add for WorldPosition {
    type Output = WorldPosition;

    fn add(self, rhs: WorldPosition) -> WorldPosition {
        WorldPosition::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for WorldPosition {
    type Output = WorldPosition;

    fn sub(self, rhs: WorldPosition) -> WorldPosition {
        WorldPosition::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// Integer cell coordinate in row-major offset layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub z: i32,
}

impl GridCoord {
    pub const fn from_offset(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Nearest cell coordinate to a world position (ignores height).
    pub fn from_position(position: WorldPosition) -> Self {
        let (fx, fz) = Self::fractional(position);
        Self {
            x: fx.round() as i32,
            z: fz.round() as i32,
        }
    }

    /// World position in cell units, before rounding.
    pub fn fractional(position: WorldPosition) -> (f32, f32) {
        (position.x / CELL_SIZE, position.z / CELL_SIZE)
    }

    /// Centre of the cell on the ground plane.
    pub fn to_position(self) -> WorldPosition {
        WorldPosition::flat(self.x as f32 * CELL_SIZE, self.z as f32 * CELL_SIZE)
    }

    /// The adjacent coordinate in `dir`. May lie outside any grid.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dz) = dir.offset();
        Self::from_offset(self.x + dx, self.z + dz)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Offset from a cell centre to its corner or edge midpoint in `dir`.
pub fn corner_offset(dir: Direction) -> WorldPosition {
    let (dx, dz) = dir.offset();
    let half = CELL_SIZE * 0.5;
    WorldPosition::flat(dx as f32 * half, dz as f32 * half)
}
