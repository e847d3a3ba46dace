//! Per-corner cell elevations and the cliff / slope rules between cells

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::direction::Direction;

/// Integer elevations of a cell's four corners.
///
/// Indexed by the diagonal directions only. Orthogonal directions name
/// edges, not corners, and indexing with one is a caller bug.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElevationGrid {
    corners: [i32; 4],
}

impl ElevationGrid {
    pub const fn new(ne: i32, se: i32, sw: i32, nw: i32) -> Self {
        Self { corners: [ne, se, sw, nw] }
    }

    /// All four corners at the same height.
    pub const fn flat(height: i32) -> Self {
        Self { corners: [height; 4] }
    }

    #[inline]
    fn slot(corner: Direction) -> usize {
        match corner {
            Direction::NE => 0,
            Direction::SE => 1,
            Direction::SW => 2,
            Direction::NW => 3,
            Direction::N | Direction::E | Direction::S | Direction::W => {
                panic!("{} is not a corner", corner)
            }
        }
    }

    /// Mean of the four corners.
    pub fn centre(&self) -> f32 {
        self.corners.iter().map(|&c| c as i64).sum::<i64>() as f32 / 4.0
    }

    pub fn min(&self) -> i32 {
        self.corners.iter().copied().min().unwrap_or_default()
    }

    pub fn max(&self) -> i32 {
        self.corners.iter().copied().max().unwrap_or_default()
    }

    /// Largest corner mismatch across the edge in `dir`.
    ///
    /// Compared against `neighbor` when there is one. At the grid boundary the
    /// edge corners are compared with the corners on the far side of this
    /// cell, which measures the slope running into that edge.
    pub fn difference_across(&self, dir: Direction, neighbor: Option<&ElevationGrid>) -> i32 {
        let other = neighbor.unwrap_or(self);
        dir.shared_corners()
            .iter()
            .map(|&(own, theirs)| (self[own] as i64 - other[theirs] as i64).abs())
            .max()
            .map_or(0, |d| d.min(i32::MAX as i64) as i32)
    }

    /// True when the corners bounding the edge in `dir` do not meet the
    /// neighbor's corners exactly. Never a cliff without a neighbor.
    pub fn has_cliff_with(&self, dir: Direction, neighbor: Option<&ElevationGrid>) -> bool {
        match neighbor {
            Some(other) => dir
                .shared_corners()
                .iter()
                .any(|&(own, theirs)| self[own] != other[theirs]),
            None => false,
        }
    }
}

/// # Panics
///
/// Panics when indexed with an orthogonal direction. Use
/// `Direction::is_diagonal` to check untrusted input first.
impl Index<Direction> for ElevationGrid {
    type Output = i32;

    fn index(&self, corner: Direction) -> &i32 {
        &self.corners[Self::slot(corner)]
    }
}

impl IndexMut<Direction> for ElevationGrid {
    fn index_mut(&mut self, corner: Direction) -> &mut i32 {
        &mut self.corners[Self::slot(corner)]
    }
}
