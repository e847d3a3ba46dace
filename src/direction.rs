//! Eight-way compass directions and per-direction storage
//!
//! Directions are ordered clockwise starting at north. That order is the
//! canonical enumeration used to index every per-direction array in the grid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One of the eight compass directions around a cell.
///
/// Orthogonal directions name the edges a cell shares with its side
/// neighbors; diagonal directions name the cell's corners (and the single
/// point it shares with a diagonal neighbor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Direction {
    /// All directions in canonical order (N -> NW).
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// The four corner directions, in the order corners are stored.
    pub const CORNERS: [Direction; 4] = [Direction::NE, Direction::SE, Direction::SW, Direction::NW];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at a canonical index, wrapping modulo 8.
    #[inline]
    pub const fn from_index(index: usize) -> Direction {
        Self::ALL[index % 8]
    }

    #[inline]
    pub const fn opposite(self) -> Direction {
        Self::from_index(self.index() + 4)
    }

    #[inline]
    pub const fn next(self) -> Direction {
        Self::from_index(self.index() + 1)
    }

    #[inline]
    pub const fn previous(self) -> Direction {
        Self::from_index(self.index() + 7)
    }

    #[inline]
    pub const fn next2(self) -> Direction {
        Self::from_index(self.index() + 2)
    }

    #[inline]
    pub const fn previous2(self) -> Direction {
        Self::from_index(self.index() + 6)
    }

    /// True for NE, SE, SW and NW.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self.index() % 2 == 1
    }

    /// Step in offset coordinates. North is +z, east is +x.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::N => (0, 1),
            Direction::NE => (1, 1),
            Direction::E => (1, 0),
            Direction::SE => (1, -1),
            Direction::S => (0, -1),
            Direction::SW => (-1, -1),
            Direction::W => (-1, 0),
            Direction::NW => (-1, 1),
        }
    }

    /// Corner pairs bounding the edge in this direction, as
    /// `(own corner, neighbor corner)`.
    ///
    /// For a side edge these are the two corners at its ends. A diagonal
    /// edge degenerates to the one point both cells touch, so both pairs
    /// are the same.
    pub const fn shared_corners(self) -> [(Direction, Direction); 2] {
        if self.is_diagonal() {
            let pair = (self, self.opposite());
            [pair, pair]
        } else {
            [
                (self.previous(), self.opposite().next()),
                (self.next(), self.opposite().previous()),
            ]
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed-size storage with one slot per direction.
///
/// Callers index with a `Direction`, never with a raw ordinal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionMap<T>([T; 8]);

impl<T: Copy> DirectionMap<T> {
    pub fn filled(value: T) -> Self {
        Self([value; 8])
    }
}

impl<T> DirectionMap<T> {
    /// Iterate `(direction, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, &T)> {
        Direction::ALL.into_iter().zip(self.0.iter())
    }
}

impl DirectionMap<bool> {
    pub fn any(&self) -> bool {
        self.0.iter().any(|&set| set)
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&set| set).count()
    }

    /// Directions whose flag is set.
    pub fn set_directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.iter().filter(|&(_, &set)| set).map(|(dir, _)| dir)
    }

    pub fn clear(&mut self) {
        self.0 = [false; 8];
    }
}

impl<T> Index<Direction> for DirectionMap<T> {
    type Output = T;

    fn index(&self, dir: Direction) -> &T {
        &self.0[dir.index()]
    }
}

impl<T> IndexMut<Direction> for DirectionMap<T> {
    fn index_mut(&mut self, dir: Direction) -> &mut T {
        &mut self.0[dir.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotations_are_cyclic() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.next().previous(), dir);
            assert_eq!(dir.next2().previous2(), dir);
            assert_eq!(dir.next().next(), dir.next2());
            assert_eq!(dir.next2().next2(), dir.opposite());
        }
        assert_eq!(Direction::NW.next(), Direction::N);
        assert_eq!(Direction::N.previous(), Direction::NW);
        assert_eq!(Direction::NE.previous2(), Direction::NW);
        assert_eq!(Direction::SE.opposite(), Direction::NW);
    }

    #[test]
    fn test_canonical_order() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), *dir);
        }
        assert_eq!(Direction::from_index(9), Direction::NE);
    }

    #[test]
    fn test_offsets_cancel_with_opposite() {
        for dir in Direction::ALL {
            let (dx, dz) = dir.offset();
            let (ox, oz) = dir.opposite().offset();
            assert_eq!((dx + ox, dz + oz), (0, 0));
        }
    }

    #[test]
    fn test_shared_corners() {
        // North neighbor: our NW meets its SW, our NE meets its SE.
        assert_eq!(
            Direction::N.shared_corners(),
            [(Direction::NW, Direction::SW), (Direction::NE, Direction::SE)]
        );
        assert_eq!(
            Direction::E.shared_corners(),
            [(Direction::NE, Direction::NW), (Direction::SE, Direction::SW)]
        );
        assert_eq!(Direction::SW.shared_corners()[0], (Direction::SW, Direction::NE));
        for dir in Direction::ALL {
            for (own, other) in dir.shared_corners() {
                assert!(own.is_diagonal() && other.is_diagonal());
            }
        }
    }

    #[test]
    fn test_direction_map() {
        let mut flags = DirectionMap::filled(false);
        assert!(!flags.any());
        flags[Direction::E] = true;
        flags[Direction::NW] = true;
        assert_eq!(flags.count(), 2);
        assert_eq!(flags.set_directions().collect::<Vec<_>>(), vec![Direction::E, Direction::NW]);
        flags.clear();
        assert_eq!(flags.count(), 0);
    }
}
