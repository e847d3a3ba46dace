//! Rejection reasons for cell edits

use crate::cell::CellId;
use crate::direction::Direction;

/// Why an edit was refused. A rejected edit leaves every cell untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditError {
    /// The edge already carries a road
    RoadExists,
    /// The edge already carries an outgoing river
    RiverExists,
    /// Rivers cannot start in a cell that has roads
    RiverBlockedByRoad,
    /// Roads cannot be built in a cell that has rivers
    RoadBlockedByRiver,
    /// There is no cell on the far side of the edge
    NoNeighbor,
    /// Rivers never flow into a higher cell
    Uphill,
    /// Roads cannot cross a cliff
    Cliff,
    /// The edge is steeper than a road allows
    TooSteep { difference: i32, limit: i32 },
    /// The elevation change would leave a road on a cliff or too steep
    RoadConstraint { cell: CellId, direction: Direction },
    /// Vertex edits need a diagonal direction
    NotACorner(Direction),
    /// The cell already hosts a settlement
    SettlementExists,
    /// The target lies outside the grid
    CellOutOfBounds,
    /// The change would take an elevation or water level past what an
    /// `i32` can hold
    LevelOverflow,
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::RoadExists => write!(f, "road already present"),
            EditError::RiverExists => write!(f, "outgoing river already present"),
            EditError::RiverBlockedByRoad => write!(f, "cell has roads"),
            EditError::RoadBlockedByRiver => write!(f, "cell has a river"),
            EditError::NoNeighbor => write!(f, "no neighbor in that direction"),
            EditError::Uphill => write!(f, "river would flow uphill"),
            EditError::Cliff => write!(f, "edge is a cliff"),
            EditError::TooSteep { difference, limit } => {
                write!(f, "elevation difference {} exceeds {}", difference, limit)
            }
            EditError::RoadConstraint { cell, direction } => {
                write!(f, "road on cell {} edge {} would break", cell.0, direction)
            }
            EditError::NotACorner(dir) => write!(f, "{} is not a corner", dir),
            EditError::SettlementExists => write!(f, "cell already has a settlement"),
            EditError::CellOutOfBounds => write!(f, "cell outside grid"),
            EditError::LevelOverflow => write!(f, "level out of range"),
        }
    }
}

impl std::error::Error for EditError {}
