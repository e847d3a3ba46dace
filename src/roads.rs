//! Road edits
//!
//! A road is a flag on an edge shared by both cells: adding or removing it on
//! one side updates the neighbor's opposite edge as well. Roads at the grid
//! boundary have no far side and live on the one cell only.

use crate::cell::CellId;
use crate::chunk::RefreshScope;
use crate::direction::Direction;
use crate::error::EditError;
use crate::grid::Grid;

impl Grid {
    pub fn add_road(&mut self, id: CellId, dir: Direction) -> Result<(), EditError> {
        let result = self.check_road(id, dir);
        if let Err(e) = result {
            log::debug!("Could not add road at {} {}: {}", self.cell(id).coord(), dir, e);
            return Err(e);
        }

        self.set_road(id, dir, true);
        Ok(())
    }

    fn check_road(&self, id: CellId, dir: Direction) -> Result<(), EditError> {
        let cell = self.cell(id);
        if cell.has_road_through_edge(dir) {
            return Err(EditError::RoadExists);
        }
        let neighbor_has_river = cell.neighbor(dir).is_some_and(|n| self.cell(n).has_river());
        if cell.has_river() || neighbor_has_river {
            return Err(EditError::RoadBlockedByRiver);
        }
        if self.has_cliff(id, dir) {
            return Err(EditError::Cliff);
        }
        let difference = self.elevation_difference(id, dir);
        let limit = self.config().max_road_slope;
        if difference > limit {
            return Err(EditError::TooSteep { difference, limit });
        }
        Ok(())
    }

    /// Returns false when there was no road to remove.
    pub fn remove_road(&mut self, id: CellId, dir: Direction) -> bool {
        if !self.cell(id).has_road_through_edge(dir) {
            return false;
        }
        self.set_road(id, dir, false);
        true
    }

    pub fn remove_roads(&mut self, id: CellId) {
        let dirs: Vec<Direction> = self.cell(id).roads().collect();
        for dir in dirs {
            self.remove_road(id, dir);
        }
    }

    fn set_road(&mut self, id: CellId, dir: Direction, state: bool) {
        self.cell_mut(id).roads[dir] = state;
        self.refresh(id, RefreshScope::SelfOnly);
        if let Some(neighbor) = self.neighbor(id, dir) {
            self.cell_mut(neighbor).roads[dir.opposite()] = state;
            self.refresh(neighbor, RefreshScope::SelfOnly);
        }
    }
}
