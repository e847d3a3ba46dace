//! River edits
//!
//! A river is a directed flag on an edge: outgoing on the upstream cell and
//! incoming on the downstream cell's opposite edge. Both flags are always set
//! and cleared together.

use crate::cell::CellId;
use crate::chunk::RefreshScope;
use crate::direction::Direction;
use crate::error::EditError;
use crate::grid::Grid;

impl Grid {
    /// Start a river flowing from `id` into its neighbor in `dir`.
    ///
    /// An incoming river on the same edge is replaced by the new flow.
    pub fn set_outgoing_river(&mut self, id: CellId, dir: Direction) -> Result<(), EditError> {
        let cell = self.cell(id);
        if cell.has_outgoing_river(dir) {
            log::debug!("Could not add river at {} {}: {}", cell.coord(), dir, EditError::RiverExists);
            return Err(EditError::RiverExists);
        }
        if cell.has_roads() {
            log::debug!("Could not add river at {} {}: {}", cell.coord(), dir, EditError::RiverBlockedByRoad);
            return Err(EditError::RiverBlockedByRoad);
        }
        let neighbor = cell.neighbor(dir).ok_or(EditError::NoNeighbor)?;
        if cell.centre_elevation() < self.cell(neighbor).centre_elevation() {
            log::debug!("Could not add river uphill at {} {}", cell.coord(), dir);
            return Err(EditError::Uphill);
        }

        self.remove_incoming_river(id, dir);
        self.cell_mut(id).outgoing_rivers[dir] = true;
        self.refresh(id, RefreshScope::SelfOnly);

        let back = dir.opposite();
        self.remove_outgoing_river(neighbor, back);
        self.cell_mut(neighbor).incoming_rivers[back] = true;
        self.refresh(neighbor, RefreshScope::SelfOnly);
        Ok(())
    }

    /// Bring a river into `id` from its neighbor in `dir`. Same rules as
    /// `set_outgoing_river`, applied from the upstream side.
    pub fn set_incoming_river(&mut self, id: CellId, dir: Direction) -> Result<(), EditError> {
        let upstream = self.neighbor(id, dir).ok_or(EditError::NoNeighbor)?;
        self.set_outgoing_river(upstream, dir.opposite())
    }

    /// Returns false when there was no river to remove.
    pub fn remove_outgoing_river(&mut self, id: CellId, dir: Direction) -> bool {
        if !self.cell(id).has_outgoing_river(dir) {
            return false;
        }
        self.cell_mut(id).outgoing_rivers[dir] = false;
        self.refresh(id, RefreshScope::SelfOnly);

        if let Some(neighbor) = self.neighbor(id, dir) {
            self.cell_mut(neighbor).incoming_rivers[dir.opposite()] = false;
            self.refresh(neighbor, RefreshScope::SelfOnly);
        }
        true
    }

    /// Returns false when there was no river to remove.
    pub fn remove_incoming_river(&mut self, id: CellId, dir: Direction) -> bool {
        if !self.cell(id).has_incoming_river(dir) {
            return false;
        }
        self.cell_mut(id).incoming_rivers[dir] = false;
        self.refresh(id, RefreshScope::SelfOnly);

        if let Some(neighbor) = self.neighbor(id, dir) {
            self.cell_mut(neighbor).outgoing_rivers[dir.opposite()] = false;
            self.refresh(neighbor, RefreshScope::SelfOnly);
        }
        true
    }

    pub fn remove_outgoing_rivers(&mut self, id: CellId) {
        let dirs: Vec<Direction> = self.cell(id).outgoing_rivers().collect();
        for dir in dirs {
            self.remove_outgoing_river(id, dir);
        }
    }

    pub fn remove_incoming_rivers(&mut self, id: CellId) {
        let dirs: Vec<Direction> = self.cell(id).incoming_rivers().collect();
        for dir in dirs {
            self.remove_incoming_river(id, dir);
        }
    }

    pub fn remove_rivers(&mut self, id: CellId) {
        self.remove_outgoing_rivers(id);
        self.remove_incoming_rivers(id);
    }

    /// Drop rivers that the cell's current centre elevation no longer allows.
    pub(crate) fn prune_rivers(&mut self, id: CellId) {
        let centre = self.cell(id).centre_elevation();
        for dir in Direction::ALL {
            let Some(neighbor) = self.neighbor(id, dir) else {
                continue;
            };
            let neighbor_centre = self.cell(neighbor).centre_elevation();
            if self.cell(id).has_outgoing_river(dir) && centre < neighbor_centre {
                self.remove_outgoing_river(id, dir);
            }
            if self.cell(id).has_incoming_river(dir) && centre > neighbor_centre {
                self.remove_incoming_river(id, dir);
            }
        }
    }
}
