//! Elevation, water and land-use edits
//!
//! Elevation edits are transactional. Candidate corner heights are computed
//! for every touched cell, every road edge of those cells is checked against
//! the candidates, and only then is anything written. Rivers that the new
//! heights make uphill are removed after the commit.

use crate::cell::{CellId, Industry, MaterialTag, Scenery, SettlementId};
use crate::chunk::RefreshScope;
use crate::direction::Direction;
use crate::elevation::ElevationGrid;
use crate::error::EditError;
use crate::grid::Grid;

impl Grid {
    /// Raise or lower one corner of a cell.
    pub fn change_vertex_elevation(
        &mut self,
        id: CellId,
        vertex: Direction,
        delta: i32,
    ) -> Result<(), EditError> {
        self.change_vertex_elevations(&[(id, vertex)], delta)
    }

    /// Apply `delta` to several corners as one edit. Either every corner
    /// changes or none does.
    pub fn change_vertex_elevations(
        &mut self,
        vertices: &[(CellId, Direction)],
        delta: i32,
    ) -> Result<(), EditError> {
        let mut candidates: Vec<(CellId, ElevationGrid)> = Vec::with_capacity(vertices.len());
        for &(id, vertex) in vertices {
            if !vertex.is_diagonal() {
                return Err(EditError::NotACorner(vertex));
            }
            let index = match candidates.iter().position(|(c, _)| *c == id) {
                Some(index) => index,
                None => {
                    candidates.push((id, *self.cell(id).elevation()));
                    candidates.len() - 1
                }
            };
            let corners = &mut candidates[index].1;
            corners[vertex] = corners[vertex].checked_add(delta).ok_or(EditError::LevelOverflow)?;
        }

        if let Err(e) = self.check_roads_against(&candidates) {
            log::debug!("Could not change elevation: {}", e);
            return Err(e);
        }

        for &(id, corners) in &candidates {
            self.cell_mut(id).elevation = corners;
        }
        self.after_elevation_change(&candidates);
        Ok(())
    }

    /// Replace all four corners of a cell at once.
    pub fn set_elevations(&mut self, id: CellId, elevation: ElevationGrid) -> Result<(), EditError> {
        let candidates = [(id, elevation)];
        self.check_roads_against(&candidates)?;
        self.cell_mut(id).elevation = elevation;
        self.after_elevation_change(&candidates);
        Ok(())
    }

    /// Every road on a candidate cell must stay cliff-free and within the
    /// slope limit when measured against the candidate heights.
    fn check_roads_against(&self, candidates: &[(CellId, ElevationGrid)]) -> Result<(), EditError> {
        let lookup = |id: CellId| {
            candidates
                .iter()
                .find(|(c, _)| *c == id)
                .map(|(_, corners)| corners)
                .unwrap_or_else(|| self.cell(id).elevation())
        };
        let limit = self.config().max_road_slope;

        for &(id, ref corners) in candidates {
            for direction in self.cell(id).roads() {
                let neighbor = self.neighbor(id, direction).map(lookup);
                if corners.has_cliff_with(direction, neighbor)
                    || corners.difference_across(direction, neighbor) > limit
                {
                    return Err(EditError::RoadConstraint { cell: id, direction });
                }
            }
        }
        Ok(())
    }

    fn after_elevation_change(&mut self, changed: &[(CellId, ElevationGrid)]) {
        for &(id, _) in changed {
            self.prune_rivers(id);
        }
        for &(id, _) in changed {
            self.refresh(id, RefreshScope::Full);
        }
    }

    pub fn set_water_level(&mut self, id: CellId, level: i32) {
        if self.cell(id).water_level() == level {
            return;
        }
        self.cell_mut(id).water_level = level;
        self.refresh(id, RefreshScope::Full);
    }

    pub fn change_water_level(&mut self, id: CellId, delta: i32) -> Result<(), EditError> {
        let level = self
            .cell(id)
            .water_level()
            .checked_add(delta)
            .ok_or(EditError::LevelOverflow)?;
        self.set_water_level(id, level);
        Ok(())
    }

    pub fn set_material(&mut self, id: CellId, material: MaterialTag) {
        if self.cell(id).material() == material {
            return;
        }
        self.cell_mut(id).material = material;
        self.refresh(id, RefreshScope::Full);
    }

    pub fn set_urban_level(&mut self, id: CellId, level: u8) {
        if self.cell(id).urban_level() != level {
            self.cell_mut(id).urban_level = level;
            self.refresh(id, RefreshScope::SelfOnly);
        }
    }

    pub fn set_plant_level(&mut self, id: CellId, level: u8) {
        if self.cell(id).plant_level() != level {
            self.cell_mut(id).plant_level = level;
            self.refresh(id, RefreshScope::SelfOnly);
        }
    }

    pub fn set_scenery(&mut self, id: CellId, scenery: Option<Scenery>) {
        if self.cell(id).scenery() != scenery {
            self.cell_mut(id).scenery = scenery;
            self.refresh(id, RefreshScope::SelfOnly);
        }
    }

    pub fn set_industry(&mut self, id: CellId, industry: Option<Industry>) {
        if self.cell(id).industry() != industry {
            self.cell_mut(id).industry = industry;
            self.refresh(id, RefreshScope::SelfOnly);
        }
    }

    /// Attach a settlement. A cell holds at most one.
    pub fn found_settlement(&mut self, id: CellId, settlement: SettlementId) -> Result<(), EditError> {
        if self.cell(id).settlement().is_some() {
            return Err(EditError::SettlementExists);
        }
        self.cell_mut(id).settlement = Some(settlement);
        self.refresh(id, RefreshScope::SelfOnly);
        Ok(())
    }

    /// Clear every structure and land use from the cell.
    pub fn demolish(&mut self, id: CellId) {
        let cell = self.cell_mut(id);
        cell.urban_level = 0;
        cell.plant_level = 0;
        cell.scenery = None;
        cell.industry = None;
        cell.settlement = None;
        self.refresh(id, RefreshScope::Full);
    }
}
