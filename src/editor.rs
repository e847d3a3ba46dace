//! Editing policy layered over the grid
//!
//! The grid enforces per-edit invariants. This module adds what an
//! interactive editor does on top: one command type for every edit, shared
//! corners moved together when cliffs are not allowed, square brushes and
//! river drags between adjacent cells.

use serde::{Deserialize, Serialize};

use crate::cell::{CellId, Industry, MaterialTag, Scenery, SettlementId};
use crate::coords::GridCoord;
use crate::direction::Direction;
use crate::error::EditError;
use crate::grid::Grid;

/// A single-cell edit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    SetMaterial { material: MaterialTag },
    ChangeVertexElevation { vertex: Direction, delta: i32 },
    SetOutgoingRiver { direction: Direction },
    RemoveRivers,
    AddRoad { direction: Direction },
    RemoveRoad { direction: Direction },
    RemoveRoads,
    ChangeWaterLevel { delta: i32 },
    SetUrbanLevel { level: u8 },
    SetPlantLevel { level: u8 },
    SetScenery { scenery: Option<Scenery> },
    SetIndustry { industry: Option<Industry> },
    FoundSettlement { settlement: SettlementId },
    Demolish,
}

impl Grid {
    /// Run one command against one cell.
    pub fn apply(&mut self, id: CellId, command: Command) -> Result<(), EditError> {
        match command {
            Command::ChangeVertexElevation { vertex, delta } => {
                return self.change_vertex_elevation(id, vertex, delta)
            }
            Command::SetOutgoingRiver { direction } => return self.set_outgoing_river(id, direction),
            Command::AddRoad { direction } => return self.add_road(id, direction),
            Command::FoundSettlement { settlement } => return self.found_settlement(id, settlement),
            Command::RemoveRoad { direction } => {
                self.remove_road(id, direction);
            }
            Command::SetMaterial { material } => self.set_material(id, material),
            Command::RemoveRivers => self.remove_rivers(id),
            Command::RemoveRoads => self.remove_roads(id),
            Command::ChangeWaterLevel { delta } => return self.change_water_level(id, delta),
            Command::SetUrbanLevel { level } => self.set_urban_level(id, level),
            Command::SetPlantLevel { level } => self.set_plant_level(id, level),
            Command::SetScenery { scenery } => self.set_scenery(id, scenery),
            Command::SetIndustry { industry } => self.set_industry(id, industry),
            Command::Demolish => self.demolish(id),
        }
        // The remaining edits cannot be rejected.
        Ok(())
    }
}

/// One step of an edit script: a command aimed at a cell coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    pub x: i32,
    pub z: i32,
    pub command: Command,
}

/// Outcome counts for a batch of edits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditReport {
    pub applied: usize,
    pub rejected: usize,
}

impl EditReport {
    fn record(&mut self, result: &Result<(), EditError>) {
        match result {
            Ok(()) => self.applied += 1,
            Err(_) => self.rejected += 1,
        }
    }
}

/// Editor settings that shape how commands reach the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Editor {
    /// When false, raising a corner raises the same point on every cell
    /// that shares it, so no cliff opens.
    pub allow_cliffs: bool,
    /// Side length of the square brush, in cells.
    pub brush_size: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            allow_cliffs: false,
            brush_size: 1,
        }
    }
}

impl Editor {
    /// Every (cell, corner) pair that meets at `vertex` of `id`, starting
    /// with `id` itself. Up to four entries.
    pub fn shared_vertex(grid: &Grid, id: CellId, vertex: Direction) -> Vec<(CellId, Direction)> {
        let mut shared = vec![(id, vertex)];
        let around = [
            (vertex, vertex.opposite()),
            (vertex.next(), vertex.previous2()),
            (vertex.previous(), vertex.next2()),
        ];
        for (dir, corner) in around {
            if let Some(neighbor) = grid.neighbor(id, dir) {
                shared.push((neighbor, corner));
            }
        }
        shared
    }

    /// Apply a command the way the editor would, mirroring vertex edits
    /// onto neighbors when cliffs are disallowed.
    pub fn apply(&self, grid: &mut Grid, id: CellId, command: Command) -> Result<(), EditError> {
        match command {
            Command::ChangeVertexElevation { vertex, delta } if !self.allow_cliffs => {
                if !vertex.is_diagonal() {
                    return Err(EditError::NotACorner(vertex));
                }
                let shared = Self::shared_vertex(grid, id, vertex);
                grid.change_vertex_elevations(&shared, delta)
            }
            _ => grid.apply(id, command),
        }
    }

    /// Apply a command to every cell under the brush, anchored at `origin`
    /// and extending towards +x and +z. Cells past the grid edge are skipped.
    pub fn apply_brush(&self, grid: &mut Grid, origin: CellId, command: Command) -> EditReport {
        let mut report = EditReport::default();
        let size = self.brush_size.max(1) as i32;
        for dz in 0..size {
            for dx in 0..size {
                let Some(id) = grid.cell_offset(origin, dx, dz) else {
                    continue;
                };
                let result = self.apply(grid, id, command);
                if let Err(e) = &result {
                    log::debug!("{:?} rejected at {}: {}", command, grid.cell(id).coord(), e);
                }
                report.record(&result);
            }
        }
        report
    }

    /// Drag a river from `from` into the adjacent cell `to`.
    pub fn drag_river(&self, grid: &mut Grid, from: CellId, to: CellId) -> Result<(), EditError> {
        let direction = Direction::ALL
            .into_iter()
            .find(|&dir| grid.neighbor(from, dir) == Some(to))
            .ok_or(EditError::NoNeighbor)?;
        grid.set_outgoing_river(from, direction)
    }

    /// Run a script, brushing each step from its target cell.
    pub fn run_script(&self, grid: &mut Grid, steps: &[ScriptStep]) -> EditReport {
        let mut report = EditReport::default();
        for step in steps {
            let coord = GridCoord::from_offset(step.x, step.z);
            match grid.cell_at_coord(coord) {
                Some(id) => {
                    let brushed = self.apply_brush(grid, id, step.command);
                    report.applied += brushed.applied;
                    report.rejected += brushed.rejected;
                }
                None => {
                    log::warn!("Script step targets {} outside the grid", coord);
                    report.record(&Err(EditError::CellOutOfBounds));
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::RebuildLog;
    use crate::config::GridConfig;
    use crate::elevation::ElevationGrid;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn grid() -> Grid {
        Grid::build(GridConfig {
            chunk_width: 3,
            chunk_height: 3,
            ..GridConfig::default()
        })
        .unwrap()
    }

    fn at(grid: &Grid, x: i32, z: i32) -> CellId {
        grid.cell_at_coord(GridCoord::from_offset(x, z)).unwrap()
    }

    #[test]
    fn test_shared_vertex_lookup() {
        let grid = grid();
        let a = at(&grid, 2, 2);
        let shared = Editor::shared_vertex(&grid, a, Direction::NE);
        assert_eq!(
            shared,
            vec![
                (a, Direction::NE),
                (at(&grid, 3, 3), Direction::SW),
                (at(&grid, 3, 2), Direction::NW),
                (at(&grid, 2, 3), Direction::SE),
            ]
        );
        // Corner of the grid: nobody else shares the outer vertex.
        let corner = at(&grid, 0, 0);
        assert_eq!(Editor::shared_vertex(&grid, corner, Direction::SW), vec![(corner, Direction::SW)]);
    }

    #[test]
    fn test_mirrored_vertex_edit_keeps_edges_seamless() {
        let mut grid = grid();
        let editor = Editor::default();
        let a = at(&grid, 2, 2);
        editor
            .apply(&mut grid, a, Command::ChangeVertexElevation { vertex: Direction::NE, delta: 2 })
            .unwrap();

        for (id, _) in grid.cells() {
            for dir in Direction::ALL {
                assert!(!grid.has_cliff(id, dir));
            }
        }
        assert_eq!(grid.cell(at(&grid, 3, 3)).elevation()[Direction::SW], 2);
    }

    #[test]
    fn test_cliffs_allowed_edits_one_cell() {
        let mut grid = grid();
        let editor = Editor {
            allow_cliffs: true,
            ..Editor::default()
        };
        let a = at(&grid, 2, 2);
        editor
            .apply(&mut grid, a, Command::ChangeVertexElevation { vertex: Direction::NE, delta: 1 })
            .unwrap();
        assert!(grid.has_cliff(a, Direction::N));
        assert_eq!(grid.cell(at(&grid, 3, 3)).elevation(), &ElevationGrid::flat(0));
    }

    #[test]
    fn test_mirrored_edit_is_atomic() {
        let mut grid = grid();
        let editor = Editor::default();
        let cliffy = Editor {
            allow_cliffs: true,
            ..Editor::default()
        };
        let a = at(&grid, 2, 2);
        // Diagonal road through a's NW corner, plus a side road that ends there.
        grid.add_road(a, Direction::NW).unwrap();
        grid.add_road(at(&grid, 2, 3), Direction::W).unwrap();

        let before: Vec<ElevationGrid> = grid.cells().map(|(_, c)| *c.elevation()).collect();
        assert!(cliffy
            .apply(&mut grid, a, Command::ChangeVertexElevation { vertex: Direction::NW, delta: 1 })
            .is_err());
        let after: Vec<ElevationGrid> = grid.cells().map(|(_, c)| *c.elevation()).collect();
        assert_eq!(before, after);

        // Moving the point on all four cells keeps both roads seamless.
        assert_eq!(
            editor.apply(&mut grid, a, Command::ChangeVertexElevation { vertex: Direction::NW, delta: 1 }),
            Ok(())
        );
        assert_eq!(grid.cell(at(&grid, 1, 3)).elevation()[Direction::SE], 1);
        assert_eq!(grid.cell(at(&grid, 1, 2)).elevation()[Direction::NE], 1);
        assert!(!grid.has_cliff(a, Direction::NW));
        assert!(!grid.has_cliff(at(&grid, 2, 3), Direction::W));
    }

    #[test]
    fn test_brush_covers_square_and_clips() {
        let mut grid = grid();
        let editor = Editor {
            brush_size: 3,
            ..Editor::default()
        };
        let origin = at(&grid, 4, 4);
        let report = editor.apply_brush(&mut grid, origin, Command::SetUrbanLevel { level: 1 });
        assert_eq!(report, EditReport { applied: 4, rejected: 0 });
        assert_eq!(grid.cell(at(&grid, 5, 5)).urban_level(), 1);
        assert_eq!(grid.cell(at(&grid, 3, 4)).urban_level(), 0);
    }

    #[test]
    fn test_drag_river() {
        let mut grid = grid();
        let editor = Editor::default();
        let a = at(&grid, 1, 1);
        let b = at(&grid, 2, 2);
        editor.drag_river(&mut grid, a, b).unwrap();
        assert!(grid.cell(a).has_outgoing_river(Direction::NE));

        let far = at(&grid, 4, 4);
        assert_eq!(editor.drag_river(&mut grid, a, far), Err(EditError::NoNeighbor));
    }

    #[test]
    fn test_script_from_json() {
        let json = r#"[
            { "x": 1, "z": 1, "command": { "op": "add_road", "direction": "E" } },
            { "x": 1, "z": 1, "command": { "op": "set_outgoing_river", "direction": "N" } },
            { "x": 9, "z": 9, "command": { "op": "demolish" } },
            { "x": 4, "z": 4, "command": { "op": "set_industry", "industry": "Farm" } }
        ]"#;
        let steps: Vec<ScriptStep> = serde_json::from_str(json).unwrap();
        let mut grid = grid();
        let report = Editor::default().run_script(&mut grid, &steps);
        assert_eq!(report, EditReport { applied: 2, rejected: 2 });
        assert_eq!(grid.cell(at(&grid, 4, 4)).industry(), Some(Industry::Farm));
    }

    #[test]
    fn test_remove_roads_command() {
        let json = r#"[
            { "x": 2, "z": 2, "command": { "op": "add_road", "direction": "E" } },
            { "x": 2, "z": 2, "command": { "op": "add_road", "direction": "NW" } },
            { "x": 2, "z": 2, "command": { "op": "remove_roads" } }
        ]"#;
        let steps: Vec<ScriptStep> = serde_json::from_str(json).unwrap();
        let mut grid = grid();
        let report = Editor::default().run_script(&mut grid, &steps);
        assert_eq!(report, EditReport { applied: 3, rejected: 0 });
        assert!(grid.cells().all(|(_, cell)| !cell.has_roads()));
    }

    #[test]
    fn test_overflowing_script_is_rejected_cleanly() {
        let json = r#"[
            { "x": 1, "z": 1, "command": { "op": "change_vertex_elevation", "vertex": "NE", "delta": 2147483647 } },
            { "x": 1, "z": 1, "command": { "op": "change_vertex_elevation", "vertex": "NE", "delta": 1 } },
            { "x": 0, "z": 0, "command": { "op": "change_water_level", "delta": 2147483647 } }
        ]"#;
        let steps: Vec<ScriptStep> = serde_json::from_str(json).unwrap();
        let mut grid = grid();
        let editor = Editor {
            allow_cliffs: true,
            ..Editor::default()
        };
        let report = editor.run_script(&mut grid, &steps);
        assert_eq!(report, EditReport { applied: 1, rejected: 2 });
        assert_eq!(grid.cell(at(&grid, 1, 1)).elevation()[Direction::NE], i32::MAX);
        assert_eq!(grid.cell(at(&grid, 0, 0)).water_level(), 2);
    }

    #[test]
    fn test_demolish_command() {
        let mut grid = grid();
        let a = at(&grid, 1, 1);
        grid.apply(a, Command::SetUrbanLevel { level: 2 }).unwrap();
        grid.rebuild_dirty_chunks(&mut RebuildLog::default());

        grid.apply(a, Command::Demolish).unwrap();
        assert_eq!(grid.cell(a).urban_level(), 0);
        assert!(grid.chunk(grid.cell(a).chunk()).is_dirty());
    }

    fn random_command(rng: &mut ChaCha8Rng) -> Command {
        let direction = Direction::from_index(rng.gen_range(0..8));
        let corner = Direction::CORNERS[rng.gen_range(0..4)];
        match rng.gen_range(0..6) {
            0 => Command::ChangeVertexElevation {
                vertex: corner,
                delta: if rng.gen_bool(0.5) { 1 } else { -1 },
            },
            1 => Command::SetOutgoingRiver { direction },
            2 => Command::AddRoad { direction },
            3 => Command::RemoveRoad { direction },
            4 => Command::RemoveRivers,
            _ => Command::ChangeWaterLevel { delta: 1 },
        }
    }

    fn assert_invariants(grid: &Grid) {
        assert!(grid.neighbors_symmetric());
        for (id, cell) in grid.cells() {
            for dir in Direction::ALL {
                assert!(
                    !(cell.has_road_through_edge(dir) && cell.has_river_through_edge(dir)),
                    "road and river share an edge"
                );
                if cell.has_road_through_edge(dir) {
                    assert!(!grid.has_cliff(id, dir));
                    assert!(grid.elevation_difference(id, dir) <= grid.config().max_road_slope);
                }
                let Some(n) = cell.neighbor(dir) else {
                    assert!(!cell.has_river_through_edge(dir));
                    continue;
                };
                let other = grid.cell(n);
                assert_eq!(cell.has_outgoing_river(dir), other.has_incoming_river(dir.opposite()));
                assert_eq!(cell.has_road_through_edge(dir), other.has_road_through_edge(dir.opposite()));
                if cell.has_outgoing_river(dir) {
                    assert!(cell.centre_elevation() >= other.centre_elevation());
                    assert!(!cell.has_incoming_river(dir));
                }
            }
        }
    }

    #[test]
    fn test_random_edits_preserve_invariants() {
        for allow_cliffs in [false, true] {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            let mut grid = grid();
            let editor = Editor {
                allow_cliffs,
                ..Editor::default()
            };
            for _ in 0..2000 {
                let id = CellId(rng.gen_range(0..grid.len()));
                let command = random_command(&mut rng);
                let _ = editor.apply(&mut grid, id, command);
                assert_invariants(&grid);
            }
        }
    }
}
