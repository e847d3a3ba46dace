//! The cell graph: storage, neighbor wiring, lookups and refresh propagation
//!
//! Cells are stored row-major (`x + z * width`) and refer to each other and to
//! their chunk by index. Neighbor links are wired once at construction and
//! never change afterwards.

use crate::cell::{Cell, CellId};
use crate::chunk::{Chunk, ChunkId, ChunkRenderer, RefreshScope};
use crate::config::{ConfigError, GridConfig};
use crate::coords::{GridCoord, WorldPosition};
use crate::direction::Direction;
use crate::placement::{HashGrid, PlacementHash};

/// A fixed-size square grid of cells grouped into render chunks.
pub struct Grid {
    width: usize,
    height: usize,
    config: GridConfig,
    cells: Vec<Cell>,
    chunks: Vec<Chunk>,
    hash_grid: HashGrid,
}

impl Grid {
    /// Build every cell and chunk and wire all neighbor links.
    pub fn build(config: GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (chunks_x, chunks_z) = config.chunk_counts();
        let mut chunks = Vec::with_capacity(chunks_x * chunks_z);
        for chunk_z in 0..chunks_z {
            for chunk_x in 0..chunks_x {
                chunks.push(Chunk::new(ChunkId(chunks.len()), chunk_x, chunk_z));
            }
        }

        let mut cells = Vec::with_capacity(config.width * config.height);
        for z in 0..config.height {
            for x in 0..config.width {
                let chunk = ChunkId(x / config.chunk_width + (z / config.chunk_height) * chunks_x);
                let id = CellId(cells.len());
                chunks[chunk.0].add_cell(id);
                cells.push(Cell::new(
                    GridCoord::from_offset(x as i32, z as i32),
                    chunk,
                    config.default_water_level,
                ));
            }
        }

        let mut grid = Self {
            width: config.width,
            height: config.height,
            hash_grid: HashGrid::new(config.placement_seed),
            config,
            cells,
            chunks,
        };
        grid.wire_neighbors();
        debug_assert!(grid.neighbors_symmetric(), "neighbor wiring is asymmetric");

        log::info!(
            "Built {}x{} grid ({} cells, {} chunks)",
            grid.width,
            grid.height,
            grid.cells.len(),
            grid.chunks.len()
        );
        Ok(grid)
    }

    /// Grid of the given size with default settings.
    pub fn new(width: usize, height: usize) -> Result<Self, ConfigError> {
        Self::build(GridConfig::with_size(width, height))
    }

    /// Link each cell to its already-created W, SW, S and SE neighbors.
    /// Every link is set from both ends, which covers all eight directions.
    fn wire_neighbors(&mut self) {
        let width = self.width;
        for z in 0..self.height {
            for x in 0..width {
                let i = x + z * width;
                if x > 0 {
                    self.link(CellId(i), Direction::W, CellId(i - 1));
                }
                if z > 0 {
                    self.link(CellId(i), Direction::S, CellId(i - width));
                    if x > 0 {
                        self.link(CellId(i), Direction::SW, CellId(i - width - 1));
                    }
                    if x + 1 < width {
                        self.link(CellId(i), Direction::SE, CellId(i - width + 1));
                    }
                }
            }
        }
    }

    fn link(&mut self, cell: CellId, dir: Direction, other: CellId) {
        self.cells[cell.0].neighbors[dir] = Some(other);
        self.cells[other.0].neighbors[dir.opposite()] = Some(cell);
    }

    /// True when every neighbor link has a matching link back.
    pub fn neighbors_symmetric(&self) -> bool {
        self.cells.iter().enumerate().all(|(i, cell)| {
            cell.neighbors()
                .all(|(dir, other)| self.cells[other.0].neighbor(dir.opposite()) == Some(CellId(i)))
        })
    }

    /// Cells along x.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Cells along z.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    pub fn cells(&self) -> impl Iterator<Item = (CellId, &Cell)> {
        self.cells.iter().enumerate().map(|(i, cell)| (CellId(i), cell))
    }

    pub fn cell_ids(&self) -> impl Iterator<Item = CellId> {
        (0..self.cells.len()).map(CellId)
    }

    pub fn neighbor(&self, id: CellId, dir: Direction) -> Option<CellId> {
        self.cells[id.0].neighbor(dir)
    }

    pub fn chunk(&self, id: ChunkId) -> &Chunk {
        &self.chunks[id.0]
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    // Lookups

    pub fn cell_at_coord(&self, coord: GridCoord) -> Option<CellId> {
        if coord.x < 0 || coord.z < 0 {
            return None;
        }
        let (x, z) = (coord.x as usize, coord.z as usize);
        if x >= self.width || z >= self.height {
            return None;
        }
        Some(CellId(x + z * self.width))
    }

    /// Cell under a world position.
    ///
    /// Positions on the outer boundary of the grid belong to the nearest edge
    /// cell; anything beyond it is not found.
    pub fn cell_at(&self, position: WorldPosition) -> Option<CellId> {
        let (fx, fz) = GridCoord::fractional(position);
        let in_extent = |f: f32, size: usize| f >= -0.5 && f <= size as f32 - 0.5;
        if !in_extent(fx, self.width) || !in_extent(fz, self.height) {
            return None;
        }
        let coord = GridCoord::from_position(position);
        self.cell_at_coord(GridCoord::from_offset(
            coord.x.clamp(0, self.width as i32 - 1),
            coord.z.clamp(0, self.height as i32 - 1),
        ))
    }

    /// Cell `dx`, `dz` away from `id`, if that is inside the grid.
    pub fn cell_offset(&self, id: CellId, dx: i32, dz: i32) -> Option<CellId> {
        let coord = self.cells[id.0].coord();
        let x = coord.x.checked_add(dx)?;
        let z = coord.z.checked_add(dz)?;
        self.cell_at_coord(GridCoord::from_offset(x, z))
    }

    /// Corner of the cell under `position` nearest to it.
    pub fn vertex_at(&self, position: WorldPosition) -> Option<(CellId, Direction)> {
        let id = self.cell_at(position)?;
        let local = position - self.cells[id.0].coord().to_position();
        let vertex = match (local.x >= 0.0, local.z >= 0.0) {
            (true, true) => Direction::NE,
            (true, false) => Direction::SE,
            (false, false) => Direction::SW,
            (false, true) => Direction::NW,
        };
        Some((id, vertex))
    }

    /// Edge of the cell under `position`, picked by the 45 degree sector the
    /// point falls in around the cell centre.
    pub fn edge_at(&self, position: WorldPosition) -> Option<(CellId, Direction)> {
        let id = self.cell_at(position)?;
        let local = position - self.cells[id.0].coord().to_position();
        // Bearing measured clockwise from north (+z).
        let bearing = local.x.atan2(local.z).to_degrees().rem_euclid(360.0);
        let sector = ((bearing + 22.5) / 45.0) as usize;
        Some((id, Direction::from_index(sector)))
    }

    // Edge queries

    pub fn has_cliff(&self, id: CellId, dir: Direction) -> bool {
        let cell = &self.cells[id.0];
        let neighbor = cell.neighbor(dir).map(|n| &self.cells[n.0].elevation);
        cell.elevation.has_cliff_with(dir, neighbor)
    }

    pub fn elevation_difference(&self, id: CellId, dir: Direction) -> i32 {
        let cell = &self.cells[id.0];
        let neighbor = cell.neighbor(dir).map(|n| &self.cells[n.0].elevation);
        cell.elevation.difference_across(dir, neighbor)
    }

    // Refresh propagation

    pub(crate) fn refresh(&mut self, id: CellId, scope: RefreshScope) {
        let chunk = self.cells[id.0].chunk();
        self.chunks[chunk.0].mark_dirty();
        if scope == RefreshScope::SelfOnly {
            return;
        }
        for dir in Direction::ALL {
            if let Some(n) = self.cells[id.0].neighbor(dir) {
                let other = self.cells[n.0].chunk();
                if other != chunk {
                    self.chunks[other.0].mark_dirty();
                }
            }
        }
    }

    pub fn dirty_chunks(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.chunks.iter().filter(|c| c.is_dirty()).map(|c| c.id())
    }

    /// Hand every dirty chunk to `renderer`, clearing each mark once its
    /// rebuild returns. Returns how many chunks were rebuilt.
    pub fn rebuild_dirty_chunks<R: ChunkRenderer>(&mut self, renderer: &mut R) -> usize {
        let dirty: Vec<ChunkId> = self.dirty_chunks().collect();
        for &id in &dirty {
            renderer.rebuild(&self.chunks[id.0], self);
            self.chunks[id.0].mark_clean();
        }
        log::trace!("Rebuilt {} dirty chunks", dirty.len());
        dirty.len()
    }

    /// Stable pseudo-random pair for decoration placement at `position`.
    pub fn placement_hash(&self, position: WorldPosition) -> PlacementHash {
        self.hash_grid.sample(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::RebuildLog;

    fn grid(width: usize, height: usize, chunk: usize) -> Grid {
        Grid::build(GridConfig {
            width,
            height,
            chunk_width: chunk,
            chunk_height: chunk,
            ..GridConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_row_major_layout() {
        let grid = grid(4, 3, 2);
        assert_eq!(grid.len(), 12);
        assert_eq!((grid.width(), grid.height()), (4, 3));
        assert_eq!(grid.cell_at_coord(GridCoord::from_offset(3, 2)), Some(CellId(11)));
        assert_eq!(grid.cell_at_coord(GridCoord::from_offset(4, 0)), None);
        for (id, cell) in grid.cells() {
            let coord = cell.coord();
            assert_eq!(id.0, coord.x as usize + coord.z as usize * 4);
            assert_eq!(grid.cell_at_coord(coord), Some(id));
        }
    }

    #[test]
    fn test_neighbor_symmetry() {
        let grid = grid(5, 4, 2);
        assert!(grid.neighbors_symmetric());
        for (id, cell) in grid.cells() {
            for dir in Direction::ALL {
                let expected = grid.cell_at_coord(cell.coord().step(dir));
                assert_eq!(grid.neighbor(id, dir), expected);
                if let Some(other) = expected {
                    assert_eq!(grid.neighbor(other, dir.opposite()), Some(id));
                }
            }
        }
    }

    #[test]
    fn test_boundary_cells_have_fewer_neighbors() {
        let grid = grid(3, 3, 3);
        let corner = grid.cell_at_coord(GridCoord::from_offset(0, 0)).unwrap();
        let edge = grid.cell_at_coord(GridCoord::from_offset(1, 0)).unwrap();
        let centre = grid.cell_at_coord(GridCoord::from_offset(1, 1)).unwrap();
        assert_eq!(grid.cell(corner).neighbors().count(), 3);
        assert_eq!(grid.cell(edge).neighbors().count(), 5);
        assert_eq!(grid.cell(centre).neighbors().count(), 8);
        // No wrap-around.
        assert_eq!(grid.neighbor(corner, Direction::W), None);
    }

    #[test]
    fn test_chunk_assignment() {
        let grid = grid(5, 5, 3);
        assert_eq!(grid.chunks().len(), 4);
        let at = |x, z| grid.cell(grid.cell_at_coord(GridCoord::from_offset(x, z)).unwrap()).chunk();
        assert_eq!(at(0, 0), ChunkId(0));
        assert_eq!(at(2, 2), ChunkId(0));
        assert_eq!(at(3, 0), ChunkId(1));
        assert_eq!(at(0, 4), ChunkId(2));
        assert_eq!(at(4, 4), ChunkId(3));
        let total: usize = grid.chunks().iter().map(|c| c.cells().len()).sum();
        assert_eq!(total, 25);
    }

    #[test]
    fn test_cell_at_positions() {
        let grid = grid(6, 6, 3);
        let id = |x, z| grid.cell_at_coord(GridCoord::from_offset(x, z));

        assert_eq!(grid.cell_at(WorldPosition::flat(2.2, 3.7)), id(2, 4));
        // Exactly on the outer boundary resolves to the edge cell.
        assert_eq!(grid.cell_at(WorldPosition::flat(-0.5, 0.0)), id(0, 0));
        assert_eq!(grid.cell_at(WorldPosition::flat(5.5, 5.5)), id(5, 5));
        // Beyond the boundary is not found.
        assert_eq!(grid.cell_at(WorldPosition::flat(-0.6, 0.0)), None);
        assert_eq!(grid.cell_at(WorldPosition::flat(3.0, 6.0)), None);
        assert_eq!(grid.cell_at_coord(GridCoord::from_offset(6, 0)), None);
        assert_eq!(grid.cell_at_coord(GridCoord::from_offset(0, -1)), None);
    }

    #[test]
    fn test_cell_offset() {
        let grid = grid(4, 4, 2);
        let origin = grid.cell_at_coord(GridCoord::from_offset(1, 1)).unwrap();
        assert_eq!(grid.cell_offset(origin, 2, 1), grid.cell_at_coord(GridCoord::from_offset(3, 2)));
        assert_eq!(grid.cell_offset(origin, 3, 0), None);
        assert_eq!(grid.cell_offset(origin, i32::MAX, 0), None);
        assert_eq!(grid.cell_offset(origin, 0, i32::MIN), None);
    }

    #[test]
    fn test_vertex_and_edge_picking() {
        let grid = grid(4, 4, 2);
        let cell = grid.cell_at_coord(GridCoord::from_offset(2, 2)).unwrap();

        assert_eq!(grid.vertex_at(WorldPosition::flat(2.3, 2.4)), Some((cell, Direction::NE)));
        assert_eq!(grid.vertex_at(WorldPosition::flat(1.8, 1.7)), Some((cell, Direction::SW)));

        assert_eq!(grid.edge_at(WorldPosition::flat(2.0, 2.4)), Some((cell, Direction::N)));
        assert_eq!(grid.edge_at(WorldPosition::flat(2.4, 2.0)), Some((cell, Direction::E)));
        assert_eq!(grid.edge_at(WorldPosition::flat(2.3, 1.7)), Some((cell, Direction::SE)));
        assert_eq!(grid.edge_at(WorldPosition::flat(1.6, 2.05)), Some((cell, Direction::W)));
        assert_eq!(grid.edge_at(WorldPosition::flat(1.7, 2.3)), Some((cell, Direction::NW)));
    }

    #[test]
    fn test_full_refresh_reaches_neighbor_chunks() {
        let mut grid = grid(6, 6, 3);
        // (2, 2) sits in the corner of chunk 0 next to chunks 1, 2 and 3.
        let cell = grid.cell_at_coord(GridCoord::from_offset(2, 2)).unwrap();
        grid.refresh(cell, RefreshScope::Full);
        assert_eq!(grid.dirty_chunks().count(), 4);

        let mut log = RebuildLog::default();
        assert_eq!(grid.rebuild_dirty_chunks(&mut log), 4);
        assert_eq!(grid.dirty_chunks().count(), 0);

        grid.refresh(cell, RefreshScope::SelfOnly);
        assert_eq!(grid.dirty_chunks().collect::<Vec<_>>(), vec![ChunkId(0)]);
    }

    #[test]
    fn test_interior_full_refresh_stays_in_chunk() {
        let mut grid = grid(6, 6, 3);
        let cell = grid.cell_at_coord(GridCoord::from_offset(1, 1)).unwrap();
        grid.refresh(cell, RefreshScope::Full);
        assert_eq!(grid.dirty_chunks().collect::<Vec<_>>(), vec![ChunkId(0)]);
    }

    #[test]
    fn test_placement_hash_follows_seed() {
        let build = |seed| {
            Grid::build(GridConfig {
                placement_seed: seed,
                ..GridConfig::default()
            })
            .unwrap()
        };
        let pos = WorldPosition::flat(2.0, 3.0);
        assert_eq!(build(5).placement_hash(pos), build(5).placement_hash(pos));
        assert_eq!(build(5).placement_hash(pos), HashGrid::new(5).sample(pos));
    }

    #[test]
    fn test_invalid_size_rejected() {
        assert!(Grid::new(0, 4).is_err());
    }
}
