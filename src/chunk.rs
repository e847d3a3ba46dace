//! Render chunks and the dirty / rebuild contract
//!
//! Cells push dirty marks into their chunk whenever visible state changes.
//! The renderer pulls dirty chunks once per tick, rebuilds them and only then
//! are they clean again; the grid never clears a mark on its own.

use crate::cell::CellId;
use crate::grid::Grid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(pub usize);

/// How far a change has to be redrawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshScope {
    /// Own chunk plus every neighbor chunk across a boundary
    Full,
    /// Own chunk only
    SelfOnly,
}

/// A group of cells rebuilt together.
#[derive(Clone, Debug)]
pub struct Chunk {
    id: ChunkId,
    /// Chunk position in chunk units
    pub chunk_x: usize,
    pub chunk_z: usize,
    cells: Vec<CellId>,
    dirty: bool,
}

impl Chunk {
    pub(crate) fn new(id: ChunkId, chunk_x: usize, chunk_z: usize) -> Self {
        Self {
            id,
            chunk_x,
            chunk_z,
            cells: Vec::new(),
            dirty: false,
        }
    }

    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Cells in this chunk, in row-major order.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn add_cell(&mut self, cell: CellId) {
        self.cells.push(cell);
    }

    /// Request a rebuild. Idempotent.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }
}

/// Consumer of dirty chunks, typically a mesh builder.
pub trait ChunkRenderer {
    fn rebuild(&mut self, chunk: &Chunk, grid: &Grid);
}

/// Renderer that only records which chunks it was asked to rebuild.
#[derive(Clone, Debug, Default)]
pub struct RebuildLog {
    pub rebuilt: Vec<ChunkId>,
}

impl ChunkRenderer for RebuildLog {
    fn rebuild(&mut self, chunk: &Chunk, _grid: &Grid) {
        self.rebuilt.push(chunk.id());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirty_marking_is_idempotent() {
        let mut chunk = Chunk::new(ChunkId(0), 0, 0);
        assert!(!chunk.is_dirty());
        chunk.mark_dirty();
        chunk.mark_dirty();
        assert!(chunk.is_dirty());
        chunk.mark_clean();
        assert!(!chunk.is_dirty());
    }
}
