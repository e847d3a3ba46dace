//! Terrain-topology core for a tile-grid world editor
//!
//! Cells on a square grid carry corner elevations, water, land use and
//! directed river / road edges to their eight neighbors. Every edit either
//! commits with all cross-cell invariants intact or is rejected without
//! touching state, and marks the render chunks that need rebuilding.

pub mod ascii;
pub mod cell;
pub mod chunk;
pub mod config;
pub mod coords;
pub mod direction;
pub mod editor;
pub mod elevation;
pub mod error;
pub mod grid;
pub mod placement;
pub mod rivers;
pub mod roads;
pub mod terrain;

pub use cell::{Cell, CellId};
pub use chunk::{Chunk, ChunkId, ChunkRenderer};
pub use config::{ConfigError, GridConfig};
pub use direction::{Direction, DirectionMap};
pub use editor::{Command, Editor};
pub use elevation::ElevationGrid;
pub use error::EditError;
pub use grid::Grid;
