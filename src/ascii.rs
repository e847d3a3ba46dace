//! ASCII rendering of grid state
//!
//! Provides per-cell characters for several views, a one-shot map renderer
//! and a `ChunkRenderer` that redraws only the chunks the grid marked dirty.

use crate::cell::Cell;
use crate::chunk::{Chunk, ChunkRenderer};
use crate::coords::GridCoord;
use crate::direction::Direction;
use crate::grid::Grid;

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Centre elevation gradient
    Elevation,
    /// Submerged cells
    Water,
    /// River flow
    Rivers,
    /// Road count per cell
    Roads,
    /// Chunks waiting for a rebuild. On an `AsciiRenderer` canvas these are
    /// the chunks redrawn by the latest drain.
    Chunks,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Elevation => "Elevation",
            AsciiMode::Water => "Water",
            AsciiMode::Rivers => "Rivers",
            AsciiMode::Roads => "Roads",
            AsciiMode::Chunks => "Chunks",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[
            AsciiMode::Elevation,
            AsciiMode::Water,
            AsciiMode::Rivers,
            AsciiMode::Roads,
            AsciiMode::Chunks,
        ]
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<AsciiMode> {
        Self::all().iter().copied().find(|m| m.name().eq_ignore_ascii_case(name))
    }
}

/// Get ASCII character for a centre elevation (11-level gradient)
pub fn height_char(elevation: f32) -> char {
    // Elevation steps -4 to +8
    const CHARS: &[char] = &['~', '.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];
    let normalized = ((elevation + 4.0) / 12.0).clamp(0.0, 1.0);
    let idx = (normalized * (CHARS.len() - 1) as f32) as usize;
    CHARS[idx.min(CHARS.len() - 1)]
}

pub fn water_char(cell: &Cell) -> char {
    if cell.is_underwater() {
        '~'
    } else {
        '.'
    }
}

/// Arrow for the first outgoing river, 'o' for a river that only ends here.
pub fn river_char(cell: &Cell) -> char {
    match cell.outgoing_rivers().next() {
        Some(dir) => flow_char(dir),
        None if cell.has_river() => 'o',
        None => '.',
    }
}

fn flow_char(dir: Direction) -> char {
    match dir {
        Direction::N => '^',
        Direction::S => 'v',
        Direction::E => '>',
        Direction::W => '<',
        Direction::NE | Direction::SW => '/',
        Direction::NW | Direction::SE => '\\',
    }
}

pub fn road_char(cell: &Cell) -> char {
    match cell.road_count() {
        0 => '.',
        n => char::from_digit(n as u32, 10).unwrap_or('+'),
    }
}

pub fn cell_char(cell: &Cell, chunk: &Chunk, mode: AsciiMode) -> char {
    match mode {
        AsciiMode::Elevation => height_char(cell.centre_elevation()),
        AsciiMode::Water => water_char(cell),
        AsciiMode::Rivers => river_char(cell),
        AsciiMode::Roads => road_char(cell),
        AsciiMode::Chunks => {
            if chunk.is_dirty() {
                '#'
            } else {
                '.'
            }
        }
    }
}

/// Render the whole grid to an ASCII string, north row first.
pub fn render_ascii_map(grid: &Grid, mode: AsciiMode) -> String {
    let mut result = String::with_capacity((grid.width() + 1) * grid.height());

    for z in (0..grid.height()).rev() {
        for x in 0..grid.width() {
            let coord = GridCoord::from_offset(x as i32, z as i32);
            if let Some(id) = grid.cell_at_coord(coord) {
                let cell = grid.cell(id);
                result.push(cell_char(cell, grid.chunk(cell.chunk()), mode));
            }
        }
        result.push('\n');
    }

    result
}

/// Generate legend for the given mode
pub fn legend(mode: AsciiMode) -> String {
    match mode {
        AsciiMode::Elevation => "=== ELEVATION LEGEND ===\n\
             Low -> High:\n\
             ~ . - = + * # % ^ A M\n\
             (-4)            (+8)\n"
            .to_string(),
        AsciiMode::Water => "=== WATER LEGEND ===\n  ~ Underwater  . Dry\n".to_string(),
        AsciiMode::Rivers => "=== RIVER LEGEND ===\n\
             ^ v > < / \\ Outgoing flow   o River end   . None\n"
            .to_string(),
        AsciiMode::Roads => "=== ROAD LEGEND ===\n  1-8 Roads leaving the cell  . None\n".to_string(),
        AsciiMode::Chunks => "=== CHUNK LEGEND ===\n\
             # Dirty (map) / rebuilt this tick (renderer)  . Clean\n"
            .to_string(),
    }
}

/// Text canvas that keeps the last rebuilt state of every chunk.
///
/// Cells in chunks that were never rebuilt show as blanks.
pub struct AsciiRenderer {
    mode: AsciiMode,
    width: usize,
    height: usize,
    canvas: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize, mode: AsciiMode) -> Self {
        Self {
            mode,
            width,
            height,
            canvas: vec![' '; width * height],
        }
    }

    pub fn mode(&self) -> AsciiMode {
        self.mode
    }

    /// Canvas contents, north row first.
    pub fn render(&self) -> String {
        let mut result = String::with_capacity((self.width + 1) * self.height);
        for z in (0..self.height).rev() {
            result.extend(&self.canvas[z * self.width..(z + 1) * self.width]);
            result.push('\n');
        }
        result
    }
}

impl ChunkRenderer for AsciiRenderer {
    fn rebuild(&mut self, chunk: &Chunk, grid: &Grid) {
        for &id in chunk.cells() {
            let cell = grid.cell(id);
            let coord = cell.coord();
            let idx = coord.x as usize + coord.z as usize * self.width;
            if let Some(slot) = self.canvas.get_mut(idx) {
                *slot = cell_char(cell, chunk, self.mode);
            }
        }
    }
}
