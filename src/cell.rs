//! Cell state: the node type of the grid graph
//!
//! A cell only knows its own state plus the ids of its neighbors and chunk.
//! Anything that has to touch a neighbor (rivers, roads, elevation checks)
//! goes through `Grid`, which owns every cell.

use serde::{Deserialize, Serialize};

use crate::chunk::ChunkId;
use crate::coords::{GridCoord, ELEVATION_STEP, WATER_ELEVATION_OFFSET};
use crate::direction::{Direction, DirectionMap};
use crate::elevation::ElevationGrid;

/// Index of a cell in its grid's row-major storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(pub usize);

/// Ground material painted on a cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialTag(pub u8);

/// Settlement placed on a cell. The settlement itself lives outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementId(pub u32);

/// Single scenery object a cell can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenery {
    Rocks,
    Mast,
    Lighthouse,
}

impl Scenery {
    /// Editor level for this object (0 means none).
    pub fn level(&self) -> u8 {
        match self {
            Scenery::Rocks => 1,
            Scenery::Mast => 2,
            Scenery::Lighthouse => 3,
        }
    }

    pub fn from_level(level: u8) -> Option<Scenery> {
        match level {
            1 => Some(Scenery::Rocks),
            2 => Some(Scenery::Mast),
            3 => Some(Scenery::Lighthouse),
            _ => None,
        }
    }
}

/// Industry occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    CoalMine,
    PowerStation,
    Forest,
    Sawmill,
    OilRefinery,
    Factory,
    IronMine,
    OilWell,
    Farm,
    Bank,
}

impl Industry {
    pub fn all() -> &'static [Industry] {
        &[
            Industry::CoalMine,
            Industry::PowerStation,
            Industry::Forest,
            Industry::Sawmill,
            Industry::OilRefinery,
            Industry::Factory,
            Industry::IronMine,
            Industry::OilWell,
            Industry::Farm,
            Industry::Bank,
        ]
    }

    /// Editor level for this industry (0 means none).
    pub fn level(&self) -> u8 {
        Self::all().iter().position(|i| i == self).map_or(0, |p| p as u8 + 1)
    }

    pub fn from_level(level: u8) -> Option<Industry> {
        (level as usize).checked_sub(1).and_then(|i| Self::all().get(i)).copied()
    }
}

/// One grid tile.
#[derive(Clone, Debug)]
pub struct Cell {
    coord: GridCoord,
    chunk: ChunkId,
    pub(crate) neighbors: DirectionMap<Option<CellId>>,

    pub(crate) elevation: ElevationGrid,
    pub(crate) water_level: i32,
    pub(crate) material: MaterialTag,

    pub(crate) urban_level: u8,
    pub(crate) plant_level: u8,
    pub(crate) scenery: Option<Scenery>,
    pub(crate) industry: Option<Industry>,
    pub(crate) settlement: Option<SettlementId>,

    pub(crate) incoming_rivers: DirectionMap<bool>,
    pub(crate) outgoing_rivers: DirectionMap<bool>,
    pub(crate) roads: DirectionMap<bool>,
}

impl Cell {
    pub(crate) fn new(coord: GridCoord, chunk: ChunkId, water_level: i32) -> Self {
        Self {
            coord,
            chunk,
            neighbors: DirectionMap::filled(None),
            elevation: ElevationGrid::default(),
            water_level,
            material: MaterialTag::default(),
            urban_level: 0,
            plant_level: 0,
            scenery: None,
            industry: None,
            settlement: None,
            incoming_rivers: DirectionMap::filled(false),
            outgoing_rivers: DirectionMap::filled(false),
            roads: DirectionMap::filled(false),
        }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    pub fn chunk(&self) -> ChunkId {
        self.chunk
    }

    pub fn neighbor(&self, dir: Direction) -> Option<CellId> {
        self.neighbors[dir]
    }

    /// Existing neighbors with their direction.
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, CellId)> + '_ {
        self.neighbors.iter().filter_map(|(dir, n)| n.map(|id| (dir, id)))
    }

    // Elevation and water

    pub fn elevation(&self) -> &ElevationGrid {
        &self.elevation
    }

    pub fn centre_elevation(&self) -> f32 {
        self.elevation.centre()
    }

    pub fn min_elevation(&self) -> i32 {
        self.elevation.min()
    }

    pub fn max_elevation(&self) -> i32 {
        self.elevation.max()
    }

    pub fn water_level(&self) -> i32 {
        self.water_level
    }

    pub fn is_underwater(&self) -> bool {
        self.water_level > self.elevation.min()
    }

    /// World height of a river surface running through this cell.
    pub fn river_surface_y(&self) -> f32 {
        (self.centre_elevation() + WATER_ELEVATION_OFFSET) * ELEVATION_STEP
    }

    /// World height of standing water on this cell.
    pub fn water_surface_y(&self) -> f32 {
        (self.water_level as f32 + WATER_ELEVATION_OFFSET) * ELEVATION_STEP
    }

    // Land use

    pub fn material(&self) -> MaterialTag {
        self.material
    }

    pub fn urban_level(&self) -> u8 {
        self.urban_level
    }

    pub fn plant_level(&self) -> u8 {
        self.plant_level
    }

    pub fn scenery(&self) -> Option<Scenery> {
        self.scenery
    }

    pub fn industry(&self) -> Option<Industry> {
        self.industry
    }

    pub fn settlement(&self) -> Option<SettlementId> {
        self.settlement
    }

    // Rivers

    pub fn has_incoming_river(&self, dir: Direction) -> bool {
        self.incoming_rivers[dir]
    }

    pub fn has_outgoing_river(&self, dir: Direction) -> bool {
        self.outgoing_rivers[dir]
    }

    pub fn incoming_rivers(&self) -> impl Iterator<Item = Direction> + '_ {
        self.incoming_rivers.set_directions()
    }

    pub fn outgoing_rivers(&self) -> impl Iterator<Item = Direction> + '_ {
        self.outgoing_rivers.set_directions()
    }

    pub fn has_river(&self) -> bool {
        self.incoming_rivers.any() || self.outgoing_rivers.any()
    }

    /// Source or sink: rivers flow in or out, but not both.
    pub fn has_river_begin_or_end(&self) -> bool {
        self.incoming_rivers.any() != self.outgoing_rivers.any()
    }

    pub fn has_river_through_edge(&self, dir: Direction) -> bool {
        self.incoming_rivers[dir] || self.outgoing_rivers[dir]
    }

    // Roads

    pub fn has_road_through_edge(&self, dir: Direction) -> bool {
        self.roads[dir]
    }

    pub fn has_roads(&self) -> bool {
        self.roads.any()
    }

    pub fn road_count(&self) -> usize {
        self.roads.count()
    }

    pub fn roads(&self) -> impl Iterator<Item = Direction> + '_ {
        self.roads.set_directions()
    }
}
