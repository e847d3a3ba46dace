//! Deterministic placement hashing for decorations
//!
//! The decoration placer picks prefab variants and rotations from a hash of
//! the world position. Values come from a seeded table so the same position
//! always yields the same pair for the lifetime of a grid.

use noise::{NoiseFn, Perlin, Seedable};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::coords::{WorldPosition, CELL_SIZE};

/// Side length of the hash table in samples.
pub const HASH_GRID_SIZE: usize = 256;

/// Samples per world unit.
pub const HASH_GRID_SCALE: f32 = 0.25;

/// Maximum jitter applied by `perturb`, in world units.
const PERTURB_MAGNITUDE: f32 = 0.25;
const PERTURB_FREQUENCY: f64 = 100.0 / 16.0;
const PERTURB_Z_OFFSET: f64 = 130.0;

/// Pseudo-random pair, both in [0, 1).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlacementHash {
    /// Variant selector
    pub a: f32,
    /// Rotation selector
    pub b: f32,
}

impl PlacementHash {
    /// Index into a list of `count` variants.
    pub fn variant(&self, count: usize) -> usize {
        ((self.a * count as f32) as usize).min(count.saturating_sub(1))
    }

    /// Rotation snapped to quarter turns, in degrees.
    pub fn quarter_turn(&self) -> f32 {
        90.0 * (self.b * 4.0).round()
    }

    /// Free rotation in degrees.
    pub fn rotation(&self) -> f32 {
        360.0 * self.b
    }
}

/// Seeded table of placement hashes, tiled over the world.
pub struct HashGrid {
    samples: Vec<PlacementHash>,
    noise: Perlin,
}

impl HashGrid {
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let samples = (0..HASH_GRID_SIZE * HASH_GRID_SIZE)
            .map(|_| PlacementHash {
                a: rng.gen::<f32>(),
                b: rng.gen::<f32>(),
            })
            .collect();
        Self {
            samples,
            noise: Perlin::new(1).set_seed(seed as u32),
        }
    }

    pub fn sample(&self, position: WorldPosition) -> PlacementHash {
        let x = ((position.x * HASH_GRID_SCALE).floor() as i64).rem_euclid(HASH_GRID_SIZE as i64) as usize;
        let z = ((position.z * HASH_GRID_SCALE).floor() as i64).rem_euclid(HASH_GRID_SIZE as i64) as usize;
        self.samples[x + z * HASH_GRID_SIZE]
    }

    /// Jitter a decoration position with smooth noise so rows of props do not
    /// line up. Height is left alone.
    pub fn perturb(&self, position: WorldPosition) -> WorldPosition {
        let sx = position.x as f64 / CELL_SIZE as f64 * PERTURB_FREQUENCY;
        let sz = position.z as f64 / CELL_SIZE as f64 * PERTURB_FREQUENCY;
        let zx = (position.x as f64 + PERTURB_Z_OFFSET) / CELL_SIZE as f64 * PERTURB_FREQUENCY;
        let zz = (position.z as f64 + PERTURB_Z_OFFSET) / CELL_SIZE as f64 * PERTURB_FREQUENCY;

        // Perlin output is in [-1, 1]; shift to [0, 1] before scaling.
        let dx = (self.noise.get([sx, sz]) * 0.5 + 0.5).clamp(0.0, 1.0) as f32;
        let dz = (self.noise.get([zx, zz]) * 0.5 + 0.5).clamp(0.0, 1.0) as f32;
        WorldPosition::new(
            position.x + PERTURB_MAGNITUDE * dx,
            position.y,
            position.z + PERTURB_MAGNITUDE * dz,
        )
    }
}
