//! Grid construction settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for building a grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells along x (default: 6).
    pub width: usize,

    /// Cells along z (default: 6).
    pub height: usize,

    /// Cells per chunk along x (default: 5).
    pub chunk_width: usize,

    /// Cells per chunk along z (default: 5).
    pub chunk_height: usize,

    /// Water level every new cell starts with (default: 2).
    pub default_water_level: i32,

    /// Largest elevation difference a road edge may span (default: 3).
    pub max_road_slope: i32,

    /// Seed for the decoration placement hash.
    pub placement_seed: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 6,
            height: 6,
            chunk_width: 5,
            chunk_height: 5,
            default_water_level: 2,
            max_road_slope: 3,
            placement_seed: 0,
        }
    }
}

impl GridConfig {
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Number of chunks along x and z.
    pub fn chunk_counts(&self) -> (usize, usize) {
        (
            self.width.div_ceil(self.chunk_width),
            self.height.div_ceil(self.chunk_height),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must have at least one cell, got {}x{}",
                self.width, self.height
            )));
        }
        if self.chunk_width == 0 || self.chunk_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "chunks must hold at least one cell, got {}x{}",
                self.chunk_width, self.chunk_height
            )));
        }
        if self.width > i32::MAX as usize || self.height > i32::MAX as usize {
            return Err(ConfigError::Invalid("grid too large".to_string()));
        }
        if self.max_road_slope < 0 {
            return Err(ConfigError::Invalid(format!(
                "max_road_slope must not be negative, got {}",
                self.max_road_slope
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GridConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Errors that can occur while loading a grid config.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error (file not found, permissions, etc.)
    Io(std::io::Error),
    /// Malformed JSON
    Parse(String),
    /// Well-formed but unusable values
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Invalid(e) => write!(f, "Invalid config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
