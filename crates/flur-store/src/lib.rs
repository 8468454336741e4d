//! Chunk streaming: stream configuration, the generation runtime, and
//! the resident chunk store.
#![forbid(unsafe_code)]

pub mod runtime;
pub mod store;

pub use runtime::{GenJob, GenOut, Runtime};
pub use store::{ChunkStore, StreamUpdate};

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use flur_lattice::ChunkShape;

/// Rejected stream configuration.
#[derive(Debug)]
pub enum ConfigError {
    NegativeRadius(i32),
    NonPositiveSpacing(f64),
    NonPositiveExtent(&'static str, f64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NegativeRadius(r) => {
                write!(f, "resident radius must be non-negative, got {r}")
            }
            ConfigError::NonPositiveSpacing(w) => {
                write!(f, "voxel spacing must be positive, got {w}")
            }
            ConfigError::NonPositiveExtent(axis, v) => {
                write!(f, "chunk extent {axis} must be positive, got {v}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_size_x")]
    pub size_x: f64,
    #[serde(default = "default_size_y")]
    pub size_y: f64,
    #[serde(default = "default_size_z")]
    pub size_z: f64,
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    #[serde(default = "default_guard")]
    pub guard: usize,
    #[serde(default = "default_radius")]
    pub radius: i32,
    #[serde(default = "default_isolevel")]
    pub isolevel: f64,
}

fn default_size_x() -> f64 {
    16.0
}

fn default_size_y() -> f64 {
    20.0
}

fn default_size_z() -> f64 {
    16.0
}

fn default_spacing() -> f64 {
    0.5
}

fn default_guard() -> usize {
    3
}

fn default_radius() -> i32 {
    2
}

fn default_isolevel() -> f64 {
    0.0
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            size_x: default_size_x(),
            size_y: default_size_y(),
            size_z: default_size_z(),
            spacing: default_spacing(),
            guard: default_guard(),
            radius: default_radius(),
            isolevel: default_isolevel(),
        }
    }
}

/// Validated, immutable parameters for one chunk stream.
#[derive(Clone, Copy, Debug)]
pub struct StreamParams {
    pub shape: ChunkShape,
    pub radius: i32,
    pub isolevel: f64,
}

impl StreamParams {
    /// Freezes a config, rejecting values that would break window or
    /// lattice math before any generation begins.
    pub fn from_config(cfg: &StreamConfig) -> Result<Self, ConfigError> {
        if cfg.radius < 0 {
            return Err(ConfigError::NegativeRadius(cfg.radius));
        }
        if cfg.spacing <= 0.0 {
            return Err(ConfigError::NonPositiveSpacing(cfg.spacing));
        }
        for (axis, v) in [("x", cfg.size_x), ("y", cfg.size_y), ("z", cfg.size_z)] {
            if v <= 0.0 {
                return Err(ConfigError::NonPositiveExtent(axis, v));
            }
        }
        Ok(Self {
            shape: ChunkShape {
                size_x: cfg.size_x,
                size_y: cfg.size_y,
                size_z: cfg.size_z,
                spacing: cfg.spacing,
                guard: cfg.guard,
            },
            radius: cfg.radius,
            isolevel: cfg.isolevel,
        })
    }
}

impl Default for StreamParams {
    fn default() -> Self {
        Self {
            shape: ChunkShape {
                size_x: default_size_x(),
                size_y: default_size_y(),
                size_z: default_size_z(),
                spacing: default_spacing(),
                guard: default_guard(),
            },
            radius: default_radius(),
            isolevel: default_isolevel(),
        }
    }
}

pub fn load_params_from_path(path: &Path) -> Result<StreamParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: StreamConfig = toml::from_str(&s)?;
    Ok(StreamParams::from_config(&cfg)?)
}
