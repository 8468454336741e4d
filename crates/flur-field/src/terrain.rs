//! Fractal-noise terrain field and its configuration.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::DensityField;
use crate::noise;

#[derive(Clone, Debug, Deserialize)]
pub struct TerrainConfig {
    #[serde(default = "default_octaves")]
    pub octaves: u32,
    #[serde(default = "default_persistence")]
    pub persistence: f64,
    /// Per-axis frequency divisors: the sample coordinate is divided by
    /// these before entering the noise lattice.
    #[serde(default = "default_frequency")]
    pub frequency: [f64; 3],
    #[serde(default = "default_vertical_scale")]
    pub vertical_scale: f64,
    #[serde(default = "default_vertical_offset")]
    pub vertical_offset: f64,
}

fn default_octaves() -> u32 {
    6
}

fn default_persistence() -> f64 {
    0.5
}

fn default_frequency() -> [f64; 3] {
    [40.0, 10.0, 40.0]
}

fn default_vertical_scale() -> f64 {
    50.0
}

fn default_vertical_offset() -> f64 {
    15.0
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            octaves: default_octaves(),
            persistence: default_persistence(),
            frequency: default_frequency(),
            vertical_scale: default_vertical_scale(),
            vertical_offset: default_vertical_offset(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TerrainParams {
    pub octaves: u32,
    pub persistence: f64,
    pub frequency: [f64; 3],
    pub vertical_scale: f64,
    pub vertical_offset: f64,
}

impl TerrainParams {
    pub fn from_config(cfg: &TerrainConfig) -> Self {
        Self {
            octaves: cfg.octaves,
            persistence: cfg.persistence,
            frequency: cfg.frequency,
            vertical_scale: cfg.vertical_scale,
            vertical_offset: cfg.vertical_offset,
        }
    }
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self::from_config(&TerrainConfig::default())
    }
}

pub fn load_params_from_path(path: &Path) -> Result<TerrainParams, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: TerrainConfig = toml::from_str(&s)?;
    Ok(TerrainParams::from_config(&cfg))
}

/// Height-map terrain: density grows with altitude and is pushed down by
/// the local noise value, so the zero level traces a rolling surface.
#[derive(Clone, Copy, Debug)]
pub struct TerrainField {
    params: TerrainParams,
}

impl TerrainField {
    pub fn new(params: TerrainParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }
}

impl DensityField for TerrainField {
    #[inline]
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.params;
        let [fx, fy, fz] = p.frequency;
        let n = noise::fbm(x / fx, y / fy, z / fz, p.octaves, p.persistence);
        y - n * p.vertical_scale + p.vertical_offset
    }
}
