//! Demo configuration: one TOML file, `[terrain]` and `[stream]` tables.

use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use flur_field::TerrainConfig;
use flur_store::StreamConfig;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub terrain: TerrainConfig,
    #[serde(default)]
    pub stream: StreamConfig,
}

pub fn load_app_config(path: &Path) -> Result<AppConfig, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&s)?;
    Ok(cfg)
}
