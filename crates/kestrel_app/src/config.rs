//! Application configuration.
//!
//! Every section is optional in the JSON file; missing fields take their
//! defaults.
//!
//! ```json
//! {
//!   "tick": { "tick_rate": 60.0, "max_ticks": 600 },
//!   "arena": { "width": 1600.0, "height": 800.0, "margin": 100.0 },
//!   "registry": { "initial_pool_capacity": 100 }
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use kestrel_ecs::RegistryConfig;
use kestrel_game::ArenaConfig;
use serde::Deserialize;

use crate::tick::TickConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tick: TickConfig,
    pub arena: ArenaConfig,
    pub registry: RegistryConfig,
}

impl AppConfig {
    /// Parse and check a configuration document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid configuration")?;
        config
            .tick
            .tick_duration()
            .context("invalid tick configuration")?;
        Ok(config)
    }

    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_json_str(&json).with_context(|| format!("in config file {}", path.display()))
    }

    /// Load from the path given as the first argument, or use defaults.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        match args.nth(1) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
