//! CLI command implementations.
//!
//! The engine expects a live core; here a core is stood in for by memory
//! dumps on disk, one dump per frame.

pub mod apply;
pub mod list;
pub mod search;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cheat_core::{CoreMemory, EngineConfig, RegionId};
use tracing::{info, warn};

/// Load engine settings, falling back to defaults.
pub fn load_config(path: Option<&Path>) -> EngineConfig {
    let Some(path) = path else {
        return EngineConfig::default();
    };
    let loaded = fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|content| toml::from_str::<EngineConfig>(&content).map_err(Into::into));
    match loaded {
        Ok(config) => {
            info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Failed to load config {:?}: {}, using defaults", path, e);
            EngineConfig::default()
        }
    }
}

/// A memory dump exposed as the configured core region.
pub struct DumpMemory {
    region: RegionId,
    data: Vec<u8>,
}

impl DumpMemory {
    pub fn open(path: &Path, region: RegionId) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("reading dump {}", path.display()))?;
        Ok(Self { region, data })
    }

    /// Swap in the next frame's dump.
    pub fn reload(&mut self, path: &Path) -> Result<()> {
        self.data = fs::read(path).with_context(|| format!("reading dump {}", path.display()))?;
        Ok(())
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl CoreMemory for DumpMemory {
    fn region(&self, id: RegionId) -> Option<&[u8]> {
        (id == self.region).then_some(self.data.as_slice())
    }

    fn region_mut(&mut self, id: RegionId) -> Option<&mut [u8]> {
        (id == self.region).then_some(self.data.as_mut_slice())
    }
}
