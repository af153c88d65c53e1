//! Engine configuration.
//!
//! This module contains:
//! - `EngineConfig` - user settings loaded by the host
//! - Cheat list limits
//! - Rumble and notification constants

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::host::RegionId;
use crate::memory::WidthClass;

/// Cheat list limits.
pub mod limits {
    /// Largest list that bulk promotion of search matches may produce.
    pub const MAX_PROMOTED_CHEATS: usize = 100;
}

/// Rumble trigger configuration.
pub mod rumble {
    /// Evaluations after (re)activation during which rumble output is suppressed.
    pub const WARMUP_EVALUATIONS: u32 = 300;
}

/// Notification defaults.
pub mod notify {
    pub const DEFAULT_PRIORITY: u32 = 1;

    /// About three seconds at 60 fps.
    pub const DEFAULT_DURATION_FRAMES: u32 = 180;
}

/// File extension of cheat lists.
pub const CHEAT_FILE_EXTENSION: &str = "cht";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Item width used when a search begins.
    pub search_width: WidthClass,
    pub search_big_endian: bool,
    /// Memory region searched and patched.
    pub region: RegionId,
    /// Root directory of game-specific cheat files.
    pub database_dir: PathBuf,
    /// Forward core-opaque cheats to the core right after a load.
    pub apply_after_load: bool,
    /// Forward core-opaque cheats to the core right after a toggle.
    pub apply_after_toggle: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_width: WidthClass::Bits8,
            search_big_endian: false,
            region: RegionId::SystemRam,
            database_dir: PathBuf::from("cheats"),
            apply_after_load: false,
            apply_after_toggle: false,
        }
    }
}

impl EngineConfig {
    /// `<database_dir>/<core_name>/<game_name>.cht`
    pub fn game_specific_path(&self, core_name: &str, game_name: &str) -> PathBuf {
        game_specific_path(&self.database_dir, core_name, game_name)
    }
}

pub fn game_specific_path(database_dir: &Path, core_name: &str, game_name: &str) -> PathBuf {
    database_dir
        .join(sanitize(core_name))
        .join(format!("{}.{}", sanitize(game_name), CHEAT_FILE_EXTENSION))
}

/// Replace characters that cannot appear in a file name component.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits() {
        assert_eq!(limits::MAX_PROMOTED_CHEATS, 100);
        assert_eq!(rumble::WARMUP_EVALUATIONS, 300);
    }

    #[test]
    fn test_game_specific_path() {
        let config = EngineConfig {
            database_dir: PathBuf::from("db"),
            ..Default::default()
        };
        let path = config.game_specific_path("Snes9x", "Super Game: Turbo");
        assert_eq!(
            path,
            PathBuf::from("db").join("Snes9x").join("Super Game_ Turbo.cht")
        );
    }

    #[test]
    fn test_config_serde_defaults() {
        let json = r#"{"search_width":"16bit","apply_after_load":true}"#;
        let config: EngineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.search_width, WidthClass::Bits16);
        assert!(config.apply_after_load);
        assert_eq!(config.region, RegionId::SystemRam);
        assert_eq!(config.database_dir, PathBuf::from("cheats"));
    }
}
