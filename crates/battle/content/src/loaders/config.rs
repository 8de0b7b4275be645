//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate config from a TOML file.
    ///
    /// Missing keys keep their defaults, so a file may override any subset.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))
    }

    /// Parse and validate config from TOML text.
    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        config.validate()?;

        debug!(
            target: "battle_content",
            turn_threshold = config.turn_threshold,
            speed_divisor = config.speed_divisor,
            "loaded battle config"
        );
        Ok(config)
    }
}
