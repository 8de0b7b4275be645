//! Encounter table loader.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::debug;

use crate::catalog::EncounterSpec;
use crate::loaders::{LoadResult, read_file};

/// Loader for encounters from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load encounters from a RON file.
    ///
    /// RON format: `Vec<(String, EncounterSpec)>` keyed by encounter id.
    pub fn load(path: &Path) -> LoadResult<BTreeMap<String, EncounterSpec>> {
        let content = read_file(path)?;
        let entries: Vec<(String, EncounterSpec)> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounters RON: {}", e))?;

        let mut encounters = BTreeMap::new();
        for (id, spec) in entries {
            if spec.enemies.is_empty() {
                anyhow::bail!("Encounter '{}' has no enemies", id);
            }
            if encounters.insert(id.clone(), spec).is_some() {
                anyhow::bail!("Duplicate encounter id '{}'", id);
            }
        }

        debug!(target: "battle_content", encounters = encounters.len(), "loaded encounters");
        Ok(encounters)
    }
}
