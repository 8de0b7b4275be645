//! Hero catalog loader.

use std::path::Path;

use battle_core::HeroTemplate;
use tracing::debug;

use crate::catalog::HeroCatalog;
use crate::loaders::{LoadResult, read_file};

/// Loader for hero templates from RON files.
pub struct HeroLoader;

impl HeroLoader {
    /// Load the hero catalog from a RON file.
    ///
    /// RON format: `Vec<(String, HeroTemplate)>` where the string is the
    /// catalog id. Duplicate ids are rejected.
    pub fn load(path: &Path) -> LoadResult<HeroCatalog> {
        let content = read_file(path)?;
        let entries: Vec<(String, HeroTemplate)> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse hero catalog RON: {}", e))?;

        let count = entries.len();
        let catalog = HeroCatalog::from_entries(entries);
        if catalog.len() != count {
            anyhow::bail!(
                "Hero catalog {} contains duplicate ids",
                path.display()
            );
        }

        debug!(target: "battle_content", heroes = catalog.len(), "loaded hero catalog");
        Ok(catalog)
    }
}
