//! Player squad loader.

use std::path::Path;

use tracing::debug;

use crate::catalog::SquadSpec;
use crate::loaders::{LoadResult, read_file};

/// Loader for the player's squad from RON files.
pub struct SquadLoader;

impl SquadLoader {
    /// Load a squad from a RON file.
    ///
    /// RON format: `SquadSpec`
    pub fn load(path: &Path) -> LoadResult<SquadSpec> {
        let content = read_file(path)?;
        let squad: SquadSpec = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse squad RON: {}", e))?;

        debug!(target: "battle_content", members = squad.members.len(), "loaded squad");
        Ok(squad)
    }
}
