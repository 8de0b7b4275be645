//! Shared plumbing for commands: content loading, engine setup and the
//! on-disk state file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use battle_content::{ContentFactory, bundled_data_dir, resolve_encounter, resolve_squad};
use battle_core::{
    AbilityRegistry, BattleEngine, BattleState, UnitRuntime, build_enemy_units,
    build_player_units, decode_state, encode_state,
};

/// Default state file used by `new`, `act` and `show`.
pub const DEFAULT_STATE_FILE: &str = "battle.json";

/// Where battle content is read from.
#[derive(Args, Clone, Debug)]
pub struct ContentArgs {
    /// Content directory (defaults to the data shipped with battle-content)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,
}

impl ContentArgs {
    pub fn factory(&self) -> ContentFactory {
        ContentFactory::new(self.data_dir.clone().unwrap_or_else(bundled_data_dir))
    }

    /// Engine configured from the content directory's `battle.toml`.
    pub fn engine(&self) -> Result<BattleEngine> {
        let config = self.factory().load_config()?;
        Ok(BattleEngine::try_new(config, AbilityRegistry::default())?)
    }
}

/// Rosters for one battle, built from content.
pub struct Matchup {
    pub players: Vec<UnitRuntime>,
    pub enemies: Vec<UnitRuntime>,
    pub tick_limit: Option<u32>,
    pub title: String,
}

/// Builds both rosters for `encounter_id` from the squad and catalog.
pub fn load_matchup(
    factory: &ContentFactory,
    engine: &BattleEngine,
    encounter_id: &str,
) -> Result<Matchup> {
    let catalog = factory.load_heroes()?;
    let squad = factory.load_squad()?;
    let encounter = factory.load_encounter(encounter_id)?;

    let (heroes, formation) = resolve_squad(&catalog, &squad)?;
    let templates = resolve_encounter(&catalog, &encounter)?;

    let registry = engine.registry();
    Ok(Matchup {
        players: build_player_units(&heroes, &formation, registry),
        enemies: build_enemy_units(&templates, encounter.level, registry),
        tick_limit: encounter.tick_limit,
        title: encounter.name,
    })
}

pub fn read_state(path: &Path, engine: &BattleEngine) -> Result<BattleState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    let state = decode_state(&json, engine.config())
        .with_context(|| format!("Invalid state file: {}", path.display()))?;
    debug!(target: "battle_sim", path = %path.display(), tick = state.tick, "loaded state");
    Ok(state)
}

pub fn write_state(path: &Path, state: &BattleState) -> Result<()> {
    let json = encode_state(state).context("Failed to serialize battle state")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write state file: {}", path.display()))?;
    debug!(target: "battle_sim", path = %path.display(), tick = state.tick, "saved state");
    Ok(())
}
