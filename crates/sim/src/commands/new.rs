//! Start a resumable battle.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use battle_core::snapshot_for_display;
use battle_core::view::DEFAULT_LOG_TAIL;

use super::DEFAULT_ENCOUNTER;
use crate::render;
use crate::session::{ContentArgs, DEFAULT_STATE_FILE, load_matchup, write_state};

/// Create a battle, advance it to the first player turn and save it
#[derive(Parser)]
pub struct New {
    /// Encounter id from encounters.ron
    #[arg(short, long, default_value = DEFAULT_ENCOUNTER)]
    encounter: String,

    /// Battle seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Override the encounter's tick limit
    #[arg(short, long)]
    tick_limit: Option<u32>,

    /// State file to create (overwritten if present)
    #[arg(long, value_name = "FILE", default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    #[command(flatten)]
    content: ContentArgs,
}

impl New {
    pub fn execute(self) -> Result<()> {
        let engine = self.content.engine()?;
        let matchup = load_matchup(&self.content.factory(), &engine, &self.encounter)?;
        let tick_limit = self.tick_limit.or(matchup.tick_limit);

        let state = engine.new_battle(matchup.players, matchup.enemies, self.seed, tick_limit);
        let state = engine.advance(state)?;
        write_state(&self.state, &state)?;

        info!(
            target: "battle_sim",
            path = %self.state.display(),
            phase = %state.phase,
            "battle created"
        );
        render::print_view(&snapshot_for_display(&state, DEFAULT_LOG_TAIL));
        if let Some(report) = engine.rewards(&state) {
            render::print_rewards(&report);
        }
        Ok(())
    }
}
