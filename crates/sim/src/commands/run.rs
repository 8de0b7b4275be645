//! Play a full automatic battle.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::info;

use battle_core::snapshot_for_display;
use battle_core::view::DEFAULT_LOG_TAIL;

use super::{DEFAULT_ENCOUNTER, OutputFormat};
use crate::render;
use crate::session::{ContentArgs, load_matchup};

/// Play a whole battle, picking a random enemy for every player turn
#[derive(Parser)]
pub struct Run {
    /// Encounter id from encounters.ron
    #[arg(short, long, default_value = DEFAULT_ENCOUNTER)]
    encounter: String,

    /// Battle seed
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Override the encounter's tick limit
    #[arg(short, long)]
    tick_limit: Option<u32>,

    /// Number of trailing log events to print
    #[arg(long, default_value_t = DEFAULT_LOG_TAIL)]
    log_tail: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    #[command(flatten)]
    content: ContentArgs,
}

impl Run {
    pub fn execute(self) -> Result<()> {
        let engine = self.content.engine()?;
        let matchup = load_matchup(&self.content.factory(), &engine, &self.encounter)?;
        let tick_limit = self.tick_limit.or(matchup.tick_limit);

        info!(
            target: "battle_sim",
            encounter = %self.encounter,
            seed = self.seed,
            "running automatic battle"
        );
        let outcome = engine.run_battle(matchup.players, matchup.enemies, self.seed, tick_limit);

        match self.format {
            OutputFormat::Summary => {
                println!(
                    "{} {} (seed {})",
                    style("Encounter:").bold().cyan(),
                    matchup.title,
                    self.seed
                );
                render::print_view(&snapshot_for_display(&outcome.state, self.log_tail));
                render::print_rewards(&outcome.rewards);
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&outcome)
                    .context("Failed to serialize battle outcome")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}
