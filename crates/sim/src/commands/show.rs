//! Inspect a saved battle.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use battle_core::snapshot_for_display;
use battle_core::view::DEFAULT_LOG_TAIL;

use super::OutputFormat;
use crate::render;
use crate::session::{ContentArgs, DEFAULT_STATE_FILE, read_state};

/// Print the display view of a state file
#[derive(Parser)]
pub struct Show {
    /// State file to read
    #[arg(long, value_name = "FILE", default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    /// Number of trailing log events to include
    #[arg(long, default_value_t = DEFAULT_LOG_TAIL)]
    log_tail: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,

    #[command(flatten)]
    content: ContentArgs,
}

impl Show {
    pub fn execute(self) -> Result<()> {
        let engine = self.content.engine()?;
        let state = read_state(&self.state, &engine)?;
        let view = snapshot_for_display(&state, self.log_tail);

        match self.format {
            OutputFormat::Summary => {
                render::print_view(&view);
                if let Some(report) = engine.rewards(&state) {
                    render::print_rewards(&report);
                }
            }
            OutputFormat::Json => {
                let json =
                    serde_json::to_string_pretty(&view).context("Failed to serialize view")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}
