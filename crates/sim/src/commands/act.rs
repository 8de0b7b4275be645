//! Apply one player action to a saved battle.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use console::style;

use battle_core::{BattlePhase, Position, Side, TargetSelector, snapshot_for_display};

use crate::render;
use crate::session::{ContentArgs, DEFAULT_STATE_FILE, read_state, write_state};

/// Attack a formation cell with the awaiting hero
#[derive(Parser)]
pub struct Act {
    /// Target cell as <row>:<slot>, e.g. front:0 or back:2
    #[arg(value_name = "CELL", value_parser = parse_cell)]
    cell: Position,

    /// Side the cell belongs to
    #[arg(long, default_value = "enemy", value_parser = parse_side)]
    side: Side,

    /// State file to update
    #[arg(long, value_name = "FILE", default_value = DEFAULT_STATE_FILE)]
    state: PathBuf,

    #[command(flatten)]
    content: ContentArgs,
}

impl Act {
    pub fn execute(self) -> Result<()> {
        let engine = self.content.engine()?;
        let state = read_state(&self.state, &engine)?;
        if state.phase != BattlePhase::AwaitPlayer {
            println!(
                "{} battle is {}, nothing to do",
                style("Note:").bold().yellow(),
                state.phase
            );
        }

        let before = state.log.len();
        let state = engine.apply_player_action(state, TargetSelector::new(self.side, self.cell))?;
        write_state(&self.state, &state)?;

        if state.log.len() > before {
            println!("{}", style("New events:").bold().yellow());
            for event in &state.log[before..] {
                println!("  {}", render::format_event(event));
            }
            println!();
        }
        render::print_view(&snapshot_for_display(&state, 0));
        if let Some(report) = engine.rewards(&state) {
            render::print_rewards(&report);
        }
        Ok(())
    }
}

fn parse_cell(s: &str) -> Result<Position, String> {
    s.parse()
}

fn parse_side(s: &str) -> Result<Side, String> {
    s.parse()
        .map_err(|_| format!("expected 'player' or 'enemy', got '{s}'"))
}
