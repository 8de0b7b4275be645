//! Developer driver for the battle engine.
//!
//! Plays bundled (or custom) content through `battle-core`, either as a full
//! automatic battle or step by step through a JSON state file, the same way a
//! request/response host would persist it between calls.
//!
//! Run with: `cargo run -p battle-sim -- <command>`

mod commands;
mod logging;
mod render;
mod session;

use anyhow::Result;
use clap::Parser;
use commands::{Act, New, Run, Show};

/// Battle simulation tools
#[derive(Parser)]
#[command(name = "battle-sim")]
#[command(about = "Run and step through deterministic hero battles", long_about = None)]
#[command(version)]
struct Cli {
    /// Log engine diagnostics at info level (RUST_LOG still applies)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Play a whole battle automatically and print the outcome
    Run(Run),

    /// Start a battle and write its state file
    New(New),

    /// Attack a formation cell with the awaiting hero
    Act(Act),

    /// Print the current view of a state file
    Show(Show),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::New(cmd) => cmd.execute(),
        Command::Act(cmd) => cmd.execute(),
        Command::Show(cmd) => cmd.execute(),
    }
}
