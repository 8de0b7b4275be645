//! Command implementations for battle-sim
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod act;
mod new;
mod run;
mod show;

pub use act::Act;
pub use new::New;
pub use run::Run;
pub use show::Show;

/// How a command prints its result.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable view
    Summary,
    /// Full JSON output
    Json,
}

/// Encounter used when none is given.
pub const DEFAULT_ENCOUNTER: &str = "goblin_ambush";
