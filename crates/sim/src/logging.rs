//! Diagnostic logging setup.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber. Stdout stays reserved for command output.
pub fn init(verbose: bool) {
    let level = if verbose { Level::INFO } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}
