//! snapsweep — gather, deduplicate and date-rename photos.
//!
//! Thin binary entry point. All logic lives in the `snapsweep-core`
//! and `snapsweep-cli` crates.

use clap::Parser;
use snapsweep_cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialise structured logging.
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    tracing::info!("snapsweep starting");

    snapsweep_cli::run(cli)
}
