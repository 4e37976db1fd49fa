//! Stylometer - stylistic text-feature statistics CLI
//!
//! A local-first tool that computes stylistic features of a text and
//! compares them against per-genre averages derived from a reference
//! corpus of annotated documents.

use anyhow::Result;
use clap::Parser;
use stylometer::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging; RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    cli::run(cli)
}
