//! agentdocs CLI: post-build export of machine-readable documentation.
//!
//! Reads a documentation tree and writes `llms.txt`, the discovery index,
//! JSON schemas and per-section bundles into the built site.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
