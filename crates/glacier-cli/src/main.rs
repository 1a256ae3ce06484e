//! Glacier CLI Application
//!
//! Command-line front end for synthesizing workflow plans and talking to
//! support.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use glacier_core::GlacierConfig;
use log::info;
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        config,
        no_color,
        command,
    } = Args::parse();

    let config = GlacierConfig::load(config.as_deref()).context("Failed to load configuration")?;
    let cli = Cli::new(config, TerminalRenderer::new(!no_color));

    info!("Glacier started");

    match command {
        Commands::Synthesize(args) => cli.handle_synthesize(&args).await,
        Commands::Chat(args) => cli.handle_chat(args).await,
        Commands::Config => cli.show_config(),
    }
}
