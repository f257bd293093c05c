//! restamp - post-build asset fingerprinting for web build pipelines.

#![allow(dead_code)]

mod asset;
mod cli;
mod config;
mod core;
mod logger;
mod manifest;
mod pipeline;
mod registry;
mod rewrite;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::RestampConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match &cli.command {
        Commands::Run { args } => {
            let config = RestampConfig::load(cli.config.as_deref(), args.root.as_deref())?;
            cli::run::run(args, &config)
        }
        Commands::Digest { files } => cli::digest::run(files),
    }
}
