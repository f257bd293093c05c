//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// restamp - post-build asset fingerprinting
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: restamp.toml, searched upward from cwd)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fingerprint build outputs and rewrite asset references
    #[command(visible_alias = "r")]
    Run {
        #[command(flatten)]
        args: RunArgs,
    },

    /// Print the digested name for one or more files
    #[command(visible_alias = "d")]
    Digest {
        /// Files to digest
        #[arg(value_name = "FILE", required = true, value_hint = clap::ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
}

/// Run command arguments
#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Build profile label; renaming only happens for "production"
    #[arg(short, long, default_value = "production")]
    pub profile: String,

    /// Precompile sub-phase: skip all processing (build-orchestrator hook)
    #[arg(long)]
    pub precompile: bool,

    /// Project root override (default: the config file's directory)
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
