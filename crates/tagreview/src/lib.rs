//! Library interface for the `tagreview` CLI.
//!
//! Exposes the argument parser and the review command as a library, mainly so
//! `xtask` can generate man pages and completions. The entry point is in
//! `main.rs`.
//!
//! - [`Cli`] - The argument parser (clap derive)
//! - [`commands`] - Command implementation
//! - [`render`] - Plain-text tables

pub mod commands;

pub mod render;

use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use tagreview_core::tags::TagOrder;

/// Color output preference.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum ColorChoice {
    /// Detect terminal capabilities automatically.
    #[default]
    Auto,
    /// Always emit colors.
    Always,
    /// Never emit colors.
    Never,
}

impl ColorChoice {
    /// Configure global color output based on this choice.
    ///
    /// Call this once at startup to set the color mode.
    pub fn apply(self) {
        match self {
            Self::Auto => {} // owo-colors auto-detects by default
            Self::Always => owo_colors::set_override(true),
            Self::Never => owo_colors::set_override(false),
        }
    }
}

const ENV_HELP: &str = "\
ENVIRONMENT VARIABLES:
    RUST_LOG                Log filter (e.g., debug, tagreview_core=trace)
    TAGREVIEW_LOG_PATH      Explicit log file path
    TAGREVIEW_LOG_DIR       Log directory
";

/// Command-line interface definition for tagreview.
#[derive(Parser, Debug)]
#[command(name = "tagreview")]
#[command(
    about = "Review commits since the last release tag and propose the next version",
    long_about = None
)]
#[command(version)]
#[command(after_long_help = ENV_HELP)]
pub struct Cli {
    /// Path to the git working copy
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Start of the commit range (exclusive); defaults to the oldest of the recent release tags
    #[arg(long, value_name = "REF")]
    pub from: Option<String>,

    /// End of the commit range (inclusive); defaults to HEAD
    #[arg(long, value_name = "REF")]
    pub to: Option<String>,

    /// Skip `git fetch` before reviewing
    #[arg(long)]
    pub no_fetch: bool,

    /// How to rank release tags when choosing the default start
    #[arg(long, value_enum, value_name = "ORDER")]
    pub tag_order: Option<TagOrder>,

    /// Path to configuration file (overrides discovery)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only print errors (suppresses warnings/info)
    #[arg(short, long)]
    pub quiet: bool,

    /// More detail (repeatable; e.g. -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Colorize output
    #[arg(long, value_enum, default_value_t)]
    pub color: ColorChoice,

    /// Output as JSON (for scripting)
    #[arg(long)]
    pub json: bool,
}

/// Returns the clap command for documentation generation
pub fn command() -> clap::Command {
    Cli::command()
}
