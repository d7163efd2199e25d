//! Command line argument parsing for the Lexitree CLI using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Lexitree - BK-tree spelling suggestions
#[derive(Parser, Debug, Clone)]
#[command(name = "lexitree")]
#[command(about = "Spelling suggestions from a persisted BK-tree index")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Lexitree Contributors")]
#[command(long_about = None)]
pub struct LexitreeArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// JSON configuration file
    #[arg(short, long, value_name = "CONFIG_FILE", env = "LEXITREE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl LexitreeArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Rebuild the index from the dictionary and write a fresh snapshot
    Build(BuildArgs),

    /// Suggest corrections for one or more words
    Suggest(SuggestArgs),

    /// Show index statistics
    Stats(StatsArgs),

    /// Read words from stdin, one per line, and print suggestions
    Repl(ReplArgs),
}

/// Dictionary and snapshot locations, overriding the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct IndexArgs {
    /// Line-delimited dictionary file
    #[arg(short, long, value_name = "DICTIONARY_FILE")]
    pub dictionary: Option<PathBuf>,

    /// Snapshot file
    #[arg(short, long, value_name = "SNAPSHOT_FILE")]
    pub snapshot: Option<PathBuf>,
}

/// Arguments for rebuilding the index
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub index: IndexArgs,
}

/// Arguments for suggesting corrections
#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Maximum edit distance
    #[arg(short, long)]
    pub tolerance: Option<usize>,

    /// Words to correct
    #[arg(value_name = "WORD", required = true)]
    pub words: Vec<String>,
}

/// Arguments for showing statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    #[command(flatten)]
    pub index: IndexArgs,
}

/// Arguments for the interactive loop
#[derive(Parser, Debug, Clone)]
pub struct ReplArgs {
    #[command(flatten)]
    pub index: IndexArgs,

    /// Maximum edit distance
    #[arg(short, long)]
    pub tolerance: Option<usize>,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
