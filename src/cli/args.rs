//! CLI argument parsing using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for efm-rules commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Use color when stdout is a terminal
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// efm-rules CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "efm-rules")]
#[command(about = "Compile and inspect EFM validation rule tables")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to efm-rules.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Output coloring
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,
}

/// Available efm-rules subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify namespace URIs into abbreviated keys
    Classify {
        /// Namespace URIs to classify
        #[arg(required = true)]
        namespaces: Vec<String>,
    },

    /// Build (or load) the sign-warning rule table
    BuildSignwarnings,

    /// Build every deprecated-concept date table not marked static
    BuildDeprecations,

    /// Cross-validate the DEI validation catalog against a filing
    CheckDei {
        /// Filing snapshot (JSON)
        filing: PathBuf,

        /// Compile for inline XBRL documents
        #[arg(long)]
        inline: bool,

        /// Only list rows applying to this form type
        #[arg(long)]
        form: Option<String>,
    },

    /// Show the non-negative fact rules that apply to a filing
    NonNegative {
        /// Filing snapshot (JSON)
        filing: PathBuf,
    },

    /// Resolve custom axis names to standard axes
    CustomAxis {
        /// Custom axis local names
        #[arg(required = true)]
        names: Vec<String>,
    },
}
