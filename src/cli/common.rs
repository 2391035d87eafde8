//! Common helper functions shared across CLI commands
//!
//! This module provides shared functionality for loading configuration,
//! loading filing snapshots, and writing command reports.

use crate::cli::args::{ColorChoice, OutputFormat};
use crate::config::{CONFIG_FILE, Config};
use crate::diagnostics::CollectingSink;
use crate::error::{ConfigError, EfmError};
use crate::output::{HumanFormatter, JsonlFormatter, Record, Report};
use crate::taxonomy::FilingSnapshot;
use std::io::IsTerminal;
use std::path::Path;

/// Command completed and nothing was reported
pub const EXIT_SUCCESS: i32 = 0;
/// Command completed but rule errors were reported
pub const EXIT_REPORTED: i32 = 1;
/// Command could not complete
pub const EXIT_ERROR: i32 = 2;

/// Options shared by every command
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub color: ColorChoice,
}

/// Load efm-rules.toml configuration
///
/// An explicitly given file must exist. Without one, `efm-rules.toml` in
/// the current directory is used when present, otherwise the defaults.
///
/// # Errors
///
/// Returns `ConfigError::Io` if an explicit file cannot be read.
/// Returns `ConfigError::Parse` or `ConfigError::Validation` if the file is
/// invalid.
pub(crate) fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return Config::load(path);
    }

    let default_path = Path::new(CONFIG_FILE);
    if default_path.exists() {
        Config::load(default_path)
    } else {
        tracing::info!("{} not found, using default configuration", CONFIG_FILE);
        Ok(Config::default())
    }
}

/// Load a filing snapshot
pub(crate) fn load_filing(path: &Path) -> Result<FilingSnapshot, EfmError> {
    Ok(FilingSnapshot::load(path)?)
}

/// Writes the records and everything reported to `sink`, then maps the
/// outcome to an exit code
pub(crate) fn finish(records: Vec<Record>, sink: &CollectingSink, options: OutputOptions) -> i32 {
    let report = Report::new(records, sink.take());

    match options.format {
        OutputFormat::Human => {
            let formatter = HumanFormatter::new(termcolor_choice(options.color));
            if let Err(e) = formatter.write_to_stdout(&report) {
                eprintln!("Error: {}", e);
                return EXIT_ERROR;
            }
        }
        OutputFormat::Jsonl => JsonlFormatter::new().write_to_stdout(&report),
    }

    if report.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_REPORTED
    }
}

/// Prints a fatal error and returns the matching exit code
pub(crate) fn fail(error: &EfmError) -> i32 {
    tracing::debug!(error = ?error, "command failed");
    eprintln!("Error: {}", error);
    EXIT_ERROR
}

fn termcolor_choice(color: ColorChoice) -> termcolor::ColorChoice {
    match color {
        ColorChoice::Always => termcolor::ColorChoice::Always,
        ColorChoice::Never => termcolor::ColorChoice::Never,
        ColorChoice::Auto if std::io::stdout().is_terminal() => termcolor::ColorChoice::Auto,
        ColorChoice::Auto => termcolor::ColorChoice::Never,
    }
}
