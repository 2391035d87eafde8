//! CLI argument parsing and command dispatch

pub mod args;
pub mod build;
pub mod check_dei;
pub mod classify;
pub mod common;
pub mod custom_axis;
pub mod non_negative;

// Re-export types for convenient access
pub use args::{Cli, ColorChoice, Command, OutputFormat};
pub use common::OutputOptions;
