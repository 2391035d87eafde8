#![forbid(unsafe_code)]

//! efm-rules: compiled rule tables for EDGAR Filer Manual validation
//!
//! Loads the static rule artifacts of the EFM validator, builds the tables
//! derived from taxonomy documents (sign warnings, deprecated-concept
//! dates), and cross-validates the DEI validation catalog. Every table is
//! built at most once and reused across runs through the resources
//! directory.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod namespace;
pub mod output;
pub mod rules;
pub mod store;
pub mod taxonomy;
pub mod types;

// Re-export error types for convenient access
pub use error::{ArtifactError, ConfigError, EfmError, RuleError};

// Re-export core domain types for convenient access
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Level, TracingSink};
pub use namespace::NamespaceCatalog;
pub use rules::RuleCache;
pub use types::{DocumentMode, NamespaceKey, QName, Source};
