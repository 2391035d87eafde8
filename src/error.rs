//! Error types for efm-rules
//!
//! Only fatal conditions are errors: missing or unparsable configuration and
//! rule artifacts. Defects *inside* rule documents (unresolved references,
//! circular form classes, unloadable taxonomies) are reported through a
//! [`DiagnosticSink`](crate::diagnostics::DiagnosticSink) instead.

use std::path::PathBuf;

/// Configuration-related errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid TOML syntax or shape
    #[error("Invalid configuration syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Errors reading, decoding or writing a rule artifact
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// Artifact file could not be read or written
    #[error("I/O error on artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Artifact exists but is not valid for its kind
    #[error("Failed to decode artifact {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact could not be serialized
    #[error("Failed to encode artifact {name}: {source}")]
    Encode {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// Artifact is not present in the store
    #[error("Artifact not found: {0}")]
    NotFound(String),
}

/// Rule compilation errors
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// Invalid rule definition
    #[error("Invalid rule definition: {0}")]
    InvalidDefinition(String),

    /// Invalid regex pattern
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
}

/// Top-level error type for efm-rules
#[derive(Debug, thiserror::Error)]
pub enum EfmError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Artifact error
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    /// Rule error
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
