#![forbid(unsafe_code)]

//! Diagnostic reporting
//!
//! Every soft failure while compiling rule tables is reported through a
//! [`DiagnosticSink`] with a stable code and structured context; nothing in
//! the rule compilers raises for malformed rule content.

use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Code for cross-reference and schema errors in the DEI validation catalog
pub const LOAD_DEI_VALIDATIONS: &str = "efm:loadDeiValidations";

/// Code for taxonomy documents that could not be loaded
pub const NOT_LOADED: &str = "efm:notLoaded";

/// Code for informational progress messages
pub const INFO: &str = "info";

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Error,
}

/// A single reported message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub code: String,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

/// Receiver for progress and error reports
///
/// Implementations must not panic; callers continue after every report.
pub trait DiagnosticSink {
    /// Informational message (progress of taxonomy loads, cache builds)
    fn info(&self, message: &str);

    /// A reported, non-fatal error
    fn error(&self, code: &str, message: &str, context: &[(&str, String)]);
}

/// Sink that forwards every report to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, code: &str, message: &str, context: &[(&str, String)]) {
        tracing::error!(code, context = %format_context(context), "{}", message);
    }
}

/// Sink that records reports for later inspection
///
/// Reports are also emitted at debug level through `tracing`.
#[derive(Debug, Default)]
pub struct CollectingSink {
    records: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All reports in the order they were made
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records.borrow().clone()
    }

    /// Reports at error level
    pub fn errors(&self) -> Vec<Diagnostic> {
        self.records
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error)
            .cloned()
            .collect()
    }

    /// Number of error-level reports carrying `code`
    pub fn error_count(&self, code: &str) -> usize {
        self.records
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Error && d.code == code)
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.records.borrow().iter().any(|d| d.level == Level::Error)
    }

    /// Removes and returns all recorded reports
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.records.borrow_mut())
    }
}

impl DiagnosticSink for CollectingSink {
    fn info(&self, message: &str) {
        tracing::debug!("{}", message);
        self.records.borrow_mut().push(Diagnostic {
            level: Level::Info,
            code: INFO.to_string(),
            message: message.to_string(),
            context: BTreeMap::new(),
        });
    }

    fn error(&self, code: &str, message: &str, context: &[(&str, String)]) {
        tracing::debug!(code, context = %format_context(context), "{}", message);
        self.records.borrow_mut().push(Diagnostic {
            level: Level::Error,
            code: code.to_string(),
            message: message.to_string(),
            context: context
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });
    }
}

fn format_context(context: &[(&str, String)]) -> String {
    context
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}
