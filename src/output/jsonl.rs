#![forbid(unsafe_code)]

//! JSONL output formatter for machine-readable output
//!
//! Outputs one JSON object per line in a deterministic order:
//! 1. All result records, in command order
//! 2. All diagnostic records, in the order they were reported
//! 3. One status record

use crate::diagnostics::Diagnostic;
use crate::output::report::Report;
use serde::Serialize;
use std::collections::BTreeMap;

/// JSONL output formatter
pub struct JsonlFormatter;

impl JsonlFormatter {
    /// Creates a new JsonlFormatter
    pub fn new() -> Self {
        JsonlFormatter
    }

    /// Format a report as JSONL
    pub fn format(&self, report: &Report) -> String {
        let mut output = String::new();

        for record in &report.records {
            push_line(&mut output, record);
        }

        for diagnostic in &report.diagnostics {
            push_line(&mut output, &DiagnosticRecord::from(diagnostic));
        }

        let status = StatusRecord {
            record_type: "status",
            passed: report.passed(),
            records: report.records.len() as u64,
            errors: report.error_count() as u64,
        };
        push_line(&mut output, &status);

        output
    }

    /// Write the formatted report to stdout
    pub fn write_to_stdout(&self, report: &Report) {
        print!("{}", self.format(report));
    }
}

impl Default for JsonlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_line<T: Serialize>(output: &mut String, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => {
            output.push_str(&json);
            output.push('\n');
        }
        Err(e) => tracing::warn!(error = %e, "failed to serialize output line"),
    }
}

/// Diagnostic record for JSONL output
#[derive(Debug, Serialize)]
struct DiagnosticRecord<'a> {
    #[serde(rename = "type")]
    record_type: &'static str,
    level: &'static str,
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<&'a BTreeMap<String, String>>,
}

impl<'a> From<&'a Diagnostic> for DiagnosticRecord<'a> {
    fn from(diagnostic: &'a Diagnostic) -> Self {
        DiagnosticRecord {
            record_type: "diagnostic",
            level: match diagnostic.level {
                crate::diagnostics::Level::Info => "info",
                crate::diagnostics::Level::Error => "error",
            },
            code: &diagnostic.code,
            message: &diagnostic.message,
            context: Some(&diagnostic.context).filter(|c| !c.is_empty()),
        }
    }
}

/// Status record for JSONL output
#[derive(Debug, Serialize)]
struct StatusRecord {
    #[serde(rename = "type")]
    record_type: &'static str,
    passed: bool,
    records: u64,
    errors: u64,
}
