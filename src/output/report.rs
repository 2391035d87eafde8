#![forbid(unsafe_code)]

//! Command results shared by the formatters

use crate::diagnostics::{Diagnostic, Level};
use serde::Serialize;

/// One result line of a command
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Record {
    /// Classification of a namespace URI
    Classification {
        namespace: String,
        key: Option<String>,
        wild_key: Option<String>,
    },
    /// A compiled artifact and its number of entries
    Artifact {
        name: String,
        entries: usize,
        /// Read from an existing artifact rather than built
        cached: bool,
    },
    /// An active DEI validation row
    Row {
        index: usize,
        validation: Option<String>,
        xbrl_names: Vec<String>,
        forms: Vec<String>,
    },
    /// A concept whose facts must not be negative
    NonNegative { concept: String },
    /// A member under which negative values are allowed
    ExcludedMember { member: String },
    /// An axis under which negative values are allowed
    ExcludedAxis { axis: String, members: Vec<String> },
    /// The excluded member substring alternation
    MemberPattern { pattern: Option<String> },
    /// Resolution of a custom axis name
    AxisMatch {
        name: String,
        standard_axis: Option<String>,
    },
}

/// Records plus the diagnostics reported while producing them
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub records: Vec<Record>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new(records: Vec<Record>, diagnostics: Vec<Diagnostic>) -> Self {
        Report {
            records,
            diagnostics,
        }
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.level == Level::Error)
            .count()
    }

    /// True when no error was reported
    pub fn passed(&self) -> bool {
        self.error_count() == 0
    }
}
