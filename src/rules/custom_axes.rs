#![forbid(unsafe_code)]

//! Custom-axis substitution patterns
//!
//! `axiswarnings.json` maps a standard axis name to a pattern matching the
//! custom axes filers tend to define in its place. All patterns compile into
//! one anchored alternation; each arm carries a synthetic capture group, and
//! an explicit group → axis table maps a match back to the standard axis.

use crate::error::{EfmError, RuleError};
use crate::store::{ArtifactStore, read_json};
use regex::Regex;
use serde_json::{Map, Value};

/// Artifact holding the custom axis patterns
pub const AXIS_WARNINGS_FILE: &str = "axiswarnings.json";

/// Metadata keys of the artifact that are not axis entries
const RESERVED_KEYS: [&str; 3] = ["#", "copyright", "description"];

/// Alternation that can never match, used when no patterns are declared
const NEVER_MATCHES: &str = r"[^\s\S]";

/// Compiled custom-axis patterns
#[derive(Debug, Clone)]
pub struct CustomAxisPatterns {
    /// (synthetic group name, standard axis name), in alternation order
    standard_axes: Vec<(String, String)>,
    pattern: Regex,
}

impl CustomAxisPatterns {
    /// Compiles the `standardAxis → pattern` entries of an artifact
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidDefinition` if a non-reserved value is not a
    /// string, and `RuleError::InvalidRegex` if the alternation does not
    /// compile.
    pub fn compile(source: &Map<String, Value>) -> Result<Self, RuleError> {
        let mut standard_axes = Vec::new();
        let mut arms = Vec::new();

        for (standard_axis, custom_pattern) in source {
            if RESERVED_KEYS.contains(&standard_axis.as_str()) {
                continue;
            }
            let custom_pattern = custom_pattern.as_str().ok_or_else(|| {
                RuleError::InvalidDefinition(format!(
                    "Pattern for axis '{}' must be a string",
                    standard_axis
                ))
            })?;
            let group = format!("axis{}", standard_axes.len());
            arms.push(format!("(?P<{}>^{}$)", group, custom_pattern));
            standard_axes.push((group, standard_axis.clone()));
        }

        let alternation = if arms.is_empty() {
            NEVER_MATCHES.to_string()
        } else {
            arms.join("|")
        };
        let pattern = Regex::new(&alternation).map_err(|e| {
            RuleError::InvalidRegex(format!("Failed to compile custom axis patterns: {}", e))
        })?;

        Ok(CustomAxisPatterns {
            standard_axes,
            pattern,
        })
    }

    /// Parses and compiles artifact text
    pub fn from_json(text: &str) -> Result<Self, RuleError> {
        let source: Map<String, Value> = serde_json::from_str(text).map_err(|e| {
            RuleError::InvalidDefinition(format!("Failed to parse {}: {}", AXIS_WARNINGS_FILE, e))
        })?;
        Self::compile(&source)
    }

    /// Loads `axiswarnings.json` from the store
    pub fn load(store: &dyn ArtifactStore) -> Result<Self, EfmError> {
        let source: Map<String, Value> = read_json(store, AXIS_WARNINGS_FILE)?;
        Ok(Self::compile(&source)?)
    }

    /// Standard axis whose pattern matches `custom_axis_name`
    ///
    /// When several patterns match, the one declared first wins.
    pub fn resolve(&self, custom_axis_name: &str) -> Option<&str> {
        let caps = self.pattern.captures(custom_axis_name)?;
        self.standard_axes
            .iter()
            .find(|(group, _)| caps.name(group).is_some())
            .map(|(_, standard)| standard.as_str())
    }

    /// The combined alternation
    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// (synthetic group, standard axis) pairs
    pub fn standard_axes(&self) -> &[(String, String)] {
        &self.standard_axes
    }

    pub fn len(&self) -> usize {
        self.standard_axes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.standard_axes.is_empty()
    }
}
