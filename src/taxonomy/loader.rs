#![forbid(unsafe_code)]

//! Taxonomy loading
//!
//! Loaders never raise: a document that cannot be resolved or parsed is
//! reported through the sink and `None` is returned, so rule builders can
//! continue with the sources that did load.

use crate::diagnostics::{DiagnosticSink, NOT_LOADED};
use crate::taxonomy::TaxonomyDocument;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Resolves a source locator into a relationship-queryable document
pub trait TaxonomyLoader {
    fn load(&self, locator: &str, sink: &dyn DiagnosticSink) -> Option<TaxonomyDocument>;
}

/// Loads JSON taxonomy snapshots from the local file system
///
/// Relative locators and `file://` URLs resolve against `base_dir`.
/// Remote locators are reported as not loaded; fetching them belongs to the
/// host's web cache.
#[derive(Debug, Clone)]
pub struct JsonTaxonomyLoader {
    base_dir: PathBuf,
}

impl JsonTaxonomyLoader {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        JsonTaxonomyLoader {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, locator: &str) -> Option<PathBuf> {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            return None;
        }
        let path = PathBuf::from(locator.strip_prefix("file://").unwrap_or(locator));
        Some(if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        })
    }
}

impl TaxonomyLoader for JsonTaxonomyLoader {
    fn load(&self, locator: &str, sink: &dyn DiagnosticSink) -> Option<TaxonomyDocument> {
        let Some(path) = self.resolve(locator) else {
            sink.error(
                NOT_LOADED,
                "Remote taxonomy locators are not supported by the local loader",
                &[("locator", locator.to_string())],
            );
            return None;
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                sink.error(
                    NOT_LOADED,
                    &format!("Failed to read taxonomy {}: {}", path.display(), e),
                    &[("locator", locator.to_string())],
                );
                return None;
            }
        };

        match serde_json::from_str(&text) {
            Ok(doc) => Some(doc),
            Err(e) => {
                sink.error(
                    NOT_LOADED,
                    &format!("Failed to parse taxonomy {}: {}", path.display(), e),
                    &[("locator", locator.to_string())],
                );
                None
            }
        }
    }
}

/// Loader over documents already held in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    documents: HashMap<String, TaxonomyDocument>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, locator: &str, doc: TaxonomyDocument) -> Self {
        self.documents.insert(locator.to_string(), doc);
        self
    }
}

impl TaxonomyLoader for MemoryLoader {
    fn load(&self, locator: &str, sink: &dyn DiagnosticSink) -> Option<TaxonomyDocument> {
        let doc = self.documents.get(locator).cloned();
        if doc.is_none() {
            sink.error(
                NOT_LOADED,
                "Taxonomy document not available",
                &[("locator", locator.to_string())],
            );
        }
        doc
    }
}
