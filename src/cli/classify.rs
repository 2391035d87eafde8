//! Classify command implementation
//!
//! Maps each namespace URI onto its `family/version` and `family/*` keys
//! using the configured namespace catalog.

use crate::cli::common::{OutputOptions, fail, finish, load_config};
use crate::diagnostics::CollectingSink;
use crate::error::EfmError;
use crate::namespace::NamespaceCatalog;
use crate::output::Record;
use std::path::Path;

/// Run the classify command
///
/// # Returns
///
/// Exit code:
/// - 0: Success (unclassified namespaces are not errors)
/// - 2: Error (configuration error)
pub fn run_classify(namespaces: &[String], config: Option<&Path>, options: OutputOptions) -> i32 {
    let sink = CollectingSink::new();
    match run_classify_inner(namespaces, config) {
        Ok(records) => finish(records, &sink, options),
        Err(e) => fail(&e),
    }
}

fn run_classify_inner(namespaces: &[String], config: Option<&Path>) -> Result<Vec<Record>, EfmError> {
    let config = load_config(config)?;
    let catalog = config.namespace_catalog()?;
    Ok(classify_all(&catalog, namespaces))
}

fn classify_all(catalog: &NamespaceCatalog, namespaces: &[String]) -> Vec<Record> {
    namespaces
        .iter()
        .map(|ns| Record::Classification {
            namespace: ns.clone(),
            key: catalog.classify(ns).map(String::from),
            wild_key: catalog.classify_wild(ns).map(String::from),
        })
        .collect()
}
