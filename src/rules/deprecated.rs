#![forbid(unsafe_code)]

//! Deprecated-concept date tables
//!
//! One table per taxonomy family, `{family}-deprecated-concepts.json`,
//! mapping a concept's local name to the date it was deprecated. Tables are
//! built from the deprecated-date labels of the family's latest
//! documentation labels and qualified with a document's namespace when
//! loaded for a filing.

use crate::config::DeprecationSource;
use crate::diagnostics::{DiagnosticSink, NOT_LOADED};
use crate::error::{EfmError, RuleError};
use crate::store::{ArtifactStore, Built, Layout, load_or_build};
use crate::taxonomy::{TaxonomyDocument, TaxonomyLoader};
use crate::types::{NamespaceKey, QName};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

/// Local name → deprecation date
pub type DeprecatedConceptDates = BTreeMap<String, String>;

/// Artifact name of the table for a namespace family
pub fn deprecated_dates_file(key: &NamespaceKey) -> String {
    format!("{}-deprecated-concepts.json", key.family())
}

/// Records every deprecated-date label of `doc` into `dates`
///
/// Group 1 of `date_pattern` is the date; labels whose match leaves it
/// empty are ignored.
pub fn collect_deprecated_dates(
    doc: &TaxonomyDocument,
    label_role: &str,
    date_pattern: &Regex,
    dates: &mut DeprecatedConceptDates,
) {
    for label in doc.label_relationships() {
        if label.role != label_role {
            continue;
        }
        let Some(caps) = date_pattern.captures(&label.text) else {
            continue;
        };
        if let Some(date) = caps.get(1)
            && !date.as_str().is_empty()
        {
            dates.insert(
                label.concept.local_name().to_string(),
                date.as_str().to_string(),
            );
        }
    }
}

/// Loads a family's table, building it from its label documents if absent
///
/// # Errors
///
/// Returns an error if the date pattern does not compile or the artifact
/// cannot be read, decoded or written.
pub fn load_deprecated_dates(
    store: &dyn ArtifactStore,
    loader: &dyn TaxonomyLoader,
    key: &NamespaceKey,
    source: &DeprecationSource,
    sink: &dyn DiagnosticSink,
) -> Result<DeprecatedConceptDates, EfmError> {
    let date_pattern = source.compile_date_pattern().map_err(|e| {
        RuleError::InvalidRegex(format!("Invalid date pattern for {}: {}", key, e))
    })?;
    let file = deprecated_dates_file(key);

    let dates = load_or_build(store, &file, Layout::Flat, || {
        sink.info(&format!("loading {} deprecated concepts into {}", key, file));
        let mut dates = DeprecatedConceptDates::new();
        let mut loaded = 0usize;
        for locator in &source.labels {
            let Some(doc) = loader.load(locator, sink) else {
                sink.error(
                    NOT_LOADED,
                    &format!("{} documentation not loaded", key),
                    &[("name", key.to_string())],
                );
                continue;
            };
            collect_deprecated_dates(&doc, &source.label_role, &date_pattern, &mut dates);
            loaded += 1;
        }
        Ok(Built {
            artifact: dates,
            cacheable: loaded > 0,
        })
    })?;
    Ok(dates)
}

/// Builds the table of every configured family not flagged `static_file`
///
/// Families whose table already exists are read, not rebuilt. Returns the
/// tables of the processed families.
pub fn build_all_deprecated_dates(
    store: &dyn ArtifactStore,
    loader: &dyn TaxonomyLoader,
    sources: &BTreeMap<NamespaceKey, DeprecationSource>,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<(NamespaceKey, DeprecatedConceptDates)>, EfmError> {
    let mut processed = Vec::new();
    for (key, source) in sources {
        if source.static_file {
            tracing::debug!(key = %key, "static deprecation table, not rebuilt");
            continue;
        }
        let dates = load_deprecated_dates(store, loader, key, source, sink)?;
        processed.push((key.clone(), dates));
    }
    Ok(processed)
}

/// Adds a family table to `out`, qualified with document namespace `ns`
pub fn qualify_deprecated_dates(
    ns: &str,
    dates: &DeprecatedConceptDates,
    out: &mut HashMap<QName, String>,
) {
    for (local_name, date) in dates {
        out.insert(QName::new(ns, local_name.as_str()), date.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::store::MemoryStore;
    use crate::taxonomy::MemoryLoader;

    const ROLE: &str = "http://www.xbrl.org/2009/role/deprecatedDateLabel";

    fn source(labels: &[&str], static_file: bool) -> DeprecationSource {
        DeprecationSource {
            label_role: ROLE.to_string(),
            date_pattern: r"Element Deprecated: ([0-9]{4}-[0-9]{2}-[0-9]{2})?".to_string(),
            labels: labels.iter().map(|s| s.to_string()).collect(),
            static_file,
        }
    }

    fn doc() -> TaxonomyDocument {
        serde_json::from_str(&format!(
            r#"{{
                "labels": [
                    {{"concept": "{{http://fasb.org/us-gaap/2021-01-31}}OldConcept", "role": "{role}", "text": "Element Deprecated: 2019-01-31"}},
                    {{"concept": "{{http://fasb.org/us-gaap/2021-01-31}}NoDate", "role": "{role}", "text": "Element Deprecated: unknown"}},
                    {{"concept": "{{http://fasb.org/us-gaap/2021-01-31}}Other", "role": "{role}", "text": "See Element Deprecated: 2018-01-31"}},
                    {{"concept": "{{http://fasb.org/us-gaap/2021-01-31}}Standard", "role": "http://www.xbrl.org/2003/role/label", "text": "Element Deprecated: 2017-01-31"}}
                ]
            }}"#,
            role = ROLE
        ))
        .unwrap()
    }

    fn key(s: &str) -> NamespaceKey {
        NamespaceKey::parse(s).unwrap()
    }

    #[test]
    fn test_collect_only_matching_role_and_date() {
        let mut dates = DeprecatedConceptDates::new();
        let pattern = source(&[], false).compile_date_pattern().unwrap();
        collect_deprecated_dates(&doc(), ROLE, &pattern, &mut dates);
        assert_eq!(dates.len(), 1);
        assert_eq!(dates["OldConcept"], "2019-01-31");
    }

    #[test]
    fn test_load_builds_flat_table() {
        let store = MemoryStore::new();
        let loader = MemoryLoader::new().with_document("us-gaap-doc.json", doc());
        let sink = CollectingSink::new();

        let dates = load_deprecated_dates(
            &store,
            &loader,
            &key("us-gaap/*"),
            &source(&["us-gaap-doc.json"], false),
            &sink,
        )
        .unwrap();
        assert_eq!(dates["OldConcept"], "2019-01-31");
        assert_eq!(
            store.get("us-gaap-deprecated-concepts.json").unwrap(),
            "{\n\"OldConcept\": \"2019-01-31\"\n}\n"
        );
        assert_eq!(
            sink.diagnostics()[0].message,
            "loading us-gaap/* deprecated concepts into us-gaap-deprecated-concepts.json"
        );
    }

    #[test]
    fn test_existing_table_is_authoritative() {
        let store = MemoryStore::new()
            .with_file("us-gaap-deprecated-concepts.json", r#"{"Cached": "2010-01-01"}"#);
        let sink = CollectingSink::new();
        let dates = load_deprecated_dates(
            &store,
            &MemoryLoader::new(),
            &key("us-gaap/*"),
            &source(&["us-gaap-doc.json"], false),
            &sink,
        )
        .unwrap();
        assert_eq!(dates.len(), 1);
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_build_all_skips_static_tables() {
        let store = MemoryStore::new();
        let loader = MemoryLoader::new().with_document("us-gaap-doc.json", doc());
        let sink = CollectingSink::new();
        let mut sources = BTreeMap::new();
        sources.insert(key("us-gaap/*"), source(&["us-gaap-doc.json"], false));
        sources.insert(key("invest/*"), source(&["invest-doc.json"], true));

        let built = build_all_deprecated_dates(&store, &loader, &sources, &sink).unwrap();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].0, key("us-gaap/*"));
        assert_eq!(built[0].1["OldConcept"], "2019-01-31");
        assert!(!store.exists("invest-deprecated-concepts.json"));
        assert!(!sink.has_errors());
    }

    #[test]
    fn test_unloaded_labels_reported() {
        let store = MemoryStore::new();
        let sink = CollectingSink::new();
        let dates = load_deprecated_dates(
            &store,
            &MemoryLoader::new(),
            &key("srt/*"),
            &source(&["missing.json"], false),
            &sink,
        )
        .unwrap();
        assert!(dates.is_empty());
        assert!(sink.errors().iter().any(|d| d.message == "srt/* documentation not loaded"));
        assert!(!store.exists("srt-deprecated-concepts.json"));
    }

    #[test]
    fn test_qualify() {
        let mut dates = DeprecatedConceptDates::new();
        dates.insert("OldConcept".to_string(), "2019-01-31".to_string());
        let mut out = HashMap::new();
        qualify_deprecated_dates("http://fasb.org/us-gaap/2021-01-31", &dates, &mut out);
        assert_eq!(
            out[&QName::new("http://fasb.org/us-gaap/2021-01-31", "OldConcept")],
            "2019-01-31"
        );
    }
}
