#![forbid(unsafe_code)]

//! Namespaces of standard taxonomies outside the disclosure system's list

use crate::error::ArtifactError;
use crate::store::{ArtifactStore, read_json};
use crate::taxonomy::{Filing, distinct_namespaces};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

/// Artifact listing the namespace prefixes
pub const OTHER_STANDARD_TAXONOMIES_FILE: &str = "other-standard-taxonomies.json";

/// `taxonomyPrefixes` is authored either as a list or as an object whose
/// keys are the prefixes
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Prefixes {
    List(Vec<String>),
    Keyed(Map<String, Value>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOtherStandardTaxonomies {
    #[serde(default)]
    taxonomy_prefixes: Option<Prefixes>,
}

/// Namespace prefixes of other standard taxonomies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OtherStandardTaxonomies {
    prefixes: Vec<String>,
}

impl OtherStandardTaxonomies {
    pub fn new(prefixes: Vec<String>) -> Self {
        OtherStandardTaxonomies { prefixes }
    }

    /// Reads `other-standard-taxonomies.json`
    pub fn load(store: &dyn ArtifactStore) -> Result<Self, ArtifactError> {
        let raw: RawOtherStandardTaxonomies = read_json(store, OTHER_STANDARD_TAXONOMIES_FILE)?;
        let prefixes = match raw.taxonomy_prefixes {
            Some(Prefixes::List(prefixes)) => prefixes,
            Some(Prefixes::Keyed(map)) => map.into_iter().map(|(prefix, _)| prefix).collect(),
            None => Vec::new(),
        };
        Ok(Self::new(prefixes))
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Document namespaces of `filing` that carry a known prefix but are not
    /// in `standard_namespaces`
    pub fn namespaces_in(
        &self,
        filing: &dyn Filing,
        standard_namespaces: &HashSet<String>,
    ) -> BTreeSet<String> {
        distinct_namespaces(filing)
            .into_iter()
            .filter(|ns| !standard_namespaces.contains(*ns))
            .filter(|ns| self.prefixes.iter().any(|p| ns.starts_with(p.as_str())))
            .map(str::to_string)
            .collect()
    }
}
