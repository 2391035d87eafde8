#![forbid(unsafe_code)]

//! Filing document model
//!
//! The rule compilers only need two things from a loaded filing: the target
//! namespaces of its documents and whether a qualified concept exists.

use crate::error::ArtifactError;
use crate::types::QName;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// Document model collaborator
pub trait Filing {
    /// Target namespaces of the filing's documents, in document order
    ///
    /// Documents without a target namespace are omitted; namespaces may
    /// repeat when several documents share one.
    fn document_namespaces(&self) -> Vec<&str>;

    /// True if the concept is defined anywhere in the filing's DTS
    fn has_concept(&self, qname: &QName) -> bool;
}

/// Distinct document namespaces, first occurrence order
pub fn distinct_namespaces(filing: &dyn Filing) -> Vec<&str> {
    let mut seen = HashSet::new();
    filing
        .document_namespaces()
        .into_iter()
        .filter(|ns| seen.insert(*ns))
        .collect()
}

/// A document of a filing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingDocument {
    pub uri: String,
    #[serde(default)]
    pub target_namespace: Option<String>,
}

/// Serializable snapshot of a filing's DTS
///
/// ```json
/// {
///   "documents": [{"uri": "dei-2021.xsd", "targetNamespace": "http://xbrl.sec.gov/dei/2021"}],
///   "concepts": ["{http://xbrl.sec.gov/dei/2021}EntityRegistrantName"]
/// }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilingSnapshot {
    #[serde(default)]
    pub documents: Vec<FilingDocument>,
    #[serde(default)]
    pub concepts: HashSet<QName>,
}

impl FilingSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot from a JSON file
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let text = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ArtifactError::Decode {
            name: path.display().to_string(),
            source,
        })
    }

    pub fn with_document(mut self, uri: &str, target_namespace: &str) -> Self {
        self.documents.push(FilingDocument {
            uri: uri.to_string(),
            target_namespace: Some(target_namespace.to_string()),
        });
        self
    }

    /// Adds concepts `local_names` in `namespace`
    pub fn with_concepts(mut self, namespace: &str, local_names: &[&str]) -> Self {
        self.concepts
            .extend(local_names.iter().map(|n| QName::new(namespace, *n)));
        self
    }
}

impl Filing for FilingSnapshot {
    fn document_namespaces(&self) -> Vec<&str> {
        self.documents
            .iter()
            .filter_map(|d| d.target_namespace.as_deref())
            .collect()
    }

    fn has_concept(&self, qname: &QName) -> bool {
        self.concepts.contains(qname)
    }
}
