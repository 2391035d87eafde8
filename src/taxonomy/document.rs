#![forbid(unsafe_code)]

//! Relationship-queryable taxonomy document
//!
//! A taxonomy document is a snapshot of the concepts, relationships, labels
//! and references of a loaded DTS. The JSON shape is:
//!
//! ```json
//! {
//!   "targetNamespace": "http://fasb.org/us-gaap/2021/dqcrules",
//!   "concepts": ["{http://fasb.org/us-gaap/2021-01-31}Revenues"],
//!   "relationships": [
//!     {"arcrole": "...", "linkrole": "...", "from": "{ns}A", "to": "{ns}B", "order": 1}
//!   ],
//!   "labels": [{"concept": "{ns}A", "role": "...", "lang": "en-US", "text": "..."}],
//!   "references": [{"concept": "{ns}A", "parts": [{"name": "allowableSubString", "text": "..."}]}]
//! }
//! ```

use crate::types::QName;
use serde::Deserialize;

/// Arcrole of concept-label relationships
pub const CONCEPT_LABEL: &str = "http://www.xbrl.org/2003/arcrole/concept-label";

/// Arcrole of concept-reference relationships
pub const CONCEPT_REFERENCE: &str = "http://www.xbrl.org/2003/arcrole/concept-reference";

fn default_order() -> f64 {
    1.0
}

/// A directed arc between two concepts
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Relationship {
    pub arcrole: String,
    #[serde(default)]
    pub linkrole: Option<String>,
    pub from: QName,
    pub to: QName,
    #[serde(default = "default_order")]
    pub order: f64,
}

/// A label resource attached to a concept
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Label {
    pub concept: QName,
    pub role: String,
    #[serde(default)]
    pub lang: Option<String>,
    pub text: String,
}

/// One part of a reference resource, e.g. `ref:allowableSubString`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferencePart {
    pub name: String,
    pub text: String,
}

impl ReferencePart {
    /// Part name without any prefix or Clark namespace
    pub fn local_name(&self) -> &str {
        let name = self.name.rsplit_once('}').map_or(self.name.as_str(), |(_, n)| n);
        name.rsplit_once(':').map_or(name, |(_, n)| n)
    }
}

/// A reference resource attached to a concept
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    pub concept: QName,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<ReferencePart>,
}

/// A loaded taxonomy document
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyDocument {
    #[serde(default)]
    pub target_namespace: Option<String>,
    #[serde(default)]
    pub concepts: Vec<QName>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl TaxonomyDocument {
    /// Concepts with the given local name, in any namespace
    pub fn concepts_named<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a QName> {
        self.concepts
            .iter()
            .filter(move |c| c.local_name() == local_name)
    }

    /// Relationships of one arcrole, optionally restricted to a link role
    pub fn relationships(&self, arcrole: &str, linkrole: Option<&str>) -> RelationshipSet<'_> {
        let relationships = self
            .relationships
            .iter()
            .filter(|r| r.arcrole == arcrole)
            .filter(|r| linkrole.is_none() || r.linkrole.as_deref() == linkrole)
            .collect();
        RelationshipSet { relationships }
    }

    /// Concept-label relationships, as (concept, label) pairs
    pub fn label_relationships(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }

    /// References attached to a concept
    pub fn references_of<'a>(&'a self, concept: &'a QName) -> impl Iterator<Item = &'a Reference> {
        self.references.iter().filter(move |r| &r.concept == concept)
    }
}

/// A filtered view of a document's relationships
#[derive(Debug, Clone)]
pub struct RelationshipSet<'a> {
    relationships: Vec<&'a Relationship>,
}

impl<'a> RelationshipSet<'a> {
    /// Outgoing relationships of `concept`, ordered by their `order`
    pub fn from_concept(&self, concept: &QName) -> Vec<&'a Relationship> {
        let mut out: Vec<&'a Relationship> = self
            .relationships
            .iter()
            .copied()
            .filter(|r| &r.from == concept)
            .collect();
        out.sort_by(|a, b| a.order.total_cmp(&b.order));
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Relationship> + '_ {
        self.relationships.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }
}
