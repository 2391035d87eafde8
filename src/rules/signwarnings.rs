#![forbid(unsafe_code)]

//! Sign-warning (DQC 0015 non-negative) rule tables
//!
//! The compiled table starts from a hand-curated template and is extended
//! with the rules published in the DQC rule taxonomies. Anchor concepts in
//! the rule taxonomy head relationship trees whose targets are the affected
//! concepts, members and axes; targets are grouped by the abbreviated key of
//! their own namespace.

use crate::diagnostics::{DiagnosticSink, NOT_LOADED};
use crate::error::ArtifactError;
use crate::namespace::NamespaceCatalog;
use crate::store::{ArtifactStore, Built, Layout, load_or_build, read_json};
use crate::taxonomy::{TaxonomyDocument, TaxonomyLoader};
use crate::types::NamespaceKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Compiled sign-warning artifact
pub const SIGNWARNINGS_FILE: &str = "signwarnings.json";

/// Hand-curated seed rules
pub const SIGNWARNINGS_TEMPLATE_FILE: &str = "signwarnings-template.json";

/// FASB DQC concept-rule arcrole
pub const DQC_CONCEPT_RULE: &str = "http://fasb.org/dqcrules/arcrole/concept-rule";

/// Link role of DQC rule 0015
pub const DQC_0015_ROLE: &str = "http://fasb.org/us-gaap/role/dqc/0015";

/// Reference part listing excluded member-name substrings
const ALLOWABLE_SUBSTRING_PART: &str = "allowableSubString";

/// Member value meaning every member of the axis
pub const ALL_MEMBERS: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    ListOfElements,
    ExcludeMembers,
    ExcludeAxis,
    ExcludeAxisMembers,
    ExcludeMemberStrings,
}

const ANCHORS: [(&str, Anchor); 5] = [
    ("Dqc_0015_ListOfElements", Anchor::ListOfElements),
    ("Dqc_0015_ExcludeNonNegMembersAbstract", Anchor::ExcludeMembers),
    ("Dqc_0015_ExcludeNonNegAxisAbstract", Anchor::ExcludeAxis),
    ("Dqc_0015_ExcludeNonNegAxisMembersAbstract", Anchor::ExcludeAxisMembers),
    ("Dqc_0015_ExcludeNonNegMemberStringsAbstract", Anchor::ExcludeMemberStrings),
];

/// Four rule categories keyed by abbreviated namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignWarningRuleSet {
    /// Concepts whose facts must not be negative
    #[serde(default)]
    pub concept_names: BTreeMap<NamespaceKey, Vec<String>>,

    /// Members under which negative values are allowed
    #[serde(default)]
    pub excluded_member_names: BTreeMap<NamespaceKey, Vec<String>>,

    /// Axis → members under which negative values are allowed (`*` = all)
    #[serde(default)]
    pub excluded_axes_members: BTreeMap<NamespaceKey, BTreeMap<String, Vec<String>>>,

    /// Member-name substrings under which negative values are allowed
    #[serde(default)]
    pub excluded_member_strings: BTreeMap<NamespaceKey, Vec<String>>,
}

impl SignWarningRuleSet {
    /// True if any category has an entry for `key`
    ///
    /// An axis entry only counts when it lists at least one member.
    pub fn has_rules_for(&self, key: &NamespaceKey) -> bool {
        let non_empty = |m: &BTreeMap<NamespaceKey, Vec<String>>| {
            m.get(key).is_some_and(|names| !names.is_empty())
        };
        non_empty(&self.concept_names)
            || non_empty(&self.excluded_member_names)
            || non_empty(&self.excluded_member_strings)
            || self
                .excluded_axes_members
                .get(key)
                .is_some_and(|axes| axes.values().any(|members| !members.is_empty()))
    }

    /// Adds the DQC 0015 rules of one rule taxonomy
    ///
    /// `source_key` is the namespace key the rule taxonomy was configured
    /// under; member substrings are recorded under it because they are not
    /// attached to any target concept. Targets in unclassified namespaces
    /// are skipped.
    pub fn absorb_dqc_0015(
        &mut self,
        doc: &TaxonomyDocument,
        source_key: &NamespaceKey,
        catalog: &NamespaceCatalog,
    ) {
        let rules = doc.relationships(DQC_CONCEPT_RULE, Some(DQC_0015_ROLE));

        for (anchor_name, anchor) in ANCHORS {
            for head in doc.concepts_named(anchor_name) {
                if anchor == Anchor::ExcludeMemberStrings {
                    let tokens = doc
                        .references_of(head)
                        .flat_map(|r| r.parts.iter())
                        .filter(|p| p.local_name() == ALLOWABLE_SUBSTRING_PART)
                        .flat_map(|p| p.text.split_whitespace());
                    for token in tokens {
                        self.excluded_member_strings
                            .entry(source_key.clone())
                            .or_default()
                            .push(token.to_string());
                    }
                    continue;
                }

                for rel in rules.from_concept(head) {
                    let target = &rel.to;
                    let Some(key) = target.namespace().and_then(|ns| catalog.classify(ns)) else {
                        tracing::debug!(target = %target, "skipping DQC 0015 target in unclassified namespace");
                        continue;
                    };
                    let name = target.local_name().to_string();
                    match anchor {
                        Anchor::ListOfElements => {
                            self.concept_names.entry(key).or_default().push(name)
                        }
                        Anchor::ExcludeMembers => {
                            self.excluded_member_names.entry(key).or_default().push(name)
                        }
                        Anchor::ExcludeAxis => self
                            .excluded_axes_members
                            .entry(key)
                            .or_default()
                            .entry(name)
                            .or_default()
                            .push(ALL_MEMBERS.to_string()),
                        Anchor::ExcludeAxisMembers => {
                            let members = self
                                .excluded_axes_members
                                .entry(key)
                                .or_default()
                                .entry(name)
                                .or_default();
                            for member_rel in rules.from_concept(target) {
                                members.push(member_rel.to.local_name().to_string());
                            }
                        }
                        Anchor::ExcludeMemberStrings => {}
                    }
                }
            }
        }
    }
}

/// Builds the sign-warning table from the template and DQC rule taxonomies
///
/// Sources that fail to load are reported and skipped. The result is only
/// cacheable when at least one source loaded.
///
/// # Errors
///
/// Returns `ArtifactError` if the template is missing or malformed.
pub fn build_sign_warnings(
    store: &dyn ArtifactStore,
    catalog: &NamespaceCatalog,
    loader: &dyn TaxonomyLoader,
    sources: &BTreeMap<NamespaceKey, String>,
    sink: &dyn DiagnosticSink,
) -> Result<Built<SignWarningRuleSet>, ArtifactError> {
    let mut rules: SignWarningRuleSet = read_json(store, SIGNWARNINGS_TEMPLATE_FILE)?;
    let mut loaded = 0usize;

    for (key, locator) in sources {
        sink.info(&format!("loading {} DQC rules {}", key, locator));
        let Some(doc) = loader.load(locator, sink) else {
            sink.error(
                NOT_LOADED,
                &format!("{} documentation not loaded", key),
                &[("name", key.to_string())],
            );
            continue;
        };
        rules.absorb_dqc_0015(&doc, key, catalog);
        loaded += 1;
    }

    Ok(Built {
        artifact: rules,
        cacheable: loaded > 0,
    })
}

/// Returns the cached sign-warning table, building it on first use
pub fn load_sign_warnings(
    store: &dyn ArtifactStore,
    catalog: &NamespaceCatalog,
    loader: &dyn TaxonomyLoader,
    sources: &BTreeMap<NamespaceKey, String>,
    sink: &dyn DiagnosticSink,
) -> Result<SignWarningRuleSet, ArtifactError> {
    load_or_build(store, SIGNWARNINGS_FILE, Layout::Indented, || {
        build_sign_warnings(store, catalog, loader, sources, sink)
    })
}
