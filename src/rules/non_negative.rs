#![forbid(unsafe_code)]

//! Non-negative fact lookup for one filing
//!
//! Selects, per document namespace, the most specific sign-warning entry
//! (exact `family/version` before `family/*`) and qualifies its names with
//! that namespace.

use crate::error::RuleError;
use crate::namespace::NamespaceCatalog;
use crate::rules::signwarnings::{ALL_MEMBERS, SignWarningRuleSet};
use crate::taxonomy::{Filing, distinct_namespaces};
use crate::types::{NamespaceKey, QName};
use regex::{Regex, RegexBuilder};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A member excluded on an axis
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExcludedMember {
    /// Every member of the axis
    All,
    Member(QName),
}

/// Qualified sign-warning lookups for a filing
#[derive(Debug, Clone, Default)]
pub struct NonNegativeFacts {
    pub concepts: HashSet<QName>,
    pub excluded_members: HashSet<QName>,
    /// Case-insensitive alternation of excluded member substrings, or None
    /// when no substrings apply to the filing
    pub excluded_member_names_pattern: Option<Regex>,
    pub excluded_axes_members: HashMap<QName, HashSet<ExcludedMember>>,
}

impl NonNegativeFacts {
    /// Resolves the rule set against the namespaces of a filing
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidRegex` if the member substrings do not
    /// compile as one alternation.
    pub fn resolve(
        filing: &dyn Filing,
        rules: &SignWarningRuleSet,
        catalog: &NamespaceCatalog,
    ) -> Result<Self, RuleError> {
        let mut facts = NonNegativeFacts::default();
        let mut member_strings: BTreeSet<&str> = BTreeSet::new();

        for ns in distinct_namespaces(filing) {
            let candidates = [catalog.classify(ns), catalog.classify_wild(ns)];
            let Some(key) = candidates
                .iter()
                .flatten()
                .find(|key| rules.has_rules_for(key))
            else {
                continue;
            };
            tracing::debug!(namespace = ns, key = %key, "sign-warning rules selected");
            facts.absorb(ns, key, rules, &mut member_strings);
        }

        if !member_strings.is_empty() {
            let alternation = member_strings.into_iter().collect::<Vec<_>>().join("|");
            let pattern = RegexBuilder::new(&alternation)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    RuleError::InvalidRegex(format!(
                        "Failed to compile excluded member substrings: {}",
                        e
                    ))
                })?;
            facts.excluded_member_names_pattern = Some(pattern);
        }

        Ok(facts)
    }

    fn absorb<'r>(
        &mut self,
        ns: &str,
        key: &NamespaceKey,
        rules: &'r SignWarningRuleSet,
        member_strings: &mut BTreeSet<&'r str>,
    ) {
        if let Some(names) = rules.concept_names.get(key) {
            self.concepts
                .extend(names.iter().map(|name| QName::new(ns, name.as_str())));
        }
        if let Some(names) = rules.excluded_member_names.get(key) {
            self.excluded_members
                .extend(names.iter().map(|name| QName::new(ns, name.as_str())));
        }
        if let Some(strings) = rules.excluded_member_strings.get(key) {
            member_strings.extend(strings.iter().map(String::as_str));
        }
        if let Some(axes) = rules.excluded_axes_members.get(key) {
            for (axis, members) in axes {
                if members.is_empty() {
                    continue;
                }
                let excluded = self
                    .excluded_axes_members
                    .entry(QName::new(ns, axis.as_str()))
                    .or_default();
                for member in members {
                    excluded.insert(if member == ALL_MEMBERS {
                        ExcludedMember::All
                    } else {
                        ExcludedMember::Member(QName::new(ns, member.as_str()))
                    });
                }
            }
        }
    }

    pub fn is_non_negative(&self, concept: &QName) -> bool {
        self.concepts.contains(concept)
    }

    /// True if a negative value is allowed under `member` of `axis`
    pub fn is_excluded(&self, axis: &QName, member: &QName) -> bool {
        if self.excluded_members.contains(member) {
            return true;
        }
        if let Some(pattern) = &self.excluded_member_names_pattern
            && pattern.is_match(member.local_name())
        {
            return true;
        }
        self.excluded_axes_members.get(axis).is_some_and(|members| {
            members.contains(&ExcludedMember::All)
                || members.contains(&ExcludedMember::Member(member.clone()))
        })
    }
}
