#![forbid(unsafe_code)]

//! Namespace classification
//!
//! Maps a taxonomy namespace URI onto a [`NamespaceKey`] by matching it
//! against an ordered catalog of recognized standard-taxonomy patterns.
//! Every pattern must define the named groups `family` and `version`.

use crate::error::RuleError;
use crate::types::NamespaceKey;
use regex::Regex;

/// SEC, FASB and xbrl.us taxonomy families
pub const SEC_NAMESPACE_PATTERN: &str = concat!(
    r"^https?://(?:xbrl\.us|fasb\.org|xbrl\.sec\.gov)/",
    r"(?P<family>dei|us-gaap|srt|us-types|us-roles|srt-types|srt-roles|rr|rr-roles|",
    r"country|currency|exch|invest|naics|sic|stpr|ecd|cyd|ffd|sro|spac|cef|vip|oef|rxp|snj|fnd)",
    r"/(?P<version>[0-9]{4})(?:-[0-9]{2}-[0-9]{2})?$"
);

/// IFRS Foundation taxonomies (`ifrs-full`, `ifrs-smes`, ...)
pub const IFRS_NAMESPACE_PATTERN: &str =
    r"^https?://xbrl\.ifrs\.org/taxonomy/(?P<version>[0-9]{4})-[0-9]{2}-[0-9]{2}/(?P<family>ifrs[\w-]*)$";

/// Families starting with this marker collapse to the literal `ifrs`
const IFRS_MARKER: &str = "ifrs";

/// Ordered catalog of standard namespace patterns; first match wins
#[derive(Debug, Clone)]
pub struct NamespaceCatalog {
    patterns: Vec<Regex>,
}

impl NamespaceCatalog {
    /// Builds a catalog from regex sources
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidRegex` if a pattern does not compile and
    /// `RuleError::InvalidDefinition` if it lacks the `family` or `version`
    /// capture group.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, RuleError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let regex = Regex::new(pattern).map_err(|e| {
                RuleError::InvalidRegex(format!(
                    "Failed to compile namespace pattern '{}': {}",
                    pattern, e
                ))
            })?;
            let names: Vec<&str> = regex.capture_names().flatten().collect();
            for required in ["family", "version"] {
                if !names.contains(&required) {
                    return Err(RuleError::InvalidDefinition(format!(
                        "Namespace pattern '{}' has no '{}' group",
                        pattern, required
                    )));
                }
            }
            compiled.push(regex);
        }
        Ok(NamespaceCatalog { patterns: compiled })
    }

    /// The catalog of SEC/FASB and IFRS standard taxonomies
    pub fn standard() -> Self {
        Self::new(&[SEC_NAMESPACE_PATTERN, IFRS_NAMESPACE_PATTERN])
            .expect("built-in namespace patterns are valid")
    }

    /// Returns `family/version` for a recognized namespace
    pub fn classify(&self, namespace_uri: &str) -> Option<NamespaceKey> {
        let (family, version) = self.match_parts(namespace_uri)?;
        NamespaceKey::new(&family, &version)
    }

    /// Returns `family/*` for a recognized namespace
    pub fn classify_wild(&self, namespace_uri: &str) -> Option<NamespaceKey> {
        let (family, _) = self.match_parts(namespace_uri)?;
        NamespaceKey::wild(&family)
    }

    /// True if the namespace belongs to a recognized standard taxonomy
    pub fn is_standard(&self, namespace_uri: &str) -> bool {
        self.match_parts(namespace_uri).is_some()
    }

    fn match_parts(&self, namespace_uri: &str) -> Option<(String, String)> {
        let caps = self
            .patterns
            .iter()
            .find_map(|p| p.captures(namespace_uri))?;
        let family = caps.name("family")?.as_str();
        let version = caps.name("version")?.as_str();
        let family = if family.starts_with(IFRS_MARKER) {
            IFRS_MARKER
        } else {
            family
        };
        Some((family.to_string(), version.to_string()))
    }
}

impl Default for NamespaceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_us_gaap() {
        let catalog = NamespaceCatalog::standard();
        let key = catalog.classify("http://fasb.org/us-gaap/2021-01-31").unwrap();
        assert_eq!(key.as_str(), "us-gaap/2021");
        let wild = catalog.classify_wild("http://fasb.org/us-gaap/2021-01-31").unwrap();
        assert_eq!(wild.as_str(), "us-gaap/*");
    }

    #[test]
    fn test_classify_dei_without_date() {
        let catalog = NamespaceCatalog::standard();
        assert_eq!(
            catalog.classify("http://xbrl.sec.gov/dei/2019").unwrap().as_str(),
            "dei/2019"
        );
        assert_eq!(
            catalog.classify("https://xbrl.sec.gov/dei/2023").unwrap().as_str(),
            "dei/2023"
        );
    }

    #[test]
    fn test_classify_and_wild_agree_on_family() {
        let catalog = NamespaceCatalog::standard();
        for ns in [
            "http://fasb.org/srt/2020-01-31",
            "http://xbrl.sec.gov/country/2017-01-31",
            "http://xbrl.us/us-types/2009-01-31",
            "http://xbrl.sec.gov/rr-roles/2012-01-31",
            "http://xbrl.ifrs.org/taxonomy/2021-03-24/ifrs-full",
        ] {
            let exact = catalog.classify(ns).unwrap();
            let wild = catalog.classify_wild(ns).unwrap();
            assert_eq!(exact.family(), wild.family(), "{}", ns);
            assert_eq!(wild.version(), "*");
            assert_ne!(exact.version(), "*");
        }
    }

    #[test]
    fn test_ifrs_variants_collapse() {
        let catalog = NamespaceCatalog::standard();
        for ns in [
            "http://xbrl.ifrs.org/taxonomy/2021-03-24/ifrs-full",
            "http://xbrl.ifrs.org/taxonomy/2021-03-24/ifrs-smes",
            "https://xbrl.ifrs.org/taxonomy/2021-03-24/ifrs",
        ] {
            let key = catalog.classify(ns).unwrap();
            assert_eq!(key.as_str(), "ifrs/2021", "{}", ns);
            assert_eq!(catalog.classify_wild(ns).unwrap().as_str(), "ifrs/*");
        }
    }

    #[test]
    fn test_unrecognized_namespaces() {
        let catalog = NamespaceCatalog::standard();
        for ns in [
            "",
            "http://www.example.com/20210630",
            "http://fasb.org/us-gaap/2021-01-31/extra",
            "http://fasb.org/us-gaap-custom/2021-01-31",
            "http://xbrl.ifrs.org/taxonomy/2021-03-24/other",
        ] {
            assert!(catalog.classify(ns).is_none(), "{}", ns);
            assert!(catalog.classify_wild(ns).is_none(), "{}", ns);
            assert!(!catalog.is_standard(ns));
        }
    }

    #[test]
    fn test_first_pattern_wins() {
        let catalog = NamespaceCatalog::new(&[
            r"^http://example\.com/(?P<family>a)/(?P<version>[0-9]+)$",
            r"^http://example\.com/(?P<family>[a-z]+)/(?P<version>[0-9]+)$",
        ])
        .unwrap();
        assert_eq!(catalog.classify("http://example.com/a/1").unwrap().as_str(), "a/1");
        assert_eq!(catalog.classify("http://example.com/b/2").unwrap().as_str(), "b/2");
    }

    #[test]
    fn test_pattern_without_groups_rejected() {
        let err = NamespaceCatalog::new(&[r"^http://example\.com/(?P<family>a)$"]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidDefinition(_)));

        let err = NamespaceCatalog::new(&["(unclosed"]).unwrap_err();
        assert!(matches!(err, RuleError::InvalidRegex(_)));
    }
}
