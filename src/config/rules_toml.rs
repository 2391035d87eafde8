//! Parsing and validation for efm-rules.toml configuration files

use crate::error::ConfigError;
use crate::namespace::NamespaceCatalog;
use crate::types::NamespaceKey;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default name of the configuration file
pub const CONFIG_FILE: &str = "efm-rules.toml";

/// Main configuration struct for efm-rules.toml
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where rule artifacts live
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// How taxonomy locators resolve
    #[serde(default)]
    pub taxonomies: TaxonomiesConfig,

    /// Namespace classification
    #[serde(default)]
    pub namespaces: NamespacesConfig,

    /// DQC rule taxonomies contributing sign-warning rules, by namespace key
    #[serde(default)]
    pub dqc_rules: BTreeMap<NamespaceKey, String>,

    /// Deprecated-concept label sources, by wildcard namespace key
    #[serde(default)]
    pub deprecations: BTreeMap<NamespaceKey, DeprecationSource>,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the namespace catalog, honoring any configured override
    pub fn namespace_catalog(&self) -> Result<NamespaceCatalog, ConfigError> {
        match &self.namespaces.patterns {
            Some(patterns) => NamespaceCatalog::new(patterns.as_slice())
                .map_err(|e| ConfigError::Validation(e.to_string())),
            None => Ok(NamespaceCatalog::standard()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        if self.resources.dirs.is_empty() {
            return Err(ConfigError::Validation(
                "At least one resources directory must be configured".to_string(),
            ));
        }

        self.namespace_catalog()?;

        if self.namespaces.dei_prefix.is_empty() {
            return Err(ConfigError::Validation(
                "namespaces.dei_prefix must not be empty".to_string(),
            ));
        }

        for (key, source) in &self.deprecations {
            if !key.is_wild() {
                return Err(ConfigError::Validation(format!(
                    "Deprecation source '{}' must use a wildcard key like '{}'",
                    key,
                    key.to_wild()
                )));
            }
            let pattern = source.compile_date_pattern().map_err(|e| {
                ConfigError::Validation(format!(
                    "Invalid date_pattern for '{}': {}",
                    key, e
                ))
            })?;
            if pattern.captures_len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "date_pattern for '{}' must capture the date in group 1",
                    key
                )));
            }
            if source.labels.is_empty() && !source.static_file {
                return Err(ConfigError::Validation(format!(
                    "Deprecation source '{}' lists no label documents",
                    key
                )));
            }
        }

        Ok(())
    }
}

/// Resources section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcesConfig {
    /// Candidate artifact directories; the first existing one wins
    #[serde(default = "default_resource_dirs")]
    pub dirs: Vec<PathBuf>,
}

fn default_resource_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("resources")]
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        ResourcesConfig {
            dirs: default_resource_dirs(),
        }
    }
}

/// Taxonomies section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxonomiesConfig {
    /// Base directory for relative taxonomy locators
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for TaxonomiesConfig {
    fn default() -> Self {
        TaxonomiesConfig {
            base_dir: default_base_dir(),
        }
    }
}

/// Namespaces section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamespacesConfig {
    /// Override for the standard namespace patterns
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,

    /// Prefix identifying the DEI taxonomy namespace of a filing
    #[serde(default = "default_dei_prefix")]
    pub dei_prefix: String,
}

fn default_dei_prefix() -> String {
    "http://xbrl.sec.gov/dei/".to_string()
}

impl Default for NamespacesConfig {
    fn default() -> Self {
        NamespacesConfig {
            patterns: None,
            dei_prefix: default_dei_prefix(),
        }
    }
}

/// Where and how to read deprecation dates for one taxonomy family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeprecationSource {
    /// Label role carrying the deprecation text
    pub label_role: String,

    /// Pattern applied at the start of the label text; group 1 is the date
    pub date_pattern: String,

    /// Label documents to scan
    #[serde(default)]
    pub labels: Vec<String>,

    /// Use the shipped table as-is; batch builds never regenerate it
    #[serde(default)]
    pub static_file: bool,
}

impl DeprecationSource {
    /// Compiles `date_pattern`, anchored at the start of the text
    pub fn compile_date_pattern(&self) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{})", self.date_pattern))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[resources]
dirs = ["resources", "/tmp/cache/resources/validation/EFM"]

[taxonomies]
base_dir = "taxonomies"

[namespaces]
dei_prefix = "http://xbrl.sec.gov/dei/"

[dqc_rules]
"us-gaap/2021" = "dqcrules-2021.json"

[deprecations."us-gaap/*"]
label_role = "http://www.xbrl.org/2009/role/deprecatedDateLabel"
date_pattern = 'Element Deprecated: ([0-9]{4}-[0-9]{2}-[0-9]{2})'
labels = ["us-gaap-doc-2021.json"]

[deprecations."invest/*"]
label_role = "http://www.xbrl.org/2009/role/deprecatedDateLabel"
date_pattern = '([0-9-]+)'
static_file = true
"#;

    #[test]
    fn test_parse_full() {
        let config = Config::parse(FULL).unwrap();
        assert_eq!(config.resources.dirs.len(), 2);
        assert_eq!(config.taxonomies.base_dir, PathBuf::from("taxonomies"));
        let key = NamespaceKey::parse("us-gaap/2021").unwrap();
        assert_eq!(config.dqc_rules[&key], "dqcrules-2021.json");
        let invest = NamespaceKey::parse("invest/*").unwrap();
        assert!(config.deprecations[&invest].static_file);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.resources.dirs, vec![PathBuf::from("resources")]);
        assert_eq!(config.namespaces.dei_prefix, "http://xbrl.sec.gov/dei/");
        assert!(config.dqc_rules.is_empty());
        assert!(config.namespace_catalog().is_ok());
    }

    #[test]
    fn test_invalid_namespace_key() {
        let result = Config::parse("[dqc_rules]\n\"us-gaap\" = \"x.json\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_deprecation_key_must_be_wild() {
        let toml = r#"
[deprecations."us-gaap/2021"]
label_role = "r"
date_pattern = '(\d+)'
labels = ["a.json"]
"#;
        let err = Config::parse(toml).unwrap_err().to_string();
        assert!(err.contains("wildcard key"));
    }

    #[test]
    fn test_date_pattern_needs_group() {
        let toml = r#"
[deprecations."us-gaap/*"]
label_role = "r"
date_pattern = 'Deprecated'
labels = ["a.json"]
"#;
        let err = Config::parse(toml).unwrap_err().to_string();
        assert!(err.contains("group 1"));
    }

    #[test]
    fn test_invalid_date_pattern() {
        let toml = r#"
[deprecations."us-gaap/*"]
label_role = "r"
date_pattern = '(unclosed'
labels = ["a.json"]
"#;
        assert!(matches!(Config::parse(toml), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_namespace_pattern_override() {
        let toml = r#"
[namespaces]
patterns = ['^http://example\.com/(?P<family>[a-z]+)/(?P<version>\d{4})$']
"#;
        let config = Config::parse(toml).unwrap();
        let catalog = config.namespace_catalog().unwrap();
        assert_eq!(
            catalog.classify("http://example.com/abc/2020").unwrap().as_str(),
            "abc/2020"
        );
        assert!(catalog.classify("http://fasb.org/us-gaap/2021-01-31").is_none());

        let bad = "[namespaces]\npatterns = ['^http://example\\.com$']\n";
        assert!(matches!(Config::parse(bad), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_empty_resource_dirs_rejected() {
        let err = Config::parse("[resources]\ndirs = []\n").unwrap_err();
        assert!(err.to_string().contains("resources directory"));
    }

    #[test]
    fn test_anchored_date_pattern() {
        let source = DeprecationSource {
            label_role: "r".to_string(),
            date_pattern: r"Deprecated ([0-9-]+)".to_string(),
            labels: vec![],
            static_file: false,
        };
        let re = source.compile_date_pattern().unwrap();
        assert!(re.captures("Deprecated 2020-01-31").is_some());
        assert!(re.captures("Not Deprecated 2020-01-31").is_none());
    }
}
