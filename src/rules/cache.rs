#![forbid(unsafe_code)]

//! Per-run rule cache
//!
//! A [`RuleCache`] owns the collaborators of one validation run and
//! memoizes every table it hands out, so each artifact is read or built at
//! most once per run.

use crate::config::Config;
use crate::diagnostics::DiagnosticSink;
use crate::error::{ConfigError, EfmError};
use crate::namespace::NamespaceCatalog;
use crate::rules::custom_axes::CustomAxisPatterns;
use crate::rules::dei::{DeiValidationCatalog, load_dei_catalog};
use crate::rules::deprecated::{
    DeprecatedConceptDates, build_all_deprecated_dates, load_deprecated_dates,
    qualify_deprecated_dates,
};
use crate::rules::non_negative::NonNegativeFacts;
use crate::rules::other_standard::OtherStandardTaxonomies;
use crate::rules::signwarnings::{SignWarningRuleSet, load_sign_warnings};
use crate::store::{ArtifactStore, FsArtifactStore};
use crate::taxonomy::{Filing, JsonTaxonomyLoader, TaxonomyLoader, distinct_namespaces};
use crate::types::{DocumentMode, NamespaceKey, QName};
use std::collections::{BTreeSet, HashMap, HashSet};

/// Rule tables of one validation run
pub struct RuleCache<'a> {
    config: Config,
    catalog: NamespaceCatalog,
    store: Box<dyn ArtifactStore + 'a>,
    loader: Box<dyn TaxonomyLoader + 'a>,
    sink: &'a dyn DiagnosticSink,
    sign_warnings: Option<SignWarningRuleSet>,
    deprecated: HashMap<NamespaceKey, DeprecatedConceptDates>,
    custom_axes: Option<CustomAxisPatterns>,
    dei_catalogs: HashMap<(DocumentMode, Option<String>), DeiValidationCatalog>,
    other_standard: Option<OtherStandardTaxonomies>,
}

impl<'a> RuleCache<'a> {
    /// Creates a cache over the configured resources directory and taxonomy
    /// base directory
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the namespace catalog does not
    /// compile or no resources directory is configured.
    pub fn new(config: Config, sink: &'a dyn DiagnosticSink) -> Result<Self, ConfigError> {
        let store = FsArtifactStore::resolve(&config.resources.dirs).ok_or_else(|| {
            ConfigError::Validation("No resources directory configured".to_string())
        })?;
        tracing::debug!(dir = %store.dir().display(), "using resources directory");
        let loader = JsonTaxonomyLoader::new(config.taxonomies.base_dir.clone());
        Self::with_parts(config, Box::new(store), Box::new(loader), sink)
    }

    /// Creates a cache over explicit collaborators
    pub fn with_parts(
        config: Config,
        store: Box<dyn ArtifactStore + 'a>,
        loader: Box<dyn TaxonomyLoader + 'a>,
        sink: &'a dyn DiagnosticSink,
    ) -> Result<Self, ConfigError> {
        let catalog = config.namespace_catalog()?;
        Ok(RuleCache {
            config,
            catalog,
            store,
            loader,
            sink,
            sign_warnings: None,
            deprecated: HashMap::new(),
            custom_axes: None,
            dei_catalogs: HashMap::new(),
            other_standard: None,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &NamespaceCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &dyn ArtifactStore {
        self.store.as_ref()
    }

    fn take_sign_warnings(&mut self) -> Result<SignWarningRuleSet, EfmError> {
        match self.sign_warnings.take() {
            Some(rules) => Ok(rules),
            None => Ok(load_sign_warnings(
                self.store.as_ref(),
                &self.catalog,
                self.loader.as_ref(),
                &self.config.dqc_rules,
                self.sink,
            )?),
        }
    }

    /// The sign-warning table, building and caching it on first use
    pub fn sign_warnings(&mut self) -> Result<&SignWarningRuleSet, EfmError> {
        let rules = self.take_sign_warnings()?;
        Ok(self.sign_warnings.insert(rules))
    }

    /// Sign-warning lookups qualified for `filing`
    pub fn non_negative_facts(&mut self, filing: &dyn Filing) -> Result<NonNegativeFacts, EfmError> {
        let rules = self.take_sign_warnings()?;
        let facts = NonNegativeFacts::resolve(filing, &rules, &self.catalog);
        self.sign_warnings = Some(rules);
        Ok(facts?)
    }

    /// Deprecation table of a family, or None if the family has no
    /// configured deprecation source
    pub fn deprecated_dates(
        &mut self,
        key: &NamespaceKey,
    ) -> Result<Option<&DeprecatedConceptDates>, EfmError> {
        let wild = key.to_wild();
        let Some(source) = self.config.deprecations.get(&wild) else {
            return Ok(None);
        };
        if !self.deprecated.contains_key(&wild) {
            let dates = load_deprecated_dates(
                self.store.as_ref(),
                self.loader.as_ref(),
                &wild,
                source,
                self.sink,
            )?;
            self.deprecated.insert(wild.clone(), dates);
        }
        Ok(self.deprecated.get(&wild))
    }

    /// Deprecation dates of every standard namespace in `filing`, qualified
    /// with the document's namespace
    pub fn filing_deprecated_dates(
        &mut self,
        filing: &dyn Filing,
    ) -> Result<HashMap<QName, String>, EfmError> {
        let mut out = HashMap::new();
        for ns in distinct_namespaces(filing) {
            let Some(key) = self.catalog.classify_wild(ns) else {
                continue;
            };
            if let Some(dates) = self.deprecated_dates(&key)? {
                qualify_deprecated_dates(ns, dates, &mut out);
            }
        }
        Ok(out)
    }

    /// Builds every configured deprecation table not flagged `static_file`
    ///
    /// Returns the processed keys; their tables are memoized.
    pub fn build_deprecated_tables(&mut self) -> Result<Vec<NamespaceKey>, EfmError> {
        let built = build_all_deprecated_dates(
            self.store.as_ref(),
            self.loader.as_ref(),
            &self.config.deprecations,
            self.sink,
        )?;
        let mut keys = Vec::with_capacity(built.len());
        for (key, dates) in built {
            keys.push(key.clone());
            self.deprecated.insert(key, dates);
        }
        Ok(keys)
    }

    /// Compiled custom-axis patterns
    pub fn custom_axes(&mut self) -> Result<&CustomAxisPatterns, EfmError> {
        let patterns = match self.custom_axes.take() {
            Some(patterns) => patterns,
            None => CustomAxisPatterns::load(self.store.as_ref())?,
        };
        Ok(self.custom_axes.insert(patterns))
    }

    /// DEI validation catalog compiled for `mode` against `filing`
    ///
    /// Catalogs are memoized by mode and the filing's DEI namespace.
    pub fn dei_catalog(
        &mut self,
        mode: DocumentMode,
        filing: &dyn Filing,
    ) -> Result<&DeiValidationCatalog, EfmError> {
        let prefix = self.config.namespaces.dei_prefix.as_str();
        let dei_namespace = filing
            .document_namespaces()
            .into_iter()
            .find(|ns| ns.starts_with(prefix))
            .map(str::to_string);
        let memo_key = (mode, dei_namespace);
        if !self.dei_catalogs.contains_key(&memo_key) {
            let catalog = load_dei_catalog(self.store.as_ref(), mode, filing, prefix, self.sink)?;
            self.dei_catalogs.insert(memo_key.clone(), catalog);
        }
        Ok(&self.dei_catalogs[&memo_key])
    }

    /// Namespaces of other standard taxonomies used by `filing`
    pub fn other_standard_namespaces(
        &mut self,
        filing: &dyn Filing,
        standard_namespaces: &HashSet<String>,
    ) -> Result<BTreeSet<String>, EfmError> {
        let others = match self.other_standard.take() {
            Some(others) => others,
            None => OtherStandardTaxonomies::load(self.store.as_ref())?,
        };
        Ok(self
            .other_standard
            .insert(others)
            .namespaces_in(filing, standard_namespaces))
    }
}
