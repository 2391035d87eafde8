//! Configuration file parsing and validation

pub mod rules_toml;

pub use rules_toml::{
    CONFIG_FILE, Config, DeprecationSource, NamespacesConfig, ResourcesConfig, TaxonomiesConfig,
};
