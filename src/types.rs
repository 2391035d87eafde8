#![forbid(unsafe_code)]

//! Core domain types for efm-rules
//!
//! This module defines the fundamental types shared by the rule tables:
//! namespace keys, qualified names and the document mode a catalog is
//! compiled for.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An abbreviated namespace key: `family/version` or `family/*`
///
/// Keys join every rule table to the namespaces of a filing's documents.
/// The family must be non-empty and neither part may contain `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NamespaceKey(String);

/// Version component used by wildcard keys
pub const WILD_VERSION: &str = "*";

impl NamespaceKey {
    /// Creates a key from its family and version parts
    ///
    /// Returns None if either part is empty or contains `/`.
    pub fn new(family: &str, version: &str) -> Option<Self> {
        if family.is_empty() || version.is_empty() || family.contains('/') || version.contains('/')
        {
            return None;
        }
        Some(NamespaceKey(format!("{}/{}", family, version)))
    }

    /// Creates the wildcard key `family/*`
    pub fn wild(family: &str) -> Option<Self> {
        Self::new(family, WILD_VERSION)
    }

    /// Parses a `family/version` string
    pub fn parse(key: &str) -> Option<Self> {
        let (family, version) = key.split_once('/')?;
        Self::new(family, version)
    }

    /// Returns the family part (`us-gaap` in `us-gaap/2021`)
    pub fn family(&self) -> &str {
        self.0.split_once('/').map(|(f, _)| f).unwrap_or(&self.0)
    }

    /// Returns the version part (`2021` in `us-gaap/2021`)
    pub fn version(&self) -> &str {
        self.0.split_once('/').map(|(_, v)| v).unwrap_or("")
    }

    /// True for `family/*` keys
    pub fn is_wild(&self) -> bool {
        self.version() == WILD_VERSION
    }

    /// The wildcard key of the same family
    pub fn to_wild(&self) -> NamespaceKey {
        NamespaceKey(format!("{}/{}", self.family(), WILD_VERSION))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NamespaceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for NamespaceKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        NamespaceKey::parse(&value).ok_or_else(|| format!("Invalid namespace key: {}", value))
    }
}

impl From<NamespaceKey> for String {
    fn from(key: NamespaceKey) -> Self {
        key.0
    }
}

/// A namespace-qualified concept name
///
/// Serialized in Clark notation: `{namespace}localName`. A name without a
/// namespace serializes as the bare local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QName {
    namespace: Option<String>,
    local_name: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        QName {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// A name in no namespace
    pub fn unqualified(local_name: impl Into<String>) -> Self {
        QName {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Parses Clark notation (`{ns}local`) or a bare local name
    pub fn parse_clark(s: &str) -> Option<Self> {
        if let Some(rest) = s.strip_prefix('{') {
            let (ns, local) = rest.split_once('}')?;
            if local.is_empty() {
                return None;
            }
            Some(QName::new(ns, local))
        } else if s.is_empty() || s.contains('}') {
            None
        } else {
            Some(QName::unqualified(s))
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

impl TryFrom<String> for QName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QName::parse_clark(&value).ok_or_else(|| format!("Invalid qualified name: {}", value))
    }
}

impl From<QName> for String {
    fn from(qname: QName) -> Self {
        qname.to_string()
    }
}

/// Whether a filing is inline XBRL or a traditional instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentMode {
    Inline,
    NonInline,
}

impl DocumentMode {
    pub fn from_inline(is_inline: bool) -> Self {
        if is_inline {
            DocumentMode::Inline
        } else {
            DocumentMode::NonInline
        }
    }
}

/// The `source` field of a form-element-validation row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Source {
    Inline,
    NonInline,
    Both,
}

impl Source {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "inline" => Some(Source::Inline),
            "non-inline" => Some(Source::NonInline),
            "both" => Some(Source::Both),
            _ => None,
        }
    }

    /// True if rows with this source apply to documents of `mode`
    pub fn applies_to(self, mode: DocumentMode) -> bool {
        matches!(
            (self, mode),
            (Source::Both, _)
                | (Source::Inline, DocumentMode::Inline)
                | (Source::NonInline, DocumentMode::NonInline)
        )
    }
}
