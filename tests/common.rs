//! Test utilities for efm-rules integration tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Result type alias for tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Extract Ok value or panic with context
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("assertion failed: expected Ok, got Err({:?})", e),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("{}: {:?}", $msg, e),
        }
    };
}

/// Extract Some value or panic with context
#[macro_export]
macro_rules! assert_some {
    ($expr:expr) => {
        match $expr {
            Some(v) => v,
            None => panic!("assertion failed: expected Some, got None"),
        }
    };
    ($expr:expr, $msg:literal) => {
        match $expr {
            Some(v) => v,
            None => panic!("{}: got None", $msg),
        }
    };
}

pub const GAAP: &str = "http://fasb.org/us-gaap/2021-01-31";
pub const SRT: &str = "http://fasb.org/srt/2021-01-31";
pub const DEI: &str = "http://xbrl.sec.gov/dei/2021";
pub const DQC: &str = "http://fasb.org/us-gaap/2021/dqcrules";

pub const DQC_ARCROLE: &str = "http://fasb.org/dqcrules/arcrole/concept-rule";
pub const DQC_ROLE: &str = "http://fasb.org/us-gaap/role/dqc/0015";
pub const DEPRECATED_ROLE: &str = "http://www.xbrl.org/2009/role/deprecatedDateLabel";

/// A temporary project: `efm-rules.toml`, `resources/` and `taxonomies/`
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("resources")).unwrap();
        fs::create_dir_all(dir.path().join("taxonomies")).unwrap();
        Workspace { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn resources(&self) -> PathBuf {
        self.root().join("resources")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root().join("efm-rules.toml")
    }

    /// Writes `efm-rules.toml` with absolute resource and taxonomy paths,
    /// followed by `extra`
    pub fn write_config(&self, extra: &str) {
        let config = format!(
            "[resources]\ndirs = ['{}']\n\n[taxonomies]\nbase_dir = '{}'\n\n{}",
            self.resources().display(),
            self.root().join("taxonomies").display(),
            extra
        );
        fs::write(self.config_path(), config).unwrap();
    }

    pub fn write_resource(&self, name: &str, text: &str) {
        fs::write(self.resources().join(name), text).unwrap();
    }

    pub fn read_resource(&self, name: &str) -> Option<String> {
        fs::read_to_string(self.resources().join(name)).ok()
    }

    pub fn write_taxonomy(&self, name: &str, text: &str) {
        fs::write(self.root().join("taxonomies").join(name), text).unwrap();
    }

    pub fn write_file(&self, name: &str, text: &str) -> PathBuf {
        let path = self.root().join(name);
        fs::write(&path, text).unwrap();
        path
    }
}

/// A DQC rule taxonomy with one rule of each DQC 0015 category
pub fn dqc_rule_document() -> String {
    let rel = |from: &str, to: &str| {
        format!(
            r#"{{"arcrole": "{}", "linkrole": "{}", "from": "{}", "to": "{}"}}"#,
            DQC_ARCROLE, DQC_ROLE, from, to
        )
    };
    let dqc = |name: &str| format!("{{{}}}{}", DQC, name);
    let gaap = |name: &str| format!("{{{}}}{}", GAAP, name);
    let srt = |name: &str| format!("{{{}}}{}", SRT, name);

    let relationships = [
        rel(&dqc("Dqc_0015_ListOfElements"), &gaap("Revenues")),
        rel(&dqc("Dqc_0015_ListOfElements"), &gaap("Assets")),
        rel(&dqc("Dqc_0015_ExcludeNonNegMembersAbstract"), &gaap("EliminationsMember")),
        rel(&dqc("Dqc_0015_ExcludeNonNegAxisAbstract"), &srt("ConsolidationItemsAxis")),
        rel(&dqc("Dqc_0015_ExcludeNonNegAxisMembersAbstract"), &gaap("StatementBusinessSegmentsAxis")),
        rel(&gaap("StatementBusinessSegmentsAxis"), &gaap("CorporateNonSegmentMember")),
    ];
    format!(
        r#"{{
  "targetNamespace": "{dqc_ns}",
  "concepts": [
    "{a}", "{b}", "{c}", "{d}", "{e}"
  ],
  "relationships": [{rels}],
  "references": [
    {{"concept": "{e}", "parts": [{{"name": "ref:allowableSubString", "text": "Elimination Adjustment"}}]}}
  ]
}}"#,
        dqc_ns = DQC,
        a = dqc("Dqc_0015_ListOfElements"),
        b = dqc("Dqc_0015_ExcludeNonNegMembersAbstract"),
        c = dqc("Dqc_0015_ExcludeNonNegAxisAbstract"),
        d = dqc("Dqc_0015_ExcludeNonNegAxisMembersAbstract"),
        e = dqc("Dqc_0015_ExcludeNonNegMemberStringsAbstract"),
        rels = relationships.join(",\n    "),
    )
}

/// A label document with deprecated-date labels in the us-gaap namespace
pub fn deprecated_label_document() -> String {
    format!(
        r#"{{
  "labels": [
    {{"concept": "{{{gaap}}}OldConcept", "role": "{role}", "text": "Element Deprecated: 2019-01-31"}},
    {{"concept": "{{{gaap}}}OlderConcept", "role": "{role}", "text": "Element Deprecated: 2018-01-31"}},
    {{"concept": "{{{gaap}}}Revenues", "role": "http://www.xbrl.org/2003/role/label", "text": "Revenues"}}
  ]
}}"#,
        gaap = GAAP,
        role = DEPRECATED_ROLE
    )
}

/// Configuration registering one DQC rule source and a us-gaap deprecation
/// source
pub fn full_config_extra() -> String {
    format!(
        r#"[dqc_rules]
"us-gaap/2021" = "dqc-us-gaap-2021.json"

[deprecations."us-gaap/*"]
label_role = "{}"
date_pattern = 'Element Deprecated: ([0-9]{{4}}-[0-9]{{2}}-[0-9]{{2}})?'
labels = ["us-gaap-2021-doc.json"]
"#,
        DEPRECATED_ROLE
    )
}

/// Filing snapshot using us-gaap, srt and dei
pub fn filing_snapshot() -> String {
    format!(
        r#"{{
  "documents": [
    {{"uri": "us-gaap-2021.xsd", "targetNamespace": "{gaap}"}},
    {{"uri": "srt-2021.xsd", "targetNamespace": "{srt}"}},
    {{"uri": "dei-2021.xsd", "targetNamespace": "{dei}"}},
    {{"uri": "abc-20211231.xsd", "targetNamespace": "http://abc.com/20211231"}}
  ],
  "concepts": [
    "{{{dei}}}DocumentType",
    "{{{dei}}}EntityRegistrantName",
    "{{{gaap}}}Revenues"
  ]
}}"#,
        gaap = GAAP,
        srt = SRT,
        dei = DEI
    )
}

/// A small, consistent DEI validation catalog
pub const DEI_CATALOG: &str = r#"{
  "form-classes": {
    "annual": ["10-K", "20-F"],
    "periodic": ["@annual", "10-Q"]
  },
  "validations": {
    "a": {"message": "required"},
    "ru": {"message": "required"}
  },
  "axis-validations": {},
  "messages": {"required": "{dei:DocumentType} is required."},
  "form-element-validations": [
    {"xbrl-names": ["DocumentType"], "validation": "a", "efm": "6.5.20",
     "source": "both", "forms": ["*"]},
    {"xbrl-names": ["EntityRegistrantName"], "validation": "a", "efm": "6.5.21",
     "source": "inline", "forms": ["@periodic"]},
    {"xbrl-names": ["EntityFilerCategory"], "validation": "ru", "efm": "6.5.20",
     "source": "both", "forms": ["@annual"],
     "value": ["Large Accelerated Filer", "Non-accelerated Filer"]},
    {"xbrl-names": "DocumentType", "store-db-name": "documentType"}
  ]
}"#;
