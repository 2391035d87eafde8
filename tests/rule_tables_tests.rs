//! End-to-end tests of the rule tables over a real resources directory
//!
//! These tests build every table through `RuleCache` with the file-system
//! store and the JSON taxonomy loader, and verify that:
//! - Built artifacts are written once and reused byte-for-byte
//! - Soft failures are reported without aborting the build
//! - Filing-qualified lookups pick the most specific namespace key

mod common;

use common::*;
use efm_rules::config::Config;
use efm_rules::diagnostics::{CollectingSink, LOAD_DEI_VALIDATIONS, NOT_LOADED};
use efm_rules::rules::RuleCache;
use efm_rules::rules::non_negative::ExcludedMember;
use efm_rules::rules::signwarnings::{SIGNWARNINGS_FILE, SIGNWARNINGS_TEMPLATE_FILE};
use efm_rules::taxonomy::FilingSnapshot;
use efm_rules::types::{DocumentMode, NamespaceKey, QName};

fn load_config(ws: &Workspace) -> Config {
    assert_ok!(Config::load(ws.config_path()))
}

fn sign_warning_workspace() -> Workspace {
    let ws = Workspace::new();
    ws.write_config(&full_config_extra());
    ws.write_resource(
        SIGNWARNINGS_TEMPLATE_FILE,
        r#"{"conceptNames": {"dei/*": ["EntityCommonStockSharesOutstanding"]}}"#,
    );
    ws.write_taxonomy("dqc-us-gaap-2021.json", &dqc_rule_document());
    ws
}

#[test]
fn test_sign_warnings_built_from_template_and_dqc_rules() {
    let ws = sign_warning_workspace();
    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));

    let rules = assert_ok!(cache.sign_warnings()).clone();
    let gaap = assert_some!(NamespaceKey::parse("us-gaap/2021"));
    let srt = assert_some!(NamespaceKey::parse("srt/2021"));
    let dei = assert_some!(NamespaceKey::parse("dei/*"));

    assert_eq!(rules.concept_names[&gaap], vec!["Revenues", "Assets"]);
    assert_eq!(
        rules.concept_names[&dei],
        vec!["EntityCommonStockSharesOutstanding"]
    );
    assert_eq!(rules.excluded_member_names[&gaap], vec!["EliminationsMember"]);
    assert_eq!(
        rules.excluded_axes_members[&srt]["ConsolidationItemsAxis"],
        vec!["*"]
    );
    assert_eq!(
        rules.excluded_axes_members[&gaap]["StatementBusinessSegmentsAxis"],
        vec!["CorporateNonSegmentMember"]
    );
    assert_eq!(
        rules.excluded_member_strings[&gaap],
        vec!["Elimination", "Adjustment"]
    );

    assert!(!sink.has_errors(), "{:?}", sink.errors());
    assert!(
        sink.diagnostics()
            .iter()
            .any(|d| d.message == "loading us-gaap/2021 DQC rules dqc-us-gaap-2021.json")
    );
    assert!(ws.read_resource(SIGNWARNINGS_FILE).is_some());
}

#[test]
fn test_sign_warnings_cached_artifact_is_reused() {
    let ws = sign_warning_workspace();

    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));
    let first = assert_ok!(cache.sign_warnings()).clone();
    let written = assert_some!(ws.read_resource(SIGNWARNINGS_FILE));

    // a cached artifact is authoritative even if its sources disappear
    std::fs::remove_file(ws.root().join("taxonomies/dqc-us-gaap-2021.json")).unwrap();

    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));
    let second = assert_ok!(cache.sign_warnings()).clone();

    assert_eq!(first, second);
    assert!(sink.diagnostics().is_empty());
    assert_eq!(assert_some!(ws.read_resource(SIGNWARNINGS_FILE)), written);
}

#[test]
fn test_unloadable_dqc_source_is_reported_and_not_cached() {
    let ws = Workspace::new();
    ws.write_config(&full_config_extra());
    ws.write_resource(
        SIGNWARNINGS_TEMPLATE_FILE,
        r#"{"conceptNames": {"us-gaap/*": ["Revenues"]}}"#,
    );

    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));
    let rules = assert_ok!(cache.sign_warnings());

    assert_eq!(rules.concept_names.len(), 1);
    assert!(sink.error_count(NOT_LOADED) >= 1);
    assert!(
        sink.errors()
            .iter()
            .any(|d| d.message == "us-gaap/2021 documentation not loaded")
    );
    assert!(ws.read_resource(SIGNWARNINGS_FILE).is_none());
}

#[test]
fn test_non_negative_facts_for_filing() {
    let ws = sign_warning_workspace();
    let filing: FilingSnapshot = serde_json::from_str(&filing_snapshot()).unwrap();
    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));

    let facts = assert_ok!(cache.non_negative_facts(&filing));
    assert!(facts.is_non_negative(&QName::new(GAAP, "Revenues")));
    assert!(facts.is_non_negative(&QName::new(DEI, "EntityCommonStockSharesOutstanding")));
    assert!(!facts.is_non_negative(&QName::new(SRT, "Revenues")));

    let axis = QName::new(SRT, "ConsolidationItemsAxis");
    assert!(facts.excluded_axes_members[&axis].contains(&ExcludedMember::All));
    assert!(facts.is_excluded(&axis, &QName::new(GAAP, "AnyMember")));

    let pattern = assert_some!(facts.excluded_member_names_pattern.as_ref());
    assert!(pattern.is_match("IntercompanyEliminationMember"));
    assert!(pattern.is_match("ADJUSTMENTSMember"));
    assert!(!pattern.is_match("ProductMember"));
}

#[test]
fn test_deprecation_tables_built_and_qualified() {
    let ws = Workspace::new();
    ws.write_config(&full_config_extra());
    ws.write_taxonomy("us-gaap-2021-doc.json", &deprecated_label_document());
    let filing: FilingSnapshot = serde_json::from_str(&filing_snapshot()).unwrap();

    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));
    let keys = assert_ok!(cache.build_deprecated_tables());
    assert_eq!(keys, vec![assert_some!(NamespaceKey::parse("us-gaap/*"))]);

    let text = assert_some!(ws.read_resource("us-gaap-deprecated-concepts.json"));
    assert_eq!(
        text,
        "{\n\"OldConcept\": \"2019-01-31\",\n\"OlderConcept\": \"2018-01-31\"\n}\n"
    );

    let dates = assert_ok!(cache.filing_deprecated_dates(&filing));
    assert_eq!(dates.len(), 2);
    assert_eq!(dates[&QName::new(GAAP, "OldConcept")], "2019-01-31");
    assert!(!sink.has_errors());
}

#[test]
fn test_dei_catalog_against_filing() {
    let ws = Workspace::new();
    ws.write_config("");
    ws.write_resource("dei-validations.json", DEI_CATALOG);
    let filing: FilingSnapshot = serde_json::from_str(&filing_snapshot()).unwrap();

    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));

    let catalog = assert_ok!(cache.dei_catalog(DocumentMode::NonInline, &filing));
    assert_eq!(catalog.dei_namespace.as_deref(), Some(DEI));
    let active: Vec<usize> = catalog.active_rows().map(|row| row.index).collect();
    assert_eq!(active, vec![0, 2]);
    assert_eq!(catalog.rows[0].xbrl_names, vec!["DocumentType"]);
    assert!(catalog.rows[2].xbrl_names.is_empty());
    assert!(catalog.rows[2].applies_to_form("20-F"));
    assert!(!catalog.rows[2].applies_to_form("10-Q"));

    let catalog = assert_ok!(cache.dei_catalog(DocumentMode::Inline, &filing));
    let active: Vec<usize> = catalog.active_rows().map(|row| row.index).collect();
    assert_eq!(active, vec![0, 1, 2]);
    assert!(catalog.rows[1].applies_to_form("10-Q"));

    assert_eq!(sink.error_count(LOAD_DEI_VALIDATIONS), 0, "{:?}", sink.errors());
}

#[test]
fn test_dei_catalog_defects_reported_once_per_compile() {
    let ws = Workspace::new();
    ws.write_config("");
    ws.write_resource(
        "dei-validations.json",
        r#"{
          "form-classes": {"a": ["@b"], "b": ["@a"]},
          "validations": {},
          "axis-validations": {},
          "messages": {},
          "form-element-validations": [
            {"xbrl-names": "DocumentType", "validation": "zz", "efm": "6.5.20",
             "source": "sideways", "forms": ["10-K"]}
          ]
        }"#,
    );
    let filing: FilingSnapshot = serde_json::from_str(&filing_snapshot()).unwrap();

    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));
    assert_ok!(cache.dei_catalog(DocumentMode::NonInline, &filing));
    let first = sink.error_count(LOAD_DEI_VALIDATIONS);
    assert!(first >= 3, "{:?}", sink.errors());
    assert!(
        sink.errors()
            .iter()
            .any(|d| d.message == "Missing validation[\"zz\"].")
    );
    assert!(
        sink.errors()
            .iter()
            .any(|d| d.message == "Invalid source [\"sideways\"].")
    );

    // memoized: the same mode and DEI namespace compile once
    assert_ok!(cache.dei_catalog(DocumentMode::NonInline, &filing));
    assert_eq!(sink.error_count(LOAD_DEI_VALIDATIONS), first);
}

#[test]
fn test_custom_axis_resolution() {
    let ws = Workspace::new();
    ws.write_config("");
    ws.write_resource(
        "axiswarnings.json",
        r##"{
          "#": "patterns of custom axes",
          "LegalEntityAxis": "(Entity|Company).*Axis",
          "StatementBusinessSegmentsAxis": ".*Segment.*Axis"
        }"##,
    );

    let sink = CollectingSink::new();
    let mut cache = assert_ok!(RuleCache::new(load_config(&ws), &sink));
    let patterns = assert_ok!(cache.custom_axes());
    assert_eq!(patterns.len(), 2);
    assert_eq!(patterns.resolve("CompanyNameAxis"), Some("LegalEntityAxis"));
    assert_eq!(
        patterns.resolve("OperatingSegmentsAxis"),
        Some("StatementBusinessSegmentsAxis")
    );
    assert_eq!(patterns.resolve("ProductAxis"), None);
}
