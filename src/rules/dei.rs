#![forbid(unsafe_code)]

//! DEI validation catalog
//!
//! `dei-validations.json` holds five linked tables. Compiling it checks that
//! every row's references resolve, types each row as an enforcement or a
//! store-only row, and prepares the matchers the filing checks use. Defects
//! are reported through the sink under `efm:loadDeiValidations`; the catalog
//! is always returned.

use crate::diagnostics::{DiagnosticSink, LOAD_DEI_VALIDATIONS};
use crate::error::ArtifactError;
use crate::rules::form_classes::{FormClassGraph, FormList, FormSet};
use crate::store::{ArtifactStore, read_json};
use crate::taxonomy::Filing;
use crate::types::{DocumentMode, QName, Source};
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashSet};

/// Source artifact of the catalog
pub const DEI_VALIDATIONS_FILE: &str = "dei-validations.json";

/// Validation codes whose rows must carry `references`
const REFERENCE_CODES: [&str; 12] = [
    "f2", "og", "ol1", "ol2", "oph", "ar", "sr", "oth", "t", "tb", "t1", "te",
];

/// Validation codes whose `value` is a list of allowed options
const OPTION_CODES: [&str; 2] = ["ru", "ou"];

const STORE_DB_NAME: &str = "store-db-name";

/// The catalog as authored
#[derive(Debug, Clone, Deserialize)]
pub struct RawDeiCatalog {
    #[serde(rename = "form-classes")]
    pub form_classes: BTreeMap<String, FormList>,
    pub validations: BTreeMap<String, Value>,
    #[serde(rename = "axis-validations")]
    pub axis_validations: BTreeMap<String, Value>,
    pub messages: BTreeMap<String, Value>,
    #[serde(rename = "form-element-validations")]
    pub form_element_validations: Vec<Map<String, Value>>,
}

/// What a row does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// Checks a value; `validation` is None only for malformed rows
    Enforcement {
        validation: Option<String>,
        efm: Option<String>,
        severity: Option<String>,
    },
    /// Only stores a value under its `store-db-name`
    StoreOnly,
}

/// Compiled `value` of a row
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    /// Allowed options of an `ru`/`ou` row
    Options(HashSet<String>),
    Raw(Value),
}

/// A compiled form-element-validation row
#[derive(Debug, Clone)]
pub struct FormElementValidation {
    /// Position in the source table
    pub index: usize,
    pub kind: RowKind,
    pub source: Option<Source>,
    /// For active rows, only the names defined in the filing's DEI taxonomy
    pub xbrl_names: Vec<String>,
    pub store_db_name: Option<String>,
    pub axis: Option<String>,
    pub message: Option<String>,
    pub references: Option<Value>,
    pub value: Option<RowValue>,
    pub lang_pattern: Option<Regex>,
    /// Resolved forms; Some exactly when the row applies to the compile mode
    pub form_set: Option<FormSet>,
    /// The row as authored
    pub fields: Map<String, Value>,
}

impl FormElementValidation {
    pub fn is_active(&self) -> bool {
        self.form_set.is_some()
    }

    pub fn validation_code(&self) -> Option<&str> {
        match &self.kind {
            RowKind::Enforcement { validation, .. } => validation.as_deref(),
            RowKind::StoreOnly => None,
        }
    }

    /// True if the row applies to filings of `form_type`
    pub fn applies_to_form(&self, form_type: &str) -> bool {
        self.form_set
            .as_ref()
            .is_some_and(|forms| forms.contains(form_type))
    }
}

/// The compiled catalog for one document mode
#[derive(Debug, Clone)]
pub struct DeiValidationCatalog {
    pub mode: DocumentMode,
    pub dei_namespace: Option<String>,
    pub form_classes: BTreeMap<String, FormList>,
    pub validations: BTreeMap<String, Value>,
    pub axis_validations: BTreeMap<String, Value>,
    pub messages: BTreeMap<String, Value>,
    pub rows: Vec<FormElementValidation>,
}

impl DeiValidationCatalog {
    /// Rows applying to the catalog's document mode
    pub fn active_rows(&self) -> impl Iterator<Item = &FormElementValidation> {
        self.rows.iter().filter(|row| row.is_active())
    }
}

/// Reads and compiles `dei-validations.json`
///
/// # Errors
///
/// Returns `ArtifactError` if the catalog is missing or not shaped like a
/// catalog. Defects inside the catalog are reported through `sink`.
pub fn load_dei_catalog(
    store: &dyn ArtifactStore,
    mode: DocumentMode,
    filing: &dyn Filing,
    dei_prefix: &str,
    sink: &dyn DiagnosticSink,
) -> Result<DeiValidationCatalog, ArtifactError> {
    let raw: RawDeiCatalog = read_json(store, DEI_VALIDATIONS_FILE)?;
    Ok(compile_dei_catalog(raw, mode, filing, dei_prefix, sink))
}

/// Cross-validates a catalog and compiles its rows for `mode`
pub fn compile_dei_catalog(
    raw: RawDeiCatalog,
    mode: DocumentMode,
    filing: &dyn Filing,
    dei_prefix: &str,
    sink: &dyn DiagnosticSink,
) -> DeiValidationCatalog {
    let dei_namespace = filing
        .document_namespaces()
        .into_iter()
        .find(|ns| ns.starts_with(dei_prefix))
        .map(str::to_string);

    let graph = FormClassGraph::new(&raw.form_classes);
    graph.validate(sink);

    let compiler = RowCompiler {
        raw: &raw,
        mode,
        filing,
        dei_namespace: dei_namespace.as_deref(),
        graph,
        sink,
    };
    let rows = raw
        .form_element_validations
        .iter()
        .enumerate()
        .map(|(index, fields)| compiler.compile(index, fields))
        .collect();

    for (axis_key, axis_validation) in &raw.axis_validations {
        if let Some(message_key) = message_key(axis_validation)
            && !raw.messages.contains_key(message_key)
        {
            sink.error(
                LOAD_DEI_VALIDATIONS,
                &format!("Missing axis \"{}\" message[\"{}\"].", axis_key, message_key),
                &[
                    ("axisKey", axis_key.clone()),
                    ("messageKey", message_key.to_string()),
                ],
            );
        }
    }
    for (validation_key, validation) in &raw.validations {
        if let Some(message_key) = message_key(validation)
            && !raw.messages.contains_key(message_key)
        {
            sink.error(
                LOAD_DEI_VALIDATIONS,
                &format!(
                    "Missing validation \"{}\" message[\"{}\"].",
                    validation_key, message_key
                ),
                &[
                    ("valKey", validation_key.clone()),
                    ("messageKey", message_key.to_string()),
                ],
            );
        }
    }

    let RawDeiCatalog {
        form_classes,
        validations,
        axis_validations,
        messages,
        ..
    } = raw;
    DeiValidationCatalog {
        mode,
        dei_namespace,
        form_classes,
        validations,
        axis_validations,
        messages,
        rows,
    }
}

fn message_key(body: &Value) -> Option<&str> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|key| !key.is_empty())
}

/// Strings of a value that is a string or nested lists of strings
fn flatten_strings(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_strings).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

fn string_field(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_string)
}

struct RowCompiler<'a> {
    raw: &'a RawDeiCatalog,
    mode: DocumentMode,
    filing: &'a dyn Filing,
    dei_namespace: Option<&'a str>,
    graph: FormClassGraph<'a>,
    sink: &'a dyn DiagnosticSink,
}

impl RowCompiler<'_> {
    fn report(&self, index: usize, message: String, extra: &[(&str, String)]) {
        let mut context = vec![("row", index.to_string())];
        context.extend(extra.iter().cloned());
        self.sink.error(LOAD_DEI_VALIDATIONS, &message, &context);
    }

    fn report_missing_field(&self, index: usize, field: &str, suffix: &str) {
        self.report(
            index,
            format!(
                "Missing form-element-validation[\"{}\"] from row {}{}.",
                field, index, suffix
            ),
            &[("field", field.to_string())],
        );
    }

    fn compile(&self, index: usize, fields: &Map<String, Value>) -> FormElementValidation {
        let has_store_name = fields.contains_key(STORE_DB_NAME);
        let required: &[&str] = if has_store_name {
            &["xbrl-names"]
        } else {
            &["xbrl-names", "validation", "efm", "source"]
        };
        for field in required {
            if !fields.contains_key(*field) {
                self.report_missing_field(index, field, "");
            }
        }
        if fields.contains_key("severity") && !fields.keys().any(|k| k.starts_with("message")) {
            self.report_missing_field(index, "message*", "");
        }

        let validation = string_field(fields, "validation");
        let code = validation.as_deref();
        let store_only = code.is_none() && has_store_name;

        if let Some(code) = code
            && REFERENCE_CODES.contains(&code)
            && !fields.contains_key("references")
        {
            self.report_missing_field(index, "references", "");
        }

        let mut value = fields.get("value").cloned().map(RowValue::Raw);
        if let Some(code) = code
            && OPTION_CODES.contains(&code)
        {
            match fields.get("value") {
                Some(Value::Array(options)) => {
                    let options = options
                        .iter()
                        .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string))
                        .collect();
                    value = Some(RowValue::Options(options));
                }
                _ => self.report_missing_field(index, "value", ", must be a list"),
            }
        }

        if let Some(code) = code
            && !self.raw.validations.contains_key(code)
        {
            self.report(
                index,
                format!("Missing validation[\"{}\"].", code),
                &[("validationCode", code.to_string())],
            );
        }

        let axis = string_field(fields, "axis").filter(|a| !a.is_empty());
        if let Some(axis_code) = &axis
            && !self.raw.axis_validations.contains_key(axis_code)
        {
            self.report(
                index,
                format!("Missing axis[\"{}\"].", axis_code),
                &[("axisCode", axis_code.clone())],
            );
        }

        let lang_pattern = string_field(fields, "lang").and_then(|lang| match Regex::new(&lang) {
            Ok(re) => Some(re),
            Err(e) => {
                self.report(
                    index,
                    format!("Invalid lang pattern \"{}\": {}", lang, e),
                    &[("lang", lang.clone())],
                );
                None
            }
        });

        let message = string_field(fields, "message");
        let mut xbrl_names = fields.get("xbrl-names").map(flatten_strings).unwrap_or_default();
        let mut form_set = None;

        let raw_source = fields.get("source");
        let source = raw_source.and_then(Value::as_str).and_then(Source::parse);
        if raw_source.is_none() && store_only {
            // storage row, nothing to apply
        } else if source.is_none() {
            let shown = raw_source.map_or_else(|| "null".to_string(), |v| {
                v.as_str().map_or_else(|| v.to_string(), str::to_string)
            });
            self.report(
                index,
                format!("Invalid source [\"{}\"].", shown),
                &[("source", shown.clone())],
            );
        } else if let Some(source) = source
            && source.applies_to(self.mode)
        {
            if let Some(message_key) = message.as_deref().filter(|k| !k.is_empty())
                && !self.raw.messages.contains_key(message_key)
            {
                self.report(
                    index,
                    format!("Missing message[\"{}\"].", message_key),
                    &[("messageKey", message_key.to_string())],
                );
            }

            xbrl_names.retain(|name| {
                self.dei_namespace
                    .is_some_and(|ns| self.filing.has_concept(&QName::new(ns, name.as_str())))
            });

            let forms = match fields.get("forms") {
                Some(forms) => flatten_strings(forms),
                None => fields.get("form").map(flatten_strings).unwrap_or_default(),
            };
            form_set = Some(self.graph.expand(&forms, self.sink));
        }

        let kind = if store_only {
            RowKind::StoreOnly
        } else {
            RowKind::Enforcement {
                validation,
                efm: string_field(fields, "efm"),
                severity: string_field(fields, "severity"),
            }
        };

        FormElementValidation {
            index,
            kind,
            source,
            xbrl_names,
            store_db_name: string_field(fields, STORE_DB_NAME),
            axis,
            message,
            references: fields.get("references").cloned(),
            value,
            lang_pattern,
            form_set,
            fields: fields.clone(),
        }
    }
}
