//! Check-dei command implementation
//!
//! Compiles `dei-validations.json` against a filing snapshot. Every catalog
//! defect is reported; the active rows are listed.

use crate::cli::common::{OutputOptions, fail, finish, load_config, load_filing};
use crate::diagnostics::CollectingSink;
use crate::error::EfmError;
use crate::output::Record;
use crate::rules::RuleCache;
use crate::rules::dei::{DeiValidationCatalog, FormElementValidation};
use crate::rules::form_classes::FormSet;
use crate::types::DocumentMode;
use std::path::Path;

/// Arguments of the check-dei command
#[derive(Debug, Clone, Copy)]
pub struct CheckDeiArgs<'a> {
    pub filing: &'a Path,
    pub inline: bool,
    pub form: Option<&'a str>,
}

/// Run the check-dei command
///
/// # Returns
///
/// Exit code:
/// - 0: Success (catalog compiled without defects)
/// - 1: Catalog defects reported
/// - 2: Error (configuration, unreadable filing or catalog)
pub fn run_check_dei(args: CheckDeiArgs<'_>, config: Option<&Path>, options: OutputOptions) -> i32 {
    let sink = CollectingSink::new();
    match run_check_dei_inner(args, config, &sink) {
        Ok(records) => finish(records, &sink, options),
        Err(e) => fail(&e),
    }
}

fn run_check_dei_inner(
    args: CheckDeiArgs<'_>,
    config: Option<&Path>,
    sink: &CollectingSink,
) -> Result<Vec<Record>, EfmError> {
    let config = load_config(config)?;
    let filing = load_filing(args.filing)?;
    let mut cache = RuleCache::new(config, sink)?;
    let catalog = cache.dei_catalog(DocumentMode::from_inline(args.inline), &filing)?;
    Ok(row_records(catalog, args.form))
}

fn row_records(catalog: &DeiValidationCatalog, form: Option<&str>) -> Vec<Record> {
    catalog
        .active_rows()
        .filter(|row| form.is_none_or(|form| row.applies_to_form(form)))
        .map(row_record)
        .collect()
}

fn row_record(row: &FormElementValidation) -> Record {
    let forms = match &row.form_set {
        Some(FormSet::Forms(forms)) => forms.iter().cloned().collect(),
        Some(FormSet::All) => vec!["*".to_string()],
        None => Vec::new(),
    };
    Record::Row {
        index: row.index,
        validation: row.validation_code().map(str::to_string),
        xbrl_names: row.xbrl_names.clone(),
        forms,
    }
}
