//! Custom-axis command implementation

use crate::cli::common::{OutputOptions, fail, finish, load_config};
use crate::diagnostics::CollectingSink;
use crate::error::EfmError;
use crate::output::Record;
use crate::rules::RuleCache;
use crate::rules::custom_axes::CustomAxisPatterns;
use std::path::Path;

/// Run the custom-axis command
///
/// Unmatched names are listed without a standard axis; they are not errors.
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 2: Error (configuration, missing or invalid axiswarnings.json)
pub fn run_custom_axis(names: &[String], config: Option<&Path>, options: OutputOptions) -> i32 {
    let sink = CollectingSink::new();
    match run_custom_axis_inner(names, config, &sink) {
        Ok(records) => finish(records, &sink, options),
        Err(e) => fail(&e),
    }
}

fn run_custom_axis_inner(
    names: &[String],
    config: Option<&Path>,
    sink: &CollectingSink,
) -> Result<Vec<Record>, EfmError> {
    let config = load_config(config)?;
    let mut cache = RuleCache::new(config, sink)?;
    Ok(axis_records(cache.custom_axes()?, names))
}

fn axis_records(patterns: &CustomAxisPatterns, names: &[String]) -> Vec<Record> {
    names
        .iter()
        .map(|name| Record::AxisMatch {
            name: name.clone(),
            standard_axis: patterns.resolve(name).map(str::to_string),
        })
        .collect()
}
