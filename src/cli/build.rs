//! Build commands
//!
//! `build-signwarnings` and `build-deprecations` compile the taxonomy-derived
//! tables into the resources directory. An existing table is authoritative
//! and is reported as cached instead of being rebuilt.

use crate::cli::common::{OutputOptions, fail, finish, load_config};
use crate::diagnostics::CollectingSink;
use crate::error::EfmError;
use crate::output::Record;
use crate::rules::deprecated::deprecated_dates_file;
use crate::rules::signwarnings::{SIGNWARNINGS_FILE, SignWarningRuleSet};
use crate::rules::RuleCache;
use std::path::Path;

/// Run the build-signwarnings command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 1: A rule source could not be loaded
/// - 2: Error (configuration, missing template, I/O)
pub fn run_build_signwarnings(config: Option<&Path>, options: OutputOptions) -> i32 {
    let sink = CollectingSink::new();
    match run_build_signwarnings_inner(config, &sink) {
        Ok(records) => finish(records, &sink, options),
        Err(e) => fail(&e),
    }
}

fn run_build_signwarnings_inner(
    config: Option<&Path>,
    sink: &CollectingSink,
) -> Result<Vec<Record>, EfmError> {
    let config = load_config(config)?;
    let mut cache = RuleCache::new(config, sink)?;
    let cached = cache.store().exists(SIGNWARNINGS_FILE);
    let rules = cache.sign_warnings()?;
    Ok(vec![Record::Artifact {
        name: SIGNWARNINGS_FILE.to_string(),
        entries: entry_count(rules),
        cached,
    }])
}

/// Number of names across all categories
fn entry_count(rules: &SignWarningRuleSet) -> usize {
    let lists = |m: &std::collections::BTreeMap<_, Vec<String>>| -> usize {
        m.values().map(Vec::len).sum()
    };
    lists(&rules.concept_names)
        + lists(&rules.excluded_member_names)
        + lists(&rules.excluded_member_strings)
        + rules
            .excluded_axes_members
            .values()
            .map(|axes| axes.len())
            .sum::<usize>()
}

/// Run the build-deprecations command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 1: A label document could not be loaded
/// - 2: Error (configuration, I/O)
pub fn run_build_deprecations(config: Option<&Path>, options: OutputOptions) -> i32 {
    let sink = CollectingSink::new();
    match run_build_deprecations_inner(config, &sink) {
        Ok(records) => finish(records, &sink, options),
        Err(e) => fail(&e),
    }
}

fn run_build_deprecations_inner(
    config: Option<&Path>,
    sink: &CollectingSink,
) -> Result<Vec<Record>, EfmError> {
    let config = load_config(config)?;
    let mut cache = RuleCache::new(config, sink)?;

    let existing: Vec<String> = cache
        .config()
        .deprecations
        .keys()
        .map(deprecated_dates_file)
        .filter(|file| cache.store().exists(file))
        .collect();

    let keys = cache.build_deprecated_tables()?;
    let mut records = Vec::with_capacity(keys.len());
    for key in keys {
        let name = deprecated_dates_file(&key);
        let entries = cache.deprecated_dates(&key)?.map_or(0, |dates| dates.len());
        records.push(Record::Artifact {
            cached: existing.contains(&name),
            name,
            entries,
        });
    }
    Ok(records)
}
