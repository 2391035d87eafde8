//! Non-negative command implementation
//!
//! Resolves the sign-warning table against a filing snapshot and lists the
//! qualified rules, sorted for stable output.

use crate::cli::common::{OutputOptions, fail, finish, load_config, load_filing};
use crate::diagnostics::CollectingSink;
use crate::error::EfmError;
use crate::output::Record;
use crate::rules::RuleCache;
use crate::rules::non_negative::{ExcludedMember, NonNegativeFacts};
use crate::rules::signwarnings::ALL_MEMBERS;
use std::path::Path;

/// Run the non-negative command
///
/// # Returns
///
/// Exit code:
/// - 0: Success
/// - 1: A rule source could not be loaded while building the table
/// - 2: Error (configuration, unreadable filing, missing template)
pub fn run_non_negative(filing: &Path, config: Option<&Path>, options: OutputOptions) -> i32 {
    let sink = CollectingSink::new();
    match run_non_negative_inner(filing, config, &sink) {
        Ok(records) => finish(records, &sink, options),
        Err(e) => fail(&e),
    }
}

fn run_non_negative_inner(
    filing: &Path,
    config: Option<&Path>,
    sink: &CollectingSink,
) -> Result<Vec<Record>, EfmError> {
    let config = load_config(config)?;
    let filing = load_filing(filing)?;
    let mut cache = RuleCache::new(config, sink)?;
    let facts = cache.non_negative_facts(&filing)?;
    Ok(fact_records(&facts))
}

fn sorted_names<'a>(names: impl Iterator<Item = &'a crate::types::QName>) -> Vec<String> {
    let mut names: Vec<String> = names.map(ToString::to_string).collect();
    names.sort();
    names
}

fn fact_records(facts: &NonNegativeFacts) -> Vec<Record> {
    let mut records: Vec<Record> = sorted_names(facts.concepts.iter())
        .into_iter()
        .map(|concept| Record::NonNegative { concept })
        .collect();

    records.extend(
        sorted_names(facts.excluded_members.iter())
            .into_iter()
            .map(|member| Record::ExcludedMember { member }),
    );

    let mut axes: Vec<_> = facts.excluded_axes_members.iter().collect();
    axes.sort_by_key(|(axis, _)| axis.to_string());
    for (axis, members) in axes {
        let mut members: Vec<String> = members
            .iter()
            .map(|member| match member {
                ExcludedMember::All => ALL_MEMBERS.to_string(),
                ExcludedMember::Member(qname) => qname.to_string(),
            })
            .collect();
        members.sort();
        records.push(Record::ExcludedAxis {
            axis: axis.to_string(),
            members,
        });
    }

    records.push(Record::MemberPattern {
        pattern: facts
            .excluded_member_names_pattern
            .as_ref()
            .map(|re| re.as_str().to_string()),
    });
    records
}
