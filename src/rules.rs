#![forbid(unsafe_code)]

//! Rule table compilers
//!
//! Each submodule turns one kind of rule artifact into a lookup table:
//! sign-warning and deprecated-date tables derived from taxonomies, the
//! cross-validated DEI catalog, custom-axis patterns, and the per-filing
//! non-negative lookups. [`RuleCache`] ties them together for a run.

pub mod cache;
pub mod custom_axes;
pub mod dei;
pub mod deprecated;
pub mod form_classes;
pub mod non_negative;
pub mod other_standard;
pub mod signwarnings;

pub use cache::RuleCache;
pub use custom_axes::{AXIS_WARNINGS_FILE, CustomAxisPatterns};
pub use dei::{
    DEI_VALIDATIONS_FILE, DeiValidationCatalog, FormElementValidation, RawDeiCatalog, RowKind,
    RowValue, compile_dei_catalog, load_dei_catalog,
};
pub use deprecated::{
    DeprecatedConceptDates, build_all_deprecated_dates, deprecated_dates_file,
    load_deprecated_dates,
};
pub use form_classes::{FormClassGraph, FormList, FormSet};
pub use non_negative::{ExcludedMember, NonNegativeFacts};
pub use other_standard::{OTHER_STANDARD_TAXONOMIES_FILE, OtherStandardTaxonomies};
pub use signwarnings::{
    SIGNWARNINGS_FILE, SIGNWARNINGS_TEMPLATE_FILE, SignWarningRuleSet, build_sign_warnings,
    load_sign_warnings,
};
