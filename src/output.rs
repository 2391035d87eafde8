//! Output formatters (human and JSONL)

pub mod human;
pub mod jsonl;
pub mod report;

pub use human::HumanFormatter;
pub use jsonl::JsonlFormatter;
pub use report::{Record, Report};
