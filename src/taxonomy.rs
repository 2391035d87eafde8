//! Collaborator interfaces to the host document model and taxonomy loader

pub mod document;
pub mod filing;
pub mod loader;

pub use document::{Label, Reference, Relationship, RelationshipSet, TaxonomyDocument};
pub use filing::{Filing, FilingDocument, FilingSnapshot, distinct_namespaces};
pub use loader::{JsonTaxonomyLoader, MemoryLoader, TaxonomyLoader};
