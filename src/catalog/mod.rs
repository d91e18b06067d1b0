//! Resource catalog.
//!
//! The catalog is the caller-owned input of an allocation problem: an
//! ordered list of resource types, each with a per-unit capacity and a
//! per-unit cost. It is validated once at construction and read-only to
//! the search.

mod types;

pub use types::{CatalogBuilder, ResourceCatalog, ResourceType};
