//! Core domain types for Armoire.
//!
//! This crate provides:
//! - The furniture catalog data model (`FurnitureData.json`)
//! - Field tags driving the declarative catalog-to-column mappings
//! - Catalog item validation
//! - Latin-1 sanitization for legacy database columns
//! - Configuration types shared across crates

pub mod catalog;
pub mod config;
pub mod error;
pub mod field;
pub mod sanitize;

pub use catalog::{Catalog, CatalogItem, ItemBucket, PartColors};
pub use error::{Error, Result};
pub use field::{FieldTag, FieldValue};
