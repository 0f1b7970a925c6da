//! Emulator database adapter for Armoire.
//!
//! This crate provides the relational side of the reconciliation engine:
//! - Dialect profiles for the supported emulator schemas (arcturus, comet, plus)
//! - A dialect-agnostic normalized row projection
//! - The `CatalogDatabase` trait with its MySQL implementation
//! - Schema evolution over `INFORMATION_SCHEMA`
//! - The generic CASE-based batch column updater
//! - Duplicate row cleanup

pub mod batch;
pub mod dialect;
pub mod error;
pub mod mysql;
pub mod row;
pub mod schema;
pub mod store;

pub use batch::{BatchUpdater, CaseBatch, ValueModifier, plan_column_update};
pub use dialect::{BoolEncoding, Dialect, DialectProfile, ParameterMapping};
pub use error::{DbError, DbResult};
pub use mysql::MySqlDatabase;
pub use row::NormalizedDbRow;
pub use store::{CatalogDatabase, SqlValue};

use armoire_core::config::DatabaseConfig;
use std::sync::Arc;

/// Create a catalog database from configuration.
pub async fn from_config(config: &DatabaseConfig) -> DbResult<Arc<dyn CatalogDatabase>> {
    let db = MySqlDatabase::connect(config).await?;
    Ok(Arc::new(db))
}
