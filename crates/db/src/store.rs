//! The catalog database trait.

use crate::batch::CaseBatch;
use crate::dialect::{DialectProfile, ParameterMapping};
use crate::error::DbResult;
use crate::row::NormalizedDbRow;
use async_trait::async_trait;

/// A value bound into a prepared statement.
///
/// Booleans never appear here: the batch planner encodes them per the target
/// column's type (integer for `TINYINT`, `'0'`/`'1'` for `ENUM`).
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Int(i64),
    Text(String),
}

/// The furniture table of one emulator database, seen through its dialect
/// profile.
#[async_trait]
pub trait CatalogDatabase: Send + Sync {
    /// The dialect profile this database is addressed through.
    fn profile(&self) -> &'static DialectProfile;

    /// Load every row of the furniture table, normalized.
    async fn load_rows(&self) -> DbResult<Vec<NormalizedDbRow>>;

    /// Look up a single row by identifier: a positive integer matches
    /// `sprite_id`; anything else is tried as a classname prefix, then as a
    /// public-name prefix. `None` means not found (as opposed to a hard
    /// error).
    async fn find_by_identifier(&self, identifier: &str) -> DbResult<Option<NormalizedDbRow>>;

    /// Check whether a column exists on the furniture table.
    async fn column_exists(&self, column: &str) -> DbResult<bool>;

    /// Add a column to the furniture table per its mapping.
    async fn add_column(&self, mapping: &ParameterMapping) -> DbResult<()>;

    /// Execute one planned CASE batch update; returns rows affected.
    async fn execute_case_batch(&self, batch: &CaseBatch) -> DbResult<u64>;

    /// Delete all rows whose `sprite_id` is in `ids`; returns rows affected.
    async fn delete_by_sprite_ids(&self, ids: &[i64]) -> DbResult<u64>;

    /// Collapse rows sharing a `sprite_id` down to the one with the highest
    /// surrogate `id`; returns rows deleted.
    async fn collapse_duplicate_sprites(&self) -> DbResult<u64>;
}
