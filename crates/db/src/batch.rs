//! Generic CASE-based batch column updater.
//!
//! Updates one column for many rows with a minimal number of statements:
//!
//! ```sql
//! UPDATE t SET col = CASE sprite_id WHEN ? THEN ? ... END WHERE sprite_id IN (?, ...)
//! ```
//!
//! Planning is pure (testable without a database); execution goes through the
//! [`CatalogDatabase`] trait.

use crate::dialect::{BoolEncoding, ParameterMapping};
use crate::error::DbResult;
use crate::store::{CatalogDatabase, SqlValue};
use armoire_core::catalog::PartColors;
use armoire_core::{CatalogItem, FieldTag, FieldValue};

/// Rows per CASE statement.
pub const BATCH_SIZE: usize = 500;

/// Transforms a field value before it is bound into an update.
///
/// Returning `Ok(None)` skips the item for this column. Errors are logged and
/// the item is skipped for this column.
pub type ValueModifier<'a> =
    dyn Fn(&CatalogItem, FieldTag, FieldValue) -> Result<Option<FieldValue>, String> + Send + Sync + 'a;

/// One planned multi-row update statement.
#[derive(Clone, Debug)]
pub struct CaseBatch {
    /// Target column.
    pub column: String,
    /// The (join-key, new-value) pairs this statement applies, in bind order.
    pub pairs: Vec<(i64, SqlValue)>,
    /// Statement text with `?` placeholders.
    pub sql: String,
    /// Bind values: one (id, value) pair per row, then the ids again for the
    /// IN list.
    pub binds: Vec<SqlValue>,
}

fn to_sql_value(value: FieldValue, encoding: BoolEncoding) -> SqlValue {
    match value {
        FieldValue::Int(v) => SqlValue::Int(v),
        FieldValue::Text(s) => SqlValue::Text(s),
        FieldValue::Bool(b) => match encoding {
            BoolEncoding::Tinyint => SqlValue::Int(i64::from(b)),
            BoolEncoding::EnumChar => SqlValue::Text(if b { "1" } else { "0" }.to_string()),
        },
        FieldValue::Colors(color) => SqlValue::Text(
            serde_json::to_string(&PartColors { color }).unwrap_or_default(),
        ),
    }
}

/// Plan the CASE statements updating `mapping.column` from the given items.
///
/// `pk_tag` names the catalog field supplying the join value (normally `id`),
/// bound against `pk_column`.
pub fn plan_column_update(
    items: &[CatalogItem],
    mapping: &ParameterMapping,
    table: &str,
    pk_column: &str,
    pk_tag: FieldTag,
    modifier: Option<&ValueModifier<'_>>,
    batch_size: usize,
) -> Vec<CaseBatch> {
    let encoding = mapping.bool_encoding();
    let mut pairs: Vec<(i64, SqlValue)> = Vec::with_capacity(items.len());

    for item in items {
        let FieldValue::Int(pk) = pk_tag.value_of(item) else {
            continue;
        };
        let raw = mapping.tag.value_of(item);

        let value = match modifier {
            Some(modify) => match modify(item, mapping.tag, raw) {
                Ok(Some(value)) => value,
                Ok(None) => continue,
                Err(message) => {
                    tracing::warn!(
                        column = mapping.column,
                        id = pk,
                        error = %message,
                        "value modifier failed, skipping item"
                    );
                    continue;
                }
            },
            None => raw,
        };

        pairs.push((pk, to_sql_value(value, encoding)));
    }

    pairs
        .chunks(batch_size.max(1))
        .map(|chunk| build_case_batch(chunk, mapping.column, table, pk_column))
        .collect()
}

fn build_case_batch(
    pairs: &[(i64, SqlValue)],
    column: &str,
    table: &str,
    pk_column: &str,
) -> CaseBatch {
    let case_arms = vec!["WHEN ? THEN ?"; pairs.len()].join(" ");
    let placeholders = vec!["?"; pairs.len()].join(", ");
    let sql = format!(
        "UPDATE {table} SET {column} = CASE {pk_column} {case_arms} END \
         WHERE {pk_column} IN ({placeholders})"
    );

    let mut binds = Vec::with_capacity(pairs.len() * 3);
    for (id, value) in pairs {
        binds.push(SqlValue::Int(*id));
        binds.push(value.clone());
    }
    for (id, _) in pairs {
        binds.push(SqlValue::Int(*id));
    }

    CaseBatch {
        column: column.to_string(),
        pairs: pairs.to_vec(),
        sql,
        binds,
    }
}

/// Executes planned batches against a [`CatalogDatabase`].
pub struct BatchUpdater<'a> {
    db: &'a dyn CatalogDatabase,
    table: String,
    pk_column: String,
    pk_tag: FieldTag,
    batch_size: usize,
}

impl<'a> BatchUpdater<'a> {
    pub fn new(db: &'a dyn CatalogDatabase, table: &str, pk_column: &str, pk_tag: FieldTag) -> Self {
        Self {
            db,
            table: table.to_string(),
            pk_column: pk_column.to_string(),
            pk_tag,
            batch_size: BATCH_SIZE,
        }
    }

    /// Update one column for the given items; returns total rows affected.
    pub async fn update_column(
        &self,
        items: &[CatalogItem],
        mapping: &ParameterMapping,
        modifier: Option<&ValueModifier<'_>>,
    ) -> DbResult<u64> {
        let batches = plan_column_update(
            items,
            mapping,
            &self.table,
            &self.pk_column,
            self.pk_tag,
            modifier,
            self.batch_size,
        );

        let mut total = 0;
        for batch in &batches {
            total += self.db.execute_case_batch(batch).await?;
        }
        Ok(total)
    }
}
