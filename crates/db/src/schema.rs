//! Schema evolution for the furniture table.
//!
//! Adds the profile's `is_new_column` mappings that are not present yet.
//! Runs sequentially and re-checks existence on every run, so it is
//! idempotent; the first ALTER failure aborts.

use crate::error::{DbError, DbResult};
use crate::store::CatalogDatabase;

/// Add any missing columns named by the profile. Returns a description of
/// each change applied.
pub async fn evolve_schema(db: &dyn CatalogDatabase) -> DbResult<Vec<String>> {
    let profile = db.profile();
    let mut changes = Vec::new();

    for mapping in profile.mappings {
        if !mapping.is_new_column {
            continue;
        }

        let exists = db
            .column_exists(mapping.column)
            .await
            .map_err(|e| DbError::SchemaEvolution {
                column: mapping.column.to_string(),
                message: e.to_string(),
            })?;
        if exists {
            continue;
        }

        db.add_column(mapping)
            .await
            .map_err(|e| DbError::SchemaEvolution {
                column: mapping.column.to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(
            table = profile.table,
            column = mapping.column,
            sql_type = mapping.sql_type,
            "added column"
        );
        changes.push(format!(
            "Added column: {} ({})",
            mapping.column, mapping.sql_type
        ));
    }

    Ok(changes)
}

/// Build the ALTER statement for one mapping.
pub fn add_column_sql(table: &str, mapping: &crate::dialect::ParameterMapping) -> String {
    match mapping.default {
        Some(default) => format!(
            "ALTER TABLE {table} ADD COLUMN {} {} DEFAULT {default}",
            mapping.column, mapping.sql_type
        ),
        None => format!(
            "ALTER TABLE {table} ADD COLUMN {} {}",
            mapping.column, mapping.sql_type
        ),
    }
}
