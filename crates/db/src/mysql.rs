//! MySQL implementation of the catalog database.

use crate::batch::CaseBatch;
use crate::dialect::{BoolEncoding, Dialect, DialectProfile, ParameterMapping};
use crate::error::{DbError, DbResult};
use crate::row::NormalizedDbRow;
use crate::schema::add_column_sql;
use crate::store::{CatalogDatabase, SqlValue};
use armoire_core::config::DatabaseConfig;
use async_trait::async_trait;
use sqlx::Row;
use sqlx::mysql::{MySqlArguments, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use tracing::instrument;

/// MySQL-backed furniture table, addressed through a dialect profile.
pub struct MySqlDatabase {
    pool: MySqlPool,
    profile: &'static DialectProfile,
}

impl MySqlDatabase {
    /// Connect per configuration. Fails with `UnsupportedDialect` before
    /// touching the network when the dialect tag is unknown.
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        let dialect = Dialect::parse(&config.dialect)?;
        let url = config.connection_url().map_err(DbError::Config)?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&url)
            .await?;

        tracing::info!(dialect = %dialect, table = dialect.profile().table, "connected to emulator database");

        Ok(Self {
            pool,
            profile: dialect.profile(),
        })
    }

    /// Wrap an existing pool (used by integration tests).
    pub fn with_pool(pool: MySqlPool, dialect: Dialect) -> Self {
        Self {
            pool,
            profile: dialect.profile(),
        }
    }

    /// Decode one row tolerantly: columns that are absent (e.g. before schema
    /// evolution has run) or of an unexpected type fall back to defaults.
    fn decode_row(&self, row: &MySqlRow) -> NormalizedDbRow {
        let flags = &self.profile.flags;
        NormalizedDbRow {
            id: get_i64(row, "id"),
            sprite_id: get_i64(row, self.profile.sprite_id_column()),
            item_name: get_string(row, self.profile.item_name_column()),
            public_name: get_string(row, self.profile.public_name_column()),
            width: get_i64(row, "width"),
            length: get_i64(row, "length"),
            can_sit: get_flag(row, flags.can_sit, flags.encoding),
            can_walk: get_flag(row, flags.can_walk, flags.encoding),
            can_lay: get_flag(row, flags.can_lay, flags.encoding),
        }
    }

    async fn fetch_one_by(&self, clause: &str, bind: SqlValue) -> DbResult<Option<NormalizedDbRow>> {
        let sql = format!("SELECT * FROM {} WHERE {clause} LIMIT 1", self.profile.table);
        let query = bind_value(sqlx::query(&sql), bind);
        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.map(|row| self.decode_row(&row)))
    }
}

fn get_i64(row: &MySqlRow, column: &str) -> i64 {
    row.try_get::<i64, _>(column)
        .or_else(|_| row.try_get::<u64, _>(column).map(|v| v as i64))
        .or_else(|_| row.try_get::<bool, _>(column).map(i64::from))
        .unwrap_or_default()
}

fn get_string(row: &MySqlRow, column: &str) -> String {
    row.try_get::<String, _>(column).unwrap_or_default()
}

fn get_flag(row: &MySqlRow, column: &str, encoding: BoolEncoding) -> bool {
    match encoding {
        BoolEncoding::Tinyint => get_i64(row, column) != 0,
        BoolEncoding::EnumChar => get_string(row, column) == "1",
    }
}

fn bind_value<'q>(
    query: Query<'q, sqlx::MySql, MySqlArguments>,
    value: SqlValue,
) -> Query<'q, sqlx::MySql, MySqlArguments> {
    match value {
        SqlValue::Int(v) => query.bind(v),
        SqlValue::Text(v) => query.bind(v),
    }
}

#[async_trait]
impl CatalogDatabase for MySqlDatabase {
    fn profile(&self) -> &'static DialectProfile {
        self.profile
    }

    #[instrument(skip(self), fields(table = self.profile.table))]
    async fn load_rows(&self) -> DbResult<Vec<NormalizedDbRow>> {
        let sql = format!("SELECT * FROM {}", self.profile.table);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(|row| self.decode_row(row)).collect())
    }

    #[instrument(skip(self), fields(table = self.profile.table))]
    async fn find_by_identifier(&self, identifier: &str) -> DbResult<Option<NormalizedDbRow>> {
        if let Ok(id) = identifier.parse::<i64>()
            && id > 0
        {
            return self
                .fetch_one_by("sprite_id = ?", SqlValue::Int(id))
                .await;
        }

        let prefix = SqlValue::Text(format!("{identifier}%"));
        if let Some(row) = self
            .fetch_one_by("item_name LIKE ?", prefix.clone())
            .await?
        {
            return Ok(Some(row));
        }
        self.fetch_one_by("public_name LIKE ?", prefix).await
    }

    #[instrument(skip(self), fields(table = self.profile.table))]
    async fn column_exists(&self, column: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM INFORMATION_SCHEMA.COLUMNS \
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND COLUMN_NAME = ?",
        )
        .bind(self.profile.table)
        .bind(column)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, mapping), fields(table = self.profile.table, column = mapping.column))]
    async fn add_column(&self, mapping: &ParameterMapping) -> DbResult<()> {
        let sql = add_column_sql(self.profile.table, mapping);
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    #[instrument(skip(self, batch), fields(table = self.profile.table, column = %batch.column, rows = batch.pairs.len()))]
    async fn execute_case_batch(&self, batch: &CaseBatch) -> DbResult<u64> {
        let mut query = sqlx::query(&batch.sql);
        for value in &batch.binds {
            query = bind_value(query, value.clone());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self, ids), fields(table = self.profile.table, count = ids.len()))]
    async fn delete_by_sprite_ids(&self, ids: &[i64]) -> DbResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM {} WHERE sprite_id IN ({placeholders})",
            self.profile.table
        );
        let mut query = sqlx::query(&sql);
        for id in ids {
            query = query.bind(*id);
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    #[instrument(skip(self), fields(table = self.profile.table))]
    async fn collapse_duplicate_sprites(&self) -> DbResult<u64> {
        let table = self.profile.table;
        let sql = format!(
            "DELETE t1 FROM {table} t1 JOIN {table} t2 \
             ON t1.sprite_id = t2.sprite_id WHERE t1.id < t2.id"
        );
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
