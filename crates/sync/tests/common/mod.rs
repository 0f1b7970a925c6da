//! Shared fixtures: an in-memory catalog database and storage helpers.
#![allow(dead_code)]

use armoire_core::{Catalog, CatalogItem, ItemBucket};
use armoire_db::{
    CaseBatch, CatalogDatabase, DbError, DbResult, Dialect, DialectProfile, NormalizedDbRow,
    ParameterMapping, SqlValue,
};
use armoire_storage::{FilesystemBackend, ObjectStore};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory furniture table implementing [`CatalogDatabase`].
pub struct MockDatabase {
    dialect: Dialect,
    rows: Mutex<Vec<NormalizedDbRow>>,
    columns: Mutex<HashSet<String>>,
    pub fail_alter: bool,
    pub fail_cleanup: bool,
}

impl MockDatabase {
    pub fn new(dialect: Dialect, rows: Vec<NormalizedDbRow>) -> Self {
        let columns = dialect
            .profile()
            .mappings
            .iter()
            .filter(|m| !m.is_new_column)
            .map(|m| m.column.to_string())
            .collect();
        Self {
            dialect,
            rows: Mutex::new(rows),
            columns: Mutex::new(columns),
            fail_alter: false,
            fail_cleanup: false,
        }
    }

    pub fn rows(&self) -> Vec<NormalizedDbRow> {
        self.rows.lock().unwrap().clone()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.lock().unwrap().contains(column)
    }
}

fn as_i64(value: &SqlValue) -> i64 {
    match value {
        SqlValue::Int(v) => *v,
        SqlValue::Text(t) => t.parse().unwrap_or_default(),
    }
}

fn as_bool(value: &SqlValue) -> bool {
    match value {
        SqlValue::Int(v) => *v != 0,
        SqlValue::Text(t) => t == "1",
    }
}

fn as_text(value: &SqlValue) -> String {
    match value {
        SqlValue::Int(v) => v.to_string(),
        SqlValue::Text(t) => t.clone(),
    }
}

#[async_trait]
impl CatalogDatabase for MockDatabase {
    fn profile(&self) -> &'static DialectProfile {
        self.dialect.profile()
    }

    async fn load_rows(&self) -> DbResult<Vec<NormalizedDbRow>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn find_by_identifier(&self, identifier: &str) -> DbResult<Option<NormalizedDbRow>> {
        let rows = self.rows.lock().unwrap();
        if let Ok(id) = identifier.parse::<i64>() {
            if id > 0 {
                return Ok(rows.iter().find(|r| r.sprite_id == id).cloned());
            }
        }
        Ok(rows
            .iter()
            .find(|r| r.item_name.starts_with(identifier))
            .or_else(|| rows.iter().find(|r| r.public_name.starts_with(identifier)))
            .cloned())
    }

    async fn column_exists(&self, column: &str) -> DbResult<bool> {
        Ok(self.columns.lock().unwrap().contains(column))
    }

    async fn add_column(&self, mapping: &ParameterMapping) -> DbResult<()> {
        if self.fail_alter {
            return Err(DbError::Config("simulated ALTER failure".to_string()));
        }
        self.columns.lock().unwrap().insert(mapping.column.to_string());
        Ok(())
    }

    async fn execute_case_batch(&self, batch: &CaseBatch) -> DbResult<u64> {
        let flags = self.profile().flags;
        let mut rows = self.rows.lock().unwrap();
        let mut affected = 0;

        for (sprite_id, value) in &batch.pairs {
            for row in rows.iter_mut().filter(|r| r.sprite_id == *sprite_id) {
                match batch.column.as_str() {
                    "item_name" => row.item_name = as_text(value),
                    "public_name" => row.public_name = as_text(value),
                    "width" => row.width = as_i64(value),
                    "length" => row.length = as_i64(value),
                    c if c == flags.can_sit => row.can_sit = as_bool(value),
                    c if c == flags.can_walk => row.can_walk = as_bool(value),
                    c if c == flags.can_lay => row.can_lay = as_bool(value),
                    // Columns outside the normalized projection.
                    _ => {}
                }
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn delete_by_sprite_ids(&self, ids: &[i64]) -> DbResult<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|r| !ids.contains(&r.sprite_id));
        Ok((before - rows.len()) as u64)
    }

    async fn collapse_duplicate_sprites(&self) -> DbResult<u64> {
        if self.fail_cleanup {
            return Err(DbError::Config("simulated cleanup failure".to_string()));
        }
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        let mut keep: Vec<NormalizedDbRow> = Vec::new();
        for row in rows.iter() {
            match keep.iter_mut().find(|r| r.sprite_id == row.sprite_id) {
                Some(existing) if existing.id < row.id => *existing = row.clone(),
                Some(_) => {}
                None => keep.push(row.clone()),
            }
        }
        *rows = keep;
        Ok((before - rows.len()) as u64)
    }
}

/// Build a catalog from room and wall item lists.
pub fn catalog_of(room: Vec<CatalogItem>, wall: Vec<CatalogItem>) -> Catalog {
    Catalog {
        room_item_types: ItemBucket { furni_type: room },
        wall_item_types: ItemBucket { furni_type: wall },
    }
}

/// A minimal valid floor item.
pub fn floor_item(id: i64, classname: &str, name: &str) -> CatalogItem {
    CatalogItem {
        id,
        classname: classname.to_string(),
        name: name.to_string(),
        category: "test".to_string(),
        xdim: 1,
        ydim: 1,
        ..Default::default()
    }
}

/// The database row matching [`floor_item`] exactly.
pub fn row_for(item: &CatalogItem, surrogate: i64) -> NormalizedDbRow {
    NormalizedDbRow {
        id: surrogate,
        sprite_id: item.id,
        item_name: item.classname.clone(),
        public_name: item.name.clone(),
        width: item.xdim,
        length: item.ydim,
        can_sit: item.cansiton,
        can_walk: item.canstandon,
        can_lay: item.canlayon,
    }
}

/// Filesystem-backed store seeded with a catalog document and bundle objects.
pub async fn seeded_store(
    root: &std::path::Path,
    catalog: &Catalog,
    bundles: &[&str],
) -> FilesystemBackend {
    let backend = FilesystemBackend::new(root).await.unwrap();
    let json = catalog.to_pretty_json().unwrap();
    backend
        .put("gamedata/FurnitureData.json", Bytes::from(json), "application/json")
        .await
        .unwrap();
    for name in bundles {
        backend
            .put(
                &format!("bundled/furniture/{name}"),
                Bytes::from_static(b"nitro-bundle"),
                "application/octet-stream",
            )
            .await
            .unwrap();
    }
    backend
}
