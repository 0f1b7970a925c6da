//! Single-item deep check.
//!
//! Resolves an identifier (numeric id, classname, display name, or
//! `<base>.nitro` filename) against all three sources and emits a detail
//! report with an overall PASS / WARNING / FAIL verdict.

use crate::catalog_io::load_catalog;
use crate::error::SyncResult;
use crate::scanner::BUNDLE_PREFIX;
use armoire_core::CatalogItem;
use armoire_core::catalog::stored_object_name;
use armoire_db::{CatalogDatabase, NormalizedDbRow};
use armoire_storage::ObjectStore;
use serde::Serialize;

/// Overall verdict of a single-item check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum IntegrityStatus {
    #[default]
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "WARNING")]
    Warning,
    #[serde(rename = "FAIL")]
    Fail,
}

/// Detail report for one asset.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DetailReport {
    pub id: i64,
    pub classname: String,
    pub name: String,
    pub nitro_file: String,
    pub in_furnidata: bool,
    pub in_database: bool,
    pub file_exists: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<String>,
    pub integrity_status: IntegrityStatus,
}

/// Check a single item across catalog, database, and storage.
pub async fn check_item(
    store: &dyn ObjectStore,
    db: &dyn CatalogDatabase,
    identifier: &str,
) -> SyncResult<DetailReport> {
    let mut report = DetailReport::default();

    let search_identifier = identifier.strip_suffix(".nitro").unwrap_or(identifier);

    let catalog = load_catalog(store).await?;

    let mut db_row = db.find_by_identifier(search_identifier).await?;

    let numeric_id = identifier.parse::<i64>().ok().filter(|id| *id > 0);
    if let Some(id) = numeric_id {
        report.id = id;
    }

    let find = |items: &[CatalogItem]| -> Option<CatalogItem> {
        items
            .iter()
            .find(|item| {
                numeric_id == Some(item.id)
                    || item.classname.to_lowercase() == search_identifier.to_lowercase()
                    || item.name.to_lowercase() == search_identifier.to_lowercase()
            })
            .cloned()
    };

    // Room bucket takes priority over wall.
    let item = find(&catalog.room_item_types.furni_type)
        .or_else(|| find(&catalog.wall_item_types.furni_type));

    match &item {
        Some(item) => {
            report.in_furnidata = true;
            report.id = item.id;
            report.classname = item.classname.clone();
            report.name = item.name.clone();
            report.nitro_file = item.stored_object_name();
        }
        None => {
            report.in_furnidata = false;
            if numeric_id.is_none() {
                report.classname = search_identifier.to_string();
                report.nitro_file = format!("{search_identifier}.nitro");
            }
        }
    }

    // The identifier may not be how the database spells it; retry by the
    // catalog item's id.
    if db_row.is_none()
        && let Some(item) = &item
    {
        db_row = db.find_by_identifier(&item.id.to_string()).await?;
    }

    match &db_row {
        Some(row) => {
            report.in_database = true;
            if report.id == 0 {
                report.id = row.sprite_id;
            }
            if report.name.is_empty() {
                report.name = row.public_name.clone();
            }
            if report.classname.is_empty() {
                report.classname = row.item_name.clone();
                report.nitro_file = stored_object_name(&row.item_name);
            }

            if let Some(item) = &item {
                compare_detail(item, row, &mut report.mismatches);
            }
        }
        None => report.in_database = false,
    }

    if !report.nitro_file.is_empty() {
        report.file_exists = probe_storage(store, &report.nitro_file).await?;
    }

    if !report.in_furnidata {
        report.mismatches.push("Missing in FurniData".to_string());
        report.integrity_status = IntegrityStatus::Fail;
    }
    if !report.in_database {
        report.mismatches.push("Missing in Database".to_string());
        report.integrity_status = IntegrityStatus::Fail;
    }
    if !report.file_exists {
        report
            .mismatches
            .push("Missing .nitro file in storage".to_string());
        report.integrity_status = IntegrityStatus::Fail;
    }
    if !report.mismatches.is_empty() && report.integrity_status == IntegrityStatus::Pass {
        report.integrity_status = IntegrityStatus::Warning;
    }

    Ok(report)
}

fn compare_detail(item: &CatalogItem, row: &NormalizedDbRow, mismatches: &mut Vec<String>) {
    if item.name.to_lowercase() != row.public_name.to_lowercase() {
        mismatches.push(format!(
            "Name mismatch: FurniData='{}', DB='{}'",
            item.name, row.public_name
        ));
    }
    if item.classname.to_lowercase() != row.item_name.to_lowercase() {
        mismatches.push(format!(
            "ClassName mismatch: FurniData='{}', DB='{}'",
            item.classname, row.item_name
        ));
    }
    if item.xdim != row.width {
        mismatches.push(format!(
            "Width mismatch: FurniData={}, DB={}",
            item.xdim, row.width
        ));
    }
    if item.ydim != row.length {
        mismatches.push(format!(
            "Length mismatch: FurniData={}, DB={}",
            item.ydim, row.length
        ));
    }
}

/// Probe the bundle key directly, then under the lower- and upper-cased
/// first-character subfolders some buckets shard into.
async fn probe_storage(store: &dyn ObjectStore, filename: &str) -> SyncResult<bool> {
    let mut candidates = vec![format!("{BUNDLE_PREFIX}{filename}")];
    if let Some(first) = filename.chars().next() {
        candidates.push(format!(
            "{BUNDLE_PREFIX}{}/{filename}",
            first.to_lowercase()
        ));
        candidates.push(format!(
            "{BUNDLE_PREFIX}{}/{filename}",
            first.to_uppercase()
        ));
    }

    for key in candidates {
        if store.exists(&key).await? {
            return Ok(true);
        }
    }
    Ok(false)
}
