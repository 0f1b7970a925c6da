//! The asset-centric three-way join.
//!
//! Fuses the catalog, the storage basename set, and the normalized database
//! rows into one map keyed by storage basename, then aggregates it into an
//! [`IntegrityReport`]. Pure with respect to its inputs; ordering of the
//! emitted asset list is unspecified.

use crate::report::{AssetEntry, IntegrityReport};
use armoire_core::catalog::stored_object_name;
use armoire_core::sanitize::sanitize_latin1;
use armoire_core::{Catalog, CatalogItem};
use armoire_db::NormalizedDbRow;
use std::collections::{HashMap, HashSet};

/// A database `public_name` at or above this length that is a prefix of the
/// catalog name is treated as an accepted truncation (the narrowest dialect
/// stores names in VARCHAR(56)).
const TRUNCATION_ACCEPT_LEN: usize = 56;

/// Build the integrity report for a `(catalog, storage, database)` triple.
pub fn build_asset_report(
    catalog: &Catalog,
    stored: &HashSet<String>,
    rows: &HashMap<i64, NormalizedDbRow>,
) -> IntegrityReport {
    let mut assets: HashMap<String, AssetEntry> = HashMap::new();

    // Catalog entries first; duplicates collapse by id, last wins.
    let active = catalog.active_items();

    for item in active.values() {
        let name = item.stored_object_name();
        let entry = assets.entry(name.clone()).or_insert_with(|| AssetEntry {
            name,
            furnidata_missing: false,
            storage_missing: true,
            database_missing: true,
            ..Default::default()
        });
        entry.id = item.id;
        entry.classname = item.classname.clone();

        if let Some(problem) = item.validate() {
            entry
                .mismatches
                .push(format!("FurniData validation: {problem}"));
        }

        if let Some(row) = rows.get(&item.id) {
            entry.database_missing = false;
            compare_fields(item, row, &mut entry.mismatches);
        }

        if stored.contains(&entry.name) {
            entry.storage_missing = false;
        }
    }

    // Storage objects the catalog does not know about.
    for name in stored {
        assets.entry(name.clone()).or_insert_with(|| AssetEntry {
            name: name.clone(),
            furnidata_missing: true,
            storage_missing: false,
            // Unknown without a catalog id to join on.
            database_missing: true,
            ..Default::default()
        });
    }

    // Database rows the catalog does not know about.
    for (sprite_id, row) in rows {
        if active.contains_key(sprite_id) {
            continue;
        }
        let name = stored_object_name(&row.item_name);
        match assets.get_mut(&name) {
            None => {
                assets.insert(
                    name.clone(),
                    AssetEntry {
                        id: *sprite_id,
                        name: name.clone(),
                        classname: row.item_name.clone(),
                        furnidata_missing: true,
                        storage_missing: !stored.contains(&name),
                        database_missing: false,
                        ..Default::default()
                    },
                );
            }
            // Merge into a storage-only entry; catalog-backed entries keep
            // their own id-based database verdict.
            Some(entry) if entry.furnidata_missing => {
                entry.database_missing = false;
                if entry.id == 0 {
                    entry.id = *sprite_id;
                    entry.classname = row.item_name.clone();
                }
            }
            Some(_) => {}
        }
    }

    let mut report = IntegrityReport {
        total_assets: assets.len(),
        ..Default::default()
    };

    for (_, entry) in assets {
        if !entry.mismatches.is_empty() {
            report.with_mismatches += 1;
        }
        if entry.furnidata_missing {
            report.furnidata_missing += 1;
        }
        if entry.storage_missing {
            report.storage_missing += 1;
        }
        if entry.database_missing {
            report.database_missing += 1;
        }
        if entry.has_issue() {
            report.assets.push(entry);
        }
    }

    report
}

fn compare_fields(item: &CatalogItem, row: &NormalizedDbRow, mismatches: &mut Vec<String>) {
    if !names_match(&item.name, &row.public_name) {
        mismatches.push(format!(
            "name mismatch (FurniData: '{}', DB: '{}')",
            item.name, row.public_name
        ));
    }
    if item.classname.to_lowercase() != row.item_name.to_lowercase() {
        mismatches.push(format!(
            "classname mismatch (FurniData: '{}', DB: '{}')",
            item.classname, row.item_name
        ));
    }
    if item.xdim != row.width {
        mismatches.push(format!(
            "width mismatch (FurniData: {}, DB: {})",
            item.xdim, row.width
        ));
    }
    if item.ydim != row.length {
        mismatches.push(format!(
            "length mismatch (FurniData: {}, DB: {})",
            item.ydim, row.length
        ));
    }
    if item.cansiton != row.can_sit {
        mismatches.push(format!(
            "can_sit mismatch (FurniData: {}, DB: {})",
            item.cansiton, row.can_sit
        ));
    }
    if item.canstandon != row.can_walk {
        mismatches.push(format!(
            "can_walk/stand mismatch (FurniData: {}, DB: {})",
            item.canstandon, row.can_walk
        ));
    }
    if item.canlayon != row.can_lay {
        mismatches.push(format!(
            "can_lay mismatch (FurniData: {}, DB: {})",
            item.canlayon, row.can_lay
        ));
    }
}

/// Compare the catalog name against the stored `public_name`.
///
/// The catalog value is sanitized to Latin-1 first (that is what the column
/// can hold) and compared case-insensitively. A stored value of at least 56
/// characters that is a case-insensitive prefix of a longer catalog name is
/// an accepted truncation.
fn names_match(catalog_name: &str, db_name: &str) -> bool {
    let sanitized = sanitize_latin1(catalog_name);
    if sanitized.to_lowercase() == db_name.to_lowercase() {
        return true;
    }

    let db_len = db_name.chars().count();
    if db_len >= TRUNCATION_ACCEPT_LEN && sanitized.chars().count() > db_len {
        let prefix: String = sanitized.chars().take(db_len).collect();
        return prefix.to_lowercase() == db_name.to_lowercase();
    }
    false
}
