//! Deletion planning from an integrity report.
//!
//! Classifies every flagged asset into three orthogonal decisions: delete the
//! DB row, delete the storage object, remove the catalog entry. Catalog
//! removal is the zero-tolerance policy: an entry that cannot be made whole
//! in both the database and storage is purged so the next integrity run is
//! clean.

use crate::report::IntegrityReport;
use crate::scanner::BUNDLE_PREFIX;

/// Prefix marking validation problems inside an asset's mismatch list.
pub const VALIDATION_MISMATCH_PREFIX: &str = "FurniData validation:";

/// The three deletion decisions computed from an integrity report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeletionPlan {
    /// `sprite_id`s whose rows are removed from the furniture table.
    pub db_sprite_ids: Vec<i64>,
    /// Full object keys removed from storage.
    pub storage_keys: Vec<String>,
    /// Catalog item ids filtered out of both buckets.
    pub catalog_ids: Vec<i64>,
}

impl DeletionPlan {
    pub fn is_empty(&self) -> bool {
        self.db_sprite_ids.is_empty()
            && self.storage_keys.is_empty()
            && self.catalog_ids.is_empty()
    }
}

/// Compute the deletion plan for a report.
pub fn plan_deletions(report: &IntegrityReport) -> DeletionPlan {
    let mut plan = DeletionPlan::default();

    for asset in &report.assets {
        // DB row: present but unknown to the catalog, or backing a broken
        // item whose bundle is gone.
        let delete_db = !asset.database_missing
            && (asset.furnidata_missing || asset.storage_missing);
        if delete_db && asset.id > 0 {
            plan.db_sprite_ids.push(asset.id);
        }

        // Storage object: present but unknown to the catalog, or an orphan
        // file with no row behind it.
        let delete_storage = !asset.storage_missing
            && (asset.furnidata_missing || asset.database_missing);
        if delete_storage {
            plan.storage_keys
                .push(format!("{BUNDLE_PREFIX}{}", asset.name));
        }

        // Catalog entry: known to the catalog but missing a source, or
        // failing validation. The id is used even when 0.
        let mut remove_from_catalog = !asset.furnidata_missing
            && (asset.database_missing || asset.storage_missing);
        if asset
            .mismatches
            .iter()
            .any(|m| m.starts_with(VALIDATION_MISMATCH_PREFIX))
        {
            remove_from_catalog = true;
        }
        if remove_from_catalog {
            plan.catalog_ids.push(asset.id);
        }
    }

    plan
}
