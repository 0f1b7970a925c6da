//! Report types emitted by the integrity checker and the sync orchestrator.

use serde::Serialize;

/// One asset in the fused three-source view, keyed by its storage basename.
#[derive(Clone, Debug, Default, Serialize)]
pub struct AssetEntry {
    /// Catalog item id (0 when the asset is unknown to the catalog).
    pub id: i64,
    /// Storage basename (`<base>.nitro`).
    pub name: String,
    /// Classname, from the catalog or synthesized from the DB row.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub classname: String,
    pub furnidata_missing: bool,
    pub storage_missing: bool,
    pub database_missing: bool,
    /// Field-level disagreements between the catalog item and its DB row.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mismatches: Vec<String>,
}

impl AssetEntry {
    /// Whether this entry belongs in the emitted asset list.
    pub fn has_issue(&self) -> bool {
        self.furnidata_missing
            || self.storage_missing
            || self.database_missing
            || !self.mismatches.is_empty()
    }
}

/// The fused integrity view across catalog, storage, and database.
///
/// Clean assets are aggregated into `total_assets` but not enumerated in
/// `assets`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IntegrityReport {
    pub total_assets: usize,
    pub furnidata_missing: usize,
    pub storage_missing: usize,
    pub database_missing: usize,
    pub with_mismatches: usize,
    pub assets: Vec<AssetEntry>,
    pub generated_at: String,
    pub execution_time: String,
}

/// Outcome of a full sync run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SyncReport {
    pub schema_changes: Vec<String>,
    pub rows_updated: u64,
    pub assets_deleted: u64,
    pub storage_deleted: u64,
    pub database_deleted: u64,
    pub furnidata_deleted: u64,
    pub execution_time: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}
