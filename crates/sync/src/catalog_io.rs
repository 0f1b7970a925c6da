//! Catalog document I/O against the object store.

use crate::error::{SyncError, SyncResult};
use armoire_core::Catalog;
use armoire_storage::{ObjectStore, StorageError};
use bytes::Bytes;

/// Object key of the canonical catalog document.
pub const CATALOG_KEY: &str = "gamedata/FurnitureData.json";

/// Content type the catalog is written with.
pub const CATALOG_CONTENT_TYPE: &str = "application/json";

/// Fetch and parse the catalog.
///
/// Field-level validation is deliberately not applied here; the integrity
/// report builder records validation problems as mismatches instead of
/// rejecting the load.
pub async fn load_catalog(store: &dyn ObjectStore) -> SyncResult<Catalog> {
    if !store.bucket_exists().await? {
        return Err(SyncError::BucketMissing);
    }

    let data = match store.get(CATALOG_KEY).await {
        Ok(data) => data,
        Err(StorageError::NotFound(_)) => {
            return Err(SyncError::CatalogMissing(CATALOG_KEY.to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    Catalog::from_json(&data).map_err(|e| SyncError::CatalogMalformed(e.to_string()))
}

/// Serialize the catalog with 2-space indentation and overwrite the stored
/// document.
pub async fn save_catalog(store: &dyn ObjectStore, catalog: &Catalog) -> SyncResult<()> {
    let json = catalog.to_pretty_json()?;
    store
        .put(CATALOG_KEY, Bytes::from(json), CATALOG_CONTENT_TYPE)
        .await?;
    Ok(())
}
