//! The sync orchestrator.
//!
//! Phases run in fixed order: load catalog, integrity check, schema
//! evolution, duplicate cleanup, batch data update, deletion planning and
//! execution. A fatal phase error stops the run and lands in the report's
//! `errors` list; preceding phases are not rolled back. Duplicate cleanup is
//! the one phase whose failure is logged and swallowed.

use crate::catalog_io::{load_catalog, save_catalog};
use crate::detail::{DetailReport, check_item};
use crate::error::{SyncError, SyncResult};
use crate::integrity::build_asset_report;
use crate::plan::plan_deletions;
use crate::report::{IntegrityReport, SyncReport};
use crate::scanner::scan_bundles;
use armoire_core::catalog::PartColors;
use armoire_core::sanitize::{column_max_length, sanitize_latin1, truncate_chars};
use armoire_core::{Catalog, CatalogItem, FieldTag, FieldValue};
use armoire_db::schema::evolve_schema;
use armoire_db::{BatchUpdater, CatalogDatabase, NormalizedDbRow, ValueModifier};
use armoire_storage::ObjectStore;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio_util::sync::CancellationToken;

/// Reconciliation engine over one storage bucket and one emulator database.
pub struct SyncService {
    storage: Arc<dyn ObjectStore>,
    db: Arc<dyn CatalogDatabase>,
}

async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = SyncResult<T>>,
) -> SyncResult<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(SyncError::Cancelled),
        result = fut => result,
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

impl SyncService {
    pub fn new(storage: Arc<dyn ObjectStore>, db: Arc<dyn CatalogDatabase>) -> Self {
        Self { storage, db }
    }

    /// Run the full three-source integrity check.
    pub async fn check_integrity(&self, cancel: &CancellationToken) -> SyncResult<IntegrityReport> {
        let started = Instant::now();
        let catalog = cancellable(cancel, load_catalog(self.storage.as_ref())).await?;
        let report = self.integrity_for(&catalog, cancel).await?;
        tracing::info!(
            total_assets = report.total_assets,
            with_mismatches = report.with_mismatches,
            elapsed = ?started.elapsed(),
            "integrity check completed"
        );
        Ok(report)
    }

    /// Deep check of a single item by id, classname, name, or filename.
    pub async fn check_item(&self, identifier: &str) -> SyncResult<DetailReport> {
        check_item(self.storage.as_ref(), self.db.as_ref(), identifier).await
    }

    async fn integrity_for(
        &self,
        catalog: &Catalog,
        cancel: &CancellationToken,
    ) -> SyncResult<IntegrityReport> {
        let started = Instant::now();

        let stored = scan_bundles(self.storage.clone(), cancel).await?;
        let rows = cancellable(cancel, async {
            self.db.load_rows().await.map_err(SyncError::from)
        })
        .await?;
        let rows: HashMap<i64, NormalizedDbRow> =
            rows.into_iter().map(|row| (row.sprite_id, row)).collect();

        let mut report = build_asset_report(catalog, &stored, &rows);
        report.generated_at = now_rfc3339();
        report.execution_time = format!("{:.2?}", started.elapsed());
        Ok(report)
    }

    /// Execute a full sync. `confirmed` must be true; previews go through
    /// [`Self::check_integrity`] instead. `skip_data` skips only the batch
    /// update phase.
    pub async fn full_sync(
        &self,
        cancel: &CancellationToken,
        confirmed: bool,
        skip_data: bool,
    ) -> SyncResult<SyncReport> {
        if !confirmed {
            return Err(SyncError::ConfirmationRequired);
        }

        let started = Instant::now();
        let mut report = SyncReport::default();

        // 1. Load the catalog; it is the source of truth for everything after.
        tracing::info!("loading catalog");
        let mut catalog =
            match cancellable(cancel, load_catalog(self.storage.as_ref())).await {
                Ok(catalog) => catalog,
                Err(e) => {
                    report.errors.push(format!("Failed to load FurniData: {e}"));
                    return Ok(finish(report, started));
                }
            };

        // 2. Integrity check drives both the update and deletion phases.
        tracing::info!("running integrity check");
        let integrity = match self.integrity_for(&catalog, cancel).await {
            Ok(integrity) => integrity,
            Err(e) => {
                report.errors.push(format!("Integrity check failed: {e}"));
                return Ok(finish(report, started));
            }
        };

        // 3. Schema evolution.
        tracing::info!("syncing database schema");
        match cancellable(cancel, async {
            evolve_schema(self.db.as_ref()).await.map_err(SyncError::from)
        })
        .await
        {
            Ok(changes) => {
                tracing::info!(changes = changes.len(), "schema sync completed");
                report.schema_changes = changes;
            }
            Err(e) => {
                report.errors.push(format!("Schema sync failed: {e}"));
                return Ok(finish(report, started));
            }
        }

        // 4. Duplicate cleanup, before updates so collapsed rows are not
        // written to. Non-fatal.
        match cancellable(cancel, async {
            self.db
                .collapse_duplicate_sprites()
                .await
                .map_err(SyncError::from)
        })
        .await
        {
            Ok(0) => tracing::info!("no duplicate rows found"),
            Ok(removed) => tracing::info!(removed, "removed duplicate rows"),
            Err(SyncError::Cancelled) => {
                report.errors.push("Sync cancelled".to_string());
                return Ok(finish(report, started));
            }
            Err(e) => tracing::error!(error = %e, "duplicate cleanup failed"),
        }

        // 5. Batch update of mismatched rows.
        if skip_data {
            tracing::info!("data sync skipped");
        } else {
            match self.sync_data_batch(&catalog, &integrity, cancel).await {
                Ok(rows_updated) => {
                    tracing::info!(rows_updated, "data sync completed");
                    report.rows_updated = rows_updated;
                }
                Err(e) => {
                    report.errors.push(format!("Data sync failed: {e}"));
                    return Ok(finish(report, started));
                }
            }
        }

        // 6. Deletions.
        if let Err(e) = self
            .remove_missing_assets(&mut catalog, &integrity, &mut report, cancel)
            .await
        {
            report.errors.push(format!("Asset removal failed: {e}"));
            return Ok(finish(report, started));
        }

        report.assets_deleted =
            report.storage_deleted + report.database_deleted + report.furnidata_deleted;

        tracing::info!(
            rows_updated = report.rows_updated,
            database_deleted = report.database_deleted,
            storage_deleted = report.storage_deleted,
            furnidata_deleted = report.furnidata_deleted,
            elapsed = ?started.elapsed(),
            "sync completed"
        );
        Ok(finish(report, started))
    }

    /// Update only the rows the integrity report flagged as mismatched, one
    /// column at a time.
    async fn sync_data_batch(
        &self,
        catalog: &Catalog,
        integrity: &IntegrityReport,
        cancel: &CancellationToken,
    ) -> SyncResult<u64> {
        let profile = self.db.profile();
        let active = catalog.active_items();

        let mismatch_items: Vec<CatalogItem> = integrity
            .assets
            .iter()
            .filter(|asset| !asset.mismatches.is_empty())
            .filter_map(|asset| active.get(&asset.id).cloned())
            .collect();

        tracing::info!(
            assets_with_mismatches = mismatch_items.len(),
            mappings = profile.mappings.len(),
            "starting targeted data sync"
        );

        if mismatch_items.is_empty() {
            tracing::info!("no mismatches found, skipping data sync");
            return Ok(0);
        }

        let updater = BatchUpdater::new(
            self.db.as_ref(),
            profile.table,
            profile.sprite_id_column(),
            FieldTag::Id,
        );

        let mut total = 0;
        for mapping in profile.mappings {
            if mapping.tag == FieldTag::Id {
                continue;
            }
            let modifier = value_modifier(mapping.column);
            total += cancellable(cancel, async {
                updater
                    .update_column(&mismatch_items, mapping, Some(modifier.as_ref()))
                    .await
                    .map_err(SyncError::from)
            })
            .await?;
        }
        Ok(total)
    }

    /// Execute the deletion plan across the three stores. Deletion is atomic
    /// per store but not across them.
    async fn remove_missing_assets(
        &self,
        catalog: &mut Catalog,
        integrity: &IntegrityReport,
        report: &mut SyncReport,
        cancel: &CancellationToken,
    ) -> SyncResult<()> {
        let plan = plan_deletions(integrity);
        tracing::info!(
            db_rows = plan.db_sprite_ids.len(),
            storage_objects = plan.storage_keys.len(),
            catalog_entries = plan.catalog_ids.len(),
            "asset removal plan"
        );

        if !plan.db_sprite_ids.is_empty() {
            match cancellable(cancel, async {
                self.db
                    .delete_by_sprite_ids(&plan.db_sprite_ids)
                    .await
                    .map_err(SyncError::from)
            })
            .await
            {
                Ok(deleted) => {
                    tracing::info!(
                        rows_affected = deleted,
                        expected = plan.db_sprite_ids.len(),
                        "database deletion executed"
                    );
                    report.database_deleted = deleted;
                }
                Err(SyncError::Cancelled) => return Err(SyncError::Cancelled),
                Err(e) => tracing::error!(error = %e, "database deletion failed"),
            }
        }

        if !plan.storage_keys.is_empty() {
            let total = plan.storage_keys.len() as u64;
            match cancellable(cancel, async {
                self.storage
                    .remove_objects(plan.storage_keys.clone())
                    .await
                    .map_err(SyncError::from)
            })
            .await
            {
                Ok(failures) => {
                    for failure in &failures {
                        tracing::warn!(key = %failure.key, error = %failure.message, "storage delete failed");
                    }
                    report.storage_deleted = total - failures.len() as u64;
                }
                Err(SyncError::Cancelled) => return Err(SyncError::Cancelled),
                Err(e) => {
                    report
                        .errors
                        .push(format!("Storage deletion failed: {e}"));
                }
            }
        }

        if !plan.catalog_ids.is_empty() {
            report.furnidata_deleted = plan.catalog_ids.len() as u64;
            tracing::info!(
                count = plan.catalog_ids.len(),
                "removing ghost items from FurniData"
            );
            catalog.remove_ids(&plan.catalog_ids.iter().copied().collect());
            cancellable(cancel, save_catalog(self.storage.as_ref(), catalog)).await?;
            tracing::info!("FurniData updated");
        }

        Ok(())
    }
}

fn finish(mut report: SyncReport, started: Instant) -> SyncReport {
    report.execution_time = format!("{:.2?}", started.elapsed());
    report
}

/// Value modifier applied to every column update: serializes `partcolors`
/// (skipping empty lists), sanitizes and truncates strings to the column
/// maximum, passes everything else through.
fn value_modifier(column: &'static str) -> Box<ValueModifier<'static>> {
    Box::new(move |_item, tag, value| {
        if tag == FieldTag::Partcolors {
            return match value {
                FieldValue::Colors(color) if !color.is_empty() => {
                    let json = serde_json::to_string(&PartColors { color })
                        .map_err(|e| e.to_string())?;
                    Ok(Some(FieldValue::Text(json)))
                }
                _ => Ok(None),
            };
        }

        if let FieldValue::Text(text) = value {
            let mut text = sanitize_latin1(&text);
            if let Some(max) = column_max_length(column)
                && text.chars().count() > max
            {
                text = truncate_chars(&text, max);
            }
            return Ok(Some(FieldValue::Text(text)));
        }

        Ok(Some(value))
    })
}
