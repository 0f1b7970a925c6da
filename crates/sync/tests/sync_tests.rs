// Full sync: phase order, convergence, and error policy.

mod common;

use armoire_core::Catalog;
use armoire_db::{Dialect, NormalizedDbRow};
use armoire_storage::{FilesystemBackend, ObjectStore};
use armoire_sync::{SyncError, SyncService, load_catalog};
use common::{MockDatabase, catalog_of, floor_item, row_for, seeded_store};
use std::sync::Arc;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

struct Fixture {
    _dir: tempfile::TempDir,
    storage: Arc<FilesystemBackend>,
    db: Arc<MockDatabase>,
    service: SyncService,
}

async fn fixture(catalog: &Catalog, bundles: &[&str], rows: Vec<NormalizedDbRow>) -> Fixture {
    let dir = tempdir().unwrap();
    let storage = Arc::new(seeded_store(dir.path(), catalog, bundles).await);
    let db = Arc::new(MockDatabase::new(Dialect::Arcturus, rows));
    let service = SyncService::new(storage.clone(), db.clone());
    Fixture {
        _dir: dir,
        storage,
        db,
        service,
    }
}

#[tokio::test]
async fn sync_requires_confirmation() {
    let catalog = catalog_of(vec![], vec![]);
    let fx = fixture(&catalog, &[], vec![]).await;

    match fx
        .service
        .full_sync(&CancellationToken::new(), false, false)
        .await
    {
        Err(SyncError::ConfirmationRequired) => {}
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn sync_on_clean_state_changes_nothing_but_schema() {
    let chair = floor_item(1, "chair", "Chair");
    let catalog = catalog_of(vec![chair.clone()], vec![]);
    let fx = fixture(&catalog, &["chair.nitro"], vec![row_for(&chair, 10)]).await;

    let report = fx
        .service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.rows_updated, 0);
    assert_eq!(report.assets_deleted, 0);
    // Evolution adds the arcturus new columns on first run.
    assert!(!report.schema_changes.is_empty());
    assert!(fx.db.has_column("furniline"));
    assert!(fx.storage.exists("bundled/furniture/chair.nitro").await.unwrap());
}

#[tokio::test]
async fn unregistered_storage_object_is_deleted() {
    let chair = floor_item(1, "chair", "Chair");
    let catalog = catalog_of(vec![chair.clone()], vec![]);
    let fx = fixture(
        &catalog,
        &["chair.nitro", "extra.nitro"],
        vec![row_for(&chair, 10)],
    )
    .await;

    let report = fx
        .service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.storage_deleted, 1);
    assert!(!fx.storage.exists("bundled/furniture/extra.nitro").await.unwrap());
    assert!(fx.storage.exists("bundled/furniture/chair.nitro").await.unwrap());
}

#[tokio::test]
async fn ghost_catalog_entry_is_removed_zero_tolerance() {
    let ghost = floor_item(1, "table*1", "T");
    let catalog = catalog_of(vec![ghost], vec![]);
    let fx = fixture(&catalog, &[], vec![]).await;

    let report = fx
        .service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.furnidata_deleted, 1);

    let rewritten = load_catalog(fx.storage.as_ref()).await.unwrap();
    assert!(rewritten.is_empty());
}

#[tokio::test]
async fn mismatched_row_is_converged_to_the_catalog() {
    let mut chair = floor_item(1, "chair", "The \u{201C}Royal\u{201D} Chair");
    chair.cansiton = true;
    let catalog = catalog_of(vec![chair.clone()], vec![]);

    let mut row = row_for(&chair, 10);
    row.public_name = "Wrong Name".to_string();
    row.can_sit = false;
    let fx = fixture(&catalog, &["chair.nitro"], vec![row]).await;

    let report = fx
        .service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    assert!(report.errors.is_empty());
    assert!(report.rows_updated > 0);

    let rows = fx.db.rows();
    assert_eq!(rows.len(), 1);
    // Smart quotes land as ASCII quotes after Latin-1 sanitization.
    assert_eq!(rows[0].public_name, "The \"Royal\" Chair");
    assert!(rows[0].can_sit);
}

#[tokio::test]
async fn skip_data_leaves_mismatches_in_place() {
    let chair = floor_item(1, "chair", "Chair");
    let catalog = catalog_of(vec![chair.clone()], vec![]);
    let mut row = row_for(&chair, 10);
    row.public_name = "Wrong".to_string();
    let fx = fixture(&catalog, &["chair.nitro"], vec![row]).await;

    let report = fx
        .service
        .full_sync(&CancellationToken::new(), true, true)
        .await
        .unwrap();

    assert!(report.errors.is_empty());
    assert_eq!(report.rows_updated, 0);
    assert_eq!(fx.db.rows()[0].public_name, "Wrong");
}

#[tokio::test]
async fn duplicate_rows_collapse_to_highest_surrogate() {
    let chair = floor_item(1, "chair", "Chair");
    let catalog = catalog_of(vec![chair.clone()], vec![]);
    let fx = fixture(
        &catalog,
        &["chair.nitro"],
        vec![row_for(&chair, 10), row_for(&chair, 11)],
    )
    .await;

    fx.service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    let rows = fx.db.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 11);
}

#[tokio::test]
async fn second_integrity_run_after_sync_is_clean() {
    // One of everything wrong at once.
    let chair = floor_item(1, "chair", "Chair");
    let ghost = floor_item(2, "ghost_table", "Ghost Table");
    let mut lamp = floor_item(3, "lamp", "Fancy Lamp");
    lamp.canstandon = true;

    let catalog = catalog_of(vec![chair.clone(), ghost, lamp.clone()], vec![]);

    let mut lamp_row = row_for(&lamp, 30);
    lamp_row.public_name = "Dull Lamp".to_string();
    lamp_row.can_walk = false;

    let mut orphan_row = row_for(&floor_item(99, "orphanrow", "Orphan"), 99);
    orphan_row.sprite_id = 99;

    let fx = fixture(
        &catalog,
        &["chair.nitro", "lamp.nitro", "spare.nitro"],
        vec![row_for(&chair, 10), lamp_row, orphan_row],
    )
    .await;

    let report = fx
        .service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();
    assert!(report.errors.is_empty());
    assert_eq!(report.database_deleted, 1); // orphan row
    assert_eq!(report.storage_deleted, 1); // spare.nitro
    assert_eq!(report.furnidata_deleted, 1); // ghost_table
    assert!(report.rows_updated > 0); // lamp converged

    let second = fx
        .service
        .check_integrity(&CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(second.total_assets, 2);
    assert_eq!(second.furnidata_missing, 0);
    assert_eq!(second.storage_missing, 0);
    assert_eq!(second.database_missing, 0);
    assert_eq!(second.with_mismatches, 0);
    assert!(second.assets.is_empty());
}

#[tokio::test]
async fn missing_catalog_is_a_fatal_first_phase_error() {
    let dir = tempdir().unwrap();
    let storage = Arc::new(FilesystemBackend::new(dir.path()).await.unwrap());
    let db = Arc::new(MockDatabase::new(Dialect::Arcturus, vec![]));
    let service = SyncService::new(storage, db.clone());

    let report = service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Failed to load FurniData:"));
    assert!(report.schema_changes.is_empty());
    assert!(!db.has_column("furniline"));
}

#[tokio::test]
async fn schema_failure_stops_before_data_sync() {
    let chair = floor_item(1, "chair", "Chair");
    let catalog = catalog_of(vec![chair.clone()], vec![]);
    let dir = tempdir().unwrap();
    let storage = Arc::new(seeded_store(dir.path(), &catalog, &["chair.nitro"]).await);

    let mut row = row_for(&chair, 10);
    row.public_name = "Wrong".to_string();
    let mut db = MockDatabase::new(Dialect::Arcturus, vec![row]);
    db.fail_alter = true;
    let db = Arc::new(db);

    let service = SyncService::new(storage, db.clone());
    let report = service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with("Schema sync failed:"));
    assert!(report.errors[0].contains("failed to add column"));
    assert_eq!(report.rows_updated, 0);
    assert_eq!(db.rows()[0].public_name, "Wrong");
}

#[tokio::test]
async fn duplicate_cleanup_failure_is_swallowed() {
    let chair = floor_item(1, "chair", "Chair");
    let catalog = catalog_of(vec![chair.clone()], vec![]);
    let dir = tempdir().unwrap();
    let storage = Arc::new(seeded_store(dir.path(), &catalog, &["chair.nitro"]).await);

    let mut db = MockDatabase::new(Dialect::Arcturus, vec![row_for(&chair, 10)]);
    db.fail_cleanup = true;
    let db = Arc::new(db);

    let service = SyncService::new(storage, db);
    let report = service
        .full_sync(&CancellationToken::new(), true, false)
        .await
        .unwrap();

    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn cancelled_sync_reports_cancellation() {
    let chair = floor_item(1, "chair", "Chair");
    let catalog = catalog_of(vec![chair.clone()], vec![]);
    let fx = fixture(&catalog, &["chair.nitro"], vec![row_for(&chair, 10)]).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = fx.service.full_sync(&cancel, true, false).await.unwrap();
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].contains("cancelled"));
}
