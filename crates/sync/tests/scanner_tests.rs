// Scanner behavior: skip rules, error abort, cancellation.

mod common;

use armoire_storage::{KeyStream, ObjectStore, RemoveFailure, StorageError, StorageResult};
use armoire_sync::{BUNDLE_PREFIX, SyncError, scan_bundles};
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

/// Listing-only store: serves a fixed key set, optionally failing one
/// partition.
struct ListingStore {
    keys: Vec<String>,
    fail_prefix: Option<String>,
    listings: AtomicUsize,
}

impl ListingStore {
    fn new(keys: &[&str]) -> Self {
        Self {
            keys: keys.iter().map(|k| k.to_string()).collect(),
            fail_prefix: None,
            listings: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ObjectStore for ListingStore {
    async fn bucket_exists(&self) -> StorageResult<bool> {
        Ok(true)
    }

    async fn exists(&self, _key: &str) -> StorageResult<bool> {
        Ok(false)
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        Err(StorageError::NotFound(key.to_string()))
    }

    async fn put(&self, _key: &str, _data: Bytes, _content_type: &str) -> StorageResult<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> StorageResult<()> {
        Ok(())
    }

    async fn list_stream(&self, prefix: &str) -> StorageResult<KeyStream> {
        self.listings.fetch_add(1, Ordering::SeqCst);

        if self.fail_prefix.as_deref() == Some(prefix) {
            let stream = futures::stream::iter(vec![Err(StorageError::Io(
                std::io::Error::other("listing exploded"),
            ))]);
            return Ok(Box::pin(stream));
        }

        let keys: Vec<StorageResult<String>> = self
            .keys
            .iter()
            .filter(|k| k.starts_with(prefix))
            .map(|k| Ok(k.clone()))
            .collect();
        Ok(Box::pin(futures::stream::iter(keys)))
    }

    async fn remove_objects(&self, _keys: Vec<String>) -> StorageResult<Vec<RemoveFailure>> {
        Ok(Vec::new())
    }

    fn backend_name(&self) -> &'static str {
        "listing-test"
    }
}

#[tokio::test]
async fn scan_merges_partitions_and_strips_prefix() {
    let store = Arc::new(ListingStore::new(&[
        "bundled/furniture/apple.nitro",
        "bundled/furniture/Avocado.nitro",
        "bundled/furniture/9ball.nitro",
        "bundled/furniture/_under.nitro",
        "bundled/furniture/-dash.nitro",
    ]));

    let names = scan_bundles(store.clone(), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(names.len(), 5);
    assert!(names.contains("apple.nitro"));
    assert!(names.contains("Avocado.nitro"));
    assert!(names.contains("9ball.nitro"));
    assert!(names.contains("_under.nitro"));
    assert!(names.contains("-dash.nitro"));

    // One listing per partition of the 64-character alphabet.
    assert_eq!(store.listings.load(Ordering::SeqCst), 64);
}

#[tokio::test]
async fn scan_skips_bare_prefix_and_folder_keys() {
    let store = Arc::new(ListingStore::new(&[
        "bundled/furniture/",
        "bundled/furniture/a/",
        "bundled/furniture/abc.nitro",
    ]));

    let names = scan_bundles(store, &CancellationToken::new()).await.unwrap();
    assert_eq!(names.len(), 1);
    assert!(names.contains("abc.nitro"));
}

#[tokio::test]
async fn scan_surfaces_the_first_listing_error() {
    let mut store = ListingStore::new(&[
        "bundled/furniture/abc.nitro",
        "bundled/furniture/fed.nitro",
    ]);
    store.fail_prefix = Some(format!("{BUNDLE_PREFIX}f"));

    let result = scan_bundles(Arc::new(store), &CancellationToken::new()).await;
    match result {
        Err(SyncError::Storage(StorageError::Io(e))) => {
            assert!(e.to_string().contains("listing exploded"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn scan_reports_cancellation() {
    let store = Arc::new(ListingStore::new(&["bundled/furniture/abc.nitro"]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    match scan_bundles(store, &cancel).await {
        Err(SyncError::Cancelled) => {}
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn scan_over_filesystem_store_finds_nested_keys() {
    let dir = tempdir().unwrap();
    let catalog = common::catalog_of(vec![], vec![]);
    let store = common::seeded_store(
        dir.path(),
        &catalog,
        &["chair.nitro", "c/cabinet.nitro"],
    )
    .await;

    let names = scan_bundles(Arc::new(store), &CancellationToken::new())
        .await
        .unwrap();
    assert!(names.contains("chair.nitro"));
    assert!(names.contains("c/cabinet.nitro"));
}
