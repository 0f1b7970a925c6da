//! Parallel enumeration of the bundle prefix.
//!
//! The bundle prefix is one very large flat namespace. Listing it serially
//! pays per-page round trips back to back; instead the keyspace is split by
//! the first character after the prefix across a fixed 64-character alphabet,
//! and every partition is listed concurrently. The merged result is a
//! deduplicated set of basenames.
//!
//! The first listing error is parked in a shared slot and flips a flag that
//! the other partitions observe between emissions, so they exit cooperatively
//! rather than being torn down mid-request. Caller cancellation propagates
//! the same way.

use crate::error::{SyncError, SyncResult};
use armoire_storage::ObjectStore;
use futures::StreamExt;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Root prefix holding all furniture bundles.
pub const BUNDLE_PREFIX: &str = "bundled/furniture/";

/// Partition alphabet: every character a bundle basename may start with.
pub const PARTITION_ALPHABET: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

struct ScanState {
    names: Mutex<HashSet<String>>,
    first_error: Mutex<Option<SyncError>>,
    failed: AtomicBool,
}

impl ScanState {
    async fn record_error(&self, error: SyncError) {
        let mut slot = self.first_error.lock().await;
        if slot.is_none() {
            *slot = Some(error);
        }
        self.failed.store(true, Ordering::Release);
    }

    fn should_stop(&self, cancel: &CancellationToken) -> bool {
        cancel.is_cancelled() || self.failed.load(Ordering::Acquire)
    }
}

/// Enumerate every `.nitro`-holding key under [`BUNDLE_PREFIX`] and return
/// the set of basenames (keys with the prefix stripped).
///
/// Returns the first observed listing error, or [`SyncError::Cancelled`] when
/// the caller's token fires first.
pub async fn scan_bundles(
    store: Arc<dyn ObjectStore>,
    cancel: &CancellationToken,
) -> SyncResult<HashSet<String>> {
    let state = Arc::new(ScanState {
        names: Mutex::new(HashSet::new()),
        first_error: Mutex::new(None),
        failed: AtomicBool::new(false),
    });

    let mut handles = Vec::with_capacity(PARTITION_ALPHABET.len());
    for partition in PARTITION_ALPHABET.chars() {
        let store = store.clone();
        let state = state.clone();
        let cancel = cancel.clone();

        handles.push(tokio::spawn(async move {
            if state.should_stop(&cancel) {
                return;
            }

            let prefix = format!("{BUNDLE_PREFIX}{partition}");
            let mut stream = match store.list_stream(&prefix).await {
                Ok(stream) => stream,
                Err(e) => {
                    state.record_error(e.into()).await;
                    return;
                }
            };

            while let Some(result) = stream.next().await {
                if state.should_stop(&cancel) {
                    return;
                }
                match result {
                    Ok(key) => {
                        let name = key.strip_prefix(BUNDLE_PREFIX).unwrap_or(&key);
                        if name.is_empty() || name.ends_with('/') {
                            continue;
                        }
                        state.names.lock().await.insert(name.to_string());
                    }
                    Err(e) => {
                        state.record_error(e.into()).await;
                        return;
                    }
                }
            }
        }));
    }

    for handle in handles {
        // A panicking partition task surfaces as a listing failure.
        if let Err(e) = handle.await {
            state
                .record_error(SyncError::Storage(armoire_storage::StorageError::Io(
                    std::io::Error::other(format!("partition scan task failed: {e}")),
                )))
                .await;
        }
    }

    if let Some(error) = state.first_error.lock().await.take() {
        return Err(error);
    }
    if cancel.is_cancelled() {
        return Err(SyncError::Cancelled);
    }

    let mut names = state.names.lock().await;
    Ok(std::mem::take(&mut *names))
}
