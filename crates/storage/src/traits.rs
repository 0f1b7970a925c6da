//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::pin::Pin;

/// A boxed stream of object keys for streaming list operations.
pub type KeyStream = Pin<Box<dyn Stream<Item = StorageResult<String>> + Send>>;

/// A single failed deletion from a bulk remove.
#[derive(Clone, Debug)]
pub struct RemoveFailure {
    /// The key that could not be deleted.
    pub key: String,
    /// Backend-specific failure description.
    pub message: String,
}

/// Object store abstraction over one bucket.
///
/// The backend is constructed against a fixed bucket (or local root); keys are
/// always bucket-relative.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Check whether the configured bucket exists.
    async fn bucket_exists(&self) -> StorageResult<bool>;

    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get an object's content.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Put an object with the given content type.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Delete a single object.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// List objects whose key starts with `prefix`, recursively, as a stream.
    ///
    /// The prefix is a plain string prefix in the S3 sense; it need not end at
    /// a path separator. Yielded keys are full bucket-relative keys.
    async fn list_stream(&self, prefix: &str) -> StorageResult<KeyStream>;

    /// Bulk-delete objects. Per-key failures are collected, not propagated:
    /// the returned list holds one entry per key that could not be removed.
    async fn remove_objects(&self, keys: Vec<String>) -> StorageResult<Vec<RemoveFailure>>;

    /// Get the name of this storage backend ("s3", "filesystem").
    /// Used for logging.
    fn backend_name(&self) -> &'static str;

    /// Verify storage backend connectivity.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
