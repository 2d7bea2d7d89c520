//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Access granted to anonymous readers of a written object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectVisibility {
    Private,
    PublicRead,
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait.
/// An instance is bound to one bucket; keys are relative to that bucket.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Download an object by its key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Write `data` under `storage_key`, replacing any existing object.
    /// Returns the public URL for the uploaded object.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
        visibility: ObjectVisibility,
    ) -> StorageResult<String>;

    /// Generate a presigned PUT URL for a direct upload of exactly one object.
    ///
    /// The signature covers `content_type` and `visibility`, so the client must
    /// send matching `Content-Type` and ACL headers. Only supported by S3
    /// backends; other backends return a `ConfigError`.
    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        visibility: ObjectVisibility,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Public URL an object stored under `storage_key` is served from.
    /// The object does not need to exist yet.
    fn public_url(&self, storage_key: &str) -> String;

    /// Check if an object exists
    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    /// Name of the bucket this instance is bound to
    fn bucket(&self) -> &str;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
