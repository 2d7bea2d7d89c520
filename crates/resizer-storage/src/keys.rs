//! Shared key validation for storage backends.
//!
//! Object keys are opaque names: dots anywhere in a key, `..` included, are
//! ordinary characters. Only the local backend maps keys onto a filesystem and
//! additionally rejects parent-directory components.

use crate::{StorageError, StorageResult};
use std::path::{Component, Path};

/// Reject keys that address nothing or are rooted.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey(
            "Storage key must not be empty".to_string(),
        ));
    }

    if storage_key.starts_with('/') || storage_key.starts_with('\\') {
        return Err(StorageError::InvalidKey(
            "Storage key must not start with a path separator".to_string(),
        ));
    }

    Ok(())
}

/// [`validate_key`] plus a check that every path component of the key stays
/// below the directory it is joined onto.
pub fn validate_relative_path(storage_key: &str) -> StorageResult<()> {
    validate_key(storage_key)?;

    let escapes = storage_key.split(['/', '\\']).any(|segment| segment == "..")
        || Path::new(storage_key)
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(StorageError::InvalidKey(
            "Storage key resolves outside storage directory".to_string(),
        ));
    }

    Ok(())
}

/// Percent-encode each path segment of a key for use in a URL.
pub fn url_path(storage_key: &str) -> String {
    storage_key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
