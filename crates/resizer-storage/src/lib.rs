//! Resizer Storage Library
//!
//! Storage abstraction over the object stores holding originals and
//! derivatives. Each [`Storage`] instance is bound to exactly one bucket; the
//! service builds one for the upload bucket and one for the derivative bucket.
//!
//! # Storage key format
//!
//! Keys are flat object names such as `photo-<uuid>.jpg`. Keys must not be
//! empty or start with a path separator; [`validate_key`] enforces this for
//! every backend. The local backend also rejects `..` path components.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::validate_key;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use resizer_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ObjectVisibility, Storage, StorageError, StorageResult};
