//! Resizer Core Library
//!
//! This crate provides the configuration, error taxonomy, domain models and the
//! shared object naming rules used by both the upload authorizer and the
//! derivative generator.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod naming;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, LogFormat, ResizerConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use naming::{derivative_key, derivative_key_for, ObjectKey};
pub use storage_types::StorageBackend;
