//! Resizer API Library
//!
//! HTTP surface of the upload-and-resize pipeline: the upload authorization
//! endpoint, the storage event endpoint that drives derivative generation, and
//! health and OpenAPI routes.

mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::{DerivativeGenerator, UploadAuthorizer};
pub use state::AppState;
