//! Data models for the application
//!
//! Request and response bodies of the two pipeline entry points, plus the
//! storage event notification shape delivered by S3-compatible providers.

mod derivative;
mod storage_event;
mod upload;

pub use derivative::*;
pub use storage_event::*;
pub use upload::*;
