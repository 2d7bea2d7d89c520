//! Pipeline services
//!
//! Both services receive their storage handles and settings at construction
//! and hold no mutable state, so one instance serves all requests.

pub mod derivative_generator;
pub mod upload_authorizer;

pub use derivative_generator::DerivativeGenerator;
pub use upload_authorizer::UploadAuthorizer;
