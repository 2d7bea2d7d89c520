//! Resizer Processing Library
//!
//! Filename validation and the raster work behind derivatives: decoding,
//! shrink-only bounding-box resizing and re-encoding. Everything here is
//! synchronous and CPU-bound; async callers run it on a blocking thread.

#[cfg(feature = "image")]
pub mod image;
pub mod metadata;
pub mod validator;

#[cfg(feature = "image")]
pub use crate::image::{
    EncodedImage, ImageProcessingError, ImageProcessor, ImageResize, ImageTransformer,
    OutputFormat,
};
pub use metadata::ImageMetadata;
pub use validator::{content_type_for_extension, MediaValidator, ValidatedFilename, ValidationError};
