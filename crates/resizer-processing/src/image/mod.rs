//! Image processing module
//!
//! - Decoding and metadata extraction (processor)
//! - Shrink-only bounding-box resizing (resize)
//! - Re-encoding in the format implied by a key's extension (transformer)

pub mod processor;
pub mod resize;
pub mod transformer;

use resizer_core::AppError;

pub use processor::ImageProcessor;
pub use resize::ImageResize;
pub use transformer::{EncodedImage, ImageTransformer, OutputFormat};

/// Image processing errors
#[derive(Debug, thiserror::Error)]
pub enum ImageProcessingError {
    /// Bytes are not a decodable raster image
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

impl From<ImageProcessingError> for AppError {
    fn from(err: ImageProcessingError) -> Self {
        match err {
            ImageProcessingError::Decode(msg) => AppError::Decode(msg),
            ImageProcessingError::UnsupportedFormat(msg) => AppError::Validation(msg),
            ImageProcessingError::Encode(msg) => AppError::Internal(format!("Image encoding failed: {}", msg)),
        }
    }
}
