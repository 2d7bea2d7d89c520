//! Image processor - decoding

use super::ImageProcessingError;
use crate::metadata::ImageMetadata;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Decode `data`, sniffing the format from its content rather than any name.
    pub fn decode(data: &[u8]) -> Result<(DynamicImage, ImageMetadata), ImageProcessingError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ImageProcessingError::Decode(e.to_string()))?;

        let format = reader
            .format()
            .map(|f| format!("{:?}", f))
            .ok_or_else(|| ImageProcessingError::Decode("unrecognized image format".to_string()))?;

        let img = reader
            .decode()
            .map_err(|e| ImageProcessingError::Decode(e.to_string()))?;

        let (width, height) = img.dimensions();
        let metadata = ImageMetadata {
            width,
            height,
            format,
            size_bytes: Some(data.len() as u64),
        };

        Ok((img, metadata))
    }
}
