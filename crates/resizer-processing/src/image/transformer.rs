//! Derivative encoding
//!
//! A derivative keeps the extension of its original, so the output format is
//! chosen from that extension rather than from the decoded bytes.

use super::resize::ImageResize;
use super::ImageProcessingError;
use resizer_core::naming::{file_name, split_extension};
use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Frame, GenericImageView, ImageFormat};
use std::io::Cursor;

/// Output format of a derivative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
}

impl OutputFormat {
    /// Format for an extension, with or without leading dot, any case.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "gif" => Some(OutputFormat::Gif),
            _ => None,
        }
    }

    /// Format implied by the extension of an object key.
    pub fn for_key(key: &str) -> Result<Self, ImageProcessingError> {
        let (_, extension) = split_extension(file_name(key));
        Self::from_extension(extension).ok_or_else(|| {
            ImageProcessingError::UnsupportedFormat(format!(
                "No derivative format for extension '{}'",
                extension
            ))
        })
    }
}

/// Encoded derivative bytes plus their final dimensions
#[derive(Debug, Clone)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
}

pub struct ImageTransformer;

impl ImageTransformer {
    /// Shrink `img` into a `max_edge` box and encode it as `format`.
    pub fn render(
        img: &DynamicImage,
        max_edge: u32,
        format: OutputFormat,
        jpeg_quality: u8,
    ) -> Result<EncodedImage, ImageProcessingError> {
        let resized = ImageResize::thumbnail(img, max_edge);
        let (width, height) = resized.dimensions();
        let data = Self::encode(&resized, format, jpeg_quality)?;

        tracing::debug!(
            max_edge,
            width,
            height,
            format = ?format,
            size_bytes = data.len(),
            "Derivative rendered"
        );

        Ok(EncodedImage {
            data,
            width,
            height,
            format,
        })
    }

    /// Encode `img` as `format`. JPEG output drops alpha.
    pub fn encode(
        img: &DynamicImage,
        format: OutputFormat,
        jpeg_quality: u8,
    ) -> Result<Vec<u8>, ImageProcessingError> {
        let mut buffer = Vec::new();

        match format {
            OutputFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100));
                img.to_rgb8()
                    .write_with_encoder(encoder)
                    .map_err(|e| ImageProcessingError::Encode(e.to_string()))?;
            }
            OutputFormat::Png => {
                img.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
                    .map_err(|e| ImageProcessingError::Encode(e.to_string()))?;
            }
            OutputFormat::Gif => {
                let mut encoder = GifEncoder::new(&mut buffer);
                encoder
                    .encode_frame(Frame::new(img.to_rgba8()))
                    .map_err(|e| ImageProcessingError::Encode(e.to_string()))?;
            }
        }

        Ok(buffer)
    }
}
