use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Dimensions of `(orig_width, orig_height)` scaled to fit a `max_edge` square.
    ///
    /// Aspect ratio is preserved and images already inside the box keep their
    /// size; this never upscales.
    pub fn fit_dimensions(orig_width: u32, orig_height: u32, max_edge: u32) -> (u32, u32) {
        if max_edge == 0 || (orig_width <= max_edge && orig_height <= max_edge) {
            return (orig_width, orig_height);
        }

        let scale = max_edge as f64 / orig_width.max(orig_height) as f64;
        let scaled = |edge: u32| ((edge as f64 * scale).round() as u32).clamp(1, max_edge);

        (scaled(orig_width), scaled(orig_height))
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Shrink `img` to fit a `max_edge` square. Smaller images are returned unchanged.
    pub fn thumbnail(img: &DynamicImage, max_edge: u32) -> DynamicImage {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_dimensions(orig_width, orig_height, max_edge);

        if (width, height) == (orig_width, orig_height) {
            return img.clone();
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        img.resize_exact(width, height, filter)
    }
}
