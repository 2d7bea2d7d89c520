//! Test fixtures: real encoded images of arbitrary size.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(gradient(width, height))
        .write_to(&mut out, format)
        .expect("encode fixture");
    out.into_inner()
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn gif(width: u32, height: u32) -> Vec<u8> {
    let rgba = image::DynamicImage::ImageRgb8(gradient(width, height)).to_rgba8();
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(rgba)
        .write_to(&mut out, ImageFormat::Gif)
        .expect("encode fixture");
    out.into_inner()
}

/// Decode an encoded derivative and return `(format, width, height)`.
pub fn inspect(data: &[u8]) -> (ImageFormat, u32, u32) {
    let format = image::guess_format(data).expect("recognisable image");
    let decoded = image::load_from_memory(data).expect("decodable image");
    (format, decoded.width(), decoded.height())
}
