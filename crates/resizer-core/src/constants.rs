//! Shared constants.

/// Long-edge bounding box of the "full" derivative.
pub const DEFAULT_FULL_SIZE_PX: u32 = 1000;

/// Long-edge bounding box of the "thumbnail" derivative.
pub const DEFAULT_THUMBNAIL_SIZE_PX: u32 = 200;

/// Lifetime of a signed upload URL.
pub const DEFAULT_UPLOAD_URL_EXPIRY_SECS: u64 = 300;

/// S3 refuses presigned URLs that live longer than seven days.
pub const MAX_UPLOAD_URL_EXPIRY_SECS: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_JPEG_QUALITY: u8 = 85;

pub const DEFAULT_MAX_SOURCE_SIZE_MB: usize = 25;

/// Extensions (lowercase, with leading dot) accepted for uploads.
pub const ALLOWED_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

/// Status string returned with every successful upload grant.
pub const STATUS_OK: &str = "OK";
