//! Configuration module
//!
//! Configuration is read once at startup, validated, and then passed to every
//! component explicitly. A missing bucket name or an out-of-range value is a
//! startup-fatal error.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_FULL_SIZE_PX, DEFAULT_JPEG_QUALITY, DEFAULT_MAX_SOURCE_SIZE_MB,
    DEFAULT_THUMBNAIL_SIZE_PX, DEFAULT_UPLOAD_URL_EXPIRY_SECS, MAX_UPLOAD_URL_EXPIRY_SECS,
};
use crate::storage_types::StorageBackend;

const DEFAULT_PORT: u16 = 4000;
const DEFAULT_REGION: &str = "us-east-1";

/// Console log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub log_format: LogFormat,
}

/// Upload and derivative pipeline settings
#[derive(Clone, Debug)]
pub struct ResizerConfig {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    /// Bucket receiving originals through signed uploads
    pub upload_bucket: String,
    /// Public bucket receiving derivatives
    pub derivative_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Pipeline configuration
    pub upload_url_expiry_secs: u64,
    pub full_size_px: u32,
    pub thumbnail_size_px: u32,
    pub jpeg_quality: u8,
    pub max_source_size_bytes: usize,
    /// Parent directory for per-record scratch directories
    pub scratch_dir: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ResizerConfig>);

impl Config {
    fn as_resizer(&self) -> &ResizerConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ResizerConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = ResizerConfig::from_lookup(lookup)?;
        Ok(Config(Box::new(config)))
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_resizer().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.as_resizer().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_resizer().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_resizer().base.environment
    }

    pub fn log_format(&self) -> LogFormat {
        self.as_resizer().base.log_format
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_resizer().storage_backend
    }

    pub fn upload_bucket(&self) -> &str {
        &self.as_resizer().upload_bucket
    }

    pub fn derivative_bucket(&self) -> &str {
        &self.as_resizer().derivative_bucket
    }

    pub fn s3_region(&self) -> &str {
        &self.as_resizer().s3_region
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_resizer().s3_endpoint.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_resizer().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_resizer().local_storage_base_url.as_deref()
    }

    pub fn upload_url_expiry_secs(&self) -> u64 {
        self.as_resizer().upload_url_expiry_secs
    }

    pub fn full_size_px(&self) -> u32 {
        self.as_resizer().full_size_px
    }

    pub fn thumbnail_size_px(&self) -> u32 {
        self.as_resizer().thumbnail_size_px
    }

    /// Ordered derivative sizes: full first, thumbnail second.
    pub fn derivative_sizes(&self) -> [u32; 2] {
        [self.full_size_px(), self.thumbnail_size_px()]
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.as_resizer().jpeg_quality
    }

    pub fn max_source_size_bytes(&self) -> usize {
        self.as_resizer().max_source_size_bytes
    }

    /// `SCRATCH_DIR`, or the system temporary directory when unset.
    pub fn scratch_dir(&self) -> PathBuf {
        self.as_resizer()
            .scratch_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(env::temp_dir)
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

/// Parse an optional numeric setting, falling back to `default` when unset.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, anyhow::Error>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number (got '{}')", key, raw)),
        None => Ok(default),
    }
}

impl ResizerConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = lookup("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        let base = BaseConfig {
            server_port: lookup("PORT")
                .unwrap_or_else(|| DEFAULT_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            log_format,
        };

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::S3,
        };

        let max_source_size_mb: usize =
            parse_or(&lookup, "MAX_SOURCE_SIZE_MB", DEFAULT_MAX_SOURCE_SIZE_MB)?;

        let config = ResizerConfig {
            base,
            storage_backend,
            upload_bucket: lookup("S3_BUCKET_NAME")
                .ok_or_else(|| anyhow::anyhow!("S3_BUCKET_NAME environment variable not set"))?,
            derivative_bucket: lookup("S3_DOWNLOAD_BUCKET_NAME").ok_or_else(|| {
                anyhow::anyhow!("S3_DOWNLOAD_BUCKET_NAME environment variable not set")
            })?,
            s3_region: lookup("S3_REGION")
                .or_else(|| lookup("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            s3_endpoint: lookup("S3_ENDPOINT"),
            local_storage_path: lookup("LOCAL_STORAGE_PATH"),
            local_storage_base_url: lookup("LOCAL_STORAGE_BASE_URL"),
            upload_url_expiry_secs: parse_or(
                &lookup,
                "UPLOAD_URL_EXPIRY_SECS",
                DEFAULT_UPLOAD_URL_EXPIRY_SECS,
            )?,
            full_size_px: parse_or(&lookup, "FULL_SIZE_PX", DEFAULT_FULL_SIZE_PX)?,
            thumbnail_size_px: parse_or(&lookup, "THUMBNAIL_SIZE_PX", DEFAULT_THUMBNAIL_SIZE_PX)?,
            jpeg_quality: parse_or(&lookup, "JPEG_QUALITY", DEFAULT_JPEG_QUALITY)?,
            max_source_size_bytes: max_source_size_mb * 1024 * 1024,
            scratch_dir: lookup("SCRATCH_DIR"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.upload_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("S3_BUCKET_NAME must not be empty"));
        }

        if self.derivative_bucket.trim().is_empty() {
            return Err(anyhow::anyhow!("S3_DOWNLOAD_BUCKET_NAME must not be empty"));
        }

        // Derivatives written to the upload bucket would emit storage events of their own
        if self.upload_bucket == self.derivative_bucket {
            return Err(anyhow::anyhow!(
                "S3_BUCKET_NAME and S3_DOWNLOAD_BUCKET_NAME must name different buckets (both are '{}')",
                self.upload_bucket
            ));
        }

        if self.upload_url_expiry_secs == 0
            || self.upload_url_expiry_secs > MAX_UPLOAD_URL_EXPIRY_SECS
        {
            return Err(anyhow::anyhow!(
                "UPLOAD_URL_EXPIRY_SECS must be between 1 and {}",
                MAX_UPLOAD_URL_EXPIRY_SECS
            ));
        }

        if self.full_size_px == 0 || self.thumbnail_size_px == 0 {
            return Err(anyhow::anyhow!(
                "FULL_SIZE_PX and THUMBNAIL_SIZE_PX must be greater than zero"
            ));
        }

        if self.full_size_px == self.thumbnail_size_px {
            return Err(anyhow::anyhow!(
                "FULL_SIZE_PX and THUMBNAIL_SIZE_PX must differ, otherwise both derivatives share a key"
            ));
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(anyhow::anyhow!("JPEG_QUALITY must be between 1 and 100"));
        }

        if self.max_source_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_SOURCE_SIZE_MB must be greater than zero"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {}
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
