//! Upload authorization
//!
//! Issues a signed, time-limited PUT URL for a fresh object key and predicts
//! the public URLs its derivatives will be published at.

use resizer_core::models::SignedUploadGrant;
use resizer_core::{AppError, Config, ObjectKey};
use resizer_processing::MediaValidator;
use resizer_storage::{ObjectVisibility, Storage};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct UploadAuthorizer {
    upload_storage: Arc<dyn Storage>,
    derivative_storage: Arc<dyn Storage>,
    validator: MediaValidator,
    expires_in: Duration,
    derivative_sizes: [u32; 2],
}

impl UploadAuthorizer {
    pub fn new(
        config: &Config,
        upload_storage: Arc<dyn Storage>,
        derivative_storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            upload_storage,
            derivative_storage,
            validator: MediaValidator::for_images(config.max_source_size_bytes()),
            expires_in: Duration::from_secs(config.upload_url_expiry_secs()),
            derivative_sizes: config.derivative_sizes(),
        }
    }

    /// Authorize one upload of `filename`.
    ///
    /// Every call generates a new object key, so repeated calls with the same
    /// filename never target the same object. Nothing is written to storage.
    #[tracing::instrument(skip(self), fields(operation = "authorize_upload"))]
    pub async fn authorize(&self, filename: &str) -> Result<SignedUploadGrant, AppError> {
        let validated = self.validator.validate_upload_filename(filename)?;

        let object_key = ObjectKey::generate(&validated.basename, &validated.extension);
        let key = object_key.key();

        let url = self
            .upload_storage
            .presigned_put_url(
                &key,
                validated.content_type,
                ObjectVisibility::PublicRead,
                self.expires_in,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.upload_storage.bucket(),
                    key = %key,
                    "Failed to sign upload URL"
                );
                AppError::Signing(e.to_string())
            })?;

        let [full_size, thumbnail_size] = self.derivative_sizes;
        let full_derivative_url = self
            .derivative_storage
            .public_url(&object_key.derivative_key(full_size));
        let thumbnail_derivative_url = self
            .derivative_storage
            .public_url(&object_key.derivative_key(thumbnail_size));

        tracing::info!(
            bucket = %self.upload_storage.bucket(),
            key = %key,
            content_type = validated.content_type,
            expires_in_secs = self.expires_in.as_secs(),
            "Upload authorized"
        );

        Ok(SignedUploadGrant {
            url,
            key,
            content_type: validated.content_type.to_string(),
            expires_in_seconds: self.expires_in.as_secs(),
            full_derivative_url,
            thumbnail_derivative_url,
        })
    }
}
