use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::constants::STATUS_OK;

/// Query parameters of `GET /upload-url`
#[derive(Debug, Deserialize, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct UploadUrlQuery {
    /// Desired filename, e.g. `photo.jpg`. Only `.jpg`, `.jpeg`, `.png` and `.gif` are accepted.
    #[validate(length(
        min = 1,
        max = 255,
        message = "Filename must be between 1 and 255 characters"
    ))]
    pub filename: Option<String>,
}

/// Upload authorization issued for one original.
///
/// Not persisted anywhere; validity is enforced by the provider's signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUploadGrant {
    /// Signed PUT URL for the original
    pub url: String,
    /// Object key the original must be uploaded under
    pub key: String,
    /// Content type the upload must declare
    pub content_type: String,
    pub expires_in_seconds: u64,
    /// Public URL the full-size derivative will be published at
    pub full_derivative_url: String,
    /// Public URL the thumbnail derivative will be published at
    pub thumbnail_derivative_url: String,
}

/// Response body of `GET /upload-url`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadUrlResponse {
    /// Always `OK`
    pub status: String,
    /// Signed URL accepting a single PUT of the original
    pub upload_url: String,
    /// Public URL of the full-size derivative once processed
    pub full_url: String,
    /// Public URL of the thumbnail derivative once processed
    pub thumbnail_url: String,
    /// Object key of the original
    pub key: String,
    /// Lifetime of `upload_url`
    pub expires_in_seconds: u64,
}

impl From<SignedUploadGrant> for UploadUrlResponse {
    fn from(grant: SignedUploadGrant) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            upload_url: grant.url,
            full_url: grant.full_derivative_url,
            thumbnail_url: grant.thumbnail_derivative_url,
            key: grant.key,
            expires_in_seconds: grant.expires_in_seconds,
        }
    }
}
