//! OpenAPI documentation, served at `/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use resizer_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Resizer API",
        version = "0.1.0",
        description = "Signed upload URLs for original images and storage-event driven generation of resized derivatives"
    ),
    paths(
        handlers::upload_url::upload_url,
        handlers::storage_events::handle_storage_event,
        handlers::health::liveness_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        models::UploadUrlResponse,
        models::StorageEventNotification,
        models::StorageEventRecord,
        models::S3Entity,
        models::S3Bucket,
        models::S3Object,
        models::ProcessingReport,
        models::RecordOutcome,
        models::RecordStatus,
        models::RecordError,
        models::Derivative,
        handlers::health::ReadinessResponse,
        handlers::health::BucketHealth,
        error::ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Signed upload URL issuance"),
        (name = "events", description = "Storage event notifications"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_all_routes() {
        let spec = get_openapi_spec();
        for path in ["/upload-url", "/events/storage", "/health", "/health/ready"] {
            assert!(spec.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
