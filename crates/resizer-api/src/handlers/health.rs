//! Health check handlers and response types.

use crate::constants::{HEALTH_CHECK_KEY, HEALTH_CHECK_TIMEOUT};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use resizer_storage::Storage;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct BucketHealth {
    pub bucket: String,
    /// `ready`, `timeout` or `not_ready: <reason>`
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    pub status: String,
    pub storage_backend: String,
    pub upload_bucket: BucketHealth,
    pub derivative_bucket: BucketHealth,
}

async fn check_bucket(storage: &dyn Storage) -> BucketHealth {
    let status = match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, storage.exists(HEALTH_CHECK_KEY))
        .await
    {
        Ok(Ok(_)) => "ready".to_string(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, bucket = %storage.bucket(), "Storage readiness check failed");
            format!("not_ready: {}", e)
        }
        Err(_) => {
            tracing::error!(bucket = %storage.bucket(), "Storage readiness check timed out");
            "timeout".to_string()
        }
    };

    BucketHealth {
        bucket: storage.bucket().to_string(),
        status,
    }
}

/// Liveness check - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}

/// Readiness check - both buckets reachable.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Both buckets reachable", body = ReadinessResponse),
        (status = 503, description = "A bucket is unreachable", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (upload_bucket, derivative_bucket) = tokio::join!(
        check_bucket(state.upload_storage.as_ref()),
        check_bucket(state.derivative_storage.as_ref())
    );

    let ready = upload_bucket.status == "ready" && derivative_bucket.status == "ready";
    let response = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        storage_backend: state.upload_storage.backend_type().to_string(),
        upload_bucket,
        derivative_bucket,
    };

    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
