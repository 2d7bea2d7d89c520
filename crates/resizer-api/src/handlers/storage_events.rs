use crate::error::{ErrorResponse, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use resizer_core::models::{ProcessingReport, StorageEventNotification};
use std::sync::Arc;

/// Receive an object-created notification and publish derivatives for each record.
///
/// Answers 200 only when every record succeeded (or was skipped). Otherwise the
/// status of the first failed record is returned so the dispatcher can redeliver;
/// records that already succeeded are overwritten with identical derivatives.
#[utoipa::path(
    post,
    path = "/events/storage",
    tag = "events",
    request_body = StorageEventNotification,
    responses(
        (status = 200, description = "All records processed", body = ProcessingReport),
        (status = 400, description = "Malformed notification or record", body = ProcessingReport),
        (status = 422, description = "A source object is not a decodable image", body = ProcessingReport),
        (status = 502, description = "A source could not be fetched or a derivative could not be published", body = ProcessingReport),
        (status = 500, description = "Internal server error", body = ProcessingReport),
        (status = 413, description = "Notification body too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, notification), fields(records = notification.records.len(), operation = "storage_event"))]
pub async fn handle_storage_event(
    State(state): State<Arc<AppState>>,
    ValidatedJson(notification): ValidatedJson<StorageEventNotification>,
) -> (StatusCode, Json<ProcessingReport>) {
    let report = state.derivative_generator.process(&notification).await;

    let status = report
        .first_failure()
        .map(|failure| {
            StatusCode::from_u16(failure.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        })
        .unwrap_or(StatusCode::OK);

    (status, Json(report))
}
