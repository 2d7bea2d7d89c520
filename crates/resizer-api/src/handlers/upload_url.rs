use crate::error::{ErrorResponse, HttpAppError, ValidatedQuery};
use crate::state::AppState;
use axum::{extract::State, Json};
use resizer_core::models::{UploadUrlQuery, UploadUrlResponse};
use resizer_core::AppError;
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/upload-url",
    tag = "uploads",
    params(UploadUrlQuery),
    responses(
        (status = 200, description = "Signed upload URL issued", body = UploadUrlResponse),
        (status = 400, description = "Missing filename or unsupported file type", body = ErrorResponse),
        (status = 502, description = "Storage provider refused to sign the URL", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query), fields(filename = ?query.filename, operation = "upload_url"))]
pub async fn upload_url(
    State(state): State<Arc<AppState>>,
    ValidatedQuery(query): ValidatedQuery<UploadUrlQuery>,
) -> Result<Json<UploadUrlResponse>, HttpAppError> {
    let filename = query
        .filename
        .as_deref()
        .ok_or_else(|| AppError::Validation("filename query parameter is required".to_string()))?;
    query.validate().map_err(AppError::from)?;

    let grant = state.upload_authorizer.authorize(filename).await?;

    Ok(Json(UploadUrlResponse::from(grant)))
}
