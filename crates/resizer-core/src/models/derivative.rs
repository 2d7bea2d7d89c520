use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorMetadata};

/// A resized copy published to the derivative bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Derivative {
    /// Key of the original in the upload bucket
    pub source_key: String,
    /// Bounding box edge the derivative was fitted into
    pub target_size: u32,
    /// Key the derivative was published under
    pub published_key: String,
    /// Public URL of the derivative
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub content_type: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Published,
    Failed,
    Skipped,
}

/// Error summary attached to a failed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecordError {
    /// Machine-readable code, e.g. `FETCH_ERROR`
    pub code: String,
    pub message: String,
    /// HTTP status the error maps to
    pub status: u16,
}

impl From<&AppError> for RecordError {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.client_message(),
            status: err.http_status_code(),
        }
    }
}

/// Outcome of one notification record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecordOutcome {
    pub bucket: String,
    /// Decoded object key (raw key when decoding failed)
    pub key: String,
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub derivatives: Vec<Derivative>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RecordError>,
}

impl RecordOutcome {
    pub fn published(bucket: String, key: String, derivatives: Vec<Derivative>) -> Self {
        Self {
            bucket,
            key,
            status: RecordStatus::Published,
            derivatives,
            error: None,
        }
    }

    pub fn failed(bucket: String, key: String, err: &AppError) -> Self {
        Self {
            bucket,
            key,
            status: RecordStatus::Failed,
            derivatives: Vec::new(),
            error: Some(RecordError::from(err)),
        }
    }

    pub fn skipped(bucket: String, key: String) -> Self {
        Self {
            bucket,
            key,
            status: RecordStatus::Skipped,
            derivatives: Vec::new(),
            error: None,
        }
    }
}

/// Response body of `POST /events/storage`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProcessingReport {
    pub records: Vec<RecordOutcome>,
}

impl ProcessingReport {
    pub fn push(&mut self, outcome: RecordOutcome) {
        self.records.push(outcome);
    }

    pub fn published_count(&self) -> usize {
        self.count(RecordStatus::Published)
    }

    pub fn failed_count(&self) -> usize {
        self.count(RecordStatus::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(RecordStatus::Skipped)
    }

    fn count(&self, status: RecordStatus) -> usize {
        self.records.iter().filter(|r| r.status == status).count()
    }

    /// First failed record's error, in delivery order.
    pub fn first_failure(&self) -> Option<&RecordError> {
        self.records.iter().find_map(|r| r.error.as_ref())
    }

    /// All derivatives published across the batch.
    pub fn derivatives(&self) -> impl Iterator<Item = &Derivative> {
        self.records.iter().flat_map(|r| r.derivatives.iter())
    }
}
