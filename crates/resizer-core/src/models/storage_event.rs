//! Storage event notifications
//!
//! S3-compatible providers (AWS, MinIO) deliver object-created notifications as
//! `{"Records":[{"eventName":..,"s3":{"bucket":{"name":..},"object":{"key":..}}}]}`.
//! Only the fields the derivative generator needs are modelled; everything else
//! in the payload is ignored.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Notification payload; may carry zero or more records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct StorageEventNotification {
    #[serde(rename = "Records", default)]
    pub records: Vec<StorageEventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StorageEventRecord {
    /// e.g. `ObjectCreated:Put`
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct S3Object {
    /// URL-encoded object key
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// One source object to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub bucket: String,
    pub key: String,
    /// Object size as reported by the notification, if any
    pub size: Option<u64>,
}

impl StorageEventRecord {
    /// Records without an event name are treated as object-created.
    pub fn is_object_created(&self) -> bool {
        self.event_name
            .as_deref()
            .map_or(true, |name| name.contains("ObjectCreated"))
    }

    /// Bucket and decoded key of this record.
    pub fn to_event(&self) -> Result<StorageEvent, AppError> {
        let key = decode_object_key(&self.s3.object.key)?;
        if key.is_empty() {
            return Err(AppError::BadRequest(
                "Storage event record has an empty object key".to_string(),
            ));
        }

        Ok(StorageEvent {
            bucket: self.s3.bucket.name.clone(),
            key,
            size: self.s3.object.size,
        })
    }
}

/// Notification keys use form encoding: `+` for space, `%XX` for everything else.
pub fn decode_object_key(raw: &str) -> Result<String, AppError> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| AppError::BadRequest(format!("Invalid object key encoding '{}': {}", raw, e)))
}

impl StorageEventNotification {
    /// Build a notification for the given `(bucket, key)` pairs. Keys are encoded
    /// the way providers encode them.
    pub fn for_objects<'a, I>(objects: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let records = objects
            .into_iter()
            .map(|(bucket, key)| StorageEventRecord {
                event_name: Some("ObjectCreated:Put".to_string()),
                s3: S3Entity {
                    bucket: S3Bucket {
                        name: bucket.to_string(),
                    },
                    object: S3Object {
                        key: urlencoding::encode(key).replace("%20", "+"),
                        size: None,
                    },
                },
            })
            .collect();

        Self { records }
    }
}
