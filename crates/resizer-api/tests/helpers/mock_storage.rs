//! In-memory bucket implementing [`Storage`].
//!
//! Keys go through the same [`validate_key`] rule as the real backends.

use async_trait::async_trait;
use resizer_core::StorageBackend;
use resizer_storage::{validate_key, ObjectVisibility, Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub content_type: String,
    pub visibility: ObjectVisibility,
}

#[derive(Debug, Clone)]
pub struct PresignCall {
    pub key: String,
    pub content_type: String,
    pub visibility: ObjectVisibility,
    pub expires_in: Duration,
}

pub struct MockStorage {
    bucket: String,
    objects: Mutex<HashMap<String, StoredObject>>,
    presign_calls: Mutex<Vec<PresignCall>>,
    fail_presign: AtomicBool,
    fail_uploads: AtomicBool,
    fail_exists: AtomicBool,
}

impl MockStorage {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(HashMap::new()),
            presign_calls: Mutex::new(Vec::new()),
            fail_presign: AtomicBool::new(false),
            fail_uploads: AtomicBool::new(false),
            fail_exists: AtomicBool::new(false),
        }
    }

    /// Place an object directly, as a client PUT through a signed URL would.
    pub fn put(&self, key: &str, data: Vec<u8>, content_type: &str) {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                visibility: ObjectVisibility::PublicRead,
            },
        );
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn presign_calls(&self) -> Vec<PresignCall> {
        self.presign_calls.lock().unwrap().clone()
    }

    pub fn fail_presign(&self, fail: bool) {
        self.fail_presign.store(fail, Ordering::SeqCst);
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_exists(&self, fail: bool) {
        self.fail_exists.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        validate_key(storage_key)?;
        self.get(storage_key)
            .map(|object| object.data)
            .ok_or_else(|| StorageError::NotFound(storage_key.to_string()))
    }

    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
        visibility: ObjectVisibility,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed("AccessDenied".to_string()));
        }
        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
                visibility,
            },
        );
        Ok(self.public_url(storage_key))
    }

    async fn presigned_put_url(
        &self,
        storage_key: &str,
        content_type: &str,
        visibility: ObjectVisibility,
        expires_in: Duration,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;
        if self.fail_presign.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError(
                "InvalidAccessKeyId".to_string(),
            ));
        }
        self.presign_calls.lock().unwrap().push(PresignCall {
            key: storage_key.to_string(),
            content_type: content_type.to_string(),
            visibility,
            expires_in,
        });
        Ok(format!(
            "{}?X-Amz-Expires={}&X-Amz-Signature=test",
            self.public_url(storage_key),
            expires_in.as_secs()
        ))
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("https://{}.example.test/{}", self.bucket, storage_key)
    }

    async fn exists(&self, storage_key: &str) -> StorageResult<bool> {
        validate_key(storage_key)?;
        if self.fail_exists.load(Ordering::SeqCst) {
            return Err(StorageError::BackendError("connection refused".to_string()));
        }
        Ok(self.objects.lock().unwrap().contains_key(storage_key))
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
