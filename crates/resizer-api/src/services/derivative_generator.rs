//! Derivative generation
//!
//! For every object-created record: download the original into a scratch
//! directory, decode it once, render each configured size off the async
//! runtime, then publish the derivatives in size order. The scratch directory
//! is removed when it goes out of scope, on success and on every error path.

use resizer_core::models::{
    Derivative, ProcessingReport, RecordOutcome, StorageEvent, StorageEventNotification,
};
use resizer_core::naming::derivative_key_for;
use resizer_core::{AppError, Config, ErrorMetadata, LogLevel};
use resizer_processing::{ImageProcessor, ImageTransformer, MediaValidator, OutputFormat};
use resizer_storage::{ObjectVisibility, Storage, StorageError};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// A derivative encoded to a scratch file, not yet published.
struct RenderedDerivative {
    target_size: u32,
    key: String,
    path: PathBuf,
    width: u32,
    height: u32,
}

#[derive(Clone)]
pub struct DerivativeGenerator {
    source_storage: Arc<dyn Storage>,
    derivative_storage: Arc<dyn Storage>,
    validator: MediaValidator,
    derivative_sizes: [u32; 2],
    jpeg_quality: u8,
    scratch_root: PathBuf,
}

impl DerivativeGenerator {
    pub fn new(
        config: &Config,
        source_storage: Arc<dyn Storage>,
        derivative_storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            source_storage,
            derivative_storage,
            validator: MediaValidator::for_images(config.max_source_size_bytes()),
            derivative_sizes: config.derivative_sizes(),
            jpeg_quality: config.jpeg_quality(),
            scratch_root: config.scratch_dir(),
        }
    }

    /// Process every record of a notification.
    ///
    /// Records are independent: a failing record is reported and the next one
    /// is processed as usual.
    #[tracing::instrument(skip(self, notification), fields(records = notification.records.len()))]
    pub async fn process(&self, notification: &StorageEventNotification) -> ProcessingReport {
        let mut report = ProcessingReport::default();

        for record in &notification.records {
            let event = match record.to_event() {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        bucket = %record.s3.bucket.name,
                        raw_key = %record.s3.object.key,
                        "Rejected storage event record"
                    );
                    report.push(RecordOutcome::failed(
                        record.s3.bucket.name.clone(),
                        record.s3.object.key.clone(),
                        &err,
                    ));
                    continue;
                }
            };

            if !record.is_object_created() {
                tracing::debug!(
                    bucket = %event.bucket,
                    key = %event.key,
                    event_name = ?record.event_name,
                    "Skipping non object-created event"
                );
                report.push(RecordOutcome::skipped(event.bucket, event.key));
                continue;
            }

            match self.process_event(&event).await {
                Ok(derivatives) => {
                    report.push(RecordOutcome::published(event.bucket, event.key, derivatives));
                }
                Err(err) => {
                    log_record_failure(&event, &err);
                    report.push(RecordOutcome::failed(event.bucket, event.key, &err));
                }
            }
        }

        tracing::info!(
            published = report.published_count(),
            failed = report.failed_count(),
            skipped = report.skipped_count(),
            "Storage event batch processed"
        );

        report
    }

    /// Produce and publish every derivative of one source object.
    ///
    /// Publishing overwrites, so processing the same event twice yields the
    /// same derivatives.
    #[tracing::instrument(skip(self), fields(bucket = %event.bucket, key = %event.key))]
    pub async fn process_event(&self, event: &StorageEvent) -> Result<Vec<Derivative>, AppError> {
        if event.bucket != self.source_storage.bucket() {
            return Err(AppError::BadRequest(format!(
                "Bucket '{}' is not the configured upload bucket",
                event.bucket
            )));
        }

        let content_type = self.validator.content_type_for(&event.key)?;
        let format = OutputFormat::for_key(&event.key)?;

        // Size reported by the notification, checked before downloading
        if let Some(size) = event.size {
            self.validator
                .validate_file_size(usize::try_from(size).unwrap_or(usize::MAX))
                .map_err(|e| AppError::Decode(e.to_string()))?;
        }

        let workdir = TempDir::new_in(&self.scratch_root).map_err(|e| {
            AppError::Internal(format!(
                "Failed to create scratch directory in {}: {}",
                self.scratch_root.display(),
                e
            ))
        })?;

        let data = self
            .source_storage
            .download(&event.key)
            .await
            .map_err(|e| fetch_error(event, e))?;

        // Actual size, checked before decoding
        self.validator
            .validate_file_size(data.len())
            .map_err(|e| AppError::Decode(e.to_string()))?;

        let source_path = workdir.path().join("source");
        tokio::fs::write(&source_path, &data).await?;
        drop(data);

        let rendered = self
            .render(source_path, workdir.path().to_path_buf(), &event.key, format)
            .await?;

        let mut derivatives = Vec::with_capacity(rendered.len());
        for derivative in rendered {
            let bytes = tokio::fs::read(&derivative.path).await?;
            let url = self
                .derivative_storage
                .upload_with_key(
                    &derivative.key,
                    bytes,
                    content_type,
                    ObjectVisibility::PublicRead,
                )
                .await
                .map_err(|e| AppError::Publish(format!("{}: {}", derivative.key, e)))?;

            tracing::info!(
                source_key = %event.key,
                published_key = %derivative.key,
                target_size = derivative.target_size,
                width = derivative.width,
                height = derivative.height,
                "Derivative published"
            );

            derivatives.push(Derivative {
                source_key: event.key.clone(),
                target_size: derivative.target_size,
                published_key: derivative.key,
                url,
                width: derivative.width,
                height: derivative.height,
                content_type: content_type.to_string(),
            });
        }

        Ok(derivatives)
    }

    /// Decode the original once and encode one file per size, on a blocking thread.
    async fn render(
        &self,
        source_path: PathBuf,
        workdir: PathBuf,
        source_key: &str,
        format: OutputFormat,
    ) -> Result<Vec<RenderedDerivative>, AppError> {
        let sizes = self.derivative_sizes;
        let jpeg_quality = self.jpeg_quality;
        let source_key = source_key.to_string();

        tokio::task::spawn_blocking(move || -> Result<Vec<RenderedDerivative>, AppError> {
            let data = std::fs::read(&source_path)?;
            let (image, metadata) = ImageProcessor::decode(&data)?;

            tracing::debug!(
                width = metadata.width,
                height = metadata.height,
                format = %metadata.format,
                size_bytes = data.len(),
                "Source image decoded"
            );

            sizes
                .iter()
                .map(|&size| -> Result<RenderedDerivative, AppError> {
                    let encoded = ImageTransformer::render(&image, size, format, jpeg_quality)?;
                    let path = workdir.join(format!("derivative-{}", size));
                    std::fs::write(&path, &encoded.data)?;

                    Ok(RenderedDerivative {
                        target_size: size,
                        key: derivative_key_for(&source_key, size),
                        path,
                        width: encoded.width,
                        height: encoded.height,
                    })
                })
                .collect()
        })
        .await
        .map_err(|e| AppError::Internal(format!("Image processing task failed: {}", e)))?
    }
}

fn fetch_error(event: &StorageEvent, err: StorageError) -> AppError {
    match err {
        StorageError::NotFound(_) => AppError::Fetch(format!(
            "Source object not found: {}/{}",
            event.bucket, event.key
        )),
        other => AppError::Fetch(format!("{}/{}: {}", event.bucket, event.key, other)),
    }
}

fn log_record_failure(event: &StorageEvent, err: &AppError) {
    match err.log_level() {
        LogLevel::Error => tracing::error!(
            error = %err,
            bucket = %event.bucket,
            key = %event.key,
            "Storage event record failed"
        ),
        LogLevel::Warn | LogLevel::Debug => tracing::warn!(
            error = %err,
            bucket = %event.bucket,
            key = %event.key,
            "Storage event record failed"
        ),
    }
}
