use resizer_core::constants::ALLOWED_EXTENSIONS;
use resizer_core::naming::{file_name, split_extension};
use resizer_core::AppError;

/// Validation errors for client filenames and source objects
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: '{extension}' (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("No content type known for extension '{0}'")]
    UnknownContentType(String),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// A client filename that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFilename {
    /// Lower-cased stem without directories
    pub basename: String,
    /// Lower-cased extension including the dot
    pub extension: String,
    pub content_type: &'static str,
}

/// MIME type implied by an extension (with or without the leading dot, any case).
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.trim_start_matches('.').to_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

/// Filename and size validator
///
/// The extension whitelist is the only content check made before an upload is
/// authorized; the bytes themselves are checked when the derivative generator
/// decodes them.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl MediaValidator {
    /// `allowed_extensions` are compared case-insensitively and include the dot.
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
        }
    }

    /// Validator accepting `.jpg`, `.jpeg`, `.png` and `.gif`.
    pub fn for_images(max_file_size: usize) -> Self {
        Self::new(
            max_file_size,
            ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        )
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate the extension of a file name or key; returns it lower-cased.
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let (_, extension) = split_extension(file_name(filename));
        if extension.is_empty() || extension == "." {
            return Err(ValidationError::InvalidExtension {
                extension: extension.to_string(),
                allowed: self.allowed_extensions.clone(),
            });
        }

        let extension = extension.to_lowercase();
        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// Content type of an allowed file name or key.
    pub fn content_type_for(&self, filename: &str) -> Result<&'static str, ValidationError> {
        let extension = self.validate_extension(filename)?;
        content_type_for_extension(&extension)
            .ok_or(ValidationError::UnknownContentType(extension))
    }

    /// Normalize and validate a client-supplied filename.
    ///
    /// The name is lower-cased and reduced to its final path component, so
    /// `uploads/Photo.JPG` becomes basename `photo`, extension `.jpg`.
    pub fn validate_upload_filename(&self, raw: &str) -> Result<ValidatedFilename, ValidationError> {
        let normalized = raw.trim().to_lowercase();
        let name = file_name(&normalized);
        if name.is_empty() {
            return Err(ValidationError::InvalidFilename(raw.to_string()));
        }

        let (basename, _) = split_extension(name);
        let content_type = self.content_type_for(name)?;
        let extension = self.validate_extension(name)?;

        Ok(ValidatedFilename {
            basename: basename.to_string(),
            extension,
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> MediaValidator {
        MediaValidator::for_images(1024 * 1024)
    }

    #[test]
    fn test_validate_file_size() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(2 * 1024 * 1024),
            Err(ValidationError::FileTooLarge { .. })
        ));
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_extension_case_insensitive() {
        let validator = test_validator();
        assert_eq!(validator.validate_extension("test.jpg").unwrap(), ".jpg");
        assert_eq!(validator.validate_extension("test.PNG").unwrap(), ".png");
        assert_eq!(validator.validate_extension("a/b/test.Gif").unwrap(), ".gif");
    }

    #[test]
    fn test_validate_extension_rejects_others() {
        let validator = test_validator();
        for name in ["doc.pdf", "photo", "photo.", ".jpg", "archive.jpg.zip"] {
            assert!(
                matches!(
                    validator.validate_extension(name),
                    Err(ValidationError::InvalidExtension { .. })
                ),
                "{} should be rejected",
                name
            );
        }
    }

    #[test]
    fn test_content_type_for_extension() {
        assert_eq!(content_type_for_extension(".jpg"), Some("image/jpeg"));
        assert_eq!(content_type_for_extension("JPEG"), Some("image/jpeg"));
        assert_eq!(content_type_for_extension(".png"), Some("image/png"));
        assert_eq!(content_type_for_extension(".gif"), Some("image/gif"));
        assert_eq!(content_type_for_extension(".heic"), None);
        assert_eq!(content_type_for_extension(".webp"), None);
    }

    #[test]
    fn test_allowed_extension_without_content_type() {
        let validator = MediaValidator::new(1024, vec![".heic".to_string()]);
        assert!(matches!(
            validator.content_type_for("photo.heic"),
            Err(ValidationError::UnknownContentType(_))
        ));
    }

    #[test]
    fn test_validate_upload_filename_normalizes() {
        let validator = test_validator();
        let validated = validator
            .validate_upload_filename("uploads/Holiday Photo.JPG")
            .unwrap();
        assert_eq!(validated.basename, "holiday photo");
        assert_eq!(validated.extension, ".jpg");
        assert_eq!(validated.content_type, "image/jpeg");

        let validated = validator.validate_upload_filename("C:\\pics\\cat.jpeg").unwrap();
        assert_eq!(validated.basename, "cat");
        assert_eq!(validated.extension, ".jpeg");
    }

    #[test]
    fn test_validate_upload_filename_rejects_directory() {
        let validator = test_validator();
        assert!(matches!(
            validator.validate_upload_filename("photos/"),
            Err(ValidationError::InvalidFilename(_))
        ));
        assert!(validator.validate_upload_filename("doc.pdf").is_err());
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = ValidationError::UnknownContentType(".heic".to_string()).into();
        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains(".heic")));
    }
}
