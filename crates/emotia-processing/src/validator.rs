use crate::decoder::SourceFormat;
use emotia_core::validation::{validate_emote_name, MAX_EMOTE_NAME_BYTES};
use emotia_core::AppError;
use uuid::Uuid;

/// Request-level validation errors for emote uploads
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Unsupported content type: {content_type} (allowed: {allowed:?})")]
    UnsupportedContentType {
        content_type: String,
        allowed: &'static [&'static str],
    },

    #[error("Empty file")]
    EmptyFile,

    #[error("{0}")]
    InvalidName(String),

    #[error("Invalid channel id: {0}")]
    InvalidChannelId(String),

    #[error("Emote fields were not provided")]
    MissingFields,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

/// Upload validator
///
/// Checks the parts of an ingest request before any decoding happens.
#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_file_size: usize,
}

impl UploadValidator {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
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

    /// Validate the declared content type and return the matching format
    pub fn validate_content_type(&self, content_type: &str) -> Result<SourceFormat, ValidationError> {
        SourceFormat::from_content_type(content_type).ok_or_else(|| {
            ValidationError::UnsupportedContentType {
                content_type: content_type.to_string(),
                allowed: &SourceFormat::ACCEPTED_CONTENT_TYPES,
            }
        })
    }

    /// Validate an emote name, raw bytes as read from the request
    pub fn validate_name(&self, raw: &[u8]) -> Result<String, ValidationError> {
        if raw.len() > MAX_EMOTE_NAME_BYTES {
            return Err(ValidationError::InvalidName(format!(
                "Emote name exceeds maximum length of {} bytes",
                MAX_EMOTE_NAME_BYTES
            )));
        }

        let name = std::str::from_utf8(raw)
            .map_err(|_| ValidationError::InvalidName("Invalid Emote Name".to_string()))?;

        validate_emote_name(name).map_err(|e| ValidationError::InvalidName(e.to_string()))?;

        Ok(name.to_string())
    }

    /// Parse the owning channel id part
    pub fn parse_channel_id(&self, raw: &str) -> Result<Uuid, ValidationError> {
        let id = Uuid::parse_str(raw.trim())
            .map_err(|_| ValidationError::InvalidChannelId(raw.to_string()))?;
        if id.is_nil() {
            return Err(ValidationError::InvalidChannelId(raw.to_string()));
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_validator() -> UploadValidator {
        UploadValidator::new(1024 * 1024)
    }

    #[test]
    fn test_validate_file_size() {
        let validator = test_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
        assert!(matches!(
            validator.validate_file_size(2 * 1024 * 1024),
            Err(ValidationError::FileTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_content_type() {
        let validator = test_validator();
        assert_eq!(
            validator.validate_content_type("image/gif").unwrap(),
            SourceFormat::Gif
        );
        assert_eq!(
            validator.validate_content_type("IMAGE/JPEG").unwrap(),
            SourceFormat::Jpeg
        );
        assert!(validator.validate_content_type("image/webp").is_err());
        assert!(validator.validate_content_type("video/mp4").is_err());
    }

    #[test]
    fn test_validate_name() {
        let validator = test_validator();
        assert_eq!(validator.validate_name(b"pepeD").unwrap(), "pepeD");
        assert!(validator.validate_name(b"x").is_err());
        assert!(validator.validate_name(b"no spaces").is_err());
        assert!(validator.validate_name(&[0xff, 0xfe, 0x41]).is_err());
        assert!(validator.validate_name("a".repeat(33).as_bytes()).is_err());
    }

    #[test]
    fn test_parse_channel_id() {
        let validator = test_validator();
        let id = Uuid::new_v4();
        assert_eq!(validator.parse_channel_id(&id.to_string()).unwrap(), id);
        assert!(validator.parse_channel_id("not-an-id").is_err());
        assert!(validator.parse_channel_id(&Uuid::nil().to_string()).is_err());
    }

    #[test]
    fn test_size_maps_to_payload_too_large() {
        let err: AppError = ValidationError::FileTooLarge { size: 2, max: 1 }.into();
        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        let err: AppError = ValidationError::MissingFields.into();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
