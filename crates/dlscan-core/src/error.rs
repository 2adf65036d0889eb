//! Error types for the dlscan-core library.

use thiserror::Error;

/// Fatal scan failures. Any of these aborts the pipeline for the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// The image payload could not be decoded.
    #[error("invalid image payload: {0}")]
    InputDecode(String),

    /// No OCR collaborator is configured.
    #[error("OCR client not initialized: {0}")]
    CollaboratorUnavailable(String),

    /// The OCR collaborator was called and failed.
    #[error("OCR call failed: {0}")]
    CollaboratorCall(String),
}

/// Errors reported by an OCR collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcrError {
    /// The client is missing configuration, credentials or model files.
    #[error("OCR engine unavailable: {0}")]
    Unavailable(String),

    /// The bytes are not a supported or decodable image.
    #[error("unsupported document: {0}")]
    Document(String),

    /// Recognition itself failed.
    #[error("recognition failed: {0}")]
    Service(String),

    /// The call exceeded the caller-supplied deadline.
    #[error("OCR call timed out after {0}ms")]
    Timeout(u64),
}

impl From<OcrError> for ScanError {
    fn from(err: OcrError) -> Self {
        match err {
            OcrError::Unavailable(msg) => ScanError::CollaboratorUnavailable(msg),
            other => ScanError::CollaboratorCall(other.to_string()),
        }
    }
}

/// Errors related to configuration files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error while reading or writing the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid configuration JSON.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for scan operations.
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_maps_to_collaborator_unavailable() {
        let err: ScanError = OcrError::Unavailable("det.onnx missing".to_string()).into();
        assert_eq!(err, ScanError::CollaboratorUnavailable("det.onnx missing".to_string()));
    }

    #[test]
    fn test_document_and_service_map_to_call_error() {
        let rejected: ScanError = OcrError::Document("bad magic".to_string()).into();
        let failed: ScanError = OcrError::Service("tensor shape".to_string()).into();

        assert_eq!(
            rejected,
            ScanError::CollaboratorCall("unsupported document: bad magic".to_string())
        );
        assert_eq!(
            failed,
            ScanError::CollaboratorCall("recognition failed: tensor shape".to_string())
        );
    }

    #[test]
    fn test_timeout_message() {
        let err: ScanError = OcrError::Timeout(1500).into();
        assert_eq!(err.to_string(), "OCR call failed: OCR call timed out after 1500ms");
    }
}
