//! Error types for MediTrack QR generation

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for generation runs
#[derive(Error, Debug)]
pub enum Error {
    /// The QR matrix encoder is not compiled into this build
    #[error("QR code encoder not available")]
    EncodingUnavailable {
        /// Step-by-step instructions for enabling the encoder
        remediation: Vec<String>,
    },

    /// Requested batch ID is not part of the catalog
    #[error("Batch ID '{batch_id}' not found in mock data")]
    BatchNotFound {
        /// The ID that was looked up
        batch_id: String,
        /// Every valid batch ID, in catalog order
        available: Vec<String>,
    },

    /// Output directory or artifact could not be created or written
    #[error("Filesystem error at {}: {source}", path.display())]
    Filesystem {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// QR code encoding failed
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// QR code decoding failed
    #[error("Failed to decode QR code: {0}")]
    QrDecode(String),

    /// No QR code found in image
    #[error("No QR code found in image")]
    NoQrCodeFound,

    /// A written image did not decode back to the payload it was rendered from
    #[error("Verification failed for {}: expected '{expected}', found '{found}'", path.display())]
    VerificationMismatch {
        /// Image that was read back
        path: PathBuf,
        /// Payload that was encoded
        expected: String,
        /// Text decoded from the image
        found: String,
    },

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Background generation task panicked or was aborted
    #[error("Generation task failed: {0}")]
    Task(String),

    /// Run interrupted by the operator
    #[error("Generation cancelled by user")]
    Cancelled,
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Filesystem {
            path: path.into(),
            source,
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Json(e.to_string())
    }
}
