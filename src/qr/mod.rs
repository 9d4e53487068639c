//! QR code rendering and read-back
//!
//! [`QrEncoder`] turns a payload string into a raster image using the settings
//! in [`RenderOptions`](crate::config::RenderOptions). [`QrDecoder`] reads an image
//! back so a run can confirm each artifact scans to the payload it was built from.

mod decoder;
mod encoder;

pub use decoder::QrDecoder;
pub use encoder::{QrEncoder, remediation_steps};

/// Text decoded from a QR image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrPayload {
    /// The raw decoded data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a payload from raw bytes
    pub fn from_bytes(data: Vec<u8>) -> Self {
        let text = String::from_utf8(data.clone()).ok();
        Self { data, text }
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Batch ID carried by a `batch:`-prefixed payload.
    pub fn batch_id(&self) -> Option<&str> {
        self.as_str().and_then(crate::catalog::parse_payload)
    }
}
