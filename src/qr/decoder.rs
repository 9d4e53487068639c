//! QR code decoder using rqrr

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, GrayImage};
use std::path::Path;

/// QR code decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder;

impl QrDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Open an image file and decode the first QR code in it.
    pub fn decode_file(&self, path: &Path) -> Result<QrPayload> {
        let img = image::open(path)?;
        self.decode(&img)
    }

    /// Decode the first QR code found in an image
    pub fn decode(&self, img: &DynamicImage) -> Result<QrPayload> {
        self.decode_gray(img.to_luma8())
    }

    fn decode_gray(&self, img: GrayImage) -> Result<QrPayload> {
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();

        let grid = grids.first().ok_or(Error::NoQrCodeFound)?;
        let (meta, content) = grid
            .decode()
            .map_err(|e| Error::QrDecode(format!("Decode failed: {e:?}")))?;

        tracing::debug!(
            version = ?meta.version,
            ecc_level = meta.ecc_level,
            length = content.len(),
            "Decoded QR code"
        );

        Ok(QrPayload::from_bytes(content.into_bytes()))
    }
}
