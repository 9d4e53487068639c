//! QR code encoder
//!
//! The matrix encoder is compiled in through the `render` feature. Builds without
//! it still link, but every render attempt reports [`Error::EncodingUnavailable`].

use crate::config::RenderOptions;
use crate::error::{Error, Result};
use image::{ImageFormat, RgbImage};
use std::path::Path;

/// QR code encoder
#[derive(Debug, Clone, Default)]
pub struct QrEncoder {
    options: RenderOptions,
}

impl QrEncoder {
    /// Create an encoder with the default fixture settings (low ECC, 10px modules, quiet zone on)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encoder with explicit render options
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render options in effect
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Whether the matrix encoder was compiled into this build.
    pub fn is_available(&self) -> bool {
        cfg!(feature = "render")
    }

    /// Check up front that rendering can succeed.
    pub fn probe(&self) -> Result<()> {
        if self.is_available() {
            tracing::debug!(options = ?self.options, "QR encoder available");
            Ok(())
        } else {
            Err(Error::EncodingUnavailable {
                remediation: remediation_steps(),
            })
        }
    }

    /// Render a payload into an RGB image.
    pub fn render(&self, payload: &str) -> Result<RgbImage> {
        #[cfg(feature = "render")]
        {
            self.render_matrix(payload)
        }

        #[cfg(not(feature = "render"))]
        {
            let _ = payload;
            Err(Error::EncodingUnavailable {
                remediation: remediation_steps(),
            })
        }
    }

    /// Render a payload and save it as a PNG, overwriting any existing file.
    pub fn render_to_file(&self, payload: &str, path: &Path) -> Result<()> {
        let img = self.render(payload)?;
        img.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    #[cfg(feature = "render")]
    fn render_matrix(&self, payload: &str) -> Result<RgbImage> {
        use crate::config::ErrorCorrection;
        use image::Rgb;
        use qrcode::{EcLevel, QrCode};

        self.options
            .validate()
            .map_err(|e| Error::QrEncode(e.to_string()))?;

        let level = match self.options.ec_level {
            ErrorCorrection::Low => EcLevel::L,
            ErrorCorrection::Medium => EcLevel::M,
            ErrorCorrection::Quartile => EcLevel::Q,
            ErrorCorrection::High => EcLevel::H,
        };
        let code = QrCode::with_error_correction_level(payload.as_bytes(), level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {e}")))?;

        let module = self.options.module_size;
        let image = code
            .render::<Rgb<u8>>()
            .module_dimensions(module, module)
            .quiet_zone(self.options.quiet_zone)
            .dark_color(Rgb(self.options.foreground.0))
            .light_color(Rgb(self.options.background.0))
            .build();

        Ok(image)
    }
}

/// Instructions printed when the encoder is missing from the build.
pub fn remediation_steps() -> Vec<String> {
    vec![
        "Rebuild with the QR encoder enabled (it is on by default):".to_string(),
        "   cargo build --release --features render".to_string(),
        "If you disabled default features, add it back explicitly:".to_string(),
        "   cargo install --path . --features render".to_string(),
        "Then run the generator again:".to_string(),
        "   meditrack-qr --output qr_codes".to_string(),
    ]
}

#[cfg(all(test, feature = "render"))]
mod tests {
    use super::*;
    use crate::config::Color;
    use crate::qr::QrDecoder;
    use image::DynamicImage;

    #[test]
    fn test_probe_succeeds_with_render_feature() {
        assert!(QrEncoder::new().probe().is_ok());
    }

    #[test]
    fn test_dimensions_follow_module_size_and_quiet_zone() {
        let img = QrEncoder::new().render("batch:BATCH-2025-001").unwrap();
        assert_eq!(img.width(), img.height());
        assert_eq!(img.width() % 10, 0);
        let modules = img.width() / 10 - 2 * 4;
        assert!(modules >= 21 && (modules - 17) % 4 == 0);
    }

    #[test]
    fn test_quiet_zone_uses_background() {
        let options = RenderOptions {
            background: Color([250, 240, 230]),
            ..RenderOptions::default()
        };
        let img = QrEncoder::with_options(options).render("batch:X").unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [250, 240, 230]);
        assert_eq!(img.get_pixel(39, 39).0, [250, 240, 230]);
        // First finder pattern starts right after the 4-module quiet zone.
        assert_eq!(img.get_pixel(40, 40).0, [0, 0, 0]);
    }

    #[test]
    fn test_without_quiet_zone_matrix_starts_at_origin() {
        let options = RenderOptions {
            quiet_zone: false,
            ..RenderOptions::default()
        };
        let img = QrEncoder::with_options(options).render("batch:X").unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
        let modules = img.width() / 10;
        assert!(modules >= 21 && (modules - 17) % 4 == 0);
    }

    #[test]
    fn test_oversized_module_is_an_encode_error() {
        let options = RenderOptions {
            module_size: 3_000_000_000,
            ..RenderOptions::default()
        };
        assert!(matches!(
            QrEncoder::with_options(options).render("batch:X"),
            Err(Error::QrEncode(_))
        ));
    }

    #[test]
    fn test_zero_module_is_an_encode_error() {
        let options = RenderOptions {
            module_size: 0,
            ..RenderOptions::default()
        };
        assert!(matches!(
            QrEncoder::with_options(options).render("batch:X"),
            Err(Error::QrEncode(_))
        ));
    }

    #[test]
    fn test_rendered_image_scans_back() {
        let payload = "batch:BATCH-FAKE-001";
        let img = QrEncoder::new().render(payload).unwrap();
        let decoded = QrDecoder::new()
            .decode(&DynamicImage::ImageRgb8(img))
            .unwrap();
        assert_eq!(decoded.as_str(), Some(payload));
    }

    #[test]
    fn test_render_to_file_writes_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("code.png");
        QrEncoder::new()
            .render_to_file("batch:BATCH-2025-002", &path)
            .unwrap();
        let decoded = QrDecoder::new().decode_file(&path).unwrap();
        assert_eq!(decoded.batch_id(), Some("BATCH-2025-002"));
    }
}
