//! Artifact generation: QR images, `batch_info.json` and `README.md`
//!
//! Every run probes the encoder before touching the filesystem, so a build
//! without the encoder fails before any artifact is written. Records are
//! processed in catalog order and existing files are overwritten in place.

use crate::catalog::{self, BatchRecord};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::qr::{QrDecoder, QrEncoder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Metadata file written next to the images.
pub const BATCH_INFO_FILE: &str = "batch_info.json";
/// Documentation file written by full-catalog runs.
pub const README_FILE: &str = "README.md";

const INFO_DESCRIPTION: &str = "QR codes for MediTrack app testing";
const INFO_USAGE: &str =
    "Scan these QR codes with the MediTrack app to test verification functionality";

/// One image written to disk
#[derive(Debug, Clone)]
pub struct GeneratedArtifact {
    /// Catalog record the image encodes
    pub record: &'static BatchRecord,
    /// Location of the PNG
    pub path: PathBuf,
    /// Exact string encoded in the image
    pub payload: String,
}

/// Outcome of a full-catalog run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Directory everything was written to
    pub output_dir: PathBuf,
    /// Images, in catalog order
    pub artifacts: Vec<GeneratedArtifact>,
    /// Path of `batch_info.json`
    pub batch_info: PathBuf,
    /// Path of `README.md`, when emitted
    pub readme: Option<PathBuf>,
}

/// Contents of `batch_info.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchInfo {
    /// Local ISO-8601 timestamp of the run
    pub generated_at: String,
    /// Fixed description string
    pub description: String,
    /// Fixed usage hint
    pub usage: String,
    /// Full catalog, in definition order
    pub batches: Vec<BatchRecord>,
}

impl BatchInfo {
    /// Snapshot of the catalog stamped with the current local time.
    pub fn now(records: &[BatchRecord]) -> Self {
        Self {
            generated_at: chrono::Local::now()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            description: INFO_DESCRIPTION.to_string(),
            usage: INFO_USAGE.to_string(),
            batches: records.to_vec(),
        }
    }
}

/// Which optional steps a run performs
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions {
    /// Write `README.md` after a full-catalog run
    pub emit_readme: bool,
    /// Decode every PNG after writing it
    pub verify: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            emit_readme: true,
            verify: false,
        }
    }
}

/// Renders catalog records into an output directory
#[derive(Debug, Clone, Default)]
pub struct Generator {
    encoder: QrEncoder,
    decoder: QrDecoder,
    options: GenerateOptions,
}

impl Generator {
    /// Create a generator around an encoder
    pub fn new(encoder: QrEncoder, options: GenerateOptions) -> Self {
        Self {
            encoder,
            decoder: QrDecoder::new(),
            options,
        }
    }

    /// Build a generator from resolved configuration.
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self::new(
            QrEncoder::with_options(config.render.clone()),
            GenerateOptions {
                emit_readme: config.output.emit_readme,
                verify: config.output.verify,
            },
        )
    }

    /// Options in effect
    pub fn options(&self) -> GenerateOptions {
        self.options
    }

    /// Render a single catalog record.
    ///
    /// Unknown IDs fail with [`Error::BatchNotFound`] before anything is written.
    pub fn generate_one(&self, batch_id: &str, output_dir: &Path) -> Result<GeneratedArtifact> {
        self.encoder.probe()?;
        let record = catalog::find_batch(batch_id).inspect_err(|_| {
            tracing::warn!(batch_id, "Batch not found in catalog");
        })?;

        ensure_output_dir(output_dir)?;
        self.write_record(record, output_dir)
    }

    /// Render every catalog record, then write `batch_info.json` and (optionally) `README.md`.
    pub fn generate_all(&self, output_dir: &Path) -> Result<GenerationReport> {
        self.encoder.probe()?;
        ensure_output_dir(output_dir)?;

        let records = catalog::list_catalog();
        tracing::info!(
            count = records.len(),
            dir = %output_dir.display(),
            "Generating QR codes"
        );

        let artifacts = records
            .iter()
            .map(|record| self.write_record(record, output_dir))
            .collect::<Result<Vec<_>>>()?;

        let batch_info = write_batch_info(output_dir, records)?;
        let readme = if self.options.emit_readme {
            Some(write_readme(output_dir, records)?)
        } else {
            None
        };

        Ok(GenerationReport {
            output_dir: output_dir.to_path_buf(),
            artifacts,
            batch_info,
            readme,
        })
    }

    fn write_record(
        &self,
        record: &'static BatchRecord,
        output_dir: &Path,
    ) -> Result<GeneratedArtifact> {
        let payload = catalog::encode_payload(record);
        let path = output_dir.join(catalog::output_filename(record));

        self.encoder.render_to_file(&payload, &path)?;
        tracing::info!(batch_id = %record.batch_id, path = %path.display(), "Wrote QR code");

        if self.options.verify {
            self.verify(&path, &payload)?;
        }

        Ok(GeneratedArtifact {
            record,
            path,
            payload,
        })
    }

    fn verify(&self, path: &Path, expected: &str) -> Result<()> {
        let decoded = self.decoder.decode_file(path)?;
        let found = decoded
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| format!("<{} non-UTF-8 bytes>", decoded.as_bytes().len()));

        if found != expected {
            return Err(Error::VerificationMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                found,
            });
        }
        tracing::debug!(path = %path.display(), "Verified QR code");
        Ok(())
    }
}

/// Create the output directory and any missing parents.
///
/// Idempotent; fails if the path exists and is not a directory.
pub fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.exists() && !path.is_dir() {
        return Err(Error::filesystem(
            path,
            io::Error::new(io::ErrorKind::NotADirectory, "path exists and is not a directory"),
        ));
    }
    fs::create_dir_all(path).map_err(|e| Error::filesystem(path, e))
}

/// Write `batch_info.json` describing `records`.
pub fn write_batch_info(output_dir: &Path, records: &[BatchRecord]) -> Result<PathBuf> {
    let path = output_dir.join(BATCH_INFO_FILE);
    let json = serde_json::to_string_pretty(&BatchInfo::now(records))?;
    write_file(&path, json)?;
    Ok(path)
}

/// Write `README.md` documenting the images for `records`.
pub fn write_readme(output_dir: &Path, records: &[BatchRecord]) -> Result<PathBuf> {
    let path = output_dir.join(README_FILE);
    let generated_on = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    write_file(&path, readme_contents(records, &generated_on))?;
    Ok(path)
}

/// Markdown body of `README.md`.
pub fn readme_contents(records: &[BatchRecord], generated_on: &str) -> String {
    let authentic: String = records
        .iter()
        .filter(|r| r.authentic)
        .map(|r| {
            format!(
                "- `{}` - {} ({})\n",
                catalog::output_filename(r),
                r.drug_name,
                r.manufacturer
            )
        })
        .collect();
    let counterfeit: String = records
        .iter()
        .filter(|r| !r.authentic)
        .map(|r| format!("- `{}` - Fake {}\n", catalog::output_filename(r), r.drug_name))
        .collect();

    format!(
        "# MediTrack QR Codes

This directory contains QR codes for testing the MediTrack app verification functionality.

## How to Use

1. Open the MediTrack app on your mobile device
2. Navigate to the scan functionality
3. Scan any of the QR code images in this directory
4. The app will display verification results based on the batch data

## QR Code Types

### Authentic Batches
{authentic}
### Counterfeit Batches (for testing)
{counterfeit}
## Technical Details

- QR codes contain batch IDs in format: `batch:BATCH-ID`
- The app's `mockApi.ts` processes these IDs and returns verification data
- Batches with \"fake\" in the ID will show as counterfeit
- All other batches will show as authentic with full provenance data

## Files

- `{BATCH_INFO_FILE}` - Complete batch information in JSON format
- `{README_FILE}` - This file
- `*.png` - QR code images

Generated on: {generated_on}
"
    )
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::filesystem(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CATALOG;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_output_dir_idempotent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("nested").join("qr_codes");
        ensure_output_dir(&target).unwrap();
        fs::write(target.join("keep.txt"), "x").unwrap();
        ensure_output_dir(&target).unwrap();
        assert_eq!(fs::read_to_string(target.join("keep.txt")).unwrap(), "x");
    }

    #[test]
    fn test_ensure_output_dir_rejects_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("occupied");
        fs::write(&target, "not a dir").unwrap();
        assert!(matches!(
            ensure_output_dir(&target),
            Err(Error::Filesystem { .. })
        ));
    }

    #[test]
    fn test_batch_info_round_trips_catalog() {
        let dir = TempDir::new().unwrap();
        let path = write_batch_info(dir.path(), CATALOG).unwrap();
        let info: BatchInfo = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(info.batches, CATALOG);
        assert_eq!(info.description, "QR codes for MediTrack app testing");
        assert!(info.generated_at.contains('T'));
    }

    #[test]
    fn test_readme_lists_every_image() {
        let body = readme_contents(CATALOG, "2026-01-01 00:00:00");
        for record in CATALOG {
            assert!(body.contains(&catalog::output_filename(record)));
        }
        assert!(body.contains("- `BATCH-2025-001_authentic.png` - Amoxicillin 500mg (GoodPharma Ltd)"));
        assert!(body.contains("- `BATCH-FAKE-001_counterfeit.png` - Fake Ibuprofen 200mg"));
        assert!(body.contains("`batch:BATCH-ID`"));
        assert!(body.ends_with("Generated on: 2026-01-01 00:00:00\n"));
    }

    #[cfg(feature = "render")]
    #[test]
    fn test_generate_one_unknown_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");
        let result = Generator::default().generate_one("NONEXISTENT-ID", &target);
        assert!(matches!(result, Err(Error::BatchNotFound { .. })));
        assert!(!target.exists());
    }

    #[cfg(not(feature = "render"))]
    #[test]
    fn test_missing_encoder_aborts_before_writing() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out");

        match Generator::default().generate_all(&target) {
            Err(Error::EncodingUnavailable { remediation }) => assert!(!remediation.is_empty()),
            other => panic!("expected EncodingUnavailable, got {other:?}"),
        }
        assert!(!target.exists());

        assert!(matches!(
            Generator::default().generate_one("BATCH-2025-001", &target),
            Err(Error::EncodingUnavailable { .. })
        ));
        assert!(!target.exists());
    }
}
