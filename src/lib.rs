//! MediTrack QR - test-fixture QR codes for batch verification
//!
//! This library renders the fixed MediTrack batch catalog into scannable QR
//! images that the mobile client's mock verification API understands.
//!
//! # Features
//!
//! - **Static catalog**: five known batches, authentic and counterfeit
//! - **Payload convention**: every code carries `batch:<batchId>`
//! - **Artifacts**: one PNG per batch plus `batch_info.json` and `README.md`
//! - **Read-back**: optional decode of each written image
//!
//! # Example
//!
//! ```no_run
//! use meditrack_qr::Generator;
//! use std::path::Path;
//!
//! fn main() -> meditrack_qr::Result<()> {
//!     let report = Generator::default().generate_all(Path::new("qr_codes"))?;
//!     for artifact in &report.artifacts {
//!         println!("{} -> {}", artifact.payload, artifact.path.display());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod output;
pub mod qr;

// Re-exports for convenience
pub use error::{Error, Result};

pub use catalog::{
    Authenticity, BatchRecord, CATALOG, batch_ids, encode_payload, find_batch, list_catalog,
    output_filename, parse_payload,
};
pub use config::{GeneratorConfig, LogRotation, LoggingOptions, OutputOptions, RenderOptions};
pub use generator::{
    BatchInfo, GenerateOptions, GeneratedArtifact, GenerationReport, Generator,
    ensure_output_dir,
};
pub use qr::{QrDecoder, QrEncoder, QrPayload};
