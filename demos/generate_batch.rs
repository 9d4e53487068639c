//! Generate a single batch QR code and read it back
//!
//! Usage: cargo run --example generate_batch -- BATCH-FAKE-002

use meditrack_qr::{Generator, QrDecoder, Result};
use std::path::Path;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let batch_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "BATCH-2025-001".to_string());

    let artifact = Generator::default().generate_one(&batch_id, Path::new("qr_demo"))?;
    println!("✓ Wrote {}", artifact.path.display());
    println!("  Content: {}", artifact.payload);

    let decoded = QrDecoder::new().decode_file(&artifact.path)?;
    println!("  Scans as batch: {:?}", decoded.batch_id());

    Ok(())
}
