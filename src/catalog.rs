//! Static catalog of pharmaceutical batch records
//!
//! The catalog mirrors the records served by the MediTrack mobile client's mock
//! verification API. It is a process-wide constant: records are never mutated,
//! rebuilt or persisted beyond this definition.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Prefix the mock verification API expects in front of every batch ID.
pub const PAYLOAD_PREFIX: &str = "batch:";

/// A single batch entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRecord {
    /// Unique identifier, e.g. `BATCH-2025-001`
    pub batch_id: Cow<'static, str>,
    /// Product name and strength
    pub drug_name: Cow<'static, str>,
    /// Lot number
    pub lot: Cow<'static, str>,
    /// Manufacturer name
    pub manufacturer: Cow<'static, str>,
    /// Expiry date (`YYYY-MM-DD`), not checked against the current date
    pub expiry: Cow<'static, str>,
    /// Whether the batch is genuine
    pub authentic: bool,
    /// Free-text description
    pub description: Cow<'static, str>,
}

/// Authenticity status derived from [`BatchRecord::authentic`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authenticity {
    /// Genuine product
    Authentic,
    /// Known counterfeit, kept for negative-path testing
    Counterfeit,
}

impl Authenticity {
    /// Lowercase tag used in artifact filenames.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authentic => "authentic",
            Self::Counterfeit => "counterfeit",
        }
    }

    /// Capitalised label for console output.
    pub fn label(self) -> &'static str {
        match self {
            Self::Authentic => "Authentic",
            Self::Counterfeit => "Counterfeit",
        }
    }
}

impl fmt::Display for Authenticity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BatchRecord {
    /// Authenticity status of this record.
    pub fn authenticity(&self) -> Authenticity {
        if self.authentic {
            Authenticity::Authentic
        } else {
            Authenticity::Counterfeit
        }
    }

    /// QR payload for this record.
    pub fn payload(&self) -> String {
        encode_payload(self)
    }

    /// PNG filename for this record.
    pub fn output_filename(&self) -> String {
        output_filename(self)
    }
}

const fn record(
    batch_id: &'static str,
    drug_name: &'static str,
    lot: &'static str,
    manufacturer: &'static str,
    expiry: &'static str,
    authentic: bool,
    description: &'static str,
) -> BatchRecord {
    BatchRecord {
        batch_id: Cow::Borrowed(batch_id),
        drug_name: Cow::Borrowed(drug_name),
        lot: Cow::Borrowed(lot),
        manufacturer: Cow::Borrowed(manufacturer),
        expiry: Cow::Borrowed(expiry),
        authentic,
        description: Cow::Borrowed(description),
    }
}

/// The fixed batch catalog, in definition order.
pub static CATALOG: &[BatchRecord] = &[
    record(
        "BATCH-2025-001",
        "Amoxicillin 500mg",
        "LOT-12345",
        "GoodPharma Ltd",
        "2026-12-31",
        true,
        "Authentic Amoxicillin batch",
    ),
    record(
        "BATCH-2025-002",
        "Paracetamol 500mg",
        "LOT-67890",
        "PharmaCorp Ltd",
        "2026-06-30",
        true,
        "Authentic Paracetamol batch",
    ),
    record(
        "BATCH-FAKE-001",
        "Ibuprofen 200mg",
        "LOT-FAKE-123",
        "SuspiciousPharma Inc",
        "2025-03-15",
        false,
        "Counterfeit Ibuprofen batch (for testing)",
    ),
    record(
        "BATCH-2025-003",
        "Aspirin 100mg",
        "LOT-ASP-456",
        "HealthPharma",
        "2026-09-20",
        true,
        "Authentic Aspirin batch",
    ),
    record(
        "BATCH-FAKE-002",
        "Amoxicillin 500mg",
        "LOT-FAKE-789",
        "CounterfeitCorp",
        "2024-12-31",
        false,
        "Counterfeit Amoxicillin batch (for testing)",
    ),
];

/// Return the fixed catalog in definition order.
pub fn list_catalog() -> &'static [BatchRecord] {
    CATALOG
}

/// Every batch ID in catalog order.
pub fn batch_ids() -> Vec<String> {
    CATALOG.iter().map(|r| r.batch_id.to_string()).collect()
}

/// Look up a record by exact batch ID.
///
/// Fails with [`Error::BatchNotFound`] carrying the full list of valid IDs.
pub fn find_batch(batch_id: &str) -> Result<&'static BatchRecord> {
    CATALOG
        .iter()
        .find(|r| r.batch_id == batch_id)
        .ok_or_else(|| Error::BatchNotFound {
            batch_id: batch_id.to_string(),
            available: batch_ids(),
        })
}

/// Build the QR payload for a record: `batch:` followed by the batch ID, verbatim.
pub fn encode_payload(record: &BatchRecord) -> String {
    format!("{PAYLOAD_PREFIX}{}", record.batch_id)
}

/// Extract the batch ID from a scanned payload, if it carries the `batch:` prefix.
pub fn parse_payload(payload: &str) -> Option<&str> {
    payload
        .strip_prefix(PAYLOAD_PREFIX)
        .filter(|id| !id.is_empty())
}

/// `{batchId}_{authentic|counterfeit}.png`
pub fn output_filename(record: &BatchRecord) -> String {
    format!("{}_{}.png", record.batch_id, record.authenticity())
}
