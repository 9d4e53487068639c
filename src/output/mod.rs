//! Helpers for rendering run results for the console
//!
//! Every renderer produces both a structured JSON value (for `--json`) and the
//! human-readable lines printed otherwise.

use crate::catalog::BatchRecord;
use crate::generator::{GeneratedArtifact, GenerationReport};
use serde_json::{Value, json};
use std::path::Path;

/// Combined structured and human-readable representation of a result
#[derive(Debug, Clone)]
pub struct Rendered {
    /// Structured JSON representation suitable for downstream tooling
    pub json: Value,
    /// Human-readable lines for terminal presentation
    pub human: Vec<String>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

fn status_icon(record: &BatchRecord) -> &'static str {
    if record.authentic { "✅" } else { "❌" }
}

fn artifact_value(artifact: &GeneratedArtifact) -> Value {
    json!({
        "batch_id": artifact.record.batch_id,
        "drug_name": artifact.record.drug_name,
        "status": artifact.record.authenticity().as_str(),
        "file": artifact.path.display().to_string(),
        "qr_content": artifact.payload,
    })
}

/// Render the result of a full-catalog run.
pub fn render_report(report: &GenerationReport) -> Rendered {
    let mut human = vec![
        format!("Generating QR codes for {} batches...", report.artifacts.len()),
        String::new(),
    ];

    for (i, artifact) in report.artifacts.iter().enumerate() {
        let record = artifact.record;
        human.push(format!("{}. {}", i + 1, record.batch_id));
        human.push(format!("   📦 {}", record.drug_name));
        human.push(format!("   🏭 {}", record.manufacturer));
        human.push(format!(
            "   {} {}",
            status_icon(record),
            record.authenticity().label()
        ));
        human.push(format!("   📄 {}", file_name(&artifact.path)));
        human.push(format!("   🔗 QR Content: {}", artifact.payload));
        human.push(String::new());
    }

    human.push("📋 Additional files generated:".to_string());
    human.push(format!(
        "   - {} (batch information)",
        file_name(&report.batch_info)
    ));
    if let Some(readme) = &report.readme {
        human.push(format!("   - {} (documentation)", file_name(readme)));
    }
    human.extend(completion_lines(&report.output_dir));

    let json = json!({
        "output_dir": absolute(&report.output_dir),
        "artifacts": report.artifacts.iter().map(artifact_value).collect::<Vec<_>>(),
        "batch_info": report.batch_info.display().to_string(),
        "readme": report.readme.as_ref().map(|p| p.display().to_string()),
    });

    Rendered { json, human }
}

/// Render the result of a `--batch` run.
pub fn render_single(artifact: &GeneratedArtifact, output_dir: &Path) -> Rendered {
    let record = artifact.record;
    let mut human = vec![
        format!("✅ Generated QR code for {}", record.batch_id),
        format!("   File: {}", artifact.path.display()),
        format!("   Content: {}", artifact.payload),
        format!("   Drug: {}", record.drug_name),
        format!(
            "   Status: {} {}",
            status_icon(record),
            record.authenticity().label()
        ),
    ];
    human.extend(completion_lines(output_dir));

    let json = json!({
        "output_dir": absolute(output_dir),
        "artifacts": [artifact_value(artifact)],
    });

    Rendered { json, human }
}

fn completion_lines(output_dir: &Path) -> Vec<String> {
    vec![
        String::new(),
        "🎉 QR code generation complete!".to_string(),
        format!("📁 Output directory: {}", absolute(output_dir)),
        "📱 Scan these QR codes with the MediTrack app to test verification".to_string(),
        String::new(),
        "💡 QR Code Format:".to_string(),
        "   Each QR code contains: batch:BATCH-ID".to_string(),
    ]
}

/// Render the informational "unknown batch" outcome.
pub fn render_not_found(batch_id: &str, available: &[String]) -> Rendered {
    let mut human = vec![
        format!("❌ Batch ID '{batch_id}' not found in mock data"),
        "Available batch IDs:".to_string(),
    ];
    human.extend(available.iter().map(|id| format!("  - {id}")));

    let json = json!({
        "error": "batch_not_found",
        "batch_id": batch_id,
        "available": available,
    });

    Rendered { json, human }
}

/// Render remediation guidance for a build without the QR encoder.
pub fn render_unavailable(remediation: &[String]) -> Rendered {
    let mut human = vec![
        "❌ QR code encoder not available in this build!".to_string(),
        String::new(),
    ];
    human.extend(remediation.iter().cloned());

    let json = json!({
        "error": "encoding_unavailable",
        "remediation": remediation,
    });

    Rendered { json, human }
}

/// Render the catalog for `--list`.
pub fn render_catalog(records: &[BatchRecord]) -> Rendered {
    let mut human = vec![format!("{} batches in catalog:", records.len())];
    for record in records {
        human.push(format!(
            "  {} {:<16} {:<20} {:<22} exp {}  -> {}",
            status_icon(record),
            record.batch_id,
            record.drug_name,
            record.manufacturer,
            record.expiry,
            record.output_filename()
        ));
    }

    let json = json!({ "batches": records });
    Rendered { json, human }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CATALOG, batch_ids, find_batch};
    use std::path::PathBuf;

    fn artifact(id: &str) -> GeneratedArtifact {
        let record = find_batch(id).unwrap();
        GeneratedArtifact {
            record,
            path: PathBuf::from("qr_codes").join(record.output_filename()),
            payload: record.payload(),
        }
    }

    #[test]
    fn test_not_found_lists_all_ids() {
        let rendered = render_not_found("NOPE", &batch_ids());
        assert_eq!(rendered.human.len(), 2 + CATALOG.len());
        assert_eq!(rendered.human[2], "  - BATCH-2025-001");
        assert_eq!(rendered.json["available"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn test_single_json_carries_payload() {
        let rendered = render_single(&artifact("BATCH-FAKE-001"), Path::new("qr_codes"));
        let entry = &rendered.json["artifacts"][0];
        assert_eq!(entry["qr_content"], "batch:BATCH-FAKE-001");
        assert_eq!(entry["status"], "counterfeit");
        assert!(rendered.human[0].contains("BATCH-FAKE-001"));
    }

    #[test]
    fn test_report_mentions_readme_only_when_written() {
        let mut report = GenerationReport {
            output_dir: PathBuf::from("qr_codes"),
            artifacts: vec![artifact("BATCH-2025-001")],
            batch_info: PathBuf::from("qr_codes/batch_info.json"),
            readme: None,
        };
        let without = render_report(&report);
        assert!(!without.human.iter().any(|l| l.contains("README.md")));
        assert!(without.json["readme"].is_null());

        report.readme = Some(PathBuf::from("qr_codes/README.md"));
        let with = render_report(&report);
        assert!(with.human.iter().any(|l| l.contains("README.md (documentation)")));
    }

    #[test]
    fn test_catalog_json_uses_record_fields() {
        let rendered = render_catalog(CATALOG);
        assert_eq!(rendered.json["batches"][2]["batchId"], "BATCH-FAKE-001");
        assert_eq!(rendered.human.len(), CATALOG.len() + 1);
    }
}
