//! meditrack-qr entrypoint

use clap::Parser;
use meditrack_qr::output::{
    Rendered, render_catalog, render_not_found, render_report, render_single, render_unavailable,
};
use meditrack_qr::{Error, GeneratorConfig, Generator, Result, list_catalog, logging};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "meditrack-qr",
    version,
    about = "Generate QR codes for MediTrack app testing"
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to meditrack-qr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output directory for QR codes (default: qr_codes)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Generate QR code for specific batch ID only
    #[arg(short, long, value_name = "BATCH_ID")]
    batch: Option<String>,

    /// Skip README.md; write only the images and batch_info.json
    #[arg(long)]
    quick: bool,

    /// Decode every written image and check it matches its payload
    #[arg(long)]
    verify: bool,

    /// Print the batch catalog and exit without writing anything
    #[arg(long)]
    list: bool,

    /// Output results as formatted JSON instead of human-readable text
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => return report_failure(&Error::Task(err.to_string()), json),
    };

    let outcome = runtime.block_on(run(cli));
    // Do not wait on a generation task abandoned by Ctrl-C.
    runtime.shutdown_background();

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_failure(&err, json),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = GeneratorConfig::load(cli.config.as_deref())?;

    if let Some(dir) = cli.output {
        config.output.dir = dir;
    }
    if cli.quick {
        config.output.emit_readme = false;
    }
    if cli.verify {
        config.output.verify = true;
    }

    logging::init(&config.logging)?;

    if cli.list {
        return emit(&render_catalog(list_catalog()), cli.json);
    }

    if !cli.json {
        println!("🏥 MediTrack QR Code Generator");
        println!("{}", "=".repeat(40));
    }

    let generator = Generator::from_config(&config);
    let output_dir = config.output.dir;
    let batch = cli.batch;

    let task = tokio::task::spawn_blocking(move || -> Result<Rendered> {
        match batch {
            Some(batch_id) => generator
                .generate_one(&batch_id, &output_dir)
                .map(|artifact| render_single(&artifact, &output_dir)),
            None => generator
                .generate_all(&output_dir)
                .map(|report| render_report(&report)),
        }
    });

    let rendered = tokio::select! {
        joined = task => joined.map_err(|e| Error::Task(e.to_string()))??,
        _ = tokio::signal::ctrl_c() => return Err(Error::Cancelled),
    };

    emit(&rendered, cli.json)
}

fn emit(rendered: &Rendered, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&rendered.json)?);
    } else {
        for line in &rendered.human {
            println!("{line}");
        }
    }
    Ok(())
}

/// Exit status for a failed run.
///
/// Unknown batch IDs and a missing encoder are informational and exit 0.
fn exit_status(err: &Error) -> u8 {
    match err {
        Error::BatchNotFound { .. } | Error::EncodingUnavailable { .. } => 0,
        Error::Cancelled => 130,
        _ => 1,
    }
}

/// Print a failed run and map it onto an exit code.
fn report_failure(err: &Error, json: bool) -> ExitCode {
    let informational = match err {
        Error::BatchNotFound {
            batch_id,
            available,
        } => Some(render_not_found(batch_id, available)),
        Error::EncodingUnavailable { remediation } => Some(render_unavailable(remediation)),
        _ => None,
    };

    if let Some(rendered) = informational {
        tracing::warn!("{err}");
        return match emit(&rendered, json) {
            Ok(()) => ExitCode::from(exit_status(err)),
            Err(_) => ExitCode::FAILURE,
        };
    }

    tracing::error!("{err}");
    if json {
        println!("{}", json!({ "error": err.to_string() }));
    } else {
        eprintln!();
        eprintln!("❌ {}", match err {
            Error::Cancelled => err.to_string(),
            _ => format!("Error: {err}"),
        });
    }

    ExitCode::from(exit_status(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_informational_outcomes_exit_zero() {
        let not_found = Error::BatchNotFound {
            batch_id: "NONEXISTENT-ID".to_string(),
            available: meditrack_qr::batch_ids(),
        };
        let unavailable = Error::EncodingUnavailable {
            remediation: meditrack_qr::qr::remediation_steps(),
        };
        assert_eq!(exit_status(&not_found), 0);
        assert_eq!(exit_status(&unavailable), 0);
    }

    #[test]
    fn test_cancellation_exits_130() {
        assert_eq!(exit_status(&Error::Cancelled), 130);
    }

    #[test]
    fn test_other_failures_exit_one() {
        let fs_error = Error::filesystem(
            PathBuf::from("qr_codes"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(exit_status(&fs_error), 1);
        assert_eq!(exit_status(&Error::Config("bad".to_string())), 1);
        assert_eq!(exit_status(&Error::Task("panicked".to_string())), 1);
    }

    #[test]
    fn test_cli_accepts_short_flags() {
        let cli = Cli::parse_from(["meditrack-qr", "-o", "out", "-b", "BATCH-FAKE-001", "--quick"]);
        assert_eq!(cli.output, Some(PathBuf::from("out")));
        assert_eq!(cli.batch.as_deref(), Some("BATCH-FAKE-001"));
        assert!(cli.quick);
    }
}
