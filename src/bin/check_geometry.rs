//! CLI tool for validating a geometry stored as JSON
//!
//! Usage:
//!   cargo run --release --bin check_geometry -- <file.json> [options]
//!
//! Options:
//!   --sync              Validate on the calling thread instead of a worker
//!   --summary           Show the summary line only

use anyhow::{bail, Context};
use std::env;
use std::fs;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use geometry_validator::{
    begin_validation, validate_sync, Geometry, RunStatus, ValidationEvent, ValidationSummary,
};

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.json> [options]", args[0]);
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --sync       Validate on the calling thread instead of a worker");
        eprintln!("  --summary    Show the summary line only");
        eprintln!();
        eprintln!("Examples:");
        eprintln!("  {} parcel.json", args[0]);
        eprintln!("  {} parcel.json --sync --summary", args[0]);
        return Ok(ExitCode::from(2));
    }

    let path = &args[1];

    // Parse options
    let mut sync = false;
    let mut summary_only = false;
    for arg in &args[2..] {
        match arg.as_str() {
            "--sync" => sync = true,
            "--summary" => summary_only = true,
            other => bail!("Unknown option: {}", other),
        }
    }

    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let geometry: Geometry =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse geometry from {}", path))?;

    println!(
        "Checking {} geometry: {} parts, {} vertices",
        format!("{:?}", geometry.kind).to_lowercase(),
        geometry.parts.len(),
        geometry.vertex_count()
    );

    let summary = if sync {
        let start = std::time::Instant::now();
        let errors = validate_sync(&geometry)?;
        if !summary_only {
            for error in &errors {
                print_error(error);
            }
        }
        ValidationSummary {
            status: RunStatus::Finished,
            error_count: errors.len(),
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    } else {
        let mut handle = begin_validation(geometry)?;
        let mut summary = None;
        while let Some(event) = handle.next_event() {
            match event {
                ValidationEvent::ErrorFound(error) => {
                    if !summary_only {
                        print_error(&error);
                    }
                }
                ValidationEvent::Finished(s) | ValidationEvent::Cancelled(s) => summary = Some(s),
            }
        }
        match summary {
            Some(s) => s,
            None => handle.wait().summary,
        }
    };

    println!("{} ({:.2}ms)", summary.message(), summary.elapsed_ms);

    Ok(if summary.error_count == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_error(error: &geometry_validator::ValidationError) {
    println!("  [{:?}] {}", error.kind, error.message);
}
