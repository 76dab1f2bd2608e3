//! Validation server over stdin/stdout
//!
//! Logs go to stderr; set `RUST_LOG` (default `info`) to adjust verbosity.

use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

use geometry_validator::server::serve;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    info!("[Validator Server] Starting geometry validation server...");
    serve(io::stdin(), io::stdout())?;
    info!("[Validator Server] Shutting down...");
    Ok(())
}
