//! Validation server - line-delimited JSON-RPC over a reader/writer pair
//!
//! Requests are answered in arrival order. Events of background runs are
//! written as notifications (`id: null`) between responses, in the order each
//! run emitted them.
//!
//! # Module Structure
//! - `protocol` - JSON-RPC request/response/notification types
//! - `state` - Session rules and active runs
//! - `handlers` - Request handlers organized by functionality

pub mod handlers;
pub mod protocol;
pub mod state;

// Re-export key types for convenience
pub use handlers::{handle_line, handle_request};
pub use protocol::{error_codes, Notification, Request, RequestId, Response, RpcError};
pub use state::ServerState;

use anyhow::Context;
use std::io::{BufRead, BufReader, Read, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// How long the loop waits for input before pumping run events again
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Serve requests from `input` until it closes
///
/// Input is read on its own thread so run events keep flowing while the client
/// is idle. On end of input every active run is cancelled and its remaining
/// events are written before returning.
pub fn serve<R, W>(input: R, mut output: W) -> anyhow::Result<()>
where
    R: Read + Send + 'static,
    W: Write,
{
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in BufReader::new(input).lines() {
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut state = ServerState::new();
    loop {
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(Ok(line)) => {
                if let Some(response) = handle_line(&mut state, &line) {
                    write_line(&mut output, &response.to_line())?;
                }
            }
            Ok(Err(e)) => warn!("[Validator Server] Error reading input: {}", e),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for notification in state.pending_notifications() {
            write_line(&mut output, &notification.to_line())?;
        }
    }

    info!("[Validator Server] Input closed, shutting down");
    for notification in state.shutdown() {
        write_line(&mut output, &notification.to_line())?;
    }
    Ok(())
}

fn write_line<W: Write>(output: &mut W, line: &str) -> anyhow::Result<()> {
    writeln!(output, "{}", line).context("Failed to write to output")?;
    output.flush().context("Failed to flush output")
}
