//! Wire messages of the validation server
//!
//! One JSON object per line in each direction. A client line is a [`Request`];
//! the server answers it with a [`Response`] carrying the same `id`, and in
//! between pushes run events as [`Notification`]s whose `id` is null.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::validator::{ValidationEvent, ValidationSummary};

/// Whatever the client put in `id`; echoed back untouched
pub type RequestId = Option<Value>;

#[derive(Debug, Deserialize)]
pub struct Request {
    pub id: RequestId,
    pub method: String,
    pub params: Option<Value>,
}

/// Reply to one request; exactly one of `result` and `error` is set
#[derive(Debug, Serialize)]
pub struct Response {
    pub id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

/// Failure payload of a [`Response`], codes from [`error_codes`]
#[derive(Debug, Serialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl Response {
    pub fn success(id: RequestId, result: Value) -> Self {
        Response {
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: RequestId, code: i32, message: impl Into<String>) -> Self {
        Response {
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }

    pub fn to_line(&self) -> String {
        encode_line(self)
    }
}

/// Run event pushed without a request
#[derive(Debug, Serialize)]
pub struct Notification {
    pub id: RequestId,
    pub method: &'static str,
    pub result: Value,
}

impl Notification {
    /// Tag `event` with the run that emitted it
    pub fn from_event(run_id: u64, event: &ValidationEvent) -> Self {
        let (method, result) = match event {
            ValidationEvent::ErrorFound(error) => (methods::ERROR_FOUND, json!({ "run_id": run_id, "error": error })),
            ValidationEvent::Finished(summary) => (methods::VALIDATION_FINISHED, settled(run_id, summary)),
            ValidationEvent::Cancelled(summary) => (methods::VALIDATION_CANCELLED, settled(run_id, summary)),
        };
        Notification {
            id: None,
            method,
            result,
        }
    }

    pub fn to_line(&self) -> String {
        encode_line(self)
    }
}

fn settled(run_id: u64, summary: &ValidationSummary) -> Value {
    json!({ "run_id": run_id, "summary": summary, "message": summary.message() })
}

// A line that fails to encode still reaches the client, as an internal error
fn encode_line<T: Serialize>(message: &T) -> String {
    match serde_json::to_string(message) {
        Ok(line) => line,
        Err(e) => json!({
            "id": null,
            "error": { "code": error_codes::INTERNAL_ERROR, "message": format!("cannot encode message: {}", e) },
        })
        .to_string(),
    }
}

/// `method` values of server notifications
pub mod methods {
    pub const ERROR_FOUND: &str = "errorFound";
    pub const VALIDATION_FINISHED: &str = "validationFinished";
    pub const VALIDATION_CANCELLED: &str = "validationCancelled";
}

/// Negative codes follow JSON-RPC 2.0; small positive ones are ours
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;

    /// `run_id` was never issued, was discarded, or was evicted after settling
    pub const UNKNOWN_RUN: i32 = 2;
    /// Geometry rejected before checking (see `ValidatorError`)
    pub const PRECONDITION_FAILED: i32 = 3;
}
