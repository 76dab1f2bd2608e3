//! Handler module declarations, parameter decoding and method dispatch

pub mod rules;
pub mod runs;
pub mod validate;

// Re-export all handlers for convenient access
pub use rules::*;
pub use runs::*;
pub use validate::*;

use anyhow::Context;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::protocol::{error_codes, Request, Response};
use super::state::ServerState;

/// Decode request params; a missing params object decodes as `{}`
pub(crate) fn parse_params<T: DeserializeOwned>(
    params: Option<serde_json::Value>,
    expected: &str,
) -> anyhow::Result<T> {
    let params = params.unwrap_or_else(|| serde_json::json!({}));
    serde_json::from_value(params).with_context(|| format!("Invalid params: {}", expected))
}

/// Route one request to its handler
pub fn handle_request(state: &mut ServerState, request: Request) -> Response {
    let Request { id, method, params } = request;
    match method.as_str() {
        "Validate" => handle_validate(state, id, params),
        "BeginValidation" => handle_begin_validation(state, id, params),
        "CancelValidation" => handle_cancel_validation(state, id, params),
        "GetValidationStatus" => handle_get_validation_status(state, id, params),
        "GetValidationErrors" => handle_get_validation_errors(state, id, params),
        "DiscardValidation" => handle_discard_validation(state, id, params),
        "SetRules" => handle_set_rules(state, id, params),
        "GetRules" => handle_get_rules(state, id),
        _ => Response::error(
            id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        ),
    }
}

/// Decode and handle one input line; blank lines produce no response
pub fn handle_line(state: &mut ServerState, line: &str) -> Option<Response> {
    if line.trim().is_empty() {
        return None;
    }
    let request: Request = match serde_json::from_str(line) {
        Ok(req) => req,
        Err(e) => {
            warn!("[Validator Server] Failed to parse request: {}", e);
            return Some(Response::error(
                None,
                error_codes::PARSE_ERROR,
                format!("Parse error: {}", e),
            ));
        }
    };
    Some(handle_request(state, request))
}
