//! Run handlers: CancelValidation, GetValidationStatus, GetValidationErrors, DiscardValidation

use serde::Deserialize;
use tracing::info;

use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;

use super::parse_params;

#[derive(Deserialize)]
struct RunParams {
    run_id: u64,
}

const RUN_PARAMS: &str = "expected {run_id: integer}";

fn unknown_run(id: Option<serde_json::Value>, run_id: u64) -> Response {
    Response::error(id, error_codes::UNKNOWN_RUN, format!("Unknown run: {}", run_id))
}

/// Handle CancelValidation request - a no-op on runs that already ended
pub fn handle_cancel_validation(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let params: RunParams = match parse_params(params, RUN_PARAMS) {
        Ok(p) => p,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("{:#}", e)),
    };
    let Some(handle) = state.run_mut(params.run_id) else {
        return unknown_run(id, params.run_id);
    };

    handle.cancel();
    info!("[Validator Server] Cancel requested for run {}", params.run_id);

    Response::success(
        id,
        serde_json::json!({
            "run_id": params.run_id,
            "status": handle.status(),
        }),
    )
}

/// Handle GetValidationStatus request
pub fn handle_get_validation_status(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let params: RunParams = match parse_params(params, RUN_PARAMS) {
        Ok(p) => p,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("{:#}", e)),
    };
    let Some(handle) = state.run_mut(params.run_id) else {
        return unknown_run(id, params.run_id);
    };

    let status = handle.status();
    let error_count = handle.errors().len();
    let message = handle.summary().map(|s| s.message());

    Response::success(
        id,
        serde_json::json!({
            "run_id": params.run_id,
            "status": status,
            "finished": status.is_terminal(),
            "error_count": error_count,
            "message": message,
        }),
    )
}

/// Handle GetValidationErrors request - errors received so far, in emission order
pub fn handle_get_validation_errors(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let params: RunParams = match parse_params(params, RUN_PARAMS) {
        Ok(p) => p,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("{:#}", e)),
    };
    let Some(handle) = state.run_mut(params.run_id) else {
        return unknown_run(id, params.run_id);
    };

    let status = handle.status();
    let errors = handle.errors();

    Response::success(
        id,
        serde_json::json!({
            "run_id": params.run_id,
            "status": status,
            "errors": errors,
        }),
    )
}

/// Handle DiscardValidation request - cancels the run if needed and forgets it
pub fn handle_discard_validation(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let params: RunParams = match parse_params(params, RUN_PARAMS) {
        Ok(p) => p,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("{:#}", e)),
    };
    let Some(handle) = state.discard_run(params.run_id) else {
        return unknown_run(id, params.run_id);
    };

    handle.cancel();
    let outcome = handle.wait();
    info!(
        "[Validator Server] Discarded run {} ({:?}, {} errors)",
        params.run_id,
        outcome.status(),
        outcome.errors.len()
    );

    Response::success(
        id,
        serde_json::json!({
            "run_id": params.run_id,
            "status": outcome.status(),
        }),
    )
}
