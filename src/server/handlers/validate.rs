//! Validation handlers: Validate, BeginValidation

use serde::Deserialize;
use std::time::Instant;
use tracing::info;

use crate::geometry::Geometry;
use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;
use crate::validator::{
    begin_validation_with_rules, validate_sync_with_rules, RunStatus, ValidationRules, ValidationSummary,
};

use super::parse_params;

#[derive(Deserialize)]
struct GeometryParams {
    geometry: Geometry,
    /// Overrides the session rules for this request only
    #[serde(default)]
    rules: Option<ValidationRules>,
}

const GEOMETRY_PARAMS: &str = "expected {geometry: {kind, parts}, rules?}";

/// Handle Validate request - runs all checks on the request thread
pub fn handle_validate(
    state: &ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let params: GeometryParams = match parse_params(params, GEOMETRY_PARAMS) {
        Ok(p) => p,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("{:#}", e)),
    };
    let rules = params.rules.unwrap_or_else(|| state.rules.clone());

    let start = Instant::now();
    let errors = match validate_sync_with_rules(&params.geometry, &rules) {
        Ok(errors) => errors,
        Err(e) => return Response::error(id, error_codes::PRECONDITION_FAILED, e.to_string()),
    };
    let summary = ValidationSummary {
        status: RunStatus::Finished,
        error_count: errors.len(),
        elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
    };

    info!(
        "[Validator Server] Validate completed in {:.2}ms: {} errors found",
        summary.elapsed_ms, summary.error_count
    );

    Response::success(
        id,
        serde_json::json!({
            "status": "ok",
            "valid": errors.is_empty(),
            "error_count": summary.error_count,
            "elapsed_ms": summary.elapsed_ms,
            "message": summary.message(),
            "errors": errors,
        }),
    )
}

/// Handle BeginValidation request - starts a background run and returns its id
///
/// Events of the run are delivered as notifications by the server loop.
pub fn handle_begin_validation(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    let params: GeometryParams = match parse_params(params, GEOMETRY_PARAMS) {
        Ok(p) => p,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("{:#}", e)),
    };
    let rules = params.rules.unwrap_or_else(|| state.rules.clone());
    let vertex_count = params.geometry.vertex_count();

    let handle = match begin_validation_with_rules(params.geometry, rules) {
        Ok(handle) => handle,
        Err(e) => return Response::error(id, error_codes::PRECONDITION_FAILED, e.to_string()),
    };
    let run_id = state.insert_run(handle);

    info!(
        "[Validator Server] Started run {} ({} vertices, {} active runs)",
        run_id,
        vertex_count,
        state.runs.len()
    );

    Response::success(
        id,
        serde_json::json!({
            "status": "started",
            "run_id": run_id,
        }),
    )
}
