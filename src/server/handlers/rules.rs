//! Rule handlers: SetRules, GetRules

use serde::Deserialize;
use tracing::info;

use crate::server::protocol::{error_codes, Response};
use crate::server::state::ServerState;

use super::parse_params;

/// Handle SetRules request - updates the session rules; omitted fields keep their value
pub fn handle_set_rules(
    state: &mut ServerState,
    id: Option<serde_json::Value>,
    params: Option<serde_json::Value>,
) -> Response {
    #[derive(Deserialize)]
    struct SetRulesParams {
        #[serde(default)]
        spatial_index_threshold: Option<usize>,
        #[serde(default)]
        check_part_nesting: Option<bool>,
    }

    let params: SetRulesParams = match parse_params(
        params,
        "expected {spatial_index_threshold?: integer, check_part_nesting?: bool}",
    ) {
        Ok(p) => p,
        Err(e) => return Response::error(id, error_codes::INVALID_PARAMS, format!("{:#}", e)),
    };

    if let Some(threshold) = params.spatial_index_threshold {
        state.rules.spatial_index_threshold = threshold;
    }
    if let Some(nesting) = params.check_part_nesting {
        state.rules.check_part_nesting = nesting;
    }

    info!("[Validator Server] Rules updated: {:?}", state.rules);

    handle_get_rules(state, id)
}

/// Handle GetRules request - returns the session rules
pub fn handle_get_rules(state: &ServerState, id: Option<serde_json::Value>) -> Response {
    match serde_json::to_value(&state.rules) {
        Ok(rules) => Response::success(id, rules),
        Err(e) => Response::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}
