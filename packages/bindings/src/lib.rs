use napi::Result as NapiResult;
use napi_derive::napi;

use comp_plan_core::analysis::{break_even, comparison, dashboard, tier_financials, waterfall};
use comp_plan_core::presets::{self, PresetId};
use comp_plan_core::sharing::{self, PlanState};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Plan analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_tier(input_json: String) -> NapiResult<String> {
    let input: tier_financials::TierInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = tier_financials::analyze_tier(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_dashboard(input_json: String) -> NapiResult<String> {
    let input: dashboard::DashboardInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = dashboard::analyze_dashboard(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_waterfall(input_json: String) -> NapiResult<String> {
    let input: dashboard::DashboardInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = waterfall::analyze_waterfall(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Plan comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_comparison(input_json: String) -> NapiResult<String> {
    let input: comparison::ScenarioInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = comparison::analyze_comparison(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_break_even_curve(input_json: String) -> NapiResult<String> {
    let input: break_even::BreakEvenCurveInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = break_even::analyze_break_even_curve(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

#[napi]
pub fn list_presets() -> NapiResult<String> {
    serde_json::to_string(&presets::all_presets()).map_err(to_napi_error)
}

#[napi]
pub fn get_preset(id: String) -> NapiResult<String> {
    let id: PresetId = id.parse().map_err(to_napi_error)?;
    serde_json::to_string(&presets::preset(id)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Share tokens
// ---------------------------------------------------------------------------

#[napi]
pub fn encode_state(state_json: String) -> NapiResult<String> {
    let state: PlanState = serde_json::from_str(&state_json).map_err(to_napi_error)?;
    sharing::encode_state(&state).map_err(to_napi_error)
}

/// Returns `null` for a missing or malformed token.
#[napi]
pub fn decode_state(token: String) -> NapiResult<Option<String>> {
    sharing::decode_state(&token)
        .map(|state| serde_json::to_string(&state).map_err(to_napi_error))
        .transpose()
}

/// Decode the state carried in a URL query string, or `null`.
#[napi]
pub fn state_from_query(query: String) -> NapiResult<Option<String>> {
    sharing::state_from_query(&query)
        .map(|state| serde_json::to_string(&state).map_err(to_napi_error))
        .transpose()
}
