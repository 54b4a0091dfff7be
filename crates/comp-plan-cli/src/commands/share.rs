use clap::Args;
use serde_json::{json, Value};
use tracing::info;

use comp_plan_core::sharing::{self, STATE_QUERY_PARAM};

use super::scenario::{load_scenario, ScenarioArgs};

/// Arguments for encoding or decoding a share token
#[derive(Args)]
pub struct ShareArgs {
    /// Decode this token (or a query string containing `s=<token>`) instead of encoding
    #[arg(long)]
    pub decode: Option<String>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

/// Accept either a bare token or a query string carrying one.
fn extract_token(raw: &str) -> &str {
    let raw = raw.trim();
    let query = raw.rsplit_once('?').map(|(_, q)| q).unwrap_or(raw);
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == STATE_QUERY_PARAM)
        .map(|(_, value)| value)
        .unwrap_or(raw)
}

pub fn run_share(args: ShareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(ref raw) = args.decode {
        let token = extract_token(raw);
        info!(len = token.len(), "decoding share token");
        let state = sharing::try_decode_state(token)?;
        return Ok(serde_json::to_value(state)?);
    }

    let state = load_scenario(&args.scenario)?;
    let token = sharing::encode_state(&state)?;
    info!(len = token.len(), "encoded share token");
    Ok(json!({
        "token": token,
        "query": format!("?{}={}", STATE_QUERY_PARAM, token),
    }))
}
