//! Compact, URL-safe encoding of a full plan comparison.
//!
//! Layout before compression (all numbers, fixed order):
//!
//! ```text
//! [
//!   [[pd, rate, depth, min_pv, min_tv, min_recruits] x 3],   current plan
//!   [[pd, rate, depth, min_pv, min_tv, min_recruits] x 3],   proposed plan
//!   [c_hc, l_hc, lol_hc, c_avg, l_avg, lol_avg, growth, promotion, attrition]
//! ]
//! ```
//!
//! The JSON text is zlib-compressed and base64url-encoded without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::debug;

use crate::error::CompPlanError;
use crate::numeric::{is_binary64_exact, to_f64};
use crate::plan::tiers::whole_number;
use crate::plan::validation::{validate_network, validate_plan};
use crate::plan::{CompensationPlan, NetworkParams, PerTier, PlanSide, TierConfig, TierId};
use crate::sharing::PlanState;
use crate::CompPlanResult;

const TIER_FIELDS: usize = 6;
const NETWORK_FIELDS: usize = 9;

/// Decompressed payloads larger than this are rejected outright.
const MAX_STATE_BYTES: u64 = 64 * 1024;

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// JSON numbers are read back as doubles, so a value that a double cannot
/// hold exactly would not survive the round trip and is refused.
fn number(value: Decimal) -> CompPlanResult<Value> {
    if !is_binary64_exact(value) {
        return Err(CompPlanError::SerializationError(format!(
            "{value} is not representable as a double"
        )));
    }
    if value.fract().is_zero() {
        if let Some(i) = value.to_i64() {
            return Ok(Value::from(i));
        }
    }
    Number::from_f64(to_f64(value))
        .map(Value::Number)
        .ok_or_else(|| CompPlanError::SerializationError(format!("{value} is not representable")))
}

fn decimal_at(values: &[Value], index: usize, field: &str) -> CompPlanResult<Decimal> {
    let text = match values.get(index) {
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(CompPlanError::MalformedState(format!("{field} is not a number"))),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| CompPlanError::MalformedState(format!("{field} is out of range: {text}")))
}

fn count_at<T: TryFrom<u64>>(values: &[Value], index: usize, field: &str) -> CompPlanResult<T> {
    let value = decimal_at(values, index, field)?;
    whole_number(field, value).map_err(|e| CompPlanError::MalformedState(e.to_string()))
}

fn fixed_array<'a>(value: &'a Value, len: usize, what: &str) -> CompPlanResult<&'a [Value]> {
    match value {
        Value::Array(items) if items.len() == len => Ok(items),
        Value::Array(items) => Err(CompPlanError::MalformedState(format!(
            "{what} has {} elements, expected {len}",
            items.len()
        ))),
        _ => Err(CompPlanError::MalformedState(format!("{what} is not an array"))),
    }
}

// ---------------------------------------------------------------------------
// Records <-> arrays
// ---------------------------------------------------------------------------

fn tier_to_array(tier: &TierConfig) -> CompPlanResult<Value> {
    Ok(Value::Array(vec![
        number(tier.personal_discount_pct)?,
        number(tier.override_rate_pct)?,
        Value::from(tier.override_depth),
        number(tier.min_personal_volume)?,
        number(tier.min_team_volume)?,
        Value::from(tier.min_recruits),
    ]))
}

fn tier_from_array(value: &Value, tier: TierId) -> CompPlanResult<TierConfig> {
    let what = format!("tier {tier}");
    let v = fixed_array(value, TIER_FIELDS, &what)?;
    Ok(TierConfig {
        personal_discount_pct: decimal_at(v, 0, "personal_discount_pct")?,
        override_rate_pct: decimal_at(v, 1, "override_rate_pct")?,
        override_depth: count_at(v, 2, "override_depth")?,
        min_personal_volume: decimal_at(v, 3, "min_personal_volume")?,
        min_team_volume: decimal_at(v, 4, "min_team_volume")?,
        min_recruits: count_at(v, 5, "min_recruits")?,
    })
}

fn plan_to_array(plan: &CompensationPlan) -> CompPlanResult<Value> {
    let tiers = plan
        .iter()
        .map(|(_, config)| tier_to_array(config))
        .collect::<CompPlanResult<Vec<_>>>()?;
    Ok(Value::Array(tiers))
}

fn plan_from_array(value: &Value, side: PlanSide) -> CompPlanResult<CompensationPlan> {
    let tiers = fixed_array(value, TierId::ALL.len(), side.as_str())?;
    Ok(PerTier {
        consultant: tier_from_array(&tiers[0], TierId::Consultant)?,
        leader: tier_from_array(&tiers[1], TierId::Leader)?,
        leader_of_leaders: tier_from_array(&tiers[2], TierId::LeaderOfLeaders)?,
    })
}

fn network_to_array(network: &NetworkParams) -> CompPlanResult<Value> {
    Ok(Value::Array(vec![
        Value::from(network.consultant_headcount),
        Value::from(network.leader_headcount),
        Value::from(network.lol_headcount),
        number(network.consultant_avg_sales)?,
        number(network.leader_avg_sales)?,
        number(network.lol_avg_sales)?,
        number(network.growth_rate_pct)?,
        number(network.promotion_rate_pct)?,
        number(network.attrition_rate_pct)?,
    ]))
}

fn network_from_array(value: &Value) -> CompPlanResult<NetworkParams> {
    let v = fixed_array(value, NETWORK_FIELDS, "network")?;
    Ok(NetworkParams {
        consultant_headcount: count_at(v, 0, "consultant_headcount")?,
        leader_headcount: count_at(v, 1, "leader_headcount")?,
        lol_headcount: count_at(v, 2, "lol_headcount")?,
        consultant_avg_sales: decimal_at(v, 3, "consultant_avg_sales")?,
        leader_avg_sales: decimal_at(v, 4, "leader_avg_sales")?,
        lol_avg_sales: decimal_at(v, 5, "lol_avg_sales")?,
        growth_rate_pct: decimal_at(v, 6, "growth_rate_pct")?,
        promotion_rate_pct: decimal_at(v, 7, "promotion_rate_pct")?,
        attrition_rate_pct: decimal_at(v, 8, "attrition_rate_pct")?,
    })
}

/// The uncompressed fixed-order array form of a state.
pub fn state_to_value(state: &PlanState) -> CompPlanResult<Value> {
    Ok(Value::Array(vec![
        plan_to_array(&state.current_plan)?,
        plan_to_array(&state.proposed_plan)?,
        network_to_array(&state.network)?,
    ]))
}

/// Parse and range-check the fixed-order array form of a state.
pub fn state_from_value(value: &Value) -> CompPlanResult<PlanState> {
    let parts = fixed_array(value, 3, "state")?;
    let state = PlanState {
        current_plan: plan_from_array(&parts[0], PlanSide::Current)?,
        proposed_plan: plan_from_array(&parts[1], PlanSide::Proposed)?,
        network: network_from_array(&parts[2])?,
    };
    validate_plan(PlanSide::Current, &state.current_plan)?;
    validate_plan(PlanSide::Proposed, &state.proposed_plan)?;
    validate_network(&state.network)?;
    Ok(state)
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

/// Encode a state into a query-safe token.
pub fn encode_state(state: &PlanState) -> CompPlanResult<String> {
    let json = serde_json::to_vec(&state_to_value(state)?)?;
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&json)?;
    let compressed = encoder.finish()?;
    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decode a token, reporting why it was rejected.
pub fn try_decode_state(token: &str) -> CompPlanResult<PlanState> {
    let compressed = URL_SAFE_NO_PAD
        .decode(token.trim())
        .map_err(|e| CompPlanError::MalformedState(format!("invalid base64: {e}")))?;

    let mut json = String::new();
    ZlibDecoder::new(compressed.as_slice())
        .take(MAX_STATE_BYTES + 1)
        .read_to_string(&mut json)
        .map_err(|e| CompPlanError::MalformedState(format!("invalid compressed payload: {e}")))?;
    if json.len() as u64 > MAX_STATE_BYTES {
        return Err(CompPlanError::MalformedState("payload too large".into()));
    }

    let value: Value = serde_json::from_str(&json)
        .map_err(|e| CompPlanError::MalformedState(format!("invalid JSON: {e}")))?;
    state_from_value(&value)
}

/// Decode a token. Anything malformed is treated as "no state".
pub fn decode_state(token: &str) -> Option<PlanState> {
    match try_decode_state(token) {
        Ok(state) => Some(state),
        Err(e) => {
            debug!(error = %e, "discarding undecodable plan state");
            None
        }
    }
}

#[cfg(all(test, feature = "presets"))]
mod tests {
    use super::*;
    use crate::presets::{default_current_plan, default_network, default_proposed_plan};
    use rust_decimal_macros::dec;

    fn state() -> PlanState {
        PlanState {
            current_plan: default_current_plan(),
            proposed_plan: default_proposed_plan(),
            network: default_network(),
        }
    }

    #[test]
    fn test_array_layout() {
        let value = state_to_value(&state()).unwrap();
        assert_eq!(value[0][1], serde_json::json!([50, 5, 1, 200, 5000, 3]));
        assert_eq!(value[1][2], serde_json::json!([50, 12, 2, 300, 25000, 5]));
        assert_eq!(
            value[2],
            serde_json::json!([850, 42, 3, 2400, 4000, 6000, 5, 2, 3])
        );
    }

    #[test]
    fn test_fractional_values_survive() {
        let mut s = state();
        s.proposed_plan.leader.override_rate_pct = dec!(7.25);
        s.network.consultant_avg_sales = dec!(333.33);
        s.network.attrition_rate_pct = dec!(0.1);
        let token = encode_state(&s).unwrap();
        assert_eq!(decode_state(&token), Some(s));
    }

    #[test]
    fn test_token_is_query_safe() {
        let token = encode_state(&state()).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_wrong_lengths_rejected() {
        let mut value = state_to_value(&state()).unwrap();
        value[2].as_array_mut().unwrap().pop();
        assert!(state_from_value(&value).is_err());

        let mut value = state_to_value(&state()).unwrap();
        value[0].as_array_mut().unwrap().pop();
        assert!(state_from_value(&value).is_err());
    }

    #[test]
    fn test_fractional_headcount_rejected() {
        let mut value = state_to_value(&state()).unwrap();
        value[2][0] = serde_json::json!(850.5);
        assert!(state_from_value(&value).is_err());
        value[2][0] = serde_json::json!(850.0);
        assert!(state_from_value(&value).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut value = state_to_value(&state()).unwrap();
        value[1][1][1] = serde_json::json!(150);
        assert!(state_from_value(&value).is_err());
    }

    #[test]
    fn test_garbage_is_no_state() {
        assert_eq!(decode_state(""), None);
        assert_eq!(decode_state("not a token!"), None);
        assert_eq!(decode_state(&URL_SAFE_NO_PAD.encode(b"plain text")), None);
    }
}
