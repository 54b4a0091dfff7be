//! Persisting a comparison as a shareable token.

pub mod codec;

pub use codec::{decode_state, encode_state, try_decode_state};

use tracing::debug;

use crate::analysis::comparison::ScenarioInput;

/// Everything needed to restore a comparison: both plans and the network.
pub type PlanState = ScenarioInput;

/// Query parameter that carries the encoded state.
pub const STATE_QUERY_PARAM: &str = "s";

/// Pull the state token out of a URL query string (with or without the
/// leading `?`) and decode it. Missing or malformed tokens give `None`.
pub fn state_from_query(query: &str) -> Option<PlanState> {
    let token = query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == STATE_QUERY_PARAM)
        .map(|(_, value)| value)?;
    if token.is_empty() {
        debug!("state query parameter present but empty");
        return None;
    }
    decode_state(token)
}

#[cfg(all(test, feature = "presets"))]
mod tests {
    use super::*;
    use crate::presets::{default_current_plan, default_network, default_proposed_plan};

    #[test]
    fn test_state_from_query() {
        let state = PlanState {
            current_plan: default_current_plan(),
            proposed_plan: default_proposed_plan(),
            network: default_network(),
        };
        let token = encode_state(&state).unwrap();
        let query = format!("?lang=en&{STATE_QUERY_PARAM}={token}&theme=dark");
        assert_eq!(state_from_query(&query), Some(state));
        assert_eq!(state_from_query("lang=en"), None);
        assert_eq!(state_from_query("s="), None);
        assert_eq!(state_from_query("s=%%%"), None);
    }
}
