//! Caller-owned editing state for a plan comparison.
//!
//! A `PlanSession` holds both plans and the network. Every mutation hands a
//! fresh snapshot to the optional change listener, which is where a caller
//! hooks persistence (e.g. rewriting the share token in the address bar).
//! Debouncing those writes is the listener's business.

use std::fmt;

use crate::analysis::comparison::{compute_comparison, ComparisonResults};
use crate::analysis::dashboard::{compute_dashboard, DashboardResults};
use crate::plan::{CompensationPlan, NetworkParams, NetworkUpdate, PlanSide, TierId, TierUpdate};
use crate::presets::{default_current_plan, default_network, default_proposed_plan, preset, PresetId};
use crate::sharing::{decode_state, encode_state, state_from_query, PlanState};
use crate::CompPlanResult;

/// Receives the state after each mutation.
pub type ChangeListener = Box<dyn FnMut(&PlanState) + Send>;

pub struct PlanSession {
    current_plan: CompensationPlan,
    proposed_plan: CompensationPlan,
    network: NetworkParams,
    active_view: PlanSide,
    on_change: Option<ChangeListener>,
}

impl fmt::Debug for PlanSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlanSession")
            .field("current_plan", &self.current_plan)
            .field("proposed_plan", &self.proposed_plan)
            .field("network", &self.network)
            .field("active_view", &self.active_view)
            .field("has_listener", &self.on_change.is_some())
            .finish()
    }
}

impl Default for PlanSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanSession {
    /// A session on the demo defaults with no listener.
    pub fn new() -> Self {
        PlanSession {
            current_plan: default_current_plan(),
            proposed_plan: default_proposed_plan(),
            network: default_network(),
            active_view: PlanSide::Current,
            on_change: None,
        }
    }

    /// A session restored from a saved state.
    pub fn from_state(state: PlanState) -> Self {
        PlanSession {
            current_plan: state.current_plan,
            proposed_plan: state.proposed_plan,
            network: state.network,
            ..Self::new()
        }
    }

    /// Start from the state carried in a URL query string, or from the
    /// defaults when it is missing or undecodable.
    pub fn from_query(query: &str) -> Self {
        match state_from_query(query) {
            Some(state) => Self::from_state(state),
            None => Self::new(),
        }
    }

    /// Register the change listener, replacing any previous one.
    pub fn with_listener(mut self, listener: impl FnMut(&PlanState) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(listener));
        self
    }

    pub fn plan(&self, side: PlanSide) -> &CompensationPlan {
        match side {
            PlanSide::Current => &self.current_plan,
            PlanSide::Proposed => &self.proposed_plan,
        }
    }

    fn plan_mut(&mut self, side: PlanSide) -> &mut CompensationPlan {
        match side {
            PlanSide::Current => &mut self.current_plan,
            PlanSide::Proposed => &mut self.proposed_plan,
        }
    }

    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    /// The plan the user is currently editing.
    pub fn active_view(&self) -> PlanSide {
        self.active_view
    }

    /// View switches are not persisted and do not notify the listener.
    pub fn set_active_view(&mut self, side: PlanSide) {
        self.active_view = side;
    }

    pub fn snapshot(&self) -> PlanState {
        PlanState {
            current_plan: self.current_plan.clone(),
            proposed_plan: self.proposed_plan.clone(),
            network: self.network.clone(),
        }
    }

    fn notify(&mut self) {
        if self.on_change.is_some() {
            let state = self.snapshot();
            if let Some(listener) = self.on_change.as_mut() {
                listener(&state);
            }
        }
    }

    pub fn update_tier(&mut self, side: PlanSide, tier: TierId, update: TierUpdate) {
        self.plan_mut(side).get_mut(tier).apply(update);
        self.notify();
    }

    pub fn update_network(&mut self, update: NetworkUpdate) {
        self.network.apply(update);
        self.notify();
    }

    /// Load a preset's plan into `side`. The preset's network replaces the
    /// current network as well.
    pub fn load_preset(&mut self, id: PresetId, side: PlanSide) {
        let preset = preset(id);
        *self.plan_mut(side) = preset.plan;
        self.network = preset.network;
        self.notify();
    }

    /// Back to the demo defaults. The listener sees the reset state.
    pub fn reset_all(&mut self) {
        self.current_plan = default_current_plan();
        self.proposed_plan = default_proposed_plan();
        self.network = default_network();
        self.active_view = PlanSide::Current;
        self.notify();
    }

    /// Encode both plans and the network for sharing.
    pub fn share_token(&self) -> CompPlanResult<String> {
        encode_state(&self.snapshot())
    }

    /// Replace the session state from a share token. A malformed token
    /// leaves the session untouched and returns `false`.
    pub fn load_from_token(&mut self, token: &str) -> bool {
        match decode_state(token) {
            Some(state) => {
                self.current_plan = state.current_plan;
                self.proposed_plan = state.proposed_plan;
                self.network = state.network;
                self.notify();
                true
            }
            None => false,
        }
    }

    pub fn dashboard(&self, side: PlanSide) -> DashboardResults {
        compute_dashboard(self.plan(side), &self.network)
    }

    pub fn comparison(&self) -> ComparisonResults {
        compute_comparison(&self.current_plan, &self.proposed_plan, &self.network)
    }
}
