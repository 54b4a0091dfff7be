//! Plan and network data model.

pub mod network;
pub mod tiers;
pub mod validation;

pub use network::{NetworkParams, NetworkUpdate};
pub use tiers::{CompensationPlan, PerTier, PlanSide, TierConfig, TierId, TierUpdate};
