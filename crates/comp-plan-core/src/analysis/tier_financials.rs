use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::plan::validation::{scenario_warnings, validate_network, validate_plan};
use crate::plan::{CompensationPlan, NetworkParams, PlanSide, TierId};
use crate::numeric::{round_currency, to_decimal, to_f64};
use crate::types::*;
use crate::CompPlanResult;

/// Rate multiplier applied to the second override level.
const DEPTH_TWO_DECAY: f64 = 0.5;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Input for a single-tier breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierInput {
    pub tier: TierId,
    pub plan: CompensationPlan,
    pub network: NetworkParams,
}

/// Derived payout figures for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierFinancials {
    pub tier_id: TierId,
    /// Raw headcount from the network (not floored)
    pub headcount: u32,
    pub avg_sales: Money,
    /// Headcount times average sales
    pub total_sales: Money,
    /// Personal discount paid on the tier's own volume
    pub personal_discount_total: Money,
    /// Override paid on downline volume
    pub override_total: Money,
    pub total_payout: Money,
    /// Payout per member; zero for an empty tier
    pub avg_payout: Money,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Override on a downline volume shared evenly across `members` earners.
///
/// The volume is split per member, commissioned, then multiplied back up.
/// The result equals `volume * rate` on paper, but the split path is kept
/// so binary64 cent rounding matches the published figures. Empty tiers
/// count as one member.
fn allocated_override(volume: f64, members: u32, rate_pct: Percent, decay: f64) -> f64 {
    let count = f64::from(members.max(1));
    let assigned = volume / count;
    round_currency(assigned * (to_f64(rate_pct) / 100.0) * decay * count)
}

/// Compute one tier's sales, personal discount, and override payout.
///
/// Overrides follow a flat proportional model rather than a downline walk:
/// - consultants have no downline and earn no override;
/// - leaders (depth >= 1) earn on all consultant volume;
/// - leaders of leaders earn on leader volume at depth >= 1 and on
///   consultant volume at half rate at depth >= 2. Deeper settings add
///   nothing further.
pub fn compute_tier_financials(
    tier: TierId,
    plan: &CompensationPlan,
    network: &NetworkParams,
) -> TierFinancials {
    let config = plan.get(tier);

    let headcount = network.headcount(tier);
    let total_sales = network.sales_f64(tier);
    let personal_discount_total =
        round_currency(total_sales * (to_f64(config.personal_discount_pct) / 100.0));

    let override_total = match tier {
        TierId::Consultant => 0.0,
        TierId::Leader => {
            if config.override_depth >= 1 {
                allocated_override(
                    network.sales_f64(TierId::Consultant),
                    network.leader_headcount,
                    config.override_rate_pct,
                    1.0,
                )
            } else {
                0.0
            }
        }
        TierId::LeaderOfLeaders => {
            let mut total = 0.0;
            if config.override_depth >= 1 {
                total += allocated_override(
                    network.sales_f64(TierId::Leader),
                    network.lol_headcount,
                    config.override_rate_pct,
                    1.0,
                );
            }
            if config.override_depth >= 2 {
                total += allocated_override(
                    network.sales_f64(TierId::Consultant),
                    network.lol_headcount,
                    config.override_rate_pct,
                    DEPTH_TWO_DECAY,
                );
            }
            total
        }
    };

    let total_payout = round_currency(personal_discount_total + override_total);
    let avg_payout = if headcount > 0 {
        round_currency(total_payout / f64::from(headcount))
    } else {
        0.0
    };

    TierFinancials {
        tier_id: tier,
        headcount,
        avg_sales: network.avg_sales(tier),
        total_sales: to_decimal(total_sales),
        personal_discount_total: to_decimal(personal_discount_total),
        override_total: to_decimal(override_total),
        total_payout: to_decimal(total_payout),
        avg_payout: to_decimal(avg_payout),
    }
}

/// Validated single-tier breakdown wrapped in the computation envelope.
pub fn analyze_tier(input: &TierInput) -> CompPlanResult<ComputationOutput<TierFinancials>> {
    let start = Instant::now();

    validate_plan(PlanSide::Current, &input.plan)?;
    validate_network(&input.network)?;
    let warnings = scenario_warnings(&input.plan, &input.network);

    let output = compute_tier_financials(input.tier, &input.plan, &input.network);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Tier payout: personal discount plus flat proportional override",
        &serde_json::json!({
            "tier": input.tier,
            "headcount": output.headcount,
            "avg_sales": output.avg_sales.to_string(),
            "override_depth": input.plan.get(input.tier).override_depth,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
