use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analysis::comparison::{scaled_volume, step_multiplier, ScenarioInput, MAX_MULTIPLIER};
use crate::analysis::dashboard::compute_dashboard;
use crate::error::CompPlanError;
use crate::plan::validation::{validate_network, validate_plan};
use crate::plan::{CompensationPlan, NetworkParams, PlanSide};
use crate::numeric::{round_currency, to_decimal, to_f64};
use crate::types::*;
use crate::CompPlanResult;

/// Default number of samples on a break-even curve.
pub const DEFAULT_CURVE_POINTS: u32 = 50;

/// Upper bound on samples accepted from callers.
pub const MAX_CURVE_POINTS: u32 = 1000;

/// Input for sampling cost curves of two plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenCurveInput {
    #[serde(flatten)]
    pub scenario: ScenarioInput,
    #[serde(default = "default_points")]
    pub points: u32,
}

fn default_points() -> u32 {
    DEFAULT_CURVE_POINTS
}

/// Total payout of both plans at one network scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakEvenPoint {
    /// Network sales volume at this scale
    pub volume: Money,
    pub current_cost: Money,
    pub proposed_cost: Money,
}

/// Sample both plans' total payout from `3/points` to 3x the network.
///
/// Scaling matches the break-even scan; no crossover detection is done here.
/// Zero points gives an empty curve.
pub fn compute_break_even_curve(
    current_plan: &CompensationPlan,
    proposed_plan: &CompensationPlan,
    network: &NetworkParams,
    points: u32,
) -> Vec<BreakEvenPoint> {
    (1..=points)
        .map(|i| {
            let scaled = network.scaled(step_multiplier(i, points));
            let cost = |plan: &CompensationPlan| {
                to_decimal(round_currency(to_f64(compute_dashboard(plan, &scaled).total_payout)))
            };
            BreakEvenPoint {
                volume: scaled_volume(&scaled),
                current_cost: cost(current_plan),
                proposed_cost: cost(proposed_plan),
            }
        })
        .collect()
}

/// Validated curve wrapped in the computation envelope.
pub fn analyze_break_even_curve(
    input: &BreakEvenCurveInput,
) -> CompPlanResult<ComputationOutput<Vec<BreakEvenPoint>>> {
    let start = Instant::now();
    let scenario = &input.scenario;

    if input.points == 0 || input.points > MAX_CURVE_POINTS {
        return Err(CompPlanError::InvalidInput {
            field: "points".into(),
            reason: format!("Points must be between 1 and {MAX_CURVE_POINTS}"),
        });
    }
    validate_plan(PlanSide::Current, &scenario.current_plan)?;
    validate_plan(PlanSide::Proposed, &scenario.proposed_plan)?;
    validate_network(&scenario.network)?;

    let output = compute_break_even_curve(
        &scenario.current_plan,
        &scenario.proposed_plan,
        &scenario.network,
        input.points,
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Break-even cost curves over scaled network headcount",
        &serde_json::json!({
            "points": input.points,
            "max_multiplier": MAX_MULTIPLIER,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}
