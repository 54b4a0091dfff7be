use clap::Args;
use serde_json::Value;
use tracing::info;

use comp_plan_core::analysis::break_even::{self, BreakEvenCurveInput};
use comp_plan_core::analysis::comparison;

use super::scenario::{load_scenario, ScenarioArgs};
use crate::config::CompPlanCliConfig;

/// Arguments for a plan-vs-plan comparison
#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = load_scenario(&args.scenario)?;
    info!("comparing current and proposed plans");

    let result = comparison::analyze_comparison(&state)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the break-even cost curves
#[derive(Args)]
pub struct BreakEvenCurveArgs {
    /// Number of samples between 3/points and 3x the network (defaults to $COMPPLAN_CURVE_POINTS, then 50)
    #[arg(long)]
    pub points: Option<u32>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_break_even_curve(
    args: BreakEvenCurveArgs,
    config: &CompPlanCliConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario = load_scenario(&args.scenario)?;
    let points = args.points.unwrap_or(config.curve_points);
    info!(points, "sampling break-even curves");

    let input = BreakEvenCurveInput { scenario, points };
    let result = break_even::analyze_break_even_curve(&input)?;
    Ok(serde_json::to_value(result)?)
}
