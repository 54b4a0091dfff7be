use clap::Args;
use serde_json::Value;
use tracing::info;

use comp_plan_core::analysis::dashboard::{self, DashboardInput};
use comp_plan_core::analysis::tier_financials::{self, TierInput};
use comp_plan_core::analysis::waterfall;
use comp_plan_core::plan::{PlanSide, TierId};
use comp_plan_core::sharing::PlanState;

use super::scenario::{load_scenario, ScenarioArgs, SideArg};

fn select_plan(state: PlanState, side: SideArg) -> DashboardInput {
    let plan = match PlanSide::from(side) {
        PlanSide::Current => state.current_plan,
        PlanSide::Proposed => state.proposed_plan,
    };
    DashboardInput {
        plan,
        network: state.network,
    }
}

/// Arguments for a single-tier breakdown
#[derive(Args)]
pub struct TierArgs {
    /// Tier to break down: consultant, leader, or leader_of_leaders (lol)
    #[arg(long)]
    pub tier: TierId,

    /// Which plan to evaluate
    #[arg(long, value_enum, default_value_t = SideArg::Current)]
    pub plan: SideArg,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_tier(args: TierArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = load_scenario(&args.scenario)?;
    let selected = select_plan(state, args.plan);
    info!(tier = %args.tier, plan = ?args.plan, "computing tier financials");

    let tier_input = TierInput {
        tier: args.tier,
        plan: selected.plan,
        network: selected.network,
    };
    let result = tier_financials::analyze_tier(&tier_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the plan dashboard
#[derive(Args)]
pub struct DashboardArgs {
    /// Which plan to evaluate
    #[arg(long, value_enum, default_value_t = SideArg::Current)]
    pub plan: SideArg,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_dashboard(args: DashboardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = load_scenario(&args.scenario)?;
    let input = select_plan(state, args.plan);
    info!(plan = ?args.plan, "computing dashboard");

    let result = dashboard::analyze_dashboard(&input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the margin waterfall
#[derive(Args)]
pub struct WaterfallArgs {
    /// Which plan to decompose
    #[arg(long, value_enum, default_value_t = SideArg::Current)]
    pub plan: SideArg,

    /// Include the stacked-bar base and height of each segment
    #[arg(long)]
    pub geometry: bool,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

pub fn run_waterfall(args: WaterfallArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let state = load_scenario(&args.scenario)?;
    let input = select_plan(state, args.plan);
    info!(plan = ?args.plan, "computing waterfall");

    let result = waterfall::analyze_waterfall(&input)?;
    let mut value = serde_json::to_value(&result)?;

    if args.geometry {
        if let Some(Value::Array(rows)) = value.get_mut("result") {
            for (row, segment) in rows.iter_mut().zip(&result.result) {
                let (base, height) = waterfall::bar_geometry(segment);
                if let Value::Object(map) = row {
                    map.insert("bar_base".into(), serde_json::to_value(base)?);
                    map.insert("bar_height".into(), serde_json::to_value(height)?);
                }
            }
        }
    }
    Ok(value)
}
