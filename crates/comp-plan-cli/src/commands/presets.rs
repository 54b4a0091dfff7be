use clap::Args;
use serde_json::{json, Value};

use comp_plan_core::presets::{self, Preset, PresetId};

/// Arguments for listing presets
#[derive(Args)]
pub struct PresetsArgs {
    /// Show the full plan and network of a single preset
    #[arg(long)]
    pub id: Option<PresetId>,
}

/// One-line summary of a preset for listings.
fn summary(preset: &Preset) -> Value {
    let plan = &preset.plan;
    json!({
        "id": preset.id.as_str(),
        "consultant_discount_pct": plan.consultant.personal_discount_pct,
        "leader_override_pct": plan.leader.override_rate_pct,
        "leader_depth": plan.leader.override_depth,
        "lol_override_pct": plan.leader_of_leaders.override_rate_pct,
        "lol_depth": plan.leader_of_leaders.override_depth,
        "growth_rate_pct": preset.network.growth_rate_pct,
    })
}

pub fn run_presets(args: PresetsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    match args.id {
        Some(id) => Ok(serde_json::to_value(presets::preset(id))?),
        None => Ok(Value::Array(
            presets::all_presets().iter().map(summary).collect(),
        )),
    }
}
