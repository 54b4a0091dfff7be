//! Shared scenario loading for every command.
//!
//! The base scenario comes from `--input`, piped stdin, or the built-in
//! defaults. Presets and `--set-*` overrides are then applied on top through
//! a `PlanSession`, in that order.

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use comp_plan_core::plan::{NetworkUpdate, PlanSide, TierId, TierUpdate};
use comp_plan_core::presets::PresetId;
use comp_plan_core::session::PlanSession;
use comp_plan_core::sharing::PlanState;

use crate::input;

/// Where a scenario comes from and how to adjust it.
#[derive(Args, Debug, Default)]
pub struct ScenarioArgs {
    /// Path to a JSON or YAML scenario file ({current_plan, proposed_plan, network})
    #[arg(long)]
    pub input: Option<String>,

    /// Load a preset into the current plan (also replaces the network)
    #[arg(long)]
    pub current_preset: Option<PresetId>,

    /// Load a preset into the proposed plan (also replaces the network)
    #[arg(long)]
    pub preset: Option<PresetId>,

    /// Override a current-plan field, e.g. "leader.override_rate_pct=6" (repeatable)
    #[arg(long = "set-current", value_name = "TIER.FIELD=VALUE")]
    pub set_current: Vec<String>,

    /// Override a proposed-plan field, e.g. "lol.override_depth=1" (repeatable)
    #[arg(long = "set-proposed", value_name = "TIER.FIELD=VALUE")]
    pub set_proposed: Vec<String>,

    /// Override a network field, e.g. "leader_headcount=60" (repeatable)
    #[arg(long = "set-network", value_name = "FIELD=VALUE")]
    pub set_network: Vec<String>,
}

/// Plan selector for single-plan commands.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum SideArg {
    #[default]
    Current,
    Proposed,
}

impl From<SideArg> for PlanSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Current => PlanSide::Current,
            SideArg::Proposed => PlanSide::Proposed,
        }
    }
}

fn split_assignment(raw: &str) -> Result<(&str, Decimal), Box<dyn std::error::Error>> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("Expected KEY=VALUE, got '{}'", raw))?;
    let value = Decimal::from_str(value.trim())
        .map_err(|e| format!("Invalid number in '{}': {}", raw, e))?;
    Ok((key.trim(), value))
}

/// Parse `tier.field=value` into a tier and typed update.
pub fn parse_tier_override(raw: &str) -> Result<(TierId, TierUpdate), Box<dyn std::error::Error>> {
    let (key, value) = split_assignment(raw)?;
    let (tier, field) = key
        .split_once('.')
        .ok_or_else(|| format!("Expected TIER.FIELD=VALUE, got '{}'", raw))?;
    let tier = TierId::from_str(tier)?;
    let update = TierUpdate::parse(field, value)?;
    Ok((tier, update))
}

/// Parse `field=value` into a typed network update.
pub fn parse_network_override(raw: &str) -> Result<NetworkUpdate, Box<dyn std::error::Error>> {
    let (field, value) = split_assignment(raw)?;
    Ok(NetworkUpdate::parse(field, value)?)
}

fn base_state(args: &ScenarioArgs) -> Result<Option<PlanState>, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        debug!(path = %path, "reading scenario file");
        return Ok(Some(input::file::read_scenario(path)?));
    }
    if let Some(data) = input::stdin::read_stdin()? {
        debug!("reading scenario from stdin");
        return Ok(Some(serde_json::from_value(data)?));
    }
    Ok(None)
}

/// Resolve the scenario described by the arguments.
pub fn load_scenario(args: &ScenarioArgs) -> Result<PlanState, Box<dyn std::error::Error>> {
    let mut session = match base_state(args)? {
        Some(state) => PlanSession::from_state(state),
        None => PlanSession::new(),
    };

    if let Some(id) = args.current_preset {
        session.load_preset(id, PlanSide::Current);
    }
    if let Some(id) = args.preset {
        session.load_preset(id, PlanSide::Proposed);
    }

    for raw in &args.set_current {
        let (tier, update) = parse_tier_override(raw)?;
        session.update_tier(PlanSide::Current, tier, update);
    }
    for raw in &args.set_proposed {
        let (tier, update) = parse_tier_override(raw)?;
        session.update_tier(PlanSide::Proposed, tier, update);
    }
    for raw in &args.set_network {
        session.update_network(parse_network_override(raw)?);
    }

    Ok(session.snapshot())
}
