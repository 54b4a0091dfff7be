//! Illustrative plans and network assumptions.
//!
//! All figures are demo data and do not describe any real company's plan.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CompPlanError;
use crate::plan::{CompensationPlan, NetworkParams, PerTier, TierConfig};
use crate::types::*;

/// Named starting points a user can load into either plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresetId {
    Default,
    Aggressive,
    Flat,
    HighGrowth,
}

impl PresetId {
    pub const ALL: [PresetId; 4] = [
        PresetId::Default,
        PresetId::Aggressive,
        PresetId::Flat,
        PresetId::HighGrowth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PresetId::Default => "default",
            PresetId::Aggressive => "aggressive",
            PresetId::Flat => "flat",
            PresetId::HighGrowth => "highGrowth",
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetId {
    type Err = CompPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PresetId::ALL
            .into_iter()
            .find(|p| p.as_str() == s || p.as_str().eq_ignore_ascii_case(&s.replace(&['-', '_'][..], "")))
            .ok_or_else(|| CompPlanError::UnknownPreset(s.to_string()))
    }
}

/// A plan and the network it was tuned for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: PresetId,
    pub plan: CompensationPlan,
    pub network: NetworkParams,
}

fn tier(
    personal_discount_pct: Percent,
    override_rate_pct: Percent,
    override_depth: u8,
    min_personal_volume: Money,
    min_team_volume: Money,
    min_recruits: u32,
) -> TierConfig {
    TierConfig {
        personal_discount_pct,
        override_rate_pct,
        override_depth,
        min_personal_volume,
        min_team_volume,
        min_recruits,
    }
}

/// The plan in force today in the demo scenario.
pub fn default_current_plan() -> CompensationPlan {
    PerTier {
        consultant: tier(dec!(50), Decimal::ZERO, 0, dec!(100), Decimal::ZERO, 0),
        leader: tier(dec!(50), dec!(5), 1, dec!(200), dec!(5000), 3),
        leader_of_leaders: tier(dec!(50), dec!(10), 2, dec!(300), dec!(25000), 5),
    }
}

/// The demo proposal: richer leader and leader-of-leaders overrides.
pub fn default_proposed_plan() -> CompensationPlan {
    let mut plan = default_current_plan();
    plan.leader.override_rate_pct = dec!(7);
    plan.leader_of_leaders.override_rate_pct = dec!(12);
    plan
}

pub fn default_network() -> NetworkParams {
    NetworkParams {
        consultant_headcount: 850,
        leader_headcount: 42,
        lol_headcount: 3,
        consultant_avg_sales: dec!(2400),
        leader_avg_sales: dec!(4000),
        lol_avg_sales: dec!(6000),
        growth_rate_pct: dec!(5),
        promotion_rate_pct: dec!(2),
        attrition_rate_pct: dec!(3),
    }
}

/// Look up a preset by id.
pub fn preset(id: PresetId) -> Preset {
    let (plan, network) = match id {
        PresetId::Default => (default_current_plan(), default_network()),
        PresetId::Aggressive => (
            PerTier {
                consultant: tier(dec!(45), Decimal::ZERO, 0, dec!(150), Decimal::ZERO, 0),
                leader: tier(dec!(45), dec!(10), 2, dec!(250), dec!(8000), 5),
                leader_of_leaders: tier(dec!(45), dec!(15), 3, dec!(400), dec!(30000), 8),
            },
            default_network(),
        ),
        PresetId::Flat => (
            PerTier {
                consultant: tier(dec!(40), Decimal::ZERO, 0, dec!(50), Decimal::ZERO, 0),
                leader: tier(dec!(42), dec!(3), 1, dec!(100), dec!(3000), 2),
                leader_of_leaders: tier(dec!(44), dec!(5), 1, dec!(150), dec!(10000), 3),
            },
            default_network(),
        ),
        PresetId::HighGrowth => (
            PerTier {
                consultant: tier(dec!(55), Decimal::ZERO, 0, dec!(75), Decimal::ZERO, 0),
                leader: tier(dec!(55), dec!(8), 2, dec!(150), dec!(4000), 4),
                leader_of_leaders: tier(dec!(55), dec!(12), 3, dec!(200), dec!(20000), 6),
            },
            NetworkParams {
                growth_rate_pct: dec!(10),
                promotion_rate_pct: dec!(4),
                attrition_rate_pct: dec!(5),
                ..default_network()
            },
        ),
    };
    Preset { id, plan, network }
}

/// Every preset, in menu order.
pub fn all_presets() -> Vec<Preset> {
    PresetId::ALL.into_iter().map(preset).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::validation::{validate_network, validate_plan};
    use crate::plan::PlanSide;

    #[test]
    fn test_parse_preset_ids() {
        assert_eq!("highGrowth".parse::<PresetId>().unwrap(), PresetId::HighGrowth);
        assert_eq!("high-growth".parse::<PresetId>().unwrap(), PresetId::HighGrowth);
        assert_eq!("flat".parse::<PresetId>().unwrap(), PresetId::Flat);
        assert!(matches!(
            "lavish".parse::<PresetId>(),
            Err(CompPlanError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_default_preset_matches_current_plan() {
        let p = preset(PresetId::Default);
        assert_eq!(p.plan, default_current_plan());
        assert_eq!(p.network, default_network());
    }

    #[test]
    fn test_every_preset_is_valid() {
        for p in all_presets() {
            assert!(validate_plan(PlanSide::Current, &p.plan).is_ok(), "{}", p.id);
            assert!(validate_network(&p.network).is_ok(), "{}", p.id);
        }
    }

    #[test]
    fn test_high_growth_changes_only_rates() {
        let p = preset(PresetId::HighGrowth);
        assert_eq!(p.network.consultant_headcount, 850);
        assert_eq!(p.network.growth_rate_pct, dec!(10));
        assert_eq!(p.network.attrition_rate_pct, dec!(5));
    }

    #[test]
    fn test_proposed_differs_only_in_override_rates() {
        let cur = default_current_plan();
        let prop = default_proposed_plan();
        assert_eq!(prop.consultant, cur.consultant);
        assert_eq!(prop.leader.override_rate_pct, dec!(7));
        assert_eq!(prop.leader_of_leaders.override_rate_pct, dec!(12));
        assert_eq!(prop.leader.min_team_volume, cur.leader.min_team_volume);
    }
}
