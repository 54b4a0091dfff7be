use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CompPlanError;
use crate::types::*;

// ---------------------------------------------------------------------------
// Tier identity
// ---------------------------------------------------------------------------

/// The three organizational levels of the network, bottom-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierId {
    Consultant,
    Leader,
    LeaderOfLeaders,
}

impl TierId {
    /// Every tier, in aggregation order.
    pub const ALL: [TierId; 3] = [TierId::Consultant, TierId::Leader, TierId::LeaderOfLeaders];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierId::Consultant => "consultant",
            TierId::Leader => "leader",
            TierId::LeaderOfLeaders => "leader_of_leaders",
        }
    }
}

impl fmt::Display for TierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TierId {
    type Err = CompPlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consultant" => Ok(TierId::Consultant),
            "leader" => Ok(TierId::Leader),
            "leader_of_leaders" | "lol" => Ok(TierId::LeaderOfLeaders),
            other => Err(CompPlanError::InvalidInput {
                field: "tier".into(),
                reason: format!(
                    "Unknown tier '{other}' (expected consultant, leader or leader_of_leaders)"
                ),
            }),
        }
    }
}

/// One value per tier. The tier set is closed, so this is a plain record
/// rather than a map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerTier<T> {
    pub consultant: T,
    pub leader: T,
    pub leader_of_leaders: T,
}

impl<T> PerTier<T> {
    /// Build a record by evaluating `f` for each tier in aggregation order.
    pub fn from_fn(mut f: impl FnMut(TierId) -> T) -> Self {
        let consultant = f(TierId::Consultant);
        let leader = f(TierId::Leader);
        let leader_of_leaders = f(TierId::LeaderOfLeaders);
        PerTier {
            consultant,
            leader,
            leader_of_leaders,
        }
    }

    pub fn get(&self, tier: TierId) -> &T {
        match tier {
            TierId::Consultant => &self.consultant,
            TierId::Leader => &self.leader,
            TierId::LeaderOfLeaders => &self.leader_of_leaders,
        }
    }

    pub fn get_mut(&mut self, tier: TierId) -> &mut T {
        match tier {
            TierId::Consultant => &mut self.consultant,
            TierId::Leader => &mut self.leader,
            TierId::LeaderOfLeaders => &mut self.leader_of_leaders,
        }
    }

    /// Iterate `(tier, value)` pairs in aggregation order.
    pub fn iter(&self) -> impl Iterator<Item = (TierId, &T)> {
        TierId::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }
}

// ---------------------------------------------------------------------------
// Tier configuration
// ---------------------------------------------------------------------------

/// Commission parameters for one tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Share of the tier's own sales paid back to the member (0-100)
    pub personal_discount_pct: Percent,
    /// Commission rate on downline volume attributed to this tier (0-100)
    pub override_rate_pct: Percent,
    /// Organizational levels below this tier the override reaches (0-5)
    pub override_depth: u8,
    /// Qualification threshold: minimum personal volume. Not enforced.
    pub min_personal_volume: Money,
    /// Qualification threshold: minimum team volume. Not enforced.
    pub min_team_volume: Money,
    /// Qualification threshold: minimum direct recruits. Not enforced.
    pub min_recruits: u32,
}

impl TierConfig {
    /// Apply a single typed field update.
    pub fn apply(&mut self, update: TierUpdate) {
        match update {
            TierUpdate::PersonalDiscountPct(v) => self.personal_discount_pct = v,
            TierUpdate::OverrideRatePct(v) => self.override_rate_pct = v,
            TierUpdate::OverrideDepth(v) => self.override_depth = v,
            TierUpdate::MinPersonalVolume(v) => self.min_personal_volume = v,
            TierUpdate::MinTeamVolume(v) => self.min_team_volume = v,
            TierUpdate::MinRecruits(v) => self.min_recruits = v,
        }
    }
}

/// A full plan: exactly one configuration per tier.
pub type CompensationPlan = PerTier<TierConfig>;

/// A single-field edit to a `TierConfig`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TierUpdate {
    PersonalDiscountPct(Percent),
    OverrideRatePct(Percent),
    OverrideDepth(u8),
    MinPersonalVolume(Money),
    MinTeamVolume(Money),
    MinRecruits(u32),
}

impl TierUpdate {
    /// Build an update from a field name and a decimal value, as typed on a
    /// command line. Integer fields reject fractional or out-of-range values.
    pub fn parse(field: &str, value: Decimal) -> Result<Self, CompPlanError> {
        match field {
            "personal_discount_pct" => Ok(TierUpdate::PersonalDiscountPct(value)),
            "override_rate_pct" => Ok(TierUpdate::OverrideRatePct(value)),
            "override_depth" => Ok(TierUpdate::OverrideDepth(whole_number(field, value)?)),
            "min_personal_volume" => Ok(TierUpdate::MinPersonalVolume(value)),
            "min_team_volume" => Ok(TierUpdate::MinTeamVolume(value)),
            "min_recruits" => Ok(TierUpdate::MinRecruits(whole_number(field, value)?)),
            other => Err(CompPlanError::InvalidInput {
                field: other.into(),
                reason: "Not a tier configuration field".into(),
            }),
        }
    }
}

/// Which of the two compared plans an operation targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanSide {
    #[default]
    Current,
    Proposed,
}

impl PlanSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanSide::Current => "current_plan",
            PlanSide::Proposed => "proposed_plan",
        }
    }
}

/// Convert a decimal into an integer field, rejecting fractions and overflow.
pub(crate) fn whole_number<T: TryFrom<u64>>(field: &str, value: Decimal) -> Result<T, CompPlanError> {
    let invalid = || CompPlanError::InvalidInput {
        field: field.into(),
        reason: format!("Expected a non-negative whole number, got {value}"),
    };
    if value.is_sign_negative() || !value.fract().is_zero() {
        return Err(invalid());
    }
    let raw = value.to_u64().ok_or_else(invalid)?;
    T::try_from(raw).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_tier() -> TierConfig {
        TierConfig {
            personal_discount_pct: dec!(50),
            override_rate_pct: dec!(5),
            override_depth: 1,
            min_personal_volume: dec!(200),
            min_team_volume: dec!(5000),
            min_recruits: 3,
        }
    }

    #[test]
    fn test_tier_id_round_trips_through_str() {
        for tier in TierId::ALL {
            assert_eq!(tier.as_str().parse::<TierId>().unwrap(), tier);
        }
        assert!("director".parse::<TierId>().is_err());
    }

    #[test]
    fn test_per_tier_iterates_in_fixed_order() {
        let counts = PerTier::from_fn(|tier| tier.as_str().len());
        let order: Vec<TierId> = counts.iter().map(|(t, _)| t).collect();
        assert_eq!(order, TierId::ALL.to_vec());
        assert_eq!(*counts.get(TierId::LeaderOfLeaders), 17);
    }

    #[test]
    fn test_apply_updates_only_named_field() {
        let mut tier = sample_tier();
        tier.apply(TierUpdate::OverrideRatePct(dec!(7)));
        assert_eq!(tier.override_rate_pct, dec!(7));
        assert_eq!(tier.personal_discount_pct, dec!(50));
        assert_eq!(tier.override_depth, 1);
    }

    #[test]
    fn test_parse_rejects_fractional_depth() {
        assert!(TierUpdate::parse("override_depth", dec!(1.5)).is_err());
        assert!(TierUpdate::parse("override_depth", dec!(-1)).is_err());
        assert!(TierUpdate::parse("override_depth", dec!(300)).is_err());
        assert_eq!(
            TierUpdate::parse("override_depth", dec!(2)).unwrap(),
            TierUpdate::OverrideDepth(2)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_field() {
        assert!(TierUpdate::parse("bonus_pool_pct", dec!(1)).is_err());
    }
}
