//! Range checks for caller-supplied plans and networks.
//!
//! The calculators never fail; they trust their inputs. Anything arriving from
//! outside (CLI flags, JSON files, decoded share tokens, bindings) is run
//! through these checks first.
//!
//! Beyond range checks, every decimal input must be exactly representable
//! as a binary64 value, since that is what the calculators work in, and
//! sizes are capped so that tripled headcounts still fit in a `u32`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::CompPlanError;
use crate::numeric::is_binary64_exact;
use crate::plan::network::NetworkParams;
use crate::plan::tiers::{CompensationPlan, PlanSide, TierConfig, TierId};
use crate::CompPlanResult;

/// Deepest override reach a tier may be configured with.
pub const MAX_OVERRIDE_DEPTH: u8 = 5;

/// Largest headcount accepted for any tier.
pub const MAX_HEADCOUNT: u32 = 100_000_000;

/// Largest average sales or volume threshold accepted.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000);

fn check_representable(field: &str, value: Decimal) -> CompPlanResult<()> {
    if !is_binary64_exact(value) {
        return Err(CompPlanError::InvalidInput {
            field: field.to_string(),
            reason: format!("Value {value} has more precision than a double can hold"),
        });
    }
    Ok(())
}

fn check_percent(field: String, value: Decimal) -> CompPlanResult<()> {
    check_representable(&field, value)?;
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(CompPlanError::InvalidInput {
            field,
            reason: format!("Percentage must be between 0 and 100, got {value}"),
        });
    }
    Ok(())
}

fn check_amount(field: String, value: Decimal) -> CompPlanResult<()> {
    if value < Decimal::ZERO {
        return Err(CompPlanError::InvalidInput {
            field,
            reason: format!("Value cannot be negative, got {value}"),
        });
    }
    if value > MAX_AMOUNT {
        return Err(CompPlanError::InvalidInput {
            field,
            reason: format!("Value cannot exceed {MAX_AMOUNT}, got {value}"),
        });
    }
    check_representable(&field, value)
}

/// Validate a single tier configuration. `prefix` is the dotted path used in
/// error messages (e.g. `proposed_plan.leader`).
pub fn validate_tier(prefix: &str, config: &TierConfig) -> CompPlanResult<()> {
    check_percent(
        format!("{prefix}.personal_discount_pct"),
        config.personal_discount_pct,
    )?;
    check_percent(format!("{prefix}.override_rate_pct"), config.override_rate_pct)?;
    if config.override_depth > MAX_OVERRIDE_DEPTH {
        return Err(CompPlanError::InvalidInput {
            field: format!("{prefix}.override_depth"),
            reason: format!(
                "Override depth must be between 0 and {MAX_OVERRIDE_DEPTH}, got {}",
                config.override_depth
            ),
        });
    }
    check_amount(
        format!("{prefix}.min_personal_volume"),
        config.min_personal_volume,
    )?;
    check_amount(format!("{prefix}.min_team_volume"), config.min_team_volume)?;
    Ok(())
}

/// Validate every tier of a plan.
pub fn validate_plan(side: PlanSide, plan: &CompensationPlan) -> CompPlanResult<()> {
    for (tier, config) in plan.iter() {
        validate_tier(&format!("{}.{}", side.as_str(), tier), config)?;
    }
    Ok(())
}

/// Validate network headcounts, sales, and rate assumptions.
pub fn validate_network(network: &NetworkParams) -> CompPlanResult<()> {
    for tier in TierId::ALL {
        let headcount = network.headcount(tier);
        if headcount > MAX_HEADCOUNT {
            return Err(CompPlanError::InvalidInput {
                field: format!("network.{}_headcount", short_name(tier)),
                reason: format!("Headcount cannot exceed {MAX_HEADCOUNT}, got {headcount}"),
            });
        }
        check_amount(
            format!("network.{}_avg_sales", short_name(tier)),
            network.avg_sales(tier),
        )?;
    }
    check_percent("network.growth_rate_pct".into(), network.growth_rate_pct)?;
    check_percent("network.promotion_rate_pct".into(), network.promotion_rate_pct)?;
    check_percent("network.attrition_rate_pct".into(), network.attrition_rate_pct)?;
    Ok(())
}

/// Non-fatal observations about a plan/network pair, in the order a reader
/// would want them.
pub fn scenario_warnings(plan: &CompensationPlan, network: &NetworkParams) -> Vec<String> {
    let mut warnings = Vec::new();

    if network.leader_headcount == 0 && plan.leader.override_depth >= 1 {
        warnings.push(
            "Leader override is configured but leader headcount is zero; \
             consultant volume is still attributed to a single notional leader"
                .into(),
        );
    }
    if network.lol_headcount == 0 {
        warnings.push(
            "Leader-of-leaders headcount is zero; override split uses a divisor of 1".into(),
        );
    }
    for (tier, config) in plan.iter() {
        if config.override_depth > 2 {
            warnings.push(format!(
                "{tier} override depth {} has no effect beyond depth 2",
                config.override_depth
            ));
        }
    }

    warnings
}

fn short_name(tier: TierId) -> &'static str {
    match tier {
        TierId::Consultant => "consultant",
        TierId::Leader => "leader",
        TierId::LeaderOfLeaders => "lol",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::tiers::PerTier;

    fn tier(discount: Decimal, rate: Decimal, depth: u8) -> TierConfig {
        TierConfig {
            personal_discount_pct: discount,
            override_rate_pct: rate,
            override_depth: depth,
            min_personal_volume: dec!(100),
            min_team_volume: Decimal::ZERO,
            min_recruits: 0,
        }
    }

    fn plan() -> CompensationPlan {
        PerTier {
            consultant: tier(dec!(50), Decimal::ZERO, 0),
            leader: tier(dec!(50), dec!(5), 1),
            leader_of_leaders: tier(dec!(50), dec!(10), 2),
        }
    }

    fn network() -> NetworkParams {
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

    #[test]
    fn test_valid_plan_passes() {
        assert!(validate_plan(PlanSide::Current, &plan()).is_ok());
        assert!(validate_network(&network()).is_ok());
    }

    #[test]
    fn test_percent_out_of_range_names_field() {
        let mut p = plan();
        p.leader.override_rate_pct = dec!(101);
        match validate_plan(PlanSide::Proposed, &p) {
            Err(CompPlanError::InvalidInput { field, .. }) => {
                assert_eq!(field, "proposed_plan.leader.override_rate_pct")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_depth_above_five_rejected() {
        let mut p = plan();
        p.leader_of_leaders.override_depth = 6;
        assert!(validate_plan(PlanSide::Current, &p).is_err());
        p.leader_of_leaders.override_depth = 5;
        assert!(validate_plan(PlanSide::Current, &p).is_ok());
    }

    #[test]
    fn test_negative_avg_sales_rejected() {
        let mut n = network();
        n.lol_avg_sales = dec!(-1);
        match validate_network(&n) {
            Err(CompPlanError::InvalidInput { field, .. }) => {
                assert_eq!(field, "network.lol_avg_sales")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_avg_sales_rejected() {
        let mut n = network();
        n.consultant_avg_sales = dec!(70000000000000000000000000000);
        match validate_network(&n) {
            Err(CompPlanError::InvalidInput { field, .. }) => {
                assert_eq!(field, "network.consultant_avg_sales")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
        n.consultant_avg_sales = MAX_AMOUNT;
        assert!(validate_network(&n).is_ok());
    }

    #[test]
    fn test_headcount_above_limit_rejected() {
        let mut n = network();
        n.leader_headcount = 2_000_000_000;
        match validate_network(&n) {
            Err(CompPlanError::InvalidInput { field, .. }) => {
                assert_eq!(field, "network.leader_headcount")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_largest_accepted_network_computes() {
        let n = NetworkParams {
            consultant_headcount: MAX_HEADCOUNT,
            leader_headcount: MAX_HEADCOUNT,
            lol_headcount: MAX_HEADCOUNT,
            consultant_avg_sales: MAX_AMOUNT,
            leader_avg_sales: MAX_AMOUNT,
            lol_avg_sales: MAX_AMOUNT,
            ..network()
        };
        assert!(validate_network(&n).is_ok());
        let tripled = n.scaled(3.0);
        assert_eq!(tripled.consultant_headcount, 300_000_000);
        let d = crate::analysis::dashboard::compute_dashboard(&plan(), &tripled);
        assert!(d.total_revenue > Decimal::ZERO);
    }

    #[test]
    fn test_excess_precision_rejected() {
        let mut n = network();
        n.consultant_avg_sales = dec!(2400.123456789012345678);
        assert!(validate_network(&n).is_err());

        let mut p = plan();
        p.leader.override_rate_pct = dec!(5.0000000000000000001);
        match validate_plan(PlanSide::Current, &p) {
            Err(CompPlanError::InvalidInput { field, .. }) => {
                assert_eq!(field, "current_plan.leader.override_rate_pct")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_warnings() {
        assert!(scenario_warnings(&plan(), &network()).is_empty());

        let mut p = plan();
        p.leader_of_leaders.override_depth = 3;
        let mut n = network();
        n.lol_headcount = 0;
        n.leader_headcount = 0;
        let warnings = scenario_warnings(&p, &n);
        assert_eq!(warnings.len(), 3);
        assert!(warnings[2].starts_with("leader_of_leaders override depth 3"));
    }
}
