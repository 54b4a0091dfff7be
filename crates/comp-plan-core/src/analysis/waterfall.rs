use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analysis::dashboard::{compute_dashboard, DashboardInput, DashboardResults};
use crate::plan::validation::{scenario_warnings, validate_network, validate_plan};
use crate::numeric::{to_decimal, to_f64};
use crate::plan::PlanSide;
use crate::types::*;
use crate::CompPlanResult;

/// Steps of the revenue-to-margin bridge, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WaterfallStep {
    GrossRevenue,
    ConsultantDiscounts,
    LeaderOverrides,
    LolOverrides,
    NetMargin,
}

/// One bar of the waterfall. See `bar_geometry` for how it is stacked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallSegment {
    pub name: WaterfallStep,
    /// Signed amount: positive for totals, negative for deductions
    pub value: Money,
    /// Running total after this step
    pub cumulative: Money,
    /// Totals are drawn from zero rather than floated
    pub is_total: bool,
}

/// Decompose a dashboard into revenue, three payout deductions, and margin.
///
/// Leader and leader-of-leaders deductions are their full tier payout
/// (personal discount plus override).
pub fn compute_waterfall(dashboard: &DashboardResults) -> Vec<WaterfallSegment> {
    let mut segments = Vec::with_capacity(5);
    let mut cumulative = to_f64(dashboard.total_revenue);

    segments.push(WaterfallSegment {
        name: WaterfallStep::GrossRevenue,
        value: dashboard.total_revenue,
        cumulative: dashboard.total_revenue,
        is_total: true,
    });

    let deductions = [
        (
            WaterfallStep::ConsultantDiscounts,
            dashboard.tiers.consultant.personal_discount_total,
        ),
        (WaterfallStep::LeaderOverrides, dashboard.tiers.leader.total_payout),
        (
            WaterfallStep::LolOverrides,
            dashboard.tiers.leader_of_leaders.total_payout,
        ),
    ];
    // Running totals stay unrounded, like the rest of the binary64 chain
    for (name, amount) in deductions {
        cumulative -= to_f64(amount);
        segments.push(WaterfallSegment {
            name,
            value: -amount,
            cumulative: to_decimal(cumulative),
            is_total: false,
        });
    }

    segments.push(WaterfallSegment {
        name: WaterfallStep::NetMargin,
        value: dashboard.company_margin,
        cumulative: dashboard.company_margin,
        is_total: true,
    });

    segments
}

/// Validated waterfall for one plan wrapped in the computation envelope.
pub fn analyze_waterfall(input: &DashboardInput) -> CompPlanResult<ComputationOutput<Vec<WaterfallSegment>>> {
    let start = Instant::now();

    validate_plan(PlanSide::Current, &input.plan)?;
    validate_network(&input.network)?;
    let warnings = scenario_warnings(&input.plan, &input.network);

    let dashboard = compute_dashboard(&input.plan, &input.network);
    let output = compute_waterfall(&dashboard);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Revenue-to-margin waterfall",
        &serde_json::json!({
            "total_revenue": dashboard.total_revenue.to_string(),
            "company_margin": dashboard.company_margin.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Stacked-bar geometry for a segment: an invisible base and a visible
/// height. Totals stand on zero; a deduction floats on the running total
/// left after it, so its top lines up with the previous bar.
pub fn bar_geometry(segment: &WaterfallSegment) -> (Money, Money) {
    if segment.is_total {
        (Decimal::ZERO, segment.value)
    } else {
        (segment.cumulative, segment.value.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{CompensationPlan, NetworkParams, PerTier, TierConfig};
    use rust_decimal_macros::dec;

    fn tier(rate: Decimal, depth: u8) -> TierConfig {
        TierConfig {
            personal_discount_pct: dec!(50),
            override_rate_pct: rate,
            override_depth: depth,
            min_personal_volume: Decimal::ZERO,
            min_team_volume: Decimal::ZERO,
            min_recruits: 0,
        }
    }

    fn dashboard() -> DashboardResults {
        let plan: CompensationPlan = PerTier {
            consultant: tier(Decimal::ZERO, 0),
            leader: tier(dec!(5), 1),
            leader_of_leaders: tier(dec!(10), 2),
        };
        let network = NetworkParams {
            consultant_headcount: 850,
            leader_headcount: 42,
            lol_headcount: 3,
            consultant_avg_sales: dec!(2400),
            leader_avg_sales: dec!(4000),
            lol_avg_sales: dec!(6000),
            growth_rate_pct: dec!(5),
            promotion_rate_pct: dec!(2),
            attrition_rate_pct: dec!(3),
        };
        compute_dashboard(&plan, &network)
    }

    #[test]
    fn test_segment_order_and_values() {
        let segs = compute_waterfall(&dashboard());
        let names: Vec<WaterfallStep> = segs.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                WaterfallStep::GrossRevenue,
                WaterfallStep::ConsultantDiscounts,
                WaterfallStep::LeaderOverrides,
                WaterfallStep::LolOverrides,
                WaterfallStep::NetMargin,
            ]
        );
        assert_eq!(segs[1].value, dec!(-1020000));
        assert_eq!(segs[2].value, dec!(-186000));
        assert_eq!(segs[3].value, dec!(-127800));
        assert_eq!(segs[3].cumulative, dec!(892200));
        assert_eq!(segs[4].cumulative, dec!(892200));
    }

    #[test]
    fn test_cumulative_telescopes() {
        let d = dashboard();
        let segs = compute_waterfall(&d);
        assert_eq!(segs[0].cumulative, d.total_revenue);
        for i in 1..4 {
            assert_eq!(segs[i].cumulative - segs[i - 1].cumulative, segs[i].value);
        }
        assert_eq!(segs[4].cumulative, d.company_margin);
        assert!(segs[0].is_total && segs[4].is_total);
        assert!(segs[1..4].iter().all(|s| !s.is_total));
    }

    #[test]
    fn test_bar_geometry() {
        let segs = compute_waterfall(&dashboard());
        assert_eq!(bar_geometry(&segs[0]), (Decimal::ZERO, dec!(2226000)));
        // Consultant discounts hang from 2,226,000 down to 1,206,000
        assert_eq!(bar_geometry(&segs[1]), (dec!(1206000), dec!(1020000)));
        assert_eq!(bar_geometry(&segs[4]), (Decimal::ZERO, dec!(892200)));
    }

    #[test]
    fn test_fractional_cumulative_steps() {
        let plan: CompensationPlan = PerTier {
            consultant: TierConfig {
                personal_discount_pct: dec!(33.3),
                ..tier(Decimal::ZERO, 0)
            },
            leader: TierConfig {
                personal_discount_pct: dec!(12.5),
                ..tier(dec!(7.5), 1)
            },
            leader_of_leaders: TierConfig {
                personal_discount_pct: dec!(33.3),
                ..tier(dec!(9.9), 2)
            },
        };
        let network = NetworkParams {
            consultant_headcount: 13,
            leader_headcount: 7,
            lol_headcount: 3,
            consultant_avg_sales: dec!(101.01),
            leader_avg_sales: dec!(77.77),
            lol_avg_sales: dec!(0.1),
            growth_rate_pct: dec!(5),
            promotion_rate_pct: dec!(2),
            attrition_rate_pct: dec!(3),
        };
        let segs = compute_waterfall(&compute_dashboard(&plan, &network));
        let cumulative: Vec<Decimal> = segs.iter().map(|s| s.cumulative).collect();
        assert_eq!(
            cumulative,
            vec![dec!(1857.82), dec!(1420.55), dec!(1254.02), dec!(1135.03), dec!(1135.03)]
        );
        assert_eq!(segs[1].value, dec!(-437.27));
    }

    #[test]
    fn test_step_names_serialize_camel_case() {
        let json = serde_json::to_value(WaterfallStep::LolOverrides).unwrap();
        assert_eq!(json, serde_json::json!("lolOverrides"));
    }
}
