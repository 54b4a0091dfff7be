use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analysis::tier_financials::{compute_tier_financials, TierFinancials};
use crate::plan::validation::{scenario_warnings, validate_network, validate_plan};
use crate::plan::{CompensationPlan, NetworkParams, PerTier, PlanSide};
use crate::numeric::{round_currency, to_decimal, to_f64};
use crate::types::*;
use crate::CompPlanResult;

/// Input for a company-level dashboard of one plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInput {
    pub plan: CompensationPlan,
    pub network: NetworkParams,
}

/// Company-level revenue, payout, and margin for one plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardResults {
    pub total_revenue: Money,
    pub total_payout: Money,
    /// Revenue less payout; may be negative
    pub company_margin: Money,
    /// Margin as a percentage of revenue (0 when there is no revenue)
    pub margin_pct: Percent,
    /// Payout as a percentage of revenue (0 when there is no revenue)
    pub payout_ratio: Percent,
    pub tiers: PerTier<TierFinancials>,
}

/// Share of revenue, in percent, guarded against zero revenue.
fn pct_of_revenue(amount: f64, revenue: f64) -> f64 {
    if revenue > 0.0 {
        round_currency((amount / revenue) * 100.0)
    } else {
        0.0
    }
}

/// Aggregate all three tiers into company totals.
pub fn compute_dashboard(plan: &CompensationPlan, network: &NetworkParams) -> DashboardResults {
    let tiers = PerTier::from_fn(|tier| compute_tier_financials(tier, plan, network));

    let (revenue, payout) = tiers.iter().fold((0.0, 0.0), |(rev, pay), (_, f)| {
        (rev + to_f64(f.total_sales), pay + to_f64(f.total_payout))
    });

    let total_revenue = round_currency(revenue);
    let total_payout = round_currency(payout);
    let company_margin = round_currency(total_revenue - total_payout);

    DashboardResults {
        total_revenue: to_decimal(total_revenue),
        total_payout: to_decimal(total_payout),
        company_margin: to_decimal(company_margin),
        margin_pct: to_decimal(pct_of_revenue(company_margin, total_revenue)),
        payout_ratio: to_decimal(pct_of_revenue(total_payout, total_revenue)),
        tiers,
    }
}

/// Validated dashboard wrapped in the computation envelope.
pub fn analyze_dashboard(input: &DashboardInput) -> CompPlanResult<ComputationOutput<DashboardResults>> {
    let start = Instant::now();

    validate_plan(PlanSide::Current, &input.plan)?;
    validate_network(&input.network)?;
    let warnings = scenario_warnings(&input.plan, &input.network);

    let output = compute_dashboard(&input.plan, &input.network);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compensation dashboard: tier payouts aggregated to company margin",
        &serde_json::json!({
            "consultant_headcount": input.network.consultant_headcount,
            "leader_headcount": input.network.leader_headcount,
            "lol_headcount": input.network.lol_headcount,
            "total_volume": input.network.total_volume().to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::TierConfig;
    use rust_decimal::Decimal;
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

    fn plan() -> CompensationPlan {
        PerTier {
            consultant: tier(Decimal::ZERO, 0),
            leader: tier(dec!(5), 1),
            leader_of_leaders: tier(dec!(10), 2),
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
    fn test_default_dashboard_totals() {
        let d = compute_dashboard(&plan(), &network());
        assert_eq!(d.total_revenue, dec!(2226000));
        // 1,020,000 + 186,000 + 127,800
        assert_eq!(d.total_payout, dec!(1333800));
        assert_eq!(d.company_margin, dec!(892200));
        // 892,200 / 2,226,000 = 40.0808...%
        assert_eq!(d.margin_pct, dec!(40.08));
        // 1,333,800 / 2,226,000 = 59.9191...%
        assert_eq!(d.payout_ratio, dec!(59.92));
    }

    #[test]
    fn test_margin_is_revenue_less_payout() {
        let d = compute_dashboard(&plan(), &network());
        assert_eq!(d.company_margin, d.total_revenue - d.total_payout);
    }

    #[test]
    fn test_zero_revenue_zero_ratios() {
        let mut n = network();
        n.consultant_avg_sales = Decimal::ZERO;
        n.leader_avg_sales = Decimal::ZERO;
        n.lol_avg_sales = Decimal::ZERO;
        let d = compute_dashboard(&plan(), &n);
        assert_eq!(d.total_revenue, Decimal::ZERO);
        assert_eq!(d.margin_pct, Decimal::ZERO);
        assert_eq!(d.payout_ratio, Decimal::ZERO);
    }

    #[test]
    fn test_negative_margin_when_payout_exceeds_revenue() {
        let mut p = plan();
        p.consultant.personal_discount_pct = dec!(100);
        p.leader.personal_discount_pct = dec!(100);
        p.leader_of_leaders.personal_discount_pct = dec!(100);
        let d = compute_dashboard(&p, &network());
        assert!(d.company_margin < Decimal::ZERO);
        assert!(d.margin_pct < Decimal::ZERO);
        assert!(d.payout_ratio > dec!(100));
    }

    #[test]
    fn test_fractional_inputs_aggregate_in_tier_order() {
        let mut p = plan();
        p.consultant.personal_discount_pct = dec!(33.3);
        p.leader.personal_discount_pct = dec!(12.5);
        p.leader.override_rate_pct = dec!(7.5);
        p.leader_of_leaders.personal_discount_pct = dec!(33.3);
        p.leader_of_leaders.override_rate_pct = dec!(9.9);
        let mut n = network();
        n.consultant_headcount = 13;
        n.consultant_avg_sales = dec!(101.01);
        n.leader_headcount = 7;
        n.leader_avg_sales = dec!(77.77);
        n.lol_avg_sales = dec!(0.1);
        let d = compute_dashboard(&p, &n);
        assert_eq!(d.total_revenue, dec!(1857.82));
        assert_eq!(d.tiers.consultant.total_payout, dec!(437.27));
        assert_eq!(d.tiers.leader.total_payout, dec!(166.53));
        assert_eq!(d.tiers.leader_of_leaders.total_payout, dec!(118.99));
        assert_eq!(d.company_margin, dec!(1135.03));
    }

    #[test]
    fn test_tier_breakdown_keyed_by_tier() {
        let d = compute_dashboard(&plan(), &network());
        assert_eq!(d.tiers.leader.override_total, dec!(102000));
        assert_eq!(d.tiers.consultant.headcount, 850);
    }

    #[test]
    fn test_analyze_dashboard_warns_on_empty_top_tier() {
        let mut n = network();
        n.lol_headcount = 0;
        let out = analyze_dashboard(&DashboardInput {
            plan: plan(),
            network: n,
        })
        .unwrap();
        assert_eq!(out.warnings.len(), 1);
    }
}
