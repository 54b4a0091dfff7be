use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::analysis::dashboard::{compute_dashboard, DashboardResults};
use crate::plan::validation::{scenario_warnings, validate_network, validate_plan};
use crate::plan::{CompensationPlan, NetworkParams, PlanSide};
use crate::numeric::{round_currency, round_half_up, to_decimal, to_f64};
use crate::types::*;
use crate::CompPlanResult;

/// Grid resolution of the break-even scan.
pub const BREAK_EVEN_STEPS: u32 = 200;

/// Largest network scale the scan and curve sampler consider.
pub const MAX_MULTIPLIER: Multiplier = 3.0;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// A current plan, a proposed plan, and the network both are evaluated on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub current_plan: CompensationPlan,
    pub proposed_plan: CompensationPlan,
    pub network: NetworkParams,
}

/// The scalar dashboard metrics that are compared between plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TotalRevenue,
    TotalPayout,
    CompanyMargin,
    MarginPct,
    PayoutRatio,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::TotalRevenue,
        Metric::TotalPayout,
        Metric::CompanyMargin,
        Metric::MarginPct,
        Metric::PayoutRatio,
    ];

    pub fn of(&self, dashboard: &DashboardResults) -> Decimal {
        match self {
            Metric::TotalRevenue => dashboard.total_revenue,
            Metric::TotalPayout => dashboard.total_payout,
            Metric::CompanyMargin => dashboard.company_margin,
            Metric::MarginPct => dashboard.margin_pct,
            Metric::PayoutRatio => dashboard.payout_ratio,
        }
    }
}

/// One value per compared metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub total_revenue: Decimal,
    pub total_payout: Decimal,
    pub company_margin: Decimal,
    pub margin_pct: Decimal,
    pub payout_ratio: Decimal,
}

impl MetricSet {
    pub fn from_fn(mut f: impl FnMut(Metric) -> Decimal) -> Self {
        MetricSet {
            total_revenue: f(Metric::TotalRevenue),
            total_payout: f(Metric::TotalPayout),
            company_margin: f(Metric::CompanyMargin),
            margin_pct: f(Metric::MarginPct),
            payout_ratio: f(Metric::PayoutRatio),
        }
    }

    pub fn get(&self, metric: Metric) -> Decimal {
        match metric {
            Metric::TotalRevenue => self.total_revenue,
            Metric::TotalPayout => self.total_payout,
            Metric::CompanyMargin => self.company_margin,
            Metric::MarginPct => self.margin_pct,
            Metric::PayoutRatio => self.payout_ratio,
        }
    }
}

/// Side-by-side dashboards with deltas and the payout crossover volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResults {
    pub current: DashboardResults,
    pub proposed: DashboardResults,
    /// Proposed minus current
    pub deltas: MetricSet,
    /// Delta relative to |current|, in percent (0 when current is 0)
    pub delta_pcts: MetricSet,
    /// Network sales volume at which the cheaper plan flips, if it does
    /// within 3x today's network
    pub break_even_volume: Option<Money>,
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Scale multiplier for step `i` of an `n`-step sweep up to `MAX_MULTIPLIER`.
///
/// Divides before multiplying, so grid points carry the same binary64
/// error as the published scan (step 15 of 200 is 0.22499999999999998).
pub(crate) fn step_multiplier(i: u32, steps: u32) -> Multiplier {
    (f64::from(i) / f64::from(steps)) * MAX_MULTIPLIER
}

/// Total sales volume of a scaled network, to the nearest whole unit.
/// Scaling holds average sales fixed, so this prices at the unscaled averages.
pub(crate) fn scaled_volume(scaled: &NetworkParams) -> Money {
    to_decimal(round_half_up(scaled.total_volume_f64()))
}

/// Scan network scale from 3/200 to 3x and report the first volume at which
/// the sign of `current payout - proposed payout` flips.
///
/// Resolution is the grid step; this detects a crossover, it does not solve
/// for exact equality. A zero difference never counts as a flip.
pub fn find_break_even_volume(
    current_plan: &CompensationPlan,
    proposed_plan: &CompensationPlan,
    network: &NetworkParams,
) -> Option<Money> {
    let mut prev_diff: Option<f64> = None;

    for i in 1..=BREAK_EVEN_STEPS {
        let scaled = network.scaled(step_multiplier(i, BREAK_EVEN_STEPS));
        let cur_diff = to_f64(compute_dashboard(current_plan, &scaled).total_payout)
            - to_f64(compute_dashboard(proposed_plan, &scaled).total_payout);

        if let Some(prev) = prev_diff {
            if prev * cur_diff < 0.0 {
                let volume = scaled_volume(&scaled);
                debug!(step = i, %volume, "payout crossover found");
                return Some(volume);
            }
        }
        prev_diff = Some(cur_diff);
    }

    None
}

/// Compare two plans on the same network.
pub fn compute_comparison(
    current_plan: &CompensationPlan,
    proposed_plan: &CompensationPlan,
    network: &NetworkParams,
) -> ComparisonResults {
    let current = compute_dashboard(current_plan, network);
    let proposed = compute_dashboard(proposed_plan, network);

    let deltas = MetricSet::from_fn(|m| {
        to_decimal(round_currency(to_f64(m.of(&proposed)) - to_f64(m.of(&current))))
    });
    let delta_pcts = MetricSet::from_fn(|m| {
        let base = to_f64(m.of(&current));
        if base == 0.0 {
            Decimal::ZERO
        } else {
            let change = to_f64(m.of(&proposed)) - base;
            to_decimal(round_currency((change / base.abs()) * 100.0))
        }
    });

    let break_even_volume = find_break_even_volume(current_plan, proposed_plan, network);

    ComparisonResults {
        current,
        proposed,
        deltas,
        delta_pcts,
        break_even_volume,
    }
}

/// Validated comparison wrapped in the computation envelope.
pub fn analyze_comparison(input: &ScenarioInput) -> CompPlanResult<ComputationOutput<ComparisonResults>> {
    let start = Instant::now();

    validate_plan(PlanSide::Current, &input.current_plan)?;
    validate_plan(PlanSide::Proposed, &input.proposed_plan)?;
    validate_network(&input.network)?;

    let mut warnings = scenario_warnings(&input.current_plan, &input.network);
    for w in scenario_warnings(&input.proposed_plan, &input.network) {
        if !warnings.contains(&w) {
            warnings.push(w);
        }
    }

    let output = compute_comparison(&input.current_plan, &input.proposed_plan, &input.network);
    if output.break_even_volume.is_none() {
        warnings.push(format!(
            "No payout crossover between the plans up to {MAX_MULTIPLIER}x the current network"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Plan comparison: dashboard deltas with break-even network scan",
        &serde_json::json!({
            "scan_steps": BREAK_EVEN_STEPS,
            "max_multiplier": MAX_MULTIPLIER,
            "total_volume": input.network.total_volume().to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}
