//! The computation engine. Every `compute_*` function is a pure function of
//! its inputs; the `analyze_*` wrappers add validation and the output envelope.

pub mod break_even;
pub mod comparison;
pub mod dashboard;
pub mod tier_financials;
pub mod waterfall;

pub use break_even::{compute_break_even_curve, BreakEvenPoint};
pub use comparison::{compute_comparison, ComparisonResults, ScenarioInput};
pub use dashboard::{compute_dashboard, DashboardResults};
pub use tier_financials::{compute_tier_financials, TierFinancials};
pub use waterfall::{compute_waterfall, WaterfallSegment};
