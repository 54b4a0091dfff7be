//! Environment-driven defaults for the compplan CLI.
//!
//! Every value can be overridden by the matching command-line flag.

use clap::ValueEnum;
use std::env;

use comp_plan_core::analysis::break_even::DEFAULT_CURVE_POINTS;

use crate::OutputFormat;

#[derive(Debug, Clone)]
pub struct CompPlanCliConfig {
    /// Output format used when `--output` is not given
    pub default_output_format: Option<String>,

    /// Samples on a break-even curve when `--points` is not given
    pub curve_points: u32,

    /// `tracing` filter directive for stderr logging
    pub log_filter: String,
}

impl CompPlanCliConfig {
    /// Read configuration from the environment, falling back to defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            default_output_format: env::var("COMPPLAN_OUTPUT").ok(),

            curve_points: env::var("COMPPLAN_CURVE_POINTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CURVE_POINTS),

            log_filter: env::var("COMPPLAN_LOG").unwrap_or_else(|_| "warn".to_string()),
        }
    }

    /// The configured output format, if it names a known one.
    pub fn output_format(&self) -> Option<OutputFormat> {
        self.default_output_format
            .as_deref()
            .and_then(|s| OutputFormat::from_str(s, true).ok())
    }
}

impl Default for CompPlanCliConfig {
    fn default() -> Self {
        Self::new()
    }
}
