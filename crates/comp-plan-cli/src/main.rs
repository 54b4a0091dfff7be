mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commands::compare::{BreakEvenCurveArgs, CompareArgs};
use commands::plan::{DashboardArgs, TierArgs, WaterfallArgs};
use commands::presets::PresetsArgs;
use commands::share::ShareArgs;
use config::CompPlanCliConfig;

/// Compare multi-level compensation plans
#[derive(Parser)]
#[command(
    name = "compplan",
    version,
    about = "Compare multi-level compensation plans",
    long_about = "A CLI for modelling the payout cost of a three-tier direct-sales \
                  compensation plan, rounded to the cent. Computes per-tier \
                  financials, company margin, plan-vs-plan deltas, break-even \
                  volume, margin waterfalls, and shareable state tokens."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (defaults to $COMPPLAN_OUTPUT, then json)
    #[arg(long, global = true)]
    output: Option<OutputFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Payout breakdown for a single tier
    Tier(TierArgs),
    /// Revenue, payout, and margin for one plan
    Dashboard(DashboardArgs),
    /// Compare the current and proposed plans, including break-even volume
    Compare(CompareArgs),
    /// Revenue-to-margin waterfall for one plan
    Waterfall(WaterfallArgs),
    /// Sample both plans' payout cost across network scales
    BreakEvenCurve(BreakEvenCurveArgs),
    /// List the built-in plan presets
    Presets(PresetsArgs),
    /// Encode a scenario as a share token, or decode one
    Share(ShareArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(config: &CompPlanCliConfig) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = CompPlanCliConfig::new();
    init_tracing(&config);

    let format = cli
        .output
        .clone()
        .or_else(|| config.output_format())
        .unwrap_or(OutputFormat::Json);
    debug!(?format, "resolved output format");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Tier(args) => commands::plan::run_tier(args),
        Commands::Dashboard(args) => commands::plan::run_dashboard(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Waterfall(args) => commands::plan::run_waterfall(args),
        Commands::BreakEvenCurve(args) => commands::compare::run_break_even_curve(args, &config),
        Commands::Presets(args) => commands::presets::run_presets(args),
        Commands::Share(args) => commands::share::run_share(args),
        Commands::Version => {
            println!("compplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            info!("command completed");
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
