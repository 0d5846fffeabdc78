mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use profitability_core::TimePeriod;

use commands::business::Overrides;
use commands::profitability::{AnalyzeArgs, ProfitabilityArgs};
use commands::targets::{SolveArgs, TargetsArgs};

/// Single-period business profitability, break-even and target analysis
#[derive(Parser)]
#[command(
    name = "pcalc",
    version,
    about = "Business profitability, break-even and target analysis",
    long_about = "A CLI for single-period business profitability analysis with decimal \
                  precision. Computes revenue, costs, profit, break-even, margin and ROI, \
                  and solves for the units, price or cost cuts that reach a target profit."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Currency for formatted amounts (ISO code or symbol); overrides input
    #[arg(long, global = true)]
    currency: Option<String>,

    /// Period the amounts refer to (monthly or annually); overrides input
    #[arg(long, global = true)]
    period: Option<TimePeriod>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report: results, formatted results, targets and warnings
    Analyze(AnalyzeArgs),
    /// Revenue, cost, profit, break-even, margin and ROI figures only
    Profitability(ProfitabilityArgs),
    /// Break-even and desired-margin targets
    Targets(TargetsArgs),
    /// Solve for one target net profit
    Solve(SolveArgs),
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

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let overrides = Overrides {
        currency: cli.currency,
        period: cli.period,
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::profitability::run_analyze(args, &overrides),
        Commands::Profitability(args) => {
            commands::profitability::run_profitability(args, &overrides)
        }
        Commands::Targets(args) => commands::targets::run_targets(args, &overrides),
        Commands::Solve(args) => commands::targets::run_solve(args, &overrides),
        Commands::Version => {
            println!("pcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
