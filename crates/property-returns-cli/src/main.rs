mod commands;
mod input;
mod output;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::{AnalyzeArgs, HoldingPeriodsArgs, MetricsArgs};
use commands::mortgage::MortgageArgs;
use commands::sample::SampleArgs;
use commands::scenarios::{AppreciationArgs, CapitalGainsArgs, LoanComparisonArgs};
use property_returns_core::CalculatorConfig;

/// Rental property investment calculations
#[derive(Parser)]
#[command(
    name = "propcalc",
    version,
    about = "Rental property investment calculations",
    long_about = "A CLI for estimating rental property returns with decimal precision. \
                  Covers loan repayments, yields, cash flow, break-even timing, \
                  multi-year projections and holding-period comparisons."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Calculator settings file (.json, .yaml or .yml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Full investment analysis (loan, yields, cash flow, projection, assessment)
    Analyze(AnalyzeArgs),
    /// Monthly repayment and amortisation schedule for a loan
    Mortgage(MortgageArgs),
    /// Gross yield, net yield and cap rate
    Yields(MetricsArgs),
    /// Cash flow after repayments, cash-on-cash return and break-even
    CashFlow(MetricsArgs),
    /// Year-by-year value, equity and cash flow projection
    Projection(MetricsArgs),
    /// Compare repayments across deposit sizes
    LoanComparison(LoanComparisonArgs),
    /// Property value under several growth rates
    Appreciation(AppreciationArgs),
    /// Year-by-year capital growth forecast
    CapitalGains(CapitalGainsArgs),
    /// Profit and ROI from selling after each holding period
    HoldingPeriods(HoldingPeriodsArgs),
    /// Generate placeholder listing data
    SampleProperty(SampleArgs),
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

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: commands::CommandResult = match cli.command {
        Commands::Analyze(args) => commands::analysis::run_analyze(args, &config),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args, &config),
        Commands::Yields(args) => commands::analysis::run_yields(args, &config),
        Commands::CashFlow(args) => commands::analysis::run_cash_flow(args, &config),
        Commands::Projection(args) => commands::analysis::run_projection(args, &config),
        Commands::LoanComparison(args) => {
            commands::scenarios::run_loan_comparison(args, &config)
        }
        Commands::Appreciation(args) => commands::scenarios::run_appreciation(args, &config),
        Commands::CapitalGains(args) => commands::scenarios::run_capital_gains(args, &config),
        Commands::HoldingPeriods(args) => {
            commands::analysis::run_holding_periods(args, &config)
        }
        Commands::SampleProperty(args) => commands::sample::run_sample_property(args),
        Commands::Version => {
            println!("propcalc {}", env!("CARGO_PKG_VERSION"));
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

/// `RUST_LOG` wins when set; otherwise `-v` flags pick the level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(path: &Option<String>) -> Result<CalculatorConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => input::file::read_config(path),
        None => Ok(CalculatorConfig::default()),
    }
}
