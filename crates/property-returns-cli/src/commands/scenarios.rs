use clap::Args;
use rust_decimal::Decimal;
use std::time::Instant;

use property_returns_core::scenarios::{
    self, AppreciationInput, CapitalGainsInput, LoanComparisonInput,
};
use property_returns_core::{with_metadata, CalculatorConfig};

use super::{read_request, CommandResult};

/// Arguments for comparing deposit sizes
#[derive(Args)]
pub struct LoanComparisonArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Deposit percentages to compare (comma-separated, e.g. "10,20,30")
    #[arg(long, value_delimiter = ',')]
    pub deposits: Vec<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years (defaults to the config's term)
    #[arg(long)]
    pub term_years: Option<u32>,
}

pub fn run_loan_comparison(args: LoanComparisonArgs, config: &CalculatorConfig) -> CommandResult {
    let input: LoanComparisonInput = match read_request(&args.input)? {
        Some(input) => input,
        None => LoanComparisonInput {
            property_price: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment_percents: if args.deposits.is_empty() {
                vec![
                    Decimal::from(10),
                    config.default_down_payment_percent,
                    Decimal::from(30),
                ]
            } else {
                args.deposits
            },
            annual_interest_rate_percent: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            loan_term_years: args.term_years.unwrap_or(config.default_loan_term_years),
        },
    };
    let result = scenarios::compare_loans(&input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for appreciation scenarios
#[derive(Args)]
pub struct AppreciationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Annual growth rates in percent (comma-separated, e.g. "3,5.5,7")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub rates: Vec<Decimal>,

    /// Years to compound over (defaults to the config's projection length)
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_appreciation(args: AppreciationArgs, config: &CalculatorConfig) -> CommandResult {
    let input: AppreciationInput = match read_request(&args.input)? {
        Some(input) => input,
        None => AppreciationInput {
            property_price: args.price.ok_or("--price is required (or provide --input)")?,
            growth_rates_percent: if args.rates.is_empty() {
                vec![config.default_annual_growth_rate_percent]
            } else {
                args.rates
            },
            years: args.years.unwrap_or(config.default_projection_years),
        },
    };
    let result = scenarios::appreciation_scenarios(&input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for a year-by-year capital growth forecast
#[derive(Args)]
pub struct CapitalGainsArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Annual growth rate in percent (defaults to the config's rate)
    #[arg(long, allow_hyphen_values = true)]
    pub growth_rate: Option<Decimal>,

    /// Years to forecast (defaults to the config's projection length)
    #[arg(long)]
    pub years: Option<u32>,
}

pub fn run_capital_gains(args: CapitalGainsArgs, config: &CalculatorConfig) -> CommandResult {
    let start = Instant::now();
    let input: CapitalGainsInput = match read_request(&args.input)? {
        Some(input) => input,
        None => CapitalGainsInput {
            property_price: args.price.ok_or("--price is required (or provide --input)")?,
            annual_growth_rate_percent: args
                .growth_rate
                .unwrap_or(config.default_annual_growth_rate_percent),
            years: args.years.unwrap_or(config.default_projection_years),
        },
    };
    let forecast = scenarios::capital_gains_forecast(&input)?;
    let output = with_metadata(
        "Compound capital growth, ignoring financing",
        &input,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        forecast,
    );
    Ok(serde_json::to_value(output)?)
}
