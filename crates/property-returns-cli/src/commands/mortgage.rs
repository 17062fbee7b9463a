use clap::Args;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use property_returns_core::amortization::build_loan_schedule;
use property_returns_core::{with_metadata, CalculatorConfig, Money, Percent};

use super::{read_request, CommandResult};

/// Arguments for a standalone loan schedule
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Loan term in years (defaults to the config's term)
    #[arg(long)]
    pub term_years: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub loan_amount: Money,
    #[serde(alias = "interest_rate")]
    pub annual_interest_rate_percent: Percent,
    #[serde(default)]
    pub loan_term_years: Option<u32>,
}

pub fn run_mortgage(args: MortgageArgs, config: &CalculatorConfig) -> CommandResult {
    let start = Instant::now();
    let input: MortgageInput = match read_request(&args.input)? {
        Some(input) => input,
        None => MortgageInput {
            loan_amount: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            annual_interest_rate_percent: args
                .interest_rate
                .ok_or("--interest-rate is required (or provide --input)")?,
            loan_term_years: args.term_years,
        },
    };
    let term = input.loan_term_years.unwrap_or(config.default_loan_term_years);

    let schedule = build_loan_schedule(input.loan_amount, input.annual_interest_rate_percent, term)?;

    let mut warnings = Vec::new();
    if schedule.loan_amount.is_zero() {
        warnings.push("Loan amount is zero; there is nothing to repay".to_string());
    }

    let output = with_metadata(
        "Fixed-rate principal and interest amortisation, monthly repayments",
        &serde_json::json!({
            "loan_amount": input.loan_amount.to_string(),
            "annual_interest_rate_percent": input.annual_interest_rate_percent.to_string(),
            "loan_term_years": term,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        schedule,
    );
    Ok(serde_json::to_value(output)?)
}
