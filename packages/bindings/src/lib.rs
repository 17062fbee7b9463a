use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use property_returns_core::amortization::build_loan_schedule;
use property_returns_core::scenarios::{self, AppreciationInput, LoanComparisonInput};
use property_returns_core::{analyze, AnalysisRequest, CalculatorConfig};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_config(config_json: Option<String>) -> NapiResult<CalculatorConfig> {
    match config_json {
        Some(json) => {
            let config: CalculatorConfig = serde_json::from_str(&json).map_err(to_napi_error)?;
            config.validate().map_err(to_napi_error)?;
            Ok(config)
        }
        None => Ok(CalculatorConfig::default()),
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// `{"inputs": {...}, "sections": [...]}` in, analysis envelope out.
#[napi]
pub fn analyze_investment(input_json: String, config_json: Option<String>) -> NapiResult<String> {
    let request: AnalysisRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let config = parse_config(config_json)?;
    let output = analyze(&request, &config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct LoanScheduleInput {
    loan_amount: Decimal,
    #[serde(alias = "interest_rate")]
    annual_interest_rate_percent: Decimal,
    loan_term_years: u32,
}

#[napi]
pub fn loan_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanScheduleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let schedule = build_loan_schedule(
        input.loan_amount,
        input.annual_interest_rate_percent,
        input.loan_term_years,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

#[napi]
pub fn compare_loans(input_json: String) -> NapiResult<String> {
    let input: LoanComparisonInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scenarios::compare_loans(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

#[napi]
pub fn appreciation_scenarios(input_json: String) -> NapiResult<String> {
    let input: AppreciationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = scenarios::appreciation_scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
