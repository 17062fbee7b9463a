//! Side-by-side what-ifs: deposit sizes, appreciation rates and a plain
//! capital-growth forecast.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::build_loan_schedule;
use crate::config::DEFAULT_MAX_PROJECTION_YEARS;
use crate::error::PropertyReturnsError;
use crate::time_value::compound;
use crate::types::*;
use crate::validation::MAX_PRICE;
use crate::PropertyReturnsResult;

// ---------------------------------------------------------------------------
// Loan comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparisonInput {
    pub property_price: Money,
    pub down_payment_percents: Vec<Percent>,
    pub annual_interest_rate_percent: Percent,
    pub loan_term_years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanScenario {
    pub down_payment_percent: Percent,
    pub down_payment: Money,
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanComparison {
    pub scenarios: Vec<LoanScenario>,
    /// Extra interest paid by the smallest deposit relative to the largest
    pub interest_saved_by_largest_deposit: Money,
}

/// Repayment and lifetime interest for each candidate deposit.
pub fn compare_loans(
    input: &LoanComparisonInput,
) -> PropertyReturnsResult<ComputationOutput<LoanComparison>> {
    let start = Instant::now();
    check_price(input.property_price)?;
    if input.down_payment_percents.is_empty() {
        return Err(PropertyReturnsError::InvalidInput {
            field: "down_payment_percents".into(),
            reason: "At least one deposit size is required".into(),
        });
    }

    let mut scenarios = Vec::with_capacity(input.down_payment_percents.len());
    for &percent in &input.down_payment_percents {
        if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
            return Err(PropertyReturnsError::InvalidInput {
                field: "down_payment_percents".into(),
                reason: format!("{percent}% is outside 0-100"),
            });
        }
        let down_payment = input.property_price * to_rate(percent);
        let loan_amount = input.property_price - down_payment;
        let schedule = build_loan_schedule(
            loan_amount,
            input.annual_interest_rate_percent,
            input.loan_term_years,
        )?;
        scenarios.push(LoanScenario {
            down_payment_percent: percent,
            down_payment,
            loan_amount,
            monthly_payment: schedule.monthly_payment,
            total_interest: schedule.total_interest_paid,
        });
    }

    let most_interest = scenarios.iter().map(|s| s.total_interest).max();
    let least_interest = scenarios.iter().map(|s| s.total_interest).min();
    let interest_saved_by_largest_deposit = match (most_interest, least_interest) {
        (Some(hi), Some(lo)) => hi - lo,
        _ => Decimal::ZERO,
    };

    let mut warnings = Vec::new();
    if scenarios.iter().any(|s| s.down_payment_percent < Decimal::from(20)) {
        warnings.push("Deposits under 20% usually attract lenders mortgage insurance".into());
    }

    Ok(with_metadata(
        "Fixed-rate loan comparison across deposit sizes",
        &serde_json::json!({
            "property_price": input.property_price.to_string(),
            "annual_interest_rate_percent": input.annual_interest_rate_percent.to_string(),
            "loan_term_years": input.loan_term_years,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        LoanComparison {
            scenarios,
            interest_saved_by_largest_deposit,
        },
    ))
}

// ---------------------------------------------------------------------------
// Appreciation scenarios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppreciationInput {
    pub property_price: Money,
    pub growth_rates_percent: Vec<Percent>,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppreciationScenario {
    pub annual_growth_rate_percent: Percent,
    pub future_value: Money,
    pub total_appreciation: Money,
    pub total_appreciation_percent: Percent,
}

/// Value after `years` under each growth rate.
pub fn appreciation_scenarios(
    input: &AppreciationInput,
) -> PropertyReturnsResult<ComputationOutput<Vec<AppreciationScenario>>> {
    let start = Instant::now();
    check_price(input.property_price)?;
    check_years(input.years)?;
    if input.growth_rates_percent.is_empty() {
        return Err(PropertyReturnsError::InvalidInput {
            field: "growth_rates_percent".into(),
            reason: "At least one growth rate is required".into(),
        });
    }

    let mut scenarios = Vec::with_capacity(input.growth_rates_percent.len());
    for &rate in &input.growth_rates_percent {
        check_growth("growth_rates_percent", rate)?;
        let future_value = compound(input.property_price, to_rate(rate), input.years);
        let total_appreciation = future_value - input.property_price;
        scenarios.push(AppreciationScenario {
            annual_growth_rate_percent: rate,
            future_value,
            total_appreciation,
            total_appreciation_percent: total_appreciation / input.property_price
                * Decimal::ONE_HUNDRED,
        });
    }

    let mut warnings = Vec::new();
    if scenarios.iter().any(|s| s.total_appreciation.is_sign_negative()) {
        warnings.push("One or more scenarios lose value over the period".into());
    }

    Ok(with_metadata(
        "Compound appreciation: price x (1 + g)^years",
        &serde_json::json!({
            "property_price": input.property_price.to_string(),
            "years": input.years,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        scenarios,
    ))
}

// ---------------------------------------------------------------------------
// Capital gains forecast
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapitalGainsInput {
    pub property_price: Money,
    pub annual_growth_rate_percent: Percent,
    pub years: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsYear {
    pub year: u32,
    pub property_value: Money,
    pub cumulative_gain: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsForecast {
    pub annual_growth_rate_percent: Percent,
    pub years: u32,
    pub final_value: Money,
    pub total_gain: Money,
    pub yearly_breakdown: Vec<CapitalGainsYear>,
}

/// Year-by-year value under a single growth rate. Financing is ignored.
pub fn capital_gains_forecast(input: &CapitalGainsInput) -> PropertyReturnsResult<CapitalGainsForecast> {
    check_price(input.property_price)?;
    check_years(input.years)?;
    check_growth("annual_growth_rate_percent", input.annual_growth_rate_percent)?;

    let rate = to_rate(input.annual_growth_rate_percent);
    let yearly_breakdown: Vec<CapitalGainsYear> = (1..=input.years)
        .map(|year| {
            let property_value = compound(input.property_price, rate, year);
            CapitalGainsYear {
                year,
                property_value,
                cumulative_gain: property_value - input.property_price,
            }
        })
        .collect();

    let final_value = yearly_breakdown
        .last()
        .map(|y| y.property_value)
        .unwrap_or(input.property_price);

    Ok(CapitalGainsForecast {
        annual_growth_rate_percent: input.annual_growth_rate_percent,
        years: input.years,
        final_value,
        total_gain: final_value - input.property_price,
        yearly_breakdown,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn check_price(price: Money) -> PropertyReturnsResult<()> {
    if price <= Decimal::ZERO || price > MAX_PRICE {
        return Err(PropertyReturnsError::InvalidInput {
            field: "property_price".into(),
            reason: format!("must be greater than 0 and at most {MAX_PRICE}"),
        });
    }
    Ok(())
}

fn check_years(years: u32) -> PropertyReturnsResult<()> {
    if years == 0 || years > DEFAULT_MAX_PROJECTION_YEARS {
        return Err(PropertyReturnsError::InvalidInput {
            field: "years".into(),
            reason: format!("must be between 1 and {DEFAULT_MAX_PROJECTION_YEARS}"),
        });
    }
    Ok(())
}

fn check_growth(field: &str, rate: Percent) -> PropertyReturnsResult<()> {
    if rate <= -Decimal::ONE_HUNDRED || rate > Decimal::ONE_HUNDRED {
        return Err(PropertyReturnsError::InvalidInput {
            field: field.into(),
            reason: format!("{rate}% is outside (-100, 100]"),
        });
    }
    Ok(())
}
