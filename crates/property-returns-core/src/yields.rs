//! Rental yields and cap rate.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::inputs::{InvestmentInputs, OperatingExpenseInputs};
use crate::types::{to_rate, Money, Percent};

/// Annual operating costs in currency, one line per input component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingExpenseBreakdown {
    pub property_management: Money,
    pub vacancy_allowance: Money,
    pub maintenance: Money,
    pub insurance_and_rates: Money,
    pub other: Money,
    pub total: Money,
}

/// Which value the cap rate was measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapRateBasis {
    PurchasePrice,
    MarketValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YieldMetrics {
    pub annual_rent: Money,
    pub operating_expenses: OperatingExpenseBreakdown,
    /// Annual rent less operating expenses, before debt service
    pub net_operating_income: Money,
    pub gross_yield_percent: Percent,
    pub net_yield_percent: Percent,
    pub cap_rate_percent: Percent,
    pub cap_rate_basis: CapRateBasis,
}

/// Cost lines for a year's rent. Management and vacancy scale with rent; the
/// rest are fixed amounts.
pub fn operating_expenses(
    annual_rent: Money,
    expenses: &OperatingExpenseInputs,
) -> OperatingExpenseBreakdown {
    let property_management = annual_rent * to_rate(expenses.property_management_percent);
    let vacancy_allowance = annual_rent * to_rate(expenses.vacancy_allowance_percent);
    let total = property_management
        + vacancy_allowance
        + expenses.maintenance_annual
        + expenses.insurance_and_rates_annual
        + expenses.other_annual_expenses;

    OperatingExpenseBreakdown {
        property_management,
        vacancy_allowance,
        maintenance: expenses.maintenance_annual,
        insurance_and_rates: expenses.insurance_and_rates_annual,
        other: expenses.other_annual_expenses,
        total,
    }
}

/// Gross yield, net yield and cap rate for validated inputs.
///
/// Property price (and market value, when given) are strictly positive after
/// validation, so every ratio here has a non-zero denominator.
pub fn compute_yields(inputs: &InvestmentInputs) -> YieldMetrics {
    let annual_rent = inputs.annual_rent();
    let operating_expenses = operating_expenses(annual_rent, &inputs.expenses);
    let net_operating_income = annual_rent - operating_expenses.total;

    let gross_yield_percent = annual_rent / inputs.property_price * Decimal::ONE_HUNDRED;
    let net_yield_percent = net_operating_income / inputs.property_price * Decimal::ONE_HUNDRED;

    let (cap_rate_denominator, cap_rate_basis) = match inputs.current_market_value {
        Some(value) if value != inputs.property_price => (value, CapRateBasis::MarketValue),
        _ => (inputs.property_price, CapRateBasis::PurchasePrice),
    };
    let cap_rate_percent = net_operating_income / cap_rate_denominator * Decimal::ONE_HUNDRED;

    YieldMetrics {
        annual_rent,
        operating_expenses,
        net_operating_income,
        gross_yield_percent,
        net_yield_percent,
        cap_rate_percent,
        cap_rate_basis,
    }
}
