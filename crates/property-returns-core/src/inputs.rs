//! Validated investment inputs.
//!
//! Values here have already passed [`crate::validation::validate_inputs`];
//! the calculators rely on those bounds and do not re-check them.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{to_rate, Money, Percent};

const WEEKS_PER_YEAR: Decimal = dec!(52);
const MONTHS_PER_YEAR: Decimal = dec!(12);

/// The period a rent figure is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentPeriod {
    Weekly,
    Monthly,
    Annual,
}

/// A unit-labelled rent amount.
///
/// The engine works on annual rent throughout; [`Rent::annual`] is the only
/// place a weekly or monthly quote is converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rent {
    pub period: RentPeriod,
    pub amount: Money,
}

impl Rent {
    pub fn weekly(amount: Money) -> Self {
        Self {
            period: RentPeriod::Weekly,
            amount,
        }
    }

    pub fn monthly(amount: Money) -> Self {
        Self {
            period: RentPeriod::Monthly,
            amount,
        }
    }

    pub fn annual_amount(amount: Money) -> Self {
        Self {
            period: RentPeriod::Annual,
            amount,
        }
    }

    /// Weekly x 52, monthly x 12, annual as given.
    pub fn annual(&self) -> Money {
        match self.period {
            RentPeriod::Weekly => self.amount * WEEKS_PER_YEAR,
            RentPeriod::Monthly => self.amount * MONTHS_PER_YEAR,
            RentPeriod::Annual => self.amount,
        }
    }

    pub fn monthly_equivalent(&self) -> Money {
        self.annual() / MONTHS_PER_YEAR
    }
}

/// Recurring annual running costs of the property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingExpenseInputs {
    /// Property manager's fee as a percentage of collected rent
    pub property_management_percent: Percent,
    pub maintenance_annual: Money,
    /// Building insurance plus council/water rates
    pub insurance_and_rates_annual: Money,
    /// Expected vacancy as a percentage of annual rent
    pub vacancy_allowance_percent: Percent,
    pub other_annual_expenses: Money,
}

impl OperatingExpenseInputs {
    /// Share of rent consumed by rent-proportional costs, as a fraction.
    pub fn rent_proportional_rate(&self) -> Decimal {
        to_rate(self.property_management_percent + self.vacancy_allowance_percent)
    }

    /// Costs that do not move with rent.
    pub fn fixed_annual(&self) -> Money {
        self.maintenance_annual + self.insurance_and_rates_annual + self.other_annual_expenses
    }
}

/// A validated set of property, loan and growth assumptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentInputs {
    pub property_price: Money,
    pub rent: Rent,
    pub down_payment_percent: Percent,
    pub annual_interest_rate_percent: Percent,
    pub loan_term_years: u32,
    pub agent_commission_percent: Percent,
    pub other_upfront_costs: Money,
    pub expenses: OperatingExpenseInputs,
    pub annual_growth_rate_percent: Percent,
    pub projection_years: u32,
    /// Current valuation used as the cap-rate denominator when it differs
    /// from the purchase price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_market_value: Option<Money>,
    /// Year-over-year rent growth. Absent means rent stays flat.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rent_growth_rate_percent: Option<Percent>,
}

impl InvestmentInputs {
    pub fn annual_rent(&self) -> Money {
        self.rent.annual()
    }

    pub fn down_payment(&self) -> Money {
        self.property_price * to_rate(self.down_payment_percent)
    }

    /// property_price x (1 - down_payment_percent / 100)
    pub fn loan_amount(&self) -> Money {
        self.property_price * (Decimal::ONE - to_rate(self.down_payment_percent))
    }

    pub fn agent_commission(&self) -> Money {
        self.property_price * to_rate(self.agent_commission_percent)
    }

    /// Deposit plus commission plus other upfront costs.
    pub fn total_cash_invested(&self) -> Money {
        self.down_payment() + self.agent_commission() + self.other_upfront_costs
    }

    /// Rent growth as a fraction, zero when no policy was supplied.
    pub fn rent_growth_rate(&self) -> Decimal {
        self.rent_growth_rate_percent
            .map(to_rate)
            .unwrap_or(Decimal::ZERO)
    }
}
