//! Multi-year projection of value, debt, equity and cash flow.
//!
//! Every year is a pure function of the year number and the fixed inputs, so
//! [`ProjectionSeries::year`] can be called in any order and
//! [`ProjectionSeries::iter`] hands out a fresh iterator each time.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::LoanSchedule;
use crate::inputs::InvestmentInputs;
use crate::time_value::{compound, irr};
use crate::types::{to_rate, Money, Percent};
use crate::yields::operating_expenses;

const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Position at the end of projection year `year`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: u32,
    pub property_value: Money,
    pub loan_balance: Money,
    /// property_value - loan_balance
    pub equity: Money,
    pub annual_cash_flow: Money,
    pub cumulative_cash_flow: Money,
    /// property_value - purchase price
    pub capital_gain: Money,
    /// (equity growth + cumulative cash flow) over cash invested; `None` when
    /// nothing was invested
    pub total_return_percent: Option<Percent>,
}

/// Headline figures at the end of the projection horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub final_property_value: Money,
    pub final_equity: Money,
    pub total_capital_gain: Money,
    pub total_cash_flow: Money,
    pub total_cash_invested: Money,
    /// First year in which equity plus cumulative cash flow covers the cash
    /// put in; `None` if that does not happen within the horizon
    pub payback_year: Option<u32>,
    /// (final equity + total cash flow) / cash invested
    pub equity_multiple: Option<Decimal>,
    pub annualized_return_percent: Option<Percent>,
    /// IRR of [-cash invested, cash flows..., final cash flow + equity]
    pub equity_irr_percent: Option<Percent>,
}

/// Year-by-year projection over the borrowed inputs and loan.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionSeries<'a> {
    inputs: &'a InvestmentInputs,
    loan: &'a LoanSchedule,
}

impl<'a> ProjectionSeries<'a> {
    pub fn new(inputs: &'a InvestmentInputs, loan: &'a LoanSchedule) -> Self {
        Self { inputs, loan }
    }

    /// Number of years in the configured horizon.
    pub fn len(&self) -> u32 {
        self.inputs.projection_years
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot for `year` (1-indexed). Years past the horizon are allowed;
    /// holding-period comparisons look beyond it.
    pub fn year(&self, year: u32) -> ProjectionYear {
        let property_value = self.property_value(year);
        let loan_balance = self.loan.balance_after_months(year.saturating_mul(12));
        let equity = property_value - loan_balance;
        let cumulative_cash_flow = self.cumulative_cash_flow(year);
        let total_return_percent = percent_of_invested(
            equity - self.inputs.down_payment() + cumulative_cash_flow,
            self.inputs.total_cash_invested(),
        );

        ProjectionYear {
            year,
            property_value,
            loan_balance,
            equity,
            annual_cash_flow: self.annual_cash_flow(year),
            cumulative_cash_flow,
            capital_gain: property_value - self.inputs.property_price,
            total_return_percent,
        }
    }

    pub fn iter(&self) -> ProjectionIter<'a> {
        ProjectionIter {
            series: *self,
            next_year: 1,
        }
    }

    pub fn snapshots(&self) -> Vec<ProjectionYear> {
        self.iter().collect()
    }

    /// price x (1 + growth)^year
    pub fn property_value(&self, year: u32) -> Money {
        compound(
            self.inputs.property_price,
            to_rate(self.inputs.annual_growth_rate_percent),
            year,
        )
    }

    /// Cash flow during `year`. Rent compounds from year 2 under a rent
    /// growth policy; repayments stop once the loan term has run.
    pub fn annual_cash_flow(&self, year: u32) -> Money {
        let rent = compound(
            self.inputs.annual_rent(),
            self.inputs.rent_growth_rate(),
            year.saturating_sub(1),
        );
        let noi = rent - operating_expenses(rent, &self.inputs.expenses).total;
        let repayment = if self.loan.is_repaying_in_year(year) {
            self.loan.monthly_payment
        } else {
            Decimal::ZERO
        };
        (noi / MONTHS_PER_YEAR - repayment) * MONTHS_PER_YEAR
    }

    pub fn cumulative_cash_flow(&self, year: u32) -> Money {
        (1..=year).map(|y| self.annual_cash_flow(y)).sum()
    }

    pub fn summary(&self) -> ProjectionSummary {
        let years = self.len();
        let invested = self.inputs.total_cash_invested();
        let last = self.year(years);

        let payback_year = self
            .iter()
            .find(|y| y.equity + y.cumulative_cash_flow >= invested)
            .map(|y| y.year);

        let equity_multiple = if invested.is_zero() {
            None
        } else {
            Some((last.equity + last.cumulative_cash_flow) / invested)
        };

        let annualized_return_percent = equity_multiple
            .filter(|m| *m > Decimal::ZERO)
            .and_then(|m| m.checked_powd(Decimal::ONE / Decimal::from(years)))
            .map(|growth| (growth - Decimal::ONE) * Decimal::ONE_HUNDRED);

        let equity_irr_percent = if invested.is_zero() {
            None
        } else {
            let mut flows = Vec::with_capacity(years as usize + 1);
            flows.push(-invested);
            for y in 1..=years {
                let cf = self.annual_cash_flow(y);
                flows.push(if y == years { cf + last.equity } else { cf });
            }
            irr(&flows).map(|r| r * Decimal::ONE_HUNDRED)
        };

        ProjectionSummary {
            years,
            final_property_value: last.property_value,
            final_equity: last.equity,
            total_capital_gain: last.capital_gain,
            total_cash_flow: last.cumulative_cash_flow,
            total_cash_invested: invested,
            payback_year,
            equity_multiple,
            annualized_return_percent,
            equity_irr_percent,
        }
    }
}

impl<'a> IntoIterator for &ProjectionSeries<'a> {
    type Item = ProjectionYear;
    type IntoIter = ProjectionIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy walk over the horizon. Holds only the next year number.
#[derive(Debug, Clone)]
pub struct ProjectionIter<'a> {
    series: ProjectionSeries<'a>,
    next_year: u32,
}

impl Iterator for ProjectionIter<'_> {
    type Item = ProjectionYear;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_year > self.series.len() {
            return None;
        }
        let snapshot = self.series.year(self.next_year);
        self.next_year += 1;
        Some(snapshot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.series.len() + 1).saturating_sub(self.next_year) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProjectionIter<'_> {}

fn percent_of_invested(amount: Money, invested: Money) -> Option<Percent> {
    if invested.is_zero() {
        None
    } else {
        Some(amount / invested * Decimal::ONE_HUNDRED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{OperatingExpenseInputs, Rent};

    fn sample_inputs() -> InvestmentInputs {
        InvestmentInputs {
            property_price: dec!(600000),
            rent: Rent::monthly(dec!(2600)),
            down_payment_percent: dec!(20),
            annual_interest_rate_percent: dec!(6),
            loan_term_years: 30,
            agent_commission_percent: dec!(2.5),
            other_upfront_costs: dec!(5000),
            expenses: OperatingExpenseInputs {
                property_management_percent: dec!(7),
                maintenance_annual: dec!(1200),
                insurance_and_rates_annual: dec!(2400),
                vacancy_allowance_percent: dec!(3),
                other_annual_expenses: Decimal::ZERO,
            },
            annual_growth_rate_percent: dec!(5),
            projection_years: 10,
            current_market_value: None,
            rent_growth_rate_percent: None,
        }
    }

    #[test]
    fn test_series_length_and_order() {
        let inputs = sample_inputs();
        let loan = LoanSchedule::for_inputs(&inputs).unwrap();
        let series = ProjectionSeries::new(&inputs, &loan);
        let years: Vec<u32> = series.iter().map(|y| y.year).collect();
        assert_eq!(years, (1..=10).collect::<Vec<_>>());
        assert_eq!(series.iter().len(), 10);
    }

    #[test]
    fn test_property_value_compounds() {
        let inputs = sample_inputs();
        let loan = LoanSchedule::for_inputs(&inputs).unwrap();
        let series = ProjectionSeries::new(&inputs, &loan);
        assert_eq!(series.year(1).property_value, dec!(630000));
        assert_eq!(series.year(2).property_value, dec!(661500));
        assert_eq!(series.year(2).capital_gain, dec!(61500));
    }

    #[test]
    fn test_flat_rent_cash_flow_accumulates_linearly() {
        let inputs = sample_inputs();
        let loan = LoanSchedule::for_inputs(&inputs).unwrap();
        let series = ProjectionSeries::new(&inputs, &loan);
        let first = series.year(1).annual_cash_flow;
        for y in series.iter() {
            assert_eq!(y.annual_cash_flow, first);
            let diff = y.cumulative_cash_flow - first * Decimal::from(y.year);
            assert!(diff.abs() < dec!(0.000001), "year {}: {diff}", y.year);
        }
    }

    #[test]
    fn test_rent_growth_raises_later_cash_flow() {
        let mut inputs = sample_inputs();
        inputs.rent_growth_rate_percent = Some(dec!(2.5));
        let loan = LoanSchedule::for_inputs(&inputs).unwrap();
        let series = ProjectionSeries::new(&inputs, &loan);
        assert!(series.annual_cash_flow(2) > series.annual_cash_flow(1));
        assert!(series.annual_cash_flow(10) > series.annual_cash_flow(2));
    }

    #[test]
    fn test_repayments_stop_after_term() {
        let mut inputs = sample_inputs();
        inputs.loan_term_years = 5;
        inputs.projection_years = 8;
        let loan = LoanSchedule::for_inputs(&inputs).unwrap();
        let series = ProjectionSeries::new(&inputs, &loan);
        assert!(series.year(5).annual_cash_flow < series.year(6).annual_cash_flow);
        assert_eq!(series.year(5).loan_balance, Decimal::ZERO);
        assert_eq!(series.year(6).equity, series.year(6).property_value);
    }

    #[test]
    fn test_total_return_definition() {
        let inputs = sample_inputs();
        let loan = LoanSchedule::for_inputs(&inputs).unwrap();
        let series = ProjectionSeries::new(&inputs, &loan);
        let y3 = series.year(3);
        let expected = (y3.equity - dec!(120000) + y3.cumulative_cash_flow)
            / inputs.total_cash_invested()
            * dec!(100);
        assert_eq!(y3.total_return_percent, Some(expected));
    }

    #[test]
    fn test_summary_headline_figures() {
        let inputs = sample_inputs();
        let loan = LoanSchedule::for_inputs(&inputs).unwrap();
        let series = ProjectionSeries::new(&inputs, &loan);
        let summary = series.summary();
        let last = series.year(10);

        assert_eq!(summary.years, 10);
        assert_eq!(summary.final_property_value, last.property_value);
        assert_eq!(summary.total_cash_flow, last.cumulative_cash_flow);
        assert!(summary.payback_year.is_some());
        assert!(summary.equity_multiple.unwrap() > Decimal::ONE);
        let irr = summary.equity_irr_percent.unwrap();
        assert!(irr > Decimal::ZERO && irr < dec!(50), "irr {irr}");
        assert!(summary.annualized_return_percent.unwrap() > Decimal::ZERO);
    }
}
