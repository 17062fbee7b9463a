//! Ratings layered on top of the computed figures: a 0-10 investment score,
//! rent coverage of the loan repayment and a comparison of holding periods.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::LoanSchedule;
use crate::config::DEFAULT_MAX_PROJECTION_YEARS;
use crate::error::PropertyReturnsError;
use crate::inputs::InvestmentInputs;
use crate::projection::ProjectionSeries;
use crate::types::{Money, Percent};
use crate::PropertyReturnsResult;

const MAX_SCORE: Decimal = dec!(10);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Poor,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

impl Rating {
    /// Highest rating whose threshold `value` reaches. Thresholds are given
    /// for Excellent, VeryGood, Good and Fair in that order.
    fn from_thresholds(value: Decimal, thresholds: [Decimal; 4]) -> Self {
        let [excellent, very_good, good, fair] = thresholds;
        if value >= excellent {
            Rating::Excellent
        } else if value >= very_good {
            Rating::VeryGood
        } else if value >= good {
            Rating::Good
        } else if value >= fair {
            Rating::Fair
        } else {
            Rating::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::VeryGood => "Very Good",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Poor => "Poor",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentCoverage {
    pub monthly_rent: Money,
    pub monthly_repayment: Money,
    /// Rent as a percentage of the repayment; `None` with no debt service
    pub ratio_percent: Option<Percent>,
    pub rating: Rating,
    /// monthly_rent - monthly_repayment
    pub monthly_difference: Money,
    pub annual_difference: Money,
    pub monthly_contribution_needed: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingPeriod {
    pub years: u32,
    pub future_property_value: Money,
    pub capital_gain: Money,
    pub total_cash_flow: Money,
    /// capital_gain + total_cash_flow
    pub total_profit: Money,
    pub roi_percent: Option<Percent>,
    pub annualized_roi_percent: Option<Percent>,
    pub rating: Option<Rating>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingPeriodAnalysis {
    pub periods: Vec<HoldingPeriod>,
    /// Shortest assessed period with a positive total profit
    pub profit_break_even_years: Option<u32>,
    /// Shortest assessed period with positive cumulative cash flow
    pub cash_flow_break_even_years: Option<u32>,
    /// Period with the highest annualized ROI
    pub best_period_years: Option<u32>,
}

// ---------------------------------------------------------------------------
// Investment score
// ---------------------------------------------------------------------------

/// Composite score in [0, 10].
///
/// | component | 3 | 2 | 1 |
/// |---|---|---|---|
/// | gross yield % | >= 8 | >= 6 | >= 4 |
/// | monthly cash flow | >= 500 | >= 200 | >= 0 |
/// | cash-on-cash % | >= 10 | >= 6 | >= 3 |
///
/// Net yield adds 1 at >= 3% or 0.5 at >= 1%. A missing cash-on-cash return
/// scores nothing.
pub fn investment_score(
    gross_yield_percent: Percent,
    net_yield_percent: Percent,
    cash_on_cash_return_percent: Option<Percent>,
    monthly_cash_flow: Money,
) -> Decimal {
    let tiered = |value: Decimal, top: Decimal, mid: Decimal, low: Decimal| {
        if value >= top {
            dec!(3)
        } else if value >= mid {
            dec!(2)
        } else if value >= low {
            dec!(1)
        } else {
            Decimal::ZERO
        }
    };

    let mut score = tiered(gross_yield_percent, dec!(8), dec!(6), dec!(4));
    score += tiered(monthly_cash_flow, dec!(500), dec!(200), Decimal::ZERO);
    score += cash_on_cash_return_percent
        .map(|coc| tiered(coc, dec!(10), dec!(6), dec!(3)))
        .unwrap_or(Decimal::ZERO);

    if net_yield_percent >= dec!(3) {
        score += Decimal::ONE;
    } else if net_yield_percent >= Decimal::ONE {
        score += dec!(0.5);
    }

    score.min(MAX_SCORE)
}

// ---------------------------------------------------------------------------
// Rent coverage
// ---------------------------------------------------------------------------

/// How much of the monthly loan repayment the rent covers.
///
/// With nothing to repay the ratio is `None` and the rating is Excellent.
pub fn rent_coverage(monthly_rent: Money, monthly_repayment: Money) -> RentCoverage {
    let ratio_percent = if monthly_repayment > Decimal::ZERO {
        Some(monthly_rent / monthly_repayment * Decimal::ONE_HUNDRED)
    } else {
        None
    };
    let rating = match ratio_percent {
        Some(ratio) => {
            Rating::from_thresholds(ratio, [dec!(100), dec!(80), dec!(60), dec!(40)])
        }
        None => Rating::Excellent,
    };
    let monthly_difference = monthly_rent - monthly_repayment;

    RentCoverage {
        monthly_rent,
        monthly_repayment,
        ratio_percent,
        rating,
        monthly_difference,
        annual_difference: monthly_difference * dec!(12),
        monthly_contribution_needed: (-monthly_difference).max(Decimal::ZERO),
    }
}

// ---------------------------------------------------------------------------
// Holding periods
// ---------------------------------------------------------------------------

/// Profit from selling at the end of each holding period.
///
/// Each period reads the same year-by-year projection used for the main
/// projection, so rent growth and loan payoff are treated identically. ROI
/// is measured against total cash invested.
pub fn holding_period_analysis(
    inputs: &InvestmentInputs,
    loan: &LoanSchedule,
    periods: &[u32],
) -> PropertyReturnsResult<HoldingPeriodAnalysis> {
    if let Some(&bad) = periods
        .iter()
        .find(|&&p| p == 0 || p > DEFAULT_MAX_PROJECTION_YEARS)
    {
        return Err(PropertyReturnsError::InvalidInput {
            field: "holding_periods".into(),
            reason: format!(
                "holding period {bad} must be between 1 and {DEFAULT_MAX_PROJECTION_YEARS}"
            ),
        });
    }

    let series = ProjectionSeries::new(inputs, loan);
    let invested = inputs.total_cash_invested();

    let assessed: Vec<HoldingPeriod> = periods
        .iter()
        .map(|&years| {
            let snapshot = series.year(years);
            let total_profit = snapshot.capital_gain + snapshot.cumulative_cash_flow;
            let (roi_percent, annualized_roi_percent) = roi(total_profit, invested, years);
            HoldingPeriod {
                years,
                future_property_value: snapshot.property_value,
                capital_gain: snapshot.capital_gain,
                total_cash_flow: snapshot.cumulative_cash_flow,
                total_profit,
                roi_percent,
                annualized_roi_percent,
                rating: annualized_roi_percent.map(|a| {
                    Rating::from_thresholds(a, [dec!(15), dec!(12), dec!(8), dec!(5)])
                }),
            }
        })
        .collect();

    let mut by_length: Vec<&HoldingPeriod> = assessed.iter().collect();
    by_length.sort_by_key(|p| p.years);

    let profit_break_even_years = by_length
        .iter()
        .find(|p| p.total_profit > Decimal::ZERO)
        .map(|p| p.years);
    let cash_flow_break_even_years = by_length
        .iter()
        .find(|p| p.total_cash_flow > Decimal::ZERO)
        .map(|p| p.years);
    let best_period_years = assessed
        .iter()
        .filter_map(|p| p.annualized_roi_percent.map(|a| (a, p.years)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, years)| years);

    Ok(HoldingPeriodAnalysis {
        periods: assessed,
        profit_break_even_years,
        cash_flow_break_even_years,
        best_period_years,
    })
}

/// Simple and annualized ROI. Both are `None` with nothing invested; the
/// annualized figure is also `None` once the whole stake is lost.
fn roi(total_profit: Money, invested: Money, years: u32) -> (Option<Percent>, Option<Percent>) {
    if invested.is_zero() {
        return (None, None);
    }
    let simple = total_profit / invested * Decimal::ONE_HUNDRED;
    let multiple = (invested + total_profit) / invested;
    let annualized = if multiple > Decimal::ZERO {
        multiple
            .checked_powd(Decimal::ONE / Decimal::from(years))
            .map(|growth| (growth - Decimal::ONE) * Decimal::ONE_HUNDRED)
    } else {
        None
    };
    (Some(simple), annualized)
}
