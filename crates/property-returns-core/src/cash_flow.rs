//! Cash flow after debt service, cash-on-cash return and break-even timing.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::amortization::LoanSchedule;
use crate::inputs::InvestmentInputs;
use crate::types::{Money, Percent};
use crate::yields::YieldMetrics;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Log-based estimates can land a month either side of the true crossing.
const BREAK_EVEN_CORRECTION_STEPS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlowResult {
    /// (annual rent - operating expenses) / 12 - monthly repayment
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    pub annual_debt_service: Money,
    pub down_payment: Money,
    pub agent_commission: Money,
    pub other_upfront_costs: Money,
    pub total_cash_invested: Money,
    /// `None` when nothing was invested up front
    pub cash_on_cash_return_percent: Option<Percent>,
    /// Months until monthly cash flow is non-negative. `Some(0)` when it
    /// already is; `None` when it never gets there.
    pub break_even_months: Option<u32>,
    /// Out-of-pocket top-up needed each month, zero when cash flow is positive
    pub monthly_shortfall: Money,
}

pub fn compute_cash_flow(
    inputs: &InvestmentInputs,
    loan: &LoanSchedule,
    yields: &YieldMetrics,
) -> CashFlowResult {
    let monthly_cash_flow =
        yields.net_operating_income / MONTHS_PER_YEAR - loan.monthly_payment;
    let annual_cash_flow = monthly_cash_flow * MONTHS_PER_YEAR;
    let total_cash_invested = inputs.total_cash_invested();

    CashFlowResult {
        monthly_cash_flow,
        annual_cash_flow,
        annual_debt_service: loan.annual_debt_service(),
        down_payment: inputs.down_payment(),
        agent_commission: inputs.agent_commission(),
        other_upfront_costs: inputs.other_upfront_costs,
        total_cash_invested,
        cash_on_cash_return_percent: cash_on_cash_return(annual_cash_flow, total_cash_invested),
        break_even_months: break_even_months(inputs, loan.monthly_payment, monthly_cash_flow),
        monthly_shortfall: (-monthly_cash_flow).max(Decimal::ZERO),
    }
}

/// Annual cash flow over cash invested, as a percentage. `None` when
/// nothing was invested.
pub fn cash_on_cash_return(annual_cash_flow: Money, total_cash_invested: Money) -> Option<Percent> {
    if total_cash_invested.is_zero() {
        return None;
    }
    Some(annual_cash_flow / total_cash_invested * Decimal::ONE_HUNDRED)
}

/// Months until the monthly cash flow turns non-negative.
///
/// Without a rent growth policy the cash flow is constant, so the answer is
/// either 0 or never. With growth, rent (and the rent-proportional costs)
/// compound monthly at `(1 + g)^(m/12)` and the crossing month is solved
/// directly rather than searched for, so there is no horizon cap.
pub fn break_even_months(
    inputs: &InvestmentInputs,
    monthly_payment: Money,
    monthly_cash_flow: Money,
) -> Option<u32> {
    if monthly_cash_flow >= Decimal::ZERO {
        return Some(0);
    }

    let growth = inputs.rent_growth_rate();
    let net_share = Decimal::ONE - inputs.expenses.rent_proportional_rate();
    if growth <= Decimal::ZERO || net_share <= Decimal::ZERO {
        return None;
    }

    // Rent left after rent-proportional costs must cover fixed costs plus
    // twelve repayments.
    let net_rent = inputs.annual_rent() * net_share;
    let required = inputs.expenses.fixed_annual() + monthly_payment * MONTHS_PER_YEAR;
    let one_plus_g = Decimal::ONE + growth;

    let years = (required / net_rent).checked_ln()? / one_plus_g.checked_ln()?;
    let mut months = (years * MONTHS_PER_YEAR).ceil().to_u32()?.max(1);

    let covered = |m: u32| -> bool {
        let exponent = Decimal::from(m) / MONTHS_PER_YEAR;
        one_plus_g
            .checked_powd(exponent)
            .map(|f| net_rent * f >= required)
            .unwrap_or(true)
    };

    for _ in 0..BREAK_EVEN_CORRECTION_STEPS {
        if months > 1 && covered(months - 1) {
            months -= 1;
        } else if !covered(months) {
            months += 1;
        } else {
            break;
        }
    }

    log::debug!("rent growth of {growth} breaks even after {months} months");
    Some(months)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{OperatingExpenseInputs, Rent};
    use crate::yields::compute_yields;

    fn scenario(down_payment_percent: Decimal) -> InvestmentInputs {
        InvestmentInputs {
            property_price: dec!(750000),
            rent: Rent::weekly(dec!(650)),
            down_payment_percent,
            annual_interest_rate_percent: dec!(6.5),
            loan_term_years: 30,
            agent_commission_percent: dec!(2),
            other_upfront_costs: dec!(10000),
            expenses: OperatingExpenseInputs {
                property_management_percent: dec!(8),
                maintenance_annual: dec!(1500),
                insurance_and_rates_annual: dec!(3000),
                vacancy_allowance_percent: dec!(2),
                other_annual_expenses: Decimal::ZERO,
            },
            annual_growth_rate_percent: dec!(5.5),
            projection_years: 10,
            current_market_value: None,
            rent_growth_rate_percent: None,
        }
    }

    fn run(inputs: &InvestmentInputs) -> CashFlowResult {
        let loan = LoanSchedule::for_inputs(inputs).unwrap();
        let yields = compute_yields(inputs);
        compute_cash_flow(inputs, &loan, &yields)
    }

    #[test]
    fn test_leveraged_cash_flow_is_negative() {
        let cf = run(&scenario(dec!(20)));
        // NOI 25,920 / 12 = 2,160 less ≈ 3,792.41 repayment
        assert!((cf.monthly_cash_flow - dec!(-1632.41)).abs() < dec!(0.01));
        assert_eq!(cf.annual_cash_flow, cf.monthly_cash_flow * dec!(12));
        assert_eq!(cf.monthly_shortfall, -cf.monthly_cash_flow);
        // 150,000 + 15,000 + 10,000
        assert_eq!(cf.total_cash_invested, dec!(175000));
        assert!(cf.cash_on_cash_return_percent.unwrap() < Decimal::ZERO);
    }

    #[test]
    fn test_flat_rent_never_breaks_even() {
        let cf = run(&scenario(dec!(20)));
        assert_eq!(cf.break_even_months, None);
    }

    #[test]
    fn test_cash_purchase_has_no_debt_service() {
        let cf = run(&scenario(dec!(100)));
        assert_eq!(cf.annual_debt_service, Decimal::ZERO);
        assert_eq!(cf.monthly_cash_flow, dec!(25920) / dec!(12));
        assert_eq!(cf.break_even_months, Some(0));
        assert_eq!(cf.monthly_shortfall, Decimal::ZERO);
    }

    #[test]
    fn test_zero_cash_invested_uses_sentinel() {
        let mut inputs = scenario(Decimal::ZERO);
        inputs.agent_commission_percent = Decimal::ZERO;
        inputs.other_upfront_costs = Decimal::ZERO;
        let cf = run(&inputs);
        assert_eq!(cf.total_cash_invested, Decimal::ZERO);
        assert_eq!(cf.cash_on_cash_return_percent, None);
    }

    #[test]
    fn test_rent_growth_break_even_month() {
        let mut inputs = scenario(dec!(20));
        inputs.rent_growth_rate_percent = Some(dec!(3));
        let cf = run(&inputs);
        let months = cf.break_even_months.unwrap();

        // First month whose grown net rent covers fixed costs and repayments
        let net_rent = dec!(33800) * dec!(0.9);
        let required = dec!(4500) + LoanSchedule::for_inputs(&inputs).unwrap().annual_debt_service();
        let covered = |m: u32| net_rent * dec!(1.03).powd(Decimal::from(m) / dec!(12)) >= required;
        assert!(covered(months));
        assert!(!covered(months - 1));
        // ln(50,008.9 / 30,420) / ln(1.03) ≈ 16.8 years
        assert!(months > 195 && months < 210, "got {months}");
    }

    #[test]
    fn test_costs_consuming_all_rent_never_break_even() {
        let mut inputs = scenario(dec!(20));
        inputs.rent_growth_rate_percent = Some(dec!(3));
        inputs.expenses.property_management_percent = dec!(60);
        inputs.expenses.vacancy_allowance_percent = dec!(40);
        assert_eq!(run(&inputs).break_even_months, None);
    }

    #[test]
    fn test_cash_on_cash_helper() {
        assert_eq!(cash_on_cash_return(dec!(5000), dec!(100000)), Some(dec!(5)));
        assert_eq!(cash_on_cash_return(dec!(5000), Decimal::ZERO), None);
    }
}
