use pretty_assertions::assert_eq;
use property_returns_core::amortization::{build_loan_schedule, remaining_balance, LoanSchedule};
use property_returns_core::assessment::holding_period_analysis;
use property_returns_core::projection::ProjectionSeries;
use property_returns_core::yields::compute_yields;
use property_returns_core::{InvestmentInputs, OperatingExpenseInputs, Rent};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn inputs() -> InvestmentInputs {
    InvestmentInputs {
        property_price: dec!(750000),
        rent: Rent::weekly(dec!(650)),
        down_payment_percent: dec!(20),
        annual_interest_rate_percent: dec!(6.5),
        loan_term_years: 30,
        agent_commission_percent: dec!(5),
        other_upfront_costs: Decimal::ZERO,
        expenses: OperatingExpenseInputs {
            property_management_percent: dec!(8),
            maintenance_annual: dec!(2000),
            insurance_and_rates_annual: dec!(3000),
            vacancy_allowance_percent: dec!(2),
            other_annual_expenses: Decimal::ZERO,
        },
        annual_growth_rate_percent: dec!(5.5),
        projection_years: 15,
        current_market_value: None,
        rent_growth_rate_percent: Some(dec!(2.5)),
    }
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_schedule_is_idempotent() {
    let a = build_loan_schedule(dec!(600000), dec!(6.5), 30).unwrap();
    let b = build_loan_schedule(dec!(600000), dec!(6.5), 30).unwrap();
    assert_eq!(a.monthly_payment, b.monthly_payment);
    assert_eq!(a, b);
}

#[test]
fn test_zero_interest_divides_evenly() {
    let schedule = build_loan_schedule(dec!(360000), Decimal::ZERO, 30).unwrap();
    assert_eq!(schedule.monthly_payment, dec!(360000) / dec!(360));
    assert_eq!(schedule.total_interest_paid, Decimal::ZERO);
}

#[test]
fn test_balance_is_zero_at_and_after_term() {
    assert_eq!(remaining_balance(dec!(600000), dec!(6.5), 30, 360).unwrap(), Decimal::ZERO);
    assert_eq!(remaining_balance(dec!(600000), dec!(6.5), 30, 480).unwrap(), Decimal::ZERO);
}

#[test]
fn test_balance_declines_through_the_term() {
    let schedule = build_loan_schedule(dec!(600000), dec!(6.5), 30).unwrap();
    let balances: Vec<Decimal> = (0..=30).map(|y| schedule.balance_after_months(y * 12)).collect();
    assert!(balances.windows(2).all(|w| w[0] > w[1] || w[1].is_zero()));
}

// ===========================================================================
// Yields
// ===========================================================================

#[test]
fn test_gross_yield_identity_and_net_not_above_gross() {
    let inputs = inputs();
    let yields = compute_yields(&inputs);
    assert_eq!(
        yields.gross_yield_percent,
        inputs.annual_rent() / inputs.property_price * dec!(100)
    );
    assert!(yields.net_yield_percent <= yields.gross_yield_percent);
}

// ===========================================================================
// Projection
// ===========================================================================

#[test]
fn test_year_matches_iteration() {
    let inputs = inputs();
    let loan = LoanSchedule::for_inputs(&inputs).unwrap();
    let series = ProjectionSeries::new(&inputs, &loan);
    for (i, snapshot) in series.iter().enumerate() {
        assert_eq!(snapshot, series.year(i as u32 + 1));
    }
}

#[test]
fn test_iteration_is_restartable() {
    let inputs = inputs();
    let loan = LoanSchedule::for_inputs(&inputs).unwrap();
    let series = ProjectionSeries::new(&inputs, &loan);
    let first: Vec<_> = series.iter().collect();
    let second: Vec<_> = (&series).into_iter().collect();
    assert_eq!(first.len(), 15);
    assert_eq!(first, second);
    assert_eq!(first, series.snapshots());
}

#[test]
fn test_higher_growth_raises_every_year() {
    let low = inputs();
    let high = InvestmentInputs {
        annual_growth_rate_percent: dec!(6),
        ..inputs()
    };
    let low_loan = LoanSchedule::for_inputs(&low).unwrap();
    let high_loan = LoanSchedule::for_inputs(&high).unwrap();
    let low_series = ProjectionSeries::new(&low, &low_loan);
    let high_series = ProjectionSeries::new(&high, &high_loan);

    for (l, h) in low_series.iter().zip(high_series.iter()) {
        assert!(h.property_value > l.property_value, "year {}", l.year);
        assert!(h.equity > l.equity, "year {}", l.year);
    }
}

#[test]
fn test_equity_is_value_less_balance() {
    let inputs = inputs();
    let loan = LoanSchedule::for_inputs(&inputs).unwrap();
    let series = ProjectionSeries::new(&inputs, &loan);
    for y in series.iter() {
        assert_eq!(y.equity, y.property_value - y.loan_balance);
        assert_eq!(y.capital_gain, y.property_value - inputs.property_price);
    }
}

#[test]
fn test_summary_matches_last_year() {
    let inputs = inputs();
    let loan = LoanSchedule::for_inputs(&inputs).unwrap();
    let series = ProjectionSeries::new(&inputs, &loan);
    let summary = series.summary();
    let last = series.year(15);

    assert_eq!(summary.final_equity, last.equity);
    assert_eq!(summary.total_capital_gain, last.capital_gain);
    assert_eq!(summary.total_cash_invested, dec!(187500));
    assert!(summary.equity_irr_percent.is_some());
}

// ===========================================================================
// Holding periods
// ===========================================================================

#[test]
fn test_holding_periods_agree_with_projection() {
    let inputs = inputs();
    let loan = LoanSchedule::for_inputs(&inputs).unwrap();
    let series = ProjectionSeries::new(&inputs, &loan);
    let analysis = holding_period_analysis(&inputs, &loan, &[5, 10]).unwrap();

    let ten = &analysis.periods[1];
    assert_eq!(ten.years, 10);
    assert_eq!(ten.future_property_value, series.year(10).property_value);
    assert_eq!(ten.total_cash_flow, series.year(10).cumulative_cash_flow);
}
