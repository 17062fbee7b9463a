use pretty_assertions::assert_eq;
use property_returns_core::analysis::{analyze, AnalysisRequest, Section};
use property_returns_core::providers::{attach_insight, MarketInsight, MarketInsightProvider};
use property_returns_core::validation::*;
use property_returns_core::{CalculatorConfig, PropertyReturnsError, RawInputs};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

fn raw(price: i64, weekly_rent: i64, down: i64, rate: &str) -> RawInputs {
    RawInputs::new()
        .with(PROPERTY_PRICE, price)
        .with(WEEKLY_RENT, weekly_rent)
        .with(DOWN_PAYMENT_PERCENT, down)
        .with(INTEREST_RATE, rate)
        .with(LOAN_TERM_YEARS, 30)
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn test_scenario_standard_purchase() {
    let request = AnalysisRequest::new(raw(750000, 650, 20, "6.5"));
    let out = analyze(&request, &CalculatorConfig::default()).unwrap();
    let a = &out.result;

    let loan = a.loan.as_ref().unwrap();
    assert_eq!(loan.loan_amount, dec!(600000));
    // 600,000 at 6.5% over 30 years
    assert_close(loan.monthly_payment, dec!(3792.41), dec!(0.01));

    let yields = a.yields.as_ref().unwrap();
    assert_eq!(yields.annual_rent, dec!(33800));
    assert_close(yields.gross_yield_percent, dec!(4.51), dec!(0.005));
}

#[test]
fn test_scenario_larger_deposit() {
    let request = AnalysisRequest::new(raw(680000, 580, 25, "6.0"));
    let out = analyze(&request, &CalculatorConfig::default()).unwrap();
    let a = &out.result;

    assert_eq!(a.loan.as_ref().unwrap().loan_amount, dec!(510000));
    assert_close(a.yields.as_ref().unwrap().gross_yield_percent, dec!(4.43), dec!(0.01));
}

#[test]
fn test_scenario_cash_purchase_has_no_debt_service() {
    let request = AnalysisRequest::new(raw(600000, 600, 100, "6"));
    let out = analyze(&request, &CalculatorConfig::default()).unwrap();
    let a = &out.result;

    let loan = a.loan.as_ref().unwrap();
    assert_eq!(loan.loan_amount, Decimal::ZERO);
    assert_eq!(loan.monthly_payment, Decimal::ZERO);

    let yields = a.yields.as_ref().unwrap();
    let cash_flow = a.cash_flow.as_ref().unwrap();
    assert_eq!(
        cash_flow.monthly_cash_flow,
        yields.net_operating_income / dec!(12)
    );
    assert_eq!(cash_flow.break_even_months, Some(0));
    assert_eq!(a.assessment.as_ref().unwrap().rent_coverage.ratio_percent, None);
}

#[test]
fn test_scenario_upfront_costs_dwarf_sale_proceeds() {
    // Equity IRR is deeply negative; the solver must report it, not blow up.
    for (upfront, years) in [(20_000_000_i64, 20), (50_000_000, 30), (1_000_000_000_000, 50)] {
        let request = AnalysisRequest::new(
            raw(1000000, 1000, 100, "6")
                .with(ANNUAL_GROWTH_RATE_PERCENT, 0)
                .with(OTHER_UPFRONT_COSTS, upfront)
                .with(PROJECTION_YEARS, years),
        );
        let out = analyze(&request, &CalculatorConfig::default()).unwrap();
        let summary = &out.result.projection.as_ref().unwrap().summary;
        if let Some(irr) = summary.equity_irr_percent {
            assert!(irr < Decimal::ZERO, "irr {irr} for upfront {upfront}");
        }
        assert_eq!(summary.years, years as u32);
    }
}

#[test]
fn test_scenario_nothing_invested_reports_sentinel() {
    let request = AnalysisRequest::new(
        raw(500000, 500, 0, "6")
            .with(AGENT_COMMISSION_PERCENT, 0)
            .with(OTHER_UPFRONT_COSTS, 0),
    );
    let out = analyze(&request, &CalculatorConfig::default()).unwrap();
    let a = &out.result;

    let cash_flow = a.cash_flow.as_ref().unwrap();
    assert_eq!(cash_flow.total_cash_invested, Decimal::ZERO);
    assert_eq!(cash_flow.cash_on_cash_return_percent, None);

    let projection = a.projection.as_ref().unwrap();
    assert!(projection.years.iter().all(|y| y.total_return_percent.is_none()));
    assert_eq!(projection.summary.equity_irr_percent, None);

    let json = serde_json::to_value(&out).unwrap();
    assert!(json["result"]["cash_flow"]["cash_on_cash_return_percent"].is_null());
}

// ===========================================================================
// Envelope and sections
// ===========================================================================

#[test]
fn test_envelope_metadata() {
    let out = analyze(
        &AnalysisRequest::new(raw(750000, 650, 20, "6.5")),
        &CalculatorConfig::default(),
    )
    .unwrap();
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert!(!out.methodology.is_empty());
    assert_eq!(out.assumptions["property_price"], "750000");
}

#[test]
fn test_sections_are_omitted_from_json() {
    let request = AnalysisRequest::new(raw(750000, 650, 20, "6.5"))
        .with_sections(&[Section::Loan, Section::CashFlow]);
    let out = analyze(&request, &CalculatorConfig::default()).unwrap();
    let json = serde_json::to_value(&out.result).unwrap();
    assert!(json.get("loan").is_some());
    assert!(json.get("cash_flow").is_some());
    assert!(json.get("yields").is_none());
    assert!(json.get("projection").is_none());
}

#[test]
fn test_request_deserializes_from_json() {
    let request: AnalysisRequest = serde_json::from_str(
        r#"{
            "inputs": {
                "property_price": "750000",
                "weekly_rent": 650,
                "interest_rate": 6.5
            },
            "sections": ["yields"]
        }"#,
    )
    .unwrap();
    let out = analyze(&request, &CalculatorConfig::default()).unwrap();
    assert_close(
        out.result.yields.unwrap().gross_yield_percent,
        dec!(4.51),
        dec!(0.005),
    );
}

#[test]
fn test_invalid_config_is_rejected_before_inputs() {
    let config = CalculatorConfig {
        holding_periods: vec![],
        ..CalculatorConfig::default()
    };
    let err = analyze(&AnalysisRequest::new(raw(750000, 650, 20, "6.5")), &config).unwrap_err();
    match err {
        PropertyReturnsError::InvalidInput { field, .. } => assert_eq!(field, "holding_periods"),
        other => panic!("Expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_every_bad_field_is_reported() {
    let request = AnalysisRequest::new(
        RawInputs::new()
            .with(PROPERTY_PRICE, 0)
            .with(WEEKLY_RENT, "abc")
            .with(INTEREST_RATE, 6)
            .with(DOWN_PAYMENT_PERCENT, 140),
    );
    match analyze(&request, &CalculatorConfig::default()) {
        Err(PropertyReturnsError::Validation(e)) => {
            assert_eq!(e.issues.len(), 3);
            assert!(e.contains(PROPERTY_PRICE));
            assert!(e.contains(WEEKLY_RENT));
            assert!(e.contains(DOWN_PAYMENT_PERCENT));
        }
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

// ===========================================================================
// Market insight
// ===========================================================================

struct StaticInsight;

impl MarketInsightProvider for StaticInsight {
    fn insight(&self, address: &str) -> Option<MarketInsight> {
        Some(MarketInsight {
            summary: format!("{address}: tight rental market"),
            estimated_value_low: Some(dec!(700000)),
            estimated_value_high: Some(dec!(800000)),
            source: "static".into(),
        })
    }
}

#[test]
fn test_insight_does_not_change_numbers() {
    let request = AnalysisRequest::new(raw(750000, 650, 20, "6.5"));
    let out = analyze(&request, &CalculatorConfig::default()).unwrap();
    let mut with_insight = out.result.clone();
    attach_insight(&mut with_insight, &StaticInsight, "1 Chapel St");

    assert!(with_insight.insight.is_some());
    with_insight.insight = None;
    assert_eq!(with_insight, out.result);
}
