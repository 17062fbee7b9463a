//! Full investment analysis: validate once, then compute every requested
//! section in a single pass.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::LoanSchedule;
use crate::assessment::{
    holding_period_analysis, investment_score, rent_coverage, HoldingPeriodAnalysis, RentCoverage,
};
use crate::cash_flow::{compute_cash_flow, CashFlowResult};
use crate::config::CalculatorConfig;
use crate::inputs::InvestmentInputs;
use crate::projection::{ProjectionSeries, ProjectionSummary, ProjectionYear};
use crate::providers::MarketInsight;
use crate::types::*;
use crate::validation::{validate_inputs, RawInputs};
use crate::yields::{compute_yields, CapRateBasis, YieldMetrics};
use crate::PropertyReturnsResult;

const HIGH_LTV_PERCENT: Decimal = dec!(80);
const LOW_GROSS_YIELD_PERCENT: Decimal = dec!(3);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Loan,
    Yields,
    CashFlow,
    Projection,
    Assessment,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Loan,
        Section::Yields,
        Section::CashFlow,
        Section::Projection,
        Section::Assessment,
    ];
}

/// Raw inputs plus the sections the caller wants back. An empty section
/// list means all of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub inputs: RawInputs,
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl AnalysisRequest {
    pub fn new(inputs: RawInputs) -> Self {
        Self {
            inputs,
            sections: Vec::new(),
        }
    }

    pub fn with_sections(mut self, sections: &[Section]) -> Self {
        self.sections = sections.to_vec();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub years: Vec<ProjectionYear>,
    pub summary: ProjectionSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    /// 0 to 10
    pub investment_score: Decimal,
    pub rent_coverage: RentCoverage,
    pub holding_periods: HoldingPeriodAnalysis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentAnalysis {
    /// Inputs after defaults were applied
    pub inputs: InvestmentInputs,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub loan: Option<LoanSchedule>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub yields: Option<YieldMetrics>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cash_flow: Option<CashFlowResult>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub projection: Option<ProjectionReport>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub assessment: Option<Assessment>,
    /// Market commentary, attached after the numbers are final
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub insight: Option<MarketInsight>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate the raw request and run the analysis.
///
/// Validation failures come back as a single error listing every offending
/// field. Past validation nothing fails except through `None` sentinels.
pub fn analyze(
    request: &AnalysisRequest,
    config: &CalculatorConfig,
) -> PropertyReturnsResult<ComputationOutput<InvestmentAnalysis>> {
    config.validate()?;
    let inputs = validate_inputs(&request.inputs, config)?;
    analyze_inputs(&inputs, &request.sections, config)
}

/// Run the analysis over inputs that have already been validated.
pub fn analyze_inputs(
    inputs: &InvestmentInputs,
    sections: &[Section],
    config: &CalculatorConfig,
) -> PropertyReturnsResult<ComputationOutput<InvestmentAnalysis>> {
    let start = Instant::now();
    let wants = |section: Section| sections.is_empty() || sections.contains(&section);

    let loan = LoanSchedule::for_inputs(inputs)?;
    let yields = compute_yields(inputs);
    let cash_flow = compute_cash_flow(inputs, &loan, &yields);
    let warnings = collect_warnings(inputs, &yields, &cash_flow);

    let projection = if wants(Section::Projection) {
        let series = ProjectionSeries::new(inputs, &loan);
        Some(ProjectionReport {
            years: series.snapshots(),
            summary: series.summary(),
        })
    } else {
        None
    };

    let assessment = if wants(Section::Assessment) {
        Some(Assessment {
            investment_score: investment_score(
                yields.gross_yield_percent,
                yields.net_yield_percent,
                cash_flow.cash_on_cash_return_percent,
                cash_flow.monthly_cash_flow,
            ),
            rent_coverage: rent_coverage(inputs.rent.monthly_equivalent(), loan.monthly_payment),
            holding_periods: holding_period_analysis(inputs, &loan, &config.holding_periods)?,
        })
    } else {
        None
    };

    let analysis = InvestmentAnalysis {
        inputs: inputs.clone(),
        loan: wants(Section::Loan).then_some(loan),
        yields: wants(Section::Yields).then_some(yields),
        cash_flow: wants(Section::CashFlow).then_some(cash_flow),
        projection,
        assessment,
        insight: None,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    log::debug!("analysis completed in {elapsed}us with {} warning(s)", warnings.len());

    Ok(with_metadata(
        "Fixed-rate amortisation, yield, cash-flow and compound-growth projection",
        inputs,
        warnings,
        elapsed,
        analysis,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Outcomes worth flagging to the investor. None of these are errors.
fn collect_warnings(
    inputs: &InvestmentInputs,
    yields: &YieldMetrics,
    cash_flow: &CashFlowResult,
) -> Vec<String> {
    let mut warnings = Vec::new();

    if cash_flow.monthly_cash_flow < Decimal::ZERO {
        warnings.push(format!(
            "Negative cash flow: the property needs {} per month on top of rent",
            cash_flow.monthly_shortfall.round_dp(2)
        ));
        if cash_flow.break_even_months.is_none() {
            warnings.push("Cash flow does not turn positive under these assumptions".into());
        }
    }

    let ltv = Decimal::ONE_HUNDRED - inputs.down_payment_percent;
    if ltv > HIGH_LTV_PERCENT {
        warnings.push(format!(
            "Loan-to-value ratio of {}% exceeds {HIGH_LTV_PERCENT}%",
            ltv.normalize()
        ));
    }

    if yields.gross_yield_percent < LOW_GROSS_YIELD_PERCENT {
        warnings.push(format!(
            "Gross yield of {}% is below {LOW_GROSS_YIELD_PERCENT}%",
            yields.gross_yield_percent.round_dp(2)
        ));
    }

    if yields.cap_rate_basis == CapRateBasis::MarketValue {
        warnings.push("Cap rate is measured against current market value, not purchase price".into());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PropertyReturnsError;
    use crate::validation::{INTEREST_RATE, PROPERTY_PRICE, WEEKLY_RENT};

    fn request() -> AnalysisRequest {
        AnalysisRequest::new(
            RawInputs::new()
                .with(PROPERTY_PRICE, 500000)
                .with(WEEKLY_RENT, 550)
                .with(INTEREST_RATE, 6),
        )
    }

    #[test]
    fn test_all_sections_by_default() {
        let out = analyze(&request(), &CalculatorConfig::default()).unwrap();
        let a = &out.result;
        assert!(a.loan.is_some());
        assert!(a.yields.is_some());
        assert!(a.cash_flow.is_some());
        assert!(a.projection.is_some());
        assert!(a.assessment.is_some());
        assert!(a.insight.is_none());
        assert_eq!(a.inputs.down_payment_percent, dec!(20));
    }

    #[test]
    fn test_only_requested_sections() {
        let req = request().with_sections(&[Section::Yields]);
        let out = analyze(&req, &CalculatorConfig::default()).unwrap();
        assert!(out.result.yields.is_some());
        assert!(out.result.loan.is_none());
        assert!(out.result.projection.is_none());
    }

    #[test]
    fn test_validation_error_is_surfaced() {
        let req = AnalysisRequest::new(RawInputs::new().with(PROPERTY_PRICE, -1));
        match analyze(&req, &CalculatorConfig::default()) {
            Err(PropertyReturnsError::Validation(e)) => {
                assert!(e.contains(PROPERTY_PRICE));
                assert!(e.contains(INTEREST_RATE));
            }
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_cash_flow_is_warned() {
        let out = analyze(&request(), &CalculatorConfig::default()).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("Negative cash flow")));
    }

    #[test]
    fn test_high_ltv_is_warned() {
        let mut req = request();
        req.inputs.set("down_payment_percent", 10);
        let out = analyze(&req, &CalculatorConfig::default()).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Loan-to-value ratio of 90%")));
    }

    #[test]
    fn test_section_names_are_snake_case() {
        let json = serde_json::to_string(&Section::CashFlow).unwrap();
        assert_eq!(json, "\"cash_flow\"");
    }
}
