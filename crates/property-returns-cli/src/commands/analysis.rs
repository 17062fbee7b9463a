use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use property_returns_core::amortization::LoanSchedule;
use property_returns_core::assessment::holding_period_analysis;
use property_returns_core::validation::*;
use property_returns_core::{
    analyze, validate_inputs, with_metadata, AnalysisRequest, CalculatorConfig, RawInputs, Section,
};

use super::{read_value, CommandResult};

/// Investment fields accepted as flags. Any flag given overrides the same
/// field from `--input` or stdin.
#[derive(Args, Debug, Default)]
pub struct InputFlags {
    /// Purchase price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Rent per week (give exactly one rent unit)
    #[arg(long)]
    pub weekly_rent: Option<Decimal>,

    /// Rent per month
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Rent per year
    #[arg(long)]
    pub annual_rent: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Deposit as a percentage of price
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term: Option<u32>,

    /// Agent commission as a percentage of price
    #[arg(long)]
    pub agent_commission: Option<Decimal>,

    /// Other upfront costs (stamp duty, legal fees)
    #[arg(long)]
    pub other_costs: Option<Decimal>,

    /// Property management as a percentage of rent
    #[arg(long)]
    pub management: Option<Decimal>,

    /// Annual maintenance and repairs
    #[arg(long)]
    pub maintenance: Option<Decimal>,

    /// Annual insurance and council rates
    #[arg(long)]
    pub insurance: Option<Decimal>,

    /// Vacancy allowance as a percentage of rent
    #[arg(long)]
    pub vacancy: Option<Decimal>,

    /// Other annual expenses
    #[arg(long)]
    pub other_expenses: Option<Decimal>,

    /// Annual capital growth in percent
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Years to project
    #[arg(long)]
    pub projection_years: Option<u32>,

    /// Current market value, used as the cap-rate basis
    #[arg(long)]
    pub market_value: Option<Decimal>,

    /// Annual rent growth in percent (flat rent when omitted)
    #[arg(long)]
    pub rent_growth: Option<Decimal>,
}

impl InputFlags {
    fn apply(&self, raw: &mut RawInputs) {
        let decimals = [
            (PROPERTY_PRICE, self.price),
            (WEEKLY_RENT, self.weekly_rent),
            (MONTHLY_RENT, self.monthly_rent),
            (ANNUAL_RENT, self.annual_rent),
            (INTEREST_RATE, self.interest_rate),
            (DOWN_PAYMENT_PERCENT, self.down_payment),
            (AGENT_COMMISSION_PERCENT, self.agent_commission),
            (OTHER_UPFRONT_COSTS, self.other_costs),
            (PROPERTY_MANAGEMENT_PERCENT, self.management),
            (MAINTENANCE_ANNUAL, self.maintenance),
            (INSURANCE_AND_RATES_ANNUAL, self.insurance),
            (VACANCY_ALLOWANCE_PERCENT, self.vacancy),
            (OTHER_ANNUAL_EXPENSES, self.other_expenses),
            (ANNUAL_GROWTH_RATE_PERCENT, self.growth_rate),
            (CURRENT_MARKET_VALUE, self.market_value),
            (RENT_GROWTH_RATE_PERCENT, self.rent_growth),
        ];
        for (field, value) in decimals {
            if let Some(v) = value {
                raw.set_decimal(field, v);
            }
        }

        for (field, value) in [
            (LOAN_TERM_YEARS, self.loan_term),
            (PROJECTION_YEARS, self.projection_years),
        ] {
            if let Some(v) = value {
                raw.set(field, v);
            }
        }
    }
}

/// Arguments for a full investment analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file: either raw fields or {"inputs": {...}, "sections": [...]}
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub fields: InputFlags,

    /// Sections to include (loan, yields, cash_flow, projection, assessment)
    #[arg(long, value_delimiter = ',')]
    pub sections: Vec<String>,
}

/// Arguments for a single-section report
#[derive(Args)]
pub struct MetricsArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub fields: InputFlags,
}

/// Arguments for the holding-period comparison
#[derive(Args)]
pub struct HoldingPeriodsArgs {
    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub fields: InputFlags,

    /// Holding periods in years (comma-separated); defaults to the config's list
    #[arg(long, value_delimiter = ',')]
    pub periods: Vec<u32>,
}

pub fn run_analyze(args: AnalyzeArgs, config: &CalculatorConfig) -> CommandResult {
    let mut request = resolve_request(&args.input, &args.fields)?;
    if !args.sections.is_empty() {
        request.sections = parse_sections(&args.sections)?;
    }
    let result = analyze(&request, config)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_yields(args: MetricsArgs, config: &CalculatorConfig) -> CommandResult {
    run_section(args, Section::Yields, config)
}

pub fn run_cash_flow(args: MetricsArgs, config: &CalculatorConfig) -> CommandResult {
    run_section(args, Section::CashFlow, config)
}

pub fn run_projection(args: MetricsArgs, config: &CalculatorConfig) -> CommandResult {
    run_section(args, Section::Projection, config)
}

pub fn run_holding_periods(args: HoldingPeriodsArgs, config: &CalculatorConfig) -> CommandResult {
    let start = Instant::now();
    let request = resolve_request(&args.input, &args.fields)?;
    let inputs = validate_inputs(&request.inputs, config)?;
    let loan = LoanSchedule::for_inputs(&inputs)?;
    let periods = if args.periods.is_empty() {
        config.holding_periods.clone()
    } else {
        args.periods
    };
    let analysis = holding_period_analysis(&inputs, &loan, &periods)?;

    let mut warnings = Vec::new();
    if analysis.profit_break_even_years.is_none() {
        warnings.push("No assessed holding period returns a profit".to_string());
    }

    let output = with_metadata(
        "Sale at end of each holding period: capital gain plus cumulative cash flow",
        &inputs,
        warnings,
        start.elapsed().as_micros() as u64,
        analysis,
    );
    Ok(serde_json::to_value(output)?)
}

fn run_section(args: MetricsArgs, section: Section, config: &CalculatorConfig) -> CommandResult {
    let request = resolve_request(&args.input, &args.fields)?.with_sections(&[section]);
    let result = analyze(&request, config)?;
    Ok(serde_json::to_value(result)?)
}

/// File or stdin JSON (either a bare field map or a full request), with any
/// field flags laid over it.
fn resolve_request(
    input: &Option<String>,
    flags: &InputFlags,
) -> Result<AnalysisRequest, Box<dyn std::error::Error>> {
    let mut request = match read_value(input)? {
        Some(value) if value.get("inputs").is_some() => serde_json::from_value(value)?,
        Some(value) => AnalysisRequest::new(serde_json::from_value(value)?),
        None => AnalysisRequest::default(),
    };
    flags.apply(&mut request.inputs);

    if request.inputs.fields.is_empty() {
        return Err("provide --input <file.json>, piped JSON, or field flags such as --price".into());
    }
    Ok(request)
}

fn parse_sections(names: &[String]) -> Result<Vec<Section>, Box<dyn std::error::Error>> {
    names
        .iter()
        .map(|name| -> Result<Section, Box<dyn std::error::Error>> {
            let normalised = name.trim().replace('-', "_");
            let section: Section = serde_json::from_value(Value::String(normalised))
                .map_err(|_| format!("unknown section '{name}'"))?;
            Ok(section)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_flags_fill_raw_inputs() {
        let flags = InputFlags {
            price: Some(dec!(750000)),
            weekly_rent: Some(dec!(650)),
            loan_term: Some(25),
            ..InputFlags::default()
        };
        let mut raw = RawInputs::new();
        flags.apply(&mut raw);
        assert_eq!(raw.fields.len(), 3);
        assert_eq!(raw.fields[PROPERTY_PRICE], Value::String("750000".into()));
        assert_eq!(raw.fields[LOAN_TERM_YEARS], Value::from(25));
    }

    #[test]
    fn test_flags_override_file_values() {
        let mut raw = RawInputs::new().with(PROPERTY_PRICE, 500000);
        InputFlags {
            price: Some(dec!(650000)),
            ..InputFlags::default()
        }
        .apply(&mut raw);
        assert_eq!(raw.fields[PROPERTY_PRICE], Value::String("650000".into()));
    }

    #[test]
    fn test_parse_sections_accepts_hyphens() {
        let sections = parse_sections(&["cash-flow".into(), "loan".into()]).unwrap();
        assert_eq!(sections, vec![Section::CashFlow, Section::Loan]);
    }

    #[test]
    fn test_parse_sections_rejects_unknown() {
        let err = parse_sections(&["taxes".into()]).unwrap_err();
        assert_eq!(err.to_string(), "unknown section 'taxes'");
    }
}
