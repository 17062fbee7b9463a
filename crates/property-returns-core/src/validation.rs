//! Boundary validation of raw caller input.
//!
//! Callers (CLI flags, JSON files, a web form) hand over a loose mapping of
//! field names to JSON values. [`validate_inputs`] turns that into an
//! [`InvestmentInputs`] or a [`ValidationError`] listing every rejected field.
//! Nothing downstream re-validates.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{CalculatorConfig, MAX_LOAN_TERM_YEARS};
use crate::error::{FieldIssue, ValidationError};
use crate::inputs::{InvestmentInputs, OperatingExpenseInputs, Rent, RentPeriod};

// ---------------------------------------------------------------------------
// Field names
// ---------------------------------------------------------------------------

pub const PROPERTY_PRICE: &str = "property_price";
pub const WEEKLY_RENT: &str = "weekly_rent";
pub const MONTHLY_RENT: &str = "monthly_rent";
pub const ANNUAL_RENT: &str = "annual_rent";
pub const DOWN_PAYMENT_PERCENT: &str = "down_payment_percent";
pub const INTEREST_RATE: &str = "interest_rate";
pub const LOAN_TERM_YEARS: &str = "loan_term_years";
pub const AGENT_COMMISSION_PERCENT: &str = "agent_commission_percent";
pub const OTHER_UPFRONT_COSTS: &str = "other_upfront_costs";
pub const PROPERTY_MANAGEMENT_PERCENT: &str = "property_management_percent";
pub const MAINTENANCE_ANNUAL: &str = "maintenance_annual";
pub const INSURANCE_AND_RATES_ANNUAL: &str = "insurance_and_rates_annual";
pub const VACANCY_ALLOWANCE_PERCENT: &str = "vacancy_allowance_percent";
pub const OTHER_ANNUAL_EXPENSES: &str = "other_annual_expenses";
pub const ANNUAL_GROWTH_RATE_PERCENT: &str = "annual_growth_rate_percent";
pub const PROJECTION_YEARS: &str = "projection_years";
pub const CURRENT_MARKET_VALUE: &str = "current_market_value";
pub const RENT_GROWTH_RATE_PERCENT: &str = "rent_growth_rate_percent";

/// Pseudo-field used when the rent unit itself is wrong (none or several).
pub const RENT: &str = "rent";

const KNOWN_FIELDS: [&str; 18] = [
    PROPERTY_PRICE,
    WEEKLY_RENT,
    MONTHLY_RENT,
    ANNUAL_RENT,
    DOWN_PAYMENT_PERCENT,
    INTEREST_RATE,
    LOAN_TERM_YEARS,
    AGENT_COMMISSION_PERCENT,
    OTHER_UPFRONT_COSTS,
    PROPERTY_MANAGEMENT_PERCENT,
    MAINTENANCE_ANNUAL,
    INSURANCE_AND_RATES_ANNUAL,
    VACANCY_ALLOWANCE_PERCENT,
    OTHER_ANNUAL_EXPENSES,
    ANNUAL_GROWTH_RATE_PERCENT,
    PROJECTION_YEARS,
    CURRENT_MARKET_VALUE,
    RENT_GROWTH_RATE_PERCENT,
];

// Ceilings keep every downstream product inside Decimal's 96-bit mantissa.
pub const MAX_PRICE: Decimal = dec!(1_000_000_000_000);
const MAX_RENT: Decimal = dec!(10_000_000_000);
pub const MAX_COST: Decimal = dec!(1_000_000_000_000);

// ---------------------------------------------------------------------------
// Raw input
// ---------------------------------------------------------------------------

/// Unvalidated caller input: field name to raw JSON value.
///
/// Values may be numbers or numeric strings. `null` and empty strings count
/// as missing. `labels` optionally maps a field to the name the caller shows
/// its user, so errors read "Weekly rent" rather than `weekly_rent`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    pub fn with_label(mut self, field: &str, label: &str) -> Self {
        self.labels.insert(field.to_string(), label.to_string());
        self
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// Decimals are stored as strings so no precision is lost on the way in.
    pub fn set_decimal(&mut self, field: &str, value: Decimal) {
        self.set(field, value.to_string());
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !is_blank(v))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Lower {
    AtLeast(Decimal),
    Above(Decimal),
}

#[derive(Debug, Clone, Copy)]
struct FieldRule {
    name: &'static str,
    label: &'static str,
    lower: Lower,
    upper: Decimal,
}

const fn amount(name: &'static str, label: &'static str, upper: Decimal) -> FieldRule {
    FieldRule {
        name,
        label,
        lower: Lower::AtLeast(Decimal::ZERO),
        upper,
    }
}

const fn positive(name: &'static str, label: &'static str, upper: Decimal) -> FieldRule {
    FieldRule {
        name,
        label,
        lower: Lower::Above(Decimal::ZERO),
        upper,
    }
}

const fn percent(name: &'static str, label: &'static str) -> FieldRule {
    amount(name, label, Decimal::ONE_HUNDRED)
}

const PRICE_RULE: FieldRule = positive(PROPERTY_PRICE, "Property price", MAX_PRICE);
const WEEKLY_RENT_RULE: FieldRule = positive(WEEKLY_RENT, "Weekly rent", MAX_RENT);
const MONTHLY_RENT_RULE: FieldRule = positive(MONTHLY_RENT, "Monthly rent", MAX_RENT);
const ANNUAL_RENT_RULE: FieldRule = positive(ANNUAL_RENT, "Annual rent", MAX_RENT);
const DOWN_PAYMENT_RULE: FieldRule = percent(DOWN_PAYMENT_PERCENT, "Down payment (%)");
const INTEREST_RULE: FieldRule = percent(INTEREST_RATE, "Interest rate (%)");
const COMMISSION_RULE: FieldRule = percent(AGENT_COMMISSION_PERCENT, "Agent commission (%)");
const OTHER_UPFRONT_RULE: FieldRule = amount(OTHER_UPFRONT_COSTS, "Other upfront costs", MAX_COST);
const MANAGEMENT_RULE: FieldRule = percent(PROPERTY_MANAGEMENT_PERCENT, "Property management (%)");
const MAINTENANCE_RULE: FieldRule = amount(MAINTENANCE_ANNUAL, "Maintenance & repairs", MAX_COST);
const INSURANCE_RULE: FieldRule =
    amount(INSURANCE_AND_RATES_ANNUAL, "Insurance & rates", MAX_COST);
const VACANCY_RULE: FieldRule = percent(VACANCY_ALLOWANCE_PERCENT, "Vacancy allowance (%)");
const OTHER_EXPENSES_RULE: FieldRule = amount(OTHER_ANNUAL_EXPENSES, "Other expenses", MAX_COST);
const GROWTH_RULE: FieldRule = percent(ANNUAL_GROWTH_RATE_PERCENT, "Annual growth rate (%)");
const MARKET_VALUE_RULE: FieldRule =
    positive(CURRENT_MARKET_VALUE, "Current market value", MAX_PRICE);
const RENT_GROWTH_RULE: FieldRule = percent(RENT_GROWTH_RATE_PERCENT, "Rent growth rate (%)");

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate raw input against the field rules and the config's defaults and
/// policy. Every offending field is reported; values are never clamped.
pub fn validate_inputs(
    raw: &RawInputs,
    config: &CalculatorConfig,
) -> Result<InvestmentInputs, ValidationError> {
    let mut v = Validator {
        raw,
        issues: Vec::new(),
    };

    let property_price = v.required(&PRICE_RULE);
    let rent = v.rent();
    let annual_interest_rate_percent = v.required(&INTEREST_RULE);
    let down_payment_percent = v.optional(&DOWN_PAYMENT_RULE, config.default_down_payment_percent);
    let loan_term_years = v.years(
        LOAN_TERM_YEARS,
        "Loan term (years)",
        config.default_loan_term_years,
        MAX_LOAN_TERM_YEARS,
    );
    let agent_commission_percent =
        v.optional(&COMMISSION_RULE, config.default_agent_commission_percent);
    let other_upfront_costs = v.optional(&OTHER_UPFRONT_RULE, config.default_other_upfront_costs);
    let property_management_percent =
        v.optional(&MANAGEMENT_RULE, config.default_property_management_percent);
    let maintenance_annual = v.optional(&MAINTENANCE_RULE, Decimal::ZERO);
    let insurance_and_rates_annual = v.optional(&INSURANCE_RULE, Decimal::ZERO);
    let vacancy_allowance_percent =
        v.optional(&VACANCY_RULE, config.default_vacancy_allowance_percent);
    let other_annual_expenses = v.optional(&OTHER_EXPENSES_RULE, Decimal::ZERO);
    let annual_growth_rate_percent =
        v.optional(&GROWTH_RULE, config.default_annual_growth_rate_percent);
    let projection_years = v.years(
        PROJECTION_YEARS,
        "Projection years",
        config.default_projection_years,
        config.max_projection_years,
    );
    let current_market_value = v.maybe(&MARKET_VALUE_RULE);
    let rent_growth_rate_percent = v.maybe(&RENT_GROWTH_RULE);

    if !config.allow_zero_down_payment && down_payment_percent == Some(Decimal::ZERO) {
        v.reject(
            DOWN_PAYMENT_PERCENT,
            DOWN_PAYMENT_RULE.label,
            "a deposit is required (100% financing is not permitted)".into(),
        );
    }

    for field in raw.fields.keys() {
        if !KNOWN_FIELDS.contains(&field.as_str()) {
            log::warn!("ignoring unknown input field '{field}'");
        }
    }

    if !v.issues.is_empty() {
        log::debug!("rejected {} input field(s)", v.issues.len());
        return Err(ValidationError { issues: v.issues });
    }

    // No issues means every value above resolved to Some.
    Ok(InvestmentInputs {
        property_price: property_price.unwrap_or_default(),
        rent: rent.unwrap_or(Rent::annual_amount(Decimal::ZERO)),
        down_payment_percent: down_payment_percent.unwrap_or_default(),
        annual_interest_rate_percent: annual_interest_rate_percent.unwrap_or_default(),
        loan_term_years: loan_term_years.unwrap_or_default(),
        agent_commission_percent: agent_commission_percent.unwrap_or_default(),
        other_upfront_costs: other_upfront_costs.unwrap_or_default(),
        expenses: OperatingExpenseInputs {
            property_management_percent: property_management_percent.unwrap_or_default(),
            maintenance_annual: maintenance_annual.unwrap_or_default(),
            insurance_and_rates_annual: insurance_and_rates_annual.unwrap_or_default(),
            vacancy_allowance_percent: vacancy_allowance_percent.unwrap_or_default(),
            other_annual_expenses: other_annual_expenses.unwrap_or_default(),
        },
        annual_growth_rate_percent: annual_growth_rate_percent.unwrap_or_default(),
        projection_years: projection_years.unwrap_or_default(),
        current_market_value: current_market_value.flatten(),
        rent_growth_rate_percent: rent_growth_rate_percent.flatten(),
    })
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

struct Validator<'a> {
    raw: &'a RawInputs,
    issues: Vec<FieldIssue>,
}

impl Validator<'_> {
    fn label(&self, field: &str, default: &str) -> String {
        self.raw
            .labels
            .get(field)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn reject(&mut self, field: &str, default_label: &str, reason: String) {
        let label = self.label(field, default_label);
        log::debug!("field '{field}' rejected: {reason}");
        self.issues.push(FieldIssue {
            field: field.to_string(),
            label,
            reason,
        });
    }

    /// Parse and bound-check a present value. `None` means it was rejected.
    fn checked(&mut self, rule: &FieldRule, value: &Value) -> Option<Decimal> {
        let parsed = match parse_number(value) {
            Ok(d) => d,
            Err(reason) => {
                self.reject(rule.name, rule.label, reason);
                return None;
            }
        };

        let below = match rule.lower {
            Lower::AtLeast(min) if parsed < min => Some(format!("must be at least {min}")),
            Lower::Above(min) if parsed <= min => Some(format!("must be greater than {min}")),
            _ => None,
        };
        if let Some(reason) = below {
            self.reject(rule.name, rule.label, reason);
            return None;
        }

        if parsed > rule.upper {
            self.reject(rule.name, rule.label, format!("must be at most {}", rule.upper));
            return None;
        }

        Some(parsed)
    }

    fn required(&mut self, rule: &FieldRule) -> Option<Decimal> {
        match self.raw.get(rule.name) {
            Some(value) => self.checked(rule, value),
            None => {
                self.reject(rule.name, rule.label, "is required".into());
                None
            }
        }
    }

    fn optional(&mut self, rule: &FieldRule, default: Decimal) -> Option<Decimal> {
        match self.raw.get(rule.name) {
            Some(value) => self.checked(rule, value),
            None => Some(default),
        }
    }

    /// Outer `None`: rejected. Inner `None`: not supplied.
    fn maybe(&mut self, rule: &FieldRule) -> Option<Option<Decimal>> {
        match self.raw.get(rule.name) {
            Some(value) => self.checked(rule, value).map(Some),
            None => Some(None),
        }
    }

    fn years(&mut self, field: &'static str, label: &'static str, default: u32, max: u32) -> Option<u32> {
        let value = match self.raw.get(field) {
            Some(value) => value,
            None => return Some(default),
        };
        let rule = FieldRule {
            name: field,
            label,
            lower: Lower::AtLeast(Decimal::ONE),
            upper: Decimal::from(max),
        };
        let years = self.checked(&rule, value)?;
        if !years.fract().is_zero() {
            self.reject(field, label, "must be a whole number of years".into());
            return None;
        }
        years.to_u32()
    }

    fn rent(&mut self) -> Option<Rent> {
        let supplied: Vec<(&FieldRule, RentPeriod, &Value)> = [
            (&WEEKLY_RENT_RULE, RentPeriod::Weekly),
            (&MONTHLY_RENT_RULE, RentPeriod::Monthly),
            (&ANNUAL_RENT_RULE, RentPeriod::Annual),
        ]
        .into_iter()
        .filter_map(|(rule, period)| self.raw.get(rule.name).map(|v| (rule, period, v)))
        .collect();

        match supplied.as_slice() {
            [] => {
                self.reject(
                    RENT,
                    "Rent",
                    "one of weekly_rent, monthly_rent or annual_rent is required".into(),
                );
                None
            }
            [(rule, period, value)] => {
                let amount = self.checked(rule, value)?;
                Some(Rent {
                    period: *period,
                    amount,
                })
            }
            many => {
                let names: Vec<&str> = many.iter().map(|(r, _, _)| r.name).collect();
                self.reject(
                    RENT,
                    "Rent",
                    format!("give rent in exactly one unit, got {}", names.join(", ")),
                );
                None
            }
        }
    }
}

/// Accept JSON numbers and numeric strings; reject NaN, infinities and text.
fn parse_number(value: &Value) -> Result<Decimal, String> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Decimal::from(i));
            }
            if let Some(u) = n.as_u64() {
                return Ok(Decimal::from(u));
            }
            parse_text(&n.to_string())
        }
        Value::String(s) => parse_text(s),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => {
            Err("must be a number".to_string())
        }
        Value::Null => Err("is required".to_string()),
    }
}

fn parse_text(text: &str) -> Result<Decimal, String> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let lowered = cleaned.to_ascii_lowercase();
    let bare = lowered.trim_start_matches(['+', '-']);
    if bare == "nan" || bare == "inf" || bare == "infinity" {
        return Err(format!("must be a finite number, got '{}'", text.trim()));
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| format!("must be a number, got '{}'", text.trim()))
}
