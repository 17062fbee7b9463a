//! Calculator configuration.
//!
//! Defaults for optional inputs and validation policy travel with each call
//! in a [`CalculatorConfig`] instead of living in process-wide state, so two
//! callers with different house rules can share the engine.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PropertyReturnsError;
use crate::types::Percent;
use crate::validation::MAX_COST;
use crate::PropertyReturnsResult;

/// Holding periods (years) assessed when none are configured.
pub const DEFAULT_HOLDING_PERIODS: [u32; 6] = [3, 5, 7, 10, 15, 20];

/// Upper bound on projection length accepted by default.
pub const DEFAULT_MAX_PROJECTION_YEARS: u32 = 50;

/// Longest loan term the engine accepts, in years.
pub const MAX_LOAN_TERM_YEARS: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub default_down_payment_percent: Percent,
    pub default_loan_term_years: u32,
    pub default_agent_commission_percent: Percent,
    pub default_other_upfront_costs: Decimal,
    pub default_property_management_percent: Percent,
    pub default_vacancy_allowance_percent: Percent,
    pub default_annual_growth_rate_percent: Percent,
    pub default_projection_years: u32,
    /// Whether a 0% deposit (full financing) passes validation
    pub allow_zero_down_payment: bool,
    pub max_projection_years: u32,
    /// Holding periods (years) compared by the assessment
    pub holding_periods: Vec<u32>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            default_down_payment_percent: dec!(20),
            default_loan_term_years: 30,
            default_agent_commission_percent: dec!(5.0),
            default_other_upfront_costs: Decimal::ZERO,
            default_property_management_percent: dec!(8.0),
            default_vacancy_allowance_percent: dec!(2.0),
            default_annual_growth_rate_percent: dec!(5.5),
            default_projection_years: 10,
            allow_zero_down_payment: true,
            max_projection_years: DEFAULT_MAX_PROJECTION_YEARS,
            holding_periods: DEFAULT_HOLDING_PERIODS.to_vec(),
        }
    }
}

impl CalculatorConfig {
    /// Reject configurations whose defaults could never pass validation.
    pub fn validate(&self) -> PropertyReturnsResult<()> {
        let percent_defaults = [
            ("default_down_payment_percent", self.default_down_payment_percent),
            ("default_agent_commission_percent", self.default_agent_commission_percent),
            ("default_property_management_percent", self.default_property_management_percent),
            ("default_vacancy_allowance_percent", self.default_vacancy_allowance_percent),
            ("default_annual_growth_rate_percent", self.default_annual_growth_rate_percent),
        ];
        for (field, value) in percent_defaults {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(invalid(field, "must be between 0 and 100"));
            }
        }

        if self.default_other_upfront_costs < Decimal::ZERO
            || self.default_other_upfront_costs > MAX_COST
        {
            return Err(invalid(
                "default_other_upfront_costs",
                &format!("must be between 0 and {MAX_COST}"),
            ));
        }

        if self.default_loan_term_years == 0 || self.default_loan_term_years > MAX_LOAN_TERM_YEARS {
            return Err(invalid(
                "default_loan_term_years",
                &format!("must be between 1 and {MAX_LOAN_TERM_YEARS}"),
            ));
        }

        if self.max_projection_years == 0 || self.max_projection_years > DEFAULT_MAX_PROJECTION_YEARS {
            return Err(invalid(
                "max_projection_years",
                &format!("must be between 1 and {DEFAULT_MAX_PROJECTION_YEARS}"),
            ));
        }

        if self.default_projection_years == 0
            || self.default_projection_years > self.max_projection_years
        {
            return Err(invalid(
                "default_projection_years",
                "must be at least 1 and no more than max_projection_years",
            ));
        }

        if !self.allow_zero_down_payment && self.default_down_payment_percent.is_zero() {
            return Err(invalid(
                "default_down_payment_percent",
                "zero deposit is disabled by allow_zero_down_payment",
            ));
        }

        if self.holding_periods.is_empty() {
            return Err(invalid("holding_periods", "at least one holding period is required"));
        }
        if let Some(p) = self
            .holding_periods
            .iter()
            .find(|&&p| p == 0 || p > self.max_projection_years)
        {
            return Err(invalid(
                "holding_periods",
                &format!("holding period {p} must be between 1 and max_projection_years"),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> PropertyReturnsError {
    PropertyReturnsError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CalculatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: CalculatorConfig =
            serde_json::from_str(r#"{"default_loan_term_years": 25}"#).unwrap();
        assert_eq!(cfg.default_loan_term_years, 25);
        assert_eq!(cfg.default_down_payment_percent, dec!(20));
        assert_eq!(cfg.holding_periods, vec![3, 5, 7, 10, 15, 20]);
    }

    #[test]
    fn test_rejects_out_of_range_default() {
        let cfg = CalculatorConfig {
            default_down_payment_percent: dec!(120),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("default_down_payment_percent"));
    }

    #[test]
    fn test_rejects_oversized_upfront_costs() {
        let cfg = CalculatorConfig {
            default_other_upfront_costs: dec!(70000000000000000000000000000),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("default_other_upfront_costs"));

        let at_ceiling = CalculatorConfig {
            default_other_upfront_costs: MAX_COST,
            ..Default::default()
        };
        assert!(at_ceiling.validate().is_ok());
    }

    #[test]
    fn test_rejects_holding_period_beyond_horizon() {
        let cfg = CalculatorConfig {
            holding_periods: vec![5, 80],
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
