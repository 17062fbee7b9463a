pub mod error;
pub mod time_value;
pub mod types;

pub mod config;
pub mod inputs;
pub mod validation;

pub mod amortization;
pub mod cash_flow;
pub mod projection;
pub mod yields;

pub mod analysis;
pub mod assessment;
pub mod scenarios;

pub mod providers;

pub use analysis::{analyze, analyze_inputs, AnalysisRequest, InvestmentAnalysis, Section};
pub use config::CalculatorConfig;
pub use error::{FieldIssue, PropertyReturnsError, ValidationError};
pub use inputs::{InvestmentInputs, OperatingExpenseInputs, Rent, RentPeriod};
pub use types::*;
pub use validation::{validate_inputs, RawInputs};

/// Standard result type for all property-returns operations
pub type PropertyReturnsResult<T> = Result<T, PropertyReturnsError>;
