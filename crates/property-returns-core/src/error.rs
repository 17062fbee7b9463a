use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// Machine name of the field, e.g. `property_price`
    pub field: String,
    /// Human-readable name used when reporting back to the caller
    pub label: String,
    pub reason: String,
}

/// Every field that failed validation, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{} field(s) rejected: {}", .issues.len(), describe_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.issues.iter().any(|i| i.field == field)
    }
}

fn describe_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("{} ({})", i.label, i.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum PropertyReturnsError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid loan parameters: {reason}")]
    InvalidLoanParameters { reason: String },

    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PropertyReturnsError {
    fn from(e: serde_json::Error) -> Self {
        PropertyReturnsError::SerializationError(e.to_string())
    }
}
