//! Error types for Nutriplan

use thiserror::Error;

/// Errors that can occur while planning
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid intake form: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store error: {0}")]
    Store(String),
}

impl PlanError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        PlanError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Field-level errors raised while validating an intake form
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field {field} is not a number: {value:?}")]
    NotANumber { field: String, value: String },

    #[error("Field {field} has an unrecognised value: {value:?}")]
    UnknownValue { field: String, value: String },

    #[error("Field {field} out of range: {value} (expected {min}-{max})")]
    OutOfRange {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },
}
