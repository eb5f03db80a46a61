//! Input rejections shared by the event and booking write paths.

use devevent_http::AppError;
use serde_json::json;
use thiserror::Error;

/// Why a submitted event or booking was rejected. Raised before anything is
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field \"{0}\" is required and must be non-empty")]
    MissingField(&'static str),

    #[error("invalid date '{0}'; expected a calendar date such as 2025-11-07")]
    InvalidDate(String),

    #[error("invalid time '{0}'; expected HH:MM (24h) or H:MM AM/PM")]
    InvalidTime(String),

    #[error("\"{0}\" must be a non-empty list of non-empty strings")]
    InvalidCollection(&'static str),

    #[error("email must be a valid email address")]
    InvalidEmail,
}

impl ValidationError {
    /// Machine-readable kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingField(_) => "missing_field",
            ValidationError::InvalidDate(_) => "invalid_date",
            ValidationError::InvalidTime(_) => "invalid_time",
            ValidationError::InvalidCollection(_) => "invalid_collection",
            ValidationError::InvalidEmail => "invalid_email",
        }
    }

    /// Name of the offending payload field.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingField(field) | ValidationError::InvalidCollection(field) => {
                field
            }
            ValidationError::InvalidDate(_) => "date",
            ValidationError::InvalidTime(_) => "time",
            ValidationError::InvalidEmail => "email",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        tracing::warn!(field = err.field(), kind = err.kind(), "payload rejected");
        AppError::validation(
            vec![json!({ "field": err.field(), "error": err.kind() })],
            err.to_string(),
        )
    }
}

/// Trimmed copy of `value`, or `MissingField(field)` when nothing is left.
pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
