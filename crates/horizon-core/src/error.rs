//! Error types shared by the console crates

use thiserror::Error;

/// Shape validation failure at the data-ingestion boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was absent from an external record
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A status string did not match any known variant
    #[error("Unknown {kind} value: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    /// Record failed validation with a fixed, user-facing message
    #[error("{0}")]
    Invalid(String),
}

impl ValidationError {
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownVariant {
            kind,
            value: value.into(),
        }
    }
}

/// Errors raised when editing the parameter catalogue
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("Unknown parameter section: {0}")]
    UnknownSection(String),

    #[error("Unknown parameter: {section}.{param}")]
    UnknownParameter { section: String, param: String },

    #[error("Parameter {param} expects a {expected} value")]
    TypeMismatch {
        param: String,
        expected: &'static str,
    },

    #[error("Parameter {param} out of range: {value} not in [{min}, {max}]")]
    OutOfRange {
        param: String,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Parameter {param} does not accept option {value}")]
    InvalidOption { param: String, value: String },
}
