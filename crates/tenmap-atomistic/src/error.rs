//! Error types for model output validation

use tenmap_core::{DType, TensorMapError};
use thiserror::Error;

/// Violations of the model output contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutputError {
    #[error("the model produced an output named '{0}', which was not requested")]
    UnrequestedOutput(String),

    #[error("the model did not produce the '{0}' output, which was requested")]
    MissingOutput(String),

    #[error("wrong dtype for the {name} output: the model promised {expected}, we got {actual}")]
    DtypeMismatch {
        name: String,
        expected: DType,
        actual: DType,
    },

    #[error("invalid keys for '{name}' output: expected `Labels('_', [[0]])`")]
    InvalidKeys { name: String },

    #[error("invalid samples for '{name}' output: {reason}")]
    InvalidSamples { name: String, reason: String },

    #[error("invalid components for '{name}' output: {reason}")]
    InvalidComponents { name: String, reason: String },

    #[error("invalid properties for '{name}' output: expected {expected}")]
    InvalidProperties { name: String, expected: String },

    #[error("invalid gradient for '{name}' output: {parameter}")]
    InvalidGradient { name: String, parameter: String },

    #[error("metadata error while checking outputs: {0}")]
    Metadata(#[from] TensorMapError),
}

/// Result type for output validation
pub type Result<T> = std::result::Result<T, OutputError>;

impl OutputError {
    pub(crate) fn samples(name: &str, reason: impl Into<String>) -> Self {
        OutputError::InvalidSamples {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn components(name: &str, reason: impl Into<String>) -> Self {
        OutputError::InvalidComponents {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
