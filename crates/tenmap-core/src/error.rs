//! Error types for labels, blocks and tensor maps
//!
//! All metadata operations in tenmap-core report failures through a single
//! [`TensorMapError`] enum. Every variant carries enough context (offending
//! name, axis, expected vs. actual value) to produce a useful message on its
//! own, since these errors describe contract violations in the caller's data
//! rather than transient conditions.
//!
//! # Examples
//!
//! ```
//! use tenmap_core::{Labels, TensorMapError};
//!
//! let err = Labels::new(&["a", "a"], vec![vec![0, 1]]).unwrap_err();
//! assert!(matches!(err, TensorMapError::InvalidLabels(_)));
//! ```

use thiserror::Error;

/// Top-level error type for all metadata operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorMapError {
    /// Duplicated names, duplicated entries, or entries with the wrong arity
    #[error("invalid labels: {0}")]
    InvalidLabels(String),

    /// A column name that does not exist in the labels
    #[error("unknown column '{name}', available columns are [{available}]")]
    UnknownColumn { name: String, available: String },

    /// Value array shape does not match the metadata
    #[error("shape mismatch along {axis}: the array has {actual} entries but {expected} were expected")]
    ShapeMismatch {
        axis: String,
        expected: usize,
        actual: usize,
    },

    #[error("no gradient with respect to '{0}' in this block")]
    NoSuchGradient(String),

    /// Invalid gradient metadata when attaching a gradient to a block
    #[error("invalid gradient with respect to '{parameter}': {reason}")]
    GradientMetadata { parameter: String, reason: String },

    /// A full key did not match any block
    #[error("no block matches the key ({0})")]
    NoMatchingBlock(String),

    /// A partial key matched zero or several blocks
    #[error("{count} blocks matched the selection ({selection}), expected exactly one")]
    AmbiguousOrNoMatch { selection: String, count: usize },

    #[error("index {index} is out of range for {len} {what}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        what: &'static str,
    },

    #[error("length mismatch: {expected} {what} expected, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Blocks inside a single tensor map disagree on their metadata names
    #[error("inconsistent blocks: {0}")]
    InconsistentBlocks(String),

    /// Two tensors were expected to share metadata and do not
    #[error("metadata mismatch: {0}")]
    MetadataMismatch(String),

    /// Argument validation failure in metadata operations
    #[error("validation error: {0}")]
    Validation(String),
}

/// Result type alias for metadata operations
pub type Result<T> = std::result::Result<T, TensorMapError>;

impl TensorMapError {
    pub(crate) fn invalid_labels(msg: impl Into<String>) -> Self {
        TensorMapError::InvalidLabels(msg.into())
    }

    pub(crate) fn unknown_column(name: &str, available: &[String]) -> Self {
        TensorMapError::UnknownColumn {
            name: name.to_string(),
            available: available.join(", "),
        }
    }

    pub(crate) fn shape_mismatch(axis: impl Into<String>, expected: usize, actual: usize) -> Self {
        TensorMapError::ShapeMismatch {
            axis: axis.into(),
            expected,
            actual,
        }
    }

    pub(crate) fn gradient(parameter: &str, reason: impl Into<String>) -> Self {
        TensorMapError::GradientMetadata {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        TensorMapError::Validation(msg.into())
    }
}
