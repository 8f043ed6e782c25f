//! Operations over blocks and tensor maps
//!
//! Every operation returns new blocks or tensors; inputs are never modified.
//!
//! - [`unique_metadata`] / [`unique_metadata_block`]: sorted unique metadata
//!   along samples or properties
//! - [`split`] / [`split_block`]: split along samples or properties according
//!   to groups of labels
//! - [`equal_metadata`] / [`equal_metadata_block`]: metadata comparison
//! - [`add`], [`subtract`], [`multiply`], [`add_scalar`], [`subtract_scalar`]
//! - [`zeros_like`] and [`random_uniform_like`]

use std::fmt;
use std::str::FromStr;

use crate::error::TensorMapError;

mod arithmetic;
mod equal;
mod like;
mod split;
mod unique;

pub use arithmetic::{add, add_scalar, multiply, subtract, subtract_scalar};
pub use equal::{equal_metadata, equal_metadata_block, MetadataCheck};
pub use like::{random_uniform_like, zeros_like};
pub use split::{split, split_block};
pub use unique::{unique_metadata, unique_metadata_block};

/// Metadata axis of a block that operations can act on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataAxis {
    Samples,
    Properties,
}

impl MetadataAxis {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataAxis::Samples => "samples",
            MetadataAxis::Properties => "properties",
        }
    }
}

impl fmt::Display for MetadataAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetadataAxis {
    type Err = TensorMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "samples" => Ok(MetadataAxis::Samples),
            "properties" => Ok(MetadataAxis::Properties),
            other => Err(TensorMapError::validation(format!(
                "axis must be either 'samples' or 'properties', got '{other}'"
            ))),
        }
    }
}
