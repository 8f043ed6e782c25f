//! # tenmap-core
//!
//! Labeled, block-sparse tensor containers for atomistic machine learning.
//!
//! This crate provides the data model of the TenMap stack:
//!
//! - **Labels** ([`Labels`]): named integer tuples describing one axis of a block
//! - **Blocks** ([`TensorBlock`]): one value array with samples, components and
//!   properties metadata, plus gradient blocks
//! - **Tensor maps** ([`TensorMap`]): keys mapping to blocks that share their
//!   metadata names
//! - **Operations** ([`ops`]): unique metadata extraction, split, metadata
//!   comparison, arithmetic and `*_like` constructors
//!
//! ## Array Backends
//!
//! Blocks are generic over the [`Array`] capability trait, so the metadata layer
//! never depends on a concrete array library. [`DenseArray`] implements it on
//! top of `scirs2-core`'s ndarray for `f32` and `f64` elements.
//!
//! ## Quick Start
//!
//! ```
//! use tenmap_core::ops::{unique_metadata, MetadataAxis};
//! use tenmap_core::{DenseArray, Labels, TensorBlock, TensorMap};
//!
//! let block = TensorBlock::new(
//!     DenseArray::<f64>::zeros(&[3, 2]),
//!     Labels::new(&["system", "atom"], vec![vec![0, 0], vec![0, 1], vec![1, 0]]).unwrap(),
//!     Vec::<Labels>::new(),
//!     Labels::range("n", 2).unwrap(),
//! )
//! .unwrap();
//!
//! let tensor = TensorMap::new(Labels::single(), vec![block]).unwrap();
//! let systems = unique_metadata(&tensor, MetadataAxis::Samples, &["system"], None).unwrap();
//! assert_eq!(systems.len(), 2);
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`Result`], with a [`TensorMapError`]
//! describing which metadata invariant was violated.

pub mod array;
pub mod block;
pub mod error;
pub mod labels;
pub mod ops;
pub mod tensor;

#[cfg(test)]
mod property_tests;

pub use array::{Array, DType, DenseArray, Element};
pub use block::TensorBlock;
pub use error::{Result, TensorMapError};
pub use labels::{label_value, LabelRows, LabelValue, Labels};
pub use tensor::TensorMap;
