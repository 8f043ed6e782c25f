//! # tenmap-atomistic
//!
//! Atomistic model conventions on top of tenmap tensor maps: system
//! descriptors, requested-output schema, and validation of the outputs a
//! model produces.
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use tenmap_atomistic::{check_outputs, AtomicSystem, ModelOutput};
//! use tenmap_core::{DType, DenseArray, Labels, TensorBlock, TensorMap};
//!
//! let systems = vec![
//!     AtomicSystem::non_periodic(vec![1, 1], vec![[0.0; 3], [0.7, 0.0, 0.0]]).unwrap(),
//! ];
//!
//! let block = TensorBlock::new(
//!     DenseArray::<f64>::zeros(&[1, 1]),
//!     Labels::range("system", 1).unwrap(),
//!     Vec::<Labels>::new(),
//!     Labels::range("energy", 1).unwrap(),
//! ).unwrap();
//! let energy = TensorMap::new(Labels::single(), vec![block]).unwrap();
//!
//! let requested = BTreeMap::from([("energy".to_string(), ModelOutput::new())]);
//! let outputs = BTreeMap::from([("energy".to_string(), energy)]);
//!
//! check_outputs(&systems, &requested, None, &outputs, DType::F64).unwrap();
//! ```

pub mod check;
pub mod error;
pub mod output;
pub mod system;

pub use check::check_outputs;
pub use error::{OutputError, Result};
pub use output::{ModelOutput, OutputKind};
pub use system::{AtomicSystem, System};
