//! # tenmap-io
//!
//! Binary serialization of tensor maps backed by [`DenseArray`].
//!
//! Archives start with a small fixed header (magic bytes, format version and
//! element dtype) followed by a bincode encoding of the keys, blocks and
//! gradients. Loading rebuilds the tensor map through the regular
//! constructors, so a corrupted archive can not produce an inconsistent
//! tensor map.
//!
//! ## Quick Start
//!
//! ```
//! use tenmap_core::{DenseArray, Labels, TensorBlock, TensorMap};
//! use tenmap_io::{load_buffer, save_buffer};
//!
//! let block = TensorBlock::new(
//!     DenseArray::<f64>::zeros(&[2, 1]),
//!     Labels::range("system", 2).unwrap(),
//!     Vec::<Labels>::new(),
//!     Labels::range("energy", 1).unwrap(),
//! ).unwrap();
//! let tensor = TensorMap::new(Labels::single(), vec![block]).unwrap();
//!
//! let buffer = save_buffer(&tensor).unwrap();
//! let loaded = load_buffer::<f64>(&buffer).unwrap();
//! assert_eq!(loaded, tensor);
//! ```
//!
//! [`DenseArray`]: tenmap_core::DenseArray

pub mod codec;
pub mod config;
pub mod error;
mod record;

pub use codec::{
    load, load_buffer, load_buffer_with_config, load_with_config, save, save_buffer,
    save_buffer_with_config, save_with_config, ArchiveElement, MAGIC, VERSION,
};
pub use config::{IoConfig, DEFAULT_MAX_PAYLOAD_BYTES};
pub use error::{IoError, Result};
