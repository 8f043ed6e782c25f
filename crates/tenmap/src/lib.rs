//! # TenMap - Labeled Block Tensors for Atomistic Machine Learning
//!
//! This is the **meta crate** that re-exports all TenMap components for
//! convenient access.
//!
//! ## Quick Start
//!
//! ```
//! use tenmap::prelude::*;
//!
//! let block = TensorBlock::new(
//!     DenseArray::<f64>::zeros(&[3, 1]),
//!     Labels::new(&["system", "atom"], vec![vec![0, 0], vec![0, 1], vec![1, 0]])?,
//!     Vec::<Labels>::new(),
//!     Labels::range("energy", 1)?,
//! )?;
//! let tensor = TensorMap::new(Labels::single(), vec![block])?;
//!
//! let systems = unique_metadata(&tensor, MetadataAxis::Samples, &["system"], None)?;
//! assert_eq!(systems.len(), 2);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Components
//!
//! ### Core data model ([`core`])
//!
//! Labels, blocks with gradients, tensor maps, and metadata operations
//! (unique metadata, split, arithmetic).
//!
//! ### Serialization ([`io`])
//!
//! ```
//! use tenmap::core::{DenseArray, Labels, TensorBlock, TensorMap};
//!
//! let block = TensorBlock::new(
//!     DenseArray::<f32>::zeros(&[0, 2]),
//!     Labels::empty(&["system"])?,
//!     Vec::<Labels>::new(),
//!     Labels::range("n", 2)?,
//! )?;
//! let tensor = TensorMap::new(Labels::single(), vec![block])?;
//!
//! let buffer = tenmap::io::save_buffer(&tensor)?;
//! assert_eq!(tenmap::io::load_buffer::<f32>(&buffer)?, tensor);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ### Atomistic outputs ([`atomistic`])
//!
//! System descriptors, requested outputs, and output contract validation.
//!
//! ### Learnable modules ([`learn`])
//!
//! `ModuleMap` and simple dense modules.
//!
//! ## Logging
//!
//! All crates emit [`tracing`](https://docs.rs/tracing) events. With the
//! `tracing` feature, [`tracing_support::init_tracing`] installs a subscriber
//! configured from the environment.

pub use tenmap_atomistic as atomistic;
pub use tenmap_core as core;
pub use tenmap_io as io;
pub use tenmap_learn as learn;

pub mod tracing_support;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! # Example
    //!
    //! ```
    //! use tenmap::prelude::*;
    //!
    //! let keys = Labels::range("key", 3).unwrap();
    //! assert_eq!(keys.len(), 3);
    //! ```

    // Core types
    pub use crate::core::{
        Array, DType, DenseArray, LabelRows, LabelValue, Labels, TensorBlock, TensorMap,
        TensorMapError,
    };

    // Operations
    pub use crate::core::ops::{
        add, equal_metadata, multiply, split, subtract, unique_metadata, unique_metadata_block,
        zeros_like, MetadataAxis, MetadataCheck,
    };

    // Serialization
    pub use crate::io::{load, load_buffer, save, save_buffer, IoConfig, IoError};

    // Atomistic outputs
    pub use crate::atomistic::{check_outputs, AtomicSystem, ModelOutput, OutputError, System};

    // Modules
    pub use crate::learn::{Linear, Module, ModuleMap};
}
