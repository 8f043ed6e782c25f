//! # tenmap-learn
//!
//! Building blocks for learnable transformations of tensor maps.
//!
//! - [`Module`]: a transformation acting on the last axis of an array
//! - [`Linear`], [`Sigmoid`], [`Sequential`]: simple dense modules
//! - [`ModuleMap`]: one module per key, applied to block values and gradients
//!
//! ## Quick Start
//!
//! ```
//! use tenmap_core::{Array, DenseArray, Labels, TensorBlock, TensorMap};
//! use tenmap_learn::{Linear, Module, ModuleMap};
//!
//! let block = TensorBlock::new(
//!     DenseArray::<f64>::zeros(&[2, 4]),
//!     Labels::range("system", 2).unwrap(),
//!     Vec::<Labels>::new(),
//!     Labels::range("n", 4).unwrap(),
//! ).unwrap();
//! let tensor = TensorMap::new(Labels::single(), vec![block]).unwrap();
//!
//! let modules: Vec<Box<dyn Module<DenseArray<f64>>>> = vec![Box::new(Linear::random(4, 3))];
//! let map = ModuleMap::new(tensor.keys().clone(), modules, None).unwrap();
//!
//! let output = map.forward(&tensor).unwrap();
//! assert_eq!(output.block_by_id(0).unwrap().values().shape(), &[2, 3]);
//! assert_eq!(output.block_by_id(0).unwrap().properties(), &Labels::range("_", 3).unwrap());
//! ```

pub mod linear;
pub mod module;
pub mod module_map;

pub use linear::Linear;
pub use module::{Module, Sequential, Sigmoid};
pub use module_map::ModuleMap;
