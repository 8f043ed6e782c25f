//! One module per key of a tensor map

use std::sync::Arc;

use anyhow::{anyhow, Result};
use tenmap_core::{Array, LabelValue, Labels, TensorBlock, TensorMap, TensorMapError};

use crate::module::Module;

/// Apply an independent module to the block of every key.
///
/// The module for a key is applied to the block values and to all gradient
/// values, along their last axis. Output blocks keep their samples and
/// components; their properties are either the override given at
/// construction, or `Labels::range("_", n)` where `n` is the output width.
pub struct ModuleMap<A> {
    in_keys: Labels,
    modules: Vec<Box<dyn Module<A>>>,
    out_properties: Option<Vec<Labels>>,
}

impl<A: Array> ModuleMap<A> {
    /// Create a module map with one module per entry of `in_keys`, in the
    /// same order
    ///
    /// # Errors
    ///
    /// Returns [`TensorMapError::LengthMismatch`] if the number of modules or
    /// of output properties differs from the number of keys.
    pub fn new(
        in_keys: Labels,
        modules: Vec<Box<dyn Module<A>>>,
        out_properties: Option<Vec<Labels>>,
    ) -> tenmap_core::Result<Self> {
        if modules.len() != in_keys.len() {
            return Err(TensorMapError::LengthMismatch {
                what: "modules",
                expected: in_keys.len(),
                actual: modules.len(),
            });
        }

        if let Some(properties) = &out_properties {
            if properties.len() != in_keys.len() {
                return Err(TensorMapError::LengthMismatch {
                    what: "output properties",
                    expected: in_keys.len(),
                    actual: properties.len(),
                });
            }
        }

        Ok(Self {
            in_keys,
            modules,
            out_properties,
        })
    }

    pub fn in_keys(&self) -> &Labels {
        &self.in_keys
    }

    pub fn out_properties(&self) -> Option<&[Labels]> {
        self.out_properties.as_deref()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// The module associated with a key entry
    pub fn get_module(&self, key: &[LabelValue]) -> Option<&dyn Module<A>> {
        self.in_keys
            .position(key)
            .map(|i| self.modules[i].as_ref())
    }

    /// Apply the modules to every block of `tensor`
    ///
    /// The output has the same keys as `tensor`, in the same order. Every key
    /// of `tensor` must be one of the `in_keys`.
    pub fn forward(&self, tensor: &TensorMap<A>) -> Result<TensorMap<A>> {
        if tensor.keys().names() != self.in_keys.names() {
            return Err(anyhow!(
                "tensor keys names [{}] do not match the module map keys names [{}]",
                tensor.keys().names().join(", "),
                self.in_keys.names().join(", ")
            ));
        }

        let blocks = tensor
            .iter()
            .map(|(key, block)| {
                let index = self
                    .in_keys
                    .position(key)
                    .ok_or_else(|| anyhow!("no module for key {key:?}"))?;
                self.forward_block(index, block)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(n_blocks = blocks.len(), "module map forward");
        Ok(TensorMap::new(tensor.keys().clone(), blocks)?)
    }

    fn forward_block(&self, index: usize, block: &TensorBlock<A>) -> Result<TensorBlock<A>> {
        let module = &self.modules[index];
        let values = module.forward(block.values())?;

        let properties = match &self.out_properties {
            Some(properties) => Arc::new(properties[index].clone()),
            None => {
                let width = values.shape().last().copied().unwrap_or(0);
                Arc::new(Labels::range("_", width)?)
            }
        };

        let mut output = TensorBlock::new(
            values,
            Arc::clone(block.samples_arc()),
            block.components().to_vec(),
            Arc::clone(&properties),
        )?;

        for (parameter, gradient) in block.gradients() {
            let gradient_values = module.forward(gradient.values())?;
            let gradient = TensorBlock::new(
                gradient_values,
                Arc::clone(gradient.samples_arc()),
                gradient.components().to_vec(),
                Arc::clone(&properties),
            )?;
            output.add_gradient(parameter, gradient)?;
        }

        Ok(output)
    }
}
