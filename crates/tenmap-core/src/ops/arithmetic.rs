//! Arithmetic on tensor maps, propagating gradients
//!
//! Tensor operands must have exactly the same metadata, including gradient
//! metadata. Gradients follow the usual rules: the gradient of a sum is the sum
//! of gradients, adding a constant leaves gradients unchanged, and scaling by a
//! constant scales the gradients.

use crate::array::Array;
use crate::block::TensorBlock;
use crate::error::{Result, TensorMapError};
use crate::TensorMap;

use super::equal::{tensor_difference, MetadataCheck};

fn add_blocks<A: Array>(a: &TensorBlock<A>, b: &TensorBlock<A>) -> Result<TensorBlock<A>> {
    let mut block = TensorBlock::new(
        a.values().add(b.values())?,
        a.samples_arc().clone(),
        a.components().to_vec(),
        a.properties_arc().clone(),
    )?;

    for (parameter, gradient_a) in a.gradients() {
        let gradient_b = b.gradient(parameter)?;
        block.add_gradient(parameter, add_blocks(gradient_a, gradient_b)?)?;
    }

    Ok(block)
}

fn map_blocks<A: Array>(
    tensor: &TensorMap<A>,
    f: impl Fn(&TensorBlock<A>) -> Result<TensorBlock<A>>,
) -> Result<TensorMap<A>> {
    let blocks = tensor.blocks().iter().map(f).collect::<Result<Vec<_>>>()?;
    TensorMap::new(tensor.keys().clone(), blocks)
}

/// Element-wise sum of two tensor maps with the same metadata
///
/// # Errors
///
/// Returns [`TensorMapError::MetadataMismatch`] if the keys, the block
/// metadata or the gradients of `a` and `b` differ.
pub fn add<A: Array>(a: &TensorMap<A>, b: &TensorMap<A>) -> Result<TensorMap<A>> {
    if let Some(reason) = tensor_difference(a, b, MetadataCheck::all()) {
        return Err(TensorMapError::MetadataMismatch(reason));
    }

    let blocks = a
        .blocks()
        .iter()
        .zip(b.blocks())
        .map(|(block_a, block_b)| add_blocks(block_a, block_b))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(n_blocks = blocks.len(), "added tensor maps");
    TensorMap::new(a.keys().clone(), blocks)
}

/// Element-wise difference `a - b` of two tensor maps with the same metadata
pub fn subtract<A: Array>(a: &TensorMap<A>, b: &TensorMap<A>) -> Result<TensorMap<A>> {
    add(a, &multiply(b, -1.0)?)
}

/// Multiply all values and gradients by `scalar`
pub fn multiply<A: Array>(tensor: &TensorMap<A>, scalar: f64) -> Result<TensorMap<A>> {
    map_blocks(tensor, |block| {
        block.map_values(&|values: &A| Ok(values.mul_scalar(scalar)))
    })
}

/// Add `scalar` to all values. Gradients are unchanged.
pub fn add_scalar<A: Array>(tensor: &TensorMap<A>, scalar: f64) -> Result<TensorMap<A>> {
    map_blocks(tensor, |block| block.with_values(block.values().add_scalar(scalar)))
}

/// Subtract `scalar` from all values. Gradients are unchanged.
pub fn subtract_scalar<A: Array>(tensor: &TensorMap<A>, scalar: f64) -> Result<TensorMap<A>> {
    add_scalar(tensor, -scalar)
}
