//! Unique metadata along samples or properties

use crate::array::Array;
use crate::block::TensorBlock;
use crate::error::{Result, TensorMapError};
use crate::labels::{LabelRows, Labels};

use super::MetadataAxis;

/// Sorted unique values of the `names` columns along `axis`, across all
/// blocks of `tensor`.
///
/// With `gradient` set, the gradient blocks for that parameter are used
/// instead of the blocks themselves. An empty tensor, or blocks with no
/// entries along `axis`, give empty labels with the requested `names`.
///
/// # Errors
///
/// - [`TensorMapError::NoSuchGradient`] if a block lacks the requested gradient
/// - [`TensorMapError::Validation`] if a block does not have every name in
///   `names` along `axis`
///
/// # Examples
///
/// ```
/// use tenmap_core::ops::{unique_metadata, MetadataAxis};
/// use tenmap_core::{DenseArray, Labels, TensorBlock, TensorMap};
///
/// let samples = Labels::new(&["system", "atom"], vec![vec![2, 0], vec![0, 0], vec![2, 1]]).unwrap();
/// let block = TensorBlock::new(
///     DenseArray::<f64>::zeros(&[3, 1]),
///     samples,
///     Vec::<Labels>::new(),
///     Labels::range("p", 1).unwrap(),
/// ).unwrap();
/// let tensor = TensorMap::new(Labels::single(), vec![block]).unwrap();
///
/// let systems = unique_metadata(&tensor, MetadataAxis::Samples, &["system"], None).unwrap();
/// assert_eq!(systems, Labels::new(&["system"], vec![vec![0], vec![2]]).unwrap());
/// ```
pub fn unique_metadata<A: Array>(
    tensor: &crate::TensorMap<A>,
    axis: MetadataAxis,
    names: &[&str],
    gradient: Option<&str>,
) -> Result<Labels> {
    let blocks = target_blocks(tensor.blocks(), gradient)?;
    unique_from_blocks(&blocks, axis, names)
}

/// Same as [`unique_metadata`], for a single block
pub fn unique_metadata_block<A: Array>(
    block: &TensorBlock<A>,
    axis: MetadataAxis,
    names: &[&str],
    gradient: Option<&str>,
) -> Result<Labels> {
    let blocks = target_blocks(std::slice::from_ref(block), gradient)?;
    unique_from_blocks(&blocks, axis, names)
}

fn target_blocks<'a, A: Array>(
    blocks: &'a [TensorBlock<A>],
    gradient: Option<&str>,
) -> Result<Vec<&'a TensorBlock<A>>> {
    match gradient {
        None => Ok(blocks.iter().collect()),
        Some(parameter) => blocks.iter().map(|b| b.gradient(parameter)).collect(),
    }
}

pub(crate) fn axis_labels<A: Array>(block: &TensorBlock<A>, axis: MetadataAxis) -> &Labels {
    match axis {
        MetadataAxis::Samples => block.samples(),
        MetadataAxis::Properties => block.properties(),
    }
}

fn unique_from_blocks<A: Array>(
    blocks: &[&TensorBlock<A>],
    axis: MetadataAxis,
    names: &[&str],
) -> Result<Labels> {
    for block in blocks {
        let labels = axis_labels(block, axis);
        if let Some(missing) = names
            .iter()
            .find(|name| !labels.names().iter().any(|n| n == *name))
        {
            return Err(TensorMapError::validation(format!(
                "the blocks must have '{missing}' in their {axis} names, got [{}]",
                labels.names().join(", ")
            )));
        }
    }

    let mut values = Vec::new();
    for block in blocks {
        values.extend_from_slice(axis_labels(block, axis).select(names)?.values());
    }

    let unique = LabelRows::new(names, values)?.unique();
    tracing::debug!(
        axis = %axis,
        names = ?names,
        n_blocks = blocks.len(),
        n_unique = unique.len(),
        "computed unique metadata"
    );
    Ok(unique)
}
