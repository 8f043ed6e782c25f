//! Split blocks and tensors along samples or properties

use std::sync::Arc;

use crate::array::Array;
use crate::block::TensorBlock;
use crate::error::{Result, TensorMapError};
use crate::labels::{label_value, LabelValue, Labels};
use crate::TensorMap;

use super::unique::axis_labels;
use super::MetadataAxis;

/// Split a block into one block per entry of `grouped_labels`.
///
/// Each group selects the entries along `axis` whose projection onto the
/// group names is one of the group entries, keeping their original order.
/// Groups matching nothing produce blocks with a zero-length axis. Gradients
/// are split consistently with the values.
///
/// # Errors
///
/// Returns [`TensorMapError::Validation`] if a group uses names that are not
/// part of the block labels along `axis`.
pub fn split_block<A: Array>(
    block: &TensorBlock<A>,
    axis: MetadataAxis,
    grouped_labels: &[Labels],
) -> Result<Vec<TensorBlock<A>>> {
    grouped_labels
        .iter()
        .map(|group| {
            if group.is_empty() {
                tracing::warn!(axis = %axis, names = ?group.names(), "empty group in split");
            }
            let indices = selected_indices(axis_labels(block, axis), group, axis)?;
            match axis {
                MetadataAxis::Samples => select_samples(block, &indices),
                MetadataAxis::Properties => select_properties(block, &indices),
            }
        })
        .collect()
}

/// Split every block of a tensor, producing one tensor per entry of
/// `grouped_labels`. All resulting tensors have the same keys as `tensor`.
pub fn split<A: Array>(
    tensor: &TensorMap<A>,
    axis: MetadataAxis,
    grouped_labels: &[Labels],
) -> Result<Vec<TensorMap<A>>> {
    let mut grouped_blocks: Vec<Vec<TensorBlock<A>>> =
        (0..grouped_labels.len()).map(|_| Vec::with_capacity(tensor.len())).collect();

    for block in tensor.blocks() {
        for (group, split) in grouped_blocks.iter_mut().zip(split_block(block, axis, grouped_labels)?) {
            group.push(split);
        }
    }

    tracing::debug!(
        axis = %axis,
        n_groups = grouped_labels.len(),
        n_blocks = tensor.len(),
        "split tensor map"
    );

    grouped_blocks
        .into_iter()
        .map(|blocks| TensorMap::new(tensor.keys().clone(), blocks))
        .collect()
}

fn selected_indices(labels: &Labels, group: &Labels, axis: MetadataAxis) -> Result<Vec<usize>> {
    if let Some(missing) = group
        .names()
        .iter()
        .find(|name| !labels.names().contains(*name))
    {
        return Err(TensorMapError::validation(format!(
            "the grouped labels name '{missing}' is not part of the {axis} names [{}]",
            labels.names().join(", ")
        )));
    }

    let projected = labels.select(group.names())?;
    Ok(projected
        .iter()
        .enumerate()
        .filter(|(_, entry)| group.contains(entry))
        .map(|(i, _)| i)
        .collect())
}

fn select_entries(labels: &Labels, indices: &[usize]) -> Result<Labels> {
    let mut values = Vec::with_capacity(indices.len() * labels.size());
    for &i in indices {
        values.extend_from_slice(&labels[i]);
    }
    Labels::from_flat(labels.names(), values)
}

fn select_samples<A: Array>(block: &TensorBlock<A>, indices: &[usize]) -> Result<TensorBlock<A>> {
    let samples = select_entries(block.samples(), indices)?;
    let values = block.values().select(0, indices)?;
    let mut new_block = TensorBlock::new(
        values,
        samples,
        block.components().to_vec(),
        Arc::clone(block.properties_arc()),
    )?;

    let mut mapping: Vec<Option<LabelValue>> = vec![None; block.samples().len()];
    for (new, &old) in indices.iter().enumerate() {
        mapping[old] = Some(label_value(new)?);
    }

    for (parameter, gradient) in block.gradients() {
        let mut rows = Vec::new();
        let mut gradient_values = Vec::new();
        for (i, entry) in gradient.samples().iter().enumerate() {
            if let Some(new_sample) = mapping[entry[0] as usize] {
                rows.push(i);
                gradient_values.push(new_sample);
                gradient_values.extend_from_slice(&entry[1..]);
            }
        }

        let gradient_samples = Labels::from_flat(gradient.samples().names(), gradient_values)?;
        let split_gradient = TensorBlock::new(
            gradient.values().select(0, &rows)?,
            gradient_samples,
            gradient.components().to_vec(),
            Arc::clone(new_block.properties_arc()),
        )?;
        new_block.add_gradient(parameter, split_gradient)?;
    }

    Ok(new_block)
}

fn select_properties<A: Array>(
    block: &TensorBlock<A>,
    indices: &[usize],
) -> Result<TensorBlock<A>> {
    let properties = Arc::new(select_entries(block.properties(), indices)?);
    let last_axis = block.values().shape().len() - 1;
    let mut new_block = TensorBlock::new(
        block.values().select(last_axis, indices)?,
        Arc::clone(block.samples_arc()),
        block.components().to_vec(),
        Arc::clone(&properties),
    )?;

    for (parameter, gradient) in block.gradients() {
        let last_axis = gradient.values().shape().len() - 1;
        let split_gradient = TensorBlock::new(
            gradient.values().select(last_axis, indices)?,
            Arc::clone(gradient.samples_arc()),
            gradient.components().to_vec(),
            Arc::clone(&properties),
        )?;
        new_block.add_gradient(parameter, split_gradient)?;
    }

    Ok(new_block)
}
