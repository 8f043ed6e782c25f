//! TensorMap: an ordered mapping from key entries to blocks
//!
//! A [`TensorMap`] pairs a set of key [`Labels`] with one [`TensorBlock`] per
//! key entry, in the same order. All blocks share the same metadata names, so
//! the tensor as a whole describes a single sparse, block-structured quantity.
//!
//! # Examples
//!
//! ```
//! use tenmap_core::{DenseArray, Labels, TensorBlock, TensorMap};
//!
//! let make_block = |n_samples: usize| {
//!     TensorBlock::new(
//!         DenseArray::<f64>::zeros(&[n_samples, 1]),
//!         Labels::range("system", n_samples).unwrap(),
//!         Vec::<Labels>::new(),
//!         Labels::range("n", 1).unwrap(),
//!     )
//!     .unwrap()
//! };
//!
//! let keys = Labels::new(&["l", "center"], vec![vec![0, 1], vec![1, 1], vec![1, 6]]).unwrap();
//! let tensor = TensorMap::new(keys, vec![make_block(1), make_block(2), make_block(3)]).unwrap();
//!
//! let block = tensor.block(&[("l", 1), ("center", 6)]).unwrap();
//! assert_eq!(block.samples().len(), 3);
//!
//! // partial keys must identify a single block
//! assert!(tensor.block(&[("center", 1)]).is_err());
//! assert!(tensor.block(&[("center", 6)]).is_ok());
//! ```

use std::collections::HashMap;

use crate::array::Array;
use crate::block::TensorBlock;
use crate::error::{Result, TensorMapError};
use crate::labels::{LabelValue, Labels};

/// Sparse block tensor: key labels and one block per key entry
#[derive(Debug, Clone, PartialEq)]
pub struct TensorMap<A> {
    keys: Labels,
    blocks: Vec<TensorBlock<A>>,
}

fn format_selection(selection: &[(&str, LabelValue)]) -> String {
    selection
        .iter()
        .map(|(name, value)| format!("{name} = {value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn check_consistent_blocks<A: Array>(blocks: &[TensorBlock<A>]) -> Result<()> {
    let Some(first) = blocks.first() else {
        return Ok(());
    };

    let component_names = |block: &TensorBlock<A>| {
        block
            .components()
            .iter()
            .map(|c| c.names().to_vec())
            .collect::<Vec<_>>()
    };

    let first_components = component_names(first);
    let first_gradients = first
        .gradients()
        .map(|(parameter, gradient)| (parameter, gradient.samples().names()))
        .collect::<HashMap<_, _>>();

    for block in &blocks[1..] {
        if block.samples().names() != first.samples().names() {
            return Err(TensorMapError::InconsistentBlocks(format!(
                "all blocks must have the same samples names, got [{}] and [{}]",
                block.samples().names().join(", "),
                first.samples().names().join(", "),
            )));
        }

        if component_names(block) != first_components {
            return Err(TensorMapError::InconsistentBlocks(
                "all blocks must have the same components names".into(),
            ));
        }

        if block.properties().names() != first.properties().names() {
            return Err(TensorMapError::InconsistentBlocks(format!(
                "all blocks must have the same properties names, got [{}] and [{}]",
                block.properties().names().join(", "),
                first.properties().names().join(", "),
            )));
        }

        if block.gradients_list().len() != first_gradients.len() {
            return Err(TensorMapError::InconsistentBlocks(
                "all blocks must contain the same set of gradients".into(),
            ));
        }

        for (parameter, gradient) in block.gradients() {
            match first_gradients.get(parameter) {
                None => {
                    return Err(TensorMapError::InconsistentBlocks(format!(
                        "missing gradient with respect to '{parameter}' in one of the blocks"
                    )));
                }
                Some(&names) if names != gradient.samples().names() => {
                    return Err(TensorMapError::InconsistentBlocks(format!(
                        "all blocks must have the same gradient samples names for \
                        gradients with respect to '{parameter}', got [{}] and [{}]",
                        gradient.samples().names().join(", "),
                        names.join(", "),
                    )));
                }
                Some(_) => {}
            }
        }
    }

    Ok(())
}

impl<A: Array> TensorMap<A> {
    /// Create a tensor map from keys and blocks, paired in order
    ///
    /// # Errors
    ///
    /// - [`TensorMapError::LengthMismatch`] if there is not one block per key
    /// - [`TensorMapError::InconsistentBlocks`] if the blocks do not share
    ///   their metadata names and gradient parameters
    pub fn new(keys: Labels, blocks: Vec<TensorBlock<A>>) -> Result<Self> {
        if keys.len() != blocks.len() {
            return Err(TensorMapError::LengthMismatch {
                what: "blocks",
                expected: keys.len(),
                actual: blocks.len(),
            });
        }

        check_consistent_blocks(&blocks)?;

        tracing::debug!(
            keys = ?keys.names(),
            n_blocks = blocks.len(),
            "created tensor map"
        );
        Ok(Self { keys, blocks })
    }

    pub fn keys(&self) -> &Labels {
        &self.keys
    }

    pub fn blocks(&self) -> &[TensorBlock<A>] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<TensorBlock<A>> {
        self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[LabelValue], &TensorBlock<A>)> + '_ {
        self.keys.iter().zip(&self.blocks)
    }

    /// Positional access to blocks
    pub fn block_by_id(&self, index: usize) -> Result<&TensorBlock<A>> {
        self.blocks
            .get(index)
            .ok_or(TensorMapError::IndexOutOfRange {
                index,
                len: self.blocks.len(),
                what: "blocks",
            })
    }

    /// Get the block for a full key entry, given as one value per key name
    pub fn block_by_entry(&self, entry: &[LabelValue]) -> Result<&TensorBlock<A>> {
        if entry.len() != self.keys.size() {
            return Err(TensorMapError::LengthMismatch {
                what: "key values",
                expected: self.keys.size(),
                actual: entry.len(),
            });
        }

        self.keys
            .position(entry)
            .map(|i| &self.blocks[i])
            .ok_or_else(|| {
                let selection = self
                    .keys
                    .names()
                    .iter()
                    .zip(entry)
                    .map(|(name, value)| format!("{name} = {value}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                TensorMapError::NoMatchingBlock(selection)
            })
    }

    /// All blocks matching a (possibly partial) key selection
    pub fn blocks_matching(&self, selection: &[(&str, LabelValue)]) -> Result<Vec<&TensorBlock<A>>> {
        Ok(self
            .keys
            .matching(selection)?
            .into_iter()
            .map(|i| &self.blocks[i])
            .collect())
    }

    /// Get the single block matching a key selection
    ///
    /// A selection naming every key dimension is a full key, and fails with
    /// [`TensorMapError::NoMatchingBlock`] when no block has this key. A
    /// partial selection must match exactly one block, otherwise this fails
    /// with [`TensorMapError::AmbiguousOrNoMatch`].
    pub fn block(&self, selection: &[(&str, LabelValue)]) -> Result<&TensorBlock<A>> {
        let matching = self.keys.matching(selection)?;

        let is_full_key = self
            .keys
            .names()
            .iter()
            .all(|name| selection.iter().any(|(n, _)| n == name));

        match matching.as_slice() {
            [i] => Ok(&self.blocks[*i]),
            [] if is_full_key => Err(TensorMapError::NoMatchingBlock(format_selection(selection))),
            _ => Err(TensorMapError::AmbiguousOrNoMatch {
                selection: format_selection(selection),
                count: matching.len(),
            }),
        }
    }

    /// Samples names shared by all blocks, `None` for an empty tensor
    pub fn sample_names(&self) -> Option<&[String]> {
        self.blocks.first().map(|b| b.samples().names())
    }

    pub fn component_names(&self) -> Option<Vec<&[String]>> {
        self.blocks
            .first()
            .map(|b| b.components().iter().map(|c| c.names()).collect())
    }

    pub fn property_names(&self) -> Option<&[String]> {
        self.blocks.first().map(|b| b.properties().names())
    }
}

impl<'a, A> IntoIterator for &'a TensorMap<A> {
    type Item = &'a TensorBlock<A>;
    type IntoIter = std::slice::Iter<'a, TensorBlock<A>>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DenseArray;

    type Block = TensorBlock<DenseArray<f64>>;

    fn block(n_samples: usize, property: &str) -> Block {
        TensorBlock::new(
            DenseArray::zeros(&[n_samples, 2]),
            Labels::range("system", n_samples).unwrap(),
            Vec::<Labels>::new(),
            Labels::range(property, 2).unwrap(),
        )
        .unwrap()
    }

    fn keys() -> Labels {
        Labels::new(&["l", "center"], vec![vec![0, 1], vec![1, 1], vec![1, 6]]).unwrap()
    }

    fn tensor() -> TensorMap<DenseArray<f64>> {
        TensorMap::new(keys(), vec![block(1, "n"), block(2, "n"), block(3, "n")]).unwrap()
    }

    #[test]
    fn test_length_mismatch() {
        let result = TensorMap::new(keys(), vec![block(1, "n"), block(2, "n")]);
        assert!(matches!(
            result,
            Err(TensorMapError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_inconsistent_blocks() {
        let result = TensorMap::new(keys(), vec![block(1, "n"), block(2, "m"), block(3, "n")]);
        assert!(matches!(result, Err(TensorMapError::InconsistentBlocks(_))));
    }

    #[test]
    fn test_block_full_key() {
        let tensor = tensor();
        let block = tensor.block(&[("l", 1), ("center", 1)]).unwrap();
        assert_eq!(block.samples().len(), 2);

        let missing = tensor.block(&[("l", 2), ("center", 1)]);
        assert!(matches!(missing, Err(TensorMapError::NoMatchingBlock(_))));

        assert_eq!(tensor.block_by_entry(&[1, 6]).unwrap().samples().len(), 3);
        assert!(matches!(
            tensor.block_by_entry(&[5, 5]),
            Err(TensorMapError::NoMatchingBlock(_))
        ));
    }

    #[test]
    fn test_block_partial_key() {
        let tensor = tensor();
        assert_eq!(tensor.block(&[("l", 0)]).unwrap().samples().len(), 1);

        match tensor.block(&[("l", 1)]) {
            Err(TensorMapError::AmbiguousOrNoMatch { count, .. }) => assert_eq!(count, 2),
            other => panic!("unexpected result: {other:?}"),
        }

        match tensor.block(&[("center", 3)]) {
            Err(TensorMapError::AmbiguousOrNoMatch { count, .. }) => assert_eq!(count, 0),
            other => panic!("unexpected result: {other:?}"),
        }

        assert!(matches!(
            tensor.block(&[("neighbor", 3)]),
            Err(TensorMapError::UnknownColumn { .. })
        ));

        assert_eq!(tensor.blocks_matching(&[("center", 1)]).unwrap().len(), 2);
    }

    #[test]
    fn test_block_by_id() {
        let tensor = tensor();
        assert_eq!(tensor.block_by_id(2).unwrap().samples().len(), 3);
        assert!(matches!(
            tensor.block_by_id(3),
            Err(TensorMapError::IndexOutOfRange { index: 3, len: 3, .. })
        ));
    }

    #[test]
    fn test_iteration_order() {
        let tensor = tensor();
        let sizes = tensor
            .iter()
            .map(|(key, block)| (key.to_vec(), block.samples().len()))
            .collect::<Vec<_>>();
        assert_eq!(
            sizes,
            vec![(vec![0, 1], 1), (vec![1, 1], 2), (vec![1, 6], 3)]
        );
        assert_eq!((&tensor).into_iter().count(), 3);
        assert_eq!(tensor.property_names().unwrap(), ["n"]);
    }

    #[test]
    fn test_empty_tensor() {
        let tensor =
            TensorMap::<DenseArray<f64>>::new(Labels::empty(&["l"]).unwrap(), vec![]).unwrap();
        assert!(tensor.is_empty());
        assert!(tensor.sample_names().is_none());
    }
}
