//! Metadata comparison between blocks and tensor maps

use crate::array::Array;
use crate::block::TensorBlock;
use crate::TensorMap;

/// Which metadata axes to compare in [`equal_metadata`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataCheck {
    pub samples: bool,
    pub components: bool,
    pub properties: bool,
}

impl MetadataCheck {
    /// Compare samples, components and properties
    pub fn all() -> Self {
        Self {
            samples: true,
            components: true,
            properties: true,
        }
    }

    pub fn samples_only() -> Self {
        Self {
            samples: true,
            components: false,
            properties: false,
        }
    }

    pub fn properties_only() -> Self {
        Self {
            samples: false,
            components: false,
            properties: true,
        }
    }

    pub fn with_samples(mut self, samples: bool) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_components(mut self, components: bool) -> Self {
        self.components = components;
        self
    }

    pub fn with_properties(mut self, properties: bool) -> Self {
        self.properties = properties;
        self
    }
}

impl Default for MetadataCheck {
    fn default() -> Self {
        Self::all()
    }
}

/// Check whether two blocks have the same metadata along the axes selected by
/// `check`. Gradients must have the same parameters, and their metadata is
/// compared with the same `check`.
pub fn equal_metadata_block<A: Array>(
    a: &TensorBlock<A>,
    b: &TensorBlock<A>,
    check: MetadataCheck,
) -> bool {
    block_difference(a, b, check).is_none()
}

/// Check whether two tensor maps have the same keys, and blocks with the same
/// metadata along the axes selected by `check`.
pub fn equal_metadata<A: Array>(a: &TensorMap<A>, b: &TensorMap<A>, check: MetadataCheck) -> bool {
    tensor_difference(a, b, check).is_none()
}

/// Describe the first metadata difference between two tensor maps, if any
pub(crate) fn tensor_difference<A: Array>(
    a: &TensorMap<A>,
    b: &TensorMap<A>,
    check: MetadataCheck,
) -> Option<String> {
    if a.keys() != b.keys() {
        return Some(format!(
            "the tensor maps have different keys:\n{}\nand\n{}",
            a.keys(),
            b.keys()
        ));
    }

    a.iter()
        .zip(b.iter())
        .find_map(|((key, block_a), (_, block_b))| {
            block_difference(block_a, block_b, check)
                .map(|reason| format!("block for key {key:?}: {reason}"))
        })
}

/// Describe the first metadata difference between two blocks, if any
pub(crate) fn block_difference<A: Array>(
    a: &TensorBlock<A>,
    b: &TensorBlock<A>,
    check: MetadataCheck,
) -> Option<String> {
    if check.samples && a.samples() != b.samples() {
        return Some("samples are different".to_string());
    }

    if check.components {
        if a.components().len() != b.components().len() {
            return Some(format!(
                "the number of components is different ({} and {})",
                a.components().len(),
                b.components().len()
            ));
        }

        if let Some(i) = a
            .components()
            .iter()
            .zip(b.components())
            .position(|(x, y)| x != y)
        {
            return Some(format!("components along axis {} are different", i + 1));
        }
    }

    if check.properties && a.properties() != b.properties() {
        return Some("properties are different".to_string());
    }

    let mut a_parameters = a.gradients_list();
    let mut b_parameters = b.gradients_list();
    a_parameters.sort_unstable();
    b_parameters.sort_unstable();
    if a_parameters != b_parameters {
        return Some(format!(
            "gradient parameters are different ([{}] and [{}])",
            a_parameters.join(", "),
            b_parameters.join(", ")
        ));
    }

    for (parameter, gradient_a) in a.gradients() {
        let gradient_b = b.gradient(parameter).ok()?;
        if let Some(reason) = block_difference(gradient_a, gradient_b, check) {
            return Some(format!("gradient with respect to '{parameter}': {reason}"));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DenseArray;
    use crate::labels::Labels;

    type Block = TensorBlock<DenseArray<f64>>;

    fn block(n_samples: usize, n_properties: usize) -> Block {
        TensorBlock::new(
            DenseArray::zeros(&[n_samples, 3, n_properties]),
            Labels::range("system", n_samples).unwrap(),
            vec![Labels::range("xyz", 3).unwrap()],
            Labels::range("n", n_properties).unwrap(),
        )
        .unwrap()
    }

    fn with_positions(block: Block) -> Block {
        let gradient = TensorBlock::new(
            DenseArray::zeros(&[1, 3, block.properties().len()]),
            Labels::new(&["sample", "atom"], vec![vec![0, 0]]).unwrap(),
            block.components().to_vec(),
            block.properties_arc().clone(),
        )
        .unwrap();
        block.with_gradient("positions", gradient).unwrap()
    }

    #[test]
    fn test_equal_blocks() {
        assert!(equal_metadata_block(&block(2, 4), &block(2, 4), MetadataCheck::all()));
        assert!(!equal_metadata_block(&block(2, 4), &block(3, 4), MetadataCheck::all()));
        assert!(!equal_metadata_block(&block(2, 4), &block(2, 5), MetadataCheck::all()));
    }

    #[test]
    fn test_partial_check() {
        let a = block(2, 4);
        let b = block(3, 4);
        assert!(equal_metadata_block(&a, &b, MetadataCheck::properties_only()));
        assert!(!equal_metadata_block(&a, &b, MetadataCheck::samples_only()));
        assert!(equal_metadata_block(
            &a,
            &b,
            MetadataCheck::all().with_samples(false)
        ));
    }

    #[test]
    fn test_gradients_compared() {
        let a = with_positions(block(2, 4));
        let b = block(2, 4);
        assert!(!equal_metadata_block(&a, &b, MetadataCheck::all()));
        assert!(equal_metadata_block(&a, &with_positions(block(2, 4)), MetadataCheck::all()));

        let reason = block_difference(&a, &b, MetadataCheck::all()).unwrap();
        assert!(reason.contains("positions"));
    }

    #[test]
    fn test_equal_tensors() {
        let keys = Labels::range("key", 2).unwrap();
        let a = TensorMap::new(keys.clone(), vec![block(2, 4), block(1, 4)]).unwrap();
        let b = TensorMap::new(keys, vec![block(2, 4), block(1, 4)]).unwrap();
        assert!(equal_metadata(&a, &b, MetadataCheck::all()));

        let other_keys = Labels::new(&["key"], vec![vec![0], vec![2]]).unwrap();
        let c = TensorMap::new(other_keys, vec![block(2, 4), block(1, 4)]).unwrap();
        assert!(!equal_metadata(&a, &c, MetadataCheck::all()));

        let d = TensorMap::new(Labels::range("key", 2).unwrap(), vec![block(2, 4), block(2, 4)])
            .unwrap();
        assert!(!equal_metadata(&a, &d, MetadataCheck::all()));
        assert!(equal_metadata(&a, &d, MetadataCheck::properties_only()));
    }
}
