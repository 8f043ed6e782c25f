//! New tensor maps with the metadata of an existing one

use crate::array::{Array, DenseArray, Element};
use crate::error::Result;
use crate::TensorMap;

/// Same keys, blocks metadata and gradients as `tensor`, filled with zeros
pub fn zeros_like<A: Array>(tensor: &TensorMap<A>) -> Result<TensorMap<A>> {
    let blocks = tensor
        .blocks()
        .iter()
        .map(|block| block.map_values(&|values: &A| Ok(values.zeros(values.shape()))))
        .collect::<Result<Vec<_>>>()?;
    TensorMap::new(tensor.keys().clone(), blocks)
}

/// Same keys, blocks metadata and gradients as `tensor`, filled with random
/// values uniformly distributed in `[0, 1)`
pub fn random_uniform_like<T: Element>(
    tensor: &TensorMap<DenseArray<T>>,
) -> Result<TensorMap<DenseArray<T>>> {
    let blocks = tensor
        .blocks()
        .iter()
        .map(|block| {
            block.map_values(&|values: &DenseArray<T>| {
                Ok(DenseArray::random_uniform(values.shape(), 0.0, 1.0))
            })
        })
        .collect::<Result<Vec<_>>>()?;
    TensorMap::new(tensor.keys().clone(), blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TensorBlock;
    use crate::labels::Labels;

    fn tensor() -> TensorMap<DenseArray<f32>> {
        let block = TensorBlock::new(
            DenseArray::from_elem(&[3, 2], 4.0),
            Labels::range("system", 3).unwrap(),
            Vec::<Labels>::new(),
            Labels::range("n", 2).unwrap(),
        )
        .unwrap();
        let gradient = TensorBlock::new(
            DenseArray::from_elem(&[2, 2], 7.0),
            Labels::new(&["sample"], vec![vec![0], vec![2]]).unwrap(),
            Vec::<Labels>::new(),
            block.properties_arc().clone(),
        )
        .unwrap();
        let block = block.with_gradient("cell", gradient).unwrap();
        TensorMap::new(Labels::range("key", 1).unwrap(), vec![block]).unwrap()
    }

    #[test]
    fn test_zeros_like() {
        let tensor = tensor();
        let zeros = zeros_like(&tensor).unwrap();
        let block = zeros.block_by_id(0).unwrap();
        assert_eq!(block.samples(), tensor.block_by_id(0).unwrap().samples());
        assert!(block.values().to_vec().iter().all(|&x| x == 0.0));

        let gradient = block.gradient("cell").unwrap();
        assert_eq!(gradient.values().shape(), &[2, 2]);
        assert!(gradient.values().to_vec().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_random_uniform_like() {
        let tensor = tensor();
        let random = random_uniform_like(&tensor).unwrap();
        assert_eq!(random.keys(), tensor.keys());

        let block = random.block_by_id(0).unwrap();
        assert_eq!(block.values().shape(), &[3, 2]);
        assert!(block.values().to_vec().iter().all(|&x| (0.0..1.0).contains(&x)));
        assert!(block.has_gradient("cell"));
    }
}
