//! Serde records mirroring the tensor map structure
//!
//! Records are plain owned data: labels become names + flat values, arrays
//! become shape + flat row-major data. Rebuilding a tensor map from records
//! goes through the regular constructors, so every metadata invariant is
//! checked again on load.

use serde::{Deserialize, Serialize};
use tenmap_core::{Array, DenseArray, Element, Labels, TensorBlock, TensorMap, TensorMapError};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct LabelsRecord {
    pub(crate) names: Vec<String>,
    pub(crate) values: Vec<i32>,
}

impl LabelsRecord {
    fn from_labels(labels: &Labels) -> Self {
        Self {
            names: labels.names().to_vec(),
            values: labels.values().to_vec(),
        }
    }

    fn into_labels(self) -> Result<Labels> {
        Ok(Labels::from_flat(&self.names, self.values)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ArrayRecord<T> {
    pub(crate) shape: Vec<u64>,
    pub(crate) data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct BlockRecord<T> {
    pub(crate) values: ArrayRecord<T>,
    pub(crate) samples: LabelsRecord,
    pub(crate) components: Vec<LabelsRecord>,
    pub(crate) properties: LabelsRecord,
    pub(crate) gradients: Vec<(String, BlockRecord<T>)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TensorRecord<T> {
    pub(crate) keys: LabelsRecord,
    pub(crate) blocks: Vec<BlockRecord<T>>,
}

impl<T: Element> BlockRecord<T> {
    fn from_block(block: &TensorBlock<DenseArray<T>>) -> Self {
        Self {
            values: ArrayRecord {
                shape: block.values().shape().iter().map(|&s| s as u64).collect(),
                data: block.values().to_vec(),
            },
            samples: LabelsRecord::from_labels(block.samples()),
            components: block
                .components()
                .iter()
                .map(|c| LabelsRecord::from_labels(c))
                .collect(),
            properties: LabelsRecord::from_labels(block.properties()),
            gradients: block
                .gradients()
                .map(|(parameter, gradient)| (parameter.to_string(), Self::from_block(gradient)))
                .collect(),
        }
    }

    fn into_block(self) -> Result<TensorBlock<DenseArray<T>>> {
        let shape = self
            .values
            .shape
            .iter()
            .map(|&s| {
                usize::try_from(s).map_err(|_| {
                    TensorMapError::Validation(format!("array dimension {s} does not fit in usize"))
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let values = DenseArray::from_shape_vec(&shape, self.values.data)?;

        let components = self
            .components
            .into_iter()
            .map(LabelsRecord::into_labels)
            .collect::<Result<Vec<_>>>()?;

        let mut block = TensorBlock::new(
            values,
            self.samples.into_labels()?,
            components,
            self.properties.into_labels()?,
        )?;

        for (parameter, gradient) in self.gradients {
            block.add_gradient(&parameter, gradient.into_block()?)?;
        }
        Ok(block)
    }
}

impl<T: Element> TensorRecord<T> {
    pub(crate) fn from_tensor(tensor: &TensorMap<DenseArray<T>>) -> Self {
        Self {
            keys: LabelsRecord::from_labels(tensor.keys()),
            blocks: tensor.blocks().iter().map(BlockRecord::from_block).collect(),
        }
    }

    pub(crate) fn into_tensor(self) -> Result<TensorMap<DenseArray<T>>> {
        let blocks = self
            .blocks
            .into_iter()
            .map(BlockRecord::into_block)
            .collect::<Result<Vec<_>>>()?;
        Ok(TensorMap::new(self.keys.into_labels()?, blocks)?)
    }
}
