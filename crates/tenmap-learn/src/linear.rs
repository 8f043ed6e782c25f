//! Affine transformation of the last axis

use anyhow::{bail, Result};
use scirs2_core::ndarray_ext::{Array1, Array2};
use scirs2_core::random::quick::random_f64;
use tenmap_core::{Array, DenseArray};

use crate::module::Module;

/// `y = x W + b`, with `W` of shape `(in_features, out_features)` and `b` of
/// shape `(out_features,)`
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl Linear {
    pub fn new(weights: Array2<f64>, bias: Array1<f64>) -> Result<Self> {
        if weights.ncols() != bias.len() {
            bail!(
                "the bias has {} entries, but the weights have {} output features",
                bias.len(),
                weights.ncols()
            );
        }
        Ok(Self { weights, bias })
    }

    /// Random weights and bias, uniformly distributed in
    /// `[-1/sqrt(in_features), 1/sqrt(in_features))`
    pub fn random(in_features: usize, out_features: usize) -> Self {
        let bound = 1.0 / (in_features.max(1) as f64).sqrt();
        let sample = || (2.0 * random_f64() - 1.0) * bound;

        Self {
            weights: Array2::from_shape_fn((in_features, out_features), |_| sample()),
            bias: Array1::from_shape_fn(out_features, |_| sample()),
        }
    }

    pub fn in_features(&self) -> usize {
        self.weights.nrows()
    }

    pub fn out_features(&self) -> usize {
        self.weights.ncols()
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }
}

impl Module<DenseArray<f64>> for Linear {
    fn forward(&self, input: &DenseArray<f64>) -> Result<DenseArray<f64>> {
        let shape = input.shape();
        let Some((&last, batch)) = shape.split_last() else {
            bail!("can not apply a linear layer to a 0-dimensional array");
        };

        if last != self.in_features() {
            bail!(
                "linear layer expects {} input features, got an array with shape {:?}",
                self.in_features(),
                shape
            );
        }

        let n_rows: usize = batch.iter().product();
        let rows = Array2::from_shape_vec((n_rows, last), input.to_vec())?;
        let output = rows.dot(&self.weights) + &self.bias;

        let mut output_shape = batch.to_vec();
        output_shape.push(self.out_features());
        Ok(DenseArray::from_shape_vec(
            &output_shape,
            output.iter().copied().collect(),
        )?)
    }
}
