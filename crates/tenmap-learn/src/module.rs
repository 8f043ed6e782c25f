//! Modules: transformations acting on the last axis of an array

use tenmap_core::{DenseArray, Element};

/// A transformation of arrays along their last (properties) axis.
///
/// All other axes are treated as batch axes, so the same module can be
/// applied to block values and to gradient values.
pub trait Module<A>: Send + Sync {
    fn forward(&self, input: &A) -> anyhow::Result<A>;
}

/// Chain of modules applied in order
pub struct Sequential<A> {
    modules: Vec<Box<dyn Module<A>>>,
}

impl<A> Sequential<A> {
    pub fn new(modules: Vec<Box<dyn Module<A>>>) -> Self {
        Self { modules }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<A: Clone> Module<A> for Sequential<A> {
    fn forward(&self, input: &A) -> anyhow::Result<A> {
        let mut output = input.clone();
        for module in &self.modules {
            output = module.forward(&output)?;
        }
        Ok(output)
    }
}

/// Element-wise logistic function
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

impl<T: Element> Module<DenseArray<T>> for Sigmoid {
    fn forward(&self, input: &DenseArray<T>) -> anyhow::Result<DenseArray<T>> {
        let output = input
            .as_array()
            .mapv(|x| T::one() / (T::one() + (-x).exp()));
        Ok(DenseArray::from_array(output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenmap_core::Array;

    #[test]
    fn test_sigmoid() {
        let input = DenseArray::<f64>::from_rows(&[vec![0.0, 100.0, -100.0]]).unwrap();
        let output = Sigmoid.forward(&input).unwrap();
        let values = output.to_vec();
        assert!((values[0] - 0.5).abs() < 1e-12);
        assert!((values[1] - 1.0).abs() < 1e-12);
        assert!(values[2].abs() < 1e-12);
        assert_eq!(output.shape(), input.shape());
    }

    #[test]
    fn test_sequential() {
        let sequential: Sequential<DenseArray<f64>> =
            Sequential::<DenseArray<f64>>::new(vec![Box::new(Sigmoid), Box::new(Sigmoid)]);
        assert_eq!(sequential.len(), 2);

        let input = DenseArray::<f64>::zeros(&[2, 2]);
        let output = sequential.forward(&input).unwrap();
        let expected = 1.0 / (1.0 + (-0.5f64).exp());
        assert!(output.to_vec().iter().all(|x| (x - expected).abs() < 1e-12));
    }
}
