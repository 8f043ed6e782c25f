//! TensorBlock: one value array with its axis metadata and gradients
//!
//! The axes of the value array are, in order, the samples, zero or more
//! component axes, and the properties. The shape is checked eagerly when the
//! block is created, so an existing block is always consistent.
//!
//! Gradients are stored as nested blocks, one per parameter. A gradient block
//! shares the properties of its parent, its samples start with a `"sample"`
//! column pointing into the parent samples, and its trailing component axes
//! are the parent's components.
//!
//! # Examples
//!
//! ```
//! use tenmap_core::{Array, DenseArray, Labels, TensorBlock};
//!
//! let block = TensorBlock::new(
//!     DenseArray::<f64>::zeros(&[2, 3, 1]),
//!     Labels::new(&["system"], vec![vec![0], vec![1]]).unwrap(),
//!     vec![Labels::range("xyz", 3).unwrap()],
//!     Labels::new(&["energy"], vec![vec![0]]).unwrap(),
//! ).unwrap();
//!
//! assert_eq!(block.values().shape(), &[2, 3, 1]);
//! assert!(!block.has_gradient("positions"));
//! ```

use std::sync::Arc;

use crate::array::Array;
use crate::error::{Result, TensorMapError};
use crate::labels::Labels;

/// A block of data with samples, components and properties metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TensorBlock<A> {
    values: A,
    samples: Arc<Labels>,
    components: Vec<Arc<Labels>>,
    properties: Arc<Labels>,
    gradients: Vec<(String, TensorBlock<A>)>,
}

fn check_shape(
    shape: &[usize],
    samples: &Labels,
    components: &[Arc<Labels>],
    properties: &Labels,
) -> Result<()> {
    let expected_rank = components.len() + 2;
    if shape.len() != expected_rank {
        return Err(TensorMapError::shape_mismatch(
            "array rank",
            expected_rank,
            shape.len(),
        ));
    }

    if shape[0] != samples.len() {
        return Err(TensorMapError::shape_mismatch(
            "samples (axis 0)",
            samples.len(),
            shape[0],
        ));
    }

    for (i, component) in components.iter().enumerate() {
        if shape[i + 1] != component.len() {
            return Err(TensorMapError::shape_mismatch(
                format!("component '{}' (axis {})", component.names().join(", "), i + 1),
                component.len(),
                shape[i + 1],
            ));
        }
    }

    let last = shape.len() - 1;
    if shape[last] != properties.len() {
        return Err(TensorMapError::shape_mismatch(
            format!("properties (axis {last})"),
            properties.len(),
            shape[last],
        ));
    }

    Ok(())
}

impl<A: Array> TensorBlock<A> {
    /// Create a new block, validating the array shape against the metadata
    ///
    /// # Errors
    ///
    /// - [`TensorMapError::ShapeMismatch`] if the array rank or any axis length
    ///   does not match the labels
    /// - [`TensorMapError::InvalidLabels`] if two component axes share a name
    pub fn new(
        values: A,
        samples: impl Into<Arc<Labels>>,
        components: Vec<impl Into<Arc<Labels>>>,
        properties: impl Into<Arc<Labels>>,
    ) -> Result<Self> {
        let samples = samples.into();
        let components = components.into_iter().map(Into::into).collect::<Vec<_>>();
        let properties = properties.into();

        let mut component_names: Vec<&str> = Vec::new();
        for component in &components {
            for name in component.names() {
                if component_names.contains(&name.as_str()) {
                    return Err(TensorMapError::invalid_labels(format!(
                        "component name '{name}' is used by more than one component axis"
                    )));
                }
                component_names.push(name);
            }
        }

        check_shape(values.shape(), &samples, &components, &properties)?;

        Ok(Self {
            values,
            samples,
            components,
            properties,
            gradients: Vec::new(),
        })
    }

    pub fn values(&self) -> &A {
        &self.values
    }

    pub fn samples(&self) -> &Labels {
        &self.samples
    }

    pub fn components(&self) -> &[Arc<Labels>] {
        &self.components
    }

    pub fn properties(&self) -> &Labels {
        &self.properties
    }

    /// Shared handle on the samples, used when building related blocks
    pub fn samples_arc(&self) -> &Arc<Labels> {
        &self.samples
    }

    /// Shared handle on the properties, used when building related blocks
    pub fn properties_arc(&self) -> &Arc<Labels> {
        &self.properties
    }

    /// Attach a gradient with respect to `parameter`
    ///
    /// # Errors
    ///
    /// Returns [`TensorMapError::GradientMetadata`] if the gradient metadata is
    /// not compatible with this block.
    pub fn add_gradient(&mut self, parameter: &str, gradient: TensorBlock<A>) -> Result<()> {
        if parameter == "values" {
            return Err(TensorMapError::gradient(
                parameter,
                "'values' is reserved and can not be used as a gradient parameter",
            ));
        }

        if self.has_gradient(parameter) {
            return Err(TensorMapError::gradient(
                parameter,
                "a gradient with respect to this parameter already exists",
            ));
        }

        if gradient.values.dtype() != self.values.dtype() {
            return Err(TensorMapError::gradient(
                parameter,
                format!(
                    "the gradient dtype ({}) differs from the values dtype ({})",
                    gradient.values.dtype(),
                    self.values.dtype()
                ),
            ));
        }

        if gradient.samples.names().first().map(String::as_str) != Some("sample") {
            return Err(TensorMapError::gradient(
                parameter,
                format!(
                    "the first name in the gradient samples must be 'sample', got [{}]",
                    gradient.samples.names().join(", ")
                ),
            ));
        }

        let n_samples = self.samples.len();
        for entry in gradient.samples.iter() {
            let sample = entry[0];
            if sample < 0 || sample as usize >= n_samples {
                return Err(TensorMapError::gradient(
                    parameter,
                    format!(
                        "gradient sample {entry:?} refers to sample {sample}, \
                        but the block only has {n_samples} samples"
                    ),
                ));
            }
        }

        if gradient.properties != self.properties {
            return Err(TensorMapError::gradient(
                parameter,
                "the gradient properties must be the same as the values properties",
            ));
        }

        let n_extra = gradient
            .components
            .len()
            .checked_sub(self.components.len())
            .ok_or_else(|| {
                TensorMapError::gradient(
                    parameter,
                    format!(
                        "the gradient has {} components, but the values have {}",
                        gradient.components.len(),
                        self.components.len()
                    ),
                )
            })?;

        if gradient.components[n_extra..] != self.components[..] {
            return Err(TensorMapError::gradient(
                parameter,
                "the last gradient components must be the same as the values components",
            ));
        }

        self.gradients.push((parameter.to_string(), gradient));
        Ok(())
    }

    /// Consuming version of [`TensorBlock::add_gradient`]
    pub fn with_gradient(mut self, parameter: &str, gradient: TensorBlock<A>) -> Result<Self> {
        self.add_gradient(parameter, gradient)?;
        Ok(self)
    }

    pub fn has_gradient(&self, parameter: &str) -> bool {
        self.gradients.iter().any(|(name, _)| name == parameter)
    }

    /// Get the gradient with respect to `parameter`
    ///
    /// # Errors
    ///
    /// Returns [`TensorMapError::NoSuchGradient`] if there is no such gradient.
    pub fn gradient(&self, parameter: &str) -> Result<&TensorBlock<A>> {
        self.gradients
            .iter()
            .find(|(name, _)| name == parameter)
            .map(|(_, gradient)| gradient)
            .ok_or_else(|| TensorMapError::NoSuchGradient(parameter.to_string()))
    }

    /// Gradient parameters, in the order they were added
    pub fn gradients_list(&self) -> Vec<&str> {
        self.gradients.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn gradients(&self) -> impl Iterator<Item = (&str, &TensorBlock<A>)> + '_ {
        self.gradients
            .iter()
            .map(|(name, gradient)| (name.as_str(), gradient))
    }

    /// Same metadata and gradients, new values
    pub(crate) fn with_values(&self, values: A) -> Result<Self> {
        let mut block = TensorBlock::new(
            values,
            Arc::clone(&self.samples),
            self.components.clone(),
            Arc::clone(&self.properties),
        )?;
        block.gradients = self.gradients.clone();
        Ok(block)
    }

    /// Same metadata, new values. Gradient values are produced by `f` too.
    pub(crate) fn map_values(&self, f: &impl Fn(&A) -> Result<A>) -> Result<Self> {
        let mut block = TensorBlock::new(
            f(&self.values)?,
            Arc::clone(&self.samples),
            self.components.clone(),
            Arc::clone(&self.properties),
        )?;
        for (parameter, gradient) in &self.gradients {
            block.add_gradient(parameter, gradient.map_values(f)?)?;
        }
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::DenseArray;

    fn labels(names: &[&str], entries: &[&[i32]]) -> Labels {
        Labels::new(names, entries.iter().map(|e| e.to_vec()).collect()).unwrap()
    }

    fn block() -> TensorBlock<DenseArray<f64>> {
        TensorBlock::new(
            DenseArray::zeros(&[4, 3, 7]),
            labels(&["a", "b"], &[&[0, 0], &[0, 1], &[0, 2], &[3, 2]]),
            vec![labels(&["c"], &[&[-1], &[-2], &[-3]])],
            Labels::range("f", 7).unwrap(),
        )
        .unwrap()
    }

    fn gradient(parent: &TensorBlock<DenseArray<f64>>) -> TensorBlock<DenseArray<f64>> {
        TensorBlock::new(
            DenseArray::zeros(&[3, 3, 7]),
            labels(&["sample", "bar"], &[&[0, 0], &[1, 1], &[3, -2]]),
            parent.components().to_vec(),
            parent.properties_arc().clone(),
        )
        .unwrap()
    }

    #[test]
    fn test_shape_validation() {
        let samples = labels(&["s"], &[&[0], &[1]]);
        let properties = labels(&["p"], &[&[0]]);

        let wrong_samples = TensorBlock::new(
            DenseArray::<f64>::zeros(&[3, 1]),
            samples.clone(),
            Vec::<Labels>::new(),
            properties.clone(),
        );
        match wrong_samples {
            Err(TensorMapError::ShapeMismatch { axis, expected, actual }) => {
                assert!(axis.starts_with("samples"));
                assert_eq!((expected, actual), (2, 3));
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let wrong_rank = TensorBlock::new(
            DenseArray::<f64>::zeros(&[2, 1, 1]),
            samples.clone(),
            Vec::<Labels>::new(),
            properties.clone(),
        );
        assert!(matches!(wrong_rank, Err(TensorMapError::ShapeMismatch { .. })));

        let wrong_properties = TensorBlock::new(
            DenseArray::<f64>::zeros(&[2, 2]),
            samples,
            Vec::<Labels>::new(),
            properties,
        );
        match wrong_properties {
            Err(TensorMapError::ShapeMismatch { axis, .. }) => {
                assert!(axis.starts_with("properties"))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zero_length_axes() {
        let block = TensorBlock::new(
            DenseArray::<f64>::zeros(&[0, 2]),
            Labels::empty(&["s"]).unwrap(),
            Vec::<Labels>::new(),
            Labels::range("p", 2).unwrap(),
        )
        .unwrap();
        assert_eq!(block.samples().len(), 0);
    }

    #[test]
    fn test_duplicated_component_names() {
        let xyz = Labels::range("xyz", 3).unwrap();
        let result = TensorBlock::new(
            DenseArray::<f64>::zeros(&[1, 3, 3, 1]),
            Labels::range("s", 1).unwrap(),
            vec![xyz.clone(), xyz],
            Labels::range("p", 1).unwrap(),
        );
        assert!(matches!(result, Err(TensorMapError::InvalidLabels(_))));
    }

    #[test]
    fn test_gradients() {
        let mut block = block();
        assert!(block.gradients_list().is_empty());

        let grad = gradient(&block);
        block.add_gradient("foo", grad).unwrap();

        assert_eq!(block.gradients_list(), ["foo"]);
        assert!(block.has_gradient("foo"));
        assert!(!block.has_gradient("bar"));

        let foo = block.gradient("foo").unwrap();
        assert_eq!(foo.samples().names(), ["sample", "bar"]);
        assert_eq!(foo.components()[0].names(), ["c"]);
        assert_eq!(foo.properties().names(), ["f"]);

        assert!(matches!(
            block.gradient("bar"),
            Err(TensorMapError::NoSuchGradient(name)) if name == "bar"
        ));
    }

    #[test]
    fn test_gradient_validation() {
        let mut parent = block();

        let duplicated = gradient(&parent);
        parent.add_gradient("foo", duplicated.clone()).unwrap();
        assert!(parent.add_gradient("foo", duplicated.clone()).is_err());
        assert!(parent.add_gradient("values", duplicated).is_err());

        let parent = block();
        let bad_first_name = TensorBlock::new(
            DenseArray::zeros(&[1, 3, 7]),
            labels(&["bar"], &[&[0]]),
            parent.components().to_vec(),
            parent.properties_arc().clone(),
        )
        .unwrap();
        assert!(matches!(
            parent.clone().with_gradient("foo", bad_first_name),
            Err(TensorMapError::GradientMetadata { .. })
        ));

        let out_of_range = TensorBlock::new(
            DenseArray::zeros(&[1, 3, 7]),
            labels(&["sample"], &[&[4]]),
            parent.components().to_vec(),
            parent.properties_arc().clone(),
        )
        .unwrap();
        assert!(parent.clone().with_gradient("foo", out_of_range).is_err());

        let other_properties = TensorBlock::new(
            DenseArray::zeros(&[1, 3, 7]),
            labels(&["sample"], &[&[0]]),
            parent.components().to_vec(),
            Labels::range("g", 7).unwrap(),
        )
        .unwrap();
        assert!(parent.clone().with_gradient("foo", other_properties).is_err());

        let missing_components = TensorBlock::new(
            DenseArray::zeros(&[1, 7]),
            labels(&["sample"], &[&[0]]),
            Vec::<Labels>::new(),
            parent.properties_arc().clone(),
        )
        .unwrap();
        assert!(parent.with_gradient("foo", missing_components).is_err());
    }

    #[test]
    fn test_single_precision_gradient() {
        let parent = TensorBlock::new(
            DenseArray::<f32>::zeros(&[2, 3]),
            Labels::range("s", 2).unwrap(),
            Vec::<Labels>::new(),
            Labels::range("p", 3).unwrap(),
        )
        .unwrap();
        let gradient = TensorBlock::new(
            DenseArray::<f32>::zeros(&[1, 3]),
            labels(&["sample"], &[&[1]]),
            Vec::<Labels>::new(),
            parent.properties_arc().clone(),
        )
        .unwrap();
        let parent = parent.with_gradient("strain", gradient).unwrap();
        assert_eq!(parent.gradients_list(), ["strain"]);
    }

    #[test]
    fn test_gradient_with_extra_components() {
        let parent = block();
        let xyz = Labels::range("xyz", 3).unwrap();
        let mut components = vec![Arc::new(xyz)];
        components.extend(parent.components().iter().cloned());

        let gradient = TensorBlock::new(
            DenseArray::zeros(&[2, 3, 3, 7]),
            labels(&["sample", "atom"], &[&[0, 0], &[0, 1]]),
            components,
            parent.properties_arc().clone(),
        )
        .unwrap();

        let parent = parent.with_gradient("positions", gradient).unwrap();
        assert_eq!(parent.gradient("positions").unwrap().components().len(), 2);
    }
}
