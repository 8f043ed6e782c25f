//! Array capability interface and the dense backend
//!
//! Blocks never touch a concrete array library directly. They only rely on the
//! [`Array`] trait, which exposes the handful of capabilities metadata
//! operations need: shape and dtype introspection, gathering entries along an
//! axis, comparison, and a few element-wise updates used by arithmetic
//! operations.
//!
//! [`DenseArray`] binds that interface to scirs2_core's dynamic-dimension
//! ndarray, for `f32` and `f64` elements.
//!
//! # Examples
//!
//! ```
//! use tenmap_core::{Array, DType, DenseArray};
//!
//! let array = DenseArray::<f64>::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
//! assert_eq!(array.shape(), &[2, 2]);
//! assert_eq!(array.dtype(), DType::F64);
//!
//! let second = array.select(0, &[1]).unwrap();
//! assert_eq!(second.to_vec(), vec![3.0, 4.0]);
//! ```

use std::fmt;

use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
use scirs2_core::numeric::Float;

use crate::error::{Result, TensorMapError};

/// Element type of a value array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    F32,
    F64,
}

impl DType {
    /// Human readable name of this dtype
    pub fn name(&self) -> &'static str {
        match self {
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Minimal set of array capabilities used by blocks and tensor maps.
///
/// Implementations are value types: every method returns a new array and
/// never mutates `self`.
pub trait Array: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Shape of the array
    fn shape(&self) -> &[usize];

    /// Element type of the array
    fn dtype(&self) -> DType;

    /// Gather entries along `axis`. Indices may repeat and may come in any
    /// order; an empty list produces a zero-length axis.
    fn select(&self, axis: usize, indices: &[usize]) -> Result<Self>;

    /// Create a new array filled with zeros, with the same dtype as `self`
    fn zeros(&self, shape: &[usize]) -> Self;

    /// Approximate equality, `false` if shapes differ
    fn allclose(&self, other: &Self, rtol: f64, atol: f64) -> bool;

    /// Element-wise sum of two arrays with the same shape
    fn add(&self, other: &Self) -> Result<Self>;

    fn add_scalar(&self, value: f64) -> Self;

    fn mul_scalar(&self, value: f64) -> Self;
}

/// Floating point element types supported by [`DenseArray`]
pub trait Element: Float + fmt::Debug + Send + Sync + 'static {
    const DTYPE: DType;

    /// Widen to `f64`
    fn widen(self) -> f64;

    /// Narrow from `f64`
    fn narrow(value: f64) -> Self;
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    fn widen(self) -> f64 {
        f64::from(self)
    }

    fn narrow(value: f64) -> Self {
        value as f32
    }
}

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    fn widen(self) -> f64 {
        self
    }

    fn narrow(value: f64) -> Self {
        value
    }
}

/// Dense N-dimensional array backed by scirs2_core's ndarray
#[derive(Clone, Debug, PartialEq)]
pub struct DenseArray<T> {
    data: ArrayD<T>,
}

impl<T: Element> DenseArray<T> {
    /// Wrap an existing dynamic-dimension array
    pub fn from_array(data: ArrayD<T>) -> Self {
        Self { data }
    }

    /// Create an array from row-major data and a shape
    ///
    /// Fails with [`TensorMapError::Validation`] if the number of elements
    /// described by `shape` overflows `usize`.
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> Result<Self> {
        let expected = shape
            .iter()
            .try_fold(1usize, |acc, &s| acc.checked_mul(s))
            .ok_or_else(|| {
                TensorMapError::validation(format!("array shape {shape:?} is too large"))
            })?;
        if expected != data.len() {
            return Err(TensorMapError::LengthMismatch {
                what: "array elements",
                expected,
                actual: data.len(),
            });
        }

        let data = ArrayD::from_shape_vec(IxDyn(shape), data)
            .map_err(|e| TensorMapError::validation(format!("invalid array shape: {e}")))?;
        Ok(Self { data })
    }

    /// Create a 2-dimensional array from nested rows
    ///
    /// All rows must have the same length. An empty slice creates a `(0, 0)`
    /// array.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let n_columns = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * n_columns);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_columns {
                return Err(TensorMapError::shape_mismatch(
                    format!("row {i}"),
                    n_columns,
                    row.len(),
                ));
            }
            data.extend_from_slice(row);
        }
        Self::from_shape_vec(&[rows.len(), n_columns], data)
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), T::zero()),
        }
    }

    pub fn from_elem(shape: &[usize], value: T) -> Self {
        Self {
            data: ArrayD::from_elem(IxDyn(shape), value),
        }
    }

    /// Random values uniformly distributed in `[low, high)`
    ///
    /// Uses scirs2_core::random for the RNG.
    pub fn random_uniform(shape: &[usize], low: f64, high: f64) -> Self {
        use scirs2_core::random::quick::random_f64;

        let total: usize = shape.iter().product();
        let range = high - low;
        let data = (0..total)
            .map(|_| T::narrow(low + random_f64() * range))
            .collect::<Vec<_>>();

        let data = ArrayD::from_shape_vec(IxDyn(shape), data)
            .unwrap_or_else(|_| ArrayD::from_elem(IxDyn(shape), T::zero()));
        Self { data }
    }

    pub fn as_array(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn into_array(self) -> ArrayD<T> {
        self.data
    }

    /// Copy the values in row-major (logical) order
    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn map(&self, f: impl Fn(T) -> T) -> Self {
        Self {
            data: self.data.mapv(f),
        }
    }
}

impl<T: Element> Array for DenseArray<T> {
    fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    fn dtype(&self) -> DType {
        T::DTYPE
    }

    fn select(&self, axis: usize, indices: &[usize]) -> Result<Self> {
        let shape = self.data.shape();
        if axis >= shape.len() {
            return Err(TensorMapError::IndexOutOfRange {
                index: axis,
                len: shape.len(),
                what: "array axes",
            });
        }

        let axis_len = shape[axis];
        if let Some(&bad) = indices.iter().find(|&&i| i >= axis_len) {
            return Err(TensorMapError::IndexOutOfRange {
                index: bad,
                len: axis_len,
                what: "entries along the selected axis",
            });
        }

        let outer: usize = shape[..axis].iter().product();
        let inner: usize = shape[axis + 1..].iter().product();
        let flat = self.to_vec();

        let mut data = Vec::with_capacity(outer * indices.len() * inner);
        for o in 0..outer {
            for &i in indices {
                let start = (o * axis_len + i) * inner;
                data.extend_from_slice(&flat[start..start + inner]);
            }
        }

        let mut new_shape = shape.to_vec();
        new_shape[axis] = indices.len();
        Self::from_shape_vec(&new_shape, data)
    }

    fn zeros(&self, shape: &[usize]) -> Self {
        DenseArray::zeros(shape)
    }

    fn allclose(&self, other: &Self, rtol: f64, atol: f64) -> bool {
        if self.shape() != other.shape() {
            return false;
        }

        self.data.iter().zip(other.data.iter()).all(|(&a, &b)| {
            let (a, b) = (a.widen(), b.widen());
            (a - b).abs() <= atol + rtol * b.abs()
        })
    }

    fn add(&self, other: &Self) -> Result<Self> {
        if self.shape() != other.shape() {
            let axis = self
                .shape()
                .iter()
                .zip(other.shape())
                .position(|(a, b)| a != b)
                .unwrap_or(0);
            return Err(TensorMapError::shape_mismatch(
                format!("array axis {axis} (shapes {:?} and {:?})", self.shape(), other.shape()),
                self.shape().get(axis).copied().unwrap_or(0),
                other.shape().get(axis).copied().unwrap_or(0),
            ));
        }

        let data = self
            .data
            .iter()
            .zip(other.data.iter())
            .map(|(&a, &b)| a + b)
            .collect::<Vec<_>>();
        Self::from_shape_vec(self.shape(), data)
    }

    fn add_scalar(&self, value: f64) -> Self {
        let value = T::narrow(value);
        self.map(|x| x + value)
    }

    fn mul_scalar(&self, value: f64) -> Self {
        let value = T::narrow(value);
        self.map(|x| x * value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arange(shape: &[usize]) -> DenseArray<f64> {
        let total: usize = shape.iter().product();
        DenseArray::from_shape_vec(shape, (0..total).map(|x| x as f64).collect()).unwrap()
    }

    #[test]
    fn test_dtype() {
        assert_eq!(DenseArray::<f32>::zeros(&[2]).dtype(), DType::F32);
        assert_eq!(DenseArray::<f64>::zeros(&[2]).dtype(), DType::F64);
        assert_eq!(DType::F64.to_string(), "float64");
    }

    #[test]
    fn test_from_shape_vec_length_mismatch() {
        let result = DenseArray::<f64>::from_shape_vec(&[2, 3], vec![0.0; 5]);
        assert!(matches!(
            result,
            Err(TensorMapError::LengthMismatch {
                expected: 6,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_from_shape_vec_overflow() {
        let result = DenseArray::<f64>::from_shape_vec(&[usize::MAX, 2], vec![]);
        assert!(matches!(result, Err(TensorMapError::Validation(_))));
    }

    #[test]
    fn test_from_rows_ragged() {
        let result = DenseArray::<f64>::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(TensorMapError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_select_first_axis() {
        let array = arange(&[3, 2]);
        let selected = array.select(0, &[2, 0, 2]).unwrap();
        assert_eq!(selected.shape(), &[3, 2]);
        assert_eq!(selected.to_vec(), vec![4.0, 5.0, 0.0, 1.0, 4.0, 5.0]);
    }

    #[test]
    fn test_select_last_axis() {
        let array = arange(&[2, 2, 3]);
        let selected = array.select(2, &[1]).unwrap();
        assert_eq!(selected.shape(), &[2, 2, 1]);
        assert_eq!(selected.to_vec(), vec![1.0, 4.0, 7.0, 10.0]);
    }

    #[test]
    fn test_select_empty() {
        let array = arange(&[3, 2]);
        let selected = array.select(0, &[]).unwrap();
        assert_eq!(selected.shape(), &[0, 2]);
        assert!(selected.is_empty());
    }

    #[test]
    fn test_select_out_of_range() {
        let array = arange(&[3, 2]);
        assert!(array.select(0, &[3]).is_err());
        assert!(array.select(2, &[0]).is_err());
    }

    #[test]
    fn test_arithmetic() {
        let array = arange(&[2, 2]);
        let doubled = array.add(&array).unwrap();
        assert_eq!(doubled, array.mul_scalar(2.0));
        assert_eq!(array.add_scalar(1.0).to_vec(), vec![1.0, 2.0, 3.0, 4.0]);

        let other = arange(&[4, 1]);
        assert!(array.add(&other).is_err());
    }

    #[test]
    fn test_allclose() {
        let a = arange(&[2, 2]);
        let b = a.add_scalar(1e-12);
        assert!(a.allclose(&b, 1e-9, 1e-9));
        assert!(!a.allclose(&a.add_scalar(1.0), 1e-9, 1e-9));
        assert!(!a.allclose(&arange(&[4]), 1e-9, 1e-9));
    }

    #[test]
    fn test_random_uniform_range() {
        let array = DenseArray::<f32>::random_uniform(&[4, 5], -1.0, 1.0);
        assert_eq!(array.shape(), &[4, 5]);
        assert!(array.to_vec().iter().all(|&x| (-1.0..1.0).contains(&x)));
    }
}
