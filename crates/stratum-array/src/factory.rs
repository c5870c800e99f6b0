//! Array construction.
//!
//! [`ArrayFactory`] is the entry point for fresh arrays. Every method
//! allocates new column-major storage and rejects shapes with a zero-sized
//! dimension.

use stratum_core::{Complex, Logical};

use crate::array::{
    Array, BitArray, ComplexArray, DoubleArray, IntArray, LogicalArray, LongArray, StridedArray,
};
use crate::error::{ArrayError, ArrayResult};
use crate::indexer::MajorOrder;
use crate::shape::Shape;
use crate::storage::{Element, ElementAccess};

/// Stateless provider of array constructors.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayFactory;

impl ArrayFactory {
    /// Create a factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    // ------------------------------------------------------------------------
    // From data
    // ------------------------------------------------------------------------

    /// A one-dimensional array copying `data`.
    pub fn array<T: Element>(&self, data: &[T]) -> ArrayResult<Array<T>> {
        Array::from_vec(data.to_vec())
    }

    /// A matrix from row-major nested rows: `rows[i][j]` becomes element
    /// `(i, j)`. All rows must have the same length.
    pub fn array_2d<T, R>(&self, rows: &[R]) -> ArrayResult<Array<T>>
    where
        T: Element,
        R: AsRef<[T]>,
    {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(ragged) = rows.iter().find(|r| r.as_ref().len() != cols) {
            return Err(ArrayError::SizeMismatch {
                expected: cols,
                actual: ragged.as_ref().len(),
            });
        }
        let data = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Array::from_shape_vec_in([rows.len(), cols], data, MajorOrder::RowMajor)
    }

    /// An array of `shape` from `data` listed in `order`.
    pub fn from_vec<T: Element>(
        &self,
        data: Vec<T>,
        shape: impl Into<Shape>,
        order: MajorOrder,
    ) -> ArrayResult<Array<T>> {
        Array::from_shape_vec_in(shape, data, order)
    }

    // ------------------------------------------------------------------------
    // Filled
    // ------------------------------------------------------------------------

    /// An array of `shape` filled with `value`.
    pub fn full<T: Element>(&self, shape: impl Into<Shape>, value: T) -> ArrayResult<Array<T>> {
        Array::filled(shape, value)
    }

    /// An array of `shape` filled with zeros (`false` for bits).
    pub fn zeros<T: Element>(&self, shape: impl Into<Shape>) -> ArrayResult<Array<T>> {
        self.full(shape, T::default())
    }

    /// An array of `shape` filled with ones (`true` for bits).
    pub fn ones<T: Element>(&self, shape: impl Into<Shape>) -> ArrayResult<Array<T>> {
        self.full(shape, T::one())
    }

    /// Zero-filled double array.
    pub fn double_array(&self, shape: impl Into<Shape>) -> ArrayResult<DoubleArray> {
        self.zeros(shape)
    }

    /// Zero-filled int array.
    pub fn int_array(&self, shape: impl Into<Shape>) -> ArrayResult<IntArray> {
        self.zeros(shape)
    }

    /// Zero-filled long array.
    pub fn long_array(&self, shape: impl Into<Shape>) -> ArrayResult<LongArray> {
        self.zeros(shape)
    }

    /// All-false bit array.
    pub fn bit_array(&self, shape: impl Into<Shape>) -> ArrayResult<BitArray> {
        self.zeros(shape)
    }

    /// All-false logical array.
    pub fn logical_array(&self, shape: impl Into<Shape>) -> ArrayResult<LogicalArray> {
        self.full(shape, Logical::False)
    }

    /// Zero-filled complex array.
    pub fn complex_array(&self, shape: impl Into<Shape>) -> ArrayResult<ComplexArray> {
        self.full(shape, Complex::ZERO)
    }

    // ------------------------------------------------------------------------
    // Sequences
    // ------------------------------------------------------------------------

    /// `start, start + step, ...` up to but excluding `end`. A negative step
    /// counts down.
    pub fn range(&self, start: i32, end: i32, step: i32) -> ArrayResult<IntArray> {
        if step == 0 {
            return Err(ArrayError::InvalidArgument(
                "range step must be non-zero".to_string(),
            ));
        }
        let span = i64::from(end) - i64::from(start);
        let step = i64::from(step);
        if span == 0 || (span > 0) != (step > 0) {
            return Err(ArrayError::InvalidArgument(format!(
                "empty range {start}..{end} with step {step}"
            )));
        }
        let count = (span.abs() + step.abs() - 1) / step.abs();
        let data = (0..count)
            .map(|i| (i64::from(start) + i * step) as i32)
            .collect();
        Array::from_vec(data)
    }

    /// `0, 1, ..., end - 1`.
    pub fn range_to(&self, end: i32) -> ArrayResult<IntArray> {
        self.range(0, end, 1)
    }

    /// `n` evenly spaced values from `start` to `end`, both inclusive.
    pub fn linspace(&self, start: f64, end: f64, n: usize) -> ArrayResult<DoubleArray> {
        if n == 0 {
            return Err(ArrayError::InvalidArgument(
                "linspace needs at least one point".to_string(),
            ));
        }
        if n == 1 {
            return Array::from_vec(vec![start]);
        }
        let step = (end - start) / (n - 1) as f64;
        let data = (0..n)
            .map(|i| if i == n - 1 { end } else { start + i as f64 * step })
            .collect();
        Array::from_vec(data)
    }

    // ------------------------------------------------------------------------
    // Matrices
    // ------------------------------------------------------------------------

    /// The `n`-by-`n` identity.
    pub fn eye(&self, n: usize) -> ArrayResult<DoubleArray> {
        self.identity(n)
    }

    /// The `n`-by-`n` identity of any element kind.
    pub fn identity<T: Element>(&self, n: usize) -> ArrayResult<Array<T>> {
        let mut out = self.zeros::<T>([n, n])?;
        out.diagonal_mut()?.assign(T::one());
        Ok(out)
    }

    /// For a vector, the square matrix with that vector on its diagonal.
    /// For a matrix, a copy of its main diagonal.
    pub fn diag<B: ElementAccess>(&self, v: &StridedArray<B>) -> ArrayResult<Array<B::Elem>> {
        if v.is_vector() {
            let n = v.len();
            let mut out = self.zeros::<B::Elem>([n, n])?;
            for (i, x) in v.iter().enumerate() {
                out.set2(i, i, x)?;
            }
            Ok(out)
        } else if v.is_matrix() {
            Ok(v.diagonal()?.copy())
        } else {
            Err(ArrayError::RankMismatch {
                expected: 2,
                actual: v.rank(),
            })
        }
    }
}
