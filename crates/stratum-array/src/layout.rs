//! Shape, stride and offset of an array over its storage.
//!
//! Every view-producing operation is a pure function from one [`Layout`] to
//! another; the storage is never touched.

use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use serde::{Deserialize, Serialize};

use crate::error::{ArrayError, ArrayResult};
use crate::indexer::{self, MajorOrder};
use crate::shape::{Dims, Shape};

// ============================================================================
// Slice ranges
// ============================================================================

/// A strided range along one dimension: `start, start + step, ...` below `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SliceRange {
    /// First index, inclusive.
    pub start: usize,
    /// Last index, exclusive. `None` means the end of the dimension.
    pub end: Option<usize>,
    /// Distance between selected indices. Must be positive.
    pub step: usize,
}

impl SliceRange {
    /// The whole dimension.
    #[must_use]
    pub const fn full() -> Self {
        Self {
            start: 0,
            end: None,
            step: 1,
        }
    }

    /// `start..end` with unit step.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
            step: 1,
        }
    }

    /// A single index, keeping the dimension with size one. An index no
    /// dimension can hold fails when the slice is resolved.
    #[must_use]
    pub const fn index(i: usize) -> Self {
        match i.checked_add(1) {
            Some(end) => Self::new(i, end),
            None => Self {
                start: i,
                end: None,
                step: 1,
            },
        }
    }

    /// This range with a different step.
    #[must_use]
    pub const fn step_by(self, step: usize) -> Self {
        Self { step, ..self }
    }

    /// Resolves against a dimension of size `n`, returning `(start, len)`.
    fn resolve(&self, n: usize) -> ArrayResult<(usize, usize)> {
        if self.step == 0 {
            return Err(ArrayError::InvalidArgument(
                "slice step must be positive".to_string(),
            ));
        }
        if self.start >= n {
            return Err(ArrayError::IndexOutOfBounds {
                index: self.start,
                bound: n,
            });
        }
        let end = self.end.unwrap_or(n);
        if end > n {
            return Err(ArrayError::IndexOutOfBounds {
                index: end,
                bound: n + 1,
            });
        }
        if self.start >= end {
            return Err(ArrayError::InvalidArgument(format!(
                "empty slice {}..{}",
                self.start, end
            )));
        }
        Ok((self.start, (end - self.start).div_ceil(self.step)))
    }
}

impl From<Range<usize>> for SliceRange {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl From<RangeFrom<usize>> for SliceRange {
    fn from(r: RangeFrom<usize>) -> Self {
        Self {
            start: r.start,
            end: None,
            step: 1,
        }
    }
}

impl From<RangeTo<usize>> for SliceRange {
    fn from(r: RangeTo<usize>) -> Self {
        Self::new(0, r.end)
    }
}

impl From<RangeFull> for SliceRange {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

// ============================================================================
// Layout
// ============================================================================

/// How a logical N-d array maps onto a flat buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    stride: Dims,
    offset: usize,
}

impl Layout {
    /// Dense column-major layout starting at offset zero.
    #[must_use]
    pub fn contiguous(shape: Shape) -> Self {
        Self::with_order(shape, MajorOrder::ColumnMajor)
    }

    /// Dense layout in the given order.
    #[must_use]
    pub fn with_order(shape: Shape, order: MajorOrder) -> Self {
        let stride = indexer::strides(shape.dims(), order);
        Self {
            shape,
            stride,
            offset: 0,
        }
    }

    /// Layout from raw parts. The caller guarantees `stride.len() == shape.rank()`.
    pub(crate) fn from_parts(shape: Shape, stride: Dims, offset: usize) -> Self {
        debug_assert_eq!(shape.rank(), stride.len());
        Self {
            shape,
            stride,
            offset,
        }
    }

    /// The logical shape.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Physical distance between neighbours along each dimension.
    #[inline]
    pub fn stride(&self) -> &[usize] {
        &self.stride
    }

    /// Physical position of the first element.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.num_elements()
    }

    /// True if the layout addresses no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if logical column-major order is a dense run of the storage, so
    /// the layout can be reshaped without copying. Strides of size-one
    /// dimensions are irrelevant and ignored.
    pub fn is_contiguous(&self) -> bool {
        let mut expected = 1;
        for (&n, &s) in self.shape.dims().iter().zip(&self.stride) {
            if n != 1 && s != expected {
                return false;
            }
            expected *= n;
        }
        true
    }

    /// Physical offset of the `flat`-th element in column-major order.
    #[inline]
    pub fn physical(&self, flat: usize) -> usize {
        indexer::linearize(flat, self.offset, self.shape.dims(), &self.stride)
    }

    /// Physical offset of the `flat`-th element in the given order.
    #[inline]
    pub fn physical_in(&self, flat: usize, order: MajorOrder) -> usize {
        match order {
            MajorOrder::ColumnMajor => self.physical(flat),
            MajorOrder::RowMajor => {
                indexer::linearize_row_major(flat, self.offset, self.shape.dims(), &self.stride)
            }
        }
    }

    /// Bounds-checked physical offset of a multi-index.
    pub fn physical_at(&self, index: &[usize]) -> ArrayResult<usize> {
        if index.len() != self.rank() {
            return Err(ArrayError::RankMismatch {
                expected: self.rank(),
                actual: index.len(),
            });
        }
        if index.iter().zip(self.shape.dims()).any(|(&i, &n)| i >= n) {
            return Err(ArrayError::MultiIndexOutOfBounds {
                index: index.to_vec(),
                shape: self.shape.clone(),
            });
        }
        Ok(indexer::offset_of(self.offset, index, &self.stride))
    }

    /// Bounds-checked physical offset of a flat index.
    pub fn physical_checked(&self, flat: usize) -> ArrayResult<usize> {
        let bound = self.len();
        if flat >= bound {
            return Err(ArrayError::IndexOutOfBounds { index: flat, bound });
        }
        Ok(self.physical(flat))
    }

    /// One past the largest physical offset this layout can reach.
    pub fn extent(&self) -> usize {
        if self.is_empty() {
            return self.offset;
        }
        self.shape
            .dims()
            .iter()
            .zip(&self.stride)
            .fold(self.offset, |acc, (&n, &s)| acc + (n - 1) * s)
            + 1
    }

    fn check_axis(&self, axis: usize) -> ArrayResult<()> {
        if axis >= self.rank() {
            return Err(ArrayError::AxisOutOfBounds {
                axis,
                rank: self.rank(),
            });
        }
        Ok(())
    }

    /// Axes in reverse order.
    #[must_use]
    pub fn transposed(&self) -> Layout {
        Self::from_parts(
            self.shape.reversed(),
            self.stride.iter().rev().copied().collect(),
            self.offset,
        )
    }

    /// Axes reordered so that new axis `d` is old axis `axes[d]`.
    pub fn permuted(&self, axes: &[usize]) -> ArrayResult<Layout> {
        let rank = self.rank();
        let mut seen = Dims::from_elem(0, rank);
        if axes.len() != rank {
            return Err(ArrayError::InvalidPermutation(axes.to_vec()));
        }
        for &a in axes {
            if a >= rank || seen[a] == 1 {
                return Err(ArrayError::InvalidPermutation(axes.to_vec()));
            }
            seen[a] = 1;
        }
        Ok(Self::from_parts(
            Shape::new(axes.iter().map(|&a| self.shape[a])),
            axes.iter().map(|&a| self.stride[a]).collect(),
            self.offset,
        ))
    }

    /// Sub-layout selected by one range per leading dimension. Dimensions
    /// without a range are kept whole.
    pub fn sliced(&self, ranges: &[SliceRange]) -> ArrayResult<Layout> {
        if ranges.len() > self.rank() {
            return Err(ArrayError::RankMismatch {
                expected: self.rank(),
                actual: ranges.len(),
            });
        }
        let mut dims = Dims::from(self.shape.dims());
        let mut stride = self.stride.clone();
        let mut offset = self.offset;
        for (d, range) in ranges.iter().enumerate() {
            let (start, len) = range.resolve(dims[d])?;
            offset += start * stride[d];
            dims[d] = len;
            stride[d] *= range.step;
        }
        Ok(Self::from_parts(Shape::new(dims), stride, offset))
    }

    /// Fixes `axis` at `index`, dropping that dimension.
    pub fn selected(&self, axis: usize, index: usize) -> ArrayResult<Layout> {
        self.check_axis(axis)?;
        let bound = self.shape[axis];
        if index >= bound {
            return Err(ArrayError::IndexOutOfBounds { index, bound });
        }
        Ok(Self::from_parts(
            self.shape.without(axis),
            self.stride
                .iter()
                .enumerate()
                .filter(|&(d, _)| d != axis)
                .map(|(_, &s)| s)
                .collect(),
            self.offset + index * self.stride[axis],
        ))
    }

    /// The main diagonal of a matrix layout.
    pub fn diagonal(&self) -> ArrayResult<Layout> {
        if self.rank() != 2 {
            return Err(ArrayError::RankMismatch {
                expected: 2,
                actual: self.rank(),
            });
        }
        let len = self.shape[0].min(self.shape[1]);
        Ok(Self::from_parts(
            Shape::vector(len),
            Dims::from_elem(self.stride[0] + self.stride[1], 1),
            self.offset,
        ))
    }

    /// Number of one-dimensional vectors along `axis`.
    pub fn vector_count(&self, axis: usize) -> ArrayResult<usize> {
        self.check_axis(axis)?;
        Ok(self.len() / self.shape[axis])
    }

    /// The `index`-th vector running along `axis`. Vectors are enumerated in
    /// column-major order over the remaining dimensions, so for a matrix
    /// `vector(0, j)` is column `j` and `vector(1, i)` is row `i`.
    pub fn vector(&self, axis: usize, index: usize) -> ArrayResult<Layout> {
        let bound = self.vector_count(axis)?;
        if index >= bound {
            return Err(ArrayError::IndexOutOfBounds { index, bound });
        }
        Ok(self.vector_unchecked(axis, index))
    }

    /// [`vector`](Self::vector) for an axis and index already validated.
    pub(crate) fn vector_unchecked(&self, axis: usize, index: usize) -> Layout {
        let mut offset = self.offset;
        let mut rem = index;
        for d in (0..self.rank()).filter(|&d| d != axis) {
            let n = self.shape[d];
            offset += (rem % n) * self.stride[d];
            rem /= n;
        }
        Self::from_parts(
            Shape::vector(self.shape[axis]),
            Dims::from_elem(self.stride[axis], 1),
            offset,
        )
    }

    /// The same elements under a new shape. Requires a contiguous layout
    /// and an equal element count.
    pub fn reshaped(&self, shape: Shape) -> ArrayResult<Layout> {
        if shape.num_elements() != self.len() {
            return Err(ArrayError::SizeMismatch {
                expected: self.len(),
                actual: shape.num_elements(),
            });
        }
        if !self.is_contiguous() {
            return Err(ArrayError::NotContiguous {
                shape: self.shape.clone(),
                stride: self.stride.to_vec(),
            });
        }
        let stride = indexer::column_major_strides(shape.dims());
        Ok(Self::from_parts(shape, stride, self.offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: usize, cols: usize) -> Layout {
        Layout::contiguous(Shape::matrix(rows, cols))
    }

    #[test]
    fn test_contiguous_and_transposed() {
        let l = matrix(2, 3);
        assert!(l.is_contiguous());
        let t = l.transposed();
        assert_eq!(t.shape(), &Shape::matrix(3, 2));
        assert_eq!(t.stride(), &[2, 1]);
        assert!(!t.is_contiguous());
        assert_eq!(t.transposed(), l);
    }

    #[test]
    fn test_size_one_dims_stay_contiguous() {
        let column = matrix(3, 1);
        assert!(column.transposed().is_contiguous());
    }

    #[test]
    fn test_physical_at() {
        let l = matrix(2, 3);
        assert_eq!(l.physical_at(&[0, 1]).unwrap(), 2);
        assert!(matches!(
            l.physical_at(&[2, 0]),
            Err(ArrayError::MultiIndexOutOfBounds { .. })
        ));
        assert!(matches!(
            l.physical_at(&[0]),
            Err(ArrayError::RankMismatch { .. })
        ));
    }

    #[test]
    fn test_sliced_with_step() {
        let l = Layout::contiguous(Shape::vector(10));
        let s = l.sliced(&[SliceRange::new(1, 8).step_by(3)]).unwrap();
        assert_eq!(s.shape(), &Shape::vector(3));
        let phys: Vec<usize> = (0..3).map(|i| s.physical(i)).collect();
        assert_eq!(phys, vec![1, 4, 7]);
    }

    #[test]
    fn test_sliced_rejects_bad_ranges() {
        let l = matrix(2, 3);
        assert!(l.sliced(&[SliceRange::new(0, 3)]).is_err());
        assert!(l.sliced(&[SliceRange::new(1, 1)]).is_err());
        assert!(l.sliced(&[SliceRange::full().step_by(0)]).is_err());
    }

    #[test]
    fn test_index_at_usize_max_is_out_of_bounds() {
        let l = matrix(2, 3);
        let err = l
            .sliced(&[SliceRange::index(usize::MAX), SliceRange::full()])
            .unwrap_err();
        assert_eq!(
            err,
            ArrayError::IndexOutOfBounds {
                index: usize::MAX,
                bound: 2,
            }
        );
        let row = l.sliced(&[SliceRange::index(1), SliceRange::full()]).unwrap();
        assert_eq!(row.shape(), &Shape::matrix(1, 3));
    }

    #[test]
    fn test_selected_drops_axis() {
        let l = matrix(2, 3);
        let row = l.selected(0, 1).unwrap();
        assert_eq!(row.shape(), &Shape::vector(3));
        assert_eq!(row.offset(), 1);
        assert_eq!(row.stride(), &[2]);
    }

    #[test]
    fn test_diagonal() {
        let d = matrix(3, 3).diagonal().unwrap();
        let phys: Vec<usize> = (0..3).map(|i| d.physical(i)).collect();
        assert_eq!(phys, vec![0, 4, 8]);
    }

    #[test]
    fn test_vector_along_axis() {
        let l = matrix(2, 3);
        assert_eq!(l.vector_count(0).unwrap(), 3);
        let col = l.vector(0, 2).unwrap();
        assert_eq!(col.offset(), 4);
        let row = l.vector(1, 1).unwrap();
        assert_eq!(row.offset(), 1);
        assert_eq!(row.stride(), &[2]);
    }

    #[test]
    fn test_reshaped_requires_contiguous() {
        let l = matrix(2, 3);
        assert!(l.reshaped(Shape::vector(6)).is_ok());
        assert!(matches!(
            l.transposed().reshaped(Shape::vector(6)),
            Err(ArrayError::NotContiguous { .. })
        ));
        assert!(matches!(
            l.reshaped(Shape::vector(5)),
            Err(ArrayError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn test_permuted_validates() {
        let l = Layout::contiguous(Shape::new([2, 3, 4]));
        let p = l.permuted(&[2, 0, 1]).unwrap();
        assert_eq!(p.shape(), &Shape::new([4, 2, 3]));
        assert_eq!(p.stride(), &[6, 1, 2]);
        assert!(l.permuted(&[0, 0, 1]).is_err());
        assert!(l.permuted(&[0, 1]).is_err());
    }

    #[test]
    fn test_extent() {
        assert_eq!(matrix(2, 3).extent(), 6);
        assert_eq!(matrix(3, 3).diagonal().unwrap().extent(), 9);
    }
}
