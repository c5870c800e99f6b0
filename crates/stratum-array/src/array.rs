//! Strided arrays and zero-copy views.
//!
//! [`StridedArray`] pairs a [`Layout`] with a buffer implementing
//! [`ElementAccess`]. The buffer decides ownership:
//!
//! | Alias | Buffer | Produced by |
//! |-------|--------|-------------|
//! | [`Array<T>`] | [`Storage<T>`] | [`crate::ArrayFactory`], `copy`, `map` |
//! | [`ArrayView<'a, T>`] | `&'a [T]` | `view`, `slice`, `transpose`, ... |
//! | [`ArrayViewMut<'a, T>`] | `&'a mut [T]` | `view_mut`, `slice_mut`, ... |
//!
//! Views share their parent's storage, so writes through a mutable view are
//! visible through the parent once the view is dropped. The borrow checker
//! rules out a second writer while a mutable view is alive.

use std::ops::{Index, IndexMut};

use stratum_core::{Complex, FromNa, Logical};

use crate::error::{ArrayError, ArrayResult};
use crate::indexer::MajorOrder;
use crate::layout::{Layout, SliceRange};
use crate::shape::Shape;
use crate::storage::{Element, ElementAccess, ElementAccessMut, Storage};

/// An N-dimensional strided array over a buffer `B`.
#[derive(Clone, Debug)]
pub struct StridedArray<B> {
    layout: Layout,
    data: B,
}

/// An array that owns its storage.
pub type Array<T> = StridedArray<Storage<T>>;

/// A read-only view borrowing another array's storage.
pub type ArrayView<'a, T> = StridedArray<&'a [T]>;

/// A mutable view borrowing another array's storage.
pub type ArrayViewMut<'a, T> = StridedArray<&'a mut [T]>;

/// Owned array of doubles.
pub type DoubleArray = Array<f64>;

/// Owned array of 32-bit integers.
pub type IntArray = Array<i32>;

/// Owned array of 64-bit integers.
pub type LongArray = Array<i64>;

/// Owned array of bits.
pub type BitArray = Array<bool>;

/// Owned array of three-valued logicals.
pub type LogicalArray = Array<Logical>;

/// Owned array of complex numbers.
pub type ComplexArray = Array<Complex>;

// ============================================================================
// Read access
// ============================================================================

impl<B: ElementAccess> StridedArray<B> {
    /// Wrap `data` with `layout`, checking that every addressable element
    /// lies inside the buffer.
    pub fn new(layout: Layout, data: B) -> ArrayResult<Self> {
        let extent = layout.extent();
        let bound = data.storage_len();
        if extent > bound {
            return Err(ArrayError::IndexOutOfBounds {
                index: extent - 1,
                bound,
            });
        }
        Ok(Self { layout, data })
    }

    fn derive(&self, layout: Layout) -> ArrayView<'_, B::Elem> {
        StridedArray {
            layout,
            data: self.data.as_slice(),
        }
    }

    /// The layout over the backing storage.
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The logical shape.
    #[inline]
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// Per-dimension strides.
    #[inline]
    pub fn stride(&self) -> &[usize] {
        self.layout.stride()
    }

    /// Position of the first element in the backing storage.
    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.layout.rank()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.layout.len()
    }

    /// True if the array has no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    /// Size of dimension `axis`.
    #[inline]
    pub fn size(&self, axis: usize) -> Option<usize> {
        self.shape().dim(axis)
    }

    /// Size of the first dimension, or one for a scalar.
    pub fn rows(&self) -> usize {
        self.size(0).unwrap_or(1)
    }

    /// Size of the second dimension, or one below rank two.
    pub fn columns(&self) -> usize {
        self.size(1).unwrap_or(1)
    }

    /// True for rank one, or a matrix with a single row or column.
    pub fn is_vector(&self) -> bool {
        match self.rank() {
            1 => true,
            2 => self.rows() == 1 || self.columns() == 1,
            _ => false,
        }
    }

    /// True for rank two.
    pub fn is_matrix(&self) -> bool {
        self.rank() == 2
    }

    /// True for a matrix with as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.is_matrix() && self.rows() == self.columns()
    }

    /// True if this array borrows another array's storage.
    #[inline]
    pub fn is_view(&self) -> bool {
        !B::OWNS_STORAGE
    }

    /// True if the elements form a dense column-major run, so that
    /// [`reshape`](Self::reshape) can succeed without copying.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Element at column-major position `flat`.
    pub fn get(&self, flat: usize) -> ArrayResult<B::Elem> {
        let physical = self.layout.physical_checked(flat)?;
        Ok(self.data.get_element(physical))
    }

    /// Element at a multi-index.
    pub fn get_at(&self, index: &[usize]) -> ArrayResult<B::Elem> {
        let physical = self.layout.physical_at(index)?;
        Ok(self.data.get_element(physical))
    }

    /// Element at row `i`, column `j` of a matrix.
    pub fn get2(&self, i: usize, j: usize) -> ArrayResult<B::Elem> {
        self.get_at(&[i, j])
    }

    /// True if any element is NA.
    pub fn has_missing(&self) -> bool {
        self.iter().any(Element::is_missing)
    }

    /// Elements in column-major order.
    pub fn iter(&self) -> impl Iterator<Item = B::Elem> + '_ {
        self.iter_in(MajorOrder::ColumnMajor)
    }

    /// Elements in the given order.
    pub fn iter_in(&self, order: MajorOrder) -> impl Iterator<Item = B::Elem> + '_ {
        let data = self.data.as_slice();
        let layout = &self.layout;
        (0..layout.len()).map(move |i| data[layout.physical_in(i, order)])
    }

    /// Elements collected in column-major order.
    pub fn to_vec(&self) -> Vec<B::Elem> {
        self.iter().collect()
    }

    /// Elements collected in the given order.
    pub fn to_vec_in(&self, order: MajorOrder) -> Vec<B::Elem> {
        self.iter_in(order).collect()
    }

    /// A fresh, dense, column-major copy. Always allocates.
    pub fn copy(&self) -> Array<B::Elem> {
        StridedArray {
            layout: Layout::contiguous(self.shape().clone()),
            data: Storage::from_vec(self.to_vec()),
        }
    }

    // ------------------------------------------------------------------------
    // Copying selections
    // ------------------------------------------------------------------------

    /// The elements whose `mask` entry is set, in column-major order, as a
    /// new one-dimensional array. `mask` must have this array's shape, and
    /// must select at least one element since arrays are never empty.
    pub fn select_mask<M>(&self, mask: &StridedArray<M>) -> ArrayResult<Array<B::Elem>>
    where
        M: ElementAccess,
        M::Elem: MaskElement,
    {
        self.check_conformant("select_mask", mask)?;
        let data: Vec<B::Elem> = self
            .iter()
            .zip(mask.iter())
            .filter_map(|(v, m)| m.selects().then_some(v))
            .collect();
        if data.is_empty() {
            return Err(ArrayError::InvalidShape {
                shape: Shape::vector(0),
                reason: "mask selects no elements",
            });
        }
        Array::from_vec(data)
    }

    /// Advanced indexing: one index list per leading dimension, all of the
    /// same length `m`. Entry `j` of the result along its first axis is
    /// this array at `(indices[0][j], indices[1][j], ...)`, with the
    /// remaining dimensions kept whole. The result has shape
    /// `[m, dims[k..]...]` for `k` index lists and is a copy.
    pub fn take<I: AsRef<[usize]>>(&self, indices: &[I]) -> ArrayResult<Array<B::Elem>> {
        let k = indices.len();
        if k == 0 || k > self.rank() {
            return Err(ArrayError::InvalidArgument(format!(
                "expected between 1 and {} index lists, got {k}",
                self.rank()
            )));
        }
        let m = indices[0].as_ref().len();
        let dims = self.shape().dims();
        for (axis, list) in indices.iter().enumerate() {
            let list = list.as_ref();
            if list.len() != m {
                return Err(ArrayError::SizeMismatch {
                    expected: m,
                    actual: list.len(),
                });
            }
            if let Some(&index) = list.iter().find(|&&i| i >= dims[axis]) {
                return Err(ArrayError::IndexOutOfBounds {
                    index,
                    bound: dims[axis],
                });
            }
        }
        let trailing = &dims[k..];
        let shape = Shape::new(std::iter::once(m).chain(trailing.iter().copied()));
        shape.validate()?;
        let inner: usize = trailing.iter().product();
        let mut at = vec![0; dims.len()];
        let mut data = Vec::with_capacity(m * inner);
        for t in 0..inner {
            crate::indexer::unravel_into(t, trailing, &mut at[k..]);
            for j in 0..m {
                for (slot, list) in at.iter_mut().zip(indices) {
                    *slot = list.as_ref()[j];
                }
                data.push(self.get_at(&at)?);
            }
        }
        Array::from_shape_vec(shape, data)
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    /// A read-only view of the whole array.
    pub fn view(&self) -> ArrayView<'_, B::Elem> {
        self.derive(self.layout.clone())
    }

    /// View with the axes reversed.
    pub fn transpose(&self) -> ArrayView<'_, B::Elem> {
        self.derive(self.layout.transposed())
    }

    /// View with axes reordered so that new axis `d` is old axis `axes[d]`.
    pub fn permute(&self, axes: &[usize]) -> ArrayResult<ArrayView<'_, B::Elem>> {
        Ok(self.derive(self.layout.permuted(axes)?))
    }

    /// View of a strided sub-range. Trailing dimensions without a range are
    /// kept whole.
    pub fn slice(&self, ranges: &[SliceRange]) -> ArrayResult<ArrayView<'_, B::Elem>> {
        Ok(self.derive(self.layout.sliced(ranges)?))
    }

    /// View with `axis` fixed at `index`; the rank drops by one.
    pub fn select(&self, axis: usize, index: usize) -> ArrayResult<ArrayView<'_, B::Elem>> {
        Ok(self.derive(self.layout.selected(axis, index)?))
    }

    /// Row `i` of a matrix.
    pub fn row(&self, i: usize) -> ArrayResult<ArrayView<'_, B::Elem>> {
        self.require_matrix()?;
        self.select(0, i)
    }

    /// Column `j` of a matrix.
    pub fn column(&self, j: usize) -> ArrayResult<ArrayView<'_, B::Elem>> {
        self.require_matrix()?;
        self.select(1, j)
    }

    /// The main diagonal of a matrix.
    pub fn diagonal(&self) -> ArrayResult<ArrayView<'_, B::Elem>> {
        Ok(self.derive(self.layout.diagonal()?))
    }

    /// The `index`-th vector running along `axis`.
    pub fn vector(&self, axis: usize, index: usize) -> ArrayResult<ArrayView<'_, B::Elem>> {
        Ok(self.derive(self.layout.vector(axis, index)?))
    }

    /// Every vector along `axis`, in column-major order of the other axes.
    pub fn vectors(
        &self,
        axis: usize,
    ) -> ArrayResult<impl Iterator<Item = ArrayView<'_, B::Elem>> + '_> {
        let count = self.layout.vector_count(axis)?;
        Ok((0..count).map(move |i| self.derive(self.layout.vector_unchecked(axis, i))))
    }

    /// Zero-copy view under a new shape. Fails with
    /// [`ArrayError::NotContiguous`] unless [`is_contiguous`](Self::is_contiguous).
    pub fn reshape(&self, shape: impl Into<Shape>) -> ArrayResult<ArrayView<'_, B::Elem>> {
        Ok(self.derive(self.layout.reshaped(shape.into())?))
    }

    fn require_matrix(&self) -> ArrayResult<()> {
        if self.is_matrix() {
            Ok(())
        } else {
            Err(ArrayError::RankMismatch {
                expected: 2,
                actual: self.rank(),
            })
        }
    }

    /// Fails with [`ArrayError::NonConformant`] unless both shapes agree.
    pub fn check_conformant<C: ElementAccess>(
        &self,
        op: &'static str,
        other: &StridedArray<C>,
    ) -> ArrayResult<()> {
        if self.shape() == other.shape() {
            Ok(())
        } else {
            Err(ArrayError::NonConformant {
                op,
                left: self.shape().clone(),
                right: other.shape().clone(),
            })
        }
    }

    // ------------------------------------------------------------------------
    // Elementwise
    // ------------------------------------------------------------------------

    /// New array of `f` applied to every element.
    pub fn map<U, F>(&self, f: F) -> Array<U>
    where
        U: Element,
        F: FnMut(B::Elem) -> U,
    {
        StridedArray {
            layout: Layout::contiguous(self.shape().clone()),
            data: Storage::from_vec(self.iter().map(f).collect()),
        }
    }

    /// Left fold in column-major order.
    pub fn fold<A, F>(&self, init: A, f: F) -> A
    where
        F: FnMut(A, B::Elem) -> A,
    {
        self.iter().fold(init, f)
    }

    /// Reduce with `f`, or `None` for an empty array.
    pub fn reduce<F>(&self, f: F) -> Option<B::Elem>
    where
        F: FnMut(B::Elem, B::Elem) -> B::Elem,
    {
        self.iter().reduce(f)
    }

    /// Call `f` on every element in column-major order.
    pub fn for_each<F>(&self, f: F)
    where
        F: FnMut(B::Elem),
    {
        self.iter().for_each(f);
    }

    /// New array of `f` applied pairwise. Shapes must agree.
    pub fn zip_map<C, U, F>(&self, other: &StridedArray<C>, f: F) -> ArrayResult<Array<U>>
    where
        C: ElementAccess,
        U: Element,
        F: FnMut(B::Elem, C::Elem) -> U,
    {
        self.zip_map_named("zip_map", other, f)
    }

    pub(crate) fn zip_map_named<C, U, F>(
        &self,
        op: &'static str,
        other: &StridedArray<C>,
        mut f: F,
    ) -> ArrayResult<Array<U>>
    where
        C: ElementAccess,
        U: Element,
        F: FnMut(B::Elem, C::Elem) -> U,
    {
        self.check_conformant(op, other)?;
        let data = self.iter().zip(other.iter()).map(|(a, b)| f(a, b)).collect();
        Ok(StridedArray {
            layout: Layout::contiguous(self.shape().clone()),
            data: Storage::from_vec(data),
        })
    }

    /// Convert every element to `U`, mapping NA to NA.
    pub fn cast<U>(&self) -> Array<U>
    where
        U: Element + FromNa<B::Elem>,
    {
        self.map(U::from_na)
    }

    /// Reduce every vector along `axis` to one value. The result drops
    /// `axis`; reducing a one-dimensional array yields a single element.
    pub fn reduce_vectors<U, F>(&self, axis: usize, mut f: F) -> ArrayResult<Array<U>>
    where
        U: Element,
        F: FnMut(ArrayView<'_, B::Elem>) -> U,
    {
        let shape = if self.rank() == 1 {
            Shape::vector(1)
        } else {
            self.shape().without(axis)
        };
        let data: Vec<U> = self.vectors(axis)?.map(&mut f).collect();
        Ok(StridedArray {
            layout: Layout::contiguous(shape),
            data: Storage::from_vec(data),
        })
    }
}

// ============================================================================
// Write access
// ============================================================================

impl<B: ElementAccessMut> StridedArray<B> {
    fn derive_mut(&mut self, layout: Layout) -> ArrayViewMut<'_, B::Elem> {
        StridedArray {
            layout,
            data: self.data.as_mut_slice(),
        }
    }

    /// Overwrite the element at column-major position `flat`.
    pub fn set(&mut self, flat: usize, value: B::Elem) -> ArrayResult<()> {
        let physical = self.layout.physical_checked(flat)?;
        self.data.set_element(physical, value);
        Ok(())
    }

    /// Overwrite the element at a multi-index.
    pub fn set_at(&mut self, index: &[usize], value: B::Elem) -> ArrayResult<()> {
        let physical = self.layout.physical_at(index)?;
        self.data.set_element(physical, value);
        Ok(())
    }

    /// Overwrite the element at row `i`, column `j` of a matrix.
    pub fn set2(&mut self, i: usize, j: usize, value: B::Elem) -> ArrayResult<()> {
        self.set_at(&[i, j], value)
    }

    /// A mutable view of the whole array.
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, B::Elem> {
        let layout = self.layout.clone();
        self.derive_mut(layout)
    }

    /// Mutable view with the axes reversed.
    pub fn transpose_mut(&mut self) -> ArrayViewMut<'_, B::Elem> {
        let layout = self.layout.transposed();
        self.derive_mut(layout)
    }

    /// Mutable view with permuted axes.
    pub fn permute_mut(&mut self, axes: &[usize]) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        let layout = self.layout.permuted(axes)?;
        Ok(self.derive_mut(layout))
    }

    /// Mutable view of a strided sub-range.
    pub fn slice_mut(&mut self, ranges: &[SliceRange]) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        let layout = self.layout.sliced(ranges)?;
        Ok(self.derive_mut(layout))
    }

    /// Mutable view with `axis` fixed at `index`.
    pub fn select_mut(
        &mut self,
        axis: usize,
        index: usize,
    ) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        let layout = self.layout.selected(axis, index)?;
        Ok(self.derive_mut(layout))
    }

    /// Mutable row `i` of a matrix.
    pub fn row_mut(&mut self, i: usize) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        self.require_matrix()?;
        self.select_mut(0, i)
    }

    /// Mutable column `j` of a matrix.
    pub fn column_mut(&mut self, j: usize) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        self.require_matrix()?;
        self.select_mut(1, j)
    }

    /// Mutable main diagonal of a matrix.
    pub fn diagonal_mut(&mut self) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        let layout = self.layout.diagonal()?;
        Ok(self.derive_mut(layout))
    }

    /// Mutable `index`-th vector along `axis`.
    pub fn vector_mut(
        &mut self,
        axis: usize,
        index: usize,
    ) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        let layout = self.layout.vector(axis, index)?;
        Ok(self.derive_mut(layout))
    }

    /// Zero-copy mutable view under a new shape.
    pub fn reshape_mut(
        &mut self,
        shape: impl Into<Shape>,
    ) -> ArrayResult<ArrayViewMut<'_, B::Elem>> {
        let layout = self.layout.reshaped(shape.into())?;
        Ok(self.derive_mut(layout))
    }

    /// Set every element to `value`.
    pub fn assign(&mut self, value: B::Elem) {
        self.update(|_| value);
    }

    /// Copy every element of `other` into this array. Shapes must agree.
    pub fn assign_from<C>(&mut self, other: &StridedArray<C>) -> ArrayResult<()>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.check_conformant("assign", other)?;
        for (i, value) in other.iter().enumerate() {
            let physical = self.layout.physical(i);
            self.data.set_element(physical, value);
        }
        Ok(())
    }

    /// Replace every element with `f(element)`.
    pub fn update<F>(&mut self, mut f: F)
    where
        F: FnMut(B::Elem) -> B::Elem,
    {
        for i in 0..self.layout.len() {
            let physical = self.layout.physical(i);
            let value = self.data.get_element(physical);
            self.data.set_element(physical, f(value));
        }
    }
}

// ============================================================================
// Owned arrays
// ============================================================================

impl<T: Element> Array<T> {
    /// Wrap `data`, read in column-major order, as an array of `shape`.
    pub fn from_shape_vec(shape: impl Into<Shape>, data: Vec<T>) -> ArrayResult<Self> {
        Self::from_shape_vec_in(shape, data, MajorOrder::ColumnMajor)
    }

    /// Wrap `data`, read in `order`, as an array of `shape`. Row-major input
    /// is rearranged into column-major storage.
    pub fn from_shape_vec_in(
        shape: impl Into<Shape>,
        data: Vec<T>,
        order: MajorOrder,
    ) -> ArrayResult<Self> {
        let shape = shape.into();
        shape.validate()?;
        if shape.num_elements() != data.len() {
            return Err(ArrayError::SizeMismatch {
                expected: shape.num_elements(),
                actual: data.len(),
            });
        }
        let array = StridedArray {
            layout: Layout::with_order(shape, order),
            data: Storage::from_vec(data),
        };
        Ok(match order {
            MajorOrder::ColumnMajor => array,
            MajorOrder::RowMajor => array.copy(),
        })
    }

    /// A one-dimensional array owning `data`.
    pub fn from_vec(data: Vec<T>) -> ArrayResult<Self> {
        Self::from_shape_vec(data.len(), data)
    }

    /// An array of `shape` with every element set to `value`.
    pub fn filled(shape: impl Into<Shape>, value: T) -> ArrayResult<Self> {
        let shape = shape.into();
        shape.validate()?;
        let data = Storage::allocate(shape.num_elements(), value);
        Ok(StridedArray {
            layout: Layout::contiguous(shape),
            data,
        })
    }

    /// The same elements under a new shape, reusing the storage when the
    /// array is contiguous and copying otherwise.
    pub fn into_shape(self, shape: impl Into<Shape>) -> ArrayResult<Self> {
        let shape = shape.into();
        shape.validate()?;
        if shape.num_elements() != self.len() {
            return Err(ArrayError::SizeMismatch {
                expected: self.len(),
                actual: shape.num_elements(),
            });
        }
        if self.is_contiguous() {
            let layout = self.layout.reshaped(shape)?;
            return Ok(StridedArray {
                layout,
                data: self.data,
            });
        }
        tracing::debug!(from = %self.shape(), to = %shape, "reshape requires a copy");
        Ok(StridedArray {
            layout: Layout::contiguous(shape),
            data: Storage::from_vec(self.to_vec()),
        })
    }

    /// Take the transpose without copying.
    #[must_use]
    pub fn into_transposed(self) -> Self {
        StridedArray {
            layout: self.layout.transposed(),
            data: self.data,
        }
    }

    /// Elements in column-major order, reusing the storage when possible.
    pub fn into_vec(self) -> Vec<T> {
        if self.is_contiguous() && self.len() == self.data.len() {
            self.data.into_vec()
        } else {
            self.to_vec()
        }
    }

    /// The storage as a slice when it is exactly the column-major sequence
    /// of elements.
    pub fn as_slice(&self) -> Option<&[T]> {
        if self.is_contiguous() && self.len() == self.data.len() {
            Some(self.data.as_slice())
        } else {
            None
        }
    }
}

impl<'a, T: Element> ArrayView<'a, T> {
    /// A dense column-major view of `data`.
    pub fn from_slice(shape: impl Into<Shape>, data: &'a [T]) -> ArrayResult<Self> {
        Self::new(Layout::contiguous(shape.into()), data)
    }
}

impl<'a, T: Element> ArrayViewMut<'a, T> {
    /// A dense column-major mutable view of `data`.
    pub fn from_slice_mut(shape: impl Into<Shape>, data: &'a mut [T]) -> ArrayResult<Self> {
        Self::new(Layout::contiguous(shape.into()), data)
    }
}

/// An element that can act as a selection mask.
pub trait MaskElement: Element {
    /// True if the element selects its position. NA never does.
    fn selects(self) -> bool;
}

impl MaskElement for bool {
    #[inline]
    fn selects(self) -> bool {
        self
    }
}

impl MaskElement for Logical {
    #[inline]
    fn selects(self) -> bool {
        self.is_true()
    }
}

// ============================================================================
// Trait impls
// ============================================================================

/// Shape and elements must match; NA equals NA.
impl<B, C> PartialEq<StridedArray<C>> for StridedArray<B>
where
    B: ElementAccess,
    C: ElementAccess<Elem = B::Elem>,
{
    fn eq(&self, other: &StridedArray<C>) -> bool {
        self.shape() == other.shape() && self.iter().zip(other.iter()).all(|(a, b)| a.same(b))
    }
}

fn physical_or_panic(layout: &Layout, index: &[usize]) -> usize {
    match layout.physical_at(index) {
        Ok(physical) => physical,
        Err(err) => panic!("{err}"),
    }
}

impl<B: ElementAccess> Index<usize> for StridedArray<B> {
    type Output = B::Elem;

    fn index(&self, flat: usize) -> &B::Elem {
        let bound = self.len();
        assert!(flat < bound, "index {flat} out of bounds for length {bound}");
        &self.data.as_slice()[self.layout.physical(flat)]
    }
}

impl<B: ElementAccess> Index<[usize; 2]> for StridedArray<B> {
    type Output = B::Elem;

    fn index(&self, [i, j]: [usize; 2]) -> &B::Elem {
        &self.data.as_slice()[physical_or_panic(&self.layout, &[i, j])]
    }
}

impl<B: ElementAccess> Index<&[usize]> for StridedArray<B> {
    type Output = B::Elem;

    fn index(&self, index: &[usize]) -> &B::Elem {
        &self.data.as_slice()[physical_or_panic(&self.layout, index)]
    }
}

impl<B: ElementAccessMut> IndexMut<usize> for StridedArray<B> {
    fn index_mut(&mut self, flat: usize) -> &mut B::Elem {
        let bound = self.len();
        assert!(flat < bound, "index {flat} out of bounds for length {bound}");
        let physical = self.layout.physical(flat);
        &mut self.data.as_mut_slice()[physical]
    }
}

impl<B: ElementAccessMut> IndexMut<[usize; 2]> for StridedArray<B> {
    fn index_mut(&mut self, [i, j]: [usize; 2]) -> &mut B::Elem {
        let physical = physical_or_panic(&self.layout, &[i, j]);
        &mut self.data.as_mut_slice()[physical]
    }
}

impl<B: ElementAccessMut> IndexMut<&[usize]> for StridedArray<B> {
    fn index_mut(&mut self, index: &[usize]) -> &mut B::Elem {
        let physical = physical_or_panic(&self.layout, index);
        &mut self.data.as_mut_slice()[physical]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::na;

    fn sample() -> DoubleArray {
        // [[1, 3, 5],
        //  [2, 4, 6]]
        Array::from_shape_vec([2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap()
    }

    #[test]
    fn test_get_column_major() {
        let a = sample();
        assert_eq!(a.get(2).unwrap(), 3.0);
        assert_eq!(a.get2(0, 1).unwrap(), 3.0);
        assert_eq!(a[[1, 2]], 6.0);
        assert!(matches!(
            a.get(6),
            Err(ArrayError::IndexOutOfBounds { index: 6, bound: 6 })
        ));
    }

    #[test]
    fn test_row_major_input() {
        let a = Array::from_shape_vec_in(
            [2, 3],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
            MajorOrder::RowMajor,
        )
        .unwrap();
        assert_eq!(a.get2(0, 1).unwrap(), 2.0);
        assert_eq!(a.get2(1, 0).unwrap(), 4.0);
        assert!(a.is_contiguous());
    }

    #[test]
    fn test_transpose_shares_storage() {
        let mut a = sample();
        {
            let mut t = a.transpose_mut();
            t.set2(2, 1, 60.0).unwrap();
        }
        assert_eq!(a.get2(1, 2).unwrap(), 60.0);
    }

    #[test]
    fn test_views_report_is_view() {
        let a = sample();
        assert!(!a.is_view());
        assert!(a.view().is_view());
        assert!(!a.transpose().copy().is_view());
    }

    #[test]
    fn test_row_and_column() {
        let a = sample();
        assert_eq!(a.row(1).unwrap().to_vec(), vec![2.0, 4.0, 6.0]);
        assert_eq!(a.column(2).unwrap().to_vec(), vec![5.0, 6.0]);
        assert!(a.row(2).is_err());
    }

    #[test]
    fn test_reshape_view_and_copy() {
        let a = sample();
        let r = a.reshape([3, 2]).unwrap();
        assert_eq!(r.get2(0, 1).unwrap(), 4.0);
        assert!(matches!(
            a.transpose().reshape([6]),
            Err(ArrayError::NotContiguous { .. })
        ));
        let copied = a.transpose().copy().into_shape([6]).unwrap();
        assert_eq!(copied.to_vec(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_into_shape_copies_non_contiguous() {
        let t = sample().into_transposed();
        assert!(!t.is_contiguous());
        let flat = t.into_shape([6]).unwrap();
        assert_eq!(flat.to_vec(), vec![1.0, 3.0, 5.0, 2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_assign_from_checks_shape() {
        let mut a = sample();
        let b = Array::filled([3, 2], 0.0).unwrap();
        assert!(matches!(
            a.assign_from(&b),
            Err(ArrayError::NonConformant { op: "assign", .. })
        ));
        a.assign_from(&b.transpose()).unwrap();
        assert!(a.iter().all(|x| x == 0.0));
    }

    #[test]
    fn test_reduce_vectors() {
        let a = sample();
        let col_sums = a.reduce_vectors(0, |v| v.iter().sum::<f64>()).unwrap();
        assert_eq!(col_sums.to_vec(), vec![3.0, 7.0, 11.0]);
        let row_sums = a.reduce_vectors(1, |v| v.iter().sum::<f64>()).unwrap();
        assert_eq!(row_sums.to_vec(), vec![9.0, 12.0]);
    }

    #[test]
    fn test_cast_propagates_na() {
        let a = Array::from_vec(vec![1.5, na::double(), -2.0]).unwrap();
        let ints: IntArray = a.cast();
        assert_eq!(ints.to_vec(), vec![1, na::INT, -2]);
    }

    #[test]
    fn test_from_slice_rejects_short_buffer() {
        let data = [1, 2, 3];
        assert!(ArrayView::from_slice([2, 2], &data[..]).is_err());
        assert!(ArrayView::from_slice([3], &data[..]).is_ok());
    }

    #[test]
    fn test_equality_across_buffers() {
        let a = sample();
        let b = a.copy();
        assert_eq!(a, b.view());
        assert_ne!(a.view(), a.transpose());
    }
}
