//! Index arithmetic.
//!
//! Pure functions that translate logical indices into physical offsets.
//! Nothing here checks bounds or allocates; callers validate first.
//!
//! Column-major order is the default throughout: the first index varies
//! fastest. Row-major helpers exist for operations that explicitly ask for
//! row-major traversal.

use serde::{Deserialize, Serialize};

use crate::shape::Dims;

/// Traversal or storage order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MajorOrder {
    /// First index varies fastest.
    #[default]
    ColumnMajor,
    /// Last index varies fastest.
    RowMajor,
}

/// Offset of `(i, j)` in a dense column-major matrix with `rows` rows.
#[inline]
pub fn column_major(i: usize, j: usize, rows: usize) -> usize {
    i + j * rows
}

/// Offset of `(i, j)` in a dense row-major matrix with `cols` columns.
#[inline]
pub fn row_major(i: usize, j: usize, cols: usize) -> usize {
    i * cols + j
}

/// Dense column-major strides: `stride[0] = 1`, `stride[d] = stride[d-1] * shape[d-1]`.
pub fn column_major_strides(shape: &[usize]) -> Dims {
    let mut strides = Dims::with_capacity(shape.len());
    let mut acc = 1;
    for &n in shape {
        strides.push(acc);
        acc *= n;
    }
    strides
}

/// Dense row-major strides.
pub fn row_major_strides(shape: &[usize]) -> Dims {
    let mut strides = Dims::from_elem(0, shape.len());
    let mut acc = 1;
    for d in (0..shape.len()).rev() {
        strides[d] = acc;
        acc *= shape[d];
    }
    strides
}

/// Dense strides for `order`.
pub fn strides(shape: &[usize], order: MajorOrder) -> Dims {
    match order {
        MajorOrder::ColumnMajor => column_major_strides(shape),
        MajorOrder::RowMajor => row_major_strides(shape),
    }
}

/// `offset + Σ index[d] * stride[d]`.
#[inline]
pub fn offset_of(offset: usize, index: &[usize], stride: &[usize]) -> usize {
    index
        .iter()
        .zip(stride)
        .fold(offset, |acc, (&i, &s)| acc + i * s)
}

/// Physical offset of the `flat`-th element in column-major logical order.
#[inline]
pub fn linearize(flat: usize, offset: usize, shape: &[usize], stride: &[usize]) -> usize {
    match shape.len() {
        0 => offset,
        1 => offset + flat * stride[0],
        2 => {
            let rows = shape[0];
            offset + (flat % rows) * stride[0] + (flat / rows) * stride[1]
        }
        rank => {
            let mut rem = flat;
            let mut physical = offset;
            for d in 0..rank {
                let n = shape[d];
                physical += (rem % n) * stride[d];
                rem /= n;
            }
            physical
        }
    }
}

/// Physical offset of the `flat`-th element in row-major logical order.
#[inline]
pub fn linearize_row_major(flat: usize, offset: usize, shape: &[usize], stride: &[usize]) -> usize {
    let mut rem = flat;
    let mut physical = offset;
    for d in (0..shape.len()).rev() {
        let n = shape[d];
        physical += (rem % n) * stride[d];
        rem /= n;
    }
    physical
}

/// Writes the column-major multi-index of `flat` into `out`.
#[inline]
pub fn unravel_into(flat: usize, shape: &[usize], out: &mut [usize]) {
    let mut rem = flat;
    for (slot, &n) in out.iter_mut().zip(shape) {
        *slot = rem % n;
        rem /= n;
    }
}

/// The column-major multi-index of `flat`.
pub fn unravel(flat: usize, shape: &[usize]) -> Dims {
    let mut index = Dims::from_elem(0, shape.len());
    unravel_into(flat, shape, &mut index);
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_offsets() {
        // 2x3: element (0, 1) is the third element in column-major order
        assert_eq!(column_major(0, 1, 2), 2);
        assert_eq!(row_major(0, 1, 3), 1);
    }

    #[test]
    fn test_column_major_strides() {
        assert_eq!(column_major_strides(&[2, 3, 4]).as_slice(), &[1, 2, 6]);
        assert_eq!(row_major_strides(&[2, 3, 4]).as_slice(), &[12, 4, 1]);
    }

    #[test]
    fn test_linearize_matches_offset_of() {
        let shape = [2, 3, 4];
        let stride = column_major_strides(&shape);
        for flat in 0..24 {
            let idx = unravel(flat, &shape);
            assert_eq!(linearize(flat, 5, &shape, &stride), offset_of(5, &idx, &stride));
        }
    }

    #[test]
    fn test_linearize_fast_paths() {
        // a 3x2 transposed view of a 2x3 column-major matrix
        let shape = [3, 2];
        let stride = [2, 1];
        let got: Vec<usize> = (0..6).map(|f| linearize(f, 0, &shape, &stride)).collect();
        assert_eq!(got, vec![0, 2, 4, 1, 3, 5]);
        assert_eq!(linearize(3, 1, &[4], &[2]), 7);
    }

    #[test]
    fn test_linearize_row_major() {
        let shape = [2, 3];
        let stride = column_major_strides(&shape);
        let got: Vec<usize> = (0..6)
            .map(|f| linearize_row_major(f, 0, &shape, &stride))
            .collect();
        assert_eq!(got, vec![0, 2, 4, 1, 3, 5]);
    }

    #[test]
    fn test_unravel() {
        assert_eq!(unravel(5, &[2, 3]).as_slice(), &[1, 2]);
        assert!(unravel(0, &[]).is_empty());
    }
}
