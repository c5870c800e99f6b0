//! BLAS-style routines over strided double arrays.
//!
//! Routines accept any layout (views, transposes, strided slices) and
//! check conformance before touching data. Products propagate NA.

use serde::{Deserialize, Serialize};
use stratum_core::na::NaValue;

use crate::array::{Array, ArrayView, DoubleArray, StridedArray};
use crate::error::{ArrayError, ArrayResult};
use crate::numeric::NumericElement;
use crate::shape::Shape;
use crate::storage::{ElementAccess, ElementAccessMut};

/// Whether a matrix operand is used as is or transposed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    /// Use the operand as stored.
    #[default]
    Keep,
    /// Use the transpose of the operand.
    Transpose,
}

impl Op {
    fn apply<B: ElementAccess<Elem = f64>>(self, a: &StridedArray<B>) -> ArrayView<'_, f64> {
        match self {
            Op::Keep => a.view(),
            Op::Transpose => a.transpose(),
        }
    }
}

fn require_matrix<B: ElementAccess>(a: &StridedArray<B>) -> ArrayResult<()> {
    if a.is_matrix() {
        Ok(())
    } else {
        Err(ArrayError::RankMismatch {
            expected: 2,
            actual: a.rank(),
        })
    }
}

fn require_vector<B: ElementAccess>(op: &'static str, x: &StridedArray<B>) -> ArrayResult<()> {
    if x.is_vector() {
        Ok(())
    } else {
        Err(ArrayError::InvalidArgument(format!(
            "{op} expects a vector, got shape {}",
            x.shape()
        )))
    }
}

fn non_conformant(op: &'static str, left: Shape, right: Shape) -> ArrayError {
    ArrayError::NonConformant { op, left, right }
}

/// Level 1-3 routines on double arrays.
pub trait ArrayRoutines {
    /// Inner product of two vectors of equal length.
    fn dot<X, Y>(&self, x: &StridedArray<X>, y: &StridedArray<Y>) -> ArrayResult<f64>
    where
        X: ElementAccess<Elem = f64>,
        Y: ElementAccess<Elem = f64>;

    /// Sum of absolute values.
    fn asum<X>(&self, x: &StridedArray<X>) -> f64
    where
        X: ElementAccess<Elem = f64>;

    /// Euclidean norm.
    fn nrm2<X>(&self, x: &StridedArray<X>) -> f64
    where
        X: ElementAccess<Elem = f64>;

    /// Position of the element with the largest absolute value, skipping NA.
    fn iamax<X>(&self, x: &StridedArray<X>) -> Option<usize>
    where
        X: ElementAccess<Elem = f64>;

    /// Scale in place: `x = alpha * x`.
    fn scal<X>(&self, alpha: f64, x: &mut StridedArray<X>)
    where
        X: ElementAccessMut<Elem = f64>;

    /// `y = alpha * x + y`. The operands must be vectors of equal length
    /// or arrays of equal shape.
    fn axpy<X, Y>(
        &self,
        alpha: f64,
        x: &StridedArray<X>,
        y: &mut StridedArray<Y>,
    ) -> ArrayResult<()>
    where
        X: ElementAccess<Elem = f64>,
        Y: ElementAccessMut<Elem = f64>;

    /// Sum of the diagonal of a square matrix.
    fn trace<A>(&self, a: &StridedArray<A>) -> ArrayResult<f64>
    where
        A: ElementAccess<Elem = f64>;

    /// Rank-one update: `a = alpha * x * y^T + a`.
    fn ger<X, Y, A>(
        &self,
        alpha: f64,
        x: &StridedArray<X>,
        y: &StridedArray<Y>,
        a: &mut StridedArray<A>,
    ) -> ArrayResult<()>
    where
        X: ElementAccess<Elem = f64>,
        Y: ElementAccess<Elem = f64>,
        A: ElementAccessMut<Elem = f64>;

    /// Matrix-vector product: `y = alpha * op(a) * x + beta * y`.
    fn gemv<A, X, Y>(
        &self,
        op: Op,
        alpha: f64,
        a: &StridedArray<A>,
        x: &StridedArray<X>,
        beta: f64,
        y: &mut StridedArray<Y>,
    ) -> ArrayResult<()>
    where
        A: ElementAccess<Elem = f64>,
        X: ElementAccess<Elem = f64>,
        Y: ElementAccessMut<Elem = f64>;

    /// Matrix-matrix product: `c = alpha * op_a(a) * op_b(b) + beta * c`.
    #[allow(clippy::too_many_arguments)]
    fn gemm<A, B, C>(
        &self,
        op_a: Op,
        op_b: Op,
        alpha: f64,
        a: &StridedArray<A>,
        b: &StridedArray<B>,
        beta: f64,
        c: &mut StridedArray<C>,
    ) -> ArrayResult<()>
    where
        A: ElementAccess<Elem = f64>,
        B: ElementAccess<Elem = f64>,
        C: ElementAccessMut<Elem = f64>;
}

/// Straightforward loop implementation of [`ArrayRoutines`].
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseRoutines;

/// `beta * old + update`, where a zero `beta` discards `old` entirely.
#[inline]
fn accumulate(beta: f64, old: f64, update: f64) -> f64 {
    if beta == 0.0 {
        update
    } else {
        beta.na_mul(old).na_add(update)
    }
}

impl ArrayRoutines for BaseRoutines {
    fn dot<X, Y>(&self, x: &StridedArray<X>, y: &StridedArray<Y>) -> ArrayResult<f64>
    where
        X: ElementAccess<Elem = f64>,
        Y: ElementAccess<Elem = f64>,
    {
        if !x.is_vector() || !y.is_vector() || x.len() != y.len() {
            return Err(non_conformant("dot", x.shape().clone(), y.shape().clone()));
        }
        Ok(x
            .iter()
            .zip(y.iter())
            .fold(0.0, |acc, (a, b)| acc.na_add(a.na_mul(b))))
    }

    fn asum<X>(&self, x: &StridedArray<X>) -> f64
    where
        X: ElementAccess<Elem = f64>,
    {
        x.fold(0.0, |acc, v| acc.na_add(if v.is_na() { v } else { v.abs() }))
    }

    fn nrm2<X>(&self, x: &StridedArray<X>) -> f64
    where
        X: ElementAccess<Elem = f64>,
    {
        let sum_sq = x.fold(0.0, |acc, v| acc.na_add(v.na_mul(v)));
        if sum_sq.is_na() {
            sum_sq
        } else {
            sum_sq.sqrt()
        }
    }

    fn iamax<X>(&self, x: &StridedArray<X>) -> Option<usize>
    where
        X: ElementAccess<Elem = f64>,
    {
        x.iter()
            .enumerate()
            .filter(|(_, v)| !v.is_na())
            .fold(None, |best: Option<(usize, f64)>, (i, v)| match best {
                Some((_, b)) if b >= v.abs() => best,
                _ => Some((i, v.abs())),
            })
            .map(|(i, _)| i)
    }

    fn scal<X>(&self, alpha: f64, x: &mut StridedArray<X>)
    where
        X: ElementAccessMut<Elem = f64>,
    {
        x.update(|v| alpha.na_mul(v));
    }

    fn axpy<X, Y>(
        &self,
        alpha: f64,
        x: &StridedArray<X>,
        y: &mut StridedArray<Y>,
    ) -> ArrayResult<()>
    where
        X: ElementAccess<Elem = f64>,
        Y: ElementAccessMut<Elem = f64>,
    {
        let vectors = x.is_vector() && y.is_vector() && x.len() == y.len();
        if !vectors && x.shape() != y.shape() {
            return Err(non_conformant("axpy", x.shape().clone(), y.shape().clone()));
        }
        for (i, xv) in x.iter().enumerate() {
            let yv = y.get(i)?;
            y.set(i, alpha.na_mul(xv).na_add(yv))?;
        }
        Ok(())
    }

    fn trace<A>(&self, a: &StridedArray<A>) -> ArrayResult<f64>
    where
        A: ElementAccess<Elem = f64>,
    {
        require_matrix(a)?;
        if !a.is_square() {
            return Err(ArrayError::InvalidArgument(format!(
                "trace requires a square matrix, got shape {}",
                a.shape()
            )));
        }
        Ok(a.diagonal()?.sum())
    }

    fn ger<X, Y, A>(
        &self,
        alpha: f64,
        x: &StridedArray<X>,
        y: &StridedArray<Y>,
        a: &mut StridedArray<A>,
    ) -> ArrayResult<()>
    where
        X: ElementAccess<Elem = f64>,
        Y: ElementAccess<Elem = f64>,
        A: ElementAccessMut<Elem = f64>,
    {
        require_matrix(a)?;
        require_vector("ger", x)?;
        require_vector("ger", y)?;
        if a.rows() != x.len() || a.columns() != y.len() {
            return Err(non_conformant(
                "ger",
                a.shape().clone(),
                Shape::matrix(x.len(), y.len()),
            ));
        }
        for (j, yv) in y.iter().enumerate() {
            let scaled = alpha.na_mul(yv);
            for (i, xv) in x.iter().enumerate() {
                let old = a.get2(i, j)?;
                a.set2(i, j, xv.na_mul(scaled).na_add(old))?;
            }
        }
        Ok(())
    }

    fn gemv<A, X, Y>(
        &self,
        op: Op,
        alpha: f64,
        a: &StridedArray<A>,
        x: &StridedArray<X>,
        beta: f64,
        y: &mut StridedArray<Y>,
    ) -> ArrayResult<()>
    where
        A: ElementAccess<Elem = f64>,
        X: ElementAccess<Elem = f64>,
        Y: ElementAccessMut<Elem = f64>,
    {
        require_matrix(a)?;
        let a = op.apply(a);
        if a.columns() != x.len() {
            return Err(non_conformant("gemv", a.shape().clone(), x.shape().clone()));
        }
        if a.rows() != y.len() {
            return Err(non_conformant("gemv", a.shape().clone(), y.shape().clone()));
        }
        for i in 0..a.rows() {
            let mut sum = 0.0;
            for (k, xv) in x.iter().enumerate() {
                sum = sum.na_add(a[[i, k]].na_mul(xv));
            }
            let old = y.get(i)?;
            y.set(i, accumulate(beta, old, alpha.na_mul(sum)))?;
        }
        Ok(())
    }

    fn gemm<A, B, C>(
        &self,
        op_a: Op,
        op_b: Op,
        alpha: f64,
        a: &StridedArray<A>,
        b: &StridedArray<B>,
        beta: f64,
        c: &mut StridedArray<C>,
    ) -> ArrayResult<()>
    where
        A: ElementAccess<Elem = f64>,
        B: ElementAccess<Elem = f64>,
        C: ElementAccessMut<Elem = f64>,
    {
        require_matrix(a)?;
        require_matrix(b)?;
        require_matrix(c)?;
        let a = op_a.apply(a);
        let b = op_b.apply(b);
        let (m, k, n) = (a.rows(), a.columns(), b.columns());
        if b.rows() != k {
            return Err(non_conformant("gemm", a.shape().clone(), b.shape().clone()));
        }
        if c.rows() != m || c.columns() != n {
            return Err(non_conformant("gemm", Shape::matrix(m, n), c.shape().clone()));
        }
        tracing::trace!(m, n, k, "gemm");
        for j in 0..n {
            for i in 0..m {
                let mut sum = 0.0;
                for l in 0..k {
                    sum = sum.na_add(a[[i, l]].na_mul(b[[l, j]]));
                }
                let old = c[[i, j]];
                c[[i, j]] = accumulate(beta, old, alpha.na_mul(sum));
            }
        }
        Ok(())
    }
}

/// The default routine implementation.
pub fn default_routines() -> impl ArrayRoutines {
    BaseRoutines
}

// ============================================================================
// Convenience methods
// ============================================================================

impl<B: ElementAccess<Elem = f64>> StridedArray<B> {
    /// Inner product with another vector.
    pub fn dot<C: ElementAccess<Elem = f64>>(&self, other: &StridedArray<C>) -> ArrayResult<f64> {
        BaseRoutines.dot(self, other)
    }

    /// Matrix product `self * other` into a new array.
    pub fn matmul<C: ElementAccess<Elem = f64>>(
        &self,
        other: &StridedArray<C>,
    ) -> ArrayResult<DoubleArray> {
        require_matrix(self)?;
        require_matrix(other)?;
        let mut out = Array::filled([self.rows(), other.columns()], 0.0)?;
        BaseRoutines.gemm(Op::Keep, Op::Keep, 1.0, self, other, 0.0, &mut out)?;
        Ok(out)
    }
}
