//! Matrix decompositions.
//!
//! No decomposition is implemented yet. Every entry point fails with
//! [`ArrayError::Unsupported`] rather than returning a default.

use crate::array::{ComplexArray, DoubleArray, IntArray, StridedArray};
use crate::error::{ArrayError, ArrayResult};
use crate::storage::ElementAccess;

/// LU factorization with partial pivoting.
#[derive(Clone, Debug)]
pub struct LuDecomposition {
    /// Combined unit-lower and upper factors.
    pub lu: DoubleArray,
    /// Row permutation.
    pub pivots: IntArray,
}

/// Singular value decomposition `a = u * diag(s) * vt`.
#[derive(Clone, Debug)]
pub struct SvdDecomposition {
    /// Left singular vectors.
    pub u: DoubleArray,
    /// Singular values in decreasing order.
    pub s: DoubleArray,
    /// Right singular vectors, transposed.
    pub vt: DoubleArray,
}

/// QR factorization `a = q * r`.
#[derive(Clone, Debug)]
pub struct QrDecomposition {
    /// Orthogonal factor.
    pub q: DoubleArray,
    /// Upper-triangular factor.
    pub r: DoubleArray,
}

/// Eigenvalues and right eigenvectors of a general matrix.
#[derive(Clone, Debug)]
pub struct EigenDecomposition {
    /// Eigenvalues.
    pub values: ComplexArray,
    /// Eigenvectors, one per column.
    pub vectors: ComplexArray,
}

/// Decompositions and inverses of double matrices.
pub trait LinearAlgebraRoutines {
    /// LU factorization.
    fn lu<A>(&self, _a: &StridedArray<A>) -> ArrayResult<LuDecomposition>
    where
        A: ElementAccess<Elem = f64>,
    {
        Err(ArrayError::Unsupported("lu decomposition"))
    }

    /// Matrix inverse.
    fn inv<A>(&self, _a: &StridedArray<A>) -> ArrayResult<DoubleArray>
    where
        A: ElementAccess<Elem = f64>,
    {
        Err(ArrayError::Unsupported("matrix inverse"))
    }

    /// Moore-Penrose pseudo-inverse.
    fn pinv<A>(&self, _a: &StridedArray<A>) -> ArrayResult<DoubleArray>
    where
        A: ElementAccess<Elem = f64>,
    {
        Err(ArrayError::Unsupported("pseudo-inverse"))
    }

    /// Singular value decomposition.
    fn svd<A>(&self, _a: &StridedArray<A>) -> ArrayResult<SvdDecomposition>
    where
        A: ElementAccess<Elem = f64>,
    {
        Err(ArrayError::Unsupported("singular value decomposition"))
    }

    /// QR factorization.
    fn qr<A>(&self, _a: &StridedArray<A>) -> ArrayResult<QrDecomposition>
    where
        A: ElementAccess<Elem = f64>,
    {
        Err(ArrayError::Unsupported("qr decomposition"))
    }

    /// Eigen decomposition.
    fn eig<A>(&self, _a: &StridedArray<A>) -> ArrayResult<EigenDecomposition>
    where
        A: ElementAccess<Elem = f64>,
    {
        Err(ArrayError::Unsupported("eigen decomposition"))
    }
}

/// The default implementation; every routine is unsupported.
#[derive(Clone, Copy, Debug, Default)]
pub struct BaseLinearAlgebra;

impl LinearAlgebraRoutines for BaseLinearAlgebra {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::Array;

    #[test]
    fn test_decompositions_fail_loudly() {
        let a = Array::filled([2, 2], 1.0).unwrap();
        let la = BaseLinearAlgebra;
        assert!(matches!(la.lu(&a), Err(ArrayError::Unsupported(_))));
        assert!(matches!(la.inv(&a), Err(ArrayError::Unsupported(_))));
        assert!(matches!(la.pinv(&a), Err(ArrayError::Unsupported(_))));
        assert!(matches!(la.svd(&a), Err(ArrayError::Unsupported(_))));
        assert!(matches!(la.qr(&a.view()), Err(ArrayError::Unsupported(_))));
        assert!(matches!(la.eig(&a), Err(ArrayError::Unsupported(_))));
    }
}
