//! NA-aware arithmetic and reductions.
//!
//! Every operation propagates NA: a single missing operand makes the result
//! missing. The `*_skip_na` reductions ignore missing elements instead.
//!
//! Integer arithmetic wraps. A wrapped result that lands on the sentinel
//! (`i32::MIN`, `i64::MAX`) reads back as NA; integer division by zero
//! yields NA.

use stratum_core::na::NaValue;
use stratum_core::{Complex, FromNa, Logical};

use crate::array::{Array, DoubleArray, LogicalArray, StridedArray};
use crate::error::ArrayResult;
use crate::storage::{Element, ElementAccess};

/// An element supporting NA-propagating arithmetic.
pub trait NumericElement: Element + NaValue {
    /// `self + rhs`, or NA if either side is NA.
    fn na_add(self, rhs: Self) -> Self;
    /// `self - rhs`, or NA if either side is NA.
    fn na_sub(self, rhs: Self) -> Self;
    /// `self * rhs`, or NA if either side is NA.
    fn na_mul(self, rhs: Self) -> Self;
    /// `self / rhs`, or NA if either side is NA.
    fn na_div(self, rhs: Self) -> Self;
    /// `-self`, or NA.
    fn na_neg(self) -> Self;
}

/// A totally ordered numeric element that converts to `f64`.
pub trait RealElement: NumericElement + PartialOrd {
    /// The value as `f64`, NA mapping to the `f64` NA.
    fn to_f64(self) -> f64;
}

impl NumericElement for f64 {
    #[inline]
    fn na_add(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self + rhs
        }
    }

    #[inline]
    fn na_sub(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self - rhs
        }
    }

    #[inline]
    fn na_mul(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self * rhs
        }
    }

    #[inline]
    fn na_div(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self / rhs
        }
    }

    #[inline]
    fn na_neg(self) -> Self {
        if self.is_na() {
            self
        } else {
            -self
        }
    }
}

impl RealElement for f64 {
    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

macro_rules! integer_numeric {
    ($($ty:ty),*) => {
        $(
            impl NumericElement for $ty {
                #[inline]
                fn na_add(self, rhs: Self) -> Self {
                    if self.is_na() || rhs.is_na() { Self::na() } else { self.wrapping_add(rhs) }
                }

                #[inline]
                fn na_sub(self, rhs: Self) -> Self {
                    if self.is_na() || rhs.is_na() { Self::na() } else { self.wrapping_sub(rhs) }
                }

                #[inline]
                fn na_mul(self, rhs: Self) -> Self {
                    if self.is_na() || rhs.is_na() { Self::na() } else { self.wrapping_mul(rhs) }
                }

                #[inline]
                fn na_div(self, rhs: Self) -> Self {
                    if self.is_na() || rhs.is_na() || rhs == 0 {
                        Self::na()
                    } else {
                        self.wrapping_div(rhs)
                    }
                }

                #[inline]
                fn na_neg(self) -> Self {
                    if self.is_na() { self } else { self.wrapping_neg() }
                }
            }

            impl RealElement for $ty {
                #[inline]
                fn to_f64(self) -> f64 {
                    f64::from_na(self)
                }
            }
        )*
    };
}

integer_numeric!(i32, i64);

impl NumericElement for Complex {
    #[inline]
    fn na_add(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self + rhs
        }
    }

    #[inline]
    fn na_sub(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self - rhs
        }
    }

    #[inline]
    fn na_mul(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self * rhs
        }
    }

    #[inline]
    fn na_div(self, rhs: Self) -> Self {
        if self.is_na() || rhs.is_na() {
            Self::na()
        } else {
            self / rhs
        }
    }

    #[inline]
    fn na_neg(self) -> Self {
        if self.is_na() {
            self
        } else {
            -self
        }
    }
}

// ============================================================================
// Arithmetic
// ============================================================================

impl<B> StridedArray<B>
where
    B: ElementAccess,
    B::Elem: NumericElement,
{
    /// Sum of all elements; NA if any element is NA.
    pub fn sum(&self) -> B::Elem {
        let mut acc = B::Elem::default();
        for v in self.iter() {
            if v.is_na() {
                return v;
            }
            acc = acc.na_add(v);
        }
        acc
    }

    /// Sum of the non-NA elements.
    pub fn sum_skip_na(&self) -> B::Elem {
        self.iter()
            .filter(|v| !v.is_na())
            .fold(B::Elem::default(), NumericElement::na_add)
    }

    /// Product of all elements; NA if any element is NA.
    pub fn prod(&self) -> B::Elem {
        let mut acc = B::Elem::one();
        for v in self.iter() {
            if v.is_na() {
                return v;
            }
            acc = acc.na_mul(v);
        }
        acc
    }

    /// Number of NA elements.
    pub fn count_na(&self) -> usize {
        self.iter().filter(NaValue::is_na).count()
    }

    /// Elementwise sum. Shapes must agree.
    pub fn add<C>(&self, other: &StridedArray<C>) -> ArrayResult<Array<B::Elem>>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("add", other, NumericElement::na_add)
    }

    /// Elementwise difference. Shapes must agree.
    pub fn sub<C>(&self, other: &StridedArray<C>) -> ArrayResult<Array<B::Elem>>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("sub", other, NumericElement::na_sub)
    }

    /// Elementwise product. Shapes must agree.
    pub fn mul<C>(&self, other: &StridedArray<C>) -> ArrayResult<Array<B::Elem>>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("mul", other, NumericElement::na_mul)
    }

    /// Elementwise quotient. Shapes must agree.
    pub fn div<C>(&self, other: &StridedArray<C>) -> ArrayResult<Array<B::Elem>>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("div", other, NumericElement::na_div)
    }

    /// Add `scalar` to every element.
    pub fn add_scalar(&self, scalar: B::Elem) -> Array<B::Elem> {
        self.map(|v| v.na_add(scalar))
    }

    /// Subtract `scalar` from every element.
    pub fn sub_scalar(&self, scalar: B::Elem) -> Array<B::Elem> {
        self.map(|v| v.na_sub(scalar))
    }

    /// Multiply every element by `scalar`.
    pub fn mul_scalar(&self, scalar: B::Elem) -> Array<B::Elem> {
        self.map(|v| v.na_mul(scalar))
    }

    /// Divide every element by `scalar`.
    pub fn div_scalar(&self, scalar: B::Elem) -> Array<B::Elem> {
        self.map(|v| v.na_div(scalar))
    }

    /// Negate every element.
    pub fn negate(&self) -> Array<B::Elem> {
        self.map(NumericElement::na_neg)
    }

    /// Elementwise equality, NA where either side is NA.
    pub fn eq_elements<C>(&self, other: &StridedArray<C>) -> ArrayResult<LogicalArray>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("eq", other, |a, b| {
            if a.is_na() || b.is_na() {
                Logical::Na
            } else {
                Logical::from_bool(a == b)
            }
        })
    }

    /// Sums along `axis`, dropping it.
    pub fn sum_along(&self, axis: usize) -> ArrayResult<Array<B::Elem>> {
        self.reduce_vectors(axis, |v| v.sum())
    }
}

// ============================================================================
// Ordered reductions
// ============================================================================

fn compare_logical<T: RealElement>(a: T, b: T, f: impl Fn(&T, &T) -> bool) -> Logical {
    if a.is_na() || b.is_na() {
        Logical::Na
    } else {
        Logical::from_bool(f(&a, &b))
    }
}

impl<B> StridedArray<B>
where
    B: ElementAccess,
    B::Elem: RealElement,
{
    /// Smallest element; NA if any element is NA.
    pub fn min(&self) -> B::Elem {
        self.extreme(|candidate, best| candidate < best, false)
    }

    /// Largest element; NA if any element is NA.
    pub fn max(&self) -> B::Elem {
        self.extreme(|candidate, best| candidate > best, false)
    }

    /// Smallest non-NA element, or NA if there is none.
    pub fn min_skip_na(&self) -> B::Elem {
        self.extreme(|candidate, best| candidate < best, true)
    }

    /// Largest non-NA element, or NA if there is none.
    pub fn max_skip_na(&self) -> B::Elem {
        self.extreme(|candidate, best| candidate > best, true)
    }

    fn extreme(&self, better: impl Fn(&B::Elem, &B::Elem) -> bool, skip_na: bool) -> B::Elem {
        let mut best: Option<B::Elem> = None;
        for v in self.iter() {
            if v.is_na() {
                if skip_na {
                    continue;
                }
                return v;
            }
            best = match best {
                Some(b) if !better(&v, &b) => Some(b),
                _ => Some(v),
            };
        }
        best.unwrap_or_else(B::Elem::na)
    }

    /// Arithmetic mean; NA if any element is NA.
    pub fn mean(&self) -> f64 {
        let mut sum = 0.0;
        for v in self.iter() {
            if v.is_na() {
                return f64::na();
            }
            sum += v.to_f64();
        }
        sum / self.len() as f64
    }

    /// Mean of the non-NA elements, or NA if there are none.
    pub fn mean_skip_na(&self) -> f64 {
        let (sum, count) = self
            .iter()
            .filter(|v| !v.is_na())
            .fold((0.0, 0_usize), |(s, n), v| (s + v.to_f64(), n + 1));
        if count == 0 {
            f64::na()
        } else {
            sum / count as f64
        }
    }

    /// Means along `axis`, dropping it.
    pub fn mean_along(&self, axis: usize) -> ArrayResult<DoubleArray> {
        self.reduce_vectors(axis, |v| v.mean())
    }

    /// Elementwise `self < other`.
    pub fn lt<C>(&self, other: &StridedArray<C>) -> ArrayResult<LogicalArray>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("lt", other, |a, b| compare_logical(a, b, PartialOrd::lt))
    }

    /// Elementwise `self > other`.
    pub fn gt<C>(&self, other: &StridedArray<C>) -> ArrayResult<LogicalArray>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("gt", other, |a, b| compare_logical(a, b, PartialOrd::gt))
    }

    /// Elementwise `self <= other`.
    pub fn lte<C>(&self, other: &StridedArray<C>) -> ArrayResult<LogicalArray>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("lte", other, |a, b| compare_logical(a, b, PartialOrd::le))
    }

    /// Elementwise `self >= other`.
    pub fn gte<C>(&self, other: &StridedArray<C>) -> ArrayResult<LogicalArray>
    where
        C: ElementAccess<Elem = B::Elem>,
    {
        self.zip_map_named("gte", other, |a, b| compare_logical(a, b, PartialOrd::ge))
    }

    /// Elementwise `self < scalar`.
    pub fn lt_scalar(&self, scalar: B::Elem) -> LogicalArray {
        self.map(|v| compare_logical(v, scalar, PartialOrd::lt))
    }

    /// Elementwise `self > scalar`.
    pub fn gt_scalar(&self, scalar: B::Elem) -> LogicalArray {
        self.map(|v| compare_logical(v, scalar, PartialOrd::gt))
    }

    /// Elementwise `self <= scalar`.
    pub fn lte_scalar(&self, scalar: B::Elem) -> LogicalArray {
        self.map(|v| compare_logical(v, scalar, PartialOrd::le))
    }

    /// Elementwise `self >= scalar`.
    pub fn gte_scalar(&self, scalar: B::Elem) -> LogicalArray {
        self.map(|v| compare_logical(v, scalar, PartialOrd::ge))
    }
}
