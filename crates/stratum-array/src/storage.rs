//! Element types and the buffers that hold them.
//!
//! [`ElementAccess`] and [`ElementAccessMut`] are the two primitive hooks
//! every array is built on: read the element at a physical position, and
//! write it. They are implemented by the owning [`Storage`] and by borrowed
//! slices, which is what makes views possible without copying.

use std::fmt;

use stratum_core::na;
use stratum_core::{Complex, Logical};

// ============================================================================
// Elements
// ============================================================================

/// The primitive kinds an array can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// `f64`
    Double,
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `bool`
    Bit,
    /// [`Logical`]
    Logical,
    /// [`Complex`]
    Complex,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementKind::Double => "double",
            ElementKind::Int => "int",
            ElementKind::Long => "long",
            ElementKind::Bit => "bit",
            ElementKind::Logical => "logical",
            ElementKind::Complex => "complex",
        })
    }
}

/// A value that can be stored in an array.
pub trait Element:
    Copy + Default + PartialEq + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// The kind tag of this element type.
    const KIND: ElementKind;

    /// The multiplicative identity (`true` for bits).
    fn one() -> Self;

    /// True if this value is the kind's NA sentinel. Always false for bits.
    fn is_missing(self) -> bool;

    /// Element equality under which NA equals NA.
    #[inline]
    fn same(self, other: Self) -> bool {
        if self.is_missing() || other.is_missing() {
            self.is_missing() && other.is_missing()
        } else {
            self == other
        }
    }

    /// Formats the element for printing, with `precision` digits for
    /// floating-point kinds.
    fn format(self, _precision: usize) -> String {
        if self.is_missing() {
            "NA".to_string()
        } else {
            self.to_string()
        }
    }
}

impl Element for f64 {
    const KIND: ElementKind = ElementKind::Double;

    fn one() -> Self {
        1.0
    }

    #[inline]
    fn is_missing(self) -> bool {
        na::is_double(self)
    }

    fn format(self, precision: usize) -> String {
        if self.is_missing() {
            "NA".to_string()
        } else {
            format!("{:.*}", precision, self)
        }
    }
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::Int;

    fn one() -> Self {
        1
    }

    #[inline]
    fn is_missing(self) -> bool {
        na::is_int(self)
    }
}

impl Element for i64 {
    const KIND: ElementKind = ElementKind::Long;

    fn one() -> Self {
        1
    }

    #[inline]
    fn is_missing(self) -> bool {
        na::is_long(self)
    }
}

impl Element for bool {
    const KIND: ElementKind = ElementKind::Bit;

    fn one() -> Self {
        true
    }

    #[inline]
    fn is_missing(self) -> bool {
        false
    }
}

impl Element for Logical {
    const KIND: ElementKind = ElementKind::Logical;

    fn one() -> Self {
        Logical::True
    }

    #[inline]
    fn is_missing(self) -> bool {
        self == Logical::Na
    }
}

impl Element for Complex {
    const KIND: ElementKind = ElementKind::Complex;

    fn one() -> Self {
        Complex::ONE
    }

    #[inline]
    fn is_missing(self) -> bool {
        na::is_complex(self)
    }

    fn format(self, precision: usize) -> String {
        format!("{:.*}", precision, self)
    }
}

// ============================================================================
// Access hooks
// ============================================================================

/// Read access to a flat buffer by physical position.
pub trait ElementAccess {
    /// The element type.
    type Elem: Element;

    /// True for owning buffers, false for borrowed views.
    const OWNS_STORAGE: bool;

    /// The whole backing buffer.
    fn as_slice(&self) -> &[Self::Elem];

    /// The element at `physical`. Panics if out of range; array methods
    /// validate indices before calling.
    #[inline]
    fn get_element(&self, physical: usize) -> Self::Elem {
        self.as_slice()[physical]
    }

    /// Length of the backing buffer.
    #[inline]
    fn storage_len(&self) -> usize {
        self.as_slice().len()
    }
}

/// Write access to a flat buffer by physical position.
pub trait ElementAccessMut: ElementAccess {
    /// The whole backing buffer, mutably.
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];

    /// Overwrites the element at `physical`.
    #[inline]
    fn set_element(&mut self, physical: usize, value: Self::Elem) {
        self.as_mut_slice()[physical] = value;
    }
}

// ============================================================================
// Storage
// ============================================================================

/// A fixed-length buffer owned by exactly one array.
#[derive(Clone, Debug, PartialEq)]
pub struct Storage<T> {
    data: Box<[T]>,
}

impl<T: Element> Storage<T> {
    /// Allocate `len` elements, each set to `fill`.
    pub fn allocate(len: usize, fill: T) -> Self {
        tracing::trace!(kind = %T::KIND, len, "allocating storage");
        Self {
            data: vec![fill; len].into_boxed_slice(),
        }
    }

    /// Take ownership of an existing buffer.
    pub fn from_vec(data: Vec<T>) -> Self {
        tracing::trace!(kind = %T::KIND, len = data.len(), "adopting storage");
        Self {
            data: data.into_boxed_slice(),
        }
    }

    /// Release the buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if the buffer holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Element> ElementAccess for Storage<T> {
    type Elem = T;
    const OWNS_STORAGE: bool = true;

    #[inline]
    fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T: Element> ElementAccessMut for Storage<T> {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<'a, T: Element> ElementAccess for &'a [T] {
    type Elem = T;
    const OWNS_STORAGE: bool = false;

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<'a, T: Element> ElementAccess for &'a mut [T] {
    type Elem = T;
    const OWNS_STORAGE: bool = false;

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }
}

impl<'a, T: Element> ElementAccessMut for &'a mut [T] {
    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_access() {
        let mut s = Storage::allocate(3, 0.0_f64);
        s.set_element(1, 2.5);
        assert_eq!(s.get_element(1), 2.5);
        assert_eq!(s.storage_len(), 3);
        assert_eq!(s.into_vec(), vec![0.0, 2.5, 0.0]);
    }

    #[test]
    fn test_slices_are_views() {
        assert!(Storage::<i32>::OWNS_STORAGE);
        assert!(!<&[i32] as ElementAccess>::OWNS_STORAGE);
        assert!(!<&mut [i32] as ElementAccess>::OWNS_STORAGE);
    }

    #[test]
    fn test_same_matches_na_with_na() {
        assert!(na::double().same(na::double()));
        assert!(!na::double().same(1.0));
        assert!(!f64::NAN.same(f64::NAN));
        assert!(na::INT.same(na::INT));
        assert!(Logical::Na.same(Logical::Na));
        assert!(na::complex().same(Complex::new(na::double(), 1.0)));
    }

    #[test]
    fn test_from_vec_keeps_buffer() {
        let s = Storage::from_vec(vec![1_i64, 2, 3]);
        assert_eq!(s.storage_len(), 3);
        assert_eq!(s.get_element(2), 3);
    }

    #[test]
    fn test_format_na() {
        assert_eq!(na::double().format(2), "NA");
        assert_eq!(1.5_f64.format(2), "1.50");
        assert_eq!(na::INT.format(2), "NA");
        assert_eq!(true.format(0), "true");
        assert_eq!(Logical::Na.format(0), "NA");
    }
}
