//! Immutable typed vectors.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stratum_array::{
    Array, BitArray, ComplexArray, DoubleArray, Element, ElementAccess, IntArray, LogicalArray,
    LongArray, StridedArray,
};
use stratum_core::{na, Complex, FromNa, Logical, NaValue, Options};

use crate::builder::Builder;
use crate::coerce::{self, Mode};
use crate::error::{VectorError, VectorResult};
use crate::value::Value;
use crate::vector_type::VectorType;

/// Element storage, one variant per [`VectorType`].
#[derive(Clone, Debug)]
pub(crate) enum Data {
    Double(Arc<Vec<f64>>),
    Int(Arc<Vec<i32>>),
    Long(Arc<Vec<i64>>),
    Logical(Arc<Vec<Logical>>),
    Complex(Arc<Vec<Complex>>),
    String(Arc<Vec<Option<Arc<str>>>>),
    Object(Arc<Vec<Value>>),
    Variable(Arc<Vec<Value>>),
}

/// Apply `$body` to the buffer of any variant.
macro_rules! with_data {
    ($data:expr, |$v:ident| $body:expr) => {
        match $data {
            Data::Double($v) => $body,
            Data::Int($v) => $body,
            Data::Long($v) => $body,
            Data::Logical($v) => $body,
            Data::Complex($v) => $body,
            Data::String($v) => $body,
            Data::Object($v) => $body,
            Data::Variable($v) => $body,
        }
    };
}

/// Build a new `Data` of the same variant from `$body`.
macro_rules! map_data {
    ($data:expr, |$v:ident| $body:expr) => {
        match $data {
            Data::Double($v) => Data::Double($body),
            Data::Int($v) => Data::Int($body),
            Data::Long($v) => Data::Long($body),
            Data::Logical($v) => Data::Logical($body),
            Data::Complex($v) => Data::Complex($body),
            Data::String($v) => Data::String($body),
            Data::Object($v) => Data::Object($body),
            Data::Variable($v) => Data::Variable($body),
        }
    };
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Smallest first; NA leads.
    #[default]
    Ascending,
    /// Largest first; NA trails.
    Descending,
}

/// An immutable, homogeneous sequence of values with NA support.
///
/// Cloning is cheap: the element buffer is shared.
#[derive(Clone, Debug)]
pub struct Vector {
    data: Data,
}

impl Vector {
    pub(crate) fn from_data(data: Data) -> Self {
        Self { data }
    }

    pub(crate) fn data(&self) -> &Data {
        &self.data
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// An empty vector of type `vector_type`.
    pub fn empty(vector_type: VectorType) -> Self {
        Builder::with_capacity(vector_type, 0).build()
    }

    /// `n` copies of `value`, typed after the value.
    pub fn singleton(value: impl Into<Value>, n: usize) -> Self {
        let value = value.into();
        let mut builder = Builder::with_capacity(VectorType::of_value(&value), n);
        for _ in 0..n {
            builder.add(value.clone());
        }
        builder.build()
    }

    /// A vector of `values`, typed after the first non-NA value. Later values
    /// are coerced into that type. An all-NA input gives an object vector.
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let vector_type = values
            .iter()
            .find(|v| !v.is_na())
            .map_or(VectorType::Object, VectorType::of_value);
        let mut builder = Builder::with_capacity(vector_type, values.len());
        builder.extend(values);
        builder.build()
    }

    /// A vector of elements of any kind.
    pub fn variable<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let mut builder = Builder::new(VectorType::Variable);
        builder.extend(values);
        builder.build()
    }

    /// A vector holding the elements of `array` in column-major order.
    pub fn from_array<B>(array: &StridedArray<B>) -> Self
    where
        B: ElementAccess,
        B::Elem: VectorElement,
    {
        <B::Elem as VectorElement>::into_vector(array.to_vec())
    }

    // ------------------------------------------------------------------------
    // Metadata
    // ------------------------------------------------------------------------

    /// Number of elements.
    pub fn len(&self) -> usize {
        with_data!(&self.data, |v| v.len())
    }

    /// Returns true if the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The element kind.
    pub fn vector_type(&self) -> VectorType {
        match &self.data {
            Data::Double(_) => VectorType::Double,
            Data::Int(_) => VectorType::Int,
            Data::Long(_) => VectorType::Long,
            Data::Logical(_) => VectorType::Logical,
            Data::Complex(_) => VectorType::Complex,
            Data::String(_) => VectorType::String,
            Data::Object(_) => VectorType::Object,
            Data::Variable(_) => VectorType::Variable,
        }
    }

    /// The kind of element `index`. Only variable vectors differ from
    /// [`vector_type`](Self::vector_type).
    pub fn type_at(&self, index: usize) -> VectorResult<VectorType> {
        self.check(index)?;
        Ok(match &self.data {
            Data::Variable(v) => VectorType::of_value(&v[index]),
            _ => self.vector_type(),
        })
    }

    fn check(&self, index: usize) -> VectorResult<()> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            Err(VectorError::IndexOutOfBounds { index, len })
        }
    }

    // ------------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------------

    pub(crate) fn value_at(&self, index: usize) -> Value {
        match &self.data {
            Data::Double(v) => Value::Double(v[index]),
            Data::Int(v) => Value::Int(v[index]),
            Data::Long(v) => Value::Long(v[index]),
            Data::Logical(v) => Value::Logical(v[index]),
            Data::Complex(v) => Value::Complex(v[index]),
            Data::String(v) => v[index].clone().map_or(Value::Na, Value::Str),
            Data::Object(v) | Data::Variable(v) => v[index].clone(),
        }
    }

    pub(crate) fn double_at(&self, index: usize) -> f64 {
        match &self.data {
            Data::Double(v) => v[index],
            Data::Int(v) => f64::from_na(v[index]),
            Data::Long(v) => f64::from_na(v[index]),
            Data::Logical(v) => f64::from_na(v[index]),
            Data::Complex(v) => f64::from_na(v[index]),
            _ => coerce::to_double(&self.value_at(index), Mode::Project)
                .unwrap_or_else(na::double),
        }
    }

    pub(crate) fn int_at(&self, index: usize) -> i32 {
        match &self.data {
            Data::Double(v) => i32::from_na(v[index]),
            Data::Int(v) => v[index],
            Data::Long(v) => i32::from_na(v[index]),
            Data::Logical(v) => i32::from_na(v[index]),
            Data::Complex(v) => i32::from_na(f64::from_na(v[index])),
            _ => coerce::to_int(&self.value_at(index), Mode::Project).unwrap_or(na::INT),
        }
    }

    pub(crate) fn long_at(&self, index: usize) -> i64 {
        match &self.data {
            Data::Double(v) => i64::from_na(v[index]),
            Data::Int(v) => i64::from_na(v[index]),
            Data::Long(v) => v[index],
            Data::Logical(v) => i64::from_na(v[index]),
            Data::Complex(v) => i64::from_na(f64::from_na(v[index])),
            _ => coerce::to_long(&self.value_at(index), Mode::Project).unwrap_or(na::LONG),
        }
    }

    pub(crate) fn logical_at(&self, index: usize) -> Logical {
        match &self.data {
            Data::Double(v) => Logical::from_na(v[index]),
            Data::Int(v) => Logical::from_na(v[index]),
            Data::Long(v) => Logical::from_na(v[index]),
            Data::Logical(v) => v[index],
            Data::Complex(v) => Logical::from_na(v[index]),
            _ => coerce::to_logical(&self.value_at(index), Mode::Project)
                .unwrap_or(Logical::Na),
        }
    }

    pub(crate) fn complex_at(&self, index: usize) -> Complex {
        match &self.data {
            Data::Double(v) => Complex::from_na(v[index]),
            Data::Int(v) => Complex::from_na(v[index]),
            Data::Long(v) => Complex::from_na(v[index]),
            Data::Logical(v) => Complex::from_na(v[index]),
            Data::Complex(v) => v[index],
            _ => coerce::to_complex(&self.value_at(index)).unwrap_or_else(na::complex),
        }
    }

    pub(crate) fn string_at(&self, index: usize) -> Option<Arc<str>> {
        match &self.data {
            Data::String(v) => v[index].clone(),
            _ => coerce::to_string(&self.value_at(index)).flatten(),
        }
    }

    /// Element `index` as a [`Value`].
    pub fn get_value(&self, index: usize) -> VectorResult<Value> {
        self.check(index)?;
        Ok(self.value_at(index))
    }

    /// Element `index` converted to `T`.
    pub fn get<T: Extract>(&self, index: usize) -> VectorResult<T> {
        T::extract(self, index)
    }

    /// Element `index` as a double. Complex values project onto their real
    /// part; values with no numeric meaning are NA.
    pub fn get_as_double(&self, index: usize) -> VectorResult<f64> {
        self.check(index)?;
        Ok(self.double_at(index))
    }

    /// Element `index` as an int, truncating doubles. Out-of-range values
    /// are NA.
    pub fn get_as_int(&self, index: usize) -> VectorResult<i32> {
        self.check(index)?;
        Ok(self.int_at(index))
    }

    /// Element `index` as a long, truncating doubles.
    pub fn get_as_long(&self, index: usize) -> VectorResult<i64> {
        self.check(index)?;
        Ok(self.long_at(index))
    }

    /// Element `index` as a logical: zero is false, anything else true.
    pub fn get_as_logical(&self, index: usize) -> VectorResult<Logical> {
        self.check(index)?;
        Ok(self.logical_at(index))
    }

    /// Element `index` as a plain bit. NA has no bit and is an error.
    pub fn get_as_bit(&self, index: usize) -> VectorResult<bool> {
        self.check(index)?;
        match self.logical_at(index).to_bool() {
            Some(bit) => Ok(bit),
            None => Err(VectorError::NaNotRepresentable {
                index,
                target: "bit",
            }),
        }
    }

    /// Element `index` as a complex number.
    pub fn get_as_complex(&self, index: usize) -> VectorResult<Complex> {
        self.check(index)?;
        Ok(self.complex_at(index))
    }

    /// Element `index` as a string; `None` is NA.
    pub fn get_as_string(&self, index: usize) -> VectorResult<Option<Arc<str>>> {
        self.check(index)?;
        Ok(self.string_at(index))
    }

    /// Element `index` as an object of type `T`. NA and values of another
    /// type are `None`.
    pub fn get_as_object<T: Any + Clone>(&self, index: usize) -> VectorResult<Option<T>> {
        self.check(index)?;
        Ok(self.value_at(index).downcast_ref::<T>().cloned())
    }

    /// Element `index` rendered for display, with `"NA"` for missing values.
    pub fn to_string_at(&self, index: usize) -> VectorResult<String> {
        self.check(index)?;
        Ok(self.value_at(index).to_string())
    }

    /// Returns true if element `index` is NA. Out-of-range indices are not
    /// NA.
    pub fn is_na(&self, index: usize) -> bool {
        if index >= self.len() {
            return false;
        }
        match &self.data {
            Data::Double(v) => v[index].is_na(),
            Data::Int(v) => v[index].is_na(),
            Data::Long(v) => v[index].is_na(),
            Data::Logical(v) => v[index].is_na(),
            Data::Complex(v) => v[index].is_na(),
            Data::String(v) => v[index].is_none(),
            Data::Object(v) | Data::Variable(v) => v[index].is_na(),
        }
    }

    /// Returns true if any element is NA.
    pub fn has_na(&self) -> bool {
        (0..self.len()).any(|i| self.is_na(i))
    }

    /// Number of NA elements.
    pub fn count_na(&self) -> usize {
        (0..self.len()).filter(|&i| self.is_na(i)).count()
    }

    /// Iterate over the elements as values.
    pub fn values(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(|i| self.value_at(i))
    }

    // ------------------------------------------------------------------------
    // Comparison
    // ------------------------------------------------------------------------

    /// Order elements `a` and `b` of this vector.
    pub fn compare(&self, a: usize, b: usize) -> VectorResult<Ordering> {
        self.vector_type().compare(self, a, self, b)
    }

    /// Order element `a` of this vector against element `b` of `other`,
    /// under this vector's type.
    pub fn compare_with(&self, a: usize, other: &Vector, b: usize) -> VectorResult<Ordering> {
        self.vector_type().compare(self, a, other, b)
    }

    /// Returns true if element `a` equals element `b` of `other`.
    pub fn equals_at(&self, a: usize, other: &Vector, b: usize) -> VectorResult<bool> {
        self.vector_type().equals(self, a, other, b)
    }

    // ------------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------------

    /// An empty builder of this vector's type.
    pub fn new_builder(&self) -> Builder {
        Builder::new(self.vector_type())
    }

    /// A builder of this vector's type with `len` NA elements.
    pub fn new_builder_with_len(&self, len: usize) -> Builder {
        Builder::with_len(self.vector_type(), len)
    }

    /// A builder holding a copy of this vector's elements.
    pub fn new_copy_builder(&self) -> Builder {
        Builder::from_vector(self)
    }

    // ------------------------------------------------------------------------
    // Subsets
    // ------------------------------------------------------------------------

    /// The elements at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> VectorResult<Vector> {
        for &i in indices {
            self.check(i)?;
        }
        Ok(self.pick(indices))
    }

    /// `indices` must be in range.
    fn pick(&self, indices: &[usize]) -> Vector {
        Self::from_data(map_data!(&self.data, |v| {
            Arc::new(indices.iter().map(|&i| v[i].clone()).collect())
        }))
    }

    /// The elements whose entry in `mask` is true. NA and false entries are
    /// dropped.
    pub fn select_mask(&self, mask: &Vector) -> VectorResult<Vector> {
        if mask.len() != self.len() {
            return Err(VectorError::LengthMismatch {
                left: self.len(),
                right: mask.len(),
            });
        }
        let indices: Vec<usize> = (0..self.len())
            .filter(|&i| mask.logical_at(i).is_true())
            .collect();
        Ok(self.pick(&indices))
    }

    /// The elements that are not NA, in order.
    pub fn non_na(&self) -> Vector {
        let indices: Vec<usize> = (0..self.len()).filter(|&i| !self.is_na(i)).collect();
        self.pick(&indices)
    }

    /// The first `n` elements, or all of them if there are fewer.
    pub fn head(&self, n: usize) -> Vector {
        let n = n.min(self.len());
        Self::from_data(map_data!(&self.data, |v| Arc::new(v[..n].to_vec())))
    }

    /// The last `n` elements, or all of them if there are fewer.
    pub fn tail(&self, n: usize) -> Vector {
        let start = self.len() - n.min(self.len());
        Self::from_data(map_data!(&self.data, |v| Arc::new(v[start..].to_vec())))
    }

    /// Indices that would sort the vector. The sort is stable.
    pub fn sorted_indices(&self, order: SortOrder) -> VectorResult<Vec<usize>> {
        let vector_type = self.vector_type();
        if vector_type == VectorType::Complex {
            return Err(VectorError::Unsupported {
                operation: "sort",
                vector_type,
            });
        }
        let values: Vec<Value> = self.values().collect();
        // Check every pair the sort could meet before sorting.
        if let Some(first) = values.iter().find(|v| !v.is_na()) {
            for v in &values {
                vector_type.compare_values(first, v)?;
            }
        }
        let mut indices: Vec<usize> = (0..values.len()).collect();
        indices.sort_by(|&a, &b| {
            let ordering = vector_type
                .compare_values(&values[a], &values[b])
                .unwrap_or(Ordering::Equal);
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        Ok(indices)
    }

    /// A sorted copy of the vector.
    pub fn sort(&self, order: SortOrder) -> VectorResult<Vector> {
        self.select(&self.sorted_indices(order)?)
    }

    // ------------------------------------------------------------------------
    // Array conversion
    // ------------------------------------------------------------------------

    fn to_array_with<T: Element>(
        &self,
        expected: &'static str,
        get: impl Fn(&Self, usize) -> T,
    ) -> VectorResult<Array<T>> {
        let actual = self.vector_type();
        if !actual.is_array_compatible() {
            return Err(VectorError::IllegalType { expected, actual });
        }
        let data = (0..self.len()).map(|i| get(self, i)).collect();
        Ok(Array::from_vec(data)?)
    }

    /// A one-dimensional double array of the elements.
    pub fn to_double_array(&self) -> VectorResult<DoubleArray> {
        self.to_array_with("double array", Self::double_at)
    }

    /// A one-dimensional int array of the elements.
    pub fn to_int_array(&self) -> VectorResult<IntArray> {
        self.to_array_with("int array", Self::int_at)
    }

    /// A one-dimensional long array of the elements.
    pub fn to_long_array(&self) -> VectorResult<LongArray> {
        self.to_array_with("long array", Self::long_at)
    }

    /// A one-dimensional complex array of the elements.
    pub fn to_complex_array(&self) -> VectorResult<ComplexArray> {
        self.to_array_with("complex array", Self::complex_at)
    }

    /// A one-dimensional logical array of the elements.
    pub fn to_logical_array(&self) -> VectorResult<LogicalArray> {
        self.to_array_with("logical array", Self::logical_at)
    }

    /// A one-dimensional bit array of the elements. Fails on NA, which bits
    /// cannot hold.
    pub fn to_bit_array(&self) -> VectorResult<BitArray> {
        if let Some(index) = (0..self.len()).find(|&i| self.is_na(i)) {
            return Err(VectorError::NaNotRepresentable {
                index,
                target: "bit",
            });
        }
        self.to_array_with("bit array", |v, i| v.logical_at(i).is_true())
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.vector_type() == other.vector_type()
            && self.len() == other.len()
            && self.values().zip(other.values()).all(|(a, b)| a == b)
    }
}

impl Eq for Vector {}

impl Hash for Vector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.vector_type().hash(state);
        self.len().hash(state);
        for value in self.values() {
            value.hash(state);
        }
    }
}

impl Vector {
    fn fmt_value(&self, f: &mut fmt::Formatter<'_>, index: usize) -> fmt::Result {
        match (self.value_at(index), f.precision()) {
            (Value::Double(x), Some(p)) if !x.is_na() => write!(f, "{x:.p$}"),
            (value, _) => write!(f, "{value}"),
        }
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max = Options::current().print_max_per_dimension;
        let len = self.len();
        let (head, tail) = if len > max {
            (max - max / 2, max / 2)
        } else {
            (len, 0)
        };
        write!(f, "[")?;
        for i in 0..head {
            if i > 0 {
                write!(f, ", ")?;
            }
            self.fmt_value(f, i)?;
        }
        if len > max {
            write!(f, ", ...")?;
        }
        for i in len - tail..len {
            write!(f, ", ")?;
            self.fmt_value(f, i)?;
        }
        write!(f, "] {}", self.vector_type())
    }
}

/// Element types that map onto a vector kind.
pub trait VectorElement: Element {
    /// Wrap `values` as a vector of the matching kind.
    fn into_vector(values: Vec<Self>) -> Vector;
}

macro_rules! vector_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl VectorElement for $ty {
                fn into_vector(values: Vec<Self>) -> Vector {
                    Vector::from_data(Data::$variant(Arc::new(values)))
                }
            }
        )*
    };
}

vector_element!(
    f64 => Double,
    i32 => Int,
    i64 => Long,
    Logical => Logical,
    Complex => Complex,
);

impl VectorElement for bool {
    fn into_vector(values: Vec<Self>) -> Vector {
        let values = values.into_iter().map(Logical::from_bool).collect();
        Vector::from_data(Data::Logical(Arc::new(values)))
    }
}

impl<T: VectorElement> From<Vec<T>> for Vector {
    fn from(values: Vec<T>) -> Self {
        T::into_vector(values)
    }
}

impl<T: VectorElement> FromIterator<T> for Vector {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        T::into_vector(iter.into_iter().collect())
    }
}

impl From<Vec<&str>> for Vector {
    fn from(values: Vec<&str>) -> Self {
        let values = values.into_iter().map(|s| Some(Arc::from(s))).collect();
        Vector::from_data(Data::String(Arc::new(values)))
    }
}

impl From<Vec<String>> for Vector {
    fn from(values: Vec<String>) -> Self {
        let values = values.into_iter().map(|s| Some(Arc::from(s))).collect();
        Vector::from_data(Data::String(Arc::new(values)))
    }
}

impl From<Vec<Option<String>>> for Vector {
    fn from(values: Vec<Option<String>>) -> Self {
        let values = values.into_iter().map(|s| s.map(Arc::from)).collect();
        Vector::from_data(Data::String(Arc::new(values)))
    }
}

/// Types readable from any vector element with [`Vector::get`].
pub trait Extract: Sized {
    /// Read element `index` of `vector`.
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self>;
}

impl Extract for f64 {
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self> {
        vector.get_as_double(index)
    }
}

impl Extract for i32 {
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self> {
        vector.get_as_int(index)
    }
}

impl Extract for i64 {
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self> {
        vector.get_as_long(index)
    }
}

impl Extract for Logical {
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self> {
        vector.get_as_logical(index)
    }
}

impl Extract for Complex {
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self> {
        vector.get_as_complex(index)
    }
}

impl Extract for Option<Arc<str>> {
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self> {
        vector.get_as_string(index)
    }
}

impl Extract for Value {
    fn extract(vector: &Vector, index: usize) -> VectorResult<Self> {
        vector.get_value(index)
    }
}
