//! Mutable accumulators that produce [`Vector`]s.

use std::cmp::Ordering;
use std::sync::Arc;

use stratum_core::{na, Complex, Logical, Options};

use crate::coerce::{self, Mode};
use crate::entry::DataEntry;
use crate::error::{VectorError, VectorResult};
use crate::value::Value;
use crate::vector::{Data, Vector};
use crate::vector_type::VectorType;

#[derive(Clone, Debug)]
enum Buffer {
    Double(Vec<f64>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Logical(Vec<Logical>),
    Complex(Vec<Complex>),
    String(Vec<Option<Arc<str>>>),
    Object(Vec<Value>),
    Variable(Vec<Value>),
}

macro_rules! with_buffer {
    ($buffer:expr, |$v:ident| $body:expr) => {
        match $buffer {
            Buffer::Double($v) => $body,
            Buffer::Int($v) => $body,
            Buffer::Long($v) => $body,
            Buffer::Logical($v) => $body,
            Buffer::Complex($v) => $body,
            Buffer::String($v) => $body,
            Buffer::Object($v) => $body,
            Buffer::Variable($v) => $body,
        }
    };
}

impl Buffer {
    fn with_capacity(vector_type: VectorType, capacity: usize) -> Self {
        match vector_type {
            VectorType::Double => Buffer::Double(Vec::with_capacity(capacity)),
            VectorType::Int => Buffer::Int(Vec::with_capacity(capacity)),
            VectorType::Long => Buffer::Long(Vec::with_capacity(capacity)),
            VectorType::Logical => Buffer::Logical(Vec::with_capacity(capacity)),
            VectorType::Complex => Buffer::Complex(Vec::with_capacity(capacity)),
            VectorType::String => Buffer::String(Vec::with_capacity(capacity)),
            VectorType::Object => Buffer::Object(Vec::with_capacity(capacity)),
            VectorType::Variable => Buffer::Variable(Vec::with_capacity(capacity)),
        }
    }

    fn from_data(data: &Data) -> Self {
        match data {
            Data::Double(v) => Buffer::Double(v.to_vec()),
            Data::Int(v) => Buffer::Int(v.to_vec()),
            Data::Long(v) => Buffer::Long(v.to_vec()),
            Data::Logical(v) => Buffer::Logical(v.to_vec()),
            Data::Complex(v) => Buffer::Complex(v.to_vec()),
            Data::String(v) => Buffer::String(v.to_vec()),
            Data::Object(v) => Buffer::Object(v.to_vec()),
            Data::Variable(v) => Buffer::Variable(v.to_vec()),
        }
    }

    fn into_data(self) -> Data {
        match self {
            Buffer::Double(v) => Data::Double(Arc::new(v)),
            Buffer::Int(v) => Data::Int(Arc::new(v)),
            Buffer::Long(v) => Data::Long(Arc::new(v)),
            Buffer::Logical(v) => Data::Logical(Arc::new(v)),
            Buffer::Complex(v) => Data::Complex(Arc::new(v)),
            Buffer::String(v) => Data::String(Arc::new(v)),
            Buffer::Object(v) => Data::Object(Arc::new(v)),
            Buffer::Variable(v) => Data::Variable(Arc::new(v)),
        }
    }

    fn vector_type(&self) -> VectorType {
        match self {
            Buffer::Double(_) => VectorType::Double,
            Buffer::Int(_) => VectorType::Int,
            Buffer::Long(_) => VectorType::Long,
            Buffer::Logical(_) => VectorType::Logical,
            Buffer::Complex(_) => VectorType::Complex,
            Buffer::String(_) => VectorType::String,
            Buffer::Object(_) => VectorType::Object,
            Buffer::Variable(_) => VectorType::Variable,
        }
    }

    fn len(&self) -> usize {
        with_buffer!(self, |v| v.len())
    }

    /// Grow to `len` elements, filling with NA.
    fn pad_to(&mut self, len: usize) {
        if len <= self.len() {
            return;
        }
        match self {
            Buffer::Double(v) => v.resize(len, na::double()),
            Buffer::Int(v) => v.resize(len, na::INT),
            Buffer::Long(v) => v.resize(len, na::LONG),
            Buffer::Logical(v) => v.resize(len, Logical::Na),
            Buffer::Complex(v) => v.resize(len, na::complex()),
            Buffer::String(v) => v.resize(len, None),
            Buffer::Object(v) | Buffer::Variable(v) => v.resize(len, Value::Na),
        }
    }

    fn value_at(&self, index: usize) -> Value {
        match self {
            Buffer::Double(v) => Value::Double(v[index]),
            Buffer::Int(v) => Value::Int(v[index]),
            Buffer::Long(v) => Value::Long(v[index]),
            Buffer::Logical(v) => Value::Logical(v[index]),
            Buffer::Complex(v) => Value::Complex(v[index]),
            Buffer::String(v) => v[index].clone().map_or(Value::Na, Value::Str),
            Buffer::Object(v) | Buffer::Variable(v) => v[index].clone(),
        }
    }
}

/// Log a value that could not be stored and hand back the NA to store.
/// The longest vector a builder can grow to.
pub const MAX_LEN: usize = i32::MAX as usize;

fn unrepresentable<T>(vector_type: VectorType, value: &Value, na: T) -> T {
    tracing::trace!(
        vector_type = %vector_type,
        value = ?value,
        "value not representable, storing NA"
    );
    na
}

/// A growable, typed element buffer that produces a [`Vector`].
///
/// Writing past the end grows the builder and fills the gap with NA.
/// Values are coerced into the builder's type; a value that cannot be
/// coerced is stored as NA, so setters never fail.
///
/// ```
/// use stratum_vector::{Builder, VectorType};
///
/// let mut b = Builder::new(VectorType::Int);
/// b.add(1).add("2").add(3.5);
/// let v = b.build();
/// assert_eq!(v.get_as_int(1).unwrap(), 2);
/// assert!(v.is_na(2));
/// ```
#[derive(Clone, Debug)]
pub struct Builder {
    buffer: Buffer,
}

impl Builder {
    /// An empty builder with the configured initial capacity.
    pub fn new(vector_type: VectorType) -> Self {
        Self::with_capacity(vector_type, Options::current().builder_initial_capacity)
    }

    /// An empty builder with room for `capacity` elements.
    pub fn with_capacity(vector_type: VectorType, capacity: usize) -> Self {
        Self {
            buffer: Buffer::with_capacity(vector_type, capacity),
        }
    }

    /// A builder holding `len` NA elements.
    pub fn with_len(vector_type: VectorType, len: usize) -> Self {
        let mut builder = Self::with_capacity(vector_type, len);
        builder.buffer.pad_to(len);
        builder
    }

    /// A builder holding a copy of `vector`.
    pub fn from_vector(vector: &Vector) -> Self {
        Self {
            buffer: Buffer::from_data(vector.data()),
        }
    }

    /// The type of the vector being built.
    pub fn vector_type(&self) -> VectorType {
        self.buffer.vector_type()
    }

    /// Number of elements so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
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
    // Writing
    // ------------------------------------------------------------------------

    /// Store `value` at `index`, growing the builder if needed.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_LEN`]. Use
    /// [`try_set`](Self::try_set) to get an error instead.
    pub fn set(&mut self, index: usize, value: impl Into<Value>) -> &mut Self {
        match self.try_set(index, value) {
            Ok(builder) => builder,
            Err(err) => panic!("{err}"),
        }
    }

    /// Store `value` at `index`, growing the builder if needed. Fails only
    /// when `index` is not below [`MAX_LEN`]; unconvertible values are
    /// stored as NA.
    pub fn try_set(&mut self, index: usize, value: impl Into<Value>) -> VectorResult<&mut Self> {
        if index >= MAX_LEN {
            return Err(VectorError::TooLong { index, max: MAX_LEN });
        }
        let value = value.into();
        let vector_type = self.vector_type();
        self.buffer.pad_to(index + 1);
        match &mut self.buffer {
            Buffer::Double(v) => {
                v[index] = coerce::to_double(&value, Mode::Exact)
                    .unwrap_or_else(|| unrepresentable(vector_type, &value, na::double()));
            }
            Buffer::Int(v) => {
                v[index] = coerce::to_int(&value, Mode::Exact)
                    .unwrap_or_else(|| unrepresentable(vector_type, &value, na::INT));
            }
            Buffer::Long(v) => {
                v[index] = coerce::to_long(&value, Mode::Exact)
                    .unwrap_or_else(|| unrepresentable(vector_type, &value, na::LONG));
            }
            Buffer::Logical(v) => {
                v[index] = coerce::to_logical(&value, Mode::Exact)
                    .unwrap_or_else(|| unrepresentable(vector_type, &value, Logical::Na));
            }
            Buffer::Complex(v) => {
                v[index] = coerce::to_complex(&value)
                    .unwrap_or_else(|| unrepresentable(vector_type, &value, na::complex()));
            }
            Buffer::String(v) => {
                v[index] = coerce::to_string(&value)
                    .unwrap_or_else(|| unrepresentable(vector_type, &value, None));
            }
            Buffer::Object(v) | Buffer::Variable(v) => {
                v[index] = if value.is_na() { Value::Na } else { value };
            }
        }
        Ok(self)
    }

    /// Append `value`.
    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        let index = self.len();
        self.set(index, value)
    }

    /// Store NA at `index`, growing the builder if needed.
    pub fn set_na(&mut self, index: usize) -> &mut Self {
        self.set(index, Value::Na)
    }

    /// Append NA.
    pub fn add_na(&mut self) -> &mut Self {
        self.add(Value::Na)
    }

    /// Store element `from` of `source` at `index`.
    pub fn set_from(
        &mut self,
        index: usize,
        source: &Vector,
        from: usize,
    ) -> VectorResult<&mut Self> {
        let value = source.get_value(from)?;
        self.try_set(index, value)
    }

    /// Append element `from` of `source`.
    pub fn add_from(&mut self, source: &Vector, from: usize) -> VectorResult<&mut Self> {
        let index = self.len();
        self.set_from(index, source, from)
    }

    /// Append every element of `source`.
    pub fn add_all(&mut self, source: &Vector) -> &mut Self {
        with_buffer!(&mut self.buffer, |v| v.reserve(source.len()));
        for value in source.values() {
            self.add(value);
        }
        self
    }

    /// Append every value of `values`.
    pub fn extend<I, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for value in values {
            self.add(value);
        }
        self
    }

    /// Remove element `index`, shifting later elements down.
    pub fn remove(&mut self, index: usize) -> VectorResult<&mut Self> {
        self.check(index)?;
        with_buffer!(&mut self.buffer, |v| {
            v.remove(index);
        });
        Ok(self)
    }

    /// Swap elements `a` and `b`.
    pub fn swap(&mut self, a: usize, b: usize) -> VectorResult<&mut Self> {
        self.check(a)?;
        self.check(b)?;
        with_buffer!(&mut self.buffer, |v| v.swap(a, b));
        Ok(self)
    }

    /// Element `index` as a [`Value`].
    pub fn get_value(&self, index: usize) -> VectorResult<Value> {
        self.check(index)?;
        Ok(self.buffer.value_at(index))
    }

    /// Order elements `a` and `b` under the builder's type.
    pub fn compare(&self, a: usize, b: usize) -> VectorResult<Ordering> {
        let (a, b) = (self.get_value(a)?, self.get_value(b)?);
        self.vector_type().compare_values(&a, &b)
    }

    // ------------------------------------------------------------------------
    // Reading entries
    // ------------------------------------------------------------------------

    /// Read one value from `entry` into `index`.
    pub fn read_at(&mut self, index: usize, entry: &mut dyn DataEntry) -> VectorResult<&mut Self> {
        let value = match self.vector_type() {
            VectorType::Double => Value::Double(entry.next_f64()?),
            VectorType::Int => Value::Int(entry.next_i32()?),
            VectorType::Long => Value::Long(entry.next_i64()?),
            VectorType::Logical => Value::Logical(entry.next_logical()?),
            VectorType::Complex => Value::Complex(entry.next_complex()?),
            VectorType::String | VectorType::Object | VectorType::Variable => {
                entry.next_string()?.map_or(Value::Na, Value::from)
            }
        };
        self.try_set(index, value)
    }

    /// Append one value read from `entry`.
    pub fn read(&mut self, entry: &mut dyn DataEntry) -> VectorResult<&mut Self> {
        let index = self.len();
        self.read_at(index, entry)
    }

    /// Append every remaining value of `entry`.
    pub fn read_all(&mut self, entry: &mut dyn DataEntry) -> VectorResult<&mut Self> {
        while entry.has_next() {
            self.read(entry)?;
        }
        Ok(self)
    }

    // ------------------------------------------------------------------------
    // Finishing
    // ------------------------------------------------------------------------

    /// A vector of the current contents. The builder stays usable.
    pub fn snapshot(&self) -> Vector {
        Vector::from_data(self.buffer.clone().into_data())
    }

    /// The finished vector. The buffer moves into the vector without a copy.
    pub fn build(self) -> Vector {
        tracing::trace!(
            vector_type = %self.vector_type(),
            len = self.len(),
            "building vector"
        );
        Vector::from_data(self.buffer.into_data())
    }
}

impl<V: Into<Value>> Extend<V> for Builder {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        Builder::extend(self, iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::NaValue;

    #[test]
    fn test_set_pads_with_na() {
        let mut b = Builder::new(VectorType::Double);
        b.set(5, 1.0);
        let v = b.build();
        assert_eq!(v.len(), 6);
        for i in 0..5 {
            assert!(v.is_na(i));
        }
        assert_eq!(v.get_as_double(5).unwrap(), 1.0);
    }

    #[test]
    fn test_with_len() {
        let b = Builder::with_len(VectorType::String, 3);
        assert_eq!(b.len(), 3);
        assert!(b.get_value(2).unwrap().is_na());
    }

    #[test]
    fn test_lossy_narrowing_stores_na() {
        let mut b = Builder::new(VectorType::Int);
        b.add(1.5).add(2.0).add(i64::MAX - 1);
        let v = b.build();
        assert!(v.is_na(0));
        assert_eq!(v.get_as_int(1).unwrap(), 2);
        assert!(v.is_na(2));
    }

    #[test]
    fn test_huge_index_fails_without_growing() {
        let mut b = Builder::new(VectorType::Double);
        b.add(1.0);
        let err = b.try_set(usize::MAX, 2.0).unwrap_err();
        assert!(matches!(err, VectorError::TooLong { index: usize::MAX, .. }));
        assert!(b.try_set(MAX_LEN, 2.0).is_err());
        assert_eq!(b.len(), 1);
        b.try_set(2, 3.0).unwrap();
        assert_eq!(b.len(), 3);
    }

    #[test]
    #[should_panic(expected = "exceeds the maximum vector length")]
    fn test_set_panics_past_max_len() {
        Builder::new(VectorType::Int).set(usize::MAX, 1);
    }

    #[test]
    fn test_remove_and_swap() {
        let mut b = Builder::new(VectorType::Long);
        b.extend([1_i64, 2, 3]);
        b.swap(0, 2).unwrap().remove(1).unwrap();
        assert_eq!(b.build(), Vector::from(vec![3_i64, 1]));
    }

    #[test]
    fn test_out_of_range_edits() {
        let mut b = Builder::new(VectorType::Int);
        b.add(1);
        assert!(b.remove(1).is_err());
        assert!(b.swap(0, 1).is_err());
        assert!(b.compare(0, 3).is_err());
    }

    #[test]
    fn test_snapshot_leaves_builder_usable() {
        let mut b = Builder::new(VectorType::Int);
        b.add(1);
        let first = b.snapshot();
        b.add(2);
        assert_eq!(first.len(), 1);
        assert_eq!(b.build().len(), 2);
    }

    #[test]
    fn test_compare() {
        let mut b = Builder::new(VectorType::Double);
        b.add(2.0).add_na().add(1.0);
        assert_eq!(b.compare(0, 2).unwrap(), Ordering::Greater);
        assert_eq!(b.compare(1, 2).unwrap(), Ordering::Less);
    }

    #[test]
    fn test_object_builder_keeps_values() {
        let mut b = Builder::new(VectorType::Object);
        b.add(Value::any(7_u64)).add(f64::na());
        let v = b.build();
        assert_eq!(v.get_as_object::<u64>(0).unwrap(), Some(7));
        assert!(v.is_na(1));
    }
}
