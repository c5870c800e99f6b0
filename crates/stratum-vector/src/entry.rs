//! Sequential value sources for builders.

use std::io;

use stratum_core::{na, Complex, Logical};

/// A cursor over textual values, read one at a time.
///
/// Only [`next_string`](DataEntry::next_string) is required; the typed
/// readers parse its output and turn anything unparseable into NA.
pub trait DataEntry {
    /// The next raw value. `None` is NA.
    fn next_string(&mut self) -> io::Result<Option<String>>;

    /// Returns true while values remain.
    fn has_next(&self) -> bool;

    /// Skip `n` values.
    fn skip(&mut self, n: usize) -> io::Result<()> {
        for _ in 0..n {
            self.next_string()?;
        }
        Ok(())
    }

    /// The next value as a double.
    fn next_f64(&mut self) -> io::Result<f64> {
        Ok(parse_next(self.next_string()?, na::double()))
    }

    /// The next value as an int.
    fn next_i32(&mut self) -> io::Result<i32> {
        Ok(parse_next(self.next_string()?, na::INT))
    }

    /// The next value as a long.
    fn next_i64(&mut self) -> io::Result<i64> {
        Ok(parse_next(self.next_string()?, na::LONG))
    }

    /// The next value as a logical.
    fn next_logical(&mut self) -> io::Result<Logical> {
        Ok(parse_next(self.next_string()?, Logical::Na))
    }

    /// The next value as a complex number.
    fn next_complex(&mut self) -> io::Result<Complex> {
        Ok(parse_next(self.next_string()?, na::complex()))
    }
}

fn parse_next<T: std::str::FromStr>(raw: Option<String>, na: T) -> T {
    match raw {
        None => na,
        Some(s) => s.trim().parse().unwrap_or_else(|_| {
            tracing::trace!(value = %s, "unparseable entry, reading NA");
            na
        }),
    }
}

/// A [`DataEntry`] over a list of strings.
///
/// `"NA"`, `"?"` and the empty string are read as NA.
#[derive(Clone, Debug, Default)]
pub struct StringDataEntry {
    values: Vec<String>,
    pos: usize,
}

impl StringDataEntry {
    /// Create an entry over `values`.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            pos: 0,
        }
    }

    /// Split `line` on `delimiter`.
    pub fn from_delimited(line: &str, delimiter: char) -> Self {
        Self::new(line.split(delimiter))
    }

    /// Values not yet read.
    pub fn remaining(&self) -> usize {
        self.values.len() - self.pos
    }
}

impl DataEntry for StringDataEntry {
    fn next_string(&mut self) -> io::Result<Option<String>> {
        let Some(value) = self.values.get(self.pos) else {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no value at position {}", self.pos),
            ));
        };
        self.pos += 1;
        let trimmed = value.trim();
        Ok(match trimmed {
            "NA" | "?" | "" => None,
            _ => Some(trimmed.to_string()),
        })
    }

    fn has_next(&self) -> bool {
        self.pos < self.values.len()
    }

    fn skip(&mut self, n: usize) -> io::Result<()> {
        if n > self.remaining() {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("cannot skip {n} of {} remaining values", self.remaining()),
            ));
        }
        self.pos += n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::NaValue;

    #[test]
    fn test_typed_reads() {
        let mut e = StringDataEntry::new(["1.5", " 7 ", "TRUE", "2+3i", "x"]);
        assert_eq!(e.next_f64().unwrap(), 1.5);
        assert_eq!(e.next_i32().unwrap(), 7);
        assert_eq!(e.next_logical().unwrap(), Logical::True);
        assert_eq!(e.next_complex().unwrap(), Complex::new(2.0, 3.0));
        assert!(e.next_i64().unwrap().is_na());
        assert!(!e.has_next());
    }

    #[test]
    fn test_na_markers() {
        let mut e = StringDataEntry::from_delimited("NA,?,,4", ',');
        assert!(e.next_f64().unwrap().is_na());
        assert_eq!(e.next_string().unwrap(), None);
        assert!(e.next_i32().unwrap().is_na());
        assert_eq!(e.next_i32().unwrap(), 4);
    }

    #[test]
    fn test_reading_past_end() {
        let mut e = StringDataEntry::new(["a"]);
        e.skip(1).unwrap();
        let err = e.next_string().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(e.skip(1).is_err());
    }
}
