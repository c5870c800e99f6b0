//! Human-readable array formatting.
//!
//! Precision and the number of elements shown per dimension come from
//! [`Options`]; an explicit `{:.N}` precision in the format string wins.
//! NA prints as `NA`.

use std::fmt;
use std::iter;

use stratum_core::Options;

use crate::array::{ArrayView, StridedArray};
use crate::storage::{Element, ElementAccess};

/// Indices to print along a dimension of size `n`; `None` marks the elision.
fn visible(n: usize, max: usize) -> Vec<Option<usize>> {
    if n <= max {
        return (0..n).map(Some).collect();
    }
    let head = max.div_ceil(2);
    let tail = max / 2;
    (0..head)
        .map(Some)
        .chain(iter::once(None))
        .chain((n - tail..n).map(Some))
        .collect()
}

struct Printer {
    precision: usize,
    max: usize,
}

impl Printer {
    fn cell<T: Element>(&self, value: Option<T>) -> String {
        value.map_or_else(|| "...".to_string(), |v| v.format(self.precision))
    }

    fn write<T: Element>(&self, f: &mut fmt::Formatter<'_>, a: &ArrayView<'_, T>) -> fmt::Result {
        match a.rank() {
            0 => f.write_str(&self.cell(a.get(0).ok())),
            1 => self.write_vector(f, a),
            2 => self.write_matrix(f, a),
            rank => self.write_slices(f, a, rank - 1),
        }
    }

    fn write_vector<T: Element>(
        &self,
        f: &mut fmt::Formatter<'_>,
        a: &ArrayView<'_, T>,
    ) -> fmt::Result {
        let cells: Vec<String> = visible(a.len(), self.max)
            .into_iter()
            .map(|i| self.cell(i.map(|i| a[i])))
            .collect();
        write!(f, "[{}]", cells.join(", "))
    }

    fn write_matrix<T: Element>(
        &self,
        f: &mut fmt::Formatter<'_>,
        a: &ArrayView<'_, T>,
    ) -> fmt::Result {
        let rows = visible(a.rows(), self.max);
        let cols = visible(a.columns(), self.max);
        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|r| {
                cols.iter()
                    .map(|c| match (r, c) {
                        (Some(i), Some(j)) => self.cell(Some(a[[*i, *j]])),
                        _ => self.cell::<T>(None),
                    })
                    .collect()
            })
            .collect();
        let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);

        f.write_str("[")?;
        for (ri, row) in cells.iter().enumerate() {
            if ri > 0 {
                f.write_str(",\n ")?;
            }
            f.write_str("[")?;
            for (ci, cell) in row.iter().enumerate() {
                if ci > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{cell:>width$}")?;
            }
            f.write_str("]")?;
        }
        f.write_str("]")
    }

    fn write_slices<T: Element>(
        &self,
        f: &mut fmt::Formatter<'_>,
        a: &ArrayView<'_, T>,
        axis: usize,
    ) -> fmt::Result {
        let n = a.shape()[axis];
        for (k, index) in visible(n, self.max).into_iter().enumerate() {
            if k > 0 {
                f.write_str("\n\n")?;
            }
            match index {
                Some(i) => {
                    writeln!(f, "(..., {i}) =")?;
                    match a.select(axis, i) {
                        Ok(slice) => self.write(f, &slice)?,
                        Err(_) => return Err(fmt::Error),
                    }
                }
                None => f.write_str("...")?,
            }
        }
        Ok(())
    }
}

impl<B: ElementAccess> fmt::Display for StridedArray<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = Options::current();
        let printer = Printer {
            precision: f.precision().unwrap_or(options.print_precision),
            max: options.print_max_per_dimension,
        };
        printer.write(f, &self.view())
    }
}
