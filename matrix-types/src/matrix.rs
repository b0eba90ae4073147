//! Row-major dense matrix storage.

use crate::Error;

/// A fixed-size, row-major matrix of `f64` values.
///
/// Both dimensions are always non-zero. Storage is allocated fallibly so an
/// oversized request surfaces as [`Error::Allocation`] instead of aborting
/// the process.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Allocates a `rows × cols` matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, Error> {
        let len = checked_len(rows, cols)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)?;
        data.resize(len, 0.0);
        Ok(Self { rows, cols, data })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, Error> {
        let expected = checked_len(rows, cols)?;
        if data.len() != expected {
            return Err(Error::Shape {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, Error> {
        let m = rows.len();
        let n = rows.first().map_or(0, |row| row.len());
        let expected = checked_len(m, n)?;

        let mut data = Vec::new();
        data.try_reserve_exact(expected)?;
        for row in rows {
            if row.len() != n {
                return Err(Error::Shape {
                    expected,
                    actual: data.len() + row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { rows: m, cols: n, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells, `rows * cols`.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Linear index of cell `(row, col)`.
    #[inline]
    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Returns the value at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of range");
        self.data[self.index(row, col)]
    }

    /// Stores `value` at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are outside the matrix.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "cell ({row}, {col}) out of range");
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Overwrites every cell with `f(row, col)`, in row-major order.
    pub fn fill_with(&mut self, mut f: impl FnMut(usize, usize) -> f64) {
        let cols = self.cols;
        for (idx, cell) in self.data.iter_mut().enumerate() {
            *cell = f(idx / cols, idx % cols);
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Copies the matrix out as nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.data.chunks(self.cols).map(<[f64]>::to_vec).collect()
    }
}

fn checked_len(rows: usize, cols: usize) -> Result<usize, Error> {
    if rows == 0 || cols == 0 {
        return Err(Error::ZeroDimension { rows, cols });
    }
    rows.checked_mul(cols).ok_or(Error::TooLarge { rows, cols })
}
