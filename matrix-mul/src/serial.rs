//! Single-threaded reference implementations.
//!
//! These run the same inner product as the threaded engine on the calling
//! thread and are selected with `--serial`. Results match [`MatrixMul`]
//! bit for bit.
//!
//! [`MatrixMul`]: crate::MatrixMul

use matrix_types::Matrix;

use crate::Error;
use crate::product::dot;

/// Computes `a × b` with the naive triple loop.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
    if a.cols() != b.rows() {
        return Err(Error::DimensionMismatch(a.rows(), a.cols(), b.rows(), b.cols()));
    }
    let mut c = Matrix::zeros(a.rows(), b.cols())?;
    multiply_into(a.as_slice(), b.as_slice(), c.as_mut_slice(), a.cols(), b.cols());
    Ok(c)
}

/// Squares `a` `rounds` times, producing A^(2^rounds).
///
/// Alternates between two buffers so each round squares the previous
/// result without copying.
pub fn square(a: &Matrix, rounds: usize) -> Result<Matrix, Error> {
    if !a.is_square() {
        return Err(Error::NotSquare {
            rows: a.rows(),
            cols: a.cols(),
        });
    }
    if rounds == 0 {
        return Err(Error::InvalidRounds);
    }

    let n = a.rows();
    let mut current = a.clone();
    let mut next = Matrix::zeros(n, n)?;
    for _ in 0..rounds {
        multiply_into(current.as_slice(), current.as_slice(), next.as_mut_slice(), n, n);
        std::mem::swap(&mut current, &mut next);
    }
    Ok(current)
}

fn multiply_into(a: &[f64], b: &[f64], c: &mut [f64], inner: usize, cols: usize) {
    for (idx, cell) in c.iter_mut().enumerate() {
        let (row, col) = (idx / cols, idx % cols);
        *cell = dot(inner, |k| a[row * inner + k], |k| b[k * cols + col]);
    }
}
