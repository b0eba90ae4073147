//! Per-partition inner-product kernel for C = A × B.

use matrix_types::Matrix;

use crate::partition::Partition;

/// Naive inner product of length `inner`, accumulated left to right.
///
/// Every engine goes through this function so that results are
/// bit-identical no matter how the cells are divided among workers.
#[inline]
pub(crate) fn dot(inner: usize, lhs: impl Fn(usize) -> f64, rhs: impl Fn(usize) -> f64) -> f64 {
    let mut sum = 0.0;
    for k in 0..inner {
        sum += lhs(k) * rhs(k);
    }
    sum
}

/// Computes the cells of `a × b` owned by `part` into `out`.
///
/// `out` is the partition's slice of C: `out[i]` holds linear cell
/// `part.start + i`.
pub(crate) fn multiply_partition(a: &Matrix, b: &Matrix, part: &Partition, out: &mut [f64]) {
    debug_assert_eq!(out.len(), part.len);
    let inner = a.cols();
    let cols = b.cols();
    let (a, b) = (a.as_slice(), b.as_slice());

    for (slot, (_, row, col)) in out.iter_mut().zip(part.cells(cols)) {
        *slot = dot(inner, |k| a[row * inner + k], |k| b[k * cols + col]);
    }
}
