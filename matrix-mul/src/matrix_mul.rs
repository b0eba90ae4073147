//! Threaded matrix multiplication and repeated squaring.

use std::io;
use std::num::NonZeroUsize;
use std::thread::{self, Scope};

use matrix_types::Matrix;
use tracing::{debug, info};

use crate::Error;
use crate::gate::RoundGate;
use crate::partition::Partitioner;
use crate::power::{BufferPair, PowerWorker, RoundObserver};
use crate::product::multiply_partition;

/// Worker count used when the caller does not pick one.
pub const DEFAULT_WORKERS: NonZeroUsize = match NonZeroUsize::new(8) {
    Some(n) => n,
    None => unreachable!(),
};

/// Starts one worker thread inside a scope.
///
/// The engine only ever uses [`OsThreads`]; the seam lets tests make
/// thread creation fail part-way through a pool.
pub(crate) trait Spawner {
    fn spawn<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        name: String,
        f: F,
    ) -> io::Result<()>
    where
        F: FnOnce() + Send + 'scope;
}

/// Named scoped OS threads.
pub(crate) struct OsThreads;

impl Spawner for OsThreads {
    fn spawn<'scope, 'env, F>(
        &self,
        scope: &'scope Scope<'scope, 'env>,
        name: String,
        f: F,
    ) -> io::Result<()>
    where
        F: FnOnce() + Send + 'scope,
    {
        thread::Builder::new().name(name).spawn_scoped(scope, f)?;
        Ok(())
    }
}

/// A single computation handed to [`MatrixMul::run`].
#[derive(Debug, Clone, Copy)]
pub enum Request<'a> {
    /// C = A × B.
    Product { a: &'a Matrix, b: &'a Matrix },
    /// A squared `rounds` times, i.e. A^(2^rounds).
    Power { a: &'a Matrix, rounds: usize },
}

/// Thread pool orchestrator.
///
/// `MatrixMul` spawns a fresh set of scoped OS threads for every request,
/// hands each one a static partition of the result cells, and joins them
/// before returning the result.
///
/// # Worker Count
///
/// The configured count is an upper bound: a request with fewer result
/// cells than workers runs one worker per cell.
///
/// # Example
///
/// ```
/// use matrix_mul::MatrixMul;
/// use matrix_types::Matrix;
///
/// let mm = MatrixMul::default();
/// let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
/// let b = Matrix::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]])?;
///
/// let c = mm.multiply(&a, &b)?;
/// assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
/// # Ok::<(), matrix_mul::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MatrixMul {
    workers: NonZeroUsize,
}

impl Default for MatrixMul {
    fn default() -> Self {
        Self::new(DEFAULT_WORKERS)
    }
}

impl MatrixMul {
    pub fn new(workers: NonZeroUsize) -> Self {
        Self { workers }
    }

    /// Requested worker count, before clamping.
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Number of workers actually spawned for a result of `cells` cells.
    pub fn effective_workers(&self, cells: usize) -> usize {
        Partitioner::new(cells, self.workers).workers()
    }

    /// Runs either kind of request.
    pub fn run(&self, request: Request<'_>) -> Result<Matrix, Error> {
        match request {
            Request::Product { a, b } => self.multiply(a, b),
            Request::Power { a, rounds } => self.square(a, rounds),
        }
    }

    /// Computes `a × b`.
    ///
    /// Workers never synchronize with each other: each one owns a disjoint
    /// slice of the output and runs to completion.
    pub fn multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
        self.multiply_with(a, b, &OsThreads)
    }

    pub(crate) fn multiply_with<S: Spawner>(
        &self,
        a: &Matrix,
        b: &Matrix,
        spawner: &S,
    ) -> Result<Matrix, Error> {
        if a.cols() != b.rows() {
            return Err(Error::DimensionMismatch(a.rows(), a.cols(), b.rows(), b.cols()));
        }

        let mut c = Matrix::zeros(a.rows(), b.cols())?;
        let partitioner = Partitioner::new(c.len(), self.workers);
        info!(
            rows = a.rows(),
            inner = a.cols(),
            cols = b.cols(),
            workers = partitioner.workers(),
            "multiplying"
        );

        thread::scope(|scope| {
            let mut rest = c.as_mut_slice();
            for part in partitioner.iter() {
                let (out, tail) = std::mem::take(&mut rest).split_at_mut(part.len);
                rest = tail;

                debug!(worker = part.worker, start = part.start, cells = part.len, "spawning");
                spawner
                    .spawn(
                        scope,
                        format!("mm-product-{}", part.worker),
                        move || multiply_partition(a, b, &part, out),
                    )
                    .map_err(|source| Error::Spawn {
                        worker: part.worker,
                        source,
                    })?;
            }
            Ok::<_, Error>(())
        })?;

        Ok(c)
    }

    /// Squares `a` `rounds` times, producing A^(2^rounds).
    pub fn square(&self, a: &Matrix, rounds: usize) -> Result<Matrix, Error> {
        self.square_observed(a, rounds, &())
    }

    /// Like [`square`](Self::square), reporting every worker's round
    /// boundaries to `observer`.
    ///
    /// All workers rendezvous at a barrier after each round; worker 0
    /// decrements the rounds-remaining counter on arrival and every worker
    /// continues or retires based on the value published at release.
    pub fn square_observed<O: RoundObserver>(
        &self,
        a: &Matrix,
        rounds: usize,
        observer: &O,
    ) -> Result<Matrix, Error> {
        self.square_with(a, rounds, observer, &OsThreads)
    }

    pub(crate) fn square_with<O: RoundObserver, S: Spawner>(
        &self,
        a: &Matrix,
        rounds: usize,
        observer: &O,
        spawner: &S,
    ) -> Result<Matrix, Error> {
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
        let partitioner = Partitioner::new(a.len(), self.workers);
        let buffers = BufferPair::new(a.as_slice())?;
        let gate = RoundGate::new(partitioner.workers(), rounds);
        info!(n, rounds, workers = partitioner.workers(), "squaring");

        thread::scope(|scope| {
            for part in partitioner.iter() {
                let worker = PowerWorker {
                    part,
                    n,
                    buffers: &buffers,
                    gate: &gate,
                    observer,
                };

                debug!(worker = part.worker, start = part.start, cells = part.len, "spawning");
                let spawned =
                    spawner.spawn(scope, format!("mm-square-{}", part.worker), move || worker.run());

                if let Err(source) = spawned {
                    gate.abort();
                    return Err(Error::Spawn {
                        worker: part.worker,
                        source,
                    });
                }
            }
            Ok(())
        })?;

        Ok(Matrix::from_vec(n, n, buffers.into_result(rounds))?)
    }
}
