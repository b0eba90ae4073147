use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use matrix_mul::{Error, MatrixMul, Request, RoundObserver, serial};
use matrix_types::{FillMode, Generator, Matrix};

fn engine(workers: usize) -> MatrixMul {
    MatrixMul::new(NonZeroUsize::new(workers).unwrap())
}

fn generated(rows: usize, cols: usize, fill: FillMode) -> Matrix {
    let mut m = Matrix::zeros(rows, cols).unwrap();
    Generator::new(fill).fill(&mut m);
    m
}

/// Textbook triple loop, independent of the crate's kernels.
fn naive_product(a: &Matrix, b: &Matrix) -> Matrix {
    let mut c = Matrix::zeros(a.rows(), b.cols()).unwrap();
    for i in 0..a.rows() {
        for j in 0..b.cols() {
            let mut sum = 0.0;
            for k in 0..a.cols() {
                sum += a.get(i, k) * b.get(k, j);
            }
            c.set(i, j, sum);
        }
    }
    c
}

fn naive_accumulated_power(a: &Matrix, rounds: usize) -> Matrix {
    (0..rounds).fold(a.clone(), |acc, _| naive_product(&acc, &acc))
}

fn bits(m: &Matrix) -> Vec<u64> {
    m.as_slice().iter().map(|v| v.to_bits()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    Finish,
}

/// Records every round boundary with a global sequence number.
#[derive(Default)]
struct Recorder {
    seq: AtomicUsize,
    events: Mutex<Vec<(usize, usize, usize, Edge)>>,
}

impl Recorder {
    fn record(&self, worker: usize, round: usize, edge: Edge) {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push((seq, worker, round, edge));
    }

    fn events(&self) -> Vec<(usize, usize, usize, Edge)> {
        self.events.lock().unwrap().clone()
    }
}

impl RoundObserver for Recorder {
    fn round_started(&self, worker: usize, round: usize) {
        self.record(worker, round, Edge::Start);
    }

    fn round_finished(&self, worker: usize, round: usize) {
        self.record(worker, round, Edge::Finish);
    }
}

#[test]
fn test_product_small() {
    let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let b = Matrix::from_rows(vec![vec![5.0, 6.0], vec![7.0, 8.0]]).unwrap();

    for workers in [1, 2, 3, 4, 8] {
        let c = engine(workers).multiply(&a, &b).unwrap();
        assert_eq!(c.to_rows(), vec![vec![19.0, 22.0], vec![43.0, 50.0]]);
    }
}

#[test]
fn test_product_matches_naive_reference_bitwise() {
    let a = generated(7, 11, FillMode::Random { seed: 3 });
    let b = generated(11, 5, FillMode::Random { seed: 4 });
    let expected = bits(&naive_product(&a, &b));

    for workers in [1, 2, 3, 6, 35, 100] {
        let c = engine(workers).multiply(&a, &b).unwrap();
        assert_eq!(bits(&c), expected, "workers = {workers}");
    }
    assert_eq!(bits(&serial::multiply(&a, &b).unwrap()), expected);
}

#[test]
fn test_product_leaves_inputs_untouched() {
    let a = generated(4, 3, FillMode::Deterministic);
    let b = generated(3, 6, FillMode::Deterministic);
    let (a_before, b_before) = (a.clone(), b.clone());

    engine(5).multiply(&a, &b).unwrap();

    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn test_product_dimension_mismatch() {
    let a = Matrix::zeros(2, 3).unwrap();
    let b = Matrix::zeros(2, 3).unwrap();
    let err = engine(2).multiply(&a, &b).unwrap_err();
    assert!(matches!(err, Error::DimensionMismatch(2, 3, 2, 3)));
}

#[test]
fn test_power_accumulates_squares() {
    // [[1,1],[0,1]]^k = [[1,k],[0,1]]
    let a = Matrix::from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();

    for rounds in 1..=6 {
        let b = engine(3).square(&a, rounds).unwrap();
        let k = (1u64 << rounds) as f64;
        assert_eq!(b.to_rows(), vec![vec![1.0, k], vec![0.0, 1.0]], "rounds = {rounds}");
    }
}

#[test]
fn test_power_does_not_resquare_original() {
    let a = Matrix::from_rows(vec![vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();
    let original_each_round = naive_product(&a, &a);

    let b = engine(2).square(&a, 2).unwrap();

    assert_ne!(b, original_each_round);
    assert_eq!(b, naive_accumulated_power(&a, 2));
}

#[test]
fn test_power_matches_references_bitwise() {
    let a = generated(13, 13, FillMode::Deterministic);
    let rounds = 3;
    let expected = bits(&naive_accumulated_power(&a, rounds));

    for workers in [1, 2, 4, 7, 169, 500] {
        let b = engine(workers).square(&a, rounds).unwrap();
        assert_eq!(bits(&b), expected, "workers = {workers}");
    }
    assert_eq!(bits(&serial::square(&a, rounds).unwrap()), expected);
}

#[test]
fn test_power_single_round() {
    let a = generated(5, 5, FillMode::Random { seed: 11 });
    let b = engine(4).run(Request::Power { a: &a, rounds: 1 }).unwrap();
    assert_eq!(bits(&b), bits(&naive_product(&a, &a)));
}

#[test]
fn test_power_leaves_input_untouched() {
    let a = generated(6, 6, FillMode::Deterministic);
    let before = a.clone();
    engine(4).square(&a, 4).unwrap();
    assert_eq!(a, before);
}

#[test]
fn test_power_rejects_invalid_requests() {
    let square = Matrix::zeros(3, 3).unwrap();
    assert!(matches!(engine(2).square(&square, 0), Err(Error::InvalidRounds)));

    let recorder = Recorder::default();
    let _ = engine(2).square_observed(&square, 0, &recorder);
    assert!(recorder.events().is_empty(), "workers ran for a rejected request");

    let wide = Matrix::zeros(2, 3).unwrap();
    assert!(matches!(
        engine(2).square(&wide, 1),
        Err(Error::NotSquare { rows: 2, cols: 3 })
    ));
}

#[test]
fn test_power_round_count() {
    let a = generated(6, 6, FillMode::Deterministic);
    let rounds = 5;
    let workers = 4;
    let recorder = Recorder::default();

    engine(workers).square_observed(&a, rounds, &recorder).unwrap();

    let events = recorder.events();
    for worker in 0..workers {
        let started: Vec<_> = events
            .iter()
            .filter(|e| e.1 == worker && e.3 == Edge::Start)
            .map(|e| e.2)
            .collect();
        assert_eq!(started, (1..=rounds).collect::<Vec<_>>(), "worker {worker}");
    }
    assert_eq!(events.len(), 2 * rounds * workers);
}

#[test]
fn test_power_barrier_orders_rounds() {
    let a = generated(9, 9, FillMode::Random { seed: 5 });
    let rounds = 8;
    let recorder = Recorder::default();

    engine(6).square_observed(&a, rounds, &recorder).unwrap();

    let events = recorder.events();
    for round in 1..rounds {
        let last_finish = events
            .iter()
            .filter(|e| e.2 == round && e.3 == Edge::Finish)
            .map(|e| e.0)
            .max()
            .unwrap();
        let first_start = events
            .iter()
            .filter(|e| e.2 == round + 1 && e.3 == Edge::Start)
            .map(|e| e.0)
            .min()
            .unwrap();
        assert!(
            last_finish < first_start,
            "round {} started before round {round} finished",
            round + 1
        );
    }
}

#[test]
fn test_single_worker_still_rounds_through_barrier() {
    let a = Matrix::from_rows(vec![vec![2.0]]).unwrap();
    let recorder = Recorder::default();

    let b = engine(1).square_observed(&a, 4, &recorder).unwrap();

    assert_eq!(b.get(0, 0), 65536.0);
    assert_eq!(recorder.events().len(), 8);
}

#[test]
fn test_workers_clamped_to_cells() {
    let mm = engine(16);
    assert_eq!(mm.effective_workers(4), 4);
    assert_eq!(mm.effective_workers(100), 16);

    let a = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let recorder = Recorder::default();
    mm.square_observed(&a, 2, &recorder).unwrap();

    let workers: HashSet<_> = recorder.events().iter().map(|e| e.1).collect();
    assert_eq!(workers, (0..4).collect());
}

#[test]
fn test_deterministic_fill_is_reproducible() {
    let run = || {
        let a = generated(10, 8, FillMode::Deterministic);
        let b = generated(8, 9, FillMode::Deterministic);
        let c = engine(3).multiply(&a, &b).unwrap();
        let p = engine(3).square(&generated(8, 8, FillMode::Deterministic), 3).unwrap();
        (bits(&c), bits(&p))
    };
    assert_eq!(run(), run());
}

#[test]
fn test_run_dispatches_product() {
    let a = generated(3, 2, FillMode::Deterministic);
    let b = generated(2, 4, FillMode::Deterministic);
    let c = MatrixMul::default().run(Request::Product { a: &a, b: &b }).unwrap();
    assert_eq!((c.rows(), c.cols()), (3, 4));
    assert_eq!(bits(&c), bits(&naive_product(&a, &b)));
}

/// Fails the round it is told to, on one worker only.
struct FailingObserver {
    worker: usize,
    round: usize,
}

impl RoundObserver for FailingObserver {
    fn round_started(&self, worker: usize, round: usize) {
        if (worker, round) == (self.worker, self.round) {
            panic!("observer failed on worker {worker}, round {round}");
        }
    }
}

fn assert_square_panics_promptly(workers: usize, observer: FailingObserver) {
    let handle = thread::spawn(move || {
        let a = generated(4, 4, FillMode::Deterministic);
        engine(workers).square_observed(&a, 3, &observer)
    });

    let deadline = Instant::now() + Duration::from_secs(10);
    while !handle.is_finished() {
        assert!(Instant::now() < deadline, "square_observed hung after a worker panicked");
        thread::sleep(Duration::from_millis(10));
    }
    assert!(handle.join().is_err(), "worker panic was not propagated");
}

#[test]
fn test_worker_panic_aborts_power_request() {
    assert_square_panics_promptly(2, FailingObserver { worker: 1, round: 1 });
}

#[test]
fn test_worker_panic_in_later_round_aborts_power_request() {
    assert_square_panics_promptly(4, FailingObserver { worker: 0, round: 2 });
}
