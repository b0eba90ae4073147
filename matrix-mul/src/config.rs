//! Command-line configuration and request validation.

use std::num::NonZeroUsize;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;
use matrix_types::FillMode;
use thiserror::Error;

use crate::matrix_mul::DEFAULT_WORKERS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("inconsistent options: squaring needs -x > 0, -s >= 1 and no -y/-z")]
    InconsistentSquare,

    #[error("x, y, and z all need to be specified")]
    MissingDimensions,

    #[error("at least one thread is required")]
    NoWorkers,
}

/// Threaded matrix multiply / repeated squaring benchmark.
///
/// Without `-s`, computes C (x×z) = A (x×y) × B (y×z). With `-s t`, squares
/// the x×x matrix A t times.
#[derive(Debug, Clone, Parser)]
#[command(name = "matrix-mul", version)]
pub struct Config {
    /// Print the input and result matrices
    #[arg(short, long)]
    pub debug: bool,

    /// Use random data between 0 and 0.1
    #[arg(short, long)]
    pub random: bool,

    /// Seed for --random (defaults to the current time)
    #[arg(long, value_name = "SEED", requires = "random")]
    pub seed: Option<u64>,

    /// Square the matrix t times
    #[arg(short, long, value_name = "T")]
    pub square: Option<usize>,

    /// Rows of A; rows and columns when squaring
    #[arg(short = 'x', default_value_t = 0)]
    pub x: usize,

    /// Columns of A, rows of B
    #[arg(short = 'y', default_value_t = 0)]
    pub y: usize,

    /// Columns of B
    #[arg(short = 'z', default_value_t = 0)]
    pub z: usize,

    /// Number of worker threads
    #[arg(
        short = 'n',
        long,
        value_name = "N",
        env = "MATRIX_MUL_THREADS",
        default_value_t = DEFAULT_WORKERS.get()
    )]
    pub threads: usize,

    /// Report CPU and wall-clock time of the computation
    #[arg(short = 'T', long = "time")]
    pub timed: bool,

    /// Run the single-threaded reference instead of the thread pool
    #[arg(long)]
    pub serial: bool,
}

/// The computation a validated [`Config`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    Product { rows: usize, inner: usize, cols: usize },
    Power { n: usize, rounds: usize },
}

/// A validated run configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub job: Job,
    pub workers: NonZeroUsize,
    pub fill: FillMode,
    pub debug: bool,
    pub timed: bool,
    pub serial: bool,
}

impl Config {
    /// Checks option consistency and resolves defaults.
    pub fn plan(&self) -> Result<Plan, ConfigError> {
        let job = match self.square {
            Some(rounds) => {
                if self.y != 0 || self.z != 0 || self.x == 0 || rounds < 1 {
                    return Err(ConfigError::InconsistentSquare);
                }
                Job::Power { n: self.x, rounds }
            }
            None => {
                if self.x == 0 || self.y == 0 || self.z == 0 {
                    return Err(ConfigError::MissingDimensions);
                }
                Job::Product {
                    rows: self.x,
                    inner: self.y,
                    cols: self.z,
                }
            }
        };

        let workers = NonZeroUsize::new(self.threads).ok_or(ConfigError::NoWorkers)?;

        let fill = if self.random {
            FillMode::Random {
                seed: self.seed.unwrap_or_else(clock_seed),
            }
        } else {
            FillMode::Deterministic
        };

        Ok(Plan {
            job,
            workers,
            fill,
            debug: self.debug,
            timed: self.timed,
            serial: self.serial,
        })
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}
