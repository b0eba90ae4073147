//! Wall-clock and process CPU time around a computation.

use std::fmt;
use std::time::{Duration, Instant};

/// Elapsed times for one measured section.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Process CPU time (user + system) across all threads, when the
    /// platform reports it.
    pub cpu: Option<Duration>,
    pub wall: Duration,
}

impl fmt::Display for Timings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cpu {
            Some(cpu) => writeln!(f, "  cpu time: {:.6}", cpu.as_secs_f64())?,
            None => writeln!(f, "  cpu time: unavailable")?,
        }
        write!(f, "clock time: {:.6}", self.wall.as_secs_f64())
    }
}

/// Captures start times; [`Stopwatch::stop`] yields the [`Timings`].
pub struct Stopwatch {
    wall: Instant,
    cpu: Option<Duration>,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            cpu: process_cpu_time(),
            wall: Instant::now(),
        }
    }

    pub fn stop(self) -> Timings {
        let wall = self.wall.elapsed();
        let cpu = match (self.cpu, process_cpu_time()) {
            (Some(start), Some(end)) => Some(end.saturating_sub(start)),
            _ => None,
        };
        Timings { cpu, wall }
    }
}

/// Total CPU time consumed by this process so far.
#[cfg(unix)]
pub fn process_cpu_time() -> Option<Duration> {
    // SAFETY: `rusage` is plain old data and `getrusage` only writes into
    // the struct we pass.
    let usage = unsafe {
        let mut usage = std::mem::zeroed::<libc::rusage>();
        if libc::getrusage(libc::RUSAGE_SELF, &mut usage) != 0 {
            return None;
        }
        usage
    };
    Some(timeval(usage.ru_utime) + timeval(usage.ru_stime))
}

#[cfg(not(unix))]
pub fn process_cpu_time() -> Option<Duration> {
    None
}

#[cfg(unix)]
fn timeval(tv: libc::timeval) -> Duration {
    Duration::from_secs(tv.tv_sec as u64) + Duration::from_micros(tv.tv_usec as u64)
}
