//! Sequential vs. partitioned parallel summation of a random `u32` vector.
//!
//! The parallel path splits the input into `workers` contiguous, disjoint
//! ranges whose lengths differ by at most one. Each worker reduces its own
//! range; the caller waits for all of them and adds the partial sums in
//! ascending partition order.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use rayon::prelude::*;
use serde::Deserialize;
use std::io::Write;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AccumulateConfig;
use crate::error::{BenchError, Result};
use crate::timing::{millis, timed};

/// Lengths are reported in units of this many elements.
pub const SIZE_UNIT: usize = 100_000;

/// Largest value drawn into the benchmark vector.
pub const MAX_ELEMENT: u32 = 2;

pub fn make_random_vector<R: Rng>(len: usize, rng: &mut R) -> Vec<u32> {
    let dist = Uniform::new_inclusive(0, MAX_ELEMENT);
    (0..len).map(|_| dist.sample(rng)).collect()
}

pub fn sequential_sum(data: &[u32]) -> u64 {
    data.iter().map(|&x| u64::from(x)).sum()
}

/// Splits `0..len` into `parts` contiguous half-open ranges. Part `i` starts
/// at `len * i / parts`.
pub fn partition_bounds(len: usize, parts: usize) -> Vec<Range<usize>> {
    if parts == 0 {
        return Vec::new();
    }
    (0..parts)
        .map(|i| len * i / parts..len * (i + 1) / parts)
        .collect()
}

// =============================================================================
// Parallel reduction
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Executor {
    /// One scoped OS thread per partition.
    #[default]
    ScopedThreads,
    /// A dedicated rayon pool with one thread per partition.
    RayonPool,
}

/// Holds the rayon pool, if any, so repeated sums reuse the same threads.
pub struct ParallelSummer {
    workers: usize,
    pool: Option<rayon::ThreadPool>,
}

impl ParallelSummer {
    pub fn new(workers: usize, executor: Executor) -> Result<Self> {
        if workers == 0 {
            return Err(BenchError::invalid_config("at least one worker is required"));
        }

        let pool = match executor {
            Executor::ScopedThreads => None,
            Executor::RayonPool => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(workers)
                    .thread_name(|i| format!("sum-worker-{i}"))
                    .build()
                    .map_err(|e| BenchError::invalid_config(e.to_string()))?,
            ),
        };

        Ok(Self { workers, pool })
    }

    pub fn sum(&self, data: &[u32]) -> Result<u64> {
        let partials = self.partial_sums(data, sequential_sum)?;
        Ok(partials.into_iter().sum())
    }

    /// Runs `worker` over every partition and returns the results indexed by
    /// partition.
    fn partial_sums<F>(&self, data: &[u32], worker: F) -> Result<Vec<u64>>
    where
        F: Fn(&[u32]) -> u64 + Sync,
    {
        let ranges = partition_bounds(data.len(), self.workers);

        match &self.pool {
            None => scoped_partials(data, &ranges, &worker),
            Some(pool) => pool.install(|| {
                ranges
                    .par_iter()
                    .enumerate()
                    .map(|(partition, range)| {
                        panic::catch_unwind(AssertUnwindSafe(|| worker(&data[range.clone()])))
                            .map_err(|_| BenchError::WorkerPanicked { partition })
                    })
                    .collect()
            }),
        }
    }
}

fn scoped_partials<F>(data: &[u32], ranges: &[Range<usize>], worker: &F) -> Result<Vec<u64>>
where
    F: Fn(&[u32]) -> u64 + Sync,
{
    thread::scope(|s| {
        let handles: Vec<_> = ranges
            .iter()
            .cloned()
            .map(|range| s.spawn(move || worker(&data[range])))
            .collect();

        // Join everything before inspecting results so no panicked thread is
        // left for the scope to re-raise.
        let joined: Vec<_> = handles.into_iter().map(|h| h.join()).collect();

        joined
            .into_iter()
            .enumerate()
            .map(|(partition, res)| res.map_err(|_| BenchError::WorkerPanicked { partition }))
            .collect()
    })
}

pub fn parallel_sum(data: &[u32], workers: usize, executor: Executor) -> Result<u64> {
    ParallelSummer::new(workers, executor)?.sum(data)
}

pub fn check_sums(length: usize, sequential: u64, parallel: u64) -> Result<u64> {
    if sequential != parallel {
        return Err(BenchError::SumMismatch {
            length,
            sequential,
            parallel,
        });
    }
    Ok(sequential)
}

// =============================================================================
// Driver
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AccumulateRow {
    pub length: usize,
    pub sequential: Duration,
    pub parallel: Duration,
    pub sum: u64,
}

impl AccumulateRow {
    pub fn size_column(&self) -> usize {
        self.length / SIZE_UNIT
    }
}

/// Writes one `<len/100000>\t<sequential_ms>\t<parallel_ms>` line per
/// configured length. Each column is flushed as soon as it is known.
///
/// Stops at the first length whose two sums disagree.
pub fn run<R: Rng, W: Write>(
    config: &AccumulateConfig,
    rng: &mut R,
    out: &mut W,
) -> Result<Vec<AccumulateRow>> {
    config.validate()?;
    let summer = ParallelSummer::new(config.workers, config.executor)?;

    let cpus = num_cpus::get();
    if config.workers > cpus {
        warn!(workers = config.workers, cpus, "more workers than available cores");
    }
    info!(
        lengths = config.lengths.len(),
        workers = config.workers,
        executor = ?config.executor,
        "starting accumulation benchmark"
    );

    run_with(&config.lengths, rng, out, |data| summer.sum(data))
}

/// Measures every length with `parallel` as the parallel reduction.
fn run_with<R, W, P>(
    lengths: &[usize],
    rng: &mut R,
    out: &mut W,
    mut parallel: P,
) -> Result<Vec<AccumulateRow>>
where
    R: Rng,
    W: Write,
    P: FnMut(&[u32]) -> Result<u64>,
{
    let mut rows = Vec::with_capacity(lengths.len());
    for &length in lengths {
        let data = make_random_vector(length, rng);

        write!(out, "{}\t", length / SIZE_UNIT)?;
        out.flush()?;

        let (seq_total, sequential) = timed(|| sequential_sum(&data));
        write!(out, "{:.4}\t", millis(sequential))?;
        out.flush()?;

        let (par_total, par_elapsed) = timed(|| parallel(&data));
        let par_total = par_total?;
        writeln!(out, "{:.4}", millis(par_elapsed))?;

        let sum = check_sums(length, seq_total, par_total)?;
        debug!(length, sum, ?sequential, parallel = ?par_elapsed, "length done");

        rows.push(AccumulateRow {
            length,
            sequential,
            parallel: par_elapsed,
            sum,
        });
    }

    Ok(rows)
}
