//! Sequential vs. parallel accumulation benchmark.
//!
//! Run with: cargo run --release --bin accumulate_bench
//!
//! Prints `<len/100000>\t<sequential_ms>\t<parallel_ms>` per length. Command
//! line arguments are ignored; set `BENCH_CONFIG` to override the tables.

use anyhow::Context;
use std::io;
use vec_bench_demos::{accumulate, logging, seeded_rng, BenchConfig};

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = BenchConfig::from_env().context("loading benchmark configuration")?;
    let mut rng = seeded_rng(config.accumulate.seed);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    accumulate::run(&config.accumulate, &mut rng, &mut out)
        .context("accumulation benchmark aborted")?;

    Ok(())
}
