//! Erase-under-predicate benchmark: `retain` vs. swap-erase vs. move-erase.
//!
//! Run with: cargo run --release --bin erase_bench
//!
//! One line per (object size, vector length, criterion):
//! `label, obj_size, vec_size, retain_s, swap_s, swap_speedup, move_s, move_speedup`

use anyhow::Context;
use std::io;
use vec_bench_demos::{erase, logging, seeded_rng, BenchConfig};

fn main() -> anyhow::Result<()> {
    logging::init();

    let config = BenchConfig::from_env().context("loading benchmark configuration")?;
    let mut rng = seeded_rng(config.erase.seed);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    erase::run(&config.erase, &mut rng, &mut out).context("erasure benchmark aborted")?;

    Ok(())
}
