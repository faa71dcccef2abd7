//! Three small measurement programs sharing one library:
//!
//! - `nested_hierarchy`: runtime type names and addresses of nested generic
//!   wrappers.
//! - `accumulate_bench`: sequential vs. partitioned parallel summation.
//! - `erase_bench`: `retain` vs. swap-erase vs. move-erase.

pub mod accumulate;
pub mod compaction;
pub mod config;
pub mod erase;
pub mod error;
pub mod hierarchy;
pub mod logging;
pub mod timing;

pub use compaction::{move_erase, remove_erase, swap_erase, EraseStrategy};
pub use config::BenchConfig;
pub use error::{BenchError, Result};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A fixed seed gives reproducible datasets; otherwise the OS seeds it.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
