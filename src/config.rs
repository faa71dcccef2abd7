//! Benchmark parameter tables.
//!
//! The defaults reproduce the fixed tables the benchmarks always ran with. A
//! TOML file named by `BENCH_CONFIG` may override any of them; fields left out
//! of the file keep their defaults.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::accumulate::Executor;
use crate::erase::EraseCriterion;
use crate::error::{BenchError, Result};

pub const CONFIG_ENV_VAR: &str = "BENCH_CONFIG";

pub const DEFAULT_WORKERS: usize = 2;

/// Vector lengths for the accumulation benchmark: three warm-up sizes, then
/// 100M to 890M elements in steps of 10M.
pub const DEFAULT_LENGTHS: [usize; 83] = default_lengths();

const fn default_lengths() -> [usize; 83] {
    let mut lengths = [0usize; 83];
    lengths[0] = 100_000;
    lengths[1] = 1_000_000;
    lengths[2] = 10_000_000;
    let mut i = 3;
    while i < 83 {
        lengths[i] = 100_000_000 + (i - 3) * 10_000_000;
        i += 1;
    }
    lengths
}

/// `(object_size, vector_len)` pairs for the erasure benchmark. The object
/// size caps each object's payload length; the vector length is the number of
/// objects erased from.
pub const DEFAULT_ERASE_CASES: [(usize, usize); 14] = [
    (10, 10_000),
    (100, 10_000),
    (1_000, 10_000),
    (10_000, 10_000),
    (100_000, 10_000),
    (10, 100_000),
    (100, 100_000),
    (1_000, 100_000),
    (10_000, 100_000),
    (10, 1_000_000),
    (100, 1_000_000),
    (1_000, 1_000_000),
    (10, 10_000_000),
    (100, 10_000_000),
];

// =============================================================================
// Accumulation benchmark
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccumulateConfig {
    pub lengths: Vec<usize>,
    pub workers: usize,
    pub executor: Executor,
    pub seed: Option<u64>,
}

impl Default for AccumulateConfig {
    fn default() -> Self {
        Self {
            lengths: DEFAULT_LENGTHS.to_vec(),
            workers: DEFAULT_WORKERS,
            executor: Executor::default(),
            seed: None,
        }
    }
}

impl AccumulateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.lengths.is_empty() {
            return Err(BenchError::invalid_config("accumulate.lengths is empty"));
        }
        if self.workers == 0 {
            return Err(BenchError::invalid_config("accumulate.workers must be at least 1"));
        }
        Ok(())
    }
}

// =============================================================================
// Erasure benchmark
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EraseCase {
    pub object_size: usize,
    pub vector_len: usize,
}

impl From<(usize, usize)> for EraseCase {
    fn from((object_size, vector_len): (usize, usize)) -> Self {
        Self {
            object_size,
            vector_len,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EraseConfig {
    pub cases: Vec<EraseCase>,
    pub criteria: Vec<EraseCriterion>,
    pub seed: Option<u64>,
}

impl Default for EraseConfig {
    fn default() -> Self {
        Self {
            cases: DEFAULT_ERASE_CASES.iter().copied().map(EraseCase::from).collect(),
            criteria: EraseCriterion::ALL.to_vec(),
            seed: None,
        }
    }
}

impl EraseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cases.is_empty() {
            return Err(BenchError::invalid_config("erase.cases is empty"));
        }
        if self.criteria.is_empty() {
            return Err(BenchError::invalid_config("erase.criteria is empty"));
        }
        Ok(())
    }
}

// =============================================================================
// Top level
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BenchConfig {
    pub accumulate: AccumulateConfig,
    pub erase: EraseConfig,
}

impl BenchConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: BenchConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads the file named by `BENCH_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.accumulate.validate()?;
        self.erase.validate()
    }
}
