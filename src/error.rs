use thiserror::Error;

use crate::erase::EraseCriterion;

#[derive(Error, Debug)]
pub enum BenchError {
    #[error("sums disagree for length {length}: sequential {sequential} != parallel {parallel}")]
    SumMismatch {
        length: usize,
        sequential: u64,
        parallel: u64,
    },

    #[error("{strategy} removed {other} elements, baseline removed {baseline} ({criterion})")]
    StrategyDisagreement {
        criterion: EraseCriterion,
        strategy: &'static str,
        baseline: usize,
        other: usize,
    },

    #[error("worker for partition {partition} panicked")]
    WorkerPanicked { partition: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BenchError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
