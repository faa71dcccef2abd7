//! Erasure benchmark: three ways of dropping matching objects from a vector
//! of heap-heavy records, timed against identical copies of one dataset.

use itertools::Itertools;
use rand::Rng;
use serde::Deserialize;
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

use crate::compaction::EraseStrategy;
use crate::config::{EraseCase, EraseConfig};
use crate::error::{BenchError, Result};
use crate::timing::{seconds, speedup, timed};

/// A record whose payload length is drawn at random, so moving it around is
/// cheap but cloning and inspecting it are not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeavyObject {
    pub size: usize,
    /// `0..size`.
    pub payload: Vec<usize>,
}

impl HeavyObject {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            payload: (0..size).collect(),
        }
    }

    /// Draws the payload length uniformly from `0..=max_size`.
    pub fn generate<R: Rng>(rng: &mut R, max_size: usize) -> Self {
        Self::new(rng.gen_range(0..=max_size))
    }

    pub fn is_smaller_than(&self, n: usize) -> bool {
        self.size < n
    }

    pub fn payload_sum(&self) -> u64 {
        self.payload.iter().map(|&x| x as u64).sum()
    }

    pub fn is_sum_smaller_than(&self, n: u64) -> bool {
        self.payload_sum() < n
    }
}

pub fn generate_dataset<R: Rng>(rng: &mut R, object_size: usize, len: usize) -> Vec<HeavyObject> {
    (0..len).map(|_| HeavyObject::generate(rng, object_size)).collect()
}

// =============================================================================
// Erase criteria
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraseCriterion {
    /// Compares the size field only.
    Quicker,
    /// Sums the whole payload first.
    Slower,
}

impl EraseCriterion {
    pub const ALL: [EraseCriterion; 2] = [EraseCriterion::Quicker, EraseCriterion::Slower];

    pub fn label(self) -> &'static str {
        match self {
            EraseCriterion::Quicker => "quicker",
            EraseCriterion::Slower => "slower",
        }
    }

    /// Cut-off below which an object is erased, for objects generated with
    /// the given `object_size`.
    pub fn threshold(self, object_size: usize) -> u64 {
        let object_size = object_size as u64;
        match self {
            EraseCriterion::Quicker => object_size / 10,
            EraseCriterion::Slower => {
                object_size.saturating_mul(object_size.saturating_sub(1)) / 20
            }
        }
    }

    pub fn matches(self, obj: &HeavyObject, object_size: usize) -> bool {
        self.below(obj, self.threshold(object_size))
    }

    /// Same as `matches`, with the threshold computed once up front.
    pub fn predicate(self, object_size: usize) -> impl Fn(&HeavyObject) -> bool {
        let threshold = self.threshold(object_size);
        move |obj| self.below(obj, threshold)
    }

    fn below(self, obj: &HeavyObject, threshold: u64) -> bool {
        match self {
            // The quicker threshold is derived from a `usize`, so it fits.
            EraseCriterion::Quicker => obj.is_smaller_than(threshold as usize),
            EraseCriterion::Slower => obj.is_sum_smaller_than(threshold),
        }
    }
}

impl fmt::Display for EraseCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Driver
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EraseRow {
    pub criterion: EraseCriterion,
    pub case: EraseCase,
    pub removed: usize,
    pub baseline: Duration,
    pub swap: Duration,
    pub moved: Duration,
}

impl EraseRow {
    pub fn swap_speedup(&self) -> f64 {
        speedup(self.baseline, self.swap)
    }

    pub fn move_speedup(&self) -> f64 {
        speedup(self.baseline, self.moved)
    }
}

impl fmt::Display for EraseRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            format!("{:>10}", self.criterion.label()),
            format!("{:>10}", self.case.object_size),
            format!("{:>10}", self.case.vector_len),
            format!("{:>10.6}", seconds(self.baseline)),
            format!("{:>10.6}", seconds(self.swap)),
            format!("{:>10.6}", self.swap_speedup()),
            format!("{:>10.6}", seconds(self.moved)),
            format!("{:>10.6}", self.move_speedup()),
        ];
        write!(f, "{}", fields.iter().join(", "))
    }
}

/// Times every strategy on its own copy of one generated dataset.
pub fn measure<R: Rng>(
    rng: &mut R,
    case: EraseCase,
    criterion: EraseCriterion,
) -> Result<EraseRow> {
    let data = generate_dataset(rng, case.object_size, case.vector_len);
    let pred = criterion.predicate(case.object_size);

    let mut results = Vec::with_capacity(EraseStrategy::ALL.len());
    for strategy in EraseStrategy::ALL {
        let mut copy = data.clone();
        let (removed, elapsed) = timed(|| strategy.apply(&mut copy, &pred));
        results.push((strategy, removed, elapsed));
    }

    let (_, baseline_removed, baseline) = results[0];
    for &(strategy, removed, _) in &results[1..] {
        if removed != baseline_removed {
            return Err(BenchError::StrategyDisagreement {
                criterion,
                strategy: strategy.label(),
                baseline: baseline_removed,
                other: removed,
            });
        }
    }

    Ok(EraseRow {
        criterion,
        case,
        removed: baseline_removed,
        baseline,
        swap: results[1].2,
        moved: results[2].2,
    })
}

/// Writes one report line per (case, criterion) pair.
pub fn run<R: Rng, W: Write>(
    config: &EraseConfig,
    rng: &mut R,
    out: &mut W,
) -> Result<Vec<EraseRow>> {
    config.validate()?;
    info!(
        cases = config.cases.len(),
        criteria = config.criteria.len(),
        "starting erasure benchmark"
    );

    let mut rows = Vec::with_capacity(config.cases.len() * config.criteria.len());
    for &case in &config.cases {
        for &criterion in &config.criteria {
            let row = measure(rng, case, criterion)?;
            writeln!(out, "{row}")?;
            out.flush()?;
            debug!(
                %criterion,
                object_size = case.object_size,
                vector_len = case.vector_len,
                removed = row.removed,
                "case done"
            );
            rows.push(row);
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_heavy_object_payload() {
        let obj = HeavyObject::new(5);
        assert_eq!(obj.payload, vec![0, 1, 2, 3, 4]);
        assert_eq!(obj.payload_sum(), 10);
        assert!(obj.is_smaller_than(6));
        assert!(!obj.is_smaller_than(5));
        assert!(obj.is_sum_smaller_than(11));
        assert!(!obj.is_sum_smaller_than(10));
    }

    #[test]
    fn test_generate_respects_cap() {
        let mut rng = StdRng::seed_from_u64(9);
        let data = generate_dataset(&mut rng, 20, 1_000);
        assert_eq!(data.len(), 1_000);
        assert!(data.iter().all(|o| o.size <= 20 && o.payload.len() == o.size));
    }

    #[test]
    fn test_thresholds() {
        assert_eq!(EraseCriterion::Quicker.threshold(100), 10);
        assert_eq!(EraseCriterion::Slower.threshold(100), 495);
        assert_eq!(EraseCriterion::Quicker.threshold(0), 0);
        assert_eq!(EraseCriterion::Slower.threshold(0), 0);
        assert_eq!(EraseCriterion::Slower.threshold(1), 0);
    }

    #[test]
    fn test_quicker_criterion() {
        let pred = EraseCriterion::Quicker.predicate(100);
        assert!(pred(&HeavyObject::new(9)));
        assert!(!pred(&HeavyObject::new(10)));
        assert!(EraseCriterion::Quicker.matches(&HeavyObject::new(0), 100));
    }

    #[test]
    fn test_quicker_criterion_follows_is_smaller_than() {
        for object_size in [0, 7, 10, 100, 1_000] {
            let threshold = EraseCriterion::Quicker.threshold(object_size) as usize;
            for size in 0..=object_size {
                let obj = HeavyObject::new(size);
                assert_eq!(
                    EraseCriterion::Quicker.matches(&obj, object_size),
                    obj.is_smaller_than(threshold)
                );
            }
        }
    }

    #[test]
    fn test_slower_criterion() {
        // 0 + 1 + ... + 31 = 496, just above the 495 cut-off.
        let pred = EraseCriterion::Slower.predicate(100);
        assert!(pred(&HeavyObject::new(31)));
        assert!(!pred(&HeavyObject::new(32)));
        assert!(!EraseCriterion::Slower.matches(&HeavyObject::new(32), 100));
    }

    #[test]
    fn test_zero_object_size_erases_nothing() {
        for criterion in EraseCriterion::ALL {
            assert!(!criterion.matches(&HeavyObject::new(0), 0));
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(EraseCriterion::Quicker.to_string(), "quicker");
        assert_eq!(EraseCriterion::Slower.to_string(), "slower");
    }

    #[test]
    fn test_measure_agrees_across_strategies() {
        let mut rng = StdRng::seed_from_u64(5);
        let case = EraseCase::from((100, 2_000));

        for criterion in EraseCriterion::ALL {
            let row = measure(&mut rng, case, criterion).unwrap();
            assert_eq!(row.case, case);
            assert!(row.removed > 0 && row.removed < 2_000);
        }
    }

    #[test]
    fn test_row_format() {
        let row = EraseRow {
            criterion: EraseCriterion::Slower,
            case: EraseCase::from((10, 10_000)),
            removed: 3,
            baseline: Duration::from_millis(4),
            swap: Duration::from_millis(2),
            moved: Duration::from_millis(1),
        };

        let line = row.to_string();
        let fields: Vec<&str> = line.split(", ").map(str::trim).collect();
        assert_eq!(
            fields,
            vec![
                "slower", "10", "10000", "0.004000", "0.002000", "2.000000", "0.001000",
                "4.000000",
            ]
        );
        assert!(line.starts_with("    slower, "));
    }

    #[test]
    fn test_run_writes_two_lines_per_case() {
        let config = EraseConfig {
            cases: vec![EraseCase::from((10, 500)), EraseCase::from((50, 300))],
            criteria: EraseCriterion::ALL.to_vec(),
            seed: None,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let mut out = Vec::new();

        let rows = run(&config, &mut rng, &mut out).unwrap();
        assert_eq!(rows.len(), 4);

        let text = String::from_utf8(out).unwrap();
        let labels: Vec<&str> = text
            .lines()
            .map(|line| {
                assert_eq!(line.split(", ").count(), 8);
                line.split(',').next().unwrap().trim()
            })
            .collect();
        assert_eq!(labels, vec!["quicker", "slower", "quicker", "slower"]);
    }
}
