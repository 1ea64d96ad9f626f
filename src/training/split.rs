//! Deterministic train/evaluation splitting

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{CellHealthError, Result};

/// Fraction of rows assigned to the evaluation set by default
pub const DEFAULT_EVAL_FRACTION: f64 = 0.2;

/// Fixed seed so repeated runs partition rows identically
pub const DEFAULT_SEED: u64 = 42;

/// A disjoint, covering partition of row indices.
///
/// Evaluation indices keep the shuffled assignment order; downstream
/// per-cell results are reported in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train_indices: Vec<usize>,
    pub eval_indices: Vec<usize>,
}

/// Seeded splitter assigning `round(fraction * n)` rows to evaluation.
#[derive(Debug, Clone)]
pub struct TrainTestSplitter {
    fraction: f64,
    seed: u64,
}

impl Default for TrainTestSplitter {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainTestSplitter {
    pub fn new() -> Self {
        Self {
            fraction: DEFAULT_EVAL_FRACTION,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_fraction(mut self, fraction: f64) -> Self {
        self.fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Partition `n_samples` row indices.
    ///
    /// Identical `(n_samples, fraction, seed)` inputs always yield the same
    /// partition, independent of platform or run time.
    pub fn split(&self, n_samples: usize) -> Result<TrainTestSplit> {
        if !(self.fraction > 0.0 && self.fraction < 1.0) {
            return Err(CellHealthError::InvalidFraction(format!(
                "fraction must be in (0, 1), got {}",
                self.fraction
            )));
        }
        if (n_samples as f64) * (1.0 - self.fraction) < 1.0 {
            return Err(CellHealthError::InvalidFraction(format!(
                "{n_samples} samples leave no training rows at fraction {}",
                self.fraction
            )));
        }

        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let eval_size = (self.fraction * n_samples as f64).round() as usize;
        let eval_indices = indices[..eval_size].to_vec();
        let mut train_indices = indices[eval_size..].to_vec();
        train_indices.sort_unstable();

        Ok(TrainTestSplit {
            train_indices,
            eval_indices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_sizes() {
        let split = TrainTestSplitter::new().split(10).unwrap();
        assert_eq!(split.eval_indices.len(), 2);
        assert_eq!(split.train_indices.len(), 8);

        // round(0.2 * 13) = 3
        let split = TrainTestSplitter::new().split(13).unwrap();
        assert_eq!(split.eval_indices.len(), 3);
        assert_eq!(split.train_indices.len() + split.eval_indices.len(), 13);
    }

    #[test]
    fn test_split_is_disjoint_and_covering() {
        let split = TrainTestSplitter::new().split(50).unwrap();
        let train: HashSet<usize> = split.train_indices.iter().copied().collect();
        let eval: HashSet<usize> = split.eval_indices.iter().copied().collect();

        assert!(train.is_disjoint(&eval));
        let mut all: Vec<usize> = train.union(&eval).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_deterministic() {
        let a = TrainTestSplitter::new().with_seed(7).split(100).unwrap();
        let b = TrainTestSplitter::new().with_seed(7).split(100).unwrap();
        assert_eq!(a, b);

        let c = TrainTestSplitter::new().with_seed(8).split(100).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        for bad in [0.0, 1.0, -0.3, 1.7] {
            let err = TrainTestSplitter::new().with_fraction(bad).split(10).unwrap_err();
            assert!(matches!(err, CellHealthError::InvalidFraction(_)));
        }
    }

    #[test]
    fn test_tiny_dataset_rejected() {
        // 1 * (1 - 0.9) < 1: no rows left to train on
        let err = TrainTestSplitter::new().with_fraction(0.9).split(1).unwrap_err();
        assert!(matches!(err, CellHealthError::InvalidFraction(_)));
    }
}
