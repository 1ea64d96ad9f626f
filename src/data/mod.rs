//! In-memory dataset representation

pub mod loader;

pub use loader::load_dataset;

use ndarray::{Array1, Array2, ArrayView1};

use crate::error::{CellHealthError, Result};

/// Number of per-probe voltage readings per cell (U1..U21)
pub const N_PROBES: usize = 21;

/// Name of the ground-truth column
pub const TARGET_COLUMN: &str = "SOH";

/// Ordered feature column names: U1, U2, .. U21
pub fn probe_names() -> Vec<String> {
    (1..=N_PROBES).map(|i| format!("U{i}")).collect()
}

/// One row of the dataset: 21 voltage readings and the measured SOH.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub voltages: ArrayView1<'a, f64>,
    pub soh: f64,
}

/// An ordered, fully-numeric collection of samples.
///
/// Invariant: every row has exactly [`N_PROBES`] voltage readings and a
/// ground-truth SOH; the loader rejects anything else.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f64>,
    target: Array1<f64>,
    feature_names: Vec<String>,
}

impl Dataset {
    /// Assemble a dataset from a feature matrix and target vector.
    pub fn new(features: Array2<f64>, target: Array1<f64>) -> Result<Self> {
        if features.nrows() != target.len() {
            return Err(CellHealthError::ShapeError {
                expected: format!("{} target rows", features.nrows()),
                actual: format!("{} target rows", target.len()),
            });
        }
        if features.ncols() != N_PROBES {
            return Err(CellHealthError::ShapeError {
                expected: format!("{N_PROBES} feature columns"),
                actual: format!("{} feature columns", features.ncols()),
            });
        }
        Ok(Self {
            features,
            target,
            feature_names: probe_names(),
        })
    }

    pub fn len(&self) -> usize {
        self.features.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn target(&self) -> &Array1<f64> {
        &self.target
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn sample(&self, row: usize) -> Sample<'_> {
        Sample {
            voltages: self.features.row(row),
            soh: self.target[row],
        }
    }

    /// Materialize the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((indices.len(), self.features.ncols()), |(i, j)| {
            self.features[[indices[i], j]]
        });
        let y = Array1::from_iter(indices.iter().map(|&i| self.target[i]));
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};

    #[test]
    fn test_probe_names_order() {
        let names = probe_names();
        assert_eq!(names.len(), N_PROBES);
        assert_eq!(names[0], "U1");
        assert_eq!(names[20], "U21");
    }

    #[test]
    fn test_dataset_rejects_wrong_width() {
        let x = Array2::zeros((3, 5));
        let y = Array1::zeros(3);
        assert!(Dataset::new(x, y).is_err());
    }

    #[test]
    fn test_sample_view() {
        let x = Array2::from_elem((2, N_PROBES), 3.3);
        let y = Array1::from_vec(vec![0.9, 0.4]);
        let ds = Dataset::new(x, y).unwrap();

        let sample = ds.sample(1);
        assert_eq!(sample.soh, 0.4);
        assert_eq!(sample.voltages.len(), N_PROBES);
        assert_eq!(sample.voltages[0], 3.3);
    }

    #[test]
    fn test_select_preserves_order() {
        let x = Array2::from_shape_fn((4, N_PROBES), |(i, _)| i as f64);
        let y = Array1::from_vec(vec![10.0, 11.0, 12.0, 13.0]);
        let ds = Dataset::new(x, y).unwrap();

        let (sx, sy) = ds.select(&[2, 0]);
        assert_eq!(sx[[0, 0]], 2.0);
        assert_eq!(sx[[1, 0]], 0.0);
        assert_eq!(sy.to_vec(), vec![12.0, 10.0]);
    }
}
