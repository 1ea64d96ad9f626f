//! Threshold pass/fail classification of predicted SOH

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Pass/fail label for one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    Pass,
    Fail,
}

/// Per-cell classification outcome, in evaluation-set order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellResult {
    #[serde(rename = "true soh")]
    pub true_soh: f64,
    #[serde(rename = "predicted soh")]
    pub predicted_soh: f64,
    pub status: CellStatus,
}

/// Classification over the full evaluation set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub cells: Vec<CellResult>,
    pub pass_count: usize,
    pub fail_count: usize,
}

/// Label each cell against `threshold`: fail iff predicted SOH is strictly
/// below it. Any threshold is accepted; out-of-range values degenerate to
/// all-pass or all-fail.
pub fn classify(y_true: &Array1<f64>, y_pred: &Array1<f64>, threshold: f64) -> Classification {
    let cells: Vec<CellResult> = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(&true_soh, &predicted_soh)| CellResult {
            true_soh,
            predicted_soh,
            status: if predicted_soh < threshold {
                CellStatus::Fail
            } else {
                CellStatus::Pass
            },
        })
        .collect();

    let pass_count = cells.iter().filter(|c| c.status == CellStatus::Pass).count();
    let fail_count = cells.len() - pass_count;

    Classification {
        cells,
        pass_count,
        fail_count,
    }
}
