//! Goodness-of-fit metrics and coefficient ranking

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Regression metrics over the evaluation set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    /// Coefficient of determination; 0.0 when the ground truth is constant
    pub r2: f64,
    /// Mean squared error
    pub mse: f64,
    /// Mean absolute error
    pub mae: f64,
}

impl RegressionMetrics {
    /// Compare predictions against ground truth.
    ///
    /// Callers guarantee equal lengths; the pipeline always passes the
    /// evaluation-set vectors produced side by side.
    pub fn compute(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Self {
        let n = y_true.len() as f64;
        let errors: Vec<f64> = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(t, p)| t - p)
            .collect();

        let mse = errors.iter().map(|e| e * e).sum::<f64>() / n;
        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;

        let y_mean = y_true.iter().sum::<f64>() / n;
        let ss_res: f64 = errors.iter().map(|e| e.powi(2)).sum();
        let ss_tot: f64 = y_true.iter().map(|y| (y - y_mean).powi(2)).sum();
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };

        Self { r2, mse, mae }
    }
}

/// One ranked feature: name and signed fitted coefficient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFeature {
    pub name: String,
    pub coefficient: f64,
}

/// Sort features by descending absolute coefficient.
///
/// The sort is stable, so equal magnitudes keep their original probe order
/// (U1 before U5).
pub fn rank_features(names: &[String], coefficients: &Array1<f64>) -> Vec<RankedFeature> {
    let mut ranked: Vec<RankedFeature> = names
        .iter()
        .zip(coefficients.iter())
        .map(|(name, &coefficient)| RankedFeature {
            name: name.clone(),
            coefficient,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}
