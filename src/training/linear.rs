//! Ordinary least-squares linear regression
//!
//! Solves the normal equations with a Cholesky decomposition, retrying with
//! a small diagonal jitter when the Gram matrix is not positive definite and
//! falling back to Gauss-Jordan elimination before declaring the design
//! singular.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{CellHealthError, Result};

/// Lower-triangular Cholesky factor of a symmetric matrix, or `None` when
/// the matrix is not positive definite.
fn cholesky_factor(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l: Array2<f64> = Array2::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    Some(l)
}

/// Solve L L^T x = b given the lower factor L.
fn cholesky_back_substitute(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();

    // Forward substitution: L y = b
    let mut y: Array1<f64> = Array1::zeros(n);
    for i in 0..n {
        let mut sum = 0.0;
        for j in 0..i {
            sum += l[[i, j]] * y[j];
        }
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Backward substitution: L^T x = y
    let mut x: Array1<f64> = Array1::zeros(n);
    for i in (0..n).rev() {
        let mut sum = 0.0;
        for j in (i + 1)..n {
            sum += l[[j, i]] * x[j];
        }
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    x
}

/// Matrix inverse via Gauss-Jordan elimination with partial pivoting.
fn matrix_inverse(m: &Array2<f64>) -> Option<Array2<f64>> {
    let n = m.nrows();
    let mut aug: Array2<f64> = Array2::zeros((n, 2 * n));
    for i in 0..n {
        for j in 0..n {
            aug[[i, j]] = m[[i, j]];
        }
        aug[[i, n + i]] = 1.0;
    }

    for col in 0..n {
        let mut max_row = col;
        for row in col + 1..n {
            if aug[[row, col]].abs() > aug[[max_row, col]].abs() {
                max_row = row;
            }
        }
        if max_row != col {
            for j in 0..2 * n {
                let tmp = aug[[col, j]];
                aug[[col, j]] = aug[[max_row, j]];
                aug[[max_row, j]] = tmp;
            }
        }

        if aug[[col, col]].abs() < 1e-10 {
            return None;
        }

        let pivot = aug[[col, col]];
        for j in 0..2 * n {
            aug[[col, j]] /= pivot;
        }
        for row in 0..n {
            if row != col {
                let factor = aug[[row, col]];
                for j in 0..2 * n {
                    aug[[row, j]] -= factor * aug[[col, j]];
                }
            }
        }
    }

    let mut inv: Array2<f64> = Array2::zeros((n, n));
    for i in 0..n {
        for j in 0..n {
            inv[[i, j]] = aug[[i, n + j]];
        }
    }
    Some(inv)
}

/// Solve (X^T X + alpha I) w = X^T y.
fn solve_normal_equations(
    x: &Array2<f64>,
    y: &Array1<f64>,
    alpha: f64,
) -> Option<Array1<f64>> {
    let n_features = x.ncols();
    let mut xtx = x.t().dot(x);
    if alpha > 0.0 {
        for i in 0..n_features {
            xtx[[i, i]] += alpha;
        }
    }
    let xty = x.t().dot(y);

    if let Some(l) = cholesky_factor(&xtx) {
        return Some(cholesky_back_substitute(&l, &xty));
    }

    // Not positive definite; Gauss-Jordan still handles indefinite but
    // full-rank systems. Rank-deficient designs fail here; regularization
    // only happens when the caller asked for it via `alpha`.
    matrix_inverse(&xtx).map(|inv| inv.dot(&xty))
}

/// Linear SOH model: a weight per voltage probe plus an intercept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Fitted weights, one per feature
    pub coefficients: Option<Array1<f64>>,
    /// Fitted intercept
    pub intercept: Option<f64>,
    /// Whether to fit an intercept term
    pub fit_intercept: bool,
    /// Optional L2 regularization for rank-deficient designs
    pub alpha: f64,
    /// Whether the model is fitted
    pub is_fitted: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            fit_intercept: true,
            alpha: 0.0,
            is_fitted: false,
        }
    }

    pub fn with_fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Regularized fallback for callers that prefer a ridge solve over
    /// aborting on a singular design.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Fit weights and intercept minimizing the sum of squared residuals.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        if n_samples != y.len() {
            return Err(CellHealthError::ShapeError {
                expected: format!("y length = {n_samples}"),
                actual: format!("y length = {}", y.len()),
            });
        }

        // Center so the intercept drops out of the normal equations.
        let (x_centered, y_centered, x_mean, y_mean) = if self.fit_intercept {
            let x_mean = x
                .mean_axis(Axis(0))
                .ok_or_else(|| CellHealthError::SingularDesign("empty training set".into()))?;
            let y_mean = y.mean().unwrap_or(0.0);
            let x_centered = x - &x_mean.clone().insert_axis(Axis(0));
            let y_centered = y - y_mean;
            (x_centered, y_centered, Some(x_mean), Some(y_mean))
        } else {
            (x.clone(), y.clone(), None, None)
        };

        let coefficients = solve_normal_equations(&x_centered, &y_centered, self.alpha)
            .ok_or_else(|| {
                CellHealthError::SingularDesign(
                    "normal equations are unsolvable (duplicate or constant columns)".into(),
                )
            })?;

        let intercept = match (x_mean, y_mean) {
            (Some(xm), Some(ym)) => ym - coefficients.dot(&xm),
            _ => 0.0,
        };

        self.coefficients = Some(coefficients);
        self.intercept = Some(intercept);
        self.is_fitted = true;
        Ok(self)
    }

    /// Predict SOH for each row of `x`.
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.is_fitted {
            return Err(CellHealthError::ModelNotFitted);
        }
        let coefficients = self.coefficients.as_ref().expect("fitted model has weights");
        let intercept = self.intercept.unwrap_or(0.0);
        Ok(x.dot(coefficients) + intercept)
    }
}
