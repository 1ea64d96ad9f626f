//! The SOH prediction pipeline: one forward pass from file to report

pub mod config;

pub use config::{
    resolve_threshold, threshold_from_env, PipelineConfig, ThresholdSetting, ThresholdSource,
    DEFAULT_THRESHOLD, SOH_THRESHOLD_ENV,
};

use std::path::Path;
use tracing::{info, warn};

use crate::classification::classify;
use crate::data::load_dataset;
use crate::error::{CellHealthError, Result};
use crate::evaluation::{rank_features, RegressionMetrics};
use crate::report::{write_atomic, Report};
use crate::training::{LinearRegression, TrainTestSplitter};
use crate::visualization::{render_soh_scatter, ScatterConfig};

/// Report artifact file name
pub const REPORT_FILE: &str = "report.json";
/// Plot artifact file name
pub const PLOT_FILE: &str = "soh_plot.svg";
/// Scalar SOH summary file name, read by the dashboard and assistant
pub const SOH_FILE: &str = "latest_soh.txt";

/// Ridge strength for the retry after a singular OLS design. Small enough
/// that a well-posed problem would be numerically unchanged.
const RIDGE_FALLBACK_ALPHA: f64 = 1e-6;

/// Run the full pipeline: load, split, fit, evaluate, classify, report.
///
/// Any taxonomy error aborts the run before artifacts are written; artifact
/// writes themselves are atomic.
pub fn run(config: &PipelineConfig) -> Result<Report> {
    let dataset = load_dataset(&config.data_path, config.segment.as_deref())?;
    info!(samples = dataset.len(), "dataset loaded");

    let split = TrainTestSplitter::new()
        .with_fraction(config.eval_fraction)
        .with_seed(config.seed)
        .split(dataset.len())?;
    info!(
        train = split.train_indices.len(),
        eval = split.eval_indices.len(),
        seed = config.seed,
        "rows partitioned"
    );

    let (x_train, y_train) = dataset.select(&split.train_indices);
    let (x_eval, y_eval) = dataset.select(&split.eval_indices);

    let mut model = LinearRegression::new();
    if let Err(e) = model.fit(&x_train, &y_train).map(|_| ()) {
        match e {
            CellHealthError::SingularDesign(reason) => {
                warn!(%reason, alpha = RIDGE_FALLBACK_ALPHA, "singular design, retrying regularized");
                model = LinearRegression::new().with_alpha(RIDGE_FALLBACK_ALPHA);
                model.fit(&x_train, &y_train)?;
            }
            other => return Err(other),
        }
    }
    let y_pred = model.predict(&x_eval)?;

    let metrics = RegressionMetrics::compute(&y_eval, &y_pred);
    info!(r2 = metrics.r2, mse = metrics.mse, mae = metrics.mae, "model evaluated");

    let coefficients = model
        .coefficients
        .as_ref()
        .expect("model was just fitted");
    let ranking = rank_features(dataset.feature_names(), coefficients);

    let classification = classify(&y_eval, &y_pred, config.threshold);
    let report = Report::build(metrics, config.threshold, classification, ranking);

    if let Some(dir) = &config.output_dir {
        write_artifacts(&report, &y_eval, &y_pred, dir)?;
    }

    Ok(report)
}

fn write_artifacts(
    report: &Report,
    y_true: &ndarray::Array1<f64>,
    y_pred: &ndarray::Array1<f64>,
    dir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    report.write(&dir.join(REPORT_FILE))?;

    let svg = render_soh_scatter(y_true, y_pred, &ScatterConfig::default());
    write_atomic(&dir.join(PLOT_FILE), svg.as_bytes())?;

    write_atomic(
        &dir.join(SOH_FILE),
        format!("{:.6}\n", report.metrics.avg_soh).as_bytes(),
    )?;

    info!(dir = %dir.display(), "artifacts written");
    Ok(())
}
