//! Report assembly and atomic artifact persistence

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::classification::{CellResult, Classification};
use crate::error::Result;
use crate::evaluation::{RankedFeature, RegressionMetrics};

/// Scalar summary block of the report artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetrics {
    pub r2: f64,
    pub mse: f64,
    pub mae: f64,
    pub threshold: f64,
    pub avg_soh: f64,
    pub pass_count: usize,
    pub fail_count: usize,
}

/// The terminal pipeline artifact, read-only for all consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metrics: ReportMetrics,
    pub cells: Vec<CellResult>,
    /// Feature name to signed coefficient, in descending |coefficient| order
    pub feature_importance: IndexMap<String, f64>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Assemble the report from the pipeline stage outputs. Pure
    /// aggregation; per-cell order is preserved.
    pub fn build(
        metrics: RegressionMetrics,
        threshold: f64,
        classification: Classification,
        ranking: Vec<RankedFeature>,
    ) -> Self {
        let n = classification.cells.len();
        let avg_soh = if n > 0 {
            classification
                .cells
                .iter()
                .map(|c| c.predicted_soh)
                .sum::<f64>()
                / n as f64
        } else {
            0.0
        };

        let feature_importance: IndexMap<String, f64> = ranking
            .into_iter()
            .map(|f| (f.name, f.coefficient))
            .collect();

        Report {
            metrics: ReportMetrics {
                r2: metrics.r2,
                mse: metrics.mse,
                mae: metrics.mae,
                threshold,
                avg_soh,
                pass_count: classification.pass_count,
                fail_count: classification.fail_count,
            },
            cells: classification.cells,
            feature_importance,
            generated_at: Utc::now(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Persist the JSON artifact atomically.
    pub fn write(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_json()?.as_bytes())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// Write `bytes` to a sibling temp file, then rename over `path`, so a
/// concurrent reader never observes a partially-written artifact.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let mut tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
