//! Pipeline configuration and threshold resolution

use std::path::PathBuf;
use tracing::warn;

use crate::training::{DEFAULT_EVAL_FRACTION, DEFAULT_SEED};

/// Environment variable carrying the pass/fail threshold override
pub const SOH_THRESHOLD_ENV: &str = "SOH_THRESHOLD";

/// Threshold applied when no valid override is present
pub const DEFAULT_THRESHOLD: f64 = 0.6;

/// Where a resolved threshold value came from.
///
/// Distinguishes a valid override from the lenient fallback on unparsable
/// input, so callers and tests can tell the two apart instead of silently
/// conflating them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThresholdSource {
    /// A parsable override was supplied
    Override,
    /// An override was supplied but did not parse; the default applies
    InvalidFallback { raw: String },
    /// No override was supplied
    Unset,
}

/// A resolved threshold plus its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdSetting {
    pub value: f64,
    pub source: ThresholdSource,
}

/// Resolve a threshold from an optional raw override string.
pub fn resolve_threshold(raw: Option<&str>) -> ThresholdSetting {
    match raw {
        None => ThresholdSetting {
            value: DEFAULT_THRESHOLD,
            source: ThresholdSource::Unset,
        },
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => ThresholdSetting {
                value,
                source: ThresholdSource::Override,
            },
            _ => {
                warn!(raw, default = DEFAULT_THRESHOLD, "unparsable SOH threshold, using default");
                ThresholdSetting {
                    value: DEFAULT_THRESHOLD,
                    source: ThresholdSource::InvalidFallback {
                        raw: raw.to_string(),
                    },
                }
            }
        },
    }
}

/// Resolve the threshold from [`SOH_THRESHOLD_ENV`].
pub fn threshold_from_env() -> ThresholdSetting {
    let raw = std::env::var(SOH_THRESHOLD_ENV).ok();
    resolve_threshold(raw.as_deref())
}

/// Parameters for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Dataset file, or directory of segment tables
    pub data_path: PathBuf,
    /// Segment (table) name within a dataset directory
    pub segment: Option<String>,
    /// Fraction of rows held out for evaluation
    pub eval_fraction: f64,
    /// Seed for the deterministic split
    pub seed: u64,
    /// Pass/fail threshold on predicted SOH
    pub threshold: f64,
    /// Where to write the report, plot, and summary artifacts; `None` skips
    /// artifact output
    pub output_dir: Option<PathBuf>,
}

impl PipelineConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            segment: None,
            eval_fraction: DEFAULT_EVAL_FRACTION,
            seed: DEFAULT_SEED,
            threshold: DEFAULT_THRESHOLD,
            output_dir: None,
        }
    }

    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    pub fn with_eval_fraction(mut self, fraction: f64) -> Self {
        self.eval_fraction = fraction;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}
