//! Model training: deterministic splitting and the OLS fitter

pub mod linear;
pub mod split;

pub use linear::LinearRegression;
pub use split::{TrainTestSplit, TrainTestSplitter, DEFAULT_EVAL_FRACTION, DEFAULT_SEED};
