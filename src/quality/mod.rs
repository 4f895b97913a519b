pub mod classifier;
pub mod thresholds;
