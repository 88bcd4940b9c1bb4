//! Disk usage prediction
//!
//! The deployed handler classifies with a fixed threshold. The random forest
//! produced by the trainer is uploaded for later use but never loaded here.

mod threshold;

pub use threshold::{classify, ThresholdPredictor, HIGH_DISK_USAGE_THRESHOLD};

use crate::models::{Classification, ClassificationInput};
use anyhow::Result;

/// Trait for prediction implementations
pub trait Predictor: Send + Sync {
    /// Classify a normalized input
    fn predict(&self, input: &ClassificationInput) -> Result<Classification>;

    /// Get current model version
    fn model_version(&self) -> &str;
}
