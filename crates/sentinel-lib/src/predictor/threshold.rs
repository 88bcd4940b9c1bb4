//! Fixed-threshold classifier used by the lightweight deployment

use super::Predictor;
use crate::models::{Classification, ClassificationInput};
use anyhow::Result;
use tracing::debug;

/// Disk usage above this percentage is classified as high
pub const HIGH_DISK_USAGE_THRESHOLD: f64 = 90.0;

const THRESHOLD_MODEL_VERSION: &str = "threshold-v1";

/// Apply the decision rule: strictly greater than the threshold is high usage
pub fn classify(disk_usage_percent: f64) -> Classification {
    if disk_usage_percent > HIGH_DISK_USAGE_THRESHOLD {
        Classification::HighUsage
    } else {
        Classification::Normal
    }
}

/// Predictor that compares disk usage against [`HIGH_DISK_USAGE_THRESHOLD`]
#[derive(Debug, Clone, Default)]
pub struct ThresholdPredictor;

impl ThresholdPredictor {
    pub fn new() -> Self {
        Self
    }
}

impl Predictor for ThresholdPredictor {
    fn predict(&self, input: &ClassificationInput) -> Result<Classification> {
        let classification = classify(input.disk_usage_percent);
        debug!(
            server_id = %input.server_id,
            disk_usage_percent = input.disk_usage_percent,
            classification = %classification,
            "Threshold prediction"
        );
        Ok(classification)
    }

    fn model_version(&self) -> &str {
        THRESHOLD_MODEL_VERSION
    }
}
