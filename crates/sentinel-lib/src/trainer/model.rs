//! Random-forest disk usage model and its serialized form

use super::dataset::{Dataset, FEATURE_COLUMNS, TARGET_COLUMN};
use crate::predictor::HIGH_DISK_USAGE_THRESHOLD;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;

type Forest = RandomForestClassifier<f64, u32, DenseMatrix<f64>, Vec<u32>>;

/// Forest hyperparameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_trees: u16,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
        }
    }
}

/// Descriptive fields stored next to the fitted forest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub features: Vec<String>,
    pub target: String,
    pub threshold: f64,
    pub params: ForestParams,
    pub training_rows: usize,
    /// Accuracy measured on the training rows themselves
    pub training_accuracy: Option<f64>,
    pub trained_at: String,
}

/// Fitted classifier plus metadata, serialized as JSON
#[derive(Serialize, Deserialize)]
pub struct TrainedModel {
    pub metadata: ModelMetadata,
    forest: Forest,
}

impl std::fmt::Debug for TrainedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrainedModel")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl TrainedModel {
    /// Fit a forest on every row of the dataset
    pub fn fit(dataset: &Dataset, params: ForestParams) -> Result<Self> {
        if dataset.is_empty() {
            anyhow::bail!("Cannot train on an empty dataset");
        }

        let y = dataset.labels();
        if let Some(&only) = y.first().filter(|first| y.iter().all(|l| l == *first)) {
            anyhow::bail!(
                "Dataset contains a single class (label {}); rows on both sides of the {}% threshold are required",
                only,
                HIGH_DISK_USAGE_THRESHOLD
            );
        }

        let x = DenseMatrix::from_2d_vec(&dataset.features());
        let parameters = RandomForestClassifierParameters {
            n_trees: params.n_trees,
            seed: params.seed,
            ..Default::default()
        };

        let forest = Forest::fit(&x, &y, parameters)
            .map_err(|e| anyhow::anyhow!("Random forest training failed: {}", e))?;

        Ok(Self {
            metadata: ModelMetadata {
                features: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                target: TARGET_COLUMN.to_string(),
                threshold: HIGH_DISK_USAGE_THRESHOLD,
                params,
                training_rows: dataset.len(),
                training_accuracy: None,
                trained_at: chrono::Utc::now().to_rfc3339(),
            },
            forest,
        })
    }

    /// Predict labels for feature rows in [`FEATURE_COLUMNS`] order
    pub fn predict(&self, features: &[Vec<f64>]) -> Result<Vec<u32>> {
        if features.is_empty() {
            return Ok(Vec::new());
        }
        let x = DenseMatrix::from_2d_vec(&features.to_vec());
        self.forest
            .predict(&x)
            .map_err(|e| anyhow::anyhow!("Random forest prediction failed: {}", e))
    }

    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).context("Failed to serialize model")
    }

    /// Write the model to `path` and return its SHA-256 checksum
    pub fn save(&self, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        let bytes = self.to_json()?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write model to {}", path.display()))?;
        Ok(checksum(&bytes))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read model from {}", path.display()))?;
        serde_json::from_slice(&bytes).context("Failed to parse model")
    }
}

/// Hex-encoded SHA-256 of the given bytes
pub fn checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainingRow;

    fn row(hour: f64, dayofweek: f64, disk_usage_percent: f64) -> TrainingRow {
        TrainingRow {
            hour,
            dayofweek,
            disk_usage_percent,
        }
    }

    #[test]
    fn test_empty_dataset_is_rejected() {
        let err = TrainedModel::fit(&Dataset::default(), ForestParams::default()).unwrap_err();
        assert!(err.to_string().contains("empty dataset"));
    }

    #[test]
    fn test_single_class_dataset_is_rejected() {
        let dataset = Dataset::from_rows(vec![
            row(1.0, 0.0, 40.0),
            row(2.0, 1.0, 75.5),
            row(3.0, 2.0, 90.0),
        ]);

        let err = TrainedModel::fit(&dataset, ForestParams::default()).unwrap_err();
        assert!(err.to_string().contains("single class"));
    }

    #[test]
    fn test_checksum_is_hex_sha256() {
        let digest = checksum(b"abc");
        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
