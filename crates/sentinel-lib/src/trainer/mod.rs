//! Offline model training
//!
//! Downloads the historical dataset, fits a random forest on the derived
//! `high_disk_usage` label, reports metrics and uploads the model. The
//! deployed handler does not load this model.

mod dataset;
mod model;
mod report;
mod storage;

pub use dataset::{Dataset, FEATURE_COLUMNS, TARGET_COLUMN};
pub use model::{checksum, ForestParams, ModelMetadata, TrainedModel};
pub use report::{ClassMetrics, ClassificationReport};
pub use storage::{LocalObjectStore, ObjectStore, S3ObjectStore};

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Rows logged as a preview after loading
const PREVIEW_ROWS: usize = 5;

/// Trainer locations and hyperparameters
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    pub bucket: String,
    pub data_key: String,
    pub model_key: String,
    pub local_data_path: PathBuf,
    pub local_model_path: PathBuf,
    pub params: ForestParams,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            bucket: "sentinel-ops-data-lake-satya".to_string(),
            data_key: "data/server_disk_usage_sample.csv".to_string(),
            model_key: "models/disk_usage_predictor.json".to_string(),
            local_data_path: PathBuf::from("server_disk_usage_sample.csv"),
            local_model_path: PathBuf::from("disk_usage_predictor.json"),
            params: ForestParams::default(),
        }
    }
}

/// Outcome of a training run
#[derive(Debug, Clone, Serialize)]
pub struct TrainingSummary {
    pub rows: usize,
    pub report: ClassificationReport,
    pub model_path: PathBuf,
    pub model_uri: String,
    pub checksum: String,
}

/// Runs the download, fit, evaluate, upload sequence
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self, store: &dyn ObjectStore) -> Result<TrainingSummary> {
        let cfg = &self.config;

        info!(bucket = %cfg.bucket, key = %cfg.data_key, "Downloading training data");
        store
            .download(&cfg.bucket, &cfg.data_key, &cfg.local_data_path)
            .await?;

        let dataset = Dataset::from_path(&cfg.local_data_path)?;
        info!(rows = dataset.len(), "Data loaded successfully");
        for row in dataset.head(PREVIEW_ROWS) {
            info!(
                hour = row.hour,
                dayofweek = row.dayofweek,
                disk_usage_percent = row.disk_usage_percent,
                "Sample row"
            );
        }

        info!(
            n_trees = cfg.params.n_trees,
            seed = cfg.params.seed,
            features = ?FEATURE_COLUMNS,
            label_column = TARGET_COLUMN,
            "Training random forest"
        );
        let mut model = TrainedModel::fit(&dataset, cfg.params)?;

        // Evaluated on the training rows; no held-out split
        warn!("Evaluating on training data, metrics are optimistic");
        let predictions = model.predict(&dataset.features())?;
        let report = ClassificationReport::new(&dataset.labels(), &predictions);
        info!(accuracy = report.accuracy, "Model evaluation");
        info!("Classification report:\n{}", report);
        model.metadata.training_accuracy = Some(report.accuracy);

        let checksum = model.save(&cfg.local_model_path)?;
        info!(path = %cfg.local_model_path.display(), checksum = %checksum, "Model saved locally");

        let model_uri = format!("s3://{}/{}", cfg.bucket, cfg.model_key);
        info!(uri = %model_uri, "Uploading model");
        store
            .upload(&cfg.local_model_path, &cfg.bucket, &cfg.model_key)
            .await?;

        tokio::fs::remove_file(&cfg.local_data_path)
            .await
            .with_context(|| {
                format!("Failed to remove {}", cfg.local_data_path.display())
            })?;
        info!("Cleaned up local data file");

        Ok(TrainingSummary {
            rows: dataset.len(),
            report,
            model_path: cfg.local_model_path.clone(),
            model_uri,
            checksum,
        })
    }
}
