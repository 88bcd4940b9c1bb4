//! Historical disk usage dataset loaded from CSV

use crate::models::TrainingRow;
use crate::predictor::classify;
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Feature columns, in model input order
pub const FEATURE_COLUMNS: [&str; 3] = ["hour", "dayofweek", "disk_usage_percent"];

/// Name of the derived label column
pub const TARGET_COLUMN: &str = "high_disk_usage";

impl TrainingRow {
    /// Label derived with the same rule the handler uses
    pub fn high_disk_usage(&self) -> u32 {
        classify(self.disk_usage_percent).as_label()
    }

    pub fn features(&self) -> Vec<f64> {
        vec![self.hour, self.dayofweek, self.disk_usage_percent]
    }
}

/// Rows of the training CSV
///
/// Columns are matched by header name; extra columns such as timestamps
/// or server ids are ignored.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    rows: Vec<TrainingRow>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<TrainingRow>) -> Self {
        Self { rows }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;
        Self::from_reader(file).with_context(|| format!("Failed to load dataset {}", path.display()))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut rows = Vec::new();
        for (index, record) in csv_reader.deserialize::<TrainingRow>().enumerate() {
            let row = record.with_context(|| format!("Invalid dataset row {}", index + 1))?;
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[TrainingRow] {
        &self.rows
    }

    pub fn head(&self, n: usize) -> &[TrainingRow] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Feature matrix, one row per sample
    pub fn features(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(TrainingRow::features).collect()
    }

    pub fn labels(&self) -> Vec<u32> {
        self.rows.iter().map(TrainingRow::high_disk_usage).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
timestamp,server_id,hour,dayofweek,disk_usage_percent
2024-01-01T00:00:00,srv-1,0,0,45.2
2024-01-01T01:00:00,srv-1,1,0,90
2024-01-01T02:00:00,srv-2,2,0,90.5
2024-01-01T03:00:00,srv-2,3,0,99
";

    #[test]
    fn test_load_ignores_extra_columns() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.rows()[0].disk_usage_percent, 45.2);
        assert_eq!(dataset.features()[2], vec![2.0, 0.0, 90.5]);
    }

    #[test]
    fn test_labels_follow_threshold() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.labels(), vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_head_is_bounded() {
        let dataset = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(dataset.head(2).len(), 2);
        assert_eq!(dataset.head(10).len(), 4);
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "hour,dayofweek\n1,2\n";
        assert!(Dataset::from_reader(csv.as_bytes()).is_err());
    }
}
