//! Model training command

use anyhow::Result;
use colored::Colorize;
use sentinel_lib::trainer::{
    ClassificationReport, ForestParams, LocalObjectStore, ObjectStore, S3ObjectStore, Trainer,
    TrainerConfig,
};
use std::path::PathBuf;
use tabled::Tabled;

use crate::output::{color_accuracy, format_ratio, print_json, print_success, print_warning, OutputFormat};

/// Arguments for a training run
pub struct TrainArgs {
    pub bucket: String,
    pub data_key: String,
    pub model_key: String,
    pub trees: u16,
    pub seed: u64,
    pub local_store: Option<PathBuf>,
}

/// Row for the classification report table
#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Class")]
    label: String,
    #[tabled(rename = "Precision")]
    precision: String,
    #[tabled(rename = "Recall")]
    recall: String,
    #[tabled(rename = "F1")]
    f1_score: String,
    #[tabled(rename = "Support")]
    support: usize,
}

fn report_rows(report: &ClassificationReport) -> Vec<ReportRow> {
    report
        .rows()
        .into_iter()
        .map(|m| ReportRow {
            label: m.label.clone(),
            precision: format_ratio(m.precision),
            recall: format_ratio(m.recall),
            f1_score: format_ratio(m.f1_score),
            support: m.support,
        })
        .collect()
}

/// Run the trainer against S3 or a local directory store
pub async fn run_training(args: TrainArgs, format: OutputFormat) -> Result<()> {
    let config = TrainerConfig {
        bucket: args.bucket,
        data_key: args.data_key,
        model_key: args.model_key,
        params: ForestParams {
            n_trees: args.trees,
            seed: args.seed,
        },
        ..TrainerConfig::default()
    };

    let store: Box<dyn ObjectStore> = match args.local_store {
        Some(root) => Box::new(LocalObjectStore::new(root)),
        None => Box::new(S3ObjectStore::from_env().await),
    };

    let summary = Trainer::new(config).run(store.as_ref()).await?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => {
            println!("{}", "Model Evaluation (on training data)".bold());
            println!("{}", "=".repeat(60));
            let table = tabled::Table::new(report_rows(&summary.report))
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
            println!("Accuracy: {}", color_accuracy(summary.report.accuracy));
            print_warning("Metrics are computed on the training rows and are optimistic");
            println!();
            print_success(&format!("Model saved locally to {}", summary.model_path.display()));
            print_success(&format!("Model uploaded to {}", summary.model_uri.cyan()));
            println!("Checksum: {}", summary.checksum);
        }
    }

    Ok(())
}
