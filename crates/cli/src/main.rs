//! Sentinel Ops CLI
//!
//! A command-line tool for packaging the alert handler, training the
//! disk usage model and invoking the handler locally.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{invoke, package, train};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sentinel Ops CLI
#[derive(Parser)]
#[command(name = "sentinel")]
#[command(author, version, about = "CLI for Sentinel Ops disk usage alerting", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the deployment zip
    Package {
        /// Directory to package
        #[arg(long, default_value = sentinel_lib::packager::DEFAULT_SOURCE_DIR)]
        source: PathBuf,

        /// Output archive path
        #[arg(long, short, default_value = sentinel_lib::packager::DEFAULT_OUTPUT_ZIP)]
        output: PathBuf,

        /// File placed at the archive root
        #[arg(long, default_value = sentinel_lib::packager::DEFAULT_ENTRY_FILE)]
        entry: String,
    },

    /// Train the disk usage model and upload it
    Train {
        /// Bucket holding the dataset and the model
        #[arg(long, env = "SENTINEL_BUCKET", default_value = "sentinel-ops-data-lake-satya")]
        bucket: String,

        /// Dataset object key
        #[arg(long, env = "SENTINEL_DATA_KEY", default_value = "data/server_disk_usage_sample.csv")]
        data_key: String,

        /// Model object key
        #[arg(long, env = "MODEL_S3_KEY", default_value = "models/disk_usage_predictor.json")]
        model_key: String,

        /// Number of trees in the forest
        #[arg(long, default_value_t = 100)]
        trees: u16,

        /// Random seed
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Use a local directory as the object store instead of S3
        #[arg(long)]
        local_store: Option<PathBuf>,
    },

    /// Run the handler on an event file (use - for stdin)
    Invoke {
        /// Event JSON file
        event: String,

        /// Notification topic ARN
        #[arg(long, env = "SNS_TOPIC_ARN")]
        topic: Option<String>,

        /// AWS region for SNS
        #[arg(long, env = "AWS_REGION", default_value = sentinel_lib::handler::DEFAULT_AWS_REGION)]
        region: String,

        /// Publish to SNS instead of recording the notification locally
        #[arg(long)]
        publish: bool,

        /// Print Prometheus metrics after the invocation
        #[arg(long)]
        metrics: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Package {
            source,
            output,
            entry,
        } => {
            package::create_package(&source, &output, &entry, cli.format)?;
        }
        Commands::Train {
            bucket,
            data_key,
            model_key,
            trees,
            seed,
            local_store,
        } => {
            let args = train::TrainArgs {
                bucket,
                data_key,
                model_key,
                trees,
                seed,
                local_store,
            };
            train::run_training(args, cli.format).await?;
        }
        Commands::Invoke {
            event,
            topic,
            region,
            publish,
            metrics,
        } => {
            let args = invoke::InvokeArgs {
                event,
                topic,
                region,
                publish,
                metrics,
            };
            invoke::invoke_handler(args, cli.format).await?;
        }
    }

    Ok(())
}
