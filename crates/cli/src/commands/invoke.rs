//! Local handler invocation command

use anyhow::{Context, Result};
use colored::Colorize;
use prometheus::{Encoder, TextEncoder};
use sentinel_lib::handler::Delivery;
use sentinel_lib::{Handler, HandlerConfig, Notifier, RecordingNotifier, SnsNotifier};
use serde_json::Value;
use std::io::Read;
use std::sync::Arc;

use crate::output::{color_classification, print_error, print_info, print_json, OutputFormat};

/// Arguments for a local invocation
pub struct InvokeArgs {
    pub event: String,
    pub topic: Option<String>,
    pub region: String,
    pub publish: bool,
    pub metrics: bool,
}

fn read_event(source: &str) -> Result<Value> {
    let raw = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))?
    };
    serde_json::from_str(&raw).context("Event is not valid JSON")
}

/// Run the handler once and print its response
pub async fn invoke_handler(args: InvokeArgs, format: OutputFormat) -> Result<()> {
    let event = read_event(&args.event)?;

    let config = HandlerConfig {
        sns_topic_arn: args.topic,
        aws_region: args.region,
        ..HandlerConfig::default()
    };

    let recorder = Arc::new(RecordingNotifier::new());
    let notifier: Arc<dyn Notifier> = if args.publish {
        Arc::new(SnsNotifier::from_region(config.aws_region.clone()).await)
    } else {
        recorder.clone()
    };

    let handler = Handler::new(config, notifier);
    let invocation = handler.invoke(&event).await;

    match format {
        OutputFormat::Json => print_json(&invocation.response)?,
        OutputFormat::Table => {
            println!("{} {}", "Shape:".bold(), invocation.shape.label());
            match &invocation.result {
                Ok(outcome) => {
                    println!("{} {}", "Server:".bold(), outcome.input.server_id.cyan());
                    println!("{} {}%", "Disk usage:".bold(), outcome.input.disk_usage_percent);
                    println!(
                        "{} {}",
                        "Classification:".bold(),
                        color_classification(outcome.classification.is_high())
                    );
                    match &outcome.delivery {
                        Delivery::Published { topic, receipt } if !args.publish => print_info(
                            &format!(
                                "Dry run: would publish to {} ({})",
                                topic,
                                receipt.message_id.as_deref().unwrap_or("-")
                            ),
                        ),
                        Delivery::Published { topic, receipt } => print_info(&format!(
                            "Published to {} (message id {})",
                            topic,
                            receipt.message_id.as_deref().unwrap_or("-")
                        )),
                        Delivery::TopicNotConfigured => {
                            print_info("No topic configured, notification skipped")
                        }
                        Delivery::NotRequired => print_info("Usage normal, no notification"),
                    }
                }
                Err(err) => print_error(&format!("Handler failed: {:#}", err)),
            }
            println!();
            print_json(&invocation.response)?;
        }
    }

    if args.metrics {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
        println!("{}", String::from_utf8_lossy(&buffer));
    }

    Ok(())
}
