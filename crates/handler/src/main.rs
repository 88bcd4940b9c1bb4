//! Sentinel Handler - disk usage alert function
//!
//! This binary runs inside the Lambda runtime, classifying each event's
//! disk usage and publishing an SNS alert when usage is high.

use lambda_runtime::{service_fn, LambdaEvent};
use sentinel_lib::{Handler, SnsNotifier};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

const HANDLER_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json().without_time())
        .init();

    info!("Starting sentinel-handler");

    let config = config::load()?;
    let notifier = Arc::new(SnsNotifier::from_region(config.aws_region.clone()).await);
    let handler = Arc::new(Handler::new(config, notifier));

    let cfg = handler.config();
    handler.logger().log_cold_start(
        HANDLER_VERSION,
        &cfg.aws_region,
        cfg.notification_topic().is_some(),
        cfg.model_s3_key.as_deref(),
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move {
            let response = handler.handle(&event.payload).await;
            Ok::<Value, lambda_runtime::Error>(serde_json::to_value(response)?)
        }
    }))
    .await
}
