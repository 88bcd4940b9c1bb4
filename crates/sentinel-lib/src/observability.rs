//! Observability infrastructure for the alert handler
//!
//! Provides:
//! - Prometheus metrics (invocations by input shape, predictions, notifications, latency)
//! - Structured JSON logging with tracing

use crate::models::{Classification, ClassificationInput};
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

/// Default histogram buckets for handler latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<HandlerMetricsInner> = OnceLock::new();

struct HandlerMetricsInner {
    invocations: IntCounterVec,
    predictions: IntCounterVec,
    notifications_published: IntCounter,
    notifications_skipped: IntCounterVec,
    extraction_failures: IntCounter,
    handler_failures: IntCounter,
    handler_latency_seconds: Histogram,
}

impl HandlerMetricsInner {
    fn new() -> Self {
        Self {
            invocations: register_int_counter_vec!(
                "sentinel_handler_invocations_total",
                "Handler invocations by detected input shape",
                &["shape"]
            )
            .expect("Failed to register invocations"),

            predictions: register_int_counter_vec!(
                "sentinel_handler_predictions_total",
                "Disk usage classifications by result",
                &["classification"]
            )
            .expect("Failed to register predictions"),

            notifications_published: register_int_counter!(
                "sentinel_handler_notifications_published_total",
                "Alert notifications published to the topic"
            )
            .expect("Failed to register notifications_published"),

            notifications_skipped: register_int_counter_vec!(
                "sentinel_handler_notifications_skipped_total",
                "Notifications not sent, by reason",
                &["reason"]
            )
            .expect("Failed to register notifications_skipped"),

            extraction_failures: register_int_counter!(
                "sentinel_handler_extraction_failures_total",
                "Events that could not be parsed and fell back to safe defaults"
            )
            .expect("Failed to register extraction_failures"),

            handler_failures: register_int_counter!(
                "sentinel_handler_failures_total",
                "Invocations that returned a failure response"
            )
            .expect("Failed to register handler_failures"),

            handler_latency_seconds: register_histogram!(
                "sentinel_handler_latency_seconds",
                "End-to-end handler latency",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register handler_latency_seconds"),
        }
    }
}

/// Handler metrics for Prometheus exposition
///
/// Lightweight handle to the process-global collectors. Clones share them.
#[derive(Clone)]
pub struct HandlerMetrics {
    _private: (),
}

impl Default for HandlerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(HandlerMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &HandlerMetricsInner {
        GLOBAL_METRICS.get_or_init(HandlerMetricsInner::new)
    }

    pub fn inc_invocation(&self, shape: &str) {
        self.inner().invocations.with_label_values(&[shape]).inc();
    }

    pub fn inc_prediction(&self, classification: Classification) {
        self.inner()
            .predictions
            .with_label_values(&[&classification.to_string()])
            .inc();
    }

    pub fn inc_notifications_published(&self) {
        self.inner().notifications_published.inc();
    }

    pub fn inc_notifications_skipped(&self, reason: &str) {
        self.inner()
            .notifications_skipped
            .with_label_values(&[reason])
            .inc();
    }

    pub fn inc_extraction_failures(&self) {
        self.inner().extraction_failures.inc();
    }

    pub fn inc_handler_failures(&self) {
        self.inner().handler_failures.inc();
    }

    pub fn observe_latency(&self, duration_secs: f64) {
        self.inner().handler_latency_seconds.observe(duration_secs);
    }

    /// Current invocation count for a shape label
    pub fn invocations(&self, shape: &str) -> u64 {
        self.inner().invocations.with_label_values(&[shape]).get()
    }
}

/// Structured logger for handler events
///
/// Keeps field names consistent across the JSON log lines emitted per
/// invocation.
#[derive(Clone)]
pub struct StructuredLogger {
    function_name: String,
}

impl StructuredLogger {
    pub fn new(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
        }
    }

    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Log process start with the effective configuration
    pub fn log_cold_start(
        &self,
        version: &str,
        region: &str,
        topic_configured: bool,
        model_key: Option<&str>,
    ) {
        info!(
            event = "cold_start",
            function = %self.function_name,
            version = %version,
            region = %region,
            topic_configured = topic_configured,
            model_key = ?model_key,
            "Sentinel handler initialized"
        );
    }

    pub fn log_event_received(&self, payload: &Value) {
        info!(
            event = "event_received",
            function = %self.function_name,
            payload = %payload,
            "Received event"
        );
    }

    pub fn log_input_parsed(&self, shape: &str, input: &ClassificationInput) {
        info!(
            event = "input_parsed",
            function = %self.function_name,
            shape = %shape,
            server_id = %input.server_id,
            disk_usage_percent = input.disk_usage_percent,
            hour = input.hour,
            dayofweek = input.dayofweek,
            "Parsed classification input"
        );
    }

    pub fn log_extraction_failed(&self, shape: &str, reason: &str) {
        warn!(
            event = "extraction_failed",
            function = %self.function_name,
            shape = %shape,
            reason = %reason,
            "Input parsing failed, using generic defaults"
        );
    }

    pub fn log_prediction(
        &self,
        server_id: &str,
        classification: Classification,
        model_version: &str,
    ) {
        info!(
            event = "prediction",
            function = %self.function_name,
            server_id = %server_id,
            classification = %classification,
            model_version = %model_version,
            "Prediction result"
        );
    }

    pub fn log_notification_published(&self, topic: &str, message_id: Option<&str>) {
        info!(
            event = "notification_published",
            function = %self.function_name,
            topic = %topic,
            message_id = ?message_id,
            "Alert notification published"
        );
    }

    pub fn log_notification_skipped(&self, reason: &str) {
        debug!(
            event = "notification_skipped",
            function = %self.function_name,
            reason = %reason,
            "No notification sent"
        );
    }

    pub fn log_handler_failed(&self, error: &anyhow::Error) {
        error!(
            event = "handler_failed",
            function = %self.function_name,
            error = %error,
            "Error during prediction or notification"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_metrics_creation() {
        let metrics = HandlerMetrics::new();

        let before = metrics.invocations("metrics_test");
        metrics.inc_invocation("metrics_test");
        metrics.inc_prediction(Classification::HighUsage);
        metrics.inc_notifications_published();
        metrics.inc_notifications_skipped("normal");
        metrics.observe_latency(0.002);

        assert_eq!(metrics.invocations("metrics_test"), before + 1);
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("sentinel-handler");
        assert_eq!(logger.function_name(), "sentinel-handler");
    }
}
