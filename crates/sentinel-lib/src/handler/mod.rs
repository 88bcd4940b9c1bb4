//! Alert handler pipeline
//!
//! One invocation runs these stages:
//! - Resolve the event into an [`InputShape`] and extract a normalized input
//! - Classify disk usage and format the report
//! - Publish the report when usage is high and a topic is configured
//! - Convert the result into the response envelope for the detected shape
//!
//! Parse failures fall back to safe defaults. Failures in later stages become
//! failure responses. `Handler::handle` itself never fails.

mod event;
mod response;


pub use event::{
    ExtractionError, InputShape, CONVERSATIONAL_DISK_USAGE, FALLBACK_DISK_USAGE,
    FALLBACK_SERVER_ID, HEALTH_CHECK_INTENT,
};
pub use response::{
    DialogAction, FulfillmentMessage, FulfillmentResponse, FulfillmentState, GenericResponse,
    HandlerResponse, IntentState, SessionState,
};

use crate::models::{Classification, ClassificationInput, Notification};
use crate::notify::{Notifier, PublishReceipt};
use crate::observability::{HandlerMetrics, StructuredLogger};
use crate::predictor::{Predictor, ThresholdPredictor};
use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Default AWS region when `AWS_REGION` is not set
pub const DEFAULT_AWS_REGION: &str = "us-east-2";

const FUNCTION_NAME: &str = "sentinel-handler";

/// Handler configuration, read from the environment at cold start
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HandlerConfig {
    /// Data lake bucket, kept for context only
    #[serde(default)]
    pub s3_bucket_name: Option<String>,

    /// Location of the trained model; read but not loaded
    #[serde(default)]
    pub model_s3_key: Option<String>,

    /// Notification topic; empty disables notifications
    #[serde(default)]
    pub sns_topic_arn: Option<String>,

    #[serde(default = "default_aws_region")]
    pub aws_region: String,
}

fn default_aws_region() -> String {
    DEFAULT_AWS_REGION.to_string()
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            s3_bucket_name: None,
            model_s3_key: None,
            sns_topic_arn: None,
            aws_region: default_aws_region(),
        }
    }
}

impl HandlerConfig {
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.sns_topic_arn = Some(topic.into());
        self
    }

    /// The topic to publish to, if one is configured and non-empty
    pub fn notification_topic(&self) -> Option<&str> {
        self.sns_topic_arn
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// What happened to the notification for one invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Published {
        topic: String,
        receipt: PublishReceipt,
    },
    /// Usage was normal, nothing to send
    NotRequired,
    /// Usage was high but no topic is configured
    TopicNotConfigured,
}

/// Successful result of the classification stages
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub input: ClassificationInput,
    pub classification: Classification,
    pub notification: Notification,
    pub delivery: Delivery,
}

/// Full record of one invocation, for callers that need more than the envelope
#[derive(Debug)]
pub struct Invocation {
    pub shape: InputShape,
    pub result: Result<Outcome>,
    pub response: HandlerResponse,
}

/// The alert handler
///
/// Holds its configuration and the process-wide notifier; safe to share
/// across concurrent invocations.
pub struct Handler {
    config: HandlerConfig,
    predictor: Box<dyn Predictor>,
    notifier: Arc<dyn Notifier>,
    logger: StructuredLogger,
    metrics: HandlerMetrics,
}

impl Handler {
    /// Create a handler using the threshold predictor
    pub fn new(config: HandlerConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            config,
            predictor: Box::new(ThresholdPredictor::new()),
            notifier,
            logger: StructuredLogger::new(FUNCTION_NAME),
            metrics: HandlerMetrics::new(),
        }
    }

    pub fn with_predictor(mut self, predictor: impl Predictor + 'static) -> Self {
        self.predictor = Box::new(predictor);
        self
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn logger(&self) -> &StructuredLogger {
        &self.logger
    }

    /// Handle one event and return its response envelope
    pub async fn handle(&self, event: &Value) -> HandlerResponse {
        self.invoke(event).await.response
    }

    /// Handle one event, keeping the intermediate result alongside the envelope
    pub async fn invoke(&self, event: &Value) -> Invocation {
        let start = Instant::now();
        self.logger.log_event_received(event);

        let shape = InputShape::resolve(event);
        self.metrics.inc_invocation(shape.label());

        let input = match shape.extract(event) {
            Ok(input) => {
                self.logger.log_input_parsed(shape.label(), &input);
                input
            }
            Err(err) => {
                self.metrics.inc_extraction_failures();
                self.logger
                    .log_extraction_failed(shape.label(), &err.to_string());
                ClassificationInput::unknown()
            }
        };

        let result = self.evaluate(input).await;
        if let Err(ref err) = result {
            self.metrics.inc_handler_failures();
            self.logger.log_handler_failed(err);
        }

        let response = HandlerResponse::from_outcome(&shape, &result);
        self.metrics.observe_latency(start.elapsed().as_secs_f64());

        Invocation {
            shape,
            result,
            response,
        }
    }

    async fn evaluate(&self, input: ClassificationInput) -> Result<Outcome> {
        let classification = self.predictor.predict(&input)?;
        self.metrics.inc_prediction(classification);
        self.logger.log_prediction(
            &input.server_id,
            classification,
            self.predictor.model_version(),
        );

        let notification = Notification::for_result(&input, classification);
        let delivery = self.deliver(classification, &notification).await?;

        Ok(Outcome {
            input,
            classification,
            notification,
            delivery,
        })
    }

    async fn deliver(
        &self,
        classification: Classification,
        notification: &Notification,
    ) -> Result<Delivery> {
        if !classification.is_high() {
            self.metrics.inc_notifications_skipped("normal");
            self.logger
                .log_notification_skipped("No high disk usage predicted");
            return Ok(Delivery::NotRequired);
        }

        let Some(topic) = self.config.notification_topic() else {
            self.metrics.inc_notifications_skipped("topic_not_configured");
            self.logger
                .log_notification_skipped("SNS_TOPIC_ARN not configured");
            return Ok(Delivery::TopicNotConfigured);
        };

        let receipt = self.notifier.publish(topic, notification).await?;
        self.metrics.inc_notifications_published();
        self.logger
            .log_notification_published(topic, receipt.message_id.as_deref());

        Ok(Delivery::Published {
            topic: topic.to_string(),
            receipt,
        })
    }
}
