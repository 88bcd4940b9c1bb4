//! Amazon SNS notifier

use super::{Notifier, PublishReceipt};
use crate::models::Notification;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::Client;
use tracing::debug;

/// Publishes notifications through an SNS client built once per process
#[derive(Clone)]
pub struct SnsNotifier {
    client: Client,
}

impl SnsNotifier {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default credential chain for the given region
    pub async fn from_region(region: impl Into<String>) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;
        Self::new(Client::new(&sdk_config))
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(&self, topic: &str, notification: &Notification) -> Result<PublishReceipt> {
        let output = self
            .client
            .publish()
            .topic_arn(topic)
            .message(&notification.body)
            .subject(&notification.subject)
            .send()
            .await
            .with_context(|| format!("Failed to publish to SNS topic {}", topic))?;

        debug!(topic = %topic, message_id = ?output.message_id(), "SNS publish response");

        Ok(PublishReceipt {
            message_id: output.message_id().map(str::to_string),
        })
    }
}
