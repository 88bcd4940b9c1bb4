//! In-memory notifier that records publish calls instead of sending them

use super::{Notifier, PublishReceipt};
use crate::models::Notification;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

/// Notifier that keeps every published notification in memory
///
/// Used by the CLI's local dry runs. `failing` makes every publish return
/// an error, which exercises the handler's failure envelopes.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<(String, Notification)>>,
    fail_with: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_with: Some(message.into()),
        }
    }

    /// Snapshot of (topic, notification) pairs published so far
    pub fn published(&self) -> Vec<(String, Notification)> {
        self.published
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(&self, topic: &str, notification: &Notification) -> Result<PublishReceipt> {
        if let Some(ref message) = self.fail_with {
            anyhow::bail!("{}", message);
        }

        let mut published = self
            .published
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {}", e))?;
        published.push((topic.to_string(), notification.clone()));

        Ok(PublishReceipt {
            message_id: Some(format!("local-{}", published.len())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Notification {
        Notification {
            subject: "subject".to_string(),
            body: "body".to_string(),
        }
    }

    #[tokio::test]
    async fn test_records_publishes() {
        let notifier = RecordingNotifier::new();
        let receipt = notifier.publish("topic-a", &sample()).await.unwrap();

        assert_eq!(receipt.message_id.as_deref(), Some("local-1"));
        assert_eq!(notifier.publish_count(), 1);
        assert_eq!(notifier.published()[0].0, "topic-a");
    }

    #[tokio::test]
    async fn test_failing_notifier() {
        let notifier = RecordingNotifier::failing("throttled");
        let err = notifier.publish("topic-a", &sample()).await.unwrap_err();

        assert_eq!(err.to_string(), "throttled");
        assert_eq!(notifier.publish_count(), 0);
    }
}
