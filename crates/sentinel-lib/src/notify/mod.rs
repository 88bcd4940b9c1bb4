//! Alert notification delivery
//!
//! This module provides:
//! - Subject and body formatting for disk usage reports
//! - The `Notifier` seam with an SNS implementation
//! - An in-memory notifier for dry runs and tests

mod message;
mod recording;
mod sns;

pub use message::{ALERT_SUBJECT_MARKER, REPORT_TITLE};
pub use recording::RecordingNotifier;
pub use sns::SnsNotifier;

use crate::models::Notification;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of a successful publish call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

/// Publishes notifications to a named topic
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish a notification, returning the delivery receipt
    async fn publish(&self, topic: &str, notification: &Notification) -> Result<PublishReceipt>;
}
