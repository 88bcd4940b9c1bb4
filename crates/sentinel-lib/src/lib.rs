//! Core library for the Sentinel Ops disk-usage alerting system
//!
//! This crate provides:
//! - Threshold-based disk usage classification
//! - The alert handler pipeline (input shapes, notification, response envelopes)
//! - SNS notification delivery
//! - Deployment bundle packaging
//! - Offline random-forest training from historical CSV data
//! - Structured logging and Prometheus metrics

pub mod handler;
pub mod models;
pub mod notify;
pub mod observability;
pub mod packager;
pub mod predictor;
pub mod trainer;

pub use handler::{Handler, HandlerConfig, HandlerResponse, InputShape};
pub use models::*;
pub use notify::{Notifier, PublishReceipt, RecordingNotifier, SnsNotifier};
pub use observability::{HandlerMetrics, StructuredLogger};
pub use predictor::{Predictor, ThresholdPredictor, HIGH_DISK_USAGE_THRESHOLD};
