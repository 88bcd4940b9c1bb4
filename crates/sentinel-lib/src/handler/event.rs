//! Input shape resolution and field extraction
//!
//! An event is classified into exactly one [`InputShape`] up front. Field
//! extraction and response formatting then branch on that variant only.

use crate::models::{ClassificationInput, DEFAULT_DAY_OF_WEEK, DEFAULT_HOUR};
use serde_json::Value;
use thiserror::Error;

/// Intent name that marks a conversational-agent event
pub const HEALTH_CHECK_INTENT: &str = "CheckServerHealth";

/// Identifier used when the event matches no known shape
pub const FALLBACK_SERVER_ID: &str = "server-mock-001";

/// Demonstration usage for conversational events (above threshold)
pub const CONVERSATIONAL_DISK_USAGE: f64 = 91.0;
const CONVERSATIONAL_HOUR: u32 = 10;
const CONVERSATIONAL_DAY_OF_WEEK: u32 = 4;

/// Demonstration usage for unrecognized events (above threshold)
pub const FALLBACK_DISK_USAGE: f64 = 92.0;

const SERVER_NAME_POINTER: &str = "/sessionState/intent/slots/serverName/value/interpretedValue";

/// Errors raised while extracting fields from a recognized shape
#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has an invalid value: {value}")]
    InvalidField { field: &'static str, value: String },
}

/// The input formats accepted by the handler
#[derive(Debug, Clone, PartialEq)]
pub enum InputShape {
    /// Top-level `server_id` and `disk_usage_percent`
    Direct,
    /// Conversational agent request for the health check intent
    Conversational { intent_name: String, slots: Value },
    /// Anything else
    Fallback,
}

impl InputShape {
    /// Resolve the shape of an event; first match wins
    pub fn resolve(event: &Value) -> Self {
        if event.get("server_id").is_some() && event.get("disk_usage_percent").is_some() {
            return InputShape::Direct;
        }

        if let Some(intent) = event.pointer("/sessionState/intent") {
            let name = intent.get("name").and_then(Value::as_str);
            if name == Some(HEALTH_CHECK_INTENT) {
                return InputShape::Conversational {
                    intent_name: HEALTH_CHECK_INTENT.to_string(),
                    slots: intent.get("slots").cloned().unwrap_or(Value::Null),
                };
            }
        }

        InputShape::Fallback
    }

    /// Short label for logs and metrics
    pub fn label(&self) -> &'static str {
        match self {
            InputShape::Direct => "direct",
            InputShape::Conversational { .. } => "conversational",
            InputShape::Fallback => "fallback",
        }
    }

    pub fn is_conversational(&self) -> bool {
        matches!(self, InputShape::Conversational { .. })
    }

    /// Extract the classification input for this shape
    pub fn extract(&self, event: &Value) -> Result<ClassificationInput, ExtractionError> {
        match self {
            InputShape::Direct => extract_direct(event),
            InputShape::Conversational { .. } => {
                let server_id = match event.pointer(SERVER_NAME_POINTER) {
                    None => return Err(ExtractionError::MissingField("serverName")),
                    Some(value) => text_field("serverName", value)?,
                };
                Ok(ClassificationInput::new(server_id, CONVERSATIONAL_DISK_USAGE)
                    .with_schedule(CONVERSATIONAL_HOUR, CONVERSATIONAL_DAY_OF_WEEK))
            }
            InputShape::Fallback => Ok(ClassificationInput::new(
                FALLBACK_SERVER_ID,
                FALLBACK_DISK_USAGE,
            )),
        }
    }
}

fn extract_direct(event: &Value) -> Result<ClassificationInput, ExtractionError> {
    let server_id = event
        .get("server_id")
        .ok_or(ExtractionError::MissingField("server_id"))
        .and_then(|v| text_field("server_id", v))?;
    let disk_usage_percent = event
        .get("disk_usage_percent")
        .ok_or(ExtractionError::MissingField("disk_usage_percent"))
        .and_then(|v| percent_field("disk_usage_percent", v))?;

    let hour = optional_int_field("hour", event.get("hour"))?;
    let dayofweek = optional_int_field("dayofweek", event.get("dayofweek"))?;

    // Both or neither; a lone value is replaced along with the missing one
    let (hour, dayofweek) = match (hour, dayofweek) {
        (Some(h), Some(d)) => (h, d),
        _ => (DEFAULT_HOUR, DEFAULT_DAY_OF_WEEK),
    };

    Ok(ClassificationInput::new(server_id, disk_usage_percent).with_schedule(hour, dayofweek))
}

fn text_field(field: &'static str, value: &Value) -> Result<String, ExtractionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ExtractionError::InvalidField {
            field,
            value: other.to_string(),
        }),
    }
}

fn percent_field(field: &'static str, value: &Value) -> Result<f64, ExtractionError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| ExtractionError::InvalidField {
            field,
            value: value.to_string(),
        })
}

fn optional_int_field(
    field: &'static str,
    value: Option<&Value>,
) -> Result<Option<u32>, ExtractionError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| ExtractionError::InvalidField {
                field,
                value: v.to_string(),
            }),
    }
}
