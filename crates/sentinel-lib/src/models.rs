//! Core data models shared by the handler and the trainer

use serde::{Deserialize, Serialize};

/// Identifier used when event parsing fails
pub const UNKNOWN_SERVER_ID: &str = "UNKNOWN_SERVER";

/// Default hour of day when an event does not carry one
pub const DEFAULT_HOUR: u32 = 12;

/// Default day of week when an event does not carry one
pub const DEFAULT_DAY_OF_WEEK: u32 = 1;

/// Disk usage substituted after a parse failure, kept below the alert threshold
pub const SAFE_DISK_USAGE_PERCENT: f64 = 80.0;

/// Normalized input to the classifier, independent of the event shape it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationInput {
    pub server_id: String,
    pub disk_usage_percent: f64,
    /// Carried for logging only, the decision rule ignores it
    pub hour: u32,
    /// Carried for logging only, the decision rule ignores it
    pub dayofweek: u32,
}

impl ClassificationInput {
    pub fn new(server_id: impl Into<String>, disk_usage_percent: f64) -> Self {
        Self {
            server_id: server_id.into(),
            disk_usage_percent,
            hour: DEFAULT_HOUR,
            dayofweek: DEFAULT_DAY_OF_WEEK,
        }
    }

    pub fn with_schedule(mut self, hour: u32, dayofweek: u32) -> Self {
        self.hour = hour;
        self.dayofweek = dayofweek;
        self
    }

    /// Input used when the event could not be parsed
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_SERVER_ID, SAFE_DISK_USAGE_PERCENT)
    }
}

/// Binary disk usage classification
///
/// Serialized as `1` for high usage and `0` for normal usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Classification {
    Normal,
    HighUsage,
}

impl Classification {
    pub fn is_high(&self) -> bool {
        matches!(self, Classification::HighUsage)
    }

    pub fn as_label(&self) -> u32 {
        u8::from(*self) as u32
    }
}

impl From<Classification> for u8 {
    fn from(value: Classification) -> Self {
        match value {
            Classification::Normal => 0,
            Classification::HighUsage => 1,
        }
    }
}

impl TryFrom<u8> for Classification {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Classification::Normal),
            1 => Ok(Classification::HighUsage),
            other => Err(format!("invalid classification {}", other)),
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::Normal => write!(f, "normal"),
            Classification::HighUsage => write!(f, "high"),
        }
    }
}

/// Human-readable notification derived from a classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// One row of the historical disk usage dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingRow {
    pub hour: f64,
    pub dayofweek: f64,
    pub disk_usage_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Classification::HighUsage).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Classification::Normal).unwrap(), "0");

        let parsed: Classification = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Classification::HighUsage);
        assert!(serde_json::from_str::<Classification>("2").is_err());
    }

    #[test]
    fn test_unknown_input_is_below_threshold() {
        let input = ClassificationInput::unknown();
        assert_eq!(input.server_id, "UNKNOWN_SERVER");
        assert!(input.disk_usage_percent <= 90.0);
        assert_eq!((input.hour, input.dayofweek), (12, 1));
    }
}
