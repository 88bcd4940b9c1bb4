//! Notification text for disk usage reports

use crate::models::{Classification, ClassificationInput, Notification};

/// Prefix of every report subject and body
pub const REPORT_TITLE: &str = "Sentinel AI Ops";

/// Marker prepended to alert subjects
pub const ALERT_SUBJECT_MARKER: &str = "🚨 ALERT";

const ALERT_LINE: &str =
    "ALERT: Predicted High Disk Usage! Immediate attention recommended to prevent issues.";
const NORMAL_LINE: &str = "STATUS: Disk usage is currently normal.";

impl Notification {
    /// Build the report for a classified input
    pub fn for_result(input: &ClassificationInput, classification: Classification) -> Self {
        let header = format!(
            "{} Report for {} (Disk Usage: {}%):\n",
            REPORT_TITLE, input.server_id, input.disk_usage_percent
        );

        match classification {
            Classification::HighUsage => Self {
                subject: format!(
                    "{}: {} - Predicted High Disk Usage",
                    ALERT_SUBJECT_MARKER, input.server_id
                ),
                body: header + ALERT_LINE,
            },
            Classification::Normal => Self {
                subject: format!("{} Status: {}", REPORT_TITLE, input.server_id),
                body: header + NORMAL_LINE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_message() {
        let input = ClassificationInput::new("web-01", 95.0);
        let n = Notification::for_result(&input, Classification::HighUsage);

        assert_eq!(n.subject, "🚨 ALERT: web-01 - Predicted High Disk Usage");
        assert_eq!(
            n.body,
            "Sentinel AI Ops Report for web-01 (Disk Usage: 95%):\n\
             ALERT: Predicted High Disk Usage! Immediate attention recommended to prevent issues."
        );
    }

    #[test]
    fn test_normal_message() {
        let input = ClassificationInput::new("web-01", 42.5);
        let n = Notification::for_result(&input, Classification::Normal);

        assert_eq!(n.subject, "Sentinel AI Ops Status: web-01");
        assert!(n.body.starts_with("Sentinel AI Ops Report for web-01 (Disk Usage: 42.5%):\n"));
        assert!(n.body.ends_with("STATUS: Disk usage is currently normal."));
        assert!(!n.body.contains("ALERT"));
    }
}
