//! Handler configuration from the Lambda environment

use anyhow::Result;
use sentinel_lib::HandlerConfig;

/// Load configuration from environment variables
///
/// Reads `S3_BUCKET_NAME`, `MODEL_S3_KEY`, `SNS_TOPIC_ARN` and `AWS_REGION`.
/// Anything missing or unreadable falls back to defaults.
pub fn load() -> Result<HandlerConfig> {
    let config = config::Config::builder()
        .add_source(config::Environment::default())
        .build()?;

    Ok(config.try_deserialize().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_reads_lambda_environment() {
        env::set_var("SNS_TOPIC_ARN", "arn:aws:sns:us-east-2:123456789012:alerts");
        env::set_var("MODEL_S3_KEY", "models/disk_usage_predictor.json");
        env::remove_var("AWS_REGION");

        let config = load().unwrap();

        assert_eq!(
            config.sns_topic_arn.as_deref(),
            Some("arn:aws:sns:us-east-2:123456789012:alerts")
        );
        assert_eq!(
            config.model_s3_key.as_deref(),
            Some("models/disk_usage_predictor.json")
        );
        assert_eq!(config.aws_region, "us-east-2");
    }
}
