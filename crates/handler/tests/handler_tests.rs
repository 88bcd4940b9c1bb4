//! Integration tests for the handler's Lambda wire format

use sentinel_lib::{Handler, HandlerConfig, HandlerResponse, RecordingNotifier};
use serde_json::{json, Value};
use std::sync::Arc;

const TOPIC: &str = "arn:aws:sns:us-east-2:123456789012:sentinel-ops-alerts-topic";

fn setup_handler(topic: Option<&str>) -> (Handler, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let mut config = HandlerConfig {
        s3_bucket_name: Some("sentinel-ops-data-lake-satya".to_string()),
        model_s3_key: Some("models/disk_usage_predictor.json".to_string()),
        ..HandlerConfig::default()
    };
    if let Some(topic) = topic {
        config = config.with_topic(topic);
    }
    (Handler::new(config, notifier.clone()), notifier)
}

async fn invoke(handler: &Handler, event: Value) -> Value {
    let response = handler.handle(&event).await;
    serde_json::to_value(response).expect("response serializes")
}

fn body(wire: &Value) -> Value {
    serde_json::from_str(wire["body"].as_str().expect("string body")).expect("JSON body")
}

#[tokio::test]
async fn test_direct_high_usage_with_topic() {
    let (handler, notifier) = setup_handler(Some(TOPIC));

    let wire = invoke(&handler, json!({"server_id": "s1", "disk_usage_percent": 95})).await;

    assert_eq!(wire["statusCode"], 200);
    assert_eq!(body(&wire)["prediction"], 1);
    assert_eq!(notifier.publish_count(), 1);
}

#[tokio::test]
async fn test_direct_high_usage_without_topic() {
    let (handler, notifier) = setup_handler(None);

    let wire = invoke(&handler, json!({"server_id": "s1", "disk_usage_percent": 95})).await;

    assert_eq!(wire["statusCode"], 200);
    assert_eq!(body(&wire)["prediction"], 1);
    assert_eq!(notifier.publish_count(), 0);
}

#[tokio::test]
async fn test_direct_normal_usage() {
    let (handler, notifier) = setup_handler(Some(TOPIC));

    let wire = invoke(&handler, json!({"server_id": "s1", "disk_usage_percent": 50})).await;

    assert_eq!(wire["statusCode"], 200);
    assert_eq!(body(&wire)["prediction"], 0);
    assert_eq!(notifier.publish_count(), 0);
}

#[tokio::test]
async fn test_lex_event_closes_dialog() {
    let (handler, _notifier) = setup_handler(None);
    let event = json!({
        "sessionId": "abc",
        "sessionState": {
            "intent": {
                "name": "CheckServerHealth",
                "slots": {"serverName": {"value": {"interpretedValue": "web-7"}}},
                "state": "InProgress",
                "confirmationState": "None"
            }
        }
    });

    let wire = invoke(&handler, event).await;

    assert_eq!(wire["sessionState"]["dialogAction"]["type"], "Close");
    assert_eq!(wire["sessionState"]["intent"]["name"], "CheckServerHealth");
    assert_eq!(wire["sessionState"]["intent"]["state"], "Fulfilled");
    assert_eq!(
        wire["sessionState"]["intent"]["slots"]["serverName"]["value"]["interpretedValue"],
        "web-7"
    );
    let content = wire["messages"][0]["content"].as_str().unwrap();
    assert!(content.contains("web-7 (Disk Usage: 91%)"));
    assert!(content.contains("ALERT"));
}

#[tokio::test]
async fn test_empty_event_uses_fallback() {
    let (handler, _notifier) = setup_handler(None);

    let wire = invoke(&handler, json!({})).await;

    assert_eq!(wire["statusCode"], 200);
    let body = body(&wire);
    assert_eq!(body["prediction"], 1);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("server-mock-001 (Disk Usage: 92%)"));
}

#[tokio::test]
async fn test_response_parses_back() {
    let (handler, _notifier) = setup_handler(None);

    let wire = invoke(&handler, json!({"server_id": "s1", "disk_usage_percent": 12.5})).await;
    let parsed: HandlerResponse = serde_json::from_value(wire).unwrap();

    let generic = parsed.as_generic().unwrap();
    assert!(generic.body_json().unwrap()["message"]
        .as_str()
        .unwrap()
        .contains("12.5%"));
}

#[tokio::test]
async fn test_concurrent_invocations_share_handler() {
    let (handler, notifier) = setup_handler(Some(TOPIC));
    let handler = Arc::new(handler);

    let mut tasks = Vec::new();
    for i in 0..8 {
        let handler = Arc::clone(&handler);
        tasks.push(tokio::spawn(async move {
            let usage = if i % 2 == 0 { 95 } else { 40 };
            invoke(&handler, json!({"server_id": format!("s{}", i), "disk_usage_percent": usage}))
                .await
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap()["statusCode"], 200);
    }

    assert_eq!(notifier.publish_count(), 4);
}
