//! CLI integration tests

use std::fs::{self, File};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn sentinel() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sentinel"))
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = sentinel()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(stdout.contains("Sentinel Ops"), "Should show app name");
    assert!(stdout.contains("package"), "Should show package command");
    assert!(stdout.contains("train"), "Should show train command");
    assert!(stdout.contains("invoke"), "Should show invoke command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = sentinel()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("sentinel"), "Should show binary name");
}

/// Test train subcommand help
#[test]
fn test_train_help() {
    let output = sentinel()
        .args(["train", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("--bucket"), "Should show bucket option");
    assert!(stdout.contains("--local-store"), "Should show local store option");
    assert!(stdout.contains("--trees"), "Should show trees option");
}

/// Test packaging end to end
#[test]
fn test_package_command() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("lambda_package");
    write(&source.join("lambda_function.py"), "def lambda_handler(event, context): pass");
    write(&source.join("six.py"), "");
    write(&source.join("dateutil/tz/tz.py"), "");
    let zip_path = dir.path().join("bundle.zip");

    let output = sentinel()
        .args(["package", "--source"])
        .arg(&source)
        .arg("--output")
        .arg(&zip_path)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "package should succeed: {}", stdout);
    assert!(stdout.contains("Zip file size"));

    let archive = zip::ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
    let mut names: Vec<&str> = archive.file_names().collect();
    names.sort();
    assert_eq!(names, vec!["dateutil/tz/tz.py", "lambda_function.py", "six.py"]);
}

/// Test packaging JSON output
#[test]
fn test_package_json_output() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("src");
    write(&source.join("lambda_function.py"), "");
    let zip_path = dir.path().join("out.zip");

    let output = sentinel()
        .args(["--format", "json", "package", "--source"])
        .arg(&source)
        .arg("--output")
        .arg(&zip_path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["entries"], serde_json::json!(["lambda_function.py"]));
    assert_eq!(report["advisory"], "within_direct_upload_limit");
}

/// Test local invocation with a recorded notification
#[test]
fn test_invoke_dry_run() {
    let dir = TempDir::new().unwrap();
    let event_path = dir.path().join("event.json");
    write(&event_path, r#"{"server_id": "s1", "disk_usage_percent": 95}"#);

    let output = sentinel()
        .args(["--format", "json", "invoke"])
        .arg(&event_path)
        .args(["--topic", "arn:aws:sns:us-east-2:123456789012:alerts"])
        .env_remove("AWS_REGION")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let response: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(response["statusCode"], 200);
    let body: serde_json::Value =
        serde_json::from_str(response["body"].as_str().unwrap()).unwrap();
    assert_eq!(body["prediction"], 1);
}

/// Test that an unreadable event file is an error
#[test]
fn test_invoke_missing_event() {
    let output = sentinel()
        .args(["invoke", "/nonexistent/event.json"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}
