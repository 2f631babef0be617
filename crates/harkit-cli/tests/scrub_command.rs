use assert_cmd::Command;
use harkit_cli::commands::scrub::{ScrubOptions, build_policy, execute};
use harkit_core::har::{HarReader, NOT_APPLICABLE};
use harkit_core::headers::HeaderList;
use harkit_core::scrub::ScrubOperation;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

#[test]
fn test_build_policy_orders_file_before_flags() {
    let temp_dir = TempDir::new().unwrap();
    let policy_path = temp_dir.path().join("policy.json");
    fs::write(
        &policy_path,
        r#"{"operations": [{"op": "remove_header", "name": "Host"}]}"#,
    )
    .unwrap();

    let options = ScrubOptions {
        policy: Some(policy_path),
        defaults: true,
        redact: vec!["Authorization".to_string()],
        remove_pattern: vec!["^x-".to_string()],
        strip_timings: true,
        ..ScrubOptions::default()
    };

    let policy = build_policy(&options).unwrap();
    let ops = &policy.operations;

    assert_eq!(ops.len(), 5);
    assert!(matches!(ops[0], ScrubOperation::RemoveHeader { .. }));
    assert!(matches!(ops[1], ScrubOperation::RedactHeader { .. }));
    assert!(matches!(ops[2], ScrubOperation::RedactHeader { .. }));
    assert!(matches!(ops[3], ScrubOperation::RemoveHeader { .. }));
    assert!(matches!(ops[4], ScrubOperation::StripTimings));
}

#[test]
fn test_build_policy_rejects_bad_pattern() {
    let options = ScrubOptions {
        redact_pattern: vec!["(unclosed".to_string()],
        ..ScrubOptions::default()
    };

    assert!(build_policy(&options).is_err());
}

#[test]
fn test_build_policy_missing_file() {
    let options = ScrubOptions {
        policy: Some(PathBuf::from("/nonexistent/policy.json")),
        ..ScrubOptions::default()
    };

    assert!(build_policy(&options).is_err());
}

#[test]
fn test_scrub_writes_redacted_file() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("scrubbed.har");

    let options = ScrubOptions {
        redact: vec!["authorization".to_string(), "Cookie".to_string()],
        remove_pattern: vec!["^x-".to_string()],
        placeholder: "***".to_string(),
        ..ScrubOptions::default()
    };

    let report = execute(&fixture_path("sample.har"), &options, Some(&output)).unwrap();
    assert_eq!(report.redacted_headers, 2);
    assert_eq!(report.removed_headers, 2);
    assert_eq!(report.stripped_entries, 0);

    let har = HarReader::from_file(&output).unwrap();
    let first = &har.log.entries[0].request;
    assert_eq!(first.headers.value("Authorization"), Some("***"));
    assert_eq!(first.headers.value("Cookie"), Some("***"));
    assert_eq!(first.cookies[0].value, "***");
    assert_eq!(first.headers.value("X-Request-Id"), None);

    let second = &har.log.entries[1].request;
    assert_eq!(second.headers.value("X-API-Key"), None);
    assert_eq!(second.headers.value("Content-Type"), Some("application/x-www-form-urlencoded"));
}

#[test]
fn test_scrub_defaults_and_strip_timings() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("scrubbed.har");

    let options = ScrubOptions {
        defaults: true,
        strip_timings: true,
        ..ScrubOptions::default()
    };

    let report = execute(&fixture_path("sample.har"), &options, Some(&output)).unwrap();
    assert_eq!(report.redacted_headers, 4);
    assert_eq!(report.stripped_entries, 2);

    let har = HarReader::from_file(&output).unwrap();
    let response = &har.log.entries[0].response;
    assert_eq!(response.headers.value("Set-Cookie"), Some("redacted"));
    assert!(response.cookies.iter().all(|cookie| cookie.value == "redacted"));
    assert_eq!(
        har.log.entries[1].request.headers.value("x-api-key"),
        Some("redacted")
    );

    for entry in &har.log.entries {
        assert_eq!(entry.time, NOT_APPLICABLE);
        assert_eq!(entry.timings.wait, NOT_APPLICABLE);
    }
    let page = &har.log.pages.as_ref().unwrap()[0];
    assert_eq!(page.page_timings.on_load, Some(NOT_APPLICABLE));
}

#[test]
fn test_scrub_binary_prints_har() {
    Command::cargo_bin("harkit")
        .unwrap()
        .arg("scrub")
        .arg(fixture_path("sample.har"))
        .arg("--redact")
        .arg("Authorization")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""value": "redacted""#))
        .stdout(predicate::str::contains("eyJhbGc").not());
}

#[test]
fn test_scrub_binary_bad_policy() {
    let temp_dir = TempDir::new().unwrap();
    let policy_path = temp_dir.path().join("policy.json");
    fs::write(&policy_path, r#"{"operations": [{"op": "redact_header"}]}"#).unwrap();

    Command::cargo_bin("harkit")
        .unwrap()
        .arg("scrub")
        .arg(fixture_path("sample.har"))
        .arg("--policy")
        .arg(&policy_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("scrub policy"));
}
