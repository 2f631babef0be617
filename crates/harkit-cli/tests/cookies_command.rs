use assert_cmd::Command;
use harkit_cli::commands::cookies::collect;
use harkit_core::har::HarReader;
use predicates::prelude::*;
use std::path::PathBuf;

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
fn test_collect_derives_from_headers() {
    let har = HarReader::from_file(&fixture_path("sample.har")).unwrap();
    let cookies = collect(&har);

    // Only the first entry carries cookie headers
    assert_eq!(cookies.len(), 1);
    let entry = &cookies[0];
    assert_eq!(entry.index, 0);
    assert_eq!(entry.url, "https://www.example.com/account?tab=profile");

    assert_eq!(entry.request.len(), 1);
    assert_eq!(entry.request[0].name, "last");
    assert_eq!(entry.request[0].value, "abc");

    let names: Vec<&str> = entry.response.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(entry.response[0].secure, Some(true));
    assert_eq!(entry.response[1].http_only, Some(true));
    assert_eq!(entry.response[1].domain.as_deref(), Some(".example.com"));
}

#[test]
fn test_cookies_binary_json() {
    let output = Command::cargo_bin("harkit")
        .unwrap()
        .arg("cookies")
        .arg(fixture_path("sample.har"))
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["response"][0]["name"], "A");
}

#[test]
fn test_cookies_binary_pretty() {
    Command::cargo_bin("harkit")
        .unwrap()
        .arg("cookies")
        .arg(fixture_path("sample.har"))
        .assert()
        .success()
        .stdout(predicate::str::contains("last=abc"))
        .stdout(predicate::str::contains("B=2"));
}
