//! Command-line tests. None of these reach a network endpoint.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

use crate::fixtures::*;

fn pubstatus(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pubstatus").unwrap();
    cmd.env("PUBSTATUS_CONFIG_PATH", temp.path().join("config.toml"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn write_context(temp: &TempDir, document: &Value) -> std::path::PathBuf {
    let path = temp.path().join("context.json");
    std::fs::write(&path, document.to_string()).unwrap();
    path
}

#[test]
fn test_walk_prints_discovered_items() {
    let temp = TempDir::new().unwrap();
    let context = write_context(&temp, &page_with_datasources());

    let output = pubstatus(&temp).arg("walk").arg("--context").arg(&context).output().unwrap();
    assert!(output.status.success());

    let walked: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(walked["currentPath"], PAGE_PATH);
    assert_eq!(walked["itemIds"][0], PAGE_ID);
    assert_eq!(walked["itemIds"][1], TEXT_ID);
    assert_eq!(walked["symbolicPaths"][0], "Text 1");
    assert_eq!(walked["diagnostics"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_walk_reads_stdin() {
    let temp = TempDir::new().unwrap();

    pubstatus(&temp)
        .args(["walk", "--context", "-"])
        .write_stdin(bare_page().to_string())
        .assert()
        .success()
        .stdout(predicate::str::contains(PAGE_ID));
}

#[test]
fn test_walk_without_anchor_fails() {
    let temp = TempDir::new().unwrap();
    let context = write_context(&temp, &serde_json::json!({ "pageInfo": { "path": PAGE_PATH } }));

    pubstatus(&temp)
        .arg("walk")
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No current item could be identified"))
        .stderr(predicate::str::contains("pageInfo.id"));
}

#[test]
fn test_walk_with_malformed_json_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    pubstatus(&temp)
        .arg("walk")
        .arg("--context")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Page context is unavailable"));
}

#[test]
fn test_check_with_missing_context_file_fails() {
    let temp = TempDir::new().unwrap();

    pubstatus(&temp)
        .arg("check")
        .arg("--context")
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Page context is unavailable"));
}

#[test]
fn test_check_without_anchor_fails_before_querying() {
    let temp = TempDir::new().unwrap();
    let context = write_context(&temp, &serde_json::json!({ "siteInfo": {} }));

    pubstatus(&temp)
        .args(["check", "--format", "json", "--context"])
        .arg(&context)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No current item could be identified"));
}

#[test]
fn test_check_rejects_unknown_format() {
    let temp = TempDir::new().unwrap();

    pubstatus(&temp)
        .args(["check", "--context", "page.json", "--format", "xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'xml'"));
}

#[test]
fn test_config_path_uses_env_override() {
    let temp = TempDir::new().unwrap();

    pubstatus(&temp)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"))
        .stdout(predicate::str::contains(temp.path().to_string_lossy().as_ref()));
}

#[test]
fn test_config_init_then_show_masks_secrets() {
    let temp = TempDir::new().unwrap();

    pubstatus(&temp).args(["config", "init"]).assert().success();
    assert!(temp.path().join("config.toml").exists());

    pubstatus(&temp)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("***"))
        .stdout(predicate::str::contains("YOUR_AUTHORING_TOKEN").not())
        .stdout(predicate::str::contains("YOUR_DELIVERY_API_KEY").not())
        .stdout(predicate::str::contains("database = \"master\""));

    // A second init leaves the file alone
    pubstatus(&temp)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("config.toml"), "[authoring\nendpoint = ").unwrap();
    let context = write_context(&temp, &bare_page());

    pubstatus(&temp)
        .arg("check")
        .arg("--context")
        .arg(&context)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration file syntax"));
}
