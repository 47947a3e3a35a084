//! Integration tests for the `ramses-names` CLI binary.
//!
//! Every test points `--cache-file` into its own temp directory and
//! isolates config and logging from the developer's environment.
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

const OBSERVATIONS: &str = concat!(
    r#"{"type":"zone_name_observed","zone_index":"01","name":"Lounge","ts":1700000000}"#,
    "\n",
    r#"{"type":"zone_name_observed","zone_index":"02","name":"Kitchn","ts":1700000001}"#,
    "\n",
    r#"{"type":"zone_name_observed","zone_index":"02","name":"Kitchen","ts":1700000002}"#,
    "\n",
    r#"{"type":"device_name_observed","device_id":"04:122498","name":"Kitchen TRV","ts":1700000003}"#,
    "\n",
    r#"{"type":"zone_device_role_observed","zone_index":"02","role":"zone_actuator","device_id":"04:122498","ts":1700000004}"#,
    "\n",
);

/// Build a [`Command`] for the binary with env isolation.
fn names_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ramses-names");
    cmd.env("HOME", "/tmp/ramses-names-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/ramses-names-test-nonexistent")
        .env_remove("RAMSES_NAMES_CACHE_FILE")
        .env_remove("RAMSES_NAMES_LOG__LEVEL")
        .env_remove("RAMSES_NAMES_LOG__FORMAT")
        .env_remove("RUST_LOG");
    cmd
}

/// Command bound to the cache file inside `dir`.
fn cached_cmd(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = names_cmd();
    cmd.arg("--cache-file").arg(cache_path(dir));
    cmd
}

fn cache_path(dir: &TempDir) -> PathBuf {
    dir.path().join("ramses_rf_cache.json")
}

fn write_observations(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("observations.jsonl");
    fs::write(&path, OBSERVATIONS).unwrap();
    path
}

fn ingest_fixture(dir: &TempDir) {
    let file = write_observations(dir);
    cached_cmd(dir).arg("ingest").arg(&file).assert().success();
}

fn stdout_json(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = names_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn test_help_lists_commands() {
    names_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("ingest")
            .and(predicate::str::contains("resolve"))
            .and(predicate::str::contains("labels"))
            .and(predicate::str::contains("list")),
    );
}

#[test]
fn test_version_flag() {
    names_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ramses-names"));
}

#[test]
fn test_completions_zsh() {
    names_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_for_every_shell() {
    for shell in ["bash", "elvish", "fish", "powershell", "zsh"] {
        let output = names_cmd().args(["completions", shell]).output().unwrap();
        assert!(output.status.success(), "{shell}: {output:?}");
        assert!(
            String::from_utf8_lossy(&output.stdout).contains("ramses-names"),
            "{shell} script does not mention the binary"
        );
    }
}

// ── Resolution ──────────────────────────────────────────────────────

#[test]
fn test_resolve_on_cold_start_prints_unknown() {
    let dir = tempfile::tempdir().unwrap();
    cached_cmd(&dir)
        .args(["resolve", "zone", "07"])
        .assert()
        .success()
        .stdout("unknown\n");
    assert!(!cache_path(&dir).exists());
}

#[test]
fn test_ingest_then_resolve_uses_latest_name() {
    let dir = tempfile::tempdir().unwrap();
    ingest_fixture(&dir);

    cached_cmd(&dir)
        .args(["resolve", "zone", "02"])
        .assert()
        .success()
        .stdout("Kitchen\n");

    let json = stdout_json(cached_cmd(&dir).args(["-o", "json", "resolve", "device", "04:122498"]));
    assert_eq!(json["kind"], "device");
    assert_eq!(json["name"], "Kitchen TRV");
}

#[test]
fn test_labels_derive_zone_from_device_role() {
    let dir = tempfile::tempdir().unwrap();
    ingest_fixture(&dir);

    let json = stdout_json(cached_cmd(&dir).args([
        "-o", "json", "labels", "--device", "04:122498",
    ]));
    assert_eq!(json["device_name"], "Kitchen TRV");
    assert_eq!(json["zone_name"], "Kitchen");

    let json = stdout_json(cached_cmd(&dir).args([
        "-o", "json", "labels", "--device", "04:122498", "--zone", "01",
    ]));
    assert_eq!(json["zone_name"], "Lounge");
}

#[test]
fn test_labels_without_keys_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = cached_cmd(&dir).arg("labels").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Ingest ──────────────────────────────────────────────────────────

#[test]
fn test_ingest_from_stdin_reports_summary() {
    let dir = tempfile::tempdir().unwrap();
    let input = format!("{OBSERVATIONS}this is not json\n");

    let json = stdout_json(
        cached_cmd(&dir)
            .args(["-o", "json", "ingest", "-"])
            .write_stdin(input),
    );

    assert_eq!(json["lines"], 6);
    assert_eq!(json["created"], 3);
    assert_eq!(json["updated"], 1);
    assert_eq!(json["roles_added"], 1);
    assert_eq!(json["malformed"], 1);
    assert_eq!(json["save_failures"], 0);

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(cache_path(&dir)).unwrap()).unwrap();
    assert_eq!(doc["zones"]["02"]["name"], "Kitchen");
    assert_eq!(doc["zone_roles"]["02"]["zone_actuator"][0], "04:122498");
}

#[test]
fn test_ingest_survives_non_utf8_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut input = b"\xc3\x28 not text\n".to_vec();
    input.extend_from_slice(OBSERVATIONS.as_bytes());

    let json = stdout_json(
        cached_cmd(&dir)
            .args(["-o", "json", "ingest", "-"])
            .write_stdin(input),
    );

    assert_eq!(json["lines"], 6);
    assert_eq!(json["malformed"], 1);
    assert_eq!(json["created"], 3);

    cached_cmd(&dir)
        .args(["resolve", "zone", "02"])
        .assert()
        .success()
        .stdout("Kitchen\n");
}

#[test]
fn test_ingest_missing_file_fails_with_io_code() {
    let dir = tempfile::tempdir().unwrap();
    let output = cached_cmd(&dir)
        .args(["ingest", "/nonexistent/observations.jsonl"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_reingest_does_not_rewrite_cache() {
    let dir = tempfile::tempdir().unwrap();
    ingest_fixture(&dir);
    let before = fs::read(cache_path(&dir)).unwrap();

    let file = dir.path().join("confirm.jsonl");
    fs::write(
        &file,
        r#"{"type":"zone_name_observed","zone_index":"02","name":"Kitchen","ts":1700009999}"#,
    )
    .unwrap();
    cached_cmd(&dir).arg("ingest").arg(&file).assert().success();

    assert_eq!(fs::read(cache_path(&dir)).unwrap(), before);
}

// ── Listing ─────────────────────────────────────────────────────────

#[test]
fn test_list_zones_plain() {
    let dir = tempfile::tempdir().unwrap();
    ingest_fixture(&dir);

    cached_cmd(&dir)
        .args(["-o", "plain", "list", "zones"])
        .assert()
        .success()
        .stdout("01\n02\n");
}

#[test]
fn test_list_roles_json() {
    let dir = tempfile::tempdir().unwrap();
    ingest_fixture(&dir);

    let json = stdout_json(cached_cmd(&dir).args(["-o", "json", "list", "roles"]));
    assert_eq!(
        json,
        serde_json::json!([
            {"zone_index": "02", "role": "zone_actuator", "device_id": "04:122498"}
        ])
    );
}

#[test]
fn test_list_devices_table() {
    let dir = tempfile::tempdir().unwrap();
    ingest_fixture(&dir);

    cached_cmd(&dir)
        .args(["list", "devices"])
        .assert()
        .success()
        .stdout(predicate::str::contains("04:122498").and(predicate::str::contains("Kitchen TRV")));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_file_sets_cache_location() {
    let dir = tempfile::tempdir().unwrap();
    ingest_fixture(&dir);
    let config = dir.path().join("config.toml");
    fs::write(
        &config,
        format!("cache_file = {:?}\n", cache_path(&dir).display().to_string()),
    )
    .unwrap();

    names_cmd()
        .arg("--config")
        .arg(&config)
        .args(["resolve", "zone", "01"])
        .assert()
        .success()
        .stdout("Lounge\n");
}

#[test]
fn test_config_show_reflects_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let json = stdout_json(cached_cmd(&dir).args([
        "-o",
        "json",
        "--log-format",
        "json",
        "config",
        "show",
    ]));

    assert_eq!(
        Path::new(json["cache_file"].as_str().unwrap()),
        cache_path(&dir)
    );
    assert_eq!(json["log"]["format"], "json");
}

#[test]
fn test_config_path_honours_flag() {
    names_cmd()
        .args(["--config", "/etc/ramses/names.toml", "config", "path"])
        .assert()
        .success()
        .stdout("/etc/ramses/names.toml\n");
}

#[test]
fn test_missing_explicit_config_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = cached_cmd(&dir)
        .args(["--config", "/nonexistent/names.toml", "resolve", "zone", "01"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_invalid_config_value_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    fs::write(&config, "[log]\nformat = \"xml\"\n").unwrap();

    let output = cached_cmd(&dir)
        .arg("--config")
        .arg(&config)
        .args(["list", "zones"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
}
