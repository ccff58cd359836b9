//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `roketo` binary and verify exit codes,
//! stdout content and stderr content. Commands that would reach the
//! network are pointed at an unreachable local port.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const AT_MS: &str = "1700000010000";
const UNREACHABLE_RPC: &str = "http://127.0.0.1:9";

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Helper: create a Command for the `roketo` binary with a clean
/// `ROKETO_*` environment.
fn roketo() -> Command {
    let mut cmd = cargo_bin_cmd!("roketo");
    for var in [
        "ROKETO_RPC_URL",
        "ROKETO_CONTRACT_NAME",
        "ROKETO_FINANCE_CONTRACT_NAME",
        "ROKETO_WNEAR_ID",
        "ROKETO_ACCOUNT_ID",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    roketo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Roketo payment-stream toolkit"));
}

#[test]
fn version_exits_0() {
    roketo()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("roketo"));
}

#[test]
fn unknown_subcommand_fails() {
    roketo().arg("explode").assert().failure();
}

// ──────────────────────────────────────────────
// 2. progress
// ──────────────────────────────────────────────

#[test]
fn progress_text_for_active_stream() {
    roketo()
        .arg("progress")
        .arg(fixture("active_stream.json"))
        .args(["--at", AT_MS])
        .assert()
        .success()
        .stdout(predicate::str::contains("status:     active"))
        .stdout(predicate::str::contains("streamed:   1000 of 1000000 (0.10%)"))
        .stdout(predicate::str::contains("time left:  2h 46m 30s"))
        .stdout(predicate::str::contains("ends at:    1700010000000 ms"));
}

#[test]
fn progress_json_for_active_stream() {
    let output = roketo()
        .arg("progress")
        .arg(fixture("active_stream.json"))
        .args(["--at", AT_MS, "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["progress"]["available"], "1000");
    assert_eq!(v["progress"]["left"], "999000");
    assert_eq!(v["seconds_left"], 9990);
    assert_eq!(v["stream_end_timestamp"], 1700010000000u64);
    assert_eq!(v["is_dead"], false);
    assert!(v["percentages"]["cliff"].is_null());
}

#[test]
fn progress_frozen_ignores_accrual() {
    let output = roketo()
        .arg("progress")
        .arg(fixture("active_stream.json"))
        .args(["--at", AT_MS, "--frozen", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["progress"]["available"], "0");
    assert_eq!(v["progress"]["streamed"], "0");
    assert_eq!(v["seconds_left"], 10000);
}

#[test]
fn progress_of_finished_stream() {
    let output = roketo()
        .arg("progress")
        .arg(fixture("finished_stream.json"))
        .args(["--at", AT_MS, "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["is_dead"], true);
    assert_eq!(v["percentages"]["streamed"], 100.0);
    assert_eq!(v["time_left"], "");
}

#[test]
fn progress_missing_file_fails() {
    roketo()
        .args(["progress", "/nonexistent/stream.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn progress_invalid_snapshot_reports_json_error() {
    roketo()
        .arg("progress")
        .arg(fixture("cliff_before_creation.json"))
        .args(["--output", "json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("cliff"));
}

#[test]
fn quiet_suppresses_error_text() {
    roketo()
        .args(["progress", "/nonexistent/stream.json", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. permissions
// ──────────────────────────────────────────────

#[test]
fn permissions_for_owner() {
    roketo()
        .arg("permissions")
        .arg(fixture("active_stream.json"))
        .args(["--account", "alice.near", "--at", AT_MS])
        .assert()
        .success()
        .stdout(predicate::str::contains("direction:  outgoing"))
        .stdout(predicate::str::contains("pause:      yes"))
        .stdout(predicate::str::contains("withdraw:   no"));
}

#[test]
fn permissions_for_receiver_as_json() {
    let output = roketo()
        .arg("permissions")
        .arg(fixture("active_stream.json"))
        .args(["--account", "bob.near", "--at", AT_MS, "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["direction"], "incoming");
    assert_eq!(v["can_withdraw"], true);
    assert_eq!(v["can_start"], false);
    assert_eq!(v["can_add_funds"], false);
}

#[test]
fn permissions_account_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("roketo.toml");
    fs::write(&config, "account_id = \"bob.near\"\n").unwrap();

    roketo()
        .arg("permissions")
        .arg(fixture("active_stream.json"))
        .arg("--config")
        .arg(&config)
        .args(["--at", AT_MS])
        .assert()
        .success()
        .stdout(predicate::str::contains("account:    bob.near"))
        .stdout(predicate::str::contains("direction:  incoming"));
}

#[test]
fn permissions_without_account_fails() {
    roketo()
        .arg("permissions")
        .arg(fixture("active_stream.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--account"));
}

// ──────────────────────────────────────────────
// 4. fetch and list
// ──────────────────────────────────────────────

#[test]
fn fetch_from_unreachable_node_fails() {
    roketo()
        .args(["fetch", "some-stream"])
        .env("ROKETO_RPC_URL", UNREACHABLE_RPC)
        .assert()
        .failure()
        .stderr(predicate::str::contains("transport error"));
}

#[test]
fn list_from_unreachable_node_is_empty() {
    roketo()
        .args(["list", "incoming", "--account", "bob.near"])
        .env("ROKETO_RPC_URL", UNREACHABLE_RPC)
        .assert()
        .success()
        .stdout(predicate::str::contains("no streams"));
}

#[test]
fn list_json_from_unreachable_node_is_empty_array() {
    let output = roketo()
        .args(["list", "outgoing", "--output", "json"])
        .env("ROKETO_RPC_URL", UNREACHABLE_RPC)
        .env("ROKETO_ACCOUNT_ID", "alice.near")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!([]));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("roketo.toml");
    fs::write(&config, "rpc_url = \"not-a-url\"\n").unwrap();

    roketo()
        .args(["list", "incoming", "--account", "bob.near", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rpc_url"));
}

// ──────────────────────────────────────────────
// 5. tx
// ──────────────────────────────────────────────

#[test]
fn tx_start_prints_change_call() {
    let output = roketo()
        .args(["tx", "start", "abc", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["receiver_id"], "streaming.r-v2.near");
    assert_eq!(v["actions"][0]["method_name"], "start_stream");
    assert_eq!(v["actions"][0]["args"]["stream_id"], "abc");
    assert_eq!(v["actions"][0]["deposit"], "1");
}

#[test]
fn tx_respects_contract_override() {
    roketo()
        .args(["tx", "stop", "abc"])
        .env("ROKETO_CONTRACT_NAME", "streaming-r-v2.dcversus.testnet")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "receiver: streaming-r-v2.dcversus.testnet",
        ))
        .stdout(predicate::str::contains("stop_stream"));
}

#[test]
fn tx_withdraw_many() {
    roketo()
        .args(["tx", "withdraw", "a", "b", "c"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"stream_ids":["a","b","c"]}"#));
}

#[test]
fn tx_add_funds_in_wnear_wraps_first() {
    let output = roketo()
        .args([
            "tx",
            "add-funds",
            "abc",
            "--token",
            "wrap.near",
            "--amount",
            "2000000000000000000000000",
            "--output",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let v = stdout_json(&output);
    assert_eq!(v["receiver_id"], "wrap.near");
    assert_eq!(v["actions"][0]["method_name"], "near_deposit");
    assert_eq!(v["actions"][0]["deposit"], "2000000000000000000000000");
    assert_eq!(v["actions"][1]["method_name"], "ft_transfer_call");
}

#[test]
fn tx_add_funds_rejects_fractional_amount() {
    roketo()
        .args(["tx", "add-funds", "abc", "--token", "usdt.near", "--amount", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amount"));
}

#[test]
fn tx_add_funds_rejects_zero_amount() {
    roketo()
        .args(["tx", "add-funds", "abc", "--token", "usdt.near", "--amount", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid transfer amount"))
        .stdout(predicate::str::is_empty());
}
