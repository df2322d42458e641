//! Integration tests for the CLI binary.
//!
//! Verifies that the `wst` binary responds to basic flags and drives a full
//! template → key-bind → group → token → verify workflow in a temp repo.
//!
//! This test is registered as a [[test]] in the wallet-strategy-cli crate
//! so that CARGO_BIN_EXE_wst is available.

use std::path::Path;
use std::process::{Command, Output};

/// Get a Command pointing to the `wst` binary.
fn wst_binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_wst"));
    cmd.env_remove("WALLET_STRATEGY_PATH");
    cmd
}

/// Run `wst --repo REPO args...`.
fn wst(repo: &Path, args: &[&str]) -> Output {
    wst_binary()
        .arg("--repo")
        .arg(repo)
        .args(args)
        .output()
        .expect("failed to execute wst")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn assert_ok(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{what} should succeed, stderr: {}",
        stderr(output)
    );
}

#[test]
fn cli_responds_to_help() {
    let output = wst_binary()
        .arg("--help")
        .output()
        .expect("failed to execute wst --help");

    assert_ok(&output, "wst --help");
    let out = stdout(&output);
    assert!(
        out.contains("wst") || out.contains("WalletStrategy") || out.contains("Usage"),
        "wst --help output should contain usage information, got: {out}"
    );
}

#[test]
fn cli_responds_to_version() {
    let output = wst_binary()
        .arg("--version")
        .output()
        .expect("failed to execute wst --version");

    assert_ok(&output, "wst --version");
    let out = stdout(&output);
    assert!(
        out.contains("0.3") || out.contains("wst"),
        "wst --version should contain version info, got: {out}"
    );
}

#[test]
fn cli_exits_with_error_on_unknown_flag() {
    let output = wst_binary()
        .arg("--nonexistent-flag")
        .output()
        .expect("failed to execute wst");

    assert!(
        !output.status.success(),
        "wst with unknown flag should exit with error"
    );
}

#[test]
fn cli_lists_codes() {
    let dir = tempfile::tempdir().unwrap();
    let output = wst(dir.path(), &["codes"]);
    assert_ok(&output, "wst codes");
    let out = stdout(&output);
    assert!(out.contains("chain_msg"), "got: {out}");
    assert!(out.contains("market"), "got: {out}");
}

#[test]
fn cli_init_writes_config_and_database() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path().join("repo");

    let output = wst(&repo, &["init"]);
    assert_ok(&output, "wst init");
    assert!(repo.join("config.json").exists());
    assert!(repo.join("strategy.db").exists());
}

#[test]
fn cli_full_workflow() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();

    assert_ok(
        &wst(repo, &["template", "new-msg-type", "send", "--codes", "0,chain_msg"]),
        "new-msg-type",
    );
    assert_ok(
        &wst(repo, &["template", "new-method", "transfer", "--methods", "Send,Withdraw"]),
        "new-method",
    );
    assert_ok(
        &wst(
            repo,
            &[
                "keybind",
                "from-template",
                "kb1",
                "f01000",
                "--msg-type",
                "send",
                "--method",
                "transfer",
            ],
        ),
        "keybind from-template",
    );
    assert_ok(&wst(repo, &["group", "new", "g1", "kb1"]), "group new");

    let output = wst(repo, &["token", "new", "g1"]);
    assert_ok(&output, "token new");
    let token = stdout(&output).trim().to_string();
    assert!(!token.is_empty());

    let output = wst(repo, &["verify", &token, "f01000", "chain_msg", "--method", "Send"]);
    assert_ok(&output, "verify permitted");
    assert!(stdout(&output).contains("Permitted:     true"));

    let output = wst(repo, &["verify", &token, "f01000", "chain_msg", "--method", "Burn"]);
    assert!(!output.status.success(), "verify with unlisted method should fail");
    assert!(stderr(&output).contains("method not allowed"));

    let output = wst(repo, &["verify", &token, "f09999", "0"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("address not bound"));
}

#[test]
fn cli_json_output_and_errors() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();

    let output = wst(
        repo,
        &["--json", "keybind", "new", "kb1", "t01000", "--codes", "deal"],
    );
    assert_ok(&output, "keybind new --json");
    let kb: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(kb["codes"], serde_json::json!([3, 9, 10]));
    assert_eq!(kb["methods"], serde_json::json!([]));

    let output = wst(repo, &["keybind", "new", "kb1", "t01000", "--codes", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Already exists"));

    let output = wst(repo, &["keybind", "new", "kb2", "not-an-address", "--codes", "1"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid address"));

    let output = wst(repo, &["keybind", "rm", "--address", "t01000"]);
    assert_ok(&output, "keybind rm --address");
    assert!(stdout(&output).contains("Removed 1"));
}

#[test]
fn cli_template_show_reports_missing_and_broken_repos_differently() {
    let dir = tempfile::tempdir().unwrap();
    let repo = dir.path();

    let output = wst(repo, &["template", "show", "ghost"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("no template named 'ghost'"));

    std::fs::write(repo.join("strategy.db"), b"this is not a database").unwrap();
    let output = wst(repo, &["template", "show", "ghost"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("error:"), "got: {err}");
    assert!(!err.contains("no template named"), "got: {err}");
}
