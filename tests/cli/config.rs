//! Tests for `hangar config` and `hangar completions`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_init_writes_config() {
    let t = Test::new();

    let output = t.run(&["config", "init"]);
    assert_success(&output);
    assert_stdout_contains(&output, "hangar.toml");

    let content = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(content.contains("[hangar]"));
    assert!(content.contains("[dispatch]"));
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init();

    let output = t.run(&["config", "init"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_init_without_key_prints_one() {
    let t = Test::new();

    let output = t
        .cmd()
        .env_remove("HANGAR_ENCRYPTION_KEY")
        .args(["config", "init"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "export HANGAR_ENCRYPTION_KEY=");
}

#[test]
fn test_show_reports_fingerprint_not_key() {
    let t = Test::init();

    let output = t.run(&["config", "show"]);
    assert_success(&output);
    assert_stdout_contains(&output, "timeout");
    assert_stdout_contains(&output, "keep");
    assert!(!stdout(&output).contains(TEST_KEY_HEX));
}

#[test]
fn test_completions() {
    let t = Test::new();
    for shell in ["bash", "zsh", "fish", "power-shell"] {
        t.cmd()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("hangar"));
    }
}

#[test]
fn test_show_without_init_fails() {
    let t = Test::new();
    t.cmd()
        .args(["config", "show"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("config not found"));
}
