//! Tests for `hangar action`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_delete_server() {
    let t = Test::init();
    let server = t.server("web", None, &[]);

    let output = t.run(&["action", &server.to_string(), "delete"]);
    assert_success(&output);
    assert_stdout_contains(&output, "removed 1 records");
    assert_eq!(t.tree_json()["servers"], serde_json::json!([]));
}

#[test]
fn test_duplicate_server_json() {
    let t = Test::init();
    let server = t.server("web", None, &[]);

    let output = t.run(&["action", &server.to_string(), "dup", "--json"]);
    assert_success(&output);
    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["outcome"], "duplicated");
    assert_eq!(outcome["source"], server);
    assert_eq!(t.tree_json()["servers"].as_array().unwrap().len(), 2);
}

#[test]
fn test_connect_without_client_reports_hint() {
    let t = Test::init();
    let id = t.identity("db", "pw");
    let server = t.server("web", None, &[id]);

    let output = t.run(&["action", &server.to_string(), "connect"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no transport client configured");
    assert_stderr_contains(&output, "through the library");
}

#[test]
fn test_precondition_checked_before_client() {
    let t = Test::init();
    let server = t.server("web", None, &[]);

    t.cmd()
        .args(["action", &server.to_string(), "ssh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("has no identities"))
        .stderr(predicate::str::contains("no transport client").not());
}

#[test]
fn test_unsupported_action_on_folder() {
    let t = Test::init();
    let folder = t.folder("ops", None);

    let output = t.run(&["action", &folder.to_string(), "start"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not supported");
}

#[test]
fn test_unknown_action_name() {
    let t = Test::init();
    let server = t.server("web", None, &[]);

    let output = t.run(&["action", &server.to_string(), "reboot"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid action");
}

#[test]
fn test_malformed_reference() {
    let t = Test::init();

    let output = t.run(&["action", "pveEntry-", "start"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid reference");

    let output = t.run(&["action", "999", "delete"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}
