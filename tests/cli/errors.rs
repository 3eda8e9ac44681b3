//! Error reporting and exit codes.

use crate::support::*;

#[test]
fn test_missing_config_hints_init() {
    let t = Test::new();

    let output = t.run(&["tree"]);
    assert_failure(&output);
    assert_eq!(output.status.code(), Some(1));
    assert_stderr_contains(&output, "hangar config init");
}

#[test]
fn test_missing_key_fails_before_store() {
    let t = Test::init();

    let output = t
        .cmd()
        .env_remove("HANGAR_ENCRYPTION_KEY")
        .args(["identity", "list"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "HANGAR_ENCRYPTION_KEY");
    assert!(!t.store_path().exists());
}

#[test]
fn test_legacy_key_variable_is_accepted() {
    let t = Test::init();

    let output = t
        .cmd()
        .env_remove("HANGAR_ENCRYPTION_KEY")
        .env("ENCRYPTION_KEY", TEST_KEY_HEX)
        .args(["identity", "list"])
        .output()
        .unwrap();
    assert_success(&output);
}

#[test]
fn test_malformed_key_fails() {
    let mut t = Test::init();
    t.key = "not-hex".to_string();

    let output = t.run(&["tree"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid encryption key");
}

#[test]
fn test_wrong_key_reports_integrity() {
    let mut t = Test::init();
    let id = t.identity("db", "s3cret");
    let server = t.server("web", None, &[id]);

    t.key = "ff".repeat(32);
    let output = t.run(&["server", "dup", &server.to_string()]);
    assert_failure(&output);
    assert_stderr_contains(&output, "integrity check failed");
    assert_stderr_contains(&output, "does not match the encryption key");

    // nothing was written by the failed duplicate
    t.key = TEST_KEY_HEX.to_string();
    assert_eq!(t.identities_json().len(), 1);
}

#[test]
fn test_unknown_id_is_not_found() {
    let t = Test::init();

    let output = t.run(&["server", "rm", "404"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "server not found: 404");
}

#[test]
fn test_invalid_port_is_rejected() {
    let t = Test::init();

    let output = t.run(&["server", "add", "web", "10.0.0.1", "--port", "0"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid port");
}
