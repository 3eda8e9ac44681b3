//! Tests for `hangar identity`.

use crate::support::*;

#[test]
fn test_add_and_list() {
    let t = Test::init();
    let id = t.identity("prod-db", "hunter2");

    let output = t.run(&["identity", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "prod-db");
    assert_stdout_contains(&output, &id.to_string());
    assert!(!stdout(&output).contains("hunter2"));
}

#[test]
fn test_list_json_is_metadata_only() {
    let t = Test::init();
    t.identity("prod-db", "hunter2");

    let list = t.identities_json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["label"], "prod-db");
    assert_eq!(list[0]["has_secret"], true);
    assert!(list[0].get("sealed").is_none());
    assert!(!serde_json::to_string(&list).unwrap().contains("hunter2"));
}

#[test]
fn test_secret_never_stored_in_plaintext() {
    let t = Test::init();
    t.identity("prod-db", "a-very-recognizable-secret");

    let store = t.store();
    assert!(!store.is_empty());
    assert!(!store.contains("a-very-recognizable-secret"));
}

#[test]
fn test_secret_from_stdin() {
    let t = Test::init();

    let output = t
        .cmd()
        .args(["identity", "add", "piped", "--username", "root"])
        .write_stdin("from-stdin\n")
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(t.identities_json()[0]["has_secret"], true);
}

#[test]
fn test_no_secret_flag() {
    let t = Test::init();

    let output = t.run(&["identity", "add", "bare", "--no-secret"]);
    assert_success(&output);
    assert_eq!(t.identities_json()[0]["has_secret"], false);
}

#[test]
fn test_edit_with_empty_secret_clears_it() {
    let t = Test::init();
    let id = t.identity("db", "pw").to_string();

    let output = t.run(&["identity", "edit", &id, "--secret", ""]);
    assert_success(&output);
    assert_eq!(t.identities_json()[0]["has_secret"], false);
}

#[test]
fn test_rm_drops_identity_from_servers() {
    let t = Test::init();
    let a = t.identity("a", "pa");
    let b = t.identity("b", "pb");
    let server = t.server("web", None, &[a, b]);

    let output = t.run(&["identity", "rm", &a.to_string()]);
    assert_success(&output);

    let tree = t.tree_json();
    let web = &tree["servers"][0];
    assert_eq!(web["id"], server);
    assert_eq!(web["identities"], serde_json::json!([b]));
}

#[test]
fn test_dup_creates_independent_copy() {
    let t = Test::init();
    let id = t.identity("db", "pw");

    let output = t.run(&["identity", "dup", &id.to_string()]);
    assert_success(&output);
    assert_stdout_contains(&output, "db (copy)");
    let copy = created_id(&output);
    assert_ne!(copy, id);

    let output = t.run(&["identity", "rm", &id.to_string()]);
    assert_success(&output);
    let list = t.identities_json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], copy);
    assert_eq!(list[0]["has_secret"], true);
}

#[test]
fn test_owner_isolation() {
    let t = Test::init();
    let id = t.identity("mine", "pw");

    let output = t
        .cmd()
        .args(["--owner", "2", "identity", "rm", &id.to_string()])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");

    let output = t
        .cmd()
        .args(["--owner", "2", "identity", "list", "--json"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "[]");
}
