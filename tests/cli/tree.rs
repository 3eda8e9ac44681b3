//! Tests for `hangar folder`, `hangar server` and `hangar tree`.

use crate::support::*;

#[test]
fn test_empty_tree() {
    let t = Test::init();

    let output = t.run(&["tree"]);
    assert_success(&output);
    assert_stdout_contains(&output, "tree is empty");
}

#[test]
fn test_nested_tree_json() {
    let t = Test::init();
    let prod = t.folder("prod", None);
    let db = t.folder("db", Some(prod));
    t.server("pg-1", Some(db), &[]);
    t.server("bastion", None, &[]);

    let tree = t.tree_json();
    assert_eq!(tree["folders"][0]["name"], "prod");
    assert_eq!(tree["folders"][0]["folders"][0]["id"], db);
    assert_eq!(tree["folders"][0]["folders"][0]["servers"][0]["name"], "pg-1");
    assert_eq!(tree["servers"][0]["name"], "bastion");
    assert_eq!(tree["servers"][0]["port"], 22);
}

#[test]
fn test_tree_text_output() {
    let t = Test::init();
    let prod = t.folder("prod", None);
    t.server("pg-1", Some(prod), &[]);

    let output = t.run(&["tree"]);
    assert_success(&output);
    assert_stdout_contains(&output, "▸ prod");
    assert_stdout_contains(&output, "ssh://10.0.0.1:22");
}

#[test]
fn test_folder_default_name() {
    let t = Test::init();

    let output = t.run(&["folder", "add"]);
    assert_success(&output);
    assert_eq!(t.tree_json()["folders"][0]["name"], "New Folder");
}

#[test]
fn test_folder_cannot_move_into_descendant() {
    let t = Test::init();
    let a = t.folder("a", None);
    let b = t.folder("b", Some(a));

    let output = t.run(&["folder", "mv", &a.to_string(), "--parent", &b.to_string()]);
    assert_failure(&output);
    assert_stderr_contains(&output, "own subtree");
}

#[test]
fn test_folder_rm_cascades() {
    let t = Test::init();
    let id = t.identity("db", "pw");
    let prod = t.folder("prod", None);
    let db = t.folder("db", Some(prod));
    let server = t.server("pg-1", Some(db), &[id]);

    let output = t.run(&["folder", "rm", &prod.to_string(), "--json"]);
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["servers"], serde_json::json!([server]));
    assert_eq!(report["folders"].as_array().unwrap().len(), 2);

    assert_eq!(t.tree_json()["folders"], serde_json::json!([]));
    // default retention keeps identities
    assert_eq!(t.identities_json().len(), 1);
}

#[test]
fn test_server_add_protocol_default_port() {
    let t = Test::init();

    let output = t.run(&["server", "add", "desk", "10.0.0.9", "--protocol", "rdp"]);
    assert_success(&output);
    assert_stdout_contains(&output, "rdp://10.0.0.9:3389");
}

#[test]
fn test_server_add_unknown_identity_fails() {
    let t = Test::init();

    let output = t.run(&["server", "add", "web", "10.0.0.1", "--identity", "77"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "identity not found: 77");
    assert_eq!(t.tree_json()["servers"], serde_json::json!([]));
}

#[test]
fn test_server_edit_and_move() {
    let t = Test::init();
    let folder = t.folder("ops", None);
    let server = t.server("web", None, &[]).to_string();

    let output = t.run(&["server", "edit", &server, "--name", "web-1", "--port", "2222"]);
    assert_success(&output);
    assert_stdout_contains(&output, "web-1 (ssh://10.0.0.1:2222)");

    let output = t.run(&["server", "mv", &server, "--folder", &folder.to_string()]);
    assert_success(&output);
    let tree = t.tree_json();
    assert_eq!(tree["servers"], serde_json::json!([]));
    assert_eq!(tree["folders"][0]["servers"][0]["name"], "web-1");
}

#[test]
fn test_server_dup_copies_identities() {
    let t = Test::init();
    let id = t.identity("db", "pw");
    let server = t.server("web", None, &[id]);

    let output = t.run(&["server", "dup", &server.to_string()]);
    assert_success(&output);
    assert_stdout_contains(&output, "web (copy)");
    let copy = created_id(&output);

    let tree = t.tree_json();
    let servers = tree["servers"].as_array().unwrap();
    let copied = servers.iter().find(|s| s["id"] == copy).unwrap();
    let copied_identity = copied["identities"][0].as_u64().unwrap();
    assert_ne!(copied_identity, id);
    assert_eq!(t.identities_json().len(), 2);
}
