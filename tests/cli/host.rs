//! Tests for `hangar host`.

use crate::support::*;

/// Host id from an `imported host NAME (pveServer-N)` line.
fn host_id(output: &std::process::Output) -> u64 {
    let out = stdout(output);
    let start = out.find("pveServer-").expect("no host reference in output") + "pveServer-".len();
    out[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .expect("numeric host id")
}

fn add_host(t: &Test) -> u64 {
    let token = t.identity("api", "token").to_string();
    let output = t.run(&["host", "add", "pve", "10.0.0.2", "-u", "root@pam", "-i", &token]);
    assert_success(&output);
    host_id(&output)
}

fn sync(t: &Test, host: u64) {
    let file = t.dir.path().join("entries.json");
    std::fs::write(
        &file,
        r#"[
            {"kind": "qemu", "remote_id": "100", "name": "web-vm", "status": "stopped"},
            {"kind": "lxc", "remote_id": "101", "name": "cache", "status": "running"}
        ]"#,
    )
    .unwrap();
    let output = t.run(&["host", "sync", &host.to_string(), file.to_str().unwrap()]);
    assert_success(&output);
    assert_stdout_contains(&output, "synced 2 entries");
}

#[test]
fn test_add_uses_default_port() {
    let t = Test::init();
    add_host(&t);

    let tree = t.tree_json();
    assert_eq!(tree["hosts"][0]["port"], 8006);
    assert_eq!(tree["hosts"][0]["username"], "root@pam");
}

#[test]
fn test_sync_and_list_entries() {
    let t = Test::init();
    let host = add_host(&t);
    sync(&t, host);

    let output = t.run(&["host", "entries", &host.to_string()]);
    assert_success(&output);
    assert_stdout_contains(&output, "web-vm");
    assert_stdout_contains(&output, &format!("pveEntry-{}-100", host));
}

#[test]
fn test_sync_rejects_duplicate_remote_ids() {
    let t = Test::init();
    let host = add_host(&t);
    let file = t.dir.path().join("dupes.json");
    std::fs::write(
        &file,
        r#"[
            {"kind": "qemu", "remote_id": "100", "name": "a", "status": "stopped"},
            {"kind": "lxc", "remote_id": "100", "name": "b", "status": "running"}
        ]"#,
    )
    .unwrap();

    let output = t.run(&["host", "sync", &host.to_string(), file.to_str().unwrap()]);
    assert_failure(&output);

    let output = t.run(&["host", "entries", &host.to_string(), "--json"]);
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "[]");
}

#[test]
fn test_rm_reports_entries() {
    let t = Test::init();
    let host = add_host(&t);
    sync(&t, host);

    let output = t.run(&["host", "rm", &host.to_string()]);
    assert_success(&output);
    assert_stdout_contains(&output, "entries");
    assert_eq!(t.tree_json()["hosts"], serde_json::json!([]));
}

#[test]
fn test_refresh_without_client_fails() {
    let t = Test::init();
    let host = add_host(&t);
    sync(&t, host);

    let output = t.run(&["host", "refresh", &host.to_string()]);
    assert_failure(&output);
    assert_stderr_contains(&output, "no virtualization client configured");
}

#[test]
fn test_mv_into_folder_and_back() {
    let t = Test::init();
    let host = add_host(&t);
    let lab = t.folder("lab", None);

    let output = t.run(&["host", "mv", &host.to_string(), "--folder", &lab.to_string()]);
    assert_success(&output);
    assert_stdout_contains(&output, &format!("pveServer-{}", host));

    let tree = t.tree_json();
    assert_eq!(tree["hosts"], serde_json::json!([]));
    assert_eq!(tree["folders"][0]["hosts"][0]["id"], host);

    let output = t.run(&["host", "mv", &host.to_string()]);
    assert_success(&output);
    assert_stdout_contains(&output, "to root");
    assert_eq!(t.tree_json()["hosts"][0]["id"], host);
}
