//! End-to-end tests against the built `revpackd` binary.

use std::io::Write;
use std::process::{Command, Stdio};

fn revpackd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_revpackd"));
    cmd.env("RUST_LOG", "off");
    cmd
}

const REQUEST: &str = r#"{
    "container": {"image": "nginx", "memory_bytes": 10, "cpu_shares": 1},
    "hosts": [
        {"id": "busy", "usable_memory": 100, "usable_cpus": 10, "reserved_memory": 90, "reserved_cpus": 9},
        {"id": "idle", "usable_memory": 100, "usable_cpus": 10}
    ]
}"#;

#[test]
fn lists_strategies() {
    let output = revpackd().arg("strategies").output().unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "revbinpack");
}

#[test]
fn place_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(REQUEST.as_bytes()).unwrap();

    let output = revpackd()
        .args(["place", "--input"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["host"]["id"], "idle");
}

#[test]
fn place_failure_exits_nonzero() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"{"container": {"memory_bytes": 10, "cpu_shares": 1},
             "hosts": [{"id": "tiny", "usable_memory": 5, "usable_cpus": 5}]}"#,
    )
    .unwrap();

    let output = revpackd()
        .args(["place", "--input"])
        .arg(file.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["error"], "resource not available");
}

fn place_explained(request: &str) -> (bool, serde_json::Value) {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(request.as_bytes()).unwrap();

    let output = revpackd()
        .args(["place", "--explain", "--input"])
        .arg(file.path())
        .output()
        .unwrap();
    let body = serde_json::from_slice(&output.stdout).unwrap();
    (output.status.success(), body)
}

#[test]
fn explain_lists_ranking_and_exclusions() {
    let (ok, body) = place_explained(
        r#"{
            "container": {"image": "nginx", "memory_bytes": 10, "cpu_shares": 1},
            "hosts": [
                {"id": "half", "usable_memory": 100, "usable_cpus": 10, "reserved_memory": 50, "reserved_cpus": 5},
                {"id": "tiny", "usable_memory": 5, "usable_cpus": 5},
                {"id": "idle", "usable_memory": 100, "usable_cpus": 10},
                {"id": "full", "usable_memory": 100, "usable_cpus": 10, "reserved_cpus": 10}
            ]
        }"#,
    );

    assert!(ok);
    assert_eq!(body["reply"]["host"]["id"], "idle");

    let ranking = body["ranking"].as_array().unwrap();
    let ids: Vec<&str> = ranking
        .iter()
        .map(|c| c["host"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["idle", "half"]);

    assert_eq!(ranking[0]["cpu_score"], 10);
    assert_eq!(ranking[0]["memory_score"], 10);
    assert_eq!(ranking[0]["combined_score"], 20);
    assert_eq!(ranking[1]["cpu_score"], 60);
    assert_eq!(ranking[1]["memory_score"], 60);
    assert_eq!(ranking[1]["combined_score"], 120);

    let excluded = body["excluded"].as_array().unwrap();
    assert_eq!(excluded.len(), 2);
    assert_eq!(excluded[0]["host"]["id"], "tiny");
    assert_eq!(excluded[0]["reason"], "too_small");
    assert_eq!(excluded[1]["host"]["id"], "full");
    assert_eq!(excluded[1]["reason"], "overcommitted");
}

#[test]
fn explain_negative_request_has_empty_ranking() {
    let (ok, body) = place_explained(
        r#"{
            "container": {"memory_bytes": -500, "cpu_shares": -50},
            "hosts": [{"id": "a", "usable_memory": 100, "usable_cpus": 10}]
        }"#,
    );

    assert!(!ok);
    assert!(body["reply"]["error"].as_str().unwrap().contains("invalid request"));
    assert!(body["ranking"].as_array().unwrap().is_empty());
    assert!(body["excluded"].as_array().unwrap().is_empty());
}

#[test]
fn place_reads_stdin() {
    let mut child = revpackd()
        .arg("place")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(REQUEST.as_bytes()).unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(reply["host"]["id"], "idle");
}

#[test]
fn unknown_strategy_is_rejected() {
    let output = revpackd()
        .args(["--strategy", "binpack", "place"])
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown placement strategy"));
}

#[test]
fn config_file_selects_strategy() {
    let mut config = tempfile::NamedTempFile::new().unwrap();
    config
        .write_all(b"[strategy]\nname = \"nope\"\n")
        .unwrap();

    let output = revpackd()
        .arg("--config")
        .arg(config.path())
        .arg("serve")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope"));
}

#[test]
fn serve_answers_each_line() {
    let mut child = revpackd()
        .arg("serve")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    {
        let stdin = child.stdin.as_mut().unwrap();
        let one_line = REQUEST.replace('\n', " ");
        writeln!(stdin, "{one_line}").unwrap();
        writeln!(stdin).unwrap();
        writeln!(stdin, "garbage").unwrap();
    }
    drop(child.stdin.take());

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let replies: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["host"]["id"], "idle");
    assert!(replies[1]["error"].as_str().unwrap().starts_with("malformed request"));
}
