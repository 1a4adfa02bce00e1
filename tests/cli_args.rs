// Black-box runs of the binary that all stop before any network call.
// GOG_BIN points at a missing executable so authentication fails fast.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn docs_tabs(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docs-tabs"));
    cmd.current_dir(dir.path())
        .env_remove("GOOGLE_DOC_ID")
        .env_remove("DOCS_HTTP_TIMEOUT_SECS")
        .env("GOG_BIN", dir.path().join("no-such-gog"));
    cmd
}

#[test]
fn test_write_without_tab_selector_is_usage_error() {
    let dir = TempDir::new().unwrap();
    docs_tabs(&dir)
        .args(["write", "--doc-id", "doc-1", "--text", "hi"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--tab-title"));
}

#[test]
fn test_unknown_mode_is_rejected_before_auth() {
    let dir = TempDir::new().unwrap();
    docs_tabs(&dir)
        .args(["write", "--doc-id", "doc-1", "--tab-id", "t.1", "--text", "hi", "--mode", "bogus"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Unsupported mode: bogus"));
}

#[test]
fn test_missing_content_file_prints_error_json() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    docs_tabs(&dir)
        .args(["write", "--doc-id", "doc-1", "--tab-title", "美股", "--file"])
        .arg(&missing)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("\"ok\": false"))
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_missing_auth_cli_is_reported() {
    let dir = TempDir::new().unwrap();
    docs_tabs(&dir)
        .args(["list-tabs", "--doc-id", "https://docs.google.com/document/d/doc-1/edit"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("\"ok\": false"))
        .stderr(predicate::str::contains("Failed to run"));
}

#[test]
fn test_doc_id_can_come_from_environment() {
    let dir = TempDir::new().unwrap();
    docs_tabs(&dir)
        .env("GOOGLE_DOC_ID", "doc-1")
        .args(["list-tabs"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to run"));
}

#[test]
fn test_invalid_timeout_is_config_error() {
    let dir = TempDir::new().unwrap();
    docs_tabs(&dir)
        .env("DOCS_HTTP_TIMEOUT_SECS", "soon")
        .args(["list-tabs", "--doc-id", "doc-1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("DOCS_HTTP_TIMEOUT_SECS"));
}
