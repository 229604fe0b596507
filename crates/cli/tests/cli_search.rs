use assert_cmd::prelude::*;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::process::{Command, Stdio};

fn scanvf(server_url: &str, dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("scanvf").expect("binary built");
    cmd.args([
        "--config",
        dir.path().join("missing.toml").to_str().expect("utf8 path"),
        "--site-url",
        server_url,
        "--verbosity",
        "quiet",
    ]);
    cmd.env("NO_COLOR", "1");
    cmd
}

#[tokio::test]
async fn search_json_ranks_exact_match_first() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/")
        .match_query(Matcher::UrlEncoded("s".into(), "one piece".into()))
        .with_status(200)
        .with_body(
            r#"<html><body>
            <article><h2>One Piece Party</h2><a href="/manga/one-piece-party">x</a></article>
            <article><h2>One Piece</h2><a href="/manga/one-piece">x</a></article>
            <article><h2>Vinland Saga</h2><a href="/manga/vinland-saga">x</a></article>
            </body></html>"#,
        )
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let assert = scanvf(&server.url(), &dir)
        .args(["search", "one piece"])
        .assert()
        .success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    let v: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(v["count"].as_u64(), Some(2));
    assert_eq!(v["results"][0]["title"].as_str(), Some("One Piece"));
    assert_eq!(
        v["results"][0]["url"].as_str(),
        Some(format!("{}/manga/one-piece", server.url()).as_str())
    );
    assert_eq!(v["results"][1]["title"].as_str(), Some("One Piece Party"));
}

#[tokio::test]
async fn search_table_without_results_says_so() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", Matcher::Any)
        .with_status(200)
        .with_body("<html></html>")
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    scanvf(&server.url(), &dir)
        .args(["search", "naruto", "--format", "table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No results."));
}

#[tokio::test]
async fn search_server_error_still_succeeds_with_empty_list() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    scanvf(&server.url(), &dir)
        .args(["search", "naruto"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 0"));
}

#[test]
fn interactive_empty_input_errors() {
    use std::io::Write;
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = scanvf("http://127.0.0.1:1", &dir);
    cmd.arg("search")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn interactive");
    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin.write_all(b"\n").expect("write stdin");
    }
    let status = child.wait().expect("wait");
    assert!(!status.success());
}

#[test]
fn settings_prints_capabilities() {
    let dir = tempfile::tempdir().unwrap();
    scanvf("http://127.0.0.1:1", &dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"canSearch\": true"))
        .stdout(predicate::str::contains("\"supportsMangaSearch\": true"));
}

#[test]
fn broken_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[site]\nresult_limit = 0\n").unwrap();
    let mut cmd = Command::cargo_bin("scanvf").expect("binary built");
    cmd.args(["--config", path.to_str().unwrap(), "settings"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("result_limit"));
}

#[test]
fn missing_config_file_is_reported_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let mut cmd = Command::cargo_bin("scanvf").expect("binary built");
    cmd.env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .args(["--config", missing.to_str().unwrap(), "--verbosity", "summary", "settings"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Configuration file not found"));
}
