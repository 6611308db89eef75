//! End-to-end tests for the `design-scout-host` binary (stdin/stdout JSON bridge).
//!
//! Each test spawns a fresh subprocess pointed at a config file whose gallery
//! base URLs resolve to local mock servers, sends JSON commands over stdin,
//! and reads JSON responses from stdout.

use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Test harness
// ---------------------------------------------------------------------------

struct HostBridgeHarness {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    reader: Lines<BufReader<ChildStdout>>,
}

impl HostBridgeHarness {
    fn spawn(config_path: &Path) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_design-scout-host"))
            .env("DESIGN_SCOUT_CONFIG", config_path)
            .env("RUST_LOG", "off")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .expect("failed to spawn design-scout-host");

        let child_stdin = child.stdin.take().expect("no stdin on child process");
        let child_stdout = child.stdout.take().expect("no stdout on child process");

        Self {
            child,
            stdin: BufWriter::new(child_stdin),
            reader: BufReader::new(child_stdout).lines(),
        }
    }

    async fn send_raw(&mut self, line: &str) -> Value {
        self.stdin.write_all(line.as_bytes()).await.unwrap();
        self.stdin.write_all(b"\n").await.unwrap();
        self.stdin.flush().await.unwrap();
        self.next_line().await
    }

    async fn send(&mut self, request_id: &str, command: &str, payload: Value) -> Value {
        let cmd = serde_json::json!({
            "v": 1,
            "request_id": request_id,
            "command": command,
            "payload": payload
        });
        let response = self.send_raw(&cmd.to_string()).await;
        assert_eq!(response["request_id"], request_id);
        response
    }

    async fn next_line(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(10), self.reader.next_line())
            .await
            .expect("timed out waiting for response")
            .expect("failed to read stdout")
            .expect("stdout closed");
        serde_json::from_str(&line).expect("stdout line is not JSON")
    }

    async fn stop(mut self) {
        let response = self
            .send("stop", "runtime.stop", serde_json::json!({}))
            .await;
        assert_eq!(response["payload"]["accepted"], true);
        let status = tokio::time::timeout(Duration::from_secs(10), self.child.wait())
            .await
            .expect("host did not exit after runtime.stop")
            .expect("wait on child");
        assert!(status.success());
    }
}

// ---------------------------------------------------------------------------
// Mock galleries
// ---------------------------------------------------------------------------

fn shots_html(count: usize) -> String {
    let cards: String = (1..=count)
        .map(|i| {
            format!(
                r#"<div class="shot"><a href="/designs/{i}"><img src="https://static.collectui.com/shots/{i}/shot-medium.png" alt="Shot {i}"></a></div>"#
            )
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}

fn godly_html(count: usize) -> String {
    let cards: String = (1..=count)
        .map(|i| {
            format!(
                r#"<a href="/website/{i}"><div style="background-image: url('https://cdn.godly.website/{i}.jpg')"></div><h3>Dashboard {i}</h3></a>"#
            )
        })
        .collect();
    format!("<html><body>{cards}</body></html>")
}

async fn mock_galleries() -> (MockServer, MockServer) {
    let collectui = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/challenges/dashboard">Dashboard (120)</a><a href="/challenges/checkout">Checkout (44)</a>"#,
        ))
        .mount(&collectui)
        .await;
    Mock::given(method("GET"))
        .and(path("/challenges/dashboard"))
        .respond_with(ResponseTemplate::new(200).set_body_string(shots_html(5)))
        .mount(&collectui)
        .await;
    Mock::given(method("GET"))
        .and(path("/challenges/checkout"))
        .and(query_param("sortBy", "newest"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&collectui)
        .await;

    let godly = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(godly_html(4)))
        .mount(&godly)
        .await;

    (collectui, godly)
}

fn write_config(dir: &Path, collectui: &MockServer, godly: &MockServer) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(
        &path,
        format!(
            "[search]\nsources = [\"collectui\", \"godly\"]\ntimeout_seconds = 5\n\n[search.base_urls]\ncollectui = \"{}\"\ngodly = \"{}\"\n",
            collectui.uri(),
            godly.uri()
        ),
    )
    .expect("write config");
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn design_search_interleaves_sources_end_to_end() {
    let (collectui, godly) = mock_galleries().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path(), &collectui, &godly);
    let mut host = HostBridgeHarness::spawn(&config);

    let response = host
        .send(
            "s1",
            "design_search",
            serde_json::json!({"query": "dashboard", "limit": 6, "sources": ["collectui", "godly"]}),
        )
        .await;
    assert_eq!(response["ok"], true);
    assert_eq!(response["payload"]["kind"], "json");
    let data = &response["payload"]["data"];
    assert_eq!(data["count"], 6);
    assert_eq!(data["sources"], serde_json::json!(["Collect UI", "Godly"]));
    let sources: Vec<&str> = data["designs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["source"].as_str().unwrap())
        .collect();
    assert_eq!(
        sources,
        vec!["Collect UI", "Godly", "Collect UI", "Godly", "Collect UI", "Godly"]
    );

    host.stop().await;
}

#[tokio::test]
async fn categories_and_browse_end_to_end() {
    let (collectui, godly) = mock_galleries().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path(), &collectui, &godly);
    let mut host = HostBridgeHarness::spawn(&config);

    let categories = host
        .send("c1", "list_categories", serde_json::json!({}))
        .await;
    assert_eq!(categories["payload"]["data"][0]["slug"], "dashboard");
    assert_eq!(categories["payload"]["data"][1]["count"], 44);

    let browse = host
        .send(
            "b1",
            "browse_category",
            serde_json::json!({"category": "dashboard", "limit": 2}),
        )
        .await;
    assert_eq!(browse["payload"]["data"]["sort"], "popular");
    assert_eq!(browse["payload"]["data"]["count"], 2);

    let empty = host
        .send(
            "b2",
            "browse_category",
            serde_json::json!({"category": "checkout", "sort": "newest"}),
        )
        .await;
    assert_eq!(empty["payload"]["kind"], "text");

    host.stop().await;
}

#[tokio::test]
async fn invalid_input_yields_error_envelopes() {
    let (collectui, godly) = mock_galleries().await;
    let dir = tempfile::tempdir().expect("tempdir");
    let config = write_config(dir.path(), &collectui, &godly);
    let mut host = HostBridgeHarness::spawn(&config);

    let parse_error = host.send_raw("{not json").await;
    assert_eq!(parse_error["request_id"], "parse-error");
    assert_eq!(parse_error["ok"], false);

    let bad_limit = host
        .send(
            "l1",
            "design_search",
            serde_json::json!({"query": "dashboard", "limit": 51}),
        )
        .await;
    assert_eq!(bad_limit["ok"], false);
    assert!(bad_limit["error"].as_str().unwrap().contains("limit"));

    let ping = host.send("p1", "host.ping", serde_json::json!({})).await;
    assert_eq!(ping["payload"]["pong"], true);

    let version = host.send("v1", "host.version", serde_json::json!({})).await;
    assert_eq!(
        version["payload"]["sources"],
        serde_json::json!(["collectui", "godly"])
    );

    let tools = host.send("t1", "tools.list", serde_json::json!({})).await;
    assert_eq!(tools["payload"]["tools"].as_array().unwrap().len(), 5);

    host.stop().await;
}
