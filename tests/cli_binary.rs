//! End-to-end tests for the `ngsi` binary.
//!
//! The binary talks to a `wiremock` server through the real `reqwest`
//! transport. Profiles come from a temp config file passed with `--config`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ngsi() -> Command {
    let mut cmd = Command::cargo_bin("ngsi").unwrap();
    cmd.env_remove("NGSI_CONFIG").env_remove("XDG_CONFIG_HOME");
    cmd
}

fn config_for(server: &MockServer) -> TempDir {
    let dir = TempDir::new().unwrap();
    let profiles = format!(
        "[servers.keyrock]\nserver_type = \"keyrock\"\nserver_host = \"{}\"\ntoken = \"secret\"\n",
        server.uri()
    );
    std::fs::write(dir.path().join("config.toml"), profiles).unwrap();
    dir
}

fn config_arg(dir: &TempDir) -> String {
    dir.path().join("config.toml").to_string_lossy().into_owned()
}

#[test]
fn version_flag_works() {
    ngsi()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("ngsi version {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn bare_invocation_prints_help() {
    ngsi()
        .assert()
        .success()
        .stdout(predicate::str::starts_with("NAME:\n   ngsi - "))
        .stdout(predicate::str::contains("GLOBAL OPTIONS:"));
}

#[test]
fn missing_required_flag_exits_one() {
    let home = TempDir::new().unwrap();
    ngsi()
        .env("HOME", home.path())
        .args(["applications", "get", "--host", "http://localhost:1"])
        .assert()
        .code(1)
        .stdout("")
        .stderr("run001 missing required flag: --aid\n");
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "[servers.x]\nserver_type = \"nope\"\nserver_host = \"http://x\"\n")
        .unwrap();

    ngsi()
        .args(["--config", file.to_str().unwrap(), "server", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nope"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn applications_list_against_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/applications"))
        .and(header("X-Auth-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"applications":[{"id":"A"},{"id":"B"}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    let dir = config_for(&server);

    ngsi()
        .args(["--config", &config_arg(&dir), "applications", "list", "--host", "keyrock"])
        .assert()
        .success()
        .stdout("A\nB\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn applications_create_posts_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/applications"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(serde_json::json!({
            "application": {"name": "demo", "redirect_uri": "http://cb"}
        })))
        .respond_with(
            ResponseTemplate::new(201).set_body_string(r#"{"application":{"id":"X1"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;
    let dir = config_for(&server);

    ngsi()
        .args([
            "--config",
            &config_arg(&dir),
            "applications",
            "create",
            "--host",
            "keyrock",
            "-n",
            "demo",
            "-R",
            "http://cb",
        ])
        .assert()
        .success()
        .stdout("X1\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn server_error_is_logged_with_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/applications/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such app"))
        .mount(&server)
        .await;
    let dir = config_for(&server);

    ngsi()
        .args([
            "--config",
            &config_arg(&dir),
            "--stderr",
            "info",
            "applications",
            "get",
            "--host",
            "keyrock",
            "--aid",
            "missing",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("applications_get003 error 404 Not Found no such app"))
        .stderr(predicate::str::ends_with("abnormal termination\n"));
}
