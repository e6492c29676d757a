//! Registration tests: descriptor batches, per-file isolation, health
//! checks, overrides, and the reported mappings format.

use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use stubway_http_stub::{registry, StubAdapter, StubMapping};
use tempfile::TempDir;

fn write_descriptor(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

async fn get_text(port: i32, path: &str) -> (u16, String) {
    let response = reqwest::get(format!("http://127.0.0.1:{port}{path}"))
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.text().await.unwrap())
}

#[tokio::test]
#[serial]
async fn test_register_two_valid_descriptors() {
    let dir = TempDir::new().unwrap();
    let user = write_descriptor(
        &dir,
        "user.json",
        r#"{"request": {"method": "GET", "url": "/user"},
            "response": {"status": 200, "body": "{\"id\":1}"}}"#,
    );
    let greet = write_descriptor(
        &dir,
        "greet.json",
        r#"{"request": {"method": "GET", "url": "/greet"},
            "response": {"status": 200, "body": "\"hi\""}}"#,
    );

    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();
    adapter.register_mappings(&[user, greet]).await.unwrap();
    let port = adapter.port();

    let (status, body) = get_text(port, "/user").await;
    assert_eq!(status, 200);
    assert_eq!(body, r#"{"id":1}"#);

    let (status, body) = get_text(port, "/greet").await;
    assert_eq!(status, 200);
    assert_eq!(body, r#""hi""#);

    // The two user mappings are present in the report
    let report = adapter.registered_mappings();
    assert!(report.contains("/user"));
    assert!(report.contains("/greet"));

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_malformed_descriptor_is_isolated() {
    let dir = TempDir::new().unwrap();
    let ok = write_descriptor(
        &dir,
        "ok.json",
        r#"{"request": {"url": "/ok"}, "response": {"status": 200, "body": "fine"}}"#,
    );
    let broken = write_descriptor(&dir, "broken.json", "{ this is not json");

    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();
    adapter.register_mappings(&[ok, broken]).await.unwrap();

    let (status, body) = get_text(adapter.port(), "/ok").await;
    assert_eq!(status, 200);
    assert_eq!(body, "fine");

    // The registry reflects only successes
    let record = registry::get(adapter.id()).unwrap();
    assert_eq!(record.mappings.len(), 1);

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_default_health_checks() {
    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();
    let files: Vec<PathBuf> = Vec::new();
    adapter.register_mappings(&files).await.unwrap();
    let port = adapter.port();

    for path in ["/ping", "/health"] {
        let (status, body) = get_text(port, path).await;
        assert_eq!(status, 200);
        assert_eq!(body, "OK");
    }

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_user_mapping_overrides_health_check() {
    let dir = TempDir::new().unwrap();
    let ping = write_descriptor(
        &dir,
        "ping.json",
        r#"{"request": {"method": "GET", "url": "/ping"},
            "response": {"status": 200, "body": "PONG"}}"#,
    );

    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();
    adapter.register_mappings(&[ping]).await.unwrap();

    let (status, body) = get_text(adapter.port(), "/ping").await;
    assert_eq!(status, 200);
    assert_eq!(body, "PONG");

    // The other health check keeps its default
    let (status, body) = get_text(adapter.port(), "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, "OK");

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_registry_consistency_after_registration() {
    let dir = TempDir::new().unwrap();
    let a = write_descriptor(
        &dir,
        "a.json",
        r#"{"request": {"url": "/a"}, "response": {"status": 200}}"#,
    );
    let b = write_descriptor(
        &dir,
        "b.json",
        r#"{"request": {"url": "/b"}, "response": {"status": 200}}"#,
    );

    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();
    adapter.register_mappings(&[a, b]).await.unwrap();

    let record = registry::get(adapter.id()).unwrap();
    assert_eq!(i32::from(record.port), adapter.port());
    assert_eq!(record.mappings.len(), 2);

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_reregistration_replaces_registry_record() {
    let dir = TempDir::new().unwrap();
    let a = write_descriptor(
        &dir,
        "a.json",
        r#"{"request": {"url": "/a"}, "response": {"status": 200}}"#,
    );

    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();

    adapter.register_mappings(&[&a, &a]).await.unwrap();
    assert_eq!(registry::get(adapter.id()).unwrap().mappings.len(), 2);

    adapter.register_mappings(&[a]).await.unwrap();
    assert_eq!(registry::get(adapter.id()).unwrap().mappings.len(), 1);

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_registered_mappings_is_valid_json_array() {
    let dir = TempDir::new().unwrap();
    let user = write_descriptor(
        &dir,
        "user.json",
        r#"{"request": {"url": "/user"}, "response": {"status": 200}}"#,
    );

    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();

    // Before any registration the engine has no mappings
    assert_eq!(adapter.registered_mappings(), "[]");

    adapter.register_mappings(&[user]).await.unwrap();

    let report = adapter.registered_mappings();
    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
    let elements = parsed.as_array().unwrap();
    // Two health checks plus one user mapping
    assert_eq!(elements.len(), 3);

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_register_descriptors_bulk_skips_registry() {
    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();

    let mapping = StubMapping::from_json(
        r#"{"request": {"url": "/bulk"}, "response": {"status": 200, "body": "fed"}}"#,
    )
    .unwrap();
    adapter.register_descriptors(&[mapping]).await.unwrap();

    let (status, body) = get_text(adapter.port(), "/bulk").await;
    assert_eq!(status, 200);
    assert_eq!(body, "fed");

    // The bulk path never touches the registry record
    let record = registry::get(adapter.id()).unwrap();
    assert!(record.mappings.is_empty());

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_response_template_helper_end_to_end() {
    let dir = TempDir::new().unwrap();
    let echo = write_descriptor(
        &dir,
        "echo.json",
        r#"{"request": {"method": "POST", "url": "/echo"},
            "response": {"status": 200,
                         "body": "{\"name\": \"{{jsonpath request.body '$.name'}}\"}"}}"#,
    );

    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();
    adapter.register_mappings(&[echo]).await.unwrap();

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://127.0.0.1:{}/echo", adapter.port()))
        .body(r#"{"name": "alice"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), r#"{"name": "alice"}"#);

    adapter.stop().await;
}

#[tokio::test]
#[serial]
async fn test_unmatched_request_is_404() {
    let mut adapter = StubAdapter::new();
    adapter.start().await.unwrap();
    let files: Vec<PathBuf> = Vec::new();
    adapter.register_mappings(&files).await.unwrap();

    let (status, _body) = get_text(adapter.port(), "/nothing-here").await;
    assert_eq!(status, 404);

    adapter.stop().await;
}
