//! Integration tests for the backend client.
//!
//! These use wiremock to stand in for the execution backend.
#![cfg(feature = "client")]

mod common;
use cascade::client::{Client, RunRequest};
use cascade::prelude::*;
use common::*;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_session_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions/sess-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(running_snapshot_json()))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let snapshot = assert_ok!(client.session_status("sess-1").await);

    assert_eq!(snapshot.session_id, "sess-1");
    assert_eq!(snapshot.status, SessionStatus::Running);
    assert_eq!(snapshot.cells["gather"].status, CellStatus::Completed);
}

#[tokio::test]
async fn test_session_status_fills_missing_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions/abc/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "starting" })))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let snapshot = assert_ok!(client.session_status("abc").await);
    assert_eq!(snapshot.session_id, "abc");
    assert_eq!(snapshot.status, SessionStatus::Starting);
}

#[tokio::test]
async fn test_session_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions/missing/status"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "Session not found"
        })))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    match client.session_status("missing").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Session not found");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_error_body_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions/x/cost"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    match client.session_cost("x").await {
        Err(ClientError::Api { status, message }) => {
            assert_eq!(status, 502);
            assert_eq!(message, "bad gateway");
        }
        other => panic!("Expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_body_is_a_deserialize_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions/x/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let result = client.session_status("x").await;
    assert!(matches!(result, Err(ClientError::Deserialize(_))));
}

#[tokio::test]
async fn test_session_logs_after_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions/sess-1/logs"))
        .and(query_param("after", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [
                { "index": 11, "phase_name": "gather", "role": "assistant", "content": "Found 3 sources" },
                { "index": 12, "level": "info", "message": "Cell finished" }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let logs = assert_ok!(client.session_logs("sess-1", Some(10)).await);

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].index, 11);
    assert_eq!(logs[0].cell_name.as_deref(), Some("gather"));
    assert_eq!(logs[0].message, "Found 3 sources");
    assert_eq!(logs[1].level.as_deref(), Some("info"));
}

#[tokio::test]
async fn test_session_cost() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sessions/sess-1/cost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_cost": 0.42,
            "by_phase": { "gather": 0.12, "summarize": 0.3 },
            "tokens_in": 1200
        })))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let cost = assert_ok!(client.session_cost("sess-1").await);

    assert_eq!(cost.session_id, "sess-1");
    assert_eq!(cost.total_cost, 0.42);
    assert_eq!(cost.by_cell.len(), 2);
    assert_eq!(cost.tokens_in, Some(1200));
    assert_eq!(cost.tokens_out, None);
}

#[tokio::test]
async fn test_run_cascade_sends_inline_yaml() {
    let mock_server = MockServer::start().await;
    let definition = load(RESEARCH_YAML);
    let request = RunRequest::from_definition(&definition)
        .unwrap()
        .with_input("topic", json!("rust"))
        .with_session_id("sess-9");

    Mock::given(method("POST"))
        .and(path("/api/run-cascade"))
        .and(header("authorization", "Bearer secret"))
        .and(body_json(json!({
            "cascade_yaml": request.cascade_yaml.clone().unwrap(),
            "inputs": { "topic": "rust" },
            "session_id": "sess-9"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session_id": "sess-9",
            "cascade_id": "research"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri())
        .unwrap()
        .with_api_key("secret");
    let run = assert_ok!(client.run_cascade(&request).await);

    assert_eq!(run.session_id, "sess-9");
    assert_eq!(run.cascade_id.as_deref(), Some("research"));
}

#[tokio::test]
async fn test_run_cascade_by_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/run-cascade"))
        .and(body_json(json!({
            "cascade_path": "cascades/research.yaml",
            "inputs": {}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "session_id": "s" })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let run = assert_ok!(
        client
            .run_cascade(&RunRequest::from_path("cascades/research.yaml"))
            .await
    );
    assert_eq!(run.session_id, "s");
}

#[tokio::test]
async fn test_cancel_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions/sess-1/cancel"))
        .and(body_json(json!({ "reason": "user stop" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    assert_ok!(client.cancel_session("sess-1", Some("user stop")).await);
}

#[tokio::test]
async fn test_cancel_finished_session_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/sessions/sess-1/cancel"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "Session already completed"
        })))
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    let err = assert_err!(client.cancel_session("sess-1", None).await);
    assert_eq!(
        err.to_string(),
        "API error (status 409): Session already completed"
    );
}

#[tokio::test]
async fn test_respond_checkpoint() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/checkpoints/cp-1/respond"))
        .and(body_json(json!({ "response": { "choice": "approve" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(mock_server.uri()).unwrap();
    assert_ok!(
        client
            .respond_checkpoint("cp-1", &json!({ "choice": "approve" }))
            .await
    );
}
