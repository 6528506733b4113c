//! Retry scenarios for the request executor
//!
//! Each scenario runs against an in-process server that changes its answer
//! between attempts, so the number of physical requests can be counted.

mod common;

use agent_service_client::executor::ApiRequest;
use agent_service_client::{AgentServiceClient, ClientError, RetryMode};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{fast_config, json_response, status_response, ScriptedServer};
use serde_json::{json, Value};
use std::time::{Duration, Instant};

/// Test 1: a timed-out attempt is retried and the next one succeeds
#[tokio::test]
async fn test_timeout_then_success() {
    let server = ScriptedServer::start("/agents/a1", |n| async move {
        if n == 1 {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        json_response(json!({"success": true, "data": {"id": "a1"}}))
    })
    .await;

    let config = fast_config(&server.base_url).with_timeout(Duration::from_millis(100));
    let client = AgentServiceClient::new(config);
    let started = Instant::now();
    let data: Value = client
        .executor()
        .execute(ApiRequest::get("/agents/a1"))
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(data, json!({"id": "a1"}));
    assert_eq!(server.hits(), 2);
    // The 100ms timeout, then one 10ms backoff unit before the second attempt
    assert!(elapsed >= Duration::from_millis(110), "elapsed {:?}", elapsed);
    // A second backoff would mean a third attempt
    assert!(elapsed < Duration::from_millis(500), "elapsed {:?}", elapsed);
}

/// Test 2: success on attempt k uses exactly k attempts
#[tokio::test]
async fn test_success_on_kth_attempt_stops_retrying() {
    for k in 1..=3usize {
        let server = ScriptedServer::start("/stats", move |n| async move {
            if n < k {
                status_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"success": false, "error": "warming up"}),
                )
            } else {
                json_response(json!({"success": true, "data": {"total_agents": 4}}))
            }
        })
        .await;

        let client = AgentServiceClient::new(fast_config(&server.base_url));
        let stats = client.get_server_stats().await.unwrap();

        assert_eq!(stats.total_agents, 4);
        assert_eq!(server.hits(), k, "attempts for k = {}", k);
    }
}

/// Test 3: an always-failing endpoint is hit once per budgeted attempt and
/// the last failure is surfaced after the full backoff schedule
#[tokio::test]
async fn test_exhausted_budget_returns_last_failure() {
    let server = ScriptedServer::start("/agents/a1", |n| async move {
        status_response(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({"success": false, "message": format!("attempt {}", n)}),
        )
    })
    .await;

    let config = fast_config(&server.base_url).with_backoff_unit(Duration::from_millis(20));
    let client = AgentServiceClient::new(config);

    let started = Instant::now();
    let err = client.get_agent("a1").await.unwrap_err();
    let elapsed = started.elapsed();

    assert_eq!(server.hits(), 3);
    assert_eq!(err.to_string(), "attempt 3");
    assert_eq!(err.status(), Some(503));
    // 20ms after the first failure, 40ms after the second
    assert!(elapsed >= Duration::from_millis(60), "elapsed {:?}", elapsed);
}

/// Test 4: an undecodable success body counts as a failed attempt
#[tokio::test]
async fn test_malformed_body_is_retried_then_reported() {
    let server = ScriptedServer::start("/health", |_| async move {
        (StatusCode::OK, "<html>gateway</html>").into_response()
    })
    .await;

    let client = AgentServiceClient::new(fast_config(&server.base_url).with_retry_attempts(2));
    let err = client.health_check().await.unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)), "got {:?}", err);
    assert_eq!(server.hits(), 2);
}

/// Test 5: transient-only mode surfaces a deterministic rejection at once
#[tokio::test]
async fn test_transient_only_mode_stops_on_client_error() {
    let server = ScriptedServer::start("/agents/missing", |_| async move {
        status_response(
            StatusCode::NOT_FOUND,
            json!({"success": false, "error": "Agent not found"}),
        )
    })
    .await;

    let config = fast_config(&server.base_url).with_retry_mode(RetryMode::TransientOnly);
    let client = AgentServiceClient::new(config);
    let err = client.get_agent("missing").await.unwrap_err();

    assert_eq!(err.to_string(), "Agent not found");
    assert_eq!(server.hits(), 1);
}

/// Test 6: concurrent operations on one client run independent retry loops
#[tokio::test]
async fn test_concurrent_operations_do_not_interfere() {
    let flaky = ScriptedServer::start("/agents/a1", |n| async move {
        if n == 1 {
            status_response(StatusCode::BAD_GATEWAY, json!({}))
        } else {
            json_response(json!({"success": true, "data": {"id": "a1"}}))
        }
    })
    .await;
    let client = AgentServiceClient::new(fast_config(&flaky.base_url));

    let (first, second) = tokio::join!(
        client.executor().execute::<Value>(ApiRequest::get("/agents/a1")),
        client.executor().execute::<Value>(ApiRequest::get("/agents/a1")),
    );

    assert_eq!(first.unwrap()["id"], "a1");
    assert_eq!(second.unwrap()["id"], "a1");
    // One of the two saw the 502 and retried once
    assert_eq!(flaky.hits(), 3);
}
