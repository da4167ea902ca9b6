//! End-to-end behavior of `POST /relay` against stub upstreams.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_missing_endpoint_never_reaches_upstream() {
    let upstream = common::start_stub_upstream(200, "application/json", r#"{"x":1}"#).await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;
    let client = common::client();

    for body in [json!({}), json!({"method": "POST", "payload": {"a": 1}}), json!({"endpoint": ""})] {
        let res = client.post(relay.url("/relay")).json(&body).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: Value = res.json().await.unwrap();
        assert_eq!(err["error_kind"], "bad_request");
        assert_eq!(err["status_code"], 400);
        assert!(err["detail"].is_string());
    }

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_success_body_passes_through_unchanged() {
    let upstream = common::start_stub_upstream(200, "application/json", r#"{"x":1}"#).await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/bots"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"x": 1}));

    let seen = upstream.last();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.path, "/v1/bots");
}

#[tokio::test]
async fn test_upstream_404_surfaces_status_and_detail() {
    let upstream =
        common::start_stub_upstream(404, "application/json", r#"{"error":"not found"}"#).await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/missing", "method": "DELETE"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["detail"], json!({"error": "not found"}));
    assert_eq!(err["error_kind"], "upstream_error");
    assert_eq!(err["status_code"], 404);
}

#[tokio::test]
async fn test_upstream_text_error_is_raw_detail() {
    let upstream = common::start_stub_upstream(500, "text/plain", "database exploded").await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/contacts"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["detail"], "database exploded");
    assert_eq!(err["error_kind"], "upstream_error");
}

#[tokio::test]
async fn test_silent_upstream_times_out() {
    let addr = common::start_silent_backend().await;
    let mut config = common::relay_config(&format!("http://{}", addr));
    config.upstream.timeout_secs = 1;
    config.timeouts.request_secs = 5;
    let relay = common::start_relay(config).await;

    let start = Instant::now();
    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/slow"}))
        .send()
        .await
        .unwrap();
    let elapsed = start.elapsed();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error_kind"], "upstream_unreachable");
    assert!(err["detail"].as_str().unwrap().contains("did not respond"));
    assert!(elapsed >= Duration::from_millis(900), "returned too early: {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(2500), "waited too long: {:?}", elapsed);
}

#[tokio::test]
async fn test_connection_refused_is_unreachable_without_leaking_credential() {
    let addr = common::closed_addr().await;
    let relay = common::start_relay(common::relay_config(&format!("http://{}", addr))).await;

    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/bots", "headers": {"X-Trace": "abc"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = res.text().await.unwrap();
    let err: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(err["error_kind"], "upstream_unreachable");
    assert_eq!(err["detail"], "could not connect to upstream");
    assert!(!text.contains("test-key"));
}

#[tokio::test]
async fn test_non_json_success_is_invalid_response() {
    let upstream = common::start_stub_upstream(200, "text/plain", "oops").await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;

    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/bots"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error_kind"], "upstream_invalid_response");
    assert_eq!(upstream.calls(), 1);
}

#[tokio::test]
async fn test_caller_headers_forwarded_and_auth_injected() {
    let upstream = common::start_stub_upstream(200, "application/json", "{}").await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;
    let client = common::client();

    let res = client
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/bots", "headers": {"X-Trace": "abc"}}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let seen = upstream.last();
    assert_eq!(seen.header("x-trace"), Some("abc"));
    assert_eq!(seen.header("authorization"), Some("Bearer test-key"));

    let res = client
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/bots"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(upstream.last().header("authorization"), Some("Bearer test-key"));
}

#[tokio::test]
async fn test_caller_cannot_override_credential() {
    let upstream = common::start_stub_upstream(200, "application/json", "{}").await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;

    common::client()
        .post(relay.url("/relay"))
        .json(&json!({
            "endpoint": "/v1/bots",
            "headers": {"Authorization": "Bearer caller-key", "Host": "elsewhere.example"}
        }))
        .send()
        .await
        .unwrap();

    let seen = upstream.last();
    assert_eq!(seen.header("authorization"), Some("Bearer test-key"));
    assert_eq!(seen.header("host"), Some(upstream.addr.to_string().as_str()));
}

#[tokio::test]
async fn test_no_auth_header_without_credential() {
    let upstream = common::start_stub_upstream(200, "application/json", "{}").await;
    let mut config = common::relay_config(&upstream.base_url());
    config.upstream.api_key = None;
    config.upstream.require_credential = false;
    let relay = common::start_relay(config).await;

    common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/bots", "headers": {"X-Trace": "abc"}}))
        .send()
        .await
        .unwrap();

    let seen = upstream.last();
    assert!(seen.header("authorization").is_none());
    assert_eq!(seen.header("x-trace"), Some("abc"));
}

#[tokio::test]
async fn test_payload_and_query_dispatch() {
    let upstream = common::start_stub_upstream(201, "application/json", r#"{"id":7}"#).await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;
    let client = common::client();

    let res = client
        .post(relay.url("/relay"))
        .json(&json!({
            "endpoint": "/v1/contacts",
            "method": "POST",
            "payload": {"name": "Jay"},
            "query": {"account": "acme"}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"id": 7}));

    let seen = upstream.last();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.query.as_deref(), Some("account=acme"));
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.json(), json!({"name": "Jay"}));

    client
        .post(relay.url("/relay"))
        .json(&json!({
            "endpoint": "/v1/contacts",
            "method": "get",
            "payload": {"ignored": true},
            "params": {"page": "2"}
        }))
        .send()
        .await
        .unwrap();

    let seen = upstream.last();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.query.as_deref(), Some("page=2"));
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_malformed_bodies_are_bad_requests() {
    let upstream = common::start_stub_upstream(200, "application/json", "{}").await;
    let relay = common::start_relay(common::relay_config(&upstream.base_url())).await;
    let client = common::client();

    let res = client
        .post(relay.url("/relay"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = client
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/x", "method": "TRACE"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await.unwrap()["error_kind"], "bad_request");

    let res = client
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "@evil.example/steal"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    assert_eq!(upstream.calls(), 0);
}

#[tokio::test]
async fn test_redirect_is_relayed_not_followed() {
    let elsewhere = common::start_stub_upstream(200, "application/json", r#"{"collected":true}"#).await;
    let upstream = common::start_redirecting_upstream(format!(
        "http://localhost:{}/collect",
        elsewhere.addr.port()
    ))
    .await;

    let mut config = common::relay_config(&upstream.base_url());
    config.upstream.auth_header = "X-Api-Key".into();
    config.upstream.auth_scheme = String::new();
    let relay = common::start_relay(config).await;

    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/bots"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::FOUND);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error_kind"], "upstream_error");
    assert_eq!(err["status_code"], 302);

    assert_eq!(upstream.calls(), 1);
    assert_eq!(upstream.last().header("x-api-key"), Some("test-key"));
    assert_eq!(elsewhere.calls(), 0);
}

#[tokio::test]
async fn test_oversized_upstream_response_is_invalid() {
    let upstream = common::start_stub_upstream(
        200,
        "application/json",
        r#"{"items":["aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"]}"#,
    )
    .await;
    let mut config = common::relay_config(&upstream.base_url());
    config.upstream.max_response_size = 16;
    let relay = common::start_relay(config).await;

    let res = common::client()
        .post(relay.url("/relay"))
        .json(&json!({"endpoint": "/v1/items"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let err: Value = res.json().await.unwrap();
    assert_eq!(err["error_kind"], "upstream_invalid_response");
    assert_eq!(err["detail"], "upstream response exceeds 16 bytes");
}
