// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use parley_core::application::build_engine_with;
use parley_core::domain::config::ParleyConfigSpec;
use parley_core::domain::{FetchError, FetchRequest, FetchResponse, Fetcher};
use parley_core::infrastructure::{InMemoryKnowledgeStore, JsonFileKnowledgeStore};
use parley_core::presentation::app;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct WikiFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl Fetcher for WikiFetcher {
    async fn fetch(&self, _request: FetchRequest) -> Result<FetchResponse, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(FetchResponse {
            status: 200,
            body: r#"{"extract": "A systems programming language."}"#.to_string(),
        })
    }
}

async fn router_with_origins(
    store: Arc<dyn parley_core::domain::KnowledgeStore>,
    cors_origins: &[String],
) -> axum::Router {
    let fetcher = Arc::new(WikiFetcher {
        calls: AtomicUsize::new(0),
    });
    let engine = build_engine_with(&ParleyConfigSpec::default(), store, fetcher)
        .await
        .unwrap();
    app(engine.service, cors_origins)
}

async fn router_with(store: Arc<dyn parley_core::domain::KnowledgeStore>) -> axum::Router {
    let origins = ParleyConfigSpec::default().network.cors_origins;
    router_with_origins(store, &origins).await
}

async fn preflight(app: &axum::Router, uri: &str, origin: &str) -> axum::response::Response {
    let request = Request::builder()
        .method("OPTIONS")
        .uri(uri)
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn router() -> axum::Router {
    router_with(Arc::new(InMemoryKnowledgeStore::new())).await
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<String>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(b) => {
            builder = builder.header("content-type", "application/json");
            Body::from(b)
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn chat_answers_from_seed_data() {
    let app = router().await;
    let (status, body) = send(&app, "POST", "/chat", Some(json!({"query": "hello there"}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Hi! How can I help you today?");
    assert_eq!(body["source"], "local");
    assert_eq!(body["confidence"], 1);
}

#[tokio::test]
async fn chat_unmatched_query_gets_fallback() {
    let app = router().await;
    let (status, body) = send(&app, "POST", "/chat", Some(json!({"query": "banana"}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "I don't understand. Could you rephrase that?");
    assert_eq!(body["source"], "local");
    assert_eq!(body["confidence"], 0);
}

#[tokio::test]
async fn chat_routes_to_encyclopedia() {
    let app = router().await;
    let (status, body) = send(&app, "POST", "/chat", Some(json!({"query": "wikipedia rust"}).to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "A systems programming language.");
    assert_eq!(body["source"], "wikipedia");
    assert!(body.get("confidence").is_none());
}

#[tokio::test]
async fn chat_time_has_no_confidence() {
    let app = router().await;
    let (_, body) = send(&app, "POST", "/chat", Some(json!({"query": "what is the date"}).to_string())).await;
    assert_eq!(body["source"], "time");
    assert!(body["response"].as_str().unwrap().starts_with("The current time is"));
}

#[tokio::test]
async fn chat_rejects_missing_query() {
    let app = router().await;

    let (status, body) = send(&app, "POST", "/chat", Some(json!({"query": "  "}).to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");

    let (status, body) = send(&app, "POST", "/chat", Some("{}".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Query is required");

    let (status, body) = send(&app, "POST", "/chat", Some("{broken".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn train_then_chat_round_trip() {
    let app = router().await;

    let (status, body) = send(
        &app,
        "POST",
        "/train",
        Some(json!({"query": "favorite color", "response": "blue"}).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Training data updated successfully");
    assert_eq!(body["persisted"], true);

    let (_, body) = send(&app, "POST", "/chat", Some(json!({"query": "favorite color"}).to_string())).await;
    assert_eq!(body["response"], "blue");
    assert!(body["confidence"].as_u64().unwrap() > 0);

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["training_data_size"], 6);
}

#[tokio::test]
async fn train_rejects_external_sources() {
    let app = router().await;

    for source in ["wikipedia", "news"] {
        let (status, body) = send(
            &app,
            "POST",
            "/train",
            Some(json!({"query": "q", "response": "r", "source": source}).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "External data cannot be saved to training data");
    }

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["training_data_size"], 5);
}

#[tokio::test]
async fn train_rejects_malformed_records() {
    let app = router().await;

    for body in [json!({"query": "only query"}).to_string(), "not json".to_string()] {
        let (status, value) = send(&app, "POST", "/train", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["error"], "Invalid training data format");
    }
}

#[tokio::test]
async fn health_reports_status() {
    let app = router().await;
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["training_data_size"], 5);
    assert!(body["timestamp"].is_string());
    assert!(body["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn training_persists_to_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("knowledge.json");
    let app = router_with(Arc::new(JsonFileKnowledgeStore::new(&path))).await;

    send(
        &app,
        "POST",
        "/train",
        Some(json!({"query": "capital of france", "response": "Paris"}).to_string()),
    )
    .await;

    let stored: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored.len(), 6);
    assert_eq!(stored[5]["query"], "capital of france");
    assert_eq!(stored[5]["response"], "Paris");
}

#[tokio::test]
async fn preflight_allows_any_origin_by_default() {
    let app = router().await;

    for uri in ["/chat", "/train", "/health"] {
        let response = preflight(&app, uri, "http://localhost:3000").await;
        assert!(response.status().is_success(), "{}", uri);
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*",
            "{}",
            uri
        );
    }
}

#[tokio::test]
async fn chat_response_carries_cors_header() {
    let app = router().await;
    let request = Request::builder()
        .method("POST")
        .uri("/chat")
        .header("origin", "http://localhost:3000")
        .header("content-type", "application/json")
        .body(Body::from(json!({"query": "hello"}).to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn preflight_respects_configured_origins() {
    let origins = vec!["https://app.example.com".to_string()];
    let app = router_with_origins(Arc::new(InMemoryKnowledgeStore::new()), &origins).await;

    let allowed = preflight(&app, "/chat", "https://app.example.com").await;
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://app.example.com"
    );

    let denied = preflight(&app, "/chat", "https://evil.example.com").await;
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn cors_disabled_with_empty_origin_list() {
    let app = router_with_origins(Arc::new(InMemoryKnowledgeStore::new()), &[]).await;
    let (status, _) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);

    let response = preflight(&app, "/chat", "http://localhost:3000").await;
    assert!(response.headers().get("access-control-allow-origin").is_none());
}
