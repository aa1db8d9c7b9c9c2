#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use helpdesk_core::{AppConfig, AppState};
use helpdesk_store::CounterService;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;

pub fn config(pairs: &[(&str, &str)]) -> AppConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    AppConfig::from_lookup(|key| vars.get(key).cloned())
}

pub fn app(config: AppConfig) -> Router {
    app_with_counters(config, CounterService::memory("test"))
}

pub fn app_with_counters(config: AppConfig, counters: CounterService) -> Router {
    let state = AppState::new(config, counters).expect("state should build");
    helpdesk_routes::router(state)
}

/// Local `/v1/chat/completions` stand-in. Returns its base URL and a call counter.
pub async fn spawn_completion_stub(reply: &str) -> (String, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let body = json!({ "choices": [{ "message": { "role": "assistant", "content": reply } }] });

    let stub = Router::new().route(
        "/v1/chat/completions",
        post(move |Json(_payload): Json<Value>| {
            let counter = counter.clone();
            let body = body.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Json(body)
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub).await.unwrap();
    });

    (format!("http://{addr}/v1"), calls)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("app should handle request");

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("response body should be readable");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub async fn post_json(app: &Router, uri: &str, payload: Value, headers: &[(&str, &str)]) -> TestResponse {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = builder
        .body(Body::from(payload.to_string()))
        .expect("request build should succeed");
    send(app, request).await
}

pub async fn get(app: &Router, uri: &str, headers: &[(&str, &str)]) -> TestResponse {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    let request = builder
        .body(Body::empty())
        .expect("request build should succeed");
    send(app, request).await
}

pub fn user_turn(content: &str) -> Value {
    json!({ "messages": [{ "role": "user", "content": content }] })
}
