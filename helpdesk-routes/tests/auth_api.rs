mod common;

use axum::http::{StatusCode, header};
use common::{app, config, get, post_json};
use serde_json::json;

fn set_cookie(response: &common::TestResponse) -> Option<&str> {
    response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn mock_login_always_succeeds() {
    let app = app(config(&[("DEMO_MODE", "mock")]));

    let response = post_json(&app, "/auth", json!({ "password": "anything" }), &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["mode"], "mock");
    assert!(set_cookie(&response).is_none());

    let status = get(&app, "/auth", &[]).await;
    assert_eq!(status.body, json!({ "authenticated": true, "mode": "mock" }));
}

#[tokio::test]
async fn missing_password_is_invalid_request() {
    let app = app(config(&[("DEMO_MODE", "demo"), ("DEMO_PASSWORD", "hunter2")]));

    for payload in [json!({}), json!({ "password": "" }), json!({ "password": 42 })] {
        let response = post_json(&app, "/auth", payload.clone(), &[]).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(response.body["code"], "INVALID_REQUEST", "{payload}");
    }
}

#[tokio::test]
async fn demo_wrong_password_is_rejected() {
    let app = app(config(&[("DEMO_MODE", "demo"), ("DEMO_PASSWORD", "hunter2")]));

    let response = post_json(&app, "/auth", json!({ "password": "hunter3" }), &[]).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["code"], "INVALID_PASSWORD");
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn demo_correct_password_sets_session_cookie() {
    let app = app(config(&[("DEMO_MODE", "demo"), ("DEMO_PASSWORD", "hunter2")]));

    let response = post_json(&app, "/auth", json!({ "password": "hunter2" }), &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.body["mode"], "demo");

    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.starts_with("demo_auth=authenticated"));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("Max-Age=86400"));
    assert!(!cookie.contains("Secure"));
}

#[tokio::test]
async fn production_environment_marks_cookie_secure() {
    let app = app(config(&[
        ("DEMO_MODE", "demo"),
        ("DEMO_PASSWORD", "hunter2"),
        ("APP_ENV", "production"),
    ]));

    let response = post_json(&app, "/auth", json!({ "password": "hunter2" }), &[]).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(set_cookie(&response).unwrap().contains("; Secure"));
}

#[tokio::test]
async fn demo_without_configured_password_is_config_error() {
    let app = app(config(&[("DEMO_MODE", "demo")]));

    let response = post_json(&app, "/auth", json!({ "password": "hunter2" }), &[]).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["code"], "CONFIG_ERROR");
}

#[tokio::test]
async fn demo_status_follows_cookie() {
    let app = app(config(&[("DEMO_MODE", "demo"), ("DEMO_PASSWORD", "hunter2")]));

    let anonymous = get(&app, "/auth", &[]).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body, json!({ "authenticated": false, "mode": "demo" }));

    let signed_in = get(&app, "/auth", &[("cookie", "demo_auth=authenticated")]).await;
    assert_eq!(signed_in.body, json!({ "authenticated": true, "mode": "demo" }));

    let forged = get(&app, "/auth", &[("cookie", "demo_auth=admin")]).await;
    assert_eq!(forged.body["authenticated"], false);
}

#[tokio::test]
async fn production_auth_is_not_implemented() {
    let app = app(config(&[("DEMO_MODE", "production")]));

    let login = post_json(&app, "/auth", json!({ "password": "hunter2" }), &[]).await;
    assert_eq!(login.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(login.body["code"], "NOT_IMPLEMENTED");

    let status = get(&app, "/auth", &[("cookie", "demo_auth=authenticated")]).await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body, json!({ "authenticated": false, "mode": "production" }));
}
