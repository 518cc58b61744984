//! Session issuance, the auth gate on GET /checkout and logout
mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{Method, StatusCode, header},
    middleware,
    routing::get,
};
use car_doctor::auth::{Identity, issue};
use car_doctor::middleware::auth_middleware;
use car_doctor::routes::AppState;
use common::{SECRET, create_test_db, get, json_request, send, test_app, test_auth_settings};
use serde_json::json;

/// Gated route that counts how often its handler actually runs
async fn counting_app() -> (Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = AppState::new(test_auth_settings(), create_test_db().await);

    let counter = calls.clone();
    let app = Router::new()
        .route(
            "/probe",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "ran"
                }
            }),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    (app, calls)
}

#[tokio::test]
async fn test_login_sets_http_only_cookie_and_echoes_token() {
    let (app, _pool) = test_app().await;

    let response = send(
        &app,
        json_request(Method::POST, "/jwt", json!({"email": "a@x.com", "name": "A"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    let token = response.body["token"].as_str().unwrap().to_string();

    let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with(&format!("token={token}")));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Max-Age=3600"));
    assert!(!set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_login_without_echo_returns_success() {
    let pool = create_test_db().await;
    let mut auth = test_auth_settings();
    auth.echo_token = false;
    let app = common::test_app_with(pool, auth);

    let response = send(
        &app,
        json_request(Method::POST, "/jwt", json!({"email": "a@x.com"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"success": true}));
    assert!(response.headers.contains_key(header::SET_COOKIE));
}

#[tokio::test]
async fn test_login_requires_email() {
    let (app, _pool) = test_app().await;

    for body in [json!({"name": "anonymous"}), json!({"email": "  "})] {
        let response = send(&app, json_request(Method::POST, "/jwt", body)).await;

        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({"message": "email is required"}));
        assert!(!response.headers.contains_key(header::SET_COOKIE));
    }
}

#[tokio::test]
async fn test_missing_cookie_is_rejected_before_handler_runs() {
    let (app, calls) = counting_app().await;

    let response = send(&app, get("/probe", None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body, json!({"message": "unauthorized"}));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_tokens_are_rejected_before_handler_runs() {
    let (app, calls) = counting_app().await;
    let identity = Identity::with_email("a@x.com");

    let wrong_secret = issue(
        &identity,
        "another_secret_key_minimum_32_characters",
        Duration::from_secs(60),
    )
    .unwrap();
    let expired = issue(&identity, SECRET, Duration::ZERO).unwrap();

    for token in [wrong_secret.as_str(), expired.as_str(), "not-a-jwt", ""] {
        let cookie = format!("token={token}");
        let response = send(&app, get("/probe", Some(&cookie))).await;

        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "token {token:?}");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_valid_token_reaches_handler() {
    let (app, calls) = counting_app().await;
    let token = issue(
        &Identity::with_email("a@x.com"),
        SECRET,
        Duration::from_secs(60),
    )
    .unwrap();

    let response = send(&app, get("/probe", Some(&format!("token={token}")))).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_checkout_read_requires_cookie() {
    let (app, _pool) = test_app().await;

    let response = send(&app, get("/checkout?email=a@x.com", None)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let (app, _pool) = test_app().await;
    let cookie = common::login(&app, "a@x.com").await;

    let response = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/logout")
            .header(header::COOKIE, &cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"email": "a@x.com"}).to_string()))
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"success": true}));

    let set_cookie = response.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.starts_with("token=;"));
    assert!(set_cookie.contains("Max-Age=0"));

    // A client honouring the expiry no longer sends the cookie
    let after = send(&app, get("/checkout?email=a@x.com", None)).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_without_body() {
    let (app, _pool) = test_app().await;

    let response = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/logout")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(
        response.headers[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .contains("Max-Age=0")
    );
}

#[tokio::test]
async fn test_login_with_unusable_body_is_json_bad_request() {
    let (app, _pool) = test_app().await;

    let wrong_type = send(&app, json_request(Method::POST, "/jwt", json!({"email": 5}))).await;
    assert_eq!(wrong_type.status, StatusCode::BAD_REQUEST);
    assert!(wrong_type.body["message"].is_string());
    assert!(!wrong_type.headers.contains_key(header::SET_COOKIE));

    let not_json = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/jwt")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(not_json.status, StatusCode::BAD_REQUEST);
    assert!(not_json.body["message"].is_string());
}
