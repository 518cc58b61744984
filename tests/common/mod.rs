#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    extract::Request,
    http::{HeaderMap, Method, StatusCode, header},
};
use car_doctor::auth::{AuthSettings, CookieOptions};
use car_doctor::config::{CorsConfig, Environment};
use car_doctor::routes::{AppState, cors_layer, router};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SECRET: &str = "test_secret_key_minimum_32_characters_long";

/// In-memory database with migrations applied
pub async fn create_test_db() -> SqlitePool {
    let pool = car_doctor::db::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to create test database");

    car_doctor_db::migrate(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub fn test_auth_settings() -> AuthSettings {
    let ttl = Duration::from_secs(3600);

    AuthSettings {
        secret: SECRET.to_string(),
        ttl,
        cookie: CookieOptions::for_environment(Environment::Development, Some(ttl)),
        echo_token: true,
        require_email: true,
    }
}

pub fn test_app_with(pool: SqlitePool, auth: AuthSettings) -> Router {
    router(AppState::new(auth, pool)).layer(
        cors_layer(&CorsConfig::default()).expect("Default CORS origins must parse"),
    )
}

pub async fn test_app() -> (Router, SqlitePool) {
    let pool = create_test_db().await;
    (test_app_with(pool.clone(), test_auth_settings()), pool)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `token=<value>` pair from the Set-Cookie header, ready for a Cookie header
    pub fn session_cookie(&self) -> String {
        let set_cookie = self
            .headers
            .get(header::SET_COOKIE)
            .expect("Response should set a cookie")
            .to_str()
            .unwrap();

        set_cookie.split(';').next().unwrap().trim().to_string()
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    builder.body(Body::empty()).unwrap()
}

/// Log in through POST /jwt and return the session cookie pair
pub async fn login(app: &Router, email: &str) -> String {
    let response = send(
        app,
        json_request(Method::POST, "/jwt", serde_json::json!({ "email": email })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);

    response.session_cookie()
}
