use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

/// GET /health - the process is up
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// GET /ready - 503 until the document store answers
pub async fn ready(State(pool): State<SqlitePool>) -> impl IntoResponse {
    if let Err(e) = sqlx::query("SELECT 1").execute(&pool).await {
        tracing::warn!(error = %e, "Document store unreachable");

        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"status": "not_ready", "reason": "database_unavailable"})),
        );
    }

    (StatusCode::OK, Json(json!({"status": "ready"})))
}
