use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::VerificationError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing session token")]
    MissingToken,

    #[error("Invalid session token: {}", .0.reason())]
    InvalidToken(#[from] VerificationError),

    #[error("Identity does not own the requested records")]
    Forbidden,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(String),
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error payload returned to clients
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::MissingToken | AppError::InvalidToken(_) => "unauthorized".to_string(),
            AppError::Forbidden => "forbidden".to_string(),
            AppError::BadRequest(msg) => msg,
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "internal server error".to_string()
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();

        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_auth_failures_are_unauthorized() {
        for err in [
            AppError::MissingToken,
            AppError::InvalidToken(VerificationError::Expired),
            AppError::InvalidToken(VerificationError::BadSignature),
            AppError::InvalidToken(VerificationError::Malformed),
        ] {
            let (status, body) = render(err).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, serde_json::json!({"message": "unauthorized"}));
        }
    }

    #[tokio::test]
    async fn test_forbidden() {
        let (status, body) = render(AppError::Forbidden).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, serde_json::json!({"message": "forbidden"}));
    }

    #[tokio::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) = render(AppError::Internal("disk on fire".to_string())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"message": "internal server error"}));
    }

    #[tokio::test]
    async fn test_bad_request_keeps_detail() {
        let (status, body) = render(AppError::BadRequest("email is required".to_string())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"message": "email is required"}));
    }
}
