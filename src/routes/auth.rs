use axum::{Json, body::Bytes, extract::State};
use axum_extra::extract::{CookieJar, WithRejection};
use serde_json::{Value, json};

use crate::auth::{Identity, cookie, token};
use crate::error::AppError;
use crate::routes::AppState;

/// POST /jwt - Issue a session token for the presented identity
///
/// The identity is not checked against any credential store; see
/// `jwt.require_email` for the only gate applied before signing.
pub async fn issue_token(
    State(state): State<AppState>,
    jar: CookieJar,
    WithRejection(Json(identity), _): WithRejection<Json<Identity>, AppError>,
) -> Result<(CookieJar, Json<Value>), AppError> {
    let has_email = identity
        .email
        .as_deref()
        .is_some_and(|email| !email.trim().is_empty());

    if state.auth.require_email && !has_email {
        return Err(AppError::BadRequest("email is required".to_string()));
    }

    let token = token::issue(&identity, &state.auth.secret, state.auth.ttl)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(
        email = identity.email.as_deref().unwrap_or("<none>"),
        "Issued session token"
    );

    let body = if state.auth.echo_token {
        json!({ "token": token })
    } else {
        json!({ "success": true })
    };

    Ok((cookie::attach(jar, token, &state.auth.cookie), Json(body)))
}

/// POST /logout - Expire the session cookie
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    body: Bytes,
) -> (CookieJar, Json<Value>) {
    // Body is informational only; anything unparsable is logged as no email
    let user: Value = serde_json::from_slice(&body).unwrap_or_default();
    let email = user.get("email").and_then(Value::as_str).unwrap_or("<none>");

    tracing::info!(email, "Logging out user");

    (
        cookie::clear(jar, &state.auth.cookie),
        Json(json!({ "success": true })),
    )
}
