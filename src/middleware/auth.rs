use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::{Identity, cookie, token};
use crate::error::AppError;
use crate::routes::AppState;

/// Identity attached to the request by [`auth_middleware`]
#[derive(Clone, Debug)]
pub struct AuthUser(pub Identity);

/// Resolve the session token carried by a request into an identity.
///
/// No token rejects without verifying; any verification failure rejects with
/// its reason logged.
pub fn authenticate(token: Option<&str>, secret: &str) -> Result<Identity, AppError> {
    let Some(token) = token else {
        tracing::warn!("Missing token cookie");
        return Err(AppError::MissingToken);
    };

    token::verify(token, secret).map_err(|e| {
        tracing::warn!(reason = e.reason(), "Rejected session token");
        AppError::InvalidToken(e)
    })
}

/// Authentication middleware that validates the JWT from the `token` cookie
///
/// Rejects with 401 before the wrapped handler runs when the cookie is
/// missing or the token fails verification. Otherwise inserts [`AuthUser`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = authenticate(cookie::read(&jar), &state.auth.secret)?;

    tracing::debug!(
        email = identity.email.as_deref().unwrap_or("<none>"),
        "Session authenticated"
    );

    req.extensions_mut().insert(AuthUser(identity));

    Ok(next.run(req).await)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only the gate inserts this; a route mounted without it never sees an identity
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::MissingToken)
    }
}
