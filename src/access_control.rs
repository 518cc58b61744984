//! Ownership check for per-identity record reads
//!
//! The identity attached by the auth gate must match the email the caller asks
//! for. The comparison is exact and includes absence: a request without an
//! `email` filter only passes for an identity that carries no email either,
//! and is then served unfiltered.

use tracing::warn;

use crate::auth::Identity;
use crate::error::AppError;

/// How a protected read may be filtered once ownership is established
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerScope {
    /// Only records belonging to this email
    Owner(String),
    /// No filter
    Unscoped,
}

pub fn check_ownership(identity: &Identity, requested: Option<&str>) -> Result<OwnerScope, AppError> {
    if requested != identity.email.as_deref() {
        warn!(
            requested = requested.unwrap_or("<none>"),
            identity = identity.email.as_deref().unwrap_or("<none>"),
            "Ownership check failed"
        );
        return Err(AppError::Forbidden);
    }

    match requested {
        Some(email) => Ok(OwnerScope::Owner(email.to_owned())),
        None => {
            warn!("Serving unfiltered read to an identity without email");
            Ok(OwnerScope::Unscoped)
        }
    }
}
