//! Session token issuance and verification (HS256)

use std::collections::HashSet;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Default token lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Claim names owned by the codec; never taken from the presented identity
const RESERVED_CLAIMS: [&str; 3] = ["email", "exp", "iat"];

/// Claims presented by the client at login.
///
/// Only `email` is interpreted; everything else is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub claims: Map<String, Value>,
}

impl Identity {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            claims: Map::new(),
        }
    }

    fn sanitized(&self) -> Self {
        let mut claims = self.claims.clone();
        for key in RESERVED_CLAIMS {
            claims.remove(key);
        }

        Self {
            email: self.email.clone(),
            claims,
        }
    }
}

/// JWT payload: the identity flattened next to the registered time claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    identity: Identity,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("system clock is before the unix epoch")]
    Clock,

    #[error("failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("token expired")]
    Expired,

    #[error("token signature mismatch")]
    BadSignature,

    #[error("token malformed")]
    Malformed,
}

impl VerificationError {
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::BadSignature => "bad-signature",
            Self::Malformed => "malformed",
        }
    }
}

fn unix_seconds(at: SystemTime) -> Option<u64> {
    at.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

/// Sign `identity` into a token valid for `ttl` from now
pub fn issue(identity: &Identity, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    issue_at(identity, secret, ttl, SystemTime::now())
}

pub fn issue_at(
    identity: &Identity,
    secret: &str,
    ttl: Duration,
    now: SystemTime,
) -> Result<String, TokenError> {
    if secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }

    let iat = unix_seconds(now).ok_or(TokenError::Clock)?;
    let claims = Claims {
        identity: identity.sanitized(),
        iat,
        exp: iat.saturating_add(ttl.as_secs()),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Check signature and expiry, returning the embedded identity
pub fn verify(token: &str, secret: &str) -> Result<Identity, VerificationError> {
    verify_at(token, secret, SystemTime::now())
}

pub fn verify_at(token: &str, secret: &str, now: SystemTime) -> Result<Identity, VerificationError> {
    // Expiry is compared below with `exp <= now`; the library check allows exp == now.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::InvalidSignature => VerificationError::BadSignature,
        ErrorKind::ExpiredSignature => VerificationError::Expired,
        _ => VerificationError::Malformed,
    })?;

    let now = unix_seconds(now).ok_or(VerificationError::Expired)?;
    if data.claims.exp <= now {
        return Err(VerificationError::Expired);
    }

    Ok(data.claims.identity)
}
