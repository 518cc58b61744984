//! Authentication module
//!
//! Provides JWT-based sessions carried in an HTTP-only cookie

pub mod cookie;
pub mod token;

use std::time::Duration;

pub use cookie::{COOKIE_NAME, CookieOptions};
pub use token::{Identity, TokenError, VerificationError, issue, verify};

use crate::config::Config;

/// Session settings resolved once at startup and shared read-only across requests
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub ttl: Duration,
    pub cookie: CookieOptions,
    pub echo_token: bool,
    pub require_email: bool,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        let ttl = Duration::from_secs(config.jwt.expiration_seconds);
        let max_age = (!config.jwt.session_cookie).then_some(ttl);

        Self {
            secret: config.jwt.secret.to_owned(),
            ttl,
            cookie: CookieOptions::for_environment(config.environment, max_age),
            echo_token: config.jwt.echo_token,
            require_email: config.jwt.require_email,
        }
    }
}
