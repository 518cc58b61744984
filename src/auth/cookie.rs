use std::time::Duration;

use axum_extra::extract::{
    CookieJar,
    cookie::{Cookie, SameSite},
};

use crate::config::Environment;

pub const COOKIE_NAME: &str = "token";

/// Transport attributes for the session cookie
#[derive(Debug, Clone, PartialEq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    /// `None` keeps the cookie for the browser session only
    pub max_age: Option<Duration>,
}

impl CookieOptions {
    /// Development keeps strict same-site over plain http; production allows
    /// the cross-site frontend but only over https.
    pub fn for_environment(environment: Environment, max_age: Option<Duration>) -> Self {
        match environment {
            Environment::Development => Self {
                http_only: true,
                secure: false,
                same_site: SameSite::Strict,
                max_age,
            },
            Environment::Production => Self {
                http_only: true,
                secure: true,
                same_site: SameSite::None,
                max_age,
            },
        }
    }

    fn build<'a>(&self, value: String, max_age: Option<Duration>) -> Cookie<'a> {
        let mut cookie = Cookie::build((COOKIE_NAME, value))
            .path("/")
            .http_only(self.http_only)
            .secure(self.secure)
            .same_site(self.same_site);

        if let Some(max_age) = max_age {
            let seconds = i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX);
            cookie = cookie.max_age(time::Duration::seconds(seconds));
        }

        cookie.build()
    }
}

/// Store the session token in the outgoing cookie jar
pub fn attach(jar: CookieJar, token: String, options: &CookieOptions) -> CookieJar {
    jar.add(options.build(token, options.max_age))
}

/// Expire the session cookie immediately, keeping the same attributes so the
/// browser matches and drops it
pub fn clear(jar: CookieJar, options: &CookieOptions) -> CookieJar {
    jar.add(options.build(String::new(), Some(Duration::ZERO)))
}

/// Raw token from the request cookies; an empty value counts as absent
pub fn read(jar: &CookieJar) -> Option<&str> {
    jar.get(COOKIE_NAME)
        .map(|cookie| cookie.value())
        .filter(|value| !value.is_empty())
}
