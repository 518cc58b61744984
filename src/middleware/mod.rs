pub mod auth;
pub mod logger;

pub use auth::{AuthUser, auth_middleware};
pub use logger::log_request;
