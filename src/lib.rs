pub mod access_control;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod migrate;
pub mod observability;
pub mod query;
pub mod routes;
pub mod server;

pub use config::Config;
pub use error::AppError;
pub use routes::{AppState, router};
