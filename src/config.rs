use config::{Config as ConfigBuilder, ConfigError, Environment as EnvSource, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Deployment environment, drives cookie transport attributes and log format.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Maps a `NODE_ENV` style value; anything other than `production` is development.
    pub fn from_node_env(value: &str) -> Self {
        if value == "production" {
            Self::Production
        } else {
            Self::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_seconds: u64,
    /// Echo the issued token in the `/jwt` response body instead of `{success: true}`
    pub echo_token: bool,
    /// Refuse to issue tokens for identities without an email claim
    pub require_email: bool,
    /// Omit `Max-Age` so the cookie lives for the browser session only
    pub session_cookie: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "https://car-doctor-project-d4515.web.app".to_string(),
        "https://car-doctor-project-d4515.firebaseapp.com".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Legacy variables (PORT, API_TOKEN_SECRET, DATABASE_URL, NODE_ENV)
    /// 2. Environment variables (CAR_DOCTOR__JWT__SECRET, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("environment", "development")?
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.url", "sqlite:car-doctor.db")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_seconds", 3600)?
            .set_default("jwt.echo_token", true)?
            .set_default("jwt.require_email", true)?
            .set_default("jwt.session_cookie", false)?;

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            EnvSource::with_prefix("CAR_DOCTOR")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins"),
        );

        if let Ok(port) = env::var("PORT") {
            builder = builder.set_override("server.port", port)?;
        }
        if let Ok(secret) = env::var("API_TOKEN_SECRET") {
            builder = builder.set_override("jwt.secret", secret)?;
        }
        if let Ok(database_url) = env::var("DATABASE_URL") {
            builder = builder.set_override("database.url", database_url)?;
        }
        if let Ok(node_env) = env::var("NODE_ENV") {
            builder = builder
                .set_override("environment", Environment::from_node_env(&node_env).as_str())?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < 32 {
            return Err("JWT secret must be at least 32 characters long".to_string());
        }
        if self.jwt.expiration_seconds == 0 {
            return Err("JWT expiration must be greater than 0".to_string());
        }
        if self.database.max_connections < 1 {
            return Err("Database max_connections must be at least 1".to_string());
        }
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.cors.allowed_origins.iter().any(|o| o == "*") {
            return Err("CORS origin '*' cannot be combined with credentials".to_string());
        }
        Ok(())
    }
}
