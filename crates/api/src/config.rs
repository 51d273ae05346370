//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ARYCAR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `ARYCAR_HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 3001)
//! - `CORS_ORIGIN` - Allowed origin (default: `*`)
//! - `PLATE_API_URL` - Plate lookup endpoint (default: <https://placas.app.br/api/v1/placas>)
//! - `PLATE_API_TOKEN` - Plate lookup bearer token; lookups are disabled without it
//! - `FIPE_API_URL` - FIPE catalog base URL (default: <https://parallelum.com.br/fipe/api/v1>)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT`, `SENTRY_SAMPLE_RATE`, `SENTRY_TRACES_SAMPLE_RATE`

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

pub const DEFAULT_PLATE_API_URL: &str = "https://placas.app.br/api/v1/placas";
pub const DEFAULT_FIPE_API_URL: &str = "https://parallelum.com.br/fipe/api/v1";

/// Values that show up when someone copies `.env.example` without editing it.
const PLACEHOLDER_PATTERNS: &[&str] = &["your-", "changeme", "placeholder", "xxx", "seu_token"];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Value for `Access-Control-Allow-Origin`; `*` allows any origin
    pub cors_origin: String,
    /// Plate lookup API
    pub plate_api: PlateApiConfig,
    /// FIPE catalog base URL, without trailing slash
    pub fipe_api_url: String,
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Plate lookup API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct PlateApiConfig {
    /// Endpoint; the plate is appended as a path segment
    pub url: String,
    /// Bearer token. `None` disables plate lookups.
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for PlateApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlateApiConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl PlateApiConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = get_url_or_default("PLATE_API_URL", DEFAULT_PLATE_API_URL)?;
        let token = get_optional_env("PLATE_API_TOKEN").filter(|t| !t.trim().is_empty());
        if let Some(token) = &token
            && looks_like_placeholder(token)
        {
            tracing::warn!("PLATE_API_TOKEN looks like a placeholder; plate lookups will fail");
        }
        Ok(Self {
            url,
            token: token.map(SecretString::from),
        })
    }

    /// Whether plate lookups can be made.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.token.is_some()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or a variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("ARYCAR_DATABASE_URL")?;
        let host = get_env_or_default("ARYCAR_HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ARYCAR_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("PORT", "3001")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("PORT".to_string(), e.to_string()))?;
        let cors_origin = get_env_or_default("CORS_ORIGIN", "*");
        let plate_api = PlateApiConfig::from_env()?;
        let fipe_api_url = get_url_or_default("FIPE_API_URL", DEFAULT_FIPE_API_URL)?;
        let log_format = parse_log_format(get_optional_env("LOG_FORMAT").as_deref());
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.1);

        Ok(Self {
            database_url,
            host,
            port,
            cors_origin,
            plate_api,
            fipe_api_url,
            log_format,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a base URL, validated and without a trailing slash.
fn get_url_or_default(key: &str, default: &str) -> Result<String, ConfigError> {
    normalize_base_url(key, &get_env_or_default(key, default))
}

fn normalize_base_url(key: &str, raw: &str) -> Result<String, ConfigError> {
    let parsed = url::Url::parse(raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme {}", parsed.scheme()),
        ));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn parse_log_format(value: Option<&str>) -> LogFormat {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

fn looks_like_placeholder(secret: &str) -> bool {
    let lower = secret.to_lowercase();
    PLACEHOLDER_PATTERNS.iter().any(|p| lower.contains(p))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("X", "https://parallelum.com.br/fipe/api/v1/").unwrap(),
            "https://parallelum.com.br/fipe/api/v1"
        );
        assert!(normalize_base_url("X", "not a url").is_err());
        assert!(matches!(
            normalize_base_url("X", "ftp://example.com"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format(Some("JSON")), LogFormat::Json);
        assert_eq!(parse_log_format(Some("pretty")), LogFormat::Text);
        assert_eq!(parse_log_format(None), LogFormat::Text);
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(looks_like_placeholder("your-token-here"));
        assert!(looks_like_placeholder("SEU_TOKEN"));
        assert!(!looks_like_placeholder("a8f3K2m9Qx71"));
    }

    #[test]
    fn test_plate_api_debug_redacts_token() {
        let config = PlateApiConfig {
            url: DEFAULT_PLATE_API_URL.to_string(),
            token: Some(SecretString::from("super-secret-token")),
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("[REDACTED]"));
        assert!(config.is_configured());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/arycar"),
            host: "0.0.0.0".parse().unwrap(),
            port: 3001,
            cors_origin: "*".to_string(),
            plate_api: PlateApiConfig {
                url: DEFAULT_PLATE_API_URL.to_string(),
                token: None,
            },
            fipe_api_url: DEFAULT_FIPE_API_URL.to_string(),
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3001");
    }
}
