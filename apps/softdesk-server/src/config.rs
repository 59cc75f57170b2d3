//! Server configuration.

use std::env;
use std::str::FromStr;

use anyhow::Context;
use auth::{DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_REFRESH_EXPIRATION_HOURS, JwtConfig};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unknown log format `{other}`"),
        }
    }
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Secret used to sign tokens.
    pub jwt_secret: String,
    /// Access token lifetime in hours.
    pub jwt_expiration_hours: u64,
    /// Refresh token lifetime in hours.
    pub jwt_refresh_expiration_hours: u64,
    /// Log level.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

/// Reads an optional variable, parsing it when present.
fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Creates a configuration with default settings and the given secret.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            jwt_secret: jwt_secret.into(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            jwt_refresh_expiration_hours: DEFAULT_REFRESH_EXPIRATION_HOURS,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            cors_origins: Vec::new(),
        }
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let jwt_secret = env::var("SOFTDESK_JWT_SECRET")
            .context("SOFTDESK_JWT_SECRET is required")?;
        if jwt_secret.trim().is_empty() {
            anyhow::bail!("SOFTDESK_JWT_SECRET must not be empty");
        }

        let cors_origins = env::var("SOFTDESK_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host: env::var("SOFTDESK_SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("SOFTDESK_SERVER_PORT", 8000)?,
            jwt_secret,
            jwt_expiration_hours: parse_var(
                "SOFTDESK_JWT_EXPIRATION_HOURS",
                DEFAULT_JWT_EXPIRATION_HOURS,
            )?,
            jwt_refresh_expiration_hours: parse_var(
                "SOFTDESK_JWT_REFRESH_EXPIRATION_HOURS",
                DEFAULT_REFRESH_EXPIRATION_HOURS,
            )?,
            log_level: env::var("SOFTDESK_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: parse_var("SOFTDESK_LOG_FORMAT", LogFormat::Pretty)?,
            cors_origins,
        })
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the token settings derived from this configuration.
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig::new(&self.jwt_secret)
            .with_expiration_hours(self.jwt_expiration_hours)
            .with_refresh_expiration_hours(self.jwt_refresh_expiration_hours)
    }
}
