// ABOUTME: Environment configuration management for the proxy and the chat client
// ABOUTME: Parses and validates environment variables into immutable typed configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! Environment-based configuration management

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, Level};
use url::Url;

use crate::constants::{defaults, env_config, env_vars, messages, routes};
use crate::errors::{AppError, AppResult};

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    #[default]
    Info,
    /// Debug output
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to `tracing::Level`
    #[must_use]
    pub const fn to_tracing_level(self) -> Level {
        match self {
            Self::Error => Level::ERROR,
            Self::Warn => Level::WARN,
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Upstream chat-completions provider settings
#[derive(Clone)]
pub struct UpstreamConfig {
    /// Bearer credential for the gateway
    pub api_key: String,
    /// Full chat-completions URL
    pub url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Whole-request timeout, body streaming included
    pub request_timeout: Duration,
}

impl UpstreamConfig {
    /// Settings for the default gateway with the given credential
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            url: defaults::UPSTREAM_URL.to_owned(),
            model: defaults::UPSTREAM_MODEL.to_owned(),
            connect_timeout: Duration::from_secs(defaults::UPSTREAM_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(defaults::UPSTREAM_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the chat-completions URL
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Override the model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn validate(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::config_missing(messages::UPSTREAM_KEY_MISSING));
        }
        validate_http_url(env_vars::UPSTREAM_URL, &self.url)?;
        if self.model.trim().is_empty() {
            return Err(AppError::config_invalid(format!(
                "{} must not be empty",
                env_vars::UPSTREAM_MODEL
            )));
        }
        if self.connect_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(AppError::config_invalid(
                "Upstream timeouts must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("api_key", &"[REDACTED]")
            .field("url", &self.url)
            .field("model", &self.model)
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Proxy server configuration
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Log level
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
    /// Upstream provider settings
    pub upstream: UpstreamConfig,
}

impl ProxyConfig {
    /// Build a configuration around explicit upstream settings
    #[must_use]
    pub fn new(upstream: UpstreamConfig) -> Self {
        Self {
            http_port: defaults::HTTP_PORT,
            log_level: LogLevel::default(),
            environment: Environment::default(),
            upstream,
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigMissing` when `LOVABLE_API_KEY` is absent or empty and
    /// `ConfigInvalid` when any other value cannot be parsed or validated.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading proxy configuration from environment variables");

        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let api_key = env::var(env_vars::UPSTREAM_API_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AppError::config_missing(messages::UPSTREAM_KEY_MISSING))?;

        let upstream = UpstreamConfig {
            api_key,
            url: env_config::upstream_url(),
            model: env_config::upstream_model(),
            connect_timeout: Duration::from_secs(parse_env_or(
                env_vars::UPSTREAM_CONNECT_TIMEOUT,
                defaults::UPSTREAM_CONNECT_TIMEOUT_SECS,
            )?),
            request_timeout: Duration::from_secs(parse_env_or(
                env_vars::UPSTREAM_REQUEST_TIMEOUT,
                defaults::UPSTREAM_REQUEST_TIMEOUT_SECS,
            )?),
        };

        let config = Self {
            http_port: parse_env_or(env_vars::HTTP_PORT, defaults::HTTP_PORT)?,
            log_level: LogLevel::from_str_or_default(&env_config::log_level()),
            environment: Environment::from_str_or_default(&env_config::environment()),
            upstream,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> AppResult<()> {
        self.upstream.validate()
    }

    /// Human-readable summary without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Alivee Copilot Proxy Configuration:\n\
             - HTTP Port: {}\n\
             - Environment: {}\n\
             - Log Level: {}\n\
             - Upstream URL: {}\n\
             - Upstream Model: {}\n\
             - Upstream Key: configured\n\
             - Connect Timeout: {}s\n\
             - Request Timeout: {}s",
            self.http_port,
            self.environment,
            self.log_level,
            self.upstream.url,
            self.upstream.model,
            self.upstream.connect_timeout.as_secs(),
            self.upstream.request_timeout.as_secs(),
        )
    }
}

/// Chat client configuration
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the proxy deployment
    pub base_url: String,
    /// Bearer credential presented to the proxy
    pub publishable_key: Option<String>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Maximum duration of one exchange, request and stream together
    pub max_stream_duration: Duration,
}

impl ClientConfig {
    /// Client configuration for a proxy at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            publishable_key: None,
            connect_timeout: Duration::from_secs(defaults::CLIENT_CONNECT_TIMEOUT_SECS),
            max_stream_duration: Duration::from_secs(defaults::CLIENT_MAX_STREAM_SECS),
        }
    }

    /// Set the platform bearer credential
    #[must_use]
    pub fn with_publishable_key(mut self, key: impl Into<String>) -> Self {
        self.publishable_key = Some(key.into());
        self
    }

    /// Set the maximum exchange duration
    #[must_use]
    pub const fn with_max_stream_duration(mut self, duration: Duration) -> Self {
        self.max_stream_duration = duration;
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a value cannot be parsed or validated.
    pub fn from_env() -> AppResult<Self> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file loaded: {e}");
        }

        let config = Self {
            base_url: env_config::client_base_url(),
            publishable_key: env::var(env_vars::CLIENT_PUBLISHABLE_KEY)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            connect_timeout: Duration::from_secs(parse_env_or(
                env_vars::CLIENT_CONNECT_TIMEOUT,
                defaults::CLIENT_CONNECT_TIMEOUT_SECS,
            )?),
            max_stream_duration: Duration::from_secs(parse_env_or(
                env_vars::CLIENT_MAX_STREAM,
                defaults::CLIENT_MAX_STREAM_SECS,
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a configuration error describing the first invalid value.
    pub fn validate(&self) -> AppResult<()> {
        validate_http_url(env_vars::CLIENT_BASE_URL, &self.base_url)?;
        if self.max_stream_duration.is_zero() {
            return Err(AppError::config_invalid(format!(
                "{} must be greater than zero",
                env_vars::CLIENT_MAX_STREAM
            )));
        }
        Ok(())
    }

    /// Full URL of the copilot endpoint
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), routes::COPILOT)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field(
                "publishable_key",
                &self.publishable_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("connect_timeout", &self.connect_timeout)
            .field("max_stream_duration", &self.max_stream_duration)
            .finish()
    }
}

/// Parse an environment variable, falling back to `default` when unset
fn parse_env_or<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}")))
}

fn validate_http_url(key: &str, raw: &str) -> AppResult<()> {
    let url = Url::parse(raw)
        .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{raw}': {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AppError::config_invalid(format!(
            "{key} must use http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("error"), LogLevel::Error);
        assert_eq!(LogLevel::from_str_or_default("WARN"), LogLevel::Warn);
        assert_eq!(LogLevel::from_str_or_default("Debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("invalid"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(Environment::from_str_or_default("prod"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("TEST"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("unknown"), Environment::Development);
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        let err = parse_value::<u16>("HTTP_PORT", "eighty").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalid);
        assert!(err.message.contains("HTTP_PORT"));
        assert_eq!(parse_value::<u16>("HTTP_PORT", " 9090 ").unwrap(), 9090);
    }

    #[test]
    fn test_upstream_validation() {
        assert!(UpstreamConfig::new("key").validate().is_ok());

        let missing = UpstreamConfig::new("  ").validate().unwrap_err();
        assert_eq!(missing.code, ErrorCode::ConfigMissing);
        assert_eq!(missing.message, messages::UPSTREAM_KEY_MISSING);

        let bad_scheme = UpstreamConfig::new("key")
            .with_url("ftp://gateway.example")
            .validate()
            .unwrap_err();
        assert_eq!(bad_scheme.code, ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_debug_output_redacts_credentials() {
        let proxy = ProxyConfig::new(UpstreamConfig::new("super-secret-key"));
        assert!(!format!("{proxy:?}").contains("super-secret-key"));
        assert!(!proxy.summary().contains("super-secret-key"));

        let client = ClientConfig::new("http://localhost:8080").with_publishable_key("pk-secret");
        assert!(!format!("{client:?}").contains("pk-secret"));
    }

    #[test]
    fn test_client_endpoint_joins_route() {
        let config = ClientConfig::new("https://project.example.co/");
        assert_eq!(
            config.endpoint(),
            "https://project.example.co/functions/v1/ai-copilot"
        );
    }
}
