// ABOUTME: Unified error type, error codes and HTTP error body for the copilot
// ABOUTME: Maps every failure to a stable code, an HTTP status and a caller-safe message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Unified Error Handling System
//!
//! Every fallible operation in the proxy and the client returns [`AppError`].
//! The `message` of an error is always safe to show to the caller: upstream
//! bodies and transport details are logged where the error is built and never
//! copied into it.
//!
//! With the `http-response` feature, `AppError` renders as the wire error body
//! `{ "error": "<message>" }` with the status derived from its [`ErrorCode`].

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::messages;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Rate limiting and billing (2000-2999)
    /// Upstream provider refused the request because of its rate limit
    RateLimitExceeded = 2000,
    /// Upstream provider refused the request because the account has no credits
    InsufficientCredits = 2001,

    // Validation (3000-3999)
    /// Request payload failed validation
    InvalidInput = 3000,
    /// Request payload could not be decoded
    InvalidFormat = 3002,

    // External services (5000-5999)
    /// Upstream answered with an unexpected non-OK status
    ExternalServiceError = 5000,
    /// Upstream could not be reached
    ExternalServiceUnavailable = 5001,
    /// A response body stream failed mid-read
    StreamInterrupted = 5004,
    /// An exchange exceeded its maximum duration
    Timeout = 5005,

    // Configuration (6000-6999)
    /// A required configuration value is absent
    ConfigMissing = 6001,
    /// A configuration value is present but unusable
    ConfigInvalid = 6002,

    // Internal errors (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// JSON encoding or decoding failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidFormat => 400,
            Self::InsufficientCredits => 402,
            Self::RateLimitExceeded => 429,
            Self::StreamInterrupted => 502,
            Self::Timeout => 504,
            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ConfigMissing
            | Self::ConfigInvalid
            | Self::InternalError
            | Self::SerializationError => 500,
        }
    }

    /// Short English description used in logs
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::RateLimitExceeded => "Upstream rate limit exceeded",
            Self::InsufficientCredits => "Upstream account has insufficient credits",
            Self::InvalidInput => "The provided input is invalid",
            Self::InvalidFormat => "The data format is invalid",
            Self::ExternalServiceError => "The upstream provider returned an error",
            Self::ExternalServiceUnavailable => "The upstream provider is unreachable",
            Self::StreamInterrupted => "The response stream was interrupted",
            Self::Timeout => "The exchange exceeded its maximum duration",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Caller-safe error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Payload could not be decoded
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Required configuration value is missing
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissing, message)
    }

    /// Configuration value is present but invalid
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Upstream rate limit, carrying the user-facing message
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimitExceeded, message)
    }

    /// Upstream billing refusal, carrying the user-facing message
    pub fn insufficient_credits(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientCredits, message)
    }

    /// Upstream returned an unexpected status
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceError, message)
    }

    /// Upstream could not be reached
    pub fn upstream_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ExternalServiceUnavailable, message)
    }

    /// Body stream failed mid-read
    pub fn stream_interrupted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StreamInterrupted, message)
    }

    /// Exchange exceeded its maximum duration
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, message)
    }

    /// JSON encoding or decoding failure
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Wire error body: `{ "error": "<message>" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable, caller-safe message
    pub error: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        let message = error.message.trim();
        Self {
            error: if message.is_empty() {
                messages::UNKNOWN_ERROR.to_owned()
            } else {
                error.message.clone()
            },
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {error}")).with_source(error)
    }
}

#[cfg(feature = "transport-errors")]
impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(format!("Request timed out: {error}")).with_source(error)
        } else if error.is_body() || error.is_decode() {
            Self::stream_interrupted(format!("Body read failed: {error}")).with_source(error)
        } else {
            Self::upstream_unavailable(format!("Request failed: {error}")).with_source(error)
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;
    use tracing::error;

    use super::{AppError, ErrorResponse};

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status =
                StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if status.is_server_error() {
                error!(
                    code = ?self.code,
                    status = status.as_u16(),
                    source = ?self.source,
                    "Request failed: {}",
                    self.message
                );
            }

            (status, Json(ErrorResponse::from(&self))).into_response()
        }
    }
}
