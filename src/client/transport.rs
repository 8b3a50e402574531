// ABOUTME: Client transport abstraction for posting exchanges to the copilot proxy
// ABOUTME: HTTP implementation returns the SSE body or the proxy's structured error message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::constants::messages;
use crate::errors::{AppError, AppResult, ErrorResponse};
use crate::llm::{ByteStream, CopilotRequest};

/// Outcome of posting one exchange
pub enum TransportResponse {
    /// 2xx: the raw SSE body
    Streaming(ByteStream),
    /// Non-2xx: the message to show the user
    Rejected {
        /// HTTP status returned by the proxy
        status: u16,
        /// `error` field of the body, or a generic fallback
        message: String,
    },
}

/// Sends copilot requests and hands back the streaming body
#[async_trait]
pub trait CopilotTransport: Send + Sync {
    /// Post a request
    ///
    /// # Errors
    ///
    /// Returns an error when the proxy cannot be reached.
    async fn send(&self, request: &CopilotRequest) -> AppResult<TransportResponse>;
}

/// reqwest-backed transport talking to a deployed proxy
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    publishable_key: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the configured proxy
    ///
    /// No whole-request timeout is set here; the session bounds each exchange.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            publishable_key: config.publishable_key.clone(),
        })
    }

    /// Endpoint this transport posts to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CopilotTransport for HttpTransport {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint, messages = request.messages.len()))]
    async fn send(&self, request: &CopilotRequest) -> AppResult<TransportResponse> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.publishable_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map_err(|e| {
                    warn!(status = status.as_u16(), "Error body without an error field: {e}");
                })
                .ok()
                .map(|parsed| parsed.error)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| messages::CLIENT_REQUEST_FAILED.to_owned());
            return Ok(TransportResponse::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!(status = status.as_u16(), "Copilot stream opened");
        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(AppError::from));
        Ok(TransportResponse::Streaming(Box::pin(body)))
    }
}
