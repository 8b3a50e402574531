// ABOUTME: Upstream chat-completions provider abstraction and its reqwest implementation
// ABOUTME: Opens a streaming completion against the AI gateway and hands back the raw SSE body
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Upstream Gateway
//!
//! [`UpstreamProvider`] is the seam between the proxy and the model vendor.
//! The proxy never decodes the upstream stream; it only needs the status and,
//! on success, the untouched body bytes.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, error, instrument};

use super::{ByteStream, CompletionRequest};
use crate::config::UpstreamConfig;
use crate::constants::service_names;
use crate::errors::{AppError, AppResult};

/// Outcome of opening a streaming completion
pub enum UpstreamReply {
    /// Upstream answered 2xx; the body is the raw SSE stream
    Streaming(ByteStream),
    /// Upstream answered non-2xx
    Rejected {
        /// HTTP status returned by upstream
        status: u16,
        /// Raw response body, for logs only
        body: String,
    },
}

/// Provider able to open a streaming chat completion
#[async_trait]
pub trait UpstreamProvider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &'static str;

    /// Send the completion request and return the response without decoding it
    ///
    /// # Errors
    ///
    /// Returns an error only when upstream could not be reached at all.
    async fn stream_completion(&self, request: &CompletionRequest) -> AppResult<UpstreamReply>;
}

/// `OpenAI`-compatible gateway reached over HTTPS with a bearer credential
pub struct GatewayProvider {
    client: Client,
    url: String,
    api_key: String,
}

impl GatewayProvider {
    /// Create a provider from upstream settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &UpstreamConfig) -> AppResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl UpstreamProvider for GatewayProvider {
    fn name(&self) -> &'static str {
        service_names::UPSTREAM_GATEWAY
    }

    #[instrument(skip(self, request), fields(model = %request.model, messages = request.messages.len()))]
    async fn stream_completion(&self, request: &CompletionRequest) -> AppResult<UpstreamReply> {
        debug!("Sending streaming chat completion request to {}", self.name());

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.name(), "Failed to send streaming request: {e}");
                AppError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Ok(UpstreamReply::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        debug!(status = status.as_u16(), "Upstream stream opened");

        let byte_stream = response.bytes_stream().map(|chunk| {
            chunk.map_err(|e| {
                error!("Error reading upstream stream: {e}");
                AppError::stream_interrupted(format!("Upstream stream failed: {e}")).with_source(e)
            })
        });

        Ok(UpstreamReply::Streaming(Box::pin(byte_stream)))
    }
}
