// ABOUTME: Streaming proxy that prepends the copilot persona and relays the upstream SSE body
// ABOUTME: Translates upstream refusals into Portuguese caller-safe errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Copilot Proxy
//!
//! One request in, one upstream request out:
//!
//! 1. Render the system prompt from the caller context.
//! 2. Send `[system, ...messages]` upstream with `stream: true`.
//! 3. Relay the upstream body byte for byte, or map the refusal:
//!    429 and 402 keep their status with a specific message; every other
//!    failure becomes a generic 500. Upstream bodies are only logged.

use std::sync::Arc;

use async_stream::stream;
use futures_util::StreamExt;
use tracing::{debug, error, info, warn};

use crate::config::ProxyConfig;
use crate::constants::messages;
use crate::errors::{AppError, AppResult};
use crate::llm::prompts::build_system_prompt;
use crate::llm::{
    ByteStream, ChatMessage, CompletionRequest, CopilotRequest, MessageRole, UpstreamProvider,
    UpstreamReply,
};

/// Stateless request forwarder; safe to share across concurrent requests
#[derive(Clone)]
pub struct CopilotProxy {
    config: Arc<ProxyConfig>,
    provider: Arc<dyn UpstreamProvider>,
}

impl CopilotProxy {
    /// Create a proxy over the given upstream provider
    #[must_use]
    pub fn new(config: Arc<ProxyConfig>, provider: Arc<dyn UpstreamProvider>) -> Self {
        Self { config, provider }
    }

    /// Build the upstream request for a caller request
    ///
    /// Caller-supplied system messages are dropped; the persona is the only
    /// system message upstream ever sees.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the context cannot be rendered.
    pub fn build_completion(&self, request: CopilotRequest) -> AppResult<CompletionRequest> {
        let system_prompt = build_system_prompt(request.context.as_ref())?;

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(ChatMessage::system(system_prompt));

        let mut dropped = 0_usize;
        messages.extend(request.messages.into_iter().filter(|message| {
            let keep = message.role != MessageRole::System;
            if !keep {
                dropped += 1;
            }
            keep
        }));
        if dropped > 0 {
            warn!(dropped, "Ignoring caller-supplied system messages");
        }

        Ok(CompletionRequest {
            model: self.config.upstream.model.clone(),
            messages,
            stream: true,
        })
    }

    /// Forward a request and return the upstream SSE body unchanged
    ///
    /// # Errors
    ///
    /// - `RateLimitExceeded` (429) and `InsufficientCredits` (402) mirror the
    ///   upstream refusal.
    /// - `ExternalServiceError` (500) for any other non-2xx status.
    /// - `ExternalServiceUnavailable` (500) when upstream cannot be reached.
    pub async fn forward(&self, request: CopilotRequest) -> AppResult<ByteStream> {
        let has_context = request.context.is_some();
        let completion = self.build_completion(request)?;

        info!(
            provider = self.provider.name(),
            model = %completion.model,
            messages = completion.messages.len(),
            has_context,
            "Forwarding copilot request"
        );

        let reply = self
            .provider
            .stream_completion(&completion)
            .await
            .map_err(|e| {
                error!(provider = self.provider.name(), "Upstream unreachable: {e}");
                AppError::upstream_unavailable(messages::UPSTREAM_FAILURE).with_source(e)
            })?;

        match reply {
            UpstreamReply::Streaming(body) => Ok(relay(body)),
            UpstreamReply::Rejected { status, body } => Err(map_upstream_rejection(status, &body)),
        }
    }
}

/// Map an upstream refusal to the caller-facing error
#[must_use]
pub fn map_upstream_rejection(status: u16, body: &str) -> AppError {
    match status {
        429 => {
            warn!(status, "Upstream rate limit reached");
            AppError::rate_limited(messages::RATE_LIMIT_EXCEEDED)
        }
        402 => {
            warn!(status, "Upstream account has no credits");
            AppError::insufficient_credits(messages::INSUFFICIENT_CREDITS)
        }
        _ => {
            error!(status, body = %body, "Upstream returned an error");
            AppError::upstream(messages::UPSTREAM_FAILURE)
        }
    }
}

fn relay(mut upstream: ByteStream) -> ByteStream {
    Box::pin(stream! {
        let mut forwarded = 0_usize;
        while let Some(chunk) = upstream.next().await {
            if let Ok(bytes) = &chunk {
                forwarded += bytes.len();
            } else {
                warn!(forwarded, "Upstream stream failed mid-relay");
            }
            yield chunk;
        }
        debug!(forwarded, "Upstream stream finished");
    })
}
