// ABOUTME: Wire types for the copilot protocol and the upstream chat-completions API
// ABOUTME: Shared message, request and stream types used by both proxy and client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # LLM Module
//!
//! Types that cross a network boundary:
//!
//! - [`CopilotRequest`]: client → proxy body (`messages` + optional `context`)
//! - [`CompletionRequest`]: proxy → upstream body (`model`, `messages`, `stream`)
//! - [`StreamChunk`]: one decoded content delta from an SSE stream
//!
//! The SSE decoding lives in [`sse_parser`], the persona in [`prompts`] and the
//! upstream HTTP provider in [`gateway`].

use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

/// Upstream provider abstraction and the reqwest-backed gateway
pub mod gateway;
/// Persona template and system prompt builder
pub mod prompts;
/// Streaming SSE parser with UTF-8 safe line buffering
pub mod sse_parser;

pub use gateway::{GatewayProvider, UpstreamProvider, UpstreamReply};
pub use sse_parser::{create_delta_stream, SseEvent, SseLineBuffer};

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message, only ever synthesized by the proxy
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single message as it travels on the wire: `{ role, content }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request Types
// ============================================================================

/// Body the client posts to the proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopilotRequest {
    /// Transcript in insertion order, without any system message
    pub messages: Vec<ChatMessage>,
    /// Opaque description of the document currently under review
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl CopilotRequest {
    /// Create a request from a transcript and optional context
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>, context: Option<Value>) -> Self {
        Self { messages, context }
    }
}

/// Body the proxy sends to the upstream chat-completions endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Upstream model identifier
    pub model: String,
    /// System persona followed by the caller transcript
    pub messages: Vec<ChatMessage>,
    /// Always `true`: the proxy only speaks SSE
    pub stream: bool,
}

// ============================================================================
// Streaming Types
// ============================================================================

/// A decoded content delta from an SSE stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamChunk {
    /// Content delta for this chunk
    pub delta: String,
    /// Whether this is the final chunk
    pub is_final: bool,
    /// Finish reason if the provider reported one
    pub finish_reason: Option<String>,
}

/// Raw response body as a stream of byte chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, AppError>> + Send>>;

/// Decoded content deltas
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, AppError>> + Send>>;
