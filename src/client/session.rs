// ABOUTME: In-memory chat session: transcript, exchange state machine and snapshots
// ABOUTME: Enforces one in-flight exchange and keeps the greeting out of the upstream history
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Chat Session
//!
//! ```text
//! idle ──submit──▶ awaiting_response ──first chunk──▶ streaming ──end──▶ idle
//!                        │                                │
//!                        └──────────▶ error ◀─────────────┘
//!                                       │
//!                                       └──▶ idle
//! ```
//!
//! The session itself is synchronous. [`super::CopilotChat`] drives it from
//! the transport and publishes a [`SessionSnapshot`] after every change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use uuid::Uuid;

use super::accumulator::DeltaAccumulator;
use super::context::CopilotContext;
use crate::constants::copilot;
use crate::llm::{ChatMessage, CopilotRequest, MessageRole};

/// A displayed transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopilotMessage {
    /// Stable identifier
    pub id: Uuid,
    /// Author
    pub role: MessageRole,
    /// Full text; for a streaming reply, everything received so far
    pub content: String,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Document the user was reviewing when the message was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<CopilotContext>,
}

impl CopilotMessage {
    /// Create a message with a fresh id and the current time
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            context: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Attach the document context
    #[must_use]
    pub fn with_context(mut self, context: Option<CopilotContext>) -> Self {
        self.context = context;
        self
    }

    /// Wire form: role and content only
    #[must_use]
    pub fn to_wire(&self) -> ChatMessage {
        ChatMessage::new(self.role, self.content.clone())
    }
}

/// Exchange state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Ready for input
    #[default]
    Idle,
    /// Request sent, no body yet
    AwaitingResponse,
    /// Body chunks arriving
    Streaming,
    /// Failure surfaced; the session returns to idle right after
    Error,
}

impl SessionState {
    /// Whether an exchange is in flight
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::AwaitingResponse | Self::Streaming)
    }
}

/// Point-in-time view published to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// State at the time of the snapshot
    pub state: SessionState,
    /// Full transcript, greeting included
    pub messages: Vec<CopilotMessage>,
}

/// Why a submission was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// Input was empty after trimming
    #[error("input is empty")]
    EmptyInput,
    /// Another exchange is in flight
    #[error("an exchange is already in flight")]
    Busy,
}

/// Transcript plus state machine for one chat panel
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<CopilotMessage>,
    state: SessionState,
    greeting_id: Option<Uuid>,
    context: Option<CopilotContext>,
    accumulator: DeltaAccumulator,
    in_flight: Option<CancellationToken>,
}

impl ChatSession {
    /// Empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with the assistant greeting
    #[must_use]
    pub fn with_greeting() -> Self {
        let greeting = CopilotMessage::assistant(copilot::GREETING);
        Self {
            greeting_id: Some(greeting.id),
            messages: vec![greeting],
            ..Self::default()
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Transcript in insertion order
    #[must_use]
    pub fn messages(&self) -> &[CopilotMessage] {
        &self.messages
    }

    /// Document context sent with the next exchange
    #[must_use]
    pub const fn context(&self) -> Option<&CopilotContext> {
        self.context.as_ref()
    }

    /// Replace the document context
    pub fn set_context(&mut self, context: Option<CopilotContext>) {
        self.context = context;
    }

    /// Start an exchange
    ///
    /// Appends the user message and returns the request to send. The history
    /// in the request excludes the seeded greeting.
    ///
    /// # Errors
    ///
    /// Returns [`RejectReason::EmptyInput`] for blank input and
    /// [`RejectReason::Busy`] while another exchange is in flight.
    pub fn begin_exchange(&mut self, input: &str) -> Result<CopilotRequest, RejectReason> {
        if self.state.is_busy() {
            return Err(RejectReason::Busy);
        }
        let text = input.trim();
        if text.is_empty() {
            return Err(RejectReason::EmptyInput);
        }

        self.messages
            .push(CopilotMessage::user(text).with_context(self.context.clone()));
        self.state = SessionState::AwaitingResponse;
        self.accumulator = DeltaAccumulator::new();

        let history = self
            .messages
            .iter()
            .filter(|message| Some(message.id) != self.greeting_id)
            .map(CopilotMessage::to_wire)
            .collect();

        let context = self.context.as_ref().and_then(|context| {
            context
                .to_value()
                .map_err(|e| warn!("Sending exchange without context: {e}"))
                .ok()
        });

        Ok(CopilotRequest::new(history, context))
    }

    /// First body chunk received
    pub fn begin_streaming(&mut self) {
        if self.state == SessionState::AwaitingResponse {
            self.state = SessionState::Streaming;
        }
    }

    /// Fold one content fragment into the current reply
    pub fn apply_fragment(&mut self, fragment: &str) {
        self.accumulator.apply(fragment, &mut self.messages);
    }

    /// Text of the current reply so far
    #[must_use]
    pub fn reply_text(&self) -> &str {
        self.accumulator.text()
    }

    /// Clean end of stream
    pub fn complete(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Surface a failure as an assistant message and enter `error`
    pub fn fail(&mut self, message: impl Into<String>) {
        self.messages.push(CopilotMessage::assistant(message));
        self.state = SessionState::Error;
    }

    /// Leave `error` so the user can retry
    pub fn recover(&mut self) {
        if self.state == SessionState::Error {
            self.state = SessionState::Idle;
        }
    }

    /// Abandon the exchange; a partial reply stays in the transcript
    pub fn abort(&mut self) {
        self.state = SessionState::Idle;
    }

    /// Remember the cancellation handle of the running exchange
    pub fn set_in_flight(&mut self, token: CancellationToken) {
        self.in_flight = Some(token);
    }

    /// Forget the handle once the exchange has ended
    pub fn clear_in_flight(&mut self) {
        self.in_flight = None;
    }

    /// Handle of the running exchange, if any
    #[must_use]
    pub const fn in_flight(&self) -> Option<&CancellationToken> {
        self.in_flight.as_ref()
    }

    /// Suggested prompts, offered until the first real message
    #[must_use]
    pub fn quick_questions(&self) -> &'static [&'static str] {
        let untouched = self
            .messages
            .iter()
            .all(|message| Some(message.id) == self.greeting_id);
        if untouched {
            &copilot::QUICK_QUESTIONS
        } else {
            &[]
        }
    }

    /// Copy of the current state and transcript
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state,
            messages: self.messages.clone(),
        }
    }
}
