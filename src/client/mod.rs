// ABOUTME: Chat client side of the copilot: session, accumulator, transport and driver
// ABOUTME: Turns user input into proxy requests and streamed replies into transcript updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Copilot Client
//!
//! - [`transport`]: posts a [`crate::llm::CopilotRequest`] and returns the body
//! - [`accumulator`]: folds deltas into one assistant message
//! - [`session`]: transcript and state machine
//! - [`chat`]: async driver with deadline, cancellation and snapshots
//! - [`context`]: typed NFS-e document context

/// Delta folding into the transcript
pub mod accumulator;
/// Async exchange driver
pub mod chat;
/// Typed document context
pub mod context;
/// Transcript and state machine
pub mod session;
/// HTTP transport to the proxy
pub mod transport;

pub use chat::{ChatOptions, CopilotChat, SubmitOutcome};
pub use context::{AuditData, CopilotContext};
pub use session::{ChatSession, CopilotMessage, RejectReason, SessionSnapshot, SessionState};
pub use transport::{CopilotTransport, HttpTransport, TransportResponse};
