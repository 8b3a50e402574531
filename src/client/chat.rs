// ABOUTME: Async driver running one copilot exchange at a time against a transport
// ABOUTME: Streams deltas into the session under a deadline and a cancellation token
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Copilot Chat
//!
//! [`CopilotChat`] owns the session behind a mutex and publishes a
//! [`SessionSnapshot`] on an unbounded channel after every change. The
//! renderer is the channel's only consumer and never mutates the session.
//!
//! Every exchange runs under `max_stream_duration` and a child of the root
//! cancellation token. Cancelling keeps the partial reply; timing out and
//! failing append an assistant message with the reason.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{stream, StreamExt};
use tokio::sync::{mpsc, Mutex};
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::context::CopilotContext;
use super::session::{ChatSession, RejectReason, SessionSnapshot};
use super::transport::{CopilotTransport, TransportResponse};
use crate::config::ClientConfig;
use crate::constants::{defaults, messages};
use crate::llm::{create_delta_stream, CopilotRequest};

/// Construction options for [`CopilotChat`]
#[derive(Debug, Clone)]
pub struct ChatOptions {
    /// Seed the transcript with the assistant greeting
    pub greeting: bool,
    /// Deadline for one exchange, request and stream together
    pub max_stream_duration: Duration,
    /// Root token; cancelling it cancels any running exchange
    pub shutdown: CancellationToken,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            greeting: true,
            max_stream_duration: Duration::from_secs(defaults::CLIENT_MAX_STREAM_SECS),
            shutdown: CancellationToken::new(),
        }
    }
}

impl ChatOptions {
    /// Options derived from client configuration
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            max_stream_duration: config.max_stream_duration,
            ..Self::default()
        }
    }
}

/// How a submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stream ended cleanly
    Completed,
    /// Request or stream failed; the message was appended to the transcript
    Failed(String),
    /// Cancelled by the caller; any partial reply stands
    Cancelled,
    /// Deadline exceeded
    TimedOut,
    /// Not started
    Rejected(RejectReason),
}

enum ExchangeEnd {
    Completed,
    Failed(String),
    Cancelled,
    TimedOut,
}

/// Shareable handle on one chat session
#[derive(Clone)]
pub struct CopilotChat {
    session: Arc<Mutex<ChatSession>>,
    transport: Arc<dyn CopilotTransport>,
    updates: mpsc::UnboundedSender<SessionSnapshot>,
    shutdown: CancellationToken,
    max_stream_duration: Duration,
}

impl CopilotChat {
    /// Create a chat and the receiver of its snapshots
    #[must_use]
    pub fn new(
        transport: Arc<dyn CopilotTransport>,
        options: ChatOptions,
    ) -> (Self, mpsc::UnboundedReceiver<SessionSnapshot>) {
        let session = if options.greeting {
            ChatSession::with_greeting()
        } else {
            ChatSession::new()
        };
        let (updates, receiver) = mpsc::unbounded_channel();

        let chat = Self {
            session: Arc::new(Mutex::new(session)),
            transport,
            updates,
            shutdown: options.shutdown,
            max_stream_duration: options.max_stream_duration,
        };
        (chat, receiver)
    }

    /// Replace the document context used by the next exchange
    pub async fn set_context(&self, context: Option<CopilotContext>) {
        self.session.lock().await.set_context(context);
    }

    /// Current state and transcript
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().await.snapshot()
    }

    /// Suggested prompts for an untouched session
    pub async fn quick_questions(&self) -> &'static [&'static str] {
        self.session.lock().await.quick_questions()
    }

    /// Cancel the running exchange, returning whether one was running
    pub async fn cancel(&self) -> bool {
        let session = self.session.lock().await;
        if let Some(token) = session.in_flight() {
            token.cancel();
            true
        } else {
            false
        }
    }

    /// Submit user input and drive the exchange to its end
    pub async fn submit(&self, input: &str) -> SubmitOutcome {
        let (request, token) = {
            let mut session = self.session.lock().await;
            let request = match session.begin_exchange(input) {
                Ok(request) => request,
                Err(reason) => {
                    debug!(?reason, "Submission rejected");
                    return SubmitOutcome::Rejected(reason);
                }
            };
            let token = self.shutdown.child_token();
            session.set_in_flight(token.clone());
            self.publish(&session);
            (request, token)
        };

        let end = tokio::select! {
            biased;
            () = token.cancelled() => ExchangeEnd::Cancelled,
            result = time::timeout(self.max_stream_duration, self.run_exchange(&request)) => {
                match result {
                    Ok(Ok(())) => ExchangeEnd::Completed,
                    Ok(Err(message)) => ExchangeEnd::Failed(message),
                    Err(_) => ExchangeEnd::TimedOut,
                }
            }
        };

        let mut session = self.session.lock().await;
        session.clear_in_flight();

        match end {
            ExchangeEnd::Completed => {
                debug!(reply_bytes = session.reply_text().len(), "Exchange completed");
                session.complete();
                self.publish(&session);
                SubmitOutcome::Completed
            }
            ExchangeEnd::Cancelled => {
                info!(reply_bytes = session.reply_text().len(), "Exchange cancelled");
                session.abort();
                self.publish(&session);
                SubmitOutcome::Cancelled
            }
            ExchangeEnd::TimedOut => {
                warn!(
                    limit_secs = self.max_stream_duration.as_secs(),
                    "Exchange exceeded its maximum duration"
                );
                self.surface_failure(&mut session, messages::CLIENT_TIMEOUT);
                SubmitOutcome::TimedOut
            }
            ExchangeEnd::Failed(message) => {
                self.surface_failure(&mut session, &message);
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Send the request and fold the body into the session
    ///
    /// The `Err` value is the text to show the user.
    async fn run_exchange(&self, request: &CopilotRequest) -> Result<(), String> {
        let mut body = match self.transport.send(request).await {
            Ok(TransportResponse::Streaming(body)) => body,
            Ok(TransportResponse::Rejected { status, message }) => {
                warn!(status, "Copilot request rejected: {message}");
                return Err(message);
            }
            Err(e) => {
                error!("Copilot request failed: {e}");
                return Err(messages::CLIENT_GENERIC_FAILURE.to_owned());
            }
        };

        let first = match body.next().await {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => {
                error!("Copilot stream failed before the first chunk: {e}");
                return Err(messages::CLIENT_GENERIC_FAILURE.to_owned());
            }
            None => {
                debug!("Copilot stream closed without a body");
                return Ok(());
            }
        };

        {
            let mut session = self.session.lock().await;
            session.begin_streaming();
            self.publish(&session);
        }

        let body = stream::once(async move { Ok(first) }).chain(body);
        let mut deltas = create_delta_stream(Box::pin(body));

        while let Some(chunk) = deltas.next().await {
            match chunk {
                Ok(chunk) if chunk.delta.is_empty() => {}
                Ok(chunk) => {
                    let mut session = self.session.lock().await;
                    session.apply_fragment(&chunk.delta);
                    self.publish(&session);
                }
                Err(e) => {
                    error!("Copilot stream failed: {e}");
                    return Err(messages::CLIENT_GENERIC_FAILURE.to_owned());
                }
            }
        }

        Ok(())
    }

    fn surface_failure(&self, session: &mut ChatSession, message: &str) {
        session.fail(message);
        self.publish(session);
        session.recover();
        self.publish(session);
    }

    fn publish(&self, session: &ChatSession) {
        if self.updates.send(session.snapshot()).is_err() {
            debug!("Snapshot receiver dropped");
        }
    }
}
