// ABOUTME: Scripted doubles for the upstream provider and the client transport
// ABOUTME: Record every request and replay canned SSE bodies, refusals and failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

use std::sync::{Arc, Mutex};

use alivee_copilot::client::{CopilotTransport, TransportResponse};
use alivee_copilot::errors::{AppError, AppResult};
use alivee_copilot::llm::{
    ByteStream, CompletionRequest, CopilotRequest, UpstreamProvider, UpstreamReply,
};
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::{stream, StreamExt};
use tokio::sync::Notify;

/// What a double answers with
#[derive(Clone)]
pub enum Script {
    /// 2xx with these body chunks, then end of stream
    Chunks(Vec<Vec<u8>>),
    /// These chunks, then a stream that never ends
    Hang(Vec<Vec<u8>>),
    /// These chunks, then a read error
    FailAfter(Vec<Vec<u8>>),
    /// Non-2xx with this body (upstream) or message (transport)
    Rejected { status: u16, body: String },
    /// Connection refused
    Unreachable,
}

impl Script {
    /// 2xx with the whole body as a single chunk
    pub fn body(body: &str) -> Self {
        Self::Chunks(vec![body.as_bytes().to_vec()])
    }

    fn stream(chunks: &[Vec<u8>]) -> impl futures_util::Stream<Item = Result<Bytes, AppError>> {
        stream::iter(
            chunks
                .to_vec()
                .into_iter()
                .map(|chunk| Ok::<_, AppError>(Bytes::from(chunk))),
        )
    }

    fn byte_stream(&self) -> Option<ByteStream> {
        match self {
            Self::Chunks(chunks) => Some(Box::pin(Self::stream(chunks))),
            Self::Hang(chunks) => Some(Box::pin(Self::stream(chunks).chain(stream::pending()))),
            Self::FailAfter(chunks) => Some(Box::pin(Self::stream(chunks).chain(stream::once(
                async { Err(AppError::stream_interrupted("connection reset")) },
            )))),
            Self::Rejected { .. } | Self::Unreachable => None,
        }
    }
}

/// Upstream provider replaying one script and recording requests
pub struct ScriptedUpstream {
    script: Script,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedUpstream {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamProvider for ScriptedUpstream {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn stream_completion(&self, request: &CompletionRequest) -> AppResult<UpstreamReply> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.script {
            Script::Rejected { status, body } => Ok(UpstreamReply::Rejected {
                status: *status,
                body: body.clone(),
            }),
            Script::Unreachable => Err(AppError::upstream_unavailable("connection refused")),
            other => Ok(UpstreamReply::Streaming(other.byte_stream().unwrap())),
        }
    }
}

/// Client transport replaying one script, optionally held behind a gate
pub struct ScriptedTransport {
    script: Script,
    gate: Option<Arc<Notify>>,
    requests: Mutex<Vec<CopilotRequest>>,
}

impl ScriptedTransport {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            gate: None,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Transport whose `send` waits until the returned gate is notified
    pub fn gated(script: Script) -> (Arc<Self>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let transport = Arc::new(Self {
            script,
            gate: Some(Arc::clone(&gate)),
            requests: Mutex::new(Vec::new()),
        });
        (transport, gate)
    }

    pub fn requests(&self) -> Vec<CopilotRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CopilotTransport for ScriptedTransport {
    async fn send(&self, request: &CopilotRequest) -> AppResult<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.script {
            Script::Rejected { status, body } => Ok(TransportResponse::Rejected {
                status: *status,
                message: body.clone(),
            }),
            Script::Unreachable => Err(AppError::upstream_unavailable("connection refused")),
            other => Ok(TransportResponse::Streaming(other.byte_stream().unwrap())),
        }
    }
}
