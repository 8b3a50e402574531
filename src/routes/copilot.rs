// ABOUTME: Copilot route handler relaying chat requests to the upstream stream
// ABOUTME: Decodes the caller body, forwards it through the proxy and returns SSE
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! Copilot endpoint
//!
//! `POST /functions/v1/ai-copilot` with `{ messages, context? }` answers with
//! the upstream `text/event-stream` body unchanged. Failures answer with
//! `{ "error": "<message>" }`.

use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use tracing::warn;

use crate::constants::{messages, routes};
use crate::errors::AppError;
use crate::llm::CopilotRequest;
use crate::proxy::CopilotProxy;

/// Copilot routes
pub struct CopilotRoutes;

impl CopilotRoutes {
    /// Create the copilot route bound to a proxy
    pub fn routes(proxy: Arc<CopilotProxy>) -> Router {
        Router::new()
            .route(
                routes::COPILOT,
                post(Self::handle_copilot).options(Self::handle_preflight),
            )
            .with_state(proxy)
    }

    async fn handle_copilot(
        State(proxy): State<Arc<CopilotProxy>>,
        body: Bytes,
    ) -> Result<Response, AppError> {
        let request: CopilotRequest = serde_json::from_slice(&body).map_err(|e| {
            warn!(body_bytes = body.len(), "Rejecting undecodable copilot body: {e}");
            AppError::invalid_format(format!("{}: {e}", messages::INVALID_REQUEST_BODY))
        })?;

        let stream = proxy.forward(request).await?;

        Ok((
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/event-stream")],
            Body::from_stream(stream),
        )
            .into_response())
    }

    async fn handle_preflight() -> StatusCode {
        StatusCode::OK
    }
}
