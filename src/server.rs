// ABOUTME: HTTP server assembly for the copilot proxy
// ABOUTME: Builds the router with tracing and CORS layers and serves it with graceful shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Copilot Proxy Server
//!
//! Layer order, outermost first: request id generation, trace span, request
//! id propagation, CORS. CORS wraps the router directly, so error and
//! preflight responses from every route carry its headers. It sits inside the
//! trace layer because it needs a response body with a `Default` impl.

use std::future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ProxyConfig;
use crate::llm::UpstreamProvider;
use crate::middleware::{make_request_span, setup_cors, PrefixedRequestId};
use crate::proxy::CopilotProxy;
use crate::routes::{CopilotRoutes, HealthRoutes};

/// The proxy HTTP server
pub struct CopilotServer {
    config: Arc<ProxyConfig>,
    proxy: Arc<CopilotProxy>,
}

impl CopilotServer {
    /// Create a server forwarding to the given upstream provider
    #[must_use]
    pub fn new(config: Arc<ProxyConfig>, provider: Arc<dyn UpstreamProvider>) -> Self {
        let proxy = Arc::new(CopilotProxy::new(Arc::clone(&config), provider));
        Self { config, proxy }
    }

    /// Assemble all routes and middleware
    pub fn router(&self) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(PrefixedRequestId))
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(setup_cors());

        Router::new()
            .merge(CopilotRoutes::routes(Arc::clone(&self.proxy)))
            .merge(HealthRoutes::routes())
            .layer(middleware)
    }

    /// Bind and serve until Ctrl-C
    ///
    /// # Errors
    ///
    /// Returns an error if the port cannot be bound or the server fails.
    pub async fn run(self, port: u16) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await?;

        info!(
            %addr,
            environment = %self.config.environment,
            "Copilot proxy listening"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Copilot proxy stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal, serving until killed: {e}");
        future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}
