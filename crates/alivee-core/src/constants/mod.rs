// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Environment names, defaults, routes and the Portuguese message catalogue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! Constants module
//!
//! Constants are grouped by domain. User-facing strings are Brazilian Portuguese
//! and live in [`messages`] so the proxy, the client and the tests agree on them.

/// User-facing Portuguese messages
pub mod messages;

/// Copilot persona data: greeting and quick questions
pub mod copilot;

/// Environment variable names
pub mod env_vars {
    /// Upstream gateway credential (required by the proxy)
    pub const UPSTREAM_API_KEY: &str = "LOVABLE_API_KEY";
    /// Upstream chat-completions URL override
    pub const UPSTREAM_URL: &str = "COPILOT_UPSTREAM_URL";
    /// Upstream model override
    pub const UPSTREAM_MODEL: &str = "COPILOT_MODEL";
    /// Proxy HTTP port
    pub const HTTP_PORT: &str = "HTTP_PORT";
    /// Upstream connect timeout in seconds
    pub const UPSTREAM_CONNECT_TIMEOUT: &str = "UPSTREAM_CONNECT_TIMEOUT_SECS";
    /// Upstream whole-request timeout in seconds
    pub const UPSTREAM_REQUEST_TIMEOUT: &str = "UPSTREAM_REQUEST_TIMEOUT_SECS";
    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
    /// Log level
    pub const LOG_LEVEL: &str = "RUST_LOG";
    /// Base URL of the proxy as seen by the client
    pub const CLIENT_BASE_URL: &str = "COPILOT_BASE_URL";
    /// Bearer credential the client presents to the proxy
    pub const CLIENT_PUBLISHABLE_KEY: &str = "COPILOT_PUBLISHABLE_KEY";
    /// Client connect timeout in seconds
    pub const CLIENT_CONNECT_TIMEOUT: &str = "COPILOT_CONNECT_TIMEOUT_SECS";
    /// Maximum duration of one client exchange in seconds
    pub const CLIENT_MAX_STREAM: &str = "COPILOT_MAX_STREAM_SECS";
}

/// Default configuration values
pub mod defaults {
    /// Upstream chat-completions endpoint
    pub const UPSTREAM_URL: &str = "https://ai.gateway.lovable.dev/v1/chat/completions";
    /// Upstream model
    pub const UPSTREAM_MODEL: &str = "google/gemini-2.5-flash";
    /// Proxy HTTP port
    pub const HTTP_PORT: u16 = 8080;
    /// Upstream connect timeout
    pub const UPSTREAM_CONNECT_TIMEOUT_SECS: u64 = 30;
    /// Upstream whole-request timeout, streaming included
    pub const UPSTREAM_REQUEST_TIMEOUT_SECS: u64 = 300;
    /// Proxy base URL used by the client
    pub const CLIENT_BASE_URL: &str = "http://localhost:8080";
    /// Client connect timeout
    pub const CLIENT_CONNECT_TIMEOUT_SECS: u64 = 10;
    /// Maximum duration of one client exchange
    pub const CLIENT_MAX_STREAM_SECS: u64 = 120;
    /// Failed parses tolerated for one SSE line before it is dropped
    pub const SSE_MAX_PARSE_ATTEMPTS: u32 = 3;
    /// Longest partial SSE line kept in the buffer
    pub const SSE_MAX_LINE_BYTES: usize = 256 * 1024;
}

/// HTTP routes
pub mod routes {
    /// Copilot proxy endpoint
    pub const COPILOT: &str = "/functions/v1/ai-copilot";
    /// Liveness endpoint
    pub const HEALTH: &str = "/health";
    /// Readiness endpoint
    pub const READY: &str = "/ready";
}

/// Service identifiers for logging
pub mod service_names {
    /// Proxy server
    pub const COPILOT_PROXY: &str = "alivee-copilot-proxy";
    /// Terminal client
    pub const COPILOT_CLI: &str = "alivee-copilot-cli";
    /// Upstream provider name used in logs
    pub const UPSTREAM_GATEWAY: &str = "ai-gateway";
}

/// CORS values the proxy advertises on every response
pub mod cors {
    /// Allowed request headers
    pub const ALLOWED_HEADERS: [&str; 4] = ["authorization", "x-client-info", "apikey", "content-type"];
}
