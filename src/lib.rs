// ABOUTME: Main library entry point for the Alivee copilot
// ABOUTME: Streaming proxy to the AI gateway plus the SSE chat client that consumes it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

#![deny(unsafe_code)]

//! # Alivee Copilot
//!
//! An NFS-e and tax-reform assistant delivered over server-sent events.
//!
//! ## Architecture
//!
//! - **Proxy** (`proxy`, `routes`, `server`): accepts a transcript plus optional
//!   document context, prepends the fixed "Copiloto Alivee" persona, forwards the
//!   request upstream with streaming enabled and passes the SSE bytes through.
//! - **Client** (`client`): posts the transcript, decodes the SSE byte stream
//!   with [`llm::sse_parser`], folds content deltas into one growing assistant
//!   message and publishes session snapshots over a channel.
//!
//! ## Quick Start
//!
//! 1. Export `LOVABLE_API_KEY` and start `copilot-proxy`
//! 2. Run `copilot-cli` in another terminal and ask a question

/// Streaming chat client: transport, accumulator and session state machine
pub mod client;

/// Configuration management loaded once from the environment
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// LLM wire types, SSE parsing, persona prompt and upstream provider
pub mod llm;

/// Structured logging setup
pub mod logging;

/// HTTP middleware (CORS, request ids, tracing)
pub mod middleware;

/// Streaming proxy core: prompt injection and upstream error mapping
pub mod proxy;

/// HTTP route handlers
pub mod routes;

/// HTTP server assembly and lifecycle
pub mod server;
