// ABOUTME: Configuration management module for proxy and client settings
// ABOUTME: Loads immutable, validated configuration from the process environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee
//! Configuration module
//!
//! - **Proxy**: upstream credential, URL, model, port and timeouts
//! - **Client**: proxy endpoint, platform credential and exchange limits
//!
//! Both are read once at process start. Callers share them behind `Arc` and
//! never mutate them afterwards.

/// Environment and server configuration
pub mod environment;

pub use environment::{ClientConfig, Environment, LogLevel, ProxyConfig, UpstreamConfig};
