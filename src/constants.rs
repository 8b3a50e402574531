// ABOUTME: System-wide constants and environment-derived defaults for the copilot
// ABOUTME: Re-exports the core catalogue and adds typed environment lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # Constants Module
//!
//! Hardcoded constants come from `alivee-core`; [`env_config`] adds the
//! environment lookups that have no failure mode of their own.

pub use alivee_core::constants::{
    copilot, cors, defaults, env_vars, messages, routes, service_names,
};

/// Environment-based configuration
pub mod env_config {
    use std::env;

    use super::{defaults, env_vars};

    /// Deployment environment name, `development` when unset
    #[must_use]
    pub fn environment() -> String {
        env::var(env_vars::ENVIRONMENT).unwrap_or_else(|_| "development".into())
    }

    /// Log level directive, `info` when unset
    #[must_use]
    pub fn log_level() -> String {
        env::var(env_vars::LOG_LEVEL).unwrap_or_else(|_| "info".into())
    }

    /// Upstream chat-completions URL
    #[must_use]
    pub fn upstream_url() -> String {
        env::var(env_vars::UPSTREAM_URL).unwrap_or_else(|_| defaults::UPSTREAM_URL.to_owned())
    }

    /// Upstream model identifier
    #[must_use]
    pub fn upstream_model() -> String {
        env::var(env_vars::UPSTREAM_MODEL).unwrap_or_else(|_| defaults::UPSTREAM_MODEL.to_owned())
    }

    /// Proxy base URL used by the client
    #[must_use]
    pub fn client_base_url() -> String {
        env::var(env_vars::CLIENT_BASE_URL)
            .unwrap_or_else(|_| defaults::CLIENT_BASE_URL.to_owned())
    }
}
