// ABOUTME: Tests for loading proxy and client configuration from the environment
// ABOUTME: Covers the required upstream key, defaults, overrides and invalid values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::time::Duration;

use alivee_copilot::config::{ClientConfig, Environment, LogLevel, ProxyConfig};
use alivee_copilot::constants::{defaults, env_vars};
use alivee_copilot::errors::ErrorCode;
use serial_test::serial;

const ALL_VARS: [&str; 12] = [
    env_vars::UPSTREAM_API_KEY,
    env_vars::UPSTREAM_URL,
    env_vars::UPSTREAM_MODEL,
    env_vars::HTTP_PORT,
    env_vars::UPSTREAM_CONNECT_TIMEOUT,
    env_vars::UPSTREAM_REQUEST_TIMEOUT,
    env_vars::ENVIRONMENT,
    env_vars::LOG_LEVEL,
    env_vars::CLIENT_BASE_URL,
    env_vars::CLIENT_PUBLISHABLE_KEY,
    env_vars::CLIENT_CONNECT_TIMEOUT,
    env_vars::CLIENT_MAX_STREAM,
];

fn clear_env() {
    for key in ALL_VARS {
        env::remove_var(key);
    }
}

// ============================================================================
// Proxy
// ============================================================================

#[test]
#[serial]
fn test_missing_upstream_key_is_config_missing() {
    clear_env();
    let err = ProxyConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
    assert!(err.message.contains(env_vars::UPSTREAM_API_KEY));
}

#[test]
#[serial]
fn test_blank_upstream_key_is_config_missing() {
    clear_env();
    env::set_var(env_vars::UPSTREAM_API_KEY, "   ");
    let err = ProxyConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigMissing);
    clear_env();
}

#[test]
#[serial]
fn test_proxy_defaults() {
    clear_env();
    env::set_var(env_vars::UPSTREAM_API_KEY, "gateway-key");

    let config = ProxyConfig::from_env().unwrap();
    assert_eq!(config.http_port, defaults::HTTP_PORT);
    assert_eq!(config.upstream.url, defaults::UPSTREAM_URL);
    assert_eq!(config.upstream.model, defaults::UPSTREAM_MODEL);
    assert_eq!(
        config.upstream.request_timeout,
        Duration::from_secs(defaults::UPSTREAM_REQUEST_TIMEOUT_SECS)
    );
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.environment, Environment::Development);
    clear_env();
}

#[test]
#[serial]
fn test_proxy_overrides() {
    clear_env();
    env::set_var(env_vars::UPSTREAM_API_KEY, "gateway-key");
    env::set_var(env_vars::UPSTREAM_URL, "http://127.0.0.1:9000/v1/chat/completions");
    env::set_var(env_vars::UPSTREAM_MODEL, "openai/gpt-5-mini");
    env::set_var(env_vars::HTTP_PORT, "9090");
    env::set_var(env_vars::UPSTREAM_CONNECT_TIMEOUT, "5");
    env::set_var(env_vars::ENVIRONMENT, "production");
    env::set_var(env_vars::LOG_LEVEL, "debug");

    let config = ProxyConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9090);
    assert_eq!(config.upstream.url, "http://127.0.0.1:9000/v1/chat/completions");
    assert_eq!(config.upstream.model, "openai/gpt-5-mini");
    assert_eq!(config.upstream.connect_timeout, Duration::from_secs(5));
    assert!(config.environment.is_production());
    assert_eq!(config.log_level, LogLevel::Debug);
    clear_env();
}

#[test]
#[serial]
fn test_invalid_values_are_config_invalid() {
    clear_env();
    env::set_var(env_vars::UPSTREAM_API_KEY, "gateway-key");

    env::set_var(env_vars::HTTP_PORT, "not-a-port");
    assert_eq!(
        ProxyConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    env::remove_var(env_vars::HTTP_PORT);

    env::set_var(env_vars::UPSTREAM_URL, "ftp://gateway.example");
    assert_eq!(
        ProxyConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    env::remove_var(env_vars::UPSTREAM_URL);

    env::set_var(env_vars::UPSTREAM_REQUEST_TIMEOUT, "0");
    assert_eq!(
        ProxyConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    clear_env();
}

#[test]
#[serial]
fn test_summary_never_contains_the_key() {
    clear_env();
    env::set_var(env_vars::UPSTREAM_API_KEY, "super-secret-key");

    let config = ProxyConfig::from_env().unwrap();
    assert!(!config.summary().contains("super-secret-key"));
    assert!(!format!("{config:?}").contains("super-secret-key"));
    clear_env();
}

// ============================================================================
// Client
// ============================================================================

#[test]
#[serial]
fn test_client_defaults_and_endpoint() {
    clear_env();
    let config = ClientConfig::from_env().unwrap();
    assert_eq!(config.base_url, defaults::CLIENT_BASE_URL);
    assert!(config.publishable_key.is_none());
    assert_eq!(
        config.max_stream_duration,
        Duration::from_secs(defaults::CLIENT_MAX_STREAM_SECS)
    );
    assert_eq!(
        config.endpoint(),
        "http://localhost:8080/functions/v1/ai-copilot"
    );
}

#[test]
#[serial]
fn test_client_overrides() {
    clear_env();
    env::set_var(env_vars::CLIENT_BASE_URL, "https://project.supabase.co/");
    env::set_var(env_vars::CLIENT_PUBLISHABLE_KEY, "anon-key");
    env::set_var(env_vars::CLIENT_MAX_STREAM, "30");

    let config = ClientConfig::from_env().unwrap();
    assert_eq!(
        config.endpoint(),
        "https://project.supabase.co/functions/v1/ai-copilot"
    );
    assert_eq!(config.publishable_key.as_deref(), Some("anon-key"));
    assert_eq!(config.max_stream_duration, Duration::from_secs(30));
    assert!(!format!("{config:?}").contains("anon-key"));
    clear_env();
}

#[test]
#[serial]
fn test_client_rejects_zero_duration_and_bad_url() {
    clear_env();
    env::set_var(env_vars::CLIENT_MAX_STREAM, "0");
    assert_eq!(
        ClientConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    env::remove_var(env_vars::CLIENT_MAX_STREAM);

    env::set_var(env_vars::CLIENT_BASE_URL, "not a url");
    assert_eq!(
        ClientConfig::from_env().unwrap_err().code,
        ErrorCode::ConfigInvalid
    );
    clear_env();
}
