// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, SSE body builders and chunk splitting helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `alivee_copilot`

use std::env;
use std::sync::Once;

use alivee_copilot::errors::AppError;
use alivee_copilot::llm::ByteStream;
use bytes::Bytes;
use futures_util::stream;
use serde_json::json;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// One `data:` event carrying a content delta, blank line included
pub fn delta_event(content: &str) -> String {
    let payload = json!({ "choices": [{ "delta": { "content": content } }] });
    format!("data: {payload}\n\n")
}

/// A complete SSE body: one event per fragment, then `[DONE]`
pub fn sse_body(fragments: &[&str]) -> String {
    let mut body: String = fragments.iter().map(|fragment| delta_event(fragment)).collect();
    body.push_str("data: [DONE]\n\n");
    body
}

/// Byte stream yielding the given chunks in order
pub fn chunked_stream(chunks: Vec<Vec<u8>>) -> ByteStream {
    Box::pin(stream::iter(
        chunks
            .into_iter()
            .map(|chunk| Ok::<_, AppError>(Bytes::from(chunk))),
    ))
}

/// Split `bytes` into chunks of at most `size` bytes
pub fn split_every(bytes: &[u8], size: usize) -> Vec<Vec<u8>> {
    bytes.chunks(size).map(<[u8]>::to_vec).collect()
}

/// Split `bytes` in two at `at`
pub fn split_at(bytes: &[u8], at: usize) -> Vec<Vec<u8>> {
    let (head, tail) = bytes.split_at(at);
    vec![head.to_vec(), tail.to_vec()]
}
