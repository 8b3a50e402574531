// ABOUTME: SSE (Server-Sent Events) line-buffering parser for chat-completion streams
// ABOUTME: Handles split UTF-8 sequences, partial lines, keep-alives and malformed data lines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # SSE Stream Parser
//!
//! Turns an arbitrarily chunked byte stream into decoded JSON payloads.
//!
//! 1. **Split code points**: [`Utf8StreamDecoder`] holds back an incomplete
//!    multi-byte sequence until the next chunk completes it.
//! 2. **Split lines**: [`SseLineBuffer`] only looks at text terminated by `\n`;
//!    a trailing partial line waits for more bytes.
//! 3. **Malformed lines**: a `data:` line that is not valid JSON stays at the
//!    head of the buffer and processing of the current chunk stops. It is
//!    retried when the next chunk arrives and dropped once [`ParseRetryPolicy`]
//!    says it has had enough attempts.
//!
//! Blank lines, `:` comments and fields other than `data:` are ignored.
//! `data: [DONE]` ends the stream; nothing is emitted after it.
//!
//! ```text
//! let deltas = create_delta_stream(byte_stream);
//! while let Some(chunk) = deltas.next().await { /* chunk?.delta */ }
//! ```

use std::collections::VecDeque;
use std::mem;
use std::str;

use futures_util::stream::unfold;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::{debug, warn};

use super::{ByteStream, DeltaStream, StreamChunk};
use crate::constants::defaults;
use crate::errors::AppError;

const DATA_PREFIX: &str = "data: ";
const DONE_SENTINEL: &str = "[DONE]";

/// A parsed SSE event from the stream
#[derive(Debug, Clone, PartialEq)]
pub enum SseEvent {
    /// A decoded `data:` JSON payload
    Data(Value),
    /// The `[DONE]` termination signal
    Done,
}

// ============================================================================
// UTF-8 Decoding
// ============================================================================

/// Incremental UTF-8 decoder that never splits a code point
///
/// Invalid sequences become U+FFFD. A sequence that is merely incomplete at
/// the end of a chunk is kept until the following chunk arrives.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    /// Create a decoder with nothing pending
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, returning all text that is complete so far
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        let mut input = mem::take(&mut self.pending);
        input.extend_from_slice(bytes);

        let mut decoded = String::with_capacity(input.len());
        let mut rest = input.as_slice();
        loop {
            match str::from_utf8(rest) {
                Ok(valid) => {
                    decoded.push_str(valid);
                    break;
                }
                Err(error) => {
                    let (valid, invalid) = rest.split_at(error.valid_up_to());
                    decoded.push_str(&String::from_utf8_lossy(valid));
                    match error.error_len() {
                        Some(len) => {
                            decoded.push(char::REPLACEMENT_CHARACTER);
                            rest = &invalid[len..];
                        }
                        None => {
                            self.pending = invalid.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        decoded
    }

    /// Flush at end of stream; a dangling partial sequence becomes U+FFFD
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            self.pending.clear();
            char::REPLACEMENT_CHARACTER.to_string()
        }
    }

    /// Whether an incomplete sequence is being held back
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

// ============================================================================
// Line Buffering
// ============================================================================

/// Limits for lines that refuse to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRetryPolicy {
    /// Failed parses of one line before it is dropped (minimum 1)
    pub max_attempts: u32,
    /// Longest line, complete or partial, kept in the buffer
    pub max_line_bytes: usize,
}

impl ParseRetryPolicy {
    /// Create a policy with explicit limits
    #[must_use]
    pub const fn new(max_attempts: u32, max_line_bytes: usize) -> Self {
        Self {
            max_attempts,
            max_line_bytes,
        }
    }
}

impl Default for ParseRetryPolicy {
    fn default() -> Self {
        Self::new(defaults::SSE_MAX_PARSE_ATTEMPTS, defaults::SSE_MAX_LINE_BYTES)
    }
}

enum LineKind<'a> {
    Ignored,
    Done,
    Payload(&'a str),
}

fn classify_line(line: &str) -> LineKind<'_> {
    if line.starts_with(':') || line.trim().is_empty() {
        return LineKind::Ignored;
    }
    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return LineKind::Ignored;
    };
    match rest.trim() {
        DONE_SENTINEL => LineKind::Done,
        "" => LineKind::Ignored,
        candidate => LineKind::Payload(candidate),
    }
}

/// Line-buffering SSE parser that handles partial lines across chunk boundaries
#[derive(Debug)]
pub struct SseLineBuffer {
    decoder: Utf8StreamDecoder,
    /// Decoded text not yet consumed; a retained malformed line sits at its head
    buffer: String,
    policy: ParseRetryPolicy,
    /// Failed parses of the line currently at the head of `buffer`
    head_attempts: u32,
    finished: bool,
    dropped_lines: usize,
}

impl Default for SseLineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SseLineBuffer {
    /// Create a new empty line buffer with the default retry policy
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(ParseRetryPolicy::default())
    }

    /// Create a new empty line buffer with an explicit retry policy
    #[must_use]
    pub fn with_policy(policy: ParseRetryPolicy) -> Self {
        Self {
            decoder: Utf8StreamDecoder::new(),
            buffer: String::new(),
            policy,
            head_attempts: 0,
            finished: false,
            dropped_lines: 0,
        }
    }

    /// Feed one chunk, returning the events completed by it
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SseEvent> {
        if self.finished {
            return Vec::new();
        }
        let text = self.decoder.decode(bytes);
        self.buffer.push_str(&text);

        let events = self.drain_lines(false);
        self.enforce_partial_line_limit();
        events
    }

    /// Drain whatever is left once the byte stream has ended
    ///
    /// An unterminated last line is treated as complete. A retained malformed
    /// line gets one final attempt.
    pub fn flush(&mut self) -> Vec<SseEvent> {
        if self.finished {
            return Vec::new();
        }
        let tail = self.decoder.finish();
        self.buffer.push_str(&tail);
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }

        let events = self.drain_lines(true);
        self.buffer.clear();
        events
    }

    /// Whether `[DONE]` has been seen
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Lines discarded as permanently malformed or oversized
    #[must_use]
    pub const fn dropped_lines(&self) -> usize {
        self.dropped_lines
    }

    /// Bytes of decoded text waiting in the buffer
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    fn drain_lines(&mut self, final_attempt: bool) -> Vec<SseEvent> {
        let mut events = Vec::new();

        while let Some(newline) = self.buffer.find('\n') {
            let raw = &self.buffer[..newline];
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            match classify_line(line) {
                LineKind::Ignored => self.consume_line(newline),
                LineKind::Done => {
                    self.consume_line(newline);
                    self.finished = true;
                    events.push(SseEvent::Done);
                    break;
                }
                LineKind::Payload(candidate) => match serde_json::from_str::<Value>(candidate) {
                    Ok(payload) => {
                        self.consume_line(newline);
                        events.push(SseEvent::Data(payload));
                    }
                    Err(error) => {
                        self.head_attempts += 1;
                        let exhausted = final_attempt
                            || self.head_attempts >= self.policy.max_attempts
                            || newline > self.policy.max_line_bytes;
                        if exhausted {
                            warn!(
                                attempts = self.head_attempts,
                                line_bytes = newline,
                                "Dropping SSE data line that is not valid JSON: {error}"
                            );
                            self.consume_line(newline);
                            self.dropped_lines += 1;
                        } else {
                            debug!(
                                attempt = self.head_attempts,
                                "SSE data line is not valid JSON, retrying on next chunk: {error}"
                            );
                            break;
                        }
                    }
                },
            }
        }

        events
    }

    fn consume_line(&mut self, newline: usize) {
        self.buffer.drain(..=newline);
        self.head_attempts = 0;
    }

    fn enforce_partial_line_limit(&mut self) {
        let partial_start = self.buffer.rfind('\n').map_or(0, |pos| pos + 1);
        let partial_len = self.buffer.len() - partial_start;
        if partial_len > self.policy.max_line_bytes {
            warn!(
                line_bytes = partial_len,
                limit = self.policy.max_line_bytes,
                "Discarding oversized partial SSE line"
            );
            self.buffer.truncate(partial_start);
            self.dropped_lines += 1;
        }
    }
}

// ============================================================================
// Delta Stream
// ============================================================================

/// Extract the content delta of an OpenAI-style `chat.completion.chunk`
///
/// Returns `None` for payloads that carry neither content nor a finish reason
/// (role announcements, usage frames, unexpected shapes).
#[must_use]
pub fn extract_delta(payload: &Value) -> Option<StreamChunk> {
    let choice = payload.pointer("/choices/0")?;
    let delta = choice
        .pointer("/delta/content")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let finish_reason = choice
        .get("finish_reason")
        .and_then(Value::as_str)
        .map(str::to_owned);

    if delta.is_empty() && finish_reason.is_none() {
        return None;
    }

    Some(StreamChunk {
        delta: delta.to_owned(),
        is_final: false,
        finish_reason,
    })
}

/// Create a content delta stream from a raw SSE byte stream
///
/// Yields one [`StreamChunk`] per non-empty delta and a final chunk with
/// `is_final` set when `[DONE]` arrives. Reading stops at `[DONE]`; when the
/// byte stream simply closes, the buffer is flushed and the stream ends.
pub fn create_delta_stream(byte_stream: ByteStream) -> DeltaStream {
    create_delta_stream_with_policy(byte_stream, ParseRetryPolicy::default())
}

/// [`create_delta_stream`] with an explicit malformed-line policy
pub fn create_delta_stream_with_policy(
    byte_stream: ByteStream,
    policy: ParseRetryPolicy,
) -> DeltaStream {
    let state = DeltaStreamState {
        byte_stream,
        parser: SseLineBuffer::with_policy(policy),
        pending: VecDeque::new(),
        stream_ended: false,
    };

    // Each iteration either drains a pending chunk or reads the next network chunk
    let stream = unfold(state, |mut state| async move {
        loop {
            if let Some(item) = state.pending.pop_front() {
                return Some((item, state));
            }

            if state.stream_ended {
                return None;
            }

            match state.byte_stream.next().await {
                Some(Ok(bytes)) => {
                    let events = state.parser.feed(&bytes);
                    state.enqueue(events);
                }
                Some(Err(error)) => {
                    state.stream_ended = true;
                    return Some((Err(error), state));
                }
                None => {
                    state.stream_ended = true;
                    let events = state.parser.flush();
                    state.enqueue(events);
                }
            }
        }
    });

    Box::pin(stream)
}

/// Internal state for the delta stream unfold
struct DeltaStreamState {
    byte_stream: ByteStream,
    parser: SseLineBuffer,
    pending: VecDeque<Result<StreamChunk, AppError>>,
    stream_ended: bool,
}

impl DeltaStreamState {
    fn enqueue(&mut self, events: Vec<SseEvent>) {
        for event in events {
            match event {
                SseEvent::Data(payload) => {
                    if let Some(chunk) = extract_delta(&payload) {
                        self.pending.push_back(Ok(chunk));
                    }
                }
                SseEvent::Done => {
                    self.pending.push_back(Ok(StreamChunk {
                        delta: String::new(),
                        is_final: true,
                        finish_reason: Some("stop".to_owned()),
                    }));
                    self.stream_ended = true;
                }
            }
        }
    }
}
