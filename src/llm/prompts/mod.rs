// ABOUTME: System prompt for the copilot persona loaded at compile time
// ABOUTME: Renders the Alivee NFS-e assistant persona around the caller's document context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! # System Prompts
//!
//! The persona is kept in a markdown file and embedded at compile time. Its
//! single `{context}` placeholder receives the pretty-printed caller context.

use serde_json::Value;

use crate::constants::messages;
use crate::errors::AppResult;

/// Placeholder replaced by the rendered context
const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Copiloto Alivee persona template
///
/// Covers NFS-e field analysis, the IBS/CBS tax reform, data auditing and tax
/// credits, and requires answers in Brazilian Portuguese.
pub const COPILOT_SYSTEM_PROMPT: &str = include_str!("copilot_system.md");

/// Build the system prompt for one exchange
///
/// The context is rendered as pretty-printed JSON. An absent or `null` context
/// renders as a fixed Portuguese sentence instead.
///
/// # Errors
///
/// Returns a serialization error if the context cannot be rendered.
pub fn build_system_prompt(context: Option<&Value>) -> AppResult<String> {
    let rendered = match context {
        None | Some(Value::Null) => messages::NO_CONTEXT_PROVIDED.to_owned(),
        Some(value) => serde_json::to_string_pretty(value)?,
    };

    Ok(COPILOT_SYSTEM_PROMPT
        .trim_end()
        .replace(CONTEXT_PLACEHOLDER, &rendered))
}
