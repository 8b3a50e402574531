// ABOUTME: Error handling re-exports from the core crate
// ABOUTME: Keeps `alivee_copilot::errors` as the single import path for error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! Unified error handling
//!
//! The types live in `alivee-core` so both crates share one definition.

pub use alivee_core::errors::{AppError, AppResult, ErrorCode, ErrorResponse};
