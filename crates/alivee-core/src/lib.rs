// ABOUTME: Core types and constants for the Alivee copilot
// ABOUTME: Foundation crate with error handling and the user-facing message catalogue
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

#![deny(unsafe_code)]

//! # Alivee Core
//!
//! Shared types for the copilot proxy and the streaming chat client. This crate
//! changes rarely, so the main crate can rebuild without recompiling it.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Environment variable names, defaults, and Portuguese user-facing messages

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;
