// ABOUTME: Route module organization for the copilot proxy HTTP endpoints
// ABOUTME: Groups the copilot relay and the health endpoints by domain
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! Route module for the copilot proxy
//!
//! Each domain module contains only route definitions and thin handlers that
//! delegate to [`crate::proxy`].

/// Copilot streaming relay
pub mod copilot;
/// Health check and readiness routes
pub mod health;

pub use copilot::CopilotRoutes;
pub use health::HealthRoutes;
