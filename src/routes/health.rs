// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Provides liveness and readiness endpoints for load balancers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

//! Health check routes for service monitoring

use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::constants::{routes, service_names};

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes() -> Router {
        Router::new()
            .route(routes::HEALTH, get(Self::health_handler))
            .route(routes::READY, get(Self::ready_handler))
    }

    async fn health_handler() -> Json<Value> {
        Json(json!({
            "status": "healthy",
            "service": service_names::COPILOT_PROXY,
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": Utc::now().to_rfc3339()
        }))
    }

    async fn ready_handler() -> Json<Value> {
        Json(json!({
            "status": "ready",
            "timestamp": Utc::now().to_rfc3339()
        }))
    }
}
