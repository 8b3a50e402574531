// ABOUTME: CORS middleware configuration for the copilot endpoint
// ABOUTME: Allows browser clients on any origin to call the proxy with the platform headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

use http::header::HeaderName;
use http::Method;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::constants::cors;

/// Configure CORS for the proxy
///
/// Every response carries `Access-Control-Allow-Origin: *`. The allowed
/// header list is only sent on preflight, which the layer answers itself
/// with an empty 200. Browsers read it from the preflight alone.
///
/// # Allowed Headers
///
/// - `authorization`, `content-type`
/// - platform headers: `x-client-info`, `apikey`
#[must_use]
pub fn setup_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_headers(cors::ALLOWED_HEADERS.map(HeaderName::from_static))
        .allow_methods([Method::POST, Method::OPTIONS, Method::GET])
}
