// ABOUTME: Request tracing middleware for correlation and structured logging
// ABOUTME: Generates request IDs and creates one span per HTTP request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

use axum::body::Body;
use http::Request;
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Header carrying the request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id generator producing `req_<uuid>` values
#[derive(Debug, Clone, Copy, Default)]
pub struct PrefixedRequestId;

impl MakeRequestId for PrefixedRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = format!("req_{}", Uuid::new_v4().simple());
        id.parse().ok().map(RequestId::new)
    }
}

/// Create a tracing span for an HTTP request
///
/// Runs after the request id layer, so an id is always present unless the
/// caller sent one that is not valid UTF-8.
pub fn make_request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    info_span!(
        "http_request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request_id,
    )
}
