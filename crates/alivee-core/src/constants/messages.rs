// ABOUTME: Portuguese user-facing messages shared by proxy and client
// ABOUTME: Error texts shown as assistant bubbles or returned in proxy error bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

/// Proxy body for an upstream 429
pub const RATE_LIMIT_EXCEEDED: &str =
    "Limite de requisições excedido. Tente novamente em alguns segundos.";

/// Proxy body for an upstream 402
pub const INSUFFICIENT_CREDITS: &str =
    "Créditos insuficientes. Por favor, adicione créditos à sua conta.";

/// Proxy body for any other upstream failure
pub const UPSTREAM_FAILURE: &str = "Erro ao processar sua solicitação.";

/// Proxy body when a handler failure carries no message
pub const UNKNOWN_ERROR: &str = "Erro desconhecido";

/// Prefix for a request body that cannot be decoded
pub const INVALID_REQUEST_BODY: &str = "Corpo da requisição inválido";

/// Credential missing from the proxy environment
pub const UPSTREAM_KEY_MISSING: &str = "LOVABLE_API_KEY is not configured";

/// Client fallback when a non-OK response has no usable `error` field
pub const CLIENT_REQUEST_FAILED: &str = "Erro ao processar";

/// Client text for network failures during fetch or read
pub const CLIENT_GENERIC_FAILURE: &str = "Desculpe, ocorreu um erro. Por favor, tente novamente.";

/// Client text when an exchange exceeds its maximum duration
pub const CLIENT_TIMEOUT: &str =
    "A resposta demorou mais do que o esperado. Por favor, tente novamente.";

/// System prompt marker when the caller supplied no context
pub const NO_CONTEXT_PROVIDED: &str = "Nenhum contexto específico fornecido.";
