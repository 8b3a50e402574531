// ABOUTME: Shared test helpers for integration tests
// ABOUTME: Exports the axum request harness and scripted upstream and transport doubles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Alivee

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

pub mod axum_test;
pub mod fakes;
