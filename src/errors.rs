// ABOUTME: Re-exports the unified error types from coach-core
// ABOUTME: Keeps `crate::errors::*` paths stable for library and binary code
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Unified error handling
//!
//! [`AppError`] and [`ErrorCode`] live in `coach-core` so binaries and tests
//! can match on codes without depending on the store layer.

pub use coach_core::errors::*;
