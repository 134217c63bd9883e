// ABOUTME: Core types and constants for the coach training-plan engine
// ABOUTME: Foundation crate with error handling, pagination and domain constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coach Core
//!
//! Foundation crate shared by the plan engine library and its binaries. It is
//! meant to change rarely so the rest of the workspace compiles incrementally.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Page sizes, default names, length limits
//! - **pagination**: Offset pagination for listings

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Offset pagination for listings
pub mod pagination;
