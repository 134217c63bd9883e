// ABOUTME: Main library entry point for the coach training-plan engine
// ABOUTME: Hydrates, edits, duplicates and cascade-deletes the plan hierarchy stored in SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Coach Plans
//!
//! A training-plan hierarchy engine. A coach edits a five-level tree
//!
//! ```text
//! Plan → Cicle → Session → SessionBlock → Workout (via link) → WorkoutExercise
//! ```
//!
//! whose levels are stored flat in `SQLite` and read back with one multi-join
//! query per fetch.
//!
//! ## Architecture
//!
//! - **hydration**: pure reconstruction of nested trees from flat join rows
//! - **ordering**: next-position and sibling sorting helpers
//! - **media**: video link normalization to a canonical embed URL
//! - **database**: pool, schema, stores, cascade delete and session duplication
//! - **models**: hydrated snapshots and validated attribute sets
//! - **config** / **logging**: environment-driven settings and `tracing` setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use coach_plans::config::{DatabaseConfig, PaginationConfig};
//! use coach_plans::database::Database;
//! use coach_plans::errors::AppResult;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = DatabaseConfig::for_url("sqlite::memory:")?;
//!     let database = Database::connect(&config, PaginationConfig::default()).await?;
//!
//!     let copy = database.duplicator().duplicate_session("source-session", 3).await?;
//!     println!("New session {} at position {}", copy.id, copy.position);
//!     Ok(())
//! }
//! ```

/// Environment-driven configuration
pub mod config;

/// `SQLite` stores and hierarchy mutations
pub mod database;

/// Unified error handling re-exported from `coach-core`
pub mod errors;

/// Flat-row to tree hydration
pub mod hydration;

/// Structured logging setup
pub mod logging;

/// Video link normalization
pub mod media;

/// Hierarchy snapshots and validated input
pub mod models;

/// Sibling position helpers
pub mod ordering;

/// Input validation primitives used by the attribute constructors
pub mod validation;

pub use coach_core::{constants, pagination};
