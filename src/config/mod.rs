// ABOUTME: Configuration management for the plan engine and its CLI
// ABOUTME: Aggregates database and pagination settings loaded from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **database**: store location, pool size, bootstrap toggle
//! - **pagination**: listing page sizes

use tracing::debug;

use crate::errors::AppResult;

/// Database location and pool configuration
pub mod database;
/// Listing page sizes
pub mod pagination;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use pagination::PaginationConfig;

/// Complete runtime configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Store configuration
    pub database: DatabaseConfig,
    /// Listing page sizes
    pub pagination: PaginationConfig,
}

impl AppConfig {
    /// Load every section from environment variables
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting encountered
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            database: DatabaseConfig::from_env()?,
            pagination: PaginationConfig::from_env()?,
        };
        debug!(
            database.url = %config.database.url,
            database.max_connections = config.database.max_connections,
            database.auto_migrate = config.database.auto_migrate,
            "Configuration loaded"
        );
        Ok(config)
    }
}
