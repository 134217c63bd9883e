// ABOUTME: SQLite store for the training-plan hierarchy: connection pool, schema, stores and mutations
// ABOUTME: Exposes PlanStore, CatalogStore, cascade delete and session duplication over one pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! [`Database`] owns the `SqlitePool` and hands out cheap store handles that
//! each clone the pool:
//!
//! - [`PlanStore`]: hierarchy fetches, creates and attribute updates
//! - [`CatalogStore`]: exercise catalog and standalone workouts
//! - [`CascadeDeleter`]: bottom-up subtree deletion
//! - [`SessionDuplicator`]: deep copy of a session subtree
//!
//! Foreign keys are enforced on every connection. Multi-statement mutations go
//! through [`transactions::TransactionGuard`].

/// Bottom-up subtree deletion
pub mod cascade;
/// Exercise catalog and workout library
pub mod catalog;
/// Deep session copy
pub mod duplicate;
/// Hierarchy fetches and attribute mutations
pub mod plans;
/// Row decoding into hydration shapes
pub(crate) mod rows;
/// DDL bootstrap
pub mod schema;
/// RAII transaction guard
pub mod transactions;

pub use cascade::{CascadeDeleter, DeleteSummary, SubtreeRoot};
pub use catalog::CatalogStore;
pub use duplicate::SessionDuplicator;
pub use plans::PlanStore;
pub use transactions::{SqliteTransactionGuard, TransactionGuard};

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::{DatabaseConfig, PaginationConfig};
use crate::errors::{AppError, AppResult};

/// Pool owner and store factory
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
    pagination: PaginationConfig,
}

impl Database {
    /// Open (creating if missing) the configured database
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails or the bootstrap DDL fails
    pub async fn connect(config: &DatabaseConfig, pagination: PaginationConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url.to_connection_string())
            .map_err(|e| AppError::config(format!("Invalid database URL {}: {e}", config.url)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let mut pool_options =
            SqlitePoolOptions::new().max_connections(config.effective_max_connections());
        if config.url.is_memory() {
            // The in-memory database lives exactly as long as its one connection
            pool_options = pool_options.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to {}: {e}", config.url)))?;

        info!(
            database.url = %config.url,
            database.max_connections = config.effective_max_connections(),
            "Database pool opened"
        );

        let database = Self { pool, pagination };
        if config.auto_migrate {
            database.migrate().await?;
        }
        Ok(database)
    }

    /// Wrap an existing pool; the caller is responsible for the schema
    #[must_use]
    pub const fn from_pool(pool: SqlitePool, pagination: PaginationConfig) -> Self {
        Self { pool, pagination }
    }

    /// Create all tables if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if a DDL statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        schema::migrate(&self.pool).await
    }

    /// Underlying pool
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Plan hierarchy store
    #[must_use]
    pub fn plans(&self) -> PlanStore {
        PlanStore::new(self.pool.clone(), self.pagination.plans_per_page)
    }

    /// Exercise and workout catalog store
    #[must_use]
    pub fn catalog(&self) -> CatalogStore {
        CatalogStore::new(self.pool.clone(), self.pagination)
    }

    /// Cascade delete orchestrator
    #[must_use]
    pub fn deleter(&self) -> CascadeDeleter {
        CascadeDeleter::new(self.pool.clone())
    }

    /// Session subtree duplicator
    #[must_use]
    pub fn duplicator(&self) -> SessionDuplicator {
        SessionDuplicator::new(self.pool.clone())
    }
}
