// ABOUTME: RAII transaction guard used by every multi-statement mutation of the plan hierarchy
// ABOUTME: Rolls back automatically when dropped uncommitted, including on future cancellation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Transaction management with an RAII guard
//!
//! Cascade deletes, session duplication and workout replacement all run
//! several dependent statements. Each one opens a guard, awaits statements
//! sequentially through [`TransactionGuard::executor`], and calls
//! [`TransactionGuard::commit`] only after the last statement succeeded.
//! Any early `?` return, or dropping the future mid-flight, drops the guard
//! and the transaction rolls back. Failed transactions are never retried.
//!
//! ```text
//! let mut guard = TransactionGuard::begin(&pool, "delete_subtree").await?;
//! sqlx::query("DELETE FROM ...").execute(guard.executor()?).await?;
//! sqlx::query("DELETE FROM ...").execute(guard.executor()?).await?;
//! guard.commit().await?;
//! ```

use sqlx::{Database, Pool, Transaction};
use tracing::{debug, warn};

use crate::errors::{AppError, AppResult};

/// RAII guard for database transactions ensuring automatic rollback on drop
///
/// # Type Parameters
///
/// * `DB` - The database type (`Sqlite` in this crate)
pub struct TransactionGuard<'c, DB: Database> {
    transaction: Option<Transaction<'c, DB>>,
    committed: bool,
    operation: &'static str,
}

impl<'c, DB: Database> TransactionGuard<'c, DB> {
    /// Wrap an already-open transaction
    #[must_use]
    pub fn new(transaction: Transaction<'c, DB>, operation: &'static str) -> Self {
        debug!(tx.operation = operation, "Transaction opened");
        Self {
            transaction: Some(transaction),
            committed: false,
            operation,
        }
    }

    /// Commit the transaction and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already consumed or the commit fails
    pub async fn commit(mut self) -> AppResult<()> {
        let Some(tx) = self.transaction.take() else {
            return Err(AppError::internal(
                "Transaction already consumed - cannot commit",
            ));
        };
        tx.commit().await.map_err(|e| {
            AppError::database(format!("Transaction commit failed ({}): {e}", self.operation))
                .with_source(e)
        })?;
        self.committed = true;
        debug!(tx.operation = self.operation, "Transaction committed");
        Ok(())
    }

    /// Explicitly roll back and consume the guard
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already consumed or the rollback fails
    pub async fn rollback(mut self) -> AppResult<()> {
        let Some(tx) = self.transaction.take() else {
            return Err(AppError::internal(
                "Transaction already consumed - cannot rollback",
            ));
        };
        tx.rollback().await.map_err(|e| {
            AppError::database(format!(
                "Transaction rollback failed ({}): {e}",
                self.operation
            ))
            .with_source(e)
        })?;
        debug!(tx.operation = self.operation, "Transaction rolled back");
        Ok(())
    }

    /// Check if the transaction has been committed
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.committed
    }

    /// Connection to run statements on inside the transaction
    ///
    /// # Errors
    ///
    /// Returns an error if the guard was already committed or rolled back
    pub fn executor(&mut self) -> AppResult<&mut <DB as Database>::Connection> {
        self.transaction.as_deref_mut().ok_or_else(|| {
            AppError::internal("Transaction already consumed - guard used after commit/rollback")
        })
    }
}

impl<DB: Database> TransactionGuard<'static, DB> {
    /// Begin a transaction on a pool
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be acquired or `BEGIN` fails
    pub async fn begin(pool: &Pool<DB>, operation: &'static str) -> AppResult<Self> {
        let tx = pool.begin().await.map_err(|e| {
            AppError::database(format!("Failed to begin transaction ({operation}): {e}"))
                .with_source(e)
        })?;
        Ok(Self::new(tx, operation))
    }
}

impl<DB: Database> Drop for TransactionGuard<'_, DB> {
    fn drop(&mut self) {
        if self.transaction.is_some() && !self.committed {
            // sqlx rolls back when the inner Transaction drops
            warn!(
                tx.operation = self.operation,
                "Transaction dropped without commit - rolling back"
            );
        }
    }
}

/// `SQLite` transaction guard
pub type SqliteTransactionGuard = TransactionGuard<'static, sqlx::Sqlite>;
