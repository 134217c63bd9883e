// ABOUTME: Cascade delete orchestrator removing a hierarchy node and its descendants bottom-up
// ABOUTME: Runs child-before-parent deletes in one transaction; any failure rolls the whole subtree back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Cascade Delete
//!
//! Foreign keys carry no `ON DELETE CASCADE`, so children are removed
//! explicitly in dependency order:
//!
//! ```text
//! workout_exercises -> session_blocks_workouts -> workouts
//!     -> session_blocks -> sessions -> cicles -> plans
//! ```
//!
//! Plan, cicle and session deletes also remove the workouts reachable through
//! their blocks, unless a block outside the subtree still links the workout.
//! Block and link deletes leave the linked workouts in place. Sibling
//! positions are never compacted.

use std::fmt;
use std::time::Instant;

use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use super::transactions::TransactionGuard;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;

/// Root of a subtree to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtreeRoot {
    /// A plan and everything under it
    Plan(String),
    /// A cicle and its sessions
    Cicle(String),
    /// A session and its blocks
    Session(String),
    /// A block and its workout links
    SessionBlock(String),
    /// One workout link of a block
    WorkoutLink {
        /// Block holding the link
        block_id: String,
        /// Link position within the block
        position: i64,
    },
}

impl SubtreeRoot {
    /// Short kind name used in logs and on the command line
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Plan(_) => "plan",
            Self::Cicle(_) => "cicle",
            Self::Session(_) => "session",
            Self::SessionBlock(_) => "block",
            Self::WorkoutLink { .. } => "link",
        }
    }

    /// Build a root from a kind name and an id
    ///
    /// Links are addressed as `<block_id>:<position>`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown kind or a malformed link address
    pub fn from_kind(kind: &str, id: &str) -> AppResult<Self> {
        let id = crate::validation::identifier("id", id)?;
        match kind {
            "plan" => Ok(Self::Plan(id)),
            "cicle" => Ok(Self::Cicle(id)),
            "session" => Ok(Self::Session(id)),
            "block" => Ok(Self::SessionBlock(id)),
            "link" => {
                let (block_id, position) = id.rsplit_once(':').ok_or_else(|| {
                    AppError::invalid_input("Link must be addressed as <block_id>:<position>")
                })?;
                let position = position.parse().map_err(|e| {
                    AppError::invalid_input(format!("Invalid link position '{position}': {e}"))
                })?;
                Ok(Self::WorkoutLink {
                    block_id: block_id.to_owned(),
                    position,
                })
            }
            other => Err(AppError::invalid_input(format!(
                "Unknown subtree kind '{other}' (expected plan, cicle, session, block or link)"
            ))),
        }
    }
}

impl fmt::Display for SubtreeRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plan(id) | Self::Cicle(id) | Self::Session(id) | Self::SessionBlock(id) => {
                write!(f, "{} {id}", self.kind())
            }
            Self::WorkoutLink { block_id, position } => {
                write!(f, "link {block_id}:{position}")
            }
        }
    }
}

/// Rows removed per table by one cascade delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    /// Workout exercise rows
    pub workout_exercises: u64,
    /// Block-to-workout links
    pub block_workouts: u64,
    /// Workouts
    pub workouts: u64,
    /// Session blocks
    pub session_blocks: u64,
    /// Sessions
    pub sessions: u64,
    /// Cicles
    pub cicles: u64,
    /// Plans
    pub plans: u64,
    /// Workouts left in place because a block outside the subtree still links
    /// them; not counted by [`DeleteSummary::total`]
    pub kept_workouts: u64,
}

impl DeleteSummary {
    /// Total rows removed
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.workout_exercises
            + self.block_workouts
            + self.workouts
            + self.session_blocks
            + self.sessions
            + self.cicles
            + self.plans
    }
}

/// Block ids under a plan, cicle or session root (parameter `$1` is the root id)
const fn block_scope(root: &SubtreeRoot) -> Option<&'static str> {
    match root {
        SubtreeRoot::Plan(_) => Some(
            "SELECT b.id FROM session_blocks b JOIN sessions s ON s.id = b.session_id \
             WHERE s.plan_id = $1",
        ),
        SubtreeRoot::Cicle(_) => Some(
            "SELECT b.id FROM session_blocks b JOIN sessions s ON s.id = b.session_id \
             WHERE s.cicle_id = $1",
        ),
        SubtreeRoot::Session(_) => Some("SELECT id FROM session_blocks WHERE session_id = $1"),
        SubtreeRoot::SessionBlock(_) | SubtreeRoot::WorkoutLink { .. } => None,
    }
}

async fn execute(conn: &mut SqliteConnection, sql: &str, id: &str, what: &str) -> AppResult<u64> {
    let result = sqlx::query(sql)
        .bind(id)
        .execute(conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to delete {what}: {e}")))?;
    Ok(result.rows_affected())
}

/// Cascade delete orchestrator
#[derive(Clone)]
pub struct CascadeDeleter {
    pool: SqlitePool,
}

impl CascadeDeleter {
    /// Create a new deleter handle
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Delete a node and all of its descendants atomically
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` when the root does not exist (nothing is
    /// changed), or the first failing statement's error after rolling back
    pub async fn delete_subtree(&self, root: &SubtreeRoot) -> AppResult<DeleteSummary> {
        let started = Instant::now();
        let mut guard = TransactionGuard::begin(&self.pool, "delete_subtree").await?;

        let summary = match root {
            SubtreeRoot::WorkoutLink { block_id, position } => {
                let removed = sqlx::query(
                    "DELETE FROM session_blocks_workouts \
                     WHERE session_block_id = $1 AND position = $2",
                )
                .bind(block_id)
                .bind(*position)
                .execute(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to delete workout link: {e}")))?
                .rows_affected();
                if removed == 0 {
                    return Err(AppError::not_found(format!("Workout link {root}"))
                        .with_resource_id(block_id.as_str()));
                }
                debug!(block.id = %block_id, link.position = position, "Linked workout kept");
                DeleteSummary {
                    block_workouts: removed,
                    ..DeleteSummary::default()
                }
            }
            SubtreeRoot::SessionBlock(block_id) => {
                Self::ensure_exists(guard.executor()?, "session_blocks", block_id).await?;
                let conn = guard.executor()?;
                let block_workouts = execute(
                    conn,
                    "DELETE FROM session_blocks_workouts WHERE session_block_id = $1",
                    block_id,
                    "workout links",
                )
                .await?;
                debug!(
                    block.id = %block_id,
                    orphaned_workouts = block_workouts,
                    "Workouts linked from the block are kept"
                );
                let session_blocks = execute(
                    conn,
                    "DELETE FROM session_blocks WHERE id = $1",
                    block_id,
                    "session block",
                )
                .await?;
                DeleteSummary {
                    block_workouts,
                    session_blocks,
                    ..DeleteSummary::default()
                }
            }
            SubtreeRoot::Plan(id) | SubtreeRoot::Cicle(id) | SubtreeRoot::Session(id) => {
                Self::delete_tree(guard.executor()?, root, id).await?
            }
        };

        guard.commit().await?;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        let root_id = root.to_string();
        AppLogger::log_cascade_delete(root.kind(), &root_id, summary.total(), duration_ms);
        Ok(summary)
    }

    async fn ensure_exists(conn: &mut SqliteConnection, table: &str, id: &str) -> AppResult<()> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)");
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up {table} row: {e}")))?;
        if exists {
            Ok(())
        } else {
            Err(AppError::not_found(format!("{table} row {id}")).with_resource_id(id))
        }
    }

    /// Plan, cicle or session subtree including exclusively linked workouts
    async fn delete_tree(
        conn: &mut SqliteConnection,
        root: &SubtreeRoot,
        id: &str,
    ) -> AppResult<DeleteSummary> {
        let Some(scope) = block_scope(root) else {
            return Err(AppError::internal(format!("{root} has no block scope")));
        };
        let table = match root {
            SubtreeRoot::Plan(_) => "plans",
            SubtreeRoot::Cicle(_) => "cicles",
            _ => "sessions",
        };
        Self::ensure_exists(conn, table, id).await?;

        let workout_ids: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT DISTINCT l.workout_id FROM session_blocks_workouts l \
             WHERE l.session_block_id IN ({scope}) \
             AND NOT EXISTS (SELECT 1 FROM session_blocks_workouts o \
                 WHERE o.workout_id = l.workout_id \
                 AND o.session_block_id NOT IN ({scope}))"
        ))
        .bind(id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to collect workouts of {root}: {e}")))?;

        let linked: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(DISTINCT workout_id) FROM session_blocks_workouts \
             WHERE session_block_id IN ({scope})"
        ))
        .bind(id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to count workouts of {root}: {e}")))?;

        let mut summary = DeleteSummary {
            kept_workouts: (linked as u64).saturating_sub(workout_ids.len() as u64),
            ..DeleteSummary::default()
        };
        for workout_id in &workout_ids {
            summary.workout_exercises += execute(
                conn,
                "DELETE FROM workout_exercises WHERE workout_id = $1",
                workout_id,
                "workout exercises",
            )
            .await?;
        }

        summary.block_workouts = execute(
            conn,
            &format!("DELETE FROM session_blocks_workouts WHERE session_block_id IN ({scope})"),
            id,
            "workout links",
        )
        .await?;

        for workout_id in &workout_ids {
            summary.workouts += execute(
                conn,
                "DELETE FROM workouts WHERE id = $1",
                workout_id,
                "workout",
            )
            .await?;
        }

        summary.session_blocks = execute(
            conn,
            &format!("DELETE FROM session_blocks WHERE id IN ({scope})"),
            id,
            "session blocks",
        )
        .await?;

        let (sessions_sql, cicles_sql) = match root {
            SubtreeRoot::Plan(_) => (
                "DELETE FROM sessions WHERE plan_id = $1",
                Some("DELETE FROM cicles WHERE plan_id = $1"),
            ),
            SubtreeRoot::Cicle(_) => (
                "DELETE FROM sessions WHERE cicle_id = $1",
                Some("DELETE FROM cicles WHERE id = $1"),
            ),
            _ => ("DELETE FROM sessions WHERE id = $1", None),
        };
        summary.sessions = execute(conn, sessions_sql, id, "sessions").await?;
        if let Some(cicles_sql) = cicles_sql {
            summary.cicles = execute(conn, cicles_sql, id, "cicles").await?;
        }
        if matches!(root, SubtreeRoot::Plan(_)) {
            summary.plans = execute(conn, "DELETE FROM plans WHERE id = $1", id, "plan").await?;
        }

        if summary.kept_workouts > 0 {
            warn!(
                root = %root,
                workouts.deleted = summary.workouts,
                workouts.kept = summary.kept_workouts,
                "Workouts still linked outside the subtree were kept"
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_kind_parses_links() {
        assert_eq!(
            SubtreeRoot::from_kind("link", "b1:3").unwrap(),
            SubtreeRoot::WorkoutLink {
                block_id: "b1".into(),
                position: 3
            }
        );
        assert!(SubtreeRoot::from_kind("link", "b1").is_err());
        assert!(SubtreeRoot::from_kind("gym", "g1").is_err());
        assert_eq!(
            SubtreeRoot::from_kind("block", "b1").unwrap().kind(),
            "block"
        );
    }

    #[test]
    fn test_summary_total() {
        let summary = DeleteSummary {
            workout_exercises: 4,
            block_workouts: 2,
            workouts: 2,
            session_blocks: 1,
            sessions: 1,
            ..DeleteSummary::default()
        };
        assert_eq!(summary.total(), 10);
    }
}
