// ABOUTME: Subtree duplicator deep-copying a session with its blocks, workouts and workout exercises
// ABOUTME: Every copied node gets a fresh id; positions and attributes are carried over verbatim
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Session Duplication
//!
//! The copy is built top-down inside one transaction:
//!
//! 1. the session row, at the caller's position under the same cicle;
//! 2. each block, ascending by position;
//! 3. each linked workout as a **new** workout row, relinked at the same link position;
//! 4. each workout exercise, sharing the catalog exercise reference.
//!
//! Nothing of the copy is visible until commit.

use std::time::Instant;

use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::transactions::TransactionGuard;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::models::SessionSummary;
use crate::ordering::next_position;

#[derive(FromRow)]
struct SourceSession {
    plan_id: String,
    cicle_id: Option<String>,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    video_url: Option<String>,
}

#[derive(FromRow)]
struct SourceBlock {
    id: String,
    name: String,
    description: Option<String>,
    video_url: Option<String>,
    position: i64,
}

#[derive(FromRow)]
struct SourceLink {
    position: i64,
    name: Option<String>,
    description: Option<String>,
    workout_type: String,
    workout_value: Option<String>,
    workout_id: String,
}

#[derive(FromRow)]
struct SourceExercise {
    exercise_id: String,
    position: i64,
    reps: String,
    weight: Option<String>,
    rest: Option<String>,
    notes: Option<String>,
}

/// Node counts of one copy
#[derive(Debug, Default)]
struct CopyCounts {
    blocks: usize,
    workouts: usize,
    exercises: usize,
}

/// Session subtree duplicator
#[derive(Clone)]
pub struct SessionDuplicator {
    pool: SqlitePool,
}

impl SessionDuplicator {
    /// Create a new duplicator handle
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Deep-copy a session to `insert_at_position` under the same cicle
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the source session does not exist, or the
    /// failing statement's error (for example a position already taken) after
    /// rolling the whole copy back
    pub async fn duplicate_session(
        &self,
        source_session_id: &str,
        insert_at_position: i64,
    ) -> AppResult<SessionSummary> {
        let position = crate::validation::position("position", insert_at_position)?;
        self.duplicate(source_session_id, Some(position)).await
    }

    /// Deep-copy a session after the last session of its cicle
    ///
    /// # Errors
    ///
    /// Same as [`Self::duplicate_session`]
    pub async fn duplicate_session_at_end(
        &self,
        source_session_id: &str,
    ) -> AppResult<SessionSummary> {
        self.duplicate(source_session_id, None).await
    }

    async fn duplicate(
        &self,
        source_session_id: &str,
        position: Option<i64>,
    ) -> AppResult<SessionSummary> {
        let started = Instant::now();
        let mut guard = TransactionGuard::begin(&self.pool, "duplicate_session").await?;
        let conn = guard.executor()?;

        let source: SourceSession = sqlx::query_as(
            r"SELECT plan_id, cicle_id, name, description, image_url, video_url
              FROM sessions WHERE id = $1",
        )
        .bind(source_session_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read source session: {e}")))?
        .ok_or_else(|| {
            AppError::not_found(format!("Session {source_session_id}"))
                .with_resource_id(source_session_id)
        })?;

        let position = match position {
            Some(position) => position,
            None => Self::next_session_position(conn, &source).await?,
        };

        let session_id: String = sqlx::query_scalar(
            r"INSERT INTO sessions
                (plan_id, cicle_id, name, description, position, image_url, video_url)
              VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&source.plan_id)
        .bind(&source.cicle_id)
        .bind(&source.name)
        .bind(&source.description)
        .bind(position)
        .bind(&source.image_url)
        .bind(&source.video_url)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to insert session copy: {e}")))?;

        let counts = Self::copy_blocks(conn, source_session_id, &session_id).await?;

        guard.commit().await?;

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        AppLogger::log_database_operation("duplicate", "sessions", duration_ms);
        info!(
            session.source_id = %source_session_id,
            session.id = %session_id,
            session.position = position,
            copy.blocks = counts.blocks,
            copy.workouts = counts.workouts,
            copy.exercises = counts.exercises,
            "Session duplicated"
        );

        Ok(SessionSummary {
            id: session_id,
            plan_id: source.plan_id,
            cicle_id: source.cicle_id,
            name: source.name,
            description: source.description,
            position,
            image_url: source.image_url,
            video_url: source.video_url,
        })
    }

    async fn next_session_position(
        conn: &mut SqliteConnection,
        source: &SourceSession,
    ) -> AppResult<i64> {
        let positions: Vec<i64> = sqlx::query_scalar(
            r"SELECT position FROM sessions
              WHERE plan_id = $1 AND cicle_id IS $2",
        )
        .bind(&source.plan_id)
        .bind(&source.cicle_id)
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read session positions: {e}")))?;
        Ok(next_position(&positions))
    }

    async fn copy_blocks(
        conn: &mut SqliteConnection,
        source_session_id: &str,
        session_id: &str,
    ) -> AppResult<CopyCounts> {
        let blocks: Vec<SourceBlock> = sqlx::query_as(
            r"SELECT id, name, description, video_url, position
              FROM session_blocks WHERE session_id = $1 ORDER BY position",
        )
        .bind(source_session_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read source blocks: {e}")))?;

        let mut counts = CopyCounts::default();
        for block in blocks {
            let block_id: String = sqlx::query_scalar(
                r"INSERT INTO session_blocks (session_id, name, description, video_url, position)
                  VALUES ($1, $2, $3, $4, $5) RETURNING id",
            )
            .bind(session_id)
            .bind(&block.name)
            .bind(&block.description)
            .bind(&block.video_url)
            .bind(block.position)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert block copy: {e}")))?;
            debug!(block.source_id = %block.id, block.id = %block_id, "Block copied");

            counts.blocks += 1;
            Self::copy_links(conn, &block.id, &block_id, &mut counts).await?;
        }
        Ok(counts)
    }

    async fn copy_links(
        conn: &mut SqliteConnection,
        source_block_id: &str,
        block_id: &str,
        counts: &mut CopyCounts,
    ) -> AppResult<()> {
        let links: Vec<SourceLink> = sqlx::query_as(
            r"SELECT l.position, w.name, w.description, w.workout_type, w.workout_value,
                     w.id AS workout_id
              FROM session_blocks_workouts l
              JOIN workouts w ON w.id = l.workout_id
              WHERE l.session_block_id = $1
              ORDER BY l.position",
        )
        .bind(source_block_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read source workouts: {e}")))?;

        for link in links {
            let workout_id: String = sqlx::query_scalar(
                r"INSERT INTO workouts (name, description, workout_type, workout_value)
                  VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(&link.name)
            .bind(&link.description)
            .bind(&link.workout_type)
            .bind(&link.workout_value)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert workout copy: {e}")))?;

            sqlx::query(
                r"INSERT INTO session_blocks_workouts (session_block_id, workout_id, position)
                  VALUES ($1, $2, $3)",
            )
            .bind(block_id)
            .bind(&workout_id)
            .bind(link.position)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to link workout copy: {e}")))?;

            counts.workouts += 1;
            counts.exercises += Self::copy_exercises(conn, &link.workout_id, &workout_id).await?;
        }
        Ok(())
    }

    async fn copy_exercises(
        conn: &mut SqliteConnection,
        source_workout_id: &str,
        workout_id: &str,
    ) -> AppResult<usize> {
        let exercises: Vec<SourceExercise> = sqlx::query_as(
            r"SELECT exercise_id, position, reps, weight, rest, notes
              FROM workout_exercises WHERE workout_id = $1 ORDER BY position",
        )
        .bind(source_workout_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read source exercises: {e}")))?;

        for exercise in &exercises {
            sqlx::query(
                r"INSERT INTO workout_exercises
                    (workout_id, exercise_id, position, reps, weight, rest, notes)
                  VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(workout_id)
            .bind(&exercise.exercise_id)
            .bind(exercise.position)
            .bind(&exercise.reps)
            .bind(&exercise.weight)
            .bind(&exercise.rest)
            .bind(&exercise.notes)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert exercise copy: {e}")))?;
        }
        Ok(exercises.len())
    }
}
