// ABOUTME: Idempotent CREATE TABLE IF NOT EXISTS bootstrap for the plan hierarchy and catalog tables
// ABOUTME: Parent references are plain foreign keys; children are deleted explicitly by the cascade module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::SqlitePool;
use tracing::info;

use crate::errors::{AppError, AppResult};

/// Store-generated opaque identifier
const ID_COLUMN: &str = "id TEXT PRIMARY KEY NOT NULL DEFAULT (lower(hex(randomblob(16))))";

async fn execute(pool: &SqlitePool, table: &str, statement: &str) -> AppResult<()> {
    sqlx::query(statement)
        .execute(pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create {table}: {e}")))?;
    Ok(())
}

/// Create every table and index used by the engine
///
/// Safe to run on every start.
///
/// # Errors
///
/// Returns an error if any DDL statement fails
pub async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    migrate_catalog(pool).await?;
    migrate_plans(pool).await?;
    info!("Schema bootstrap complete");
    Ok(())
}

async fn migrate_catalog(pool: &SqlitePool) -> AppResult<()> {
    execute(
        pool,
        "exercises",
        &format!(
            r"
            CREATE TABLE IF NOT EXISTS exercises (
                {ID_COLUMN},
                name TEXT NOT NULL,
                description TEXT,
                image_url TEXT,
                video_url TEXT
            )
            "
        ),
    )
    .await?;

    execute(
        pool,
        "workouts",
        &format!(
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                {ID_COLUMN},
                name TEXT,
                description TEXT,
                workout_type TEXT NOT NULL,
                workout_value TEXT
            )
            "
        ),
    )
    .await?;

    execute(
        pool,
        "workout_exercises",
        r"
        CREATE TABLE IF NOT EXISTS workout_exercises (
            workout_id TEXT NOT NULL REFERENCES workouts(id),
            position INTEGER NOT NULL,
            exercise_id TEXT NOT NULL REFERENCES exercises(id),
            reps TEXT NOT NULL,
            weight TEXT,
            notes TEXT,
            rest TEXT,
            PRIMARY KEY (workout_id, position)
        )
        ",
    )
    .await?;

    execute(
        pool,
        "idx_exercises_name",
        "CREATE INDEX IF NOT EXISTS idx_exercises_name ON exercises(name)",
    )
    .await
}

async fn migrate_plans(pool: &SqlitePool) -> AppResult<()> {
    execute(
        pool,
        "plans",
        &format!(
            r"
            CREATE TABLE IF NOT EXISTS plans (
                {ID_COLUMN},
                name TEXT NOT NULL DEFAULT '',
                description TEXT,
                image_url TEXT,
                video_url TEXT
            )
            "
        ),
    )
    .await?;

    execute(
        pool,
        "cicles",
        &format!(
            r"
            CREATE TABLE IF NOT EXISTS cicles (
                {ID_COLUMN},
                plan_id TEXT NOT NULL REFERENCES plans(id),
                name TEXT NOT NULL DEFAULT '',
                description TEXT,
                position INTEGER NOT NULL,
                image_url TEXT,
                video_url TEXT,
                UNIQUE (plan_id, position)
            )
            "
        ),
    )
    .await?;

    execute(
        pool,
        "sessions",
        &format!(
            r"
            CREATE TABLE IF NOT EXISTS sessions (
                {ID_COLUMN},
                plan_id TEXT NOT NULL REFERENCES plans(id),
                cicle_id TEXT REFERENCES cicles(id),
                name TEXT NOT NULL DEFAULT '',
                description TEXT,
                position INTEGER NOT NULL DEFAULT 0,
                image_url TEXT,
                video_url TEXT,
                UNIQUE (cicle_id, position)
            )
            "
        ),
    )
    .await?;

    execute(
        pool,
        "session_blocks",
        &format!(
            r"
            CREATE TABLE IF NOT EXISTS session_blocks (
                {ID_COLUMN},
                session_id TEXT NOT NULL REFERENCES sessions(id),
                name TEXT NOT NULL DEFAULT '',
                description TEXT,
                video_url TEXT,
                position INTEGER NOT NULL DEFAULT 0,
                UNIQUE (session_id, position)
            )
            "
        ),
    )
    .await?;

    execute(
        pool,
        "session_blocks_workouts",
        r"
        CREATE TABLE IF NOT EXISTS session_blocks_workouts (
            session_block_id TEXT NOT NULL REFERENCES session_blocks(id),
            workout_id TEXT NOT NULL REFERENCES workouts(id),
            position INTEGER NOT NULL,
            PRIMARY KEY (session_block_id, position)
        )
        ",
    )
    .await?;

    for (name, statement) in [
        (
            "idx_sessions_plan",
            "CREATE INDEX IF NOT EXISTS idx_sessions_plan ON sessions(plan_id)",
        ),
        (
            // UNIQUE (cicle_id, position) treats NULL cicles as distinct
            "idx_sessions_uncicled_position",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_uncicled_position \
             ON sessions(plan_id, position) WHERE cicle_id IS NULL",
        ),
        (
            "idx_links_workout",
            "CREATE INDEX IF NOT EXISTS idx_links_workout ON session_blocks_workouts(workout_id)",
        ),
    ] {
        execute(pool, name, statement).await?;
    }
    Ok(())
}
