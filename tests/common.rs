// ABOUTME: Shared test utilities and fixture builders for integration tests
// ABOUTME: Provides an in-memory database, catalog exercises and seeded plan hierarchies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `coach_plans`
//!
//! Fixtures are built through the public store API so every test also
//! exercises the append paths.

use std::sync::Once;

use coach_plans::{
    config::{DatabaseConfig, PaginationConfig},
    database::Database,
    models::{
        Cicle, Exercise, NewExercise, NewWorkoutExercise, NodeAttributes, NodeDraft, Plan,
        Session, WorkoutAttributes, WorkoutDraft, WorkoutExerciseDraft,
    },
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Fresh in-memory database with the schema in place
pub async fn create_test_database() -> Database {
    init_test_logging();
    let config = DatabaseConfig::for_url("sqlite::memory:").unwrap();
    Database::connect(&config, PaginationConfig::default())
        .await
        .unwrap()
}

/// Validated node attributes with a name
pub fn named(name: &str) -> NodeAttributes {
    NodeAttributes::named(NodeDraft {
        name: Some(name.into()),
        ..NodeDraft::default()
    })
    .unwrap()
}

/// Validated child attributes without a name (default naming applies)
pub fn unnamed() -> NodeAttributes {
    NodeAttributes::child(NodeDraft::default()).unwrap()
}

/// Add a catalog exercise
pub async fn create_exercise(database: &Database, name: &str) -> Exercise {
    let exercise = NewExercise::new(NodeDraft {
        name: Some(name.into()),
        image_url: Some(format!("https://cdn.example.com/{name}.png")),
        ..NodeDraft::default()
    })
    .unwrap();
    database.catalog().create_exercise(&exercise).await.unwrap()
}

/// Exercise rows for a workout, one per exercise, positions 0..n
pub fn exercise_rows(exercises: &[&Exercise]) -> Vec<NewWorkoutExercise> {
    let drafts = exercises
        .iter()
        .zip(0_i64..)
        .map(|(exercise, position)| WorkoutExerciseDraft {
            exercise_id: exercise.id.clone(),
            position,
            reps: Some(format!("{}x10", position + 3)),
            weight: Some("60kg".into()),
            rest: Some("90s".into()),
            notes: None,
        })
        .collect();
    NewWorkoutExercise::list(drafts).unwrap()
}

/// Workout attributes of the given type
pub fn workout_attributes(name: &str, workout_type: &str, value: &str) -> WorkoutAttributes {
    WorkoutAttributes::new(WorkoutDraft {
        name: Some(name.into()),
        description: None,
        workout_type: Some(workout_type.into()),
        workout_value: Some(value.into()),
    })
    .unwrap()
}

/// Seeded hierarchy: one plan, one cicle, `sessions` sessions
pub struct SeededPlan {
    pub plan: Plan,
    pub cicle: Cicle,
    pub sessions: Vec<Session>,
    pub exercises: Vec<Exercise>,
}

/// Plan with 1 cicle and `session_count` sessions; each session has one block
/// holding one workout with two exercises
pub async fn seed_plan(database: &Database, session_count: usize) -> SeededPlan {
    let store = database.plans();
    let plan = store.create_plan(&named("Fuerza base")).await.unwrap();
    let cicle = store.add_cicle(&plan.id, &unnamed()).await.unwrap();

    let squat = create_exercise(database, "Sentadilla").await;
    let press = create_exercise(database, "Press banca").await;

    let mut sessions = Vec::with_capacity(session_count);
    for index in 0..session_count {
        let session = store
            .add_session(&cicle.id, &named(&format!("Día {}", index + 1)))
            .await
            .unwrap();
        populate_session(database, &session.id, &[&squat, &press]).await;
        sessions.push(session);
    }

    SeededPlan {
        plan,
        cicle,
        sessions,
        exercises: vec![squat, press],
    }
}

/// Add one block with one workout listing `exercises` to a session
pub async fn populate_session(database: &Database, session_id: &str, exercises: &[&Exercise]) {
    let store = database.plans();
    let block = store.add_session_block(session_id, &unnamed()).await.unwrap();
    let link = store.add_block_workout(&block.id).await.unwrap();
    database
        .catalog()
        .update_workout(
            &link.workout.id,
            &workout_attributes("Fuerza", "rounds", "4"),
            &exercise_rows(exercises),
        )
        .await
        .unwrap();
}

/// Row count of one table
pub async fn count_rows(database: &Database, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(database.pool())
        .await
        .unwrap()
}

/// Row count of every hierarchy table, in a fixed order
pub async fn table_counts(database: &Database) -> Vec<(&'static str, i64)> {
    let mut counts = Vec::new();
    for table in [
        "plans",
        "cicles",
        "sessions",
        "session_blocks",
        "session_blocks_workouts",
        "workouts",
        "workout_exercises",
        "exercises",
    ] {
        counts.push((table, count_rows(database, table).await));
    }
    counts
}

/// Install a trigger that aborts the given statement kind on a table
pub async fn inject_failure(database: &Database, timing: &str, table: &str) {
    sqlx::query(&format!(
        "CREATE TRIGGER inject_failure {timing} ON {table} \
         BEGIN SELECT RAISE(ABORT, 'injected failure'); END"
    ))
    .execute(database.pool())
    .await
    .unwrap();
}
