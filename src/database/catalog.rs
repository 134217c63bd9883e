// ABOUTME: Exercise catalog and workout library store: paged searches, fetches and attribute updates
// ABOUTME: Workout updates replace the whole exercise list in one transaction after checking references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeSet;
use std::time::Instant;

use sqlx::SqlitePool;
use tracing::{debug, info};

use super::rows::{self, WORKOUT_COLUMNS};
use super::transactions::TransactionGuard;
use crate::config::PaginationConfig;
use crate::errors::{AppError, AppResult};
use crate::hydration;
use crate::logging::AppLogger;
use crate::models::{
    Exercise, ExerciseName, NewExercise, NewWorkoutExercise, Workout, WorkoutAttributes,
};
use crate::pagination::{total_pages, Page, PageRequest};

const EXERCISE_FILTER: &str =
    r"name LIKE $1 ESCAPE '\' OR COALESCE(description, '') LIKE $1 ESCAPE '\'";

const WORKOUT_FILTER: &str = r"COALESCE(name, '') LIKE $1 ESCAPE '\'
    OR COALESCE(description, '') LIKE $1 ESCAPE '\'";

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Exercise catalog and workout library store
#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
    pagination: PaginationConfig,
}

impl CatalogStore {
    /// Create a new store handle
    #[must_use]
    pub const fn new(pool: SqlitePool, pagination: PaginationConfig) -> Self {
        Self { pool, pagination }
    }

    /// Every exercise id and name, ordered by name (picker lists)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_exercise_names(&self) -> AppResult<Vec<ExerciseName>> {
        let names = sqlx::query_as::<_, (String, String)>(
            "SELECT id, name FROM exercises ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list exercise names: {e}")))?;
        Ok(names
            .into_iter()
            .map(|(id, name)| ExerciseName { id, name })
            .collect())
    }

    /// Search the catalog by name or description, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn search_exercises(&self, query: &str, page: u32) -> AppResult<Page<Exercise>> {
        let request = PageRequest::new(page, self.pagination.exercises_per_page);
        let pattern = rows::like_pattern(query);

        let sql = format!(
            "SELECT id, name, description, image_url, video_url FROM exercises \
             WHERE {EXERCISE_FILTER} ORDER BY name, id LIMIT $2 OFFSET $3"
        );
        let found = sqlx::query(&sql)
            .bind(&pattern)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to search exercises: {e}")))?;

        Ok(Page {
            items: rows::decode_all(&found, rows::catalog_exercise)?,
            page: request.page,
            total_pages: self.exercise_pages(query).await?,
        })
    }

    /// Page count of an exercise search
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exercise_pages(&self, query: &str) -> AppResult<u32> {
        let sql = format!("SELECT COUNT(*) FROM exercises WHERE {EXERCISE_FILTER}");
        let total: i64 = sqlx::query_scalar(&sql)
            .bind(rows::like_pattern(query))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count exercises: {e}")))?;
        Ok(total_pages(total, self.pagination.exercises_per_page))
    }

    /// One catalog exercise
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn fetch_exercise(&self, exercise_id: &str) -> AppResult<Option<Exercise>> {
        let found = sqlx::query(
            "SELECT id, name, description, image_url, video_url FROM exercises WHERE id = $1",
        )
        .bind(exercise_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to fetch exercise: {e}")))?;
        found.as_ref().map(rows::catalog_exercise).transpose()
    }

    /// Add an exercise to the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails
    pub async fn create_exercise(&self, exercise: &NewExercise) -> AppResult<Exercise> {
        let started = Instant::now();
        let attributes = exercise.attributes();
        let name = attributes.required_name()?;
        let id: String = sqlx::query_scalar(
            r"INSERT INTO exercises (name, description, image_url, video_url)
              VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(attributes.description())
        .bind(attributes.image_url())
        .bind(attributes.video_url())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create exercise: {e}")))?;

        AppLogger::log_database_operation("insert", "exercises", elapsed_ms(started));
        Ok(Exercise {
            id,
            name: name.to_owned(),
            description: attributes.description.clone(),
            image_url: attributes.image_url.clone(),
            video_url: attributes.video_url.clone(),
        })
    }

    /// Replace a catalog exercise's attributes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the exercise does not exist
    pub async fn update_exercise(
        &self,
        exercise_id: &str,
        exercise: &NewExercise,
    ) -> AppResult<Exercise> {
        let started = Instant::now();
        let attributes = exercise.attributes();
        let name = attributes.required_name()?;
        let updated = sqlx::query(
            r"UPDATE exercises SET name = $2, description = $3, image_url = $4, video_url = $5
              WHERE id = $1",
        )
        .bind(exercise_id)
        .bind(name)
        .bind(attributes.description())
        .bind(attributes.image_url())
        .bind(attributes.video_url())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to update exercise: {e}")))?
        .rows_affected();
        if updated == 0 {
            return Err(AppError::not_found(format!("Exercise {exercise_id}"))
                .with_resource_id(exercise_id));
        }

        AppLogger::log_database_operation("update", "exercises", elapsed_ms(started));
        Ok(Exercise {
            id: exercise_id.to_owned(),
            name: name.to_owned(),
            description: attributes.description.clone(),
            image_url: attributes.image_url.clone(),
            video_url: attributes.video_url.clone(),
        })
    }

    /// Workout with its exercise list
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn fetch_workout(&self, workout_id: &str) -> AppResult<Option<Workout>> {
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} FROM workouts w \
             LEFT JOIN workout_exercises we ON we.workout_id = w.id \
             LEFT JOIN exercises e ON e.id = we.exercise_id \
             WHERE w.id = $1 ORDER BY we.position"
        );
        let found = sqlx::query(&sql)
            .bind(workout_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch workout: {e}")))?;
        let rows = rows::decode_all(&found, rows::workout_row)?;
        Ok(hydration::hydrate_workout(&rows))
    }

    /// Search workouts by name or description, each hydrated with its exercises
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn search_workouts(&self, query: &str, page: u32) -> AppResult<Page<Workout>> {
        let request = PageRequest::new(page, self.pagination.workouts_per_page);
        let pattern = rows::like_pattern(query);

        let count_sql = format!("SELECT COUNT(*) FROM workouts WHERE {WORKOUT_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to count workouts: {e}")))?;

        // Page over workouts first so LIMIT counts workouts, not exercise rows
        let sql = format!(
            "SELECT {WORKOUT_COLUMNS} \
             FROM (SELECT * FROM workouts WHERE {WORKOUT_FILTER} \
                   ORDER BY name, id LIMIT $2 OFFSET $3) w \
             LEFT JOIN workout_exercises we ON we.workout_id = w.id \
             LEFT JOIN exercises e ON e.id = we.exercise_id \
             ORDER BY w.name, w.id, we.position"
        );
        let found = sqlx::query(&sql)
            .bind(&pattern)
            .bind(request.limit())
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to search workouts: {e}")))?;
        let rows = rows::decode_all(&found, rows::workout_row)?;

        Ok(Page {
            items: hydration::hydrate_workouts(rows),
            page: request.page,
            total_pages: total_pages(total, request.per_page),
        })
    }

    /// Replace a workout's attributes and its whole exercise list
    ///
    /// `exercises` should come from [`NewWorkoutExercise::list`], which rejects
    /// repeated positions and sorts by position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown exercise reference (checked before
    /// anything is written), `ResourceNotFound` for an unknown workout, or the
    /// failing statement's error after rolling back
    pub async fn update_workout(
        &self,
        workout_id: &str,
        attributes: &WorkoutAttributes,
        exercises: &[NewWorkoutExercise],
    ) -> AppResult<Workout> {
        let started = Instant::now();
        self.ensure_exercises_exist(exercises).await?;

        let mut guard = TransactionGuard::begin(&self.pool, "update_workout").await?;
        let conn = guard.executor()?;

        let updated = sqlx::query(
            r"UPDATE workouts SET name = $2, description = $3, workout_type = $4, workout_value = $5
              WHERE id = $1",
        )
        .bind(workout_id)
        .bind(&attributes.name)
        .bind(&attributes.description)
        .bind(attributes.workout_type().as_str())
        .bind(&attributes.workout_value)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to update workout: {e}")))?
        .rows_affected();
        if updated == 0 {
            return Err(
                AppError::not_found(format!("Workout {workout_id}")).with_resource_id(workout_id)
            );
        }

        let removed = sqlx::query("DELETE FROM workout_exercises WHERE workout_id = $1")
            .bind(workout_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear workout exercises: {e}")))?
            .rows_affected();

        let mut ordered: Vec<&NewWorkoutExercise> = exercises.iter().collect();
        ordered.sort_by_key(|exercise| exercise.position());
        for exercise in ordered {
            sqlx::query(
                r"INSERT INTO workout_exercises
                    (workout_id, exercise_id, position, reps, weight, rest, notes)
                  VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(workout_id)
            .bind(exercise.exercise_id())
            .bind(exercise.position())
            .bind(&exercise.reps)
            .bind(&exercise.weight)
            .bind(&exercise.rest)
            .bind(&exercise.notes)
            .execute(&mut *conn)
            .await
            .map_err(|e| AppError::database(format!("Failed to insert workout exercise: {e}")))?;
        }

        guard.commit().await?;
        AppLogger::log_database_operation("update", "workouts", elapsed_ms(started));
        info!(
            workout.id = %workout_id,
            workout.exercises_removed = removed,
            workout.exercises_inserted = exercises.len(),
            "Workout exercise list replaced"
        );

        self.fetch_workout(workout_id).await?.ok_or_else(|| {
            AppError::not_found(format!("Workout {workout_id}")).with_resource_id(workout_id)
        })
    }

    async fn ensure_exercises_exist(&self, exercises: &[NewWorkoutExercise]) -> AppResult<()> {
        let referenced: BTreeSet<&str> = exercises
            .iter()
            .map(NewWorkoutExercise::exercise_id)
            .collect();
        for exercise_id in referenced {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM exercises WHERE id = $1)")
                    .bind(exercise_id)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| AppError::database(format!("Failed to look up exercise: {e}")))?;
            if !exists {
                debug!(exercise.id = %exercise_id, "Rejected unknown exercise reference");
                return Err(AppError::invalid_input(format!(
                    "Exercise {exercise_id} does not exist"
                ))
                .with_resource_id(exercise_id));
            }
        }
        Ok(())
    }
}
