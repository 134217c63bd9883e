// ABOUTME: Plan hierarchy store: hydrated fetches, paged plan listing, ordered appends and attribute updates
// ABOUTME: Appends compute the next position and default name inside the same transaction as the insert
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::time::Instant;

use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

use super::rows::{
    self, CICLE_COLUMNS, DETAIL_COLUMNS, DETAIL_JOINS, DETAIL_ORDER, PLAN_COLUMNS,
    SESSION_COLUMNS,
};
use super::transactions::TransactionGuard;
use crate::constants::default_names::{BLOCK_PREFIX, CICLE_PREFIX, SESSION_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::hydration;
use crate::logging::AppLogger;
use crate::models::{
    BlockWorkout, Cicle, NodeAttributes, Plan, PlanSummary, Session, SessionBlock, Workout,
    WorkoutAttributes,
};
use crate::ordering::next_position;
use crate::pagination::{total_pages, Page, PageRequest};

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Positions already used under one parent
async fn sibling_positions(
    conn: &mut SqliteConnection,
    sql: &str,
    parent_id: &str,
) -> AppResult<Vec<i64>> {
    sqlx::query_scalar::<_, i64>(sql)
        .bind(parent_id)
        .fetch_all(conn)
        .await
        .map_err(|e| AppError::database(format!("Failed to read sibling positions: {e}")))
}

/// Plan hierarchy store
#[derive(Clone)]
pub struct PlanStore {
    pool: SqlitePool,
    plans_per_page: u32,
}

impl PlanStore {
    /// Create a new store handle
    #[must_use]
    pub const fn new(pool: SqlitePool, plans_per_page: u32) -> Self {
        Self {
            pool,
            plans_per_page,
        }
    }

    /// Plan with its cicles (no deeper levels)
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn fetch_plan(&self, plan_id: &str) -> AppResult<Option<Plan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS}, {CICLE_COLUMNS} FROM plans p \
             LEFT JOIN cicles c ON c.plan_id = p.id \
             WHERE p.id = $1 ORDER BY c.position"
        );
        let found = sqlx::query(&sql)
            .bind(plan_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch plan: {e}")))?;
        let rows = rows::decode_all(&found, rows::shallow_plan_row)?;
        Ok(hydration::hydrate_plan(&rows))
    }

    /// Plan with the full five-level tree
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn fetch_plan_tree(&self, plan_id: &str) -> AppResult<Option<Plan>> {
        let sql = format!(
            "SELECT {PLAN_COLUMNS}, {CICLE_COLUMNS}, {SESSION_COLUMNS}, {DETAIL_COLUMNS} \
             FROM plans p \
             LEFT JOIN cicles c ON c.plan_id = p.id \
             LEFT JOIN sessions s ON s.cicle_id = c.id \
             {DETAIL_JOINS} \
             WHERE p.id = $1 \
             ORDER BY c.position, s.position, {DETAIL_ORDER}"
        );
        let found = sqlx::query(&sql)
            .bind(plan_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch plan tree: {e}")))?;
        let rows = rows::decode_all(&found, rows::plan_row)?;
        let plan = hydration::hydrate_plan(&rows);
        if let Some(plan) = &plan {
            info!(
                plan.id = %plan.id,
                plan.rows = found.len(),
                plan.sessions = plan.session_count(),
                "Plan tree hydrated"
            );
        }
        Ok(plan)
    }

    /// Cicle with its sessions and their full subtrees
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn fetch_cicle(&self, cicle_id: &str) -> AppResult<Option<Cicle>> {
        let sql = format!(
            "SELECT {CICLE_COLUMNS}, {SESSION_COLUMNS}, {DETAIL_COLUMNS} \
             FROM cicles c \
             LEFT JOIN sessions s ON s.cicle_id = c.id \
             {DETAIL_JOINS} \
             WHERE c.id = $1 \
             ORDER BY s.position, {DETAIL_ORDER}"
        );
        let found = sqlx::query(&sql)
            .bind(cicle_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch cicle: {e}")))?;
        let rows = rows::decode_all(&found, rows::cicle_row)?;
        Ok(hydration::hydrate_cicle(&rows))
    }

    /// Session with blocks, workouts and exercises
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn fetch_session(&self, session_id: &str) -> AppResult<Option<Session>> {
        let sql = format!(
            "SELECT {SESSION_COLUMNS}, {DETAIL_COLUMNS} \
             FROM sessions s \
             {DETAIL_JOINS} \
             WHERE s.id = $1 \
             ORDER BY {DETAIL_ORDER}"
        );
        let found = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to fetch session: {e}")))?;
        let rows = rows::decode_all(&found, rows::session_row)?;
        Ok(hydration::hydrate_session(&rows))
    }

    /// Search plans by name or description, ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_plans(&self, query: &str, page: u32) -> AppResult<Page<PlanSummary>> {
        let request = PageRequest::new(page, self.plans_per_page);
        let pattern = rows::like_pattern(query);

        let total: i64 = sqlx::query_scalar(
            r"SELECT COUNT(*) FROM plans
              WHERE name LIKE $1 ESCAPE '\' OR description LIKE $1 ESCAPE '\'",
        )
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to count plans: {e}")))?;

        let items = sqlx::query_as::<_, (String, String, Option<String>)>(
            r"SELECT id, name, description FROM plans
              WHERE name LIKE $1 ESCAPE '\' OR description LIKE $1 ESCAPE '\'
              ORDER BY name, id
              LIMIT $2 OFFSET $3",
        )
        .bind(&pattern)
        .bind(request.limit())
        .bind(request.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list plans: {e}")))?
        .into_iter()
        .map(|(id, name, description)| PlanSummary {
            id,
            name,
            description,
        })
        .collect();

        Ok(Page {
            items,
            page: request.page,
            total_pages: total_pages(total, request.per_page),
        })
    }

    /// Create an empty plan; the name is mandatory
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for a blank name, or a database error
    pub async fn create_plan(&self, attributes: &NodeAttributes) -> AppResult<Plan> {
        let started = Instant::now();
        let name = attributes.required_name()?;
        let id: String = sqlx::query_scalar(
            r"INSERT INTO plans (name, description, image_url, video_url)
              VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(name)
        .bind(attributes.description())
        .bind(attributes.image_url())
        .bind(attributes.video_url())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create plan: {e}")))?;

        AppLogger::log_database_operation("insert", "plans", elapsed_ms(started));
        Ok(Plan {
            id,
            name: name.to_owned(),
            description: attributes.description.clone(),
            image_url: attributes.image_url.clone(),
            video_url: attributes.video_url.clone(),
            cicles: Vec::new(),
        })
    }

    /// Replace a plan's attributes; a blank name keeps the current one
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the plan does not exist
    pub async fn update_plan(
        &self,
        plan_id: &str,
        attributes: &NodeAttributes,
    ) -> AppResult<NodeAttributes> {
        self.update_node("plans", plan_id, attributes, true).await
    }

    /// Append a cicle to a plan
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the plan does not exist
    pub async fn add_cicle(&self, plan_id: &str, attributes: &NodeAttributes) -> AppResult<Cicle> {
        let started = Instant::now();
        let mut guard = TransactionGuard::begin(&self.pool, "add_cicle").await?;

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM plans WHERE id = $1)")
            .bind(plan_id)
            .fetch_one(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up plan: {e}")))?;
        if !exists {
            return Err(AppError::not_found(format!("Plan {plan_id}")).with_resource_id(plan_id));
        }

        let positions = sibling_positions(
            guard.executor()?,
            "SELECT position FROM cicles WHERE plan_id = $1",
            plan_id,
        )
        .await?;
        let position = next_position(&positions);
        let name = attributes.name_or_default(CICLE_PREFIX, positions.len() + 1);

        let id: String = sqlx::query_scalar(
            r"INSERT INTO cicles (plan_id, name, description, position, image_url, video_url)
              VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(plan_id)
        .bind(&name)
        .bind(attributes.description())
        .bind(position)
        .bind(attributes.image_url())
        .bind(attributes.video_url())
        .fetch_one(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to create cicle: {e}")))?;

        guard.commit().await?;
        AppLogger::log_database_operation("insert", "cicles", elapsed_ms(started));

        Ok(Cicle {
            id,
            plan_id: plan_id.to_owned(),
            name,
            description: attributes.description.clone(),
            position,
            image_url: attributes.image_url.clone(),
            video_url: attributes.video_url.clone(),
            sessions: Vec::new(),
        })
    }

    /// Replace a cicle's attributes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the cicle does not exist
    pub async fn update_cicle(
        &self,
        cicle_id: &str,
        attributes: &NodeAttributes,
    ) -> AppResult<NodeAttributes> {
        self.update_node("cicles", cicle_id, attributes, true).await
    }

    /// Append a session to a cicle
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the cicle does not exist
    pub async fn add_session(
        &self,
        cicle_id: &str,
        attributes: &NodeAttributes,
    ) -> AppResult<Session> {
        let started = Instant::now();
        let mut guard = TransactionGuard::begin(&self.pool, "add_session").await?;

        let plan_id: String = sqlx::query_scalar("SELECT plan_id FROM cicles WHERE id = $1")
            .bind(cicle_id)
            .fetch_optional(guard.executor()?)
            .await
            .map_err(|e| AppError::database(format!("Failed to look up cicle: {e}")))?
            .ok_or_else(|| {
                AppError::not_found(format!("Cicle {cicle_id}")).with_resource_id(cicle_id)
            })?;

        let positions = sibling_positions(
            guard.executor()?,
            "SELECT position FROM sessions WHERE cicle_id = $1",
            cicle_id,
        )
        .await?;
        let position = next_position(&positions);
        let name = attributes.name_or_default(SESSION_PREFIX, positions.len() + 1);

        let id: String = sqlx::query_scalar(
            r"INSERT INTO sessions
                (plan_id, cicle_id, name, description, position, image_url, video_url)
              VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(&plan_id)
        .bind(cicle_id)
        .bind(&name)
        .bind(attributes.description())
        .bind(position)
        .bind(attributes.image_url())
        .bind(attributes.video_url())
        .fetch_one(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to create session: {e}")))?;

        guard.commit().await?;
        AppLogger::log_database_operation("insert", "sessions", elapsed_ms(started));

        Ok(Session {
            id,
            plan_id,
            cicle_id: Some(cicle_id.to_owned()),
            name,
            description: attributes.description.clone(),
            position,
            image_url: attributes.image_url.clone(),
            video_url: attributes.video_url.clone(),
            blocks: Vec::new(),
        })
    }

    /// Replace a session's attributes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the session does not exist
    pub async fn update_session(
        &self,
        session_id: &str,
        attributes: &NodeAttributes,
    ) -> AppResult<NodeAttributes> {
        self.update_node("sessions", session_id, attributes, true).await
    }

    /// Append a block to a session; blocks carry no image
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the session does not exist
    pub async fn add_session_block(
        &self,
        session_id: &str,
        attributes: &NodeAttributes,
    ) -> AppResult<SessionBlock> {
        let started = Instant::now();
        let mut guard = TransactionGuard::begin(&self.pool, "add_session_block").await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sessions WHERE id = $1)")
                .bind(session_id)
                .fetch_one(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to look up session: {e}")))?;
        if !exists {
            return Err(
                AppError::not_found(format!("Session {session_id}")).with_resource_id(session_id)
            );
        }

        let positions = sibling_positions(
            guard.executor()?,
            "SELECT position FROM session_blocks WHERE session_id = $1",
            session_id,
        )
        .await?;
        let position = next_position(&positions);
        let name = attributes.name_or_default(BLOCK_PREFIX, positions.len() + 1);

        let id: String = sqlx::query_scalar(
            r"INSERT INTO session_blocks (session_id, name, description, video_url, position)
              VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(session_id)
        .bind(&name)
        .bind(attributes.description())
        .bind(attributes.video_url())
        .bind(position)
        .fetch_one(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to create session block: {e}")))?;

        guard.commit().await?;
        AppLogger::log_database_operation("insert", "session_blocks", elapsed_ms(started));

        Ok(SessionBlock {
            id,
            session_id: session_id.to_owned(),
            name,
            description: attributes.description.clone(),
            video_url: attributes.video_url.clone(),
            position,
            workouts: Vec::new(),
        })
    }

    /// Replace a block's attributes
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the block does not exist
    pub async fn update_session_block(
        &self,
        block_id: &str,
        attributes: &NodeAttributes,
    ) -> AppResult<NodeAttributes> {
        self.update_node("session_blocks", block_id, attributes, false)
            .await
    }

    /// Create an empty `rounds` workout and link it at the block's next position
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the block does not exist
    pub async fn add_block_workout(&self, block_id: &str) -> AppResult<BlockWorkout> {
        let started = Instant::now();
        let mut guard = TransactionGuard::begin(&self.pool, "add_block_workout").await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM session_blocks WHERE id = $1)")
                .bind(block_id)
                .fetch_one(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to look up block: {e}")))?;
        if !exists {
            return Err(
                AppError::not_found(format!("Session block {block_id}")).with_resource_id(block_id)
            );
        }

        let positions = sibling_positions(
            guard.executor()?,
            "SELECT position FROM session_blocks_workouts WHERE session_block_id = $1",
            block_id,
        )
        .await?;
        let position = next_position(&positions);
        let attributes = WorkoutAttributes::default();

        let workout_id: String =
            sqlx::query_scalar("INSERT INTO workouts (workout_type) VALUES ($1) RETURNING id")
                .bind(attributes.workout_type().as_str())
                .fetch_one(guard.executor()?)
                .await
                .map_err(|e| AppError::database(format!("Failed to create workout: {e}")))?;

        sqlx::query(
            r"INSERT INTO session_blocks_workouts (session_block_id, workout_id, position)
              VALUES ($1, $2, $3)",
        )
        .bind(block_id)
        .bind(&workout_id)
        .bind(position)
        .execute(guard.executor()?)
        .await
        .map_err(|e| AppError::database(format!("Failed to link workout: {e}")))?;

        guard.commit().await?;
        AppLogger::log_database_operation("insert", "session_blocks_workouts", elapsed_ms(started));

        Ok(BlockWorkout {
            position,
            workout: Workout {
                id: workout_id,
                name: None,
                description: None,
                workout_type: attributes.workout_type(),
                workout_value: None,
                exercises: Vec::new(),
            },
        })
    }

    /// Attribute replace shared by every node table; a `None` name keeps the stored one
    async fn update_node(
        &self,
        table: &'static str,
        id: &str,
        attributes: &NodeAttributes,
        has_image: bool,
    ) -> AppResult<NodeAttributes> {
        let started = Instant::now();
        let image_column = if has_image { ", image_url = $5" } else { "" };
        let sql = format!(
            "UPDATE {table} SET name = COALESCE($2, name), description = $3, \
             video_url = $4{image_column} WHERE id = $1 RETURNING name"
        );

        let mut query = sqlx::query_scalar::<_, String>(&sql)
            .bind(id)
            .bind(attributes.name())
            .bind(attributes.description())
            .bind(attributes.video_url());
        if has_image {
            query = query.bind(attributes.image_url());
        }
        let name = query
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update {table}: {e}")))?;

        let Some(name) = name else {
            return Err(AppError::not_found(format!("{table} row {id}")).with_resource_id(id));
        };
        AppLogger::log_database_operation("update", table, elapsed_ms(started));

        let mut updated = attributes.clone();
        updated.name = Some(name);
        if !has_image {
            updated.image_url = None;
        }
        Ok(updated)
    }
}
