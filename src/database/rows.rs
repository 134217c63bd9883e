// ABOUTME: SQL column lists for the hierarchy join queries and decoders into hydration row shapes
// ABOUTME: Every joined level is decoded as None when its primary key column is null
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::errors::{AppError, AppResult};
use crate::hydration::{
    BlockColumns, CicleColumns, CicleRow, ExerciseColumns, LinkColumns, PlanColumns, PlanRow,
    SessionColumns, SessionRow, WorkoutColumns, WorkoutRow,
};
use crate::models::Exercise;

pub(crate) const PLAN_COLUMNS: &str = "p.id AS plan_id, p.name AS plan_name, \
    p.description AS plan_description, p.image_url AS plan_image_url, \
    p.video_url AS plan_video_url";

pub(crate) const CICLE_COLUMNS: &str = "c.id AS cicle_id, c.plan_id AS cicle_plan_id, \
    c.name AS cicle_name, c.description AS cicle_description, c.position AS cicle_position, \
    c.image_url AS cicle_image_url, c.video_url AS cicle_video_url";

pub(crate) const SESSION_COLUMNS: &str = "s.id AS session_id, s.plan_id AS session_plan_id, \
    s.cicle_id AS session_cicle_id, s.name AS session_name, \
    s.description AS session_description, s.position AS session_position, \
    s.image_url AS session_image_url, s.video_url AS session_video_url";

/// Block, link, workout, workout exercise and catalog columns
pub(crate) const DETAIL_COLUMNS: &str = "b.id AS block_id, b.session_id AS block_session_id, \
    b.name AS block_name, b.description AS block_description, \
    b.video_url AS block_video_url, b.position AS block_position, \
    l.position AS link_position, \
    w.id AS workout_id, w.name AS workout_name, w.description AS workout_description, \
    w.workout_type AS workout_type, w.workout_value AS workout_value, \
    we.exercise_id AS we_exercise_id, we.position AS we_position, we.reps AS we_reps, \
    we.weight AS we_weight, we.rest AS we_rest, we.notes AS we_notes, \
    e.id AS exercise_id, e.name AS exercise_name, e.description AS exercise_description, \
    e.image_url AS exercise_image_url, e.video_url AS exercise_video_url";

pub(crate) const WORKOUT_COLUMNS: &str = "w.id AS workout_id, w.name AS workout_name, \
    w.description AS workout_description, w.workout_type AS workout_type, \
    w.workout_value AS workout_value, \
    we.exercise_id AS we_exercise_id, we.position AS we_position, we.reps AS we_reps, \
    we.weight AS we_weight, we.rest AS we_rest, we.notes AS we_notes, \
    e.id AS exercise_id, e.name AS exercise_name, e.description AS exercise_description, \
    e.image_url AS exercise_image_url, e.video_url AS exercise_video_url";

/// Joins from `sessions s` down to the exercise catalog
pub(crate) const DETAIL_JOINS: &str = "\
    LEFT JOIN session_blocks b ON b.session_id = s.id \
    LEFT JOIN session_blocks_workouts l ON l.session_block_id = b.id \
    LEFT JOIN workouts w ON w.id = l.workout_id \
    LEFT JOIN workout_exercises we ON we.workout_id = w.id \
    LEFT JOIN exercises e ON e.id = we.exercise_id";

pub(crate) const DETAIL_ORDER: &str = "b.position, l.position, we.position";

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| AppError::database(format!("Failed to decode column {column}: {e}")))
}

fn plan(row: &SqliteRow) -> AppResult<PlanColumns> {
    Ok(PlanColumns {
        id: get(row, "plan_id")?,
        name: get(row, "plan_name")?,
        description: get(row, "plan_description")?,
        image_url: get(row, "plan_image_url")?,
        video_url: get(row, "plan_video_url")?,
    })
}

fn cicle(row: &SqliteRow) -> AppResult<Option<CicleColumns>> {
    let Some(id) = get::<Option<String>>(row, "cicle_id")? else {
        return Ok(None);
    };
    Ok(Some(CicleColumns {
        id,
        plan_id: get(row, "cicle_plan_id")?,
        name: get(row, "cicle_name")?,
        description: get(row, "cicle_description")?,
        position: get(row, "cicle_position")?,
        image_url: get(row, "cicle_image_url")?,
        video_url: get(row, "cicle_video_url")?,
    }))
}

fn session(row: &SqliteRow) -> AppResult<Option<SessionColumns>> {
    let Some(id) = get::<Option<String>>(row, "session_id")? else {
        return Ok(None);
    };
    Ok(Some(SessionColumns {
        id,
        plan_id: get(row, "session_plan_id")?,
        cicle_id: get(row, "session_cicle_id")?,
        name: get(row, "session_name")?,
        description: get(row, "session_description")?,
        position: get(row, "session_position")?,
        image_url: get(row, "session_image_url")?,
        video_url: get(row, "session_video_url")?,
    }))
}

fn block(row: &SqliteRow) -> AppResult<Option<BlockColumns>> {
    let Some(id) = get::<Option<String>>(row, "block_id")? else {
        return Ok(None);
    };
    Ok(Some(BlockColumns {
        id,
        session_id: get(row, "block_session_id")?,
        name: get(row, "block_name")?,
        description: get(row, "block_description")?,
        video_url: get(row, "block_video_url")?,
        position: get(row, "block_position")?,
    }))
}

fn workout(row: &SqliteRow) -> AppResult<Option<WorkoutColumns>> {
    let Some(id) = get::<Option<String>>(row, "workout_id")? else {
        return Ok(None);
    };
    Ok(Some(WorkoutColumns {
        id,
        name: get(row, "workout_name")?,
        description: get(row, "workout_description")?,
        workout_type: get(row, "workout_type")?,
        workout_value: get(row, "workout_value")?,
    }))
}

fn link(row: &SqliteRow) -> AppResult<Option<LinkColumns>> {
    let Some(position) = get::<Option<i64>>(row, "link_position")? else {
        return Ok(None);
    };
    Ok(workout(row)?.map(|workout| LinkColumns { position, workout }))
}

fn exercise(row: &SqliteRow) -> AppResult<Option<ExerciseColumns>> {
    let Some(exercise_id) = get::<Option<String>>(row, "we_exercise_id")? else {
        return Ok(None);
    };
    let catalog = match get::<Option<String>>(row, "exercise_id")? {
        Some(id) => Some(Exercise {
            id,
            name: get(row, "exercise_name")?,
            description: get(row, "exercise_description")?,
            image_url: get(row, "exercise_image_url")?,
            video_url: get(row, "exercise_video_url")?,
        }),
        None => None,
    };
    Ok(Some(ExerciseColumns {
        exercise_id,
        position: get(row, "we_position")?,
        reps: get(row, "we_reps")?,
        weight: get(row, "we_weight")?,
        rest: get(row, "we_rest")?,
        notes: get(row, "we_notes")?,
        catalog,
    }))
}

/// Row of a plan + cicles query
pub(crate) fn shallow_plan_row(row: &SqliteRow) -> AppResult<PlanRow> {
    Ok(PlanRow {
        plan: plan(row)?,
        cicle: cicle(row)?,
        ..PlanRow::default()
    })
}

/// Row of the full plan tree query
pub(crate) fn plan_row(row: &SqliteRow) -> AppResult<PlanRow> {
    Ok(PlanRow {
        plan: plan(row)?,
        cicle: cicle(row)?,
        session: session(row)?,
        block: block(row)?,
        link: link(row)?,
        exercise: exercise(row)?,
    })
}

/// Row of the cicle query
pub(crate) fn cicle_row(row: &SqliteRow) -> AppResult<CicleRow> {
    let root = cicle(row)?.ok_or_else(|| AppError::database("Cicle query returned a null root"))?;
    Ok(CicleRow {
        cicle: root,
        session: session(row)?,
        block: block(row)?,
        link: link(row)?,
        exercise: exercise(row)?,
    })
}

/// Row of the session query
pub(crate) fn session_row(row: &SqliteRow) -> AppResult<SessionRow> {
    let root =
        session(row)?.ok_or_else(|| AppError::database("Session query returned a null root"))?;
    Ok(SessionRow {
        session: root,
        block: block(row)?,
        link: link(row)?,
        exercise: exercise(row)?,
    })
}

/// Row of a workout query
pub(crate) fn workout_row(row: &SqliteRow) -> AppResult<WorkoutRow> {
    let root =
        workout(row)?.ok_or_else(|| AppError::database("Workout query returned a null root"))?;
    Ok(WorkoutRow {
        workout: root,
        exercise: exercise(row)?,
    })
}

/// Decode every row with one decoder
pub(crate) fn decode_all<T>(
    rows: &[SqliteRow],
    decode: impl Fn(&SqliteRow) -> AppResult<T>,
) -> AppResult<Vec<T>> {
    rows.iter().map(decode).collect()
}

/// Catalog exercise from a plain `exercises` select
pub(crate) fn catalog_exercise(row: &SqliteRow) -> AppResult<Exercise> {
    Ok(Exercise {
        id: get(row, "id")?,
        name: get(row, "name")?,
        description: get(row, "description")?,
        image_url: get(row, "image_url")?,
        video_url: get(row, "video_url")?,
    })
}

/// `LIKE` pattern for a free-text search; blank matches everything
pub(crate) fn like_pattern(query: &str) -> String {
    let escaped = query
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
