// ABOUTME: Row hydrator turning flat left-join result sets into nested plan, cicle, session and workout trees
// ABOUTME: Pure and deterministic; stores feed it rows and return the owned snapshot it builds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Row Hydrator
//!
//! A fetch runs one multi-join query whose result has one row per
//! deepest-existing combination of Plan → Cicle → Session → SessionBlock →
//! Workout → WorkoutExercise. Hydration walks each row top-down:
//!
//! - a null level stops descent for that row (no ghost nodes);
//! - a level already seen is reused, first occurrence wins;
//! - every child list is stably sorted by position at the end.
//!
//! Feeding the same rows twice, or the same rows in another order, yields
//! the same tree up to first-occurrence attribute choice.

mod builder;
/// Flat row shapes, one per root query
pub mod rows;

pub use rows::{
    BlockColumns, CicleColumns, CicleRow, ExerciseColumns, LinkColumns, PlanColumns, PlanRow,
    SessionColumns, SessionRow, WorkoutColumns, WorkoutRow,
};

use std::collections::HashMap;

use builder::{TreeBuilder, ROOT};

use crate::media::embed_or_passthrough;
use crate::models::{Cicle, Plan, Session, Workout};

/// Build a plan tree from plan query rows
///
/// Returns `None` for an empty result set.
#[must_use]
pub fn hydrate_plan(rows: &[PlanRow]) -> Option<Plan> {
    let root = rows.first()?.plan.clone();
    let mut tree = TreeBuilder::new();

    for row in rows {
        let Some(cicle) = row.cicle.clone() else {
            continue;
        };
        let cicle = tree.push_cicle(cicle);
        let Some(session) = row.session.clone() else {
            continue;
        };
        let session = tree.push_session(cicle, session);
        tree.push_session_detail(
            session,
            row.block.clone(),
            row.link.clone(),
            row.exercise.clone(),
        );
    }

    Some(Plan {
        id: root.id,
        name: root.name,
        description: root.description,
        image_url: root.image_url,
        video_url: embed_or_passthrough(root.video_url),
        cicles: tree.into_cicles(),
    })
}

/// Build a cicle with its sessions from cicle query rows
#[must_use]
pub fn hydrate_cicle(rows: &[CicleRow]) -> Option<Cicle> {
    let root = rows.first()?.cicle.clone();
    let mut tree = TreeBuilder::new();

    for row in rows {
        let Some(session) = row.session.clone() else {
            continue;
        };
        let session = tree.push_session(ROOT, session);
        tree.push_session_detail(
            session,
            row.block.clone(),
            row.link.clone(),
            row.exercise.clone(),
        );
    }

    Some(builder::cicle(root, tree.into_sessions()))
}

/// Build a full session subtree from session query rows
#[must_use]
pub fn hydrate_session(rows: &[SessionRow]) -> Option<Session> {
    let root = rows.first()?.session.clone();
    let mut tree = TreeBuilder::new();

    for row in rows {
        tree.push_session_detail(
            ROOT,
            row.block.clone(),
            row.link.clone(),
            row.exercise.clone(),
        );
    }

    Some(builder::session(root, tree.into_blocks()))
}

/// Build a standalone workout with its exercises
#[must_use]
pub fn hydrate_workout(rows: &[WorkoutRow]) -> Option<Workout> {
    let root = rows.first()?.workout.clone();
    let mut tree = TreeBuilder::new();

    for exercise in rows.iter().filter_map(|row| row.exercise.clone()) {
        tree.push_exercise(ROOT, exercise);
    }

    let exercises = tree.into_root_exercises(&root.id);
    Some(builder::workout(
        LinkColumns {
            position: 0,
            workout: root,
        },
        exercises,
    ))
}

/// Group workout rows by workout id and hydrate each, preserving first-seen order
///
/// Used by paged workout listings, which select several workouts at once.
#[must_use]
pub fn hydrate_workouts(rows: Vec<WorkoutRow>) -> Vec<Workout> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<WorkoutRow>> = HashMap::new();
    for row in rows {
        let id = row.workout.id.clone();
        grouped
            .entry(id.clone())
            .or_insert_with(|| {
                order.push(id);
                Vec::new()
            })
            .push(row);
    }
    order
        .iter()
        .filter_map(|id| grouped.get(id).and_then(|rows| hydrate_workout(rows)))
        .collect()
}
