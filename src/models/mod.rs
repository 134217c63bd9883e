// ABOUTME: Data models for the training-plan hierarchy and the exercise/workout catalog
// ABOUTME: Re-exports hydrated tree snapshots and validated attribute sets
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - **plan**: the hydrated Plan → Cicle → Session → SessionBlock tree
//! - **catalog**: exercises, workouts and their exercise rows
//! - **attributes**: validated input for create/update operations
//!
//! Snapshots are owned and immutable from the engine's point of view: every
//! fetch builds a fresh tree and callers own whatever cache they keep.

/// Validated attribute sets for create and update operations
pub mod attributes;
/// Exercise catalog and workout types
pub mod catalog;
/// Plan hierarchy snapshots
pub mod plan;

pub use attributes::{
    ExerciseDraft, NewExercise, NewWorkoutExercise, NodeAttributes, NodeDraft,
    WorkoutAttributes, WorkoutDraft, WorkoutExerciseDraft,
};
pub use catalog::{Exercise, ExerciseName, Workout, WorkoutExercise, WorkoutType};
pub use plan::{BlockWorkout, Cicle, Plan, PlanSummary, Session, SessionBlock, SessionSummary};
