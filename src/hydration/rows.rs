// ABOUTME: Flat left-join row shapes consumed by the hydrator, one per aggregate root query
// ABOUTME: Every level below the root is optional because left joins yield nulls for missing children
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{Exercise, WorkoutType};

/// Plan columns of a joined row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanColumns {
    /// Plan id
    pub id: String,
    /// Plan name
    pub name: String,
    /// Plan description
    pub description: Option<String>,
    /// Plan image
    pub image_url: Option<String>,
    /// Plan video reference as stored
    pub video_url: Option<String>,
}

/// Cicle columns of a joined row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CicleColumns {
    /// Cicle id
    pub id: String,
    /// Owning plan
    pub plan_id: String,
    /// Cicle name
    pub name: String,
    /// Cicle description
    pub description: Option<String>,
    /// Rank within the plan
    pub position: i64,
    /// Cicle image
    pub image_url: Option<String>,
    /// Cicle video reference as stored
    pub video_url: Option<String>,
}

/// Session columns of a joined row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionColumns {
    /// Session id
    pub id: String,
    /// Owning plan
    pub plan_id: String,
    /// Owning cicle
    pub cicle_id: Option<String>,
    /// Session name
    pub name: String,
    /// Session description
    pub description: Option<String>,
    /// Rank within the cicle
    pub position: i64,
    /// Session image
    pub image_url: Option<String>,
    /// Session video reference as stored
    pub video_url: Option<String>,
}

/// Session block columns of a joined row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockColumns {
    /// Block id
    pub id: String,
    /// Owning session
    pub session_id: String,
    /// Block name
    pub name: String,
    /// Block description
    pub description: Option<String>,
    /// Block video reference as stored
    pub video_url: Option<String>,
    /// Rank within the session
    pub position: i64,
}

/// Workout columns of a joined row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkoutColumns {
    /// Workout id
    pub id: String,
    /// Workout name
    pub name: Option<String>,
    /// Workout description
    pub description: Option<String>,
    /// Stored workout type; unknown values hydrate as `other`
    pub workout_type: String,
    /// Format parameter
    pub workout_value: Option<String>,
}

/// A block-to-workout link together with the linked workout's columns
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkColumns {
    /// Rank of the workout within its block (stored on the link row)
    pub position: i64,
    /// Linked workout
    pub workout: WorkoutColumns,
}

/// Workout exercise columns of a joined row, plus the left-joined catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExerciseColumns {
    /// Referenced catalog exercise id
    pub exercise_id: String,
    /// Rank within the workout
    pub position: i64,
    /// Repetitions prescription
    pub reps: String,
    /// Load prescription
    pub weight: Option<String>,
    /// Rest prescription
    pub rest: Option<String>,
    /// Coach notes
    pub notes: Option<String>,
    /// Catalog entry; `None` when the exercise has been deleted
    pub catalog: Option<Exercise>,
}

/// One row of the full plan tree query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanRow {
    /// Root columns, identical on every row
    pub plan: PlanColumns,
    /// Joined cicle
    pub cicle: Option<CicleColumns>,
    /// Joined session
    pub session: Option<SessionColumns>,
    /// Joined block
    pub block: Option<BlockColumns>,
    /// Joined workout link
    pub link: Option<LinkColumns>,
    /// Joined workout exercise
    pub exercise: Option<ExerciseColumns>,
}

/// One row of the cicle query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CicleRow {
    /// Root columns, identical on every row
    pub cicle: CicleColumns,
    /// Joined session
    pub session: Option<SessionColumns>,
    /// Joined block
    pub block: Option<BlockColumns>,
    /// Joined workout link
    pub link: Option<LinkColumns>,
    /// Joined workout exercise
    pub exercise: Option<ExerciseColumns>,
}

/// One row of the session query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionRow {
    /// Root columns, identical on every row
    pub session: SessionColumns,
    /// Joined block
    pub block: Option<BlockColumns>,
    /// Joined workout link
    pub link: Option<LinkColumns>,
    /// Joined workout exercise
    pub exercise: Option<ExerciseColumns>,
}

/// One row of the standalone workout query
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkoutRow {
    /// Root columns, identical on every row
    pub workout: WorkoutColumns,
    /// Joined workout exercise
    pub exercise: Option<ExerciseColumns>,
}

impl WorkoutColumns {
    /// Parsed workout type
    #[must_use]
    pub fn workout_type(&self) -> WorkoutType {
        WorkoutType::parse(&self.workout_type)
    }
}
