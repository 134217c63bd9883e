// ABOUTME: Exercise catalog and workout library types shared by plans and the standalone editor
// ABOUTME: Includes WorkoutType with its database string representation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Format of a workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutType {
    /// Fixed number of rounds
    #[default]
    Rounds,
    /// As many rounds as possible in a time cap
    Amrap,
    /// Every minute on the minute
    Emom,
    /// Anything else (free-form value)
    Other,
}

impl WorkoutType {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rounds => "rounds",
            Self::Amrap => "amrap",
            Self::Emom => "emom",
            Self::Other => "other",
        }
    }

    /// Parse from database string representation
    #[must_use]
    pub fn parse(s: &str) -> Self {
        Self::parse_strict(s).unwrap_or(Self::Other)
    }

    /// Parse a caller-supplied value, rejecting unknown formats
    #[must_use]
    pub fn parse_strict(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "rounds" => Some(Self::Rounds),
            "amrap" => Some(Self::Amrap),
            "emom" => Some(Self::Emom),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Catalog exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier
    pub id: String,
    /// Exercise name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Demonstration image URL
    pub image_url: Option<String>,
    /// Embeddable demonstration video
    pub video_url: Option<String>,
}

/// Id/name pair used by exercise pickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseName {
    /// Unique identifier
    pub id: String,
    /// Exercise name
    pub name: String,
}

/// A workout with its ordered exercise rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique identifier
    pub id: String,
    /// Optional name
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Workout format
    pub workout_type: WorkoutType,
    /// Format parameter (rounds count, time cap...)
    pub workout_value: Option<String>,
    /// Exercise rows ordered by position
    pub exercises: Vec<WorkoutExercise>,
}

/// One exercise row of a workout, joined with its catalog entry
///
/// When the referenced catalog exercise no longer exists, `exercise_name` and
/// `exercise_image_url` are empty and the optional catalog fields are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutExercise {
    /// Owning workout
    pub workout_id: String,
    /// Referenced catalog exercise
    pub exercise_id: String,
    /// Rank inside the workout
    pub position: i64,
    /// Repetitions prescription
    pub reps: String,
    /// Load prescription
    pub weight: Option<String>,
    /// Rest prescription
    pub rest: Option<String>,
    /// Coach notes
    pub notes: Option<String>,
    /// Catalog name
    pub exercise_name: String,
    /// Catalog image
    pub exercise_image_url: String,
    /// Catalog description
    pub exercise_description: Option<String>,
    /// Catalog video
    pub exercise_video_url: Option<String>,
}
