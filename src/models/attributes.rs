// ABOUTME: Typed constructors for create/update input: nodes, workouts, workout exercises, exercises
// ABOUTME: Raw drafts deserialize from callers; validated attribute sets are the only store input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::catalog::WorkoutType;
use crate::errors::{AppError, AppResult};
use crate::validation;

/// Raw attributes for a plan, cicle, session, block or exercise as sent by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeDraft {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Uploaded image URL
    #[serde(default)]
    pub image_url: Option<String>,
    /// Pasted video link
    #[serde(default)]
    pub video_url: Option<String>,
}

/// Validated attributes of a hierarchy node
///
/// Session blocks have no image column; an image supplied for a block is ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAttributes {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) image_url: Option<String>,
    pub(crate) video_url: Option<String>,
}

impl NodeAttributes {
    /// Validate attributes whose name is mandatory (plans, and every update)
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, overlong text, a relative
    /// image URL or an unrecognized video link
    pub fn named(draft: NodeDraft) -> AppResult<Self> {
        let name = validation::required_text("name", draft.name)?;
        let mut attributes = Self::child(NodeDraft {
            name: None,
            ..draft
        })?;
        attributes.name = Some(name);
        Ok(attributes)
    }

    /// Validate attributes for a new child; a blank name gets a default on insert
    ///
    /// # Errors
    ///
    /// Returns a validation error for overlong text, a relative image URL or an
    /// unrecognized video link
    pub fn child(draft: NodeDraft) -> AppResult<Self> {
        Ok(Self {
            name: validation::optional_text("name", draft.name)?,
            description: validation::optional_text("description", draft.description)?,
            image_url: validation::image_url(draft.image_url)?,
            video_url: validation::video_url(draft.video_url)?,
        })
    }

    /// Name, if one was supplied
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Description
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Image URL
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    /// Canonical video reference
    #[must_use]
    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    /// Supplied name, or `"<prefix> <ordinal>"`
    pub(crate) fn name_or_default(&self, prefix: &str, ordinal: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("{prefix} {ordinal}"))
    }

    /// Supplied name; only call on attributes built with [`Self::named`]
    pub(crate) fn required_name(&self) -> AppResult<&str> {
        self.name
            .as_deref()
            .ok_or_else(|| AppError::missing_field("name"))
    }
}

/// Raw catalog exercise attributes
pub type ExerciseDraft = NodeDraft;

/// Validated catalog exercise attributes (name mandatory)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExercise {
    pub(crate) attributes: NodeAttributes,
}

impl NewExercise {
    /// Validate a catalog exercise
    ///
    /// # Errors
    ///
    /// Same rules as [`NodeAttributes::named`]
    pub fn new(draft: ExerciseDraft) -> AppResult<Self> {
        Ok(Self {
            attributes: NodeAttributes::named(draft)?,
        })
    }

    /// Validated attributes
    #[must_use]
    pub const fn attributes(&self) -> &NodeAttributes {
        &self.attributes
    }
}

/// Raw workout attributes as sent by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutDraft {
    /// Optional name
    #[serde(default)]
    pub name: Option<String>,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// One of `rounds`, `amrap`, `emom`, `other`; defaults to `rounds`
    #[serde(default)]
    pub workout_type: Option<String>,
    /// Format parameter
    #[serde(default)]
    pub workout_value: Option<String>,
}

/// Validated workout attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutAttributes {
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) workout_type: WorkoutType,
    pub(crate) workout_value: Option<String>,
}

impl WorkoutAttributes {
    /// Validate workout attributes
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown workout type and `ValueOutOfRange`
    /// for overlong text
    pub fn new(draft: WorkoutDraft) -> AppResult<Self> {
        let workout_type = match validation::optional_text("workout_type", draft.workout_type)? {
            None => WorkoutType::default(),
            Some(raw) => WorkoutType::parse_strict(&raw).ok_or_else(|| {
                AppError::invalid_input(format!("Unknown workout type: {raw}"))
                    .with_details(serde_json::json!({ "field": "workout_type" }))
            })?,
        };
        Ok(Self {
            name: validation::optional_text("name", draft.name)?,
            description: validation::optional_text("description", draft.description)?,
            workout_type,
            workout_value: validation::optional_text("workout_value", draft.workout_value)?,
        })
    }

    /// Workout format
    #[must_use]
    pub const fn workout_type(&self) -> WorkoutType {
        self.workout_type
    }
}

impl Default for WorkoutAttributes {
    fn default() -> Self {
        Self {
            name: None,
            description: None,
            workout_type: WorkoutType::Rounds,
            workout_value: None,
        }
    }
}

/// Raw exercise row of a workout as sent by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutExerciseDraft {
    /// Referenced catalog exercise
    pub exercise_id: String,
    /// Rank inside the workout
    pub position: i64,
    /// Repetitions prescription
    #[serde(default)]
    pub reps: Option<String>,
    /// Load prescription
    #[serde(default)]
    pub weight: Option<String>,
    /// Rest prescription
    #[serde(default)]
    pub rest: Option<String>,
    /// Coach notes
    #[serde(default)]
    pub notes: Option<String>,
}

/// Validated exercise row of a workout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutExercise {
    pub(crate) exercise_id: String,
    pub(crate) position: i64,
    pub(crate) reps: String,
    pub(crate) weight: Option<String>,
    pub(crate) rest: Option<String>,
    pub(crate) notes: Option<String>,
}

impl NewWorkoutExercise {
    /// Validate one exercise row
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank exercise id, a negative position
    /// or overlong text
    pub fn new(draft: WorkoutExerciseDraft) -> AppResult<Self> {
        Ok(Self {
            exercise_id: validation::identifier("exercise_id", &draft.exercise_id)?,
            position: validation::position("position", draft.position)?,
            reps: validation::optional_text("reps", draft.reps)?.unwrap_or_default(),
            weight: validation::optional_text("weight", draft.weight)?,
            rest: validation::optional_text("rest", draft.rest)?,
            notes: validation::optional_text("notes", draft.notes)?,
        })
    }

    /// Validate a full exercise list; positions must be unique
    ///
    /// The result is sorted by position.
    ///
    /// # Errors
    ///
    /// Returns the first row error, or `InvalidInput` for a repeated position
    pub fn list(drafts: Vec<WorkoutExerciseDraft>) -> AppResult<Vec<Self>> {
        let mut rows = drafts
            .into_iter()
            .map(Self::new)
            .collect::<AppResult<Vec<_>>>()?;

        let mut seen = HashSet::with_capacity(rows.len());
        if let Some(repeated) = rows.iter().find(|row| !seen.insert(row.position)) {
            return Err(AppError::invalid_input(format!(
                "Position {} is used by more than one exercise",
                repeated.position
            )));
        }

        rows.sort_by_key(|row| row.position);
        Ok(rows)
    }

    /// Referenced catalog exercise
    #[must_use]
    pub fn exercise_id(&self) -> &str {
        &self.exercise_id
    }

    /// Rank inside the workout
    #[must_use]
    pub const fn position(&self) -> i64 {
        self.position
    }
}
