// ABOUTME: Hydrated training-plan tree: Plan, Cicle, Session, SessionBlock and their children
// ABOUTME: Immutable snapshots returned by fetches and consumed by presentation layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::catalog::Workout;

/// Root of the training hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Uploaded cover image URL
    pub image_url: Option<String>,
    /// Embeddable video reference
    pub video_url: Option<String>,
    /// Cicles ordered by position
    pub cicles: Vec<Cicle>,
}

/// A training cycle inside a plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cicle {
    /// Unique identifier
    pub id: String,
    /// Owning plan
    pub plan_id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Rank among the plan's cicles
    pub position: i64,
    /// Uploaded cover image URL
    pub image_url: Option<String>,
    /// Embeddable video reference
    pub video_url: Option<String>,
    /// Sessions ordered by position
    pub sessions: Vec<Session>,
}

/// A training day inside a cicle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier
    pub id: String,
    /// Owning plan
    pub plan_id: String,
    /// Owning cicle (sessions created before cicles existed have none)
    pub cicle_id: Option<String>,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Rank among the cicle's sessions
    pub position: i64,
    /// Uploaded cover image URL
    pub image_url: Option<String>,
    /// Embeddable video reference
    pub video_url: Option<String>,
    /// Blocks ordered by position
    pub blocks: Vec<SessionBlock>,
}

/// A block (warm-up, strength, conditioning...) inside a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBlock {
    /// Unique identifier
    pub id: String,
    /// Owning session
    pub session_id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Embeddable video reference
    pub video_url: Option<String>,
    /// Rank among the session's blocks
    pub position: i64,
    /// Linked workouts ordered by link position
    pub workouts: Vec<BlockWorkout>,
}

/// A workout as seen through its link row from a session block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockWorkout {
    /// Position of the link row inside the block
    pub position: i64,
    /// The linked workout and its exercises
    #[serde(flatten)]
    pub workout: Workout,
}

/// Plan row shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
}

/// Session attributes without its subtree, returned by duplication and updates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Unique identifier
    pub id: String,
    /// Owning plan
    pub plan_id: String,
    /// Owning cicle
    pub cicle_id: Option<String>,
    /// Display name
    pub name: String,
    /// Optional description
    pub description: Option<String>,
    /// Rank among the cicle's sessions
    pub position: i64,
    /// Uploaded cover image URL
    pub image_url: Option<String>,
    /// Embeddable video reference
    pub video_url: Option<String>,
}

impl Plan {
    /// Total number of sessions across all cicles
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.cicles.iter().map(|cicle| cicle.sessions.len()).sum()
    }
}

impl Session {
    /// Attributes of this session without its blocks
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id.clone(),
            plan_id: self.plan_id.clone(),
            cicle_id: self.cicle_id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            position: self.position,
            image_url: self.image_url.clone(),
            video_url: self.video_url.clone(),
        }
    }

    /// Number of workouts linked from any block of this session
    #[must_use]
    pub fn workout_count(&self) -> usize {
        self.blocks.iter().map(|block| block.workouts.len()).sum()
    }

    /// Number of exercise rows under any workout of this session
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.blocks
            .iter()
            .flat_map(|block| &block.workouts)
            .map(|linked| linked.workout.exercises.len())
            .sum()
    }
}
