// ABOUTME: Arena-backed tree builder with per-level identity maps used by every hydrate function
// ABOUTME: Deduplicates repeated join rows and materializes ordered owned snapshots bottom-up
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashMap;
use std::hash::Hash;
use std::mem;

use tracing::debug;

use super::rows::{BlockColumns, CicleColumns, ExerciseColumns, LinkColumns, SessionColumns};
use crate::media::embed_or_passthrough;
use crate::models::{
    BlockWorkout, Cicle, Exercise, Session, SessionBlock, Workout, WorkoutExercise,
};
use crate::ordering::{sort_by_position, Positioned};

/// Parent index used for nodes attached directly to the aggregate root
pub(crate) const ROOT: usize = 0;

/// One hierarchy level: nodes in first-seen order plus their identity map
struct Level<K, T> {
    slots: Vec<(usize, T)>,
    index: HashMap<K, usize>,
}

impl<K: Hash + Eq, T> Level<K, T> {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert unless the key is known; first occurrence wins
    fn insert(&mut self, key: K, parent: usize, node: T) -> usize {
        if let Some(&existing) = self.index.get(&key) {
            return existing;
        }
        let idx = self.slots.len();
        self.slots.push((parent, node));
        self.index.insert(key, idx);
        idx
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    /// Build every node and group it under its parent, each group sorted by position
    fn into_groups<U, F>(self, parents: usize, mut build: F) -> Vec<Vec<U>>
    where
        U: Positioned,
        F: FnMut(usize, usize, T) -> U,
    {
        let mut groups: Vec<Vec<U>> = (0..parents).map(|_| Vec::new()).collect();
        for (idx, (parent, node)) in self.slots.into_iter().enumerate() {
            let item = build(parent, idx, node);
            if let Some(group) = groups.get_mut(parent) {
                group.push(item);
            }
        }
        for group in &mut groups {
            sort_by_position(group);
        }
        groups
    }
}

fn take_group<U>(groups: &mut [Vec<U>], idx: usize) -> Vec<U> {
    groups.get_mut(idx).map(mem::take).unwrap_or_default()
}

/// Accumulates joined rows for one aggregate root
pub(crate) struct TreeBuilder {
    cicles: Level<String, CicleColumns>,
    sessions: Level<String, SessionColumns>,
    blocks: Level<String, BlockColumns>,
    workouts: Level<String, LinkColumns>,
    exercises: Level<(usize, i64), ExerciseColumns>,
}

impl TreeBuilder {
    pub(crate) fn new() -> Self {
        Self {
            cicles: Level::new(),
            sessions: Level::new(),
            blocks: Level::new(),
            workouts: Level::new(),
            exercises: Level::new(),
        }
    }

    pub(crate) fn push_cicle(&mut self, cicle: CicleColumns) -> usize {
        self.cicles.insert(cicle.id.clone(), ROOT, cicle)
    }

    pub(crate) fn push_session(&mut self, parent: usize, session: SessionColumns) -> usize {
        self.sessions.insert(session.id.clone(), parent, session)
    }

    /// Walk the block, link and exercise levels below a session
    pub(crate) fn push_session_detail(
        &mut self,
        session: usize,
        block: Option<BlockColumns>,
        link: Option<LinkColumns>,
        exercise: Option<ExerciseColumns>,
    ) {
        let Some(block) = block else {
            return;
        };
        let block = self.blocks.insert(block.id.clone(), session, block);
        let Some(link) = link else {
            return;
        };
        let workout = self.push_workout(block, link);
        if let Some(exercise) = exercise {
            self.push_exercise(workout, exercise);
        }
    }

    /// Workouts are identified by id across the whole tree; a workout linked
    /// from several blocks is attached to the first block that reaches it
    pub(crate) fn push_workout(&mut self, block: usize, link: LinkColumns) -> usize {
        self.workouts.insert(link.workout.id.clone(), block, link)
    }

    /// Workout exercises are identified by their natural key (workout, position)
    pub(crate) fn push_exercise(&mut self, workout: usize, exercise: ExerciseColumns) {
        let key = (workout, exercise.position);
        self.exercises.insert(key, workout, exercise);
    }

    fn exercise_groups(
        exercises: Level<(usize, i64), ExerciseColumns>,
        workout_ids: &[String],
    ) -> Vec<Vec<WorkoutExercise>> {
        exercises.into_groups(workout_ids.len().max(1), |parent, _, columns| {
            let workout_id = workout_ids.get(parent).cloned().unwrap_or_default();
            workout_exercise(workout_id, columns)
        })
    }

    #[allow(clippy::type_complexity)]
    fn block_groups(
        self,
    ) -> (
        Level<String, CicleColumns>,
        Level<String, SessionColumns>,
        Vec<Vec<SessionBlock>>,
    ) {
        let workout_ids: Vec<String> = self
            .workouts
            .slots
            .iter()
            .map(|(_, link)| link.workout.id.clone())
            .collect();
        let mut exercises = Self::exercise_groups(self.exercises, &workout_ids);

        let mut workouts = self
            .workouts
            .into_groups(self.blocks.len().max(1), |_, idx, link| BlockWorkout {
                position: link.position,
                workout: workout(link, take_group(&mut exercises, idx)),
            });

        let blocks = self
            .blocks
            .into_groups(self.sessions.len().max(1), |_, idx, columns| {
                block(columns, take_group(&mut workouts, idx))
            });

        (self.cicles, self.sessions, blocks)
    }

    fn session_groups(self) -> (Level<String, CicleColumns>, Vec<Vec<Session>>) {
        let (cicles, sessions, mut blocks) = self.block_groups();
        let sessions = sessions.into_groups(cicles.len().max(1), |_, idx, columns| {
            session(columns, take_group(&mut blocks, idx))
        });
        (cicles, sessions)
    }

    /// Cicles of a plan root, each with its full subtree
    pub(crate) fn into_cicles(self) -> Vec<Cicle> {
        let (cicles, mut sessions) = self.session_groups();
        let mut groups = cicles.into_groups(1, |_, idx, columns| {
            cicle(columns, take_group(&mut sessions, idx))
        });
        take_group(&mut groups, ROOT)
    }

    /// Sessions attached to the root (a cicle root)
    pub(crate) fn into_sessions(self) -> Vec<Session> {
        let (_, mut sessions) = self.session_groups();
        take_group(&mut sessions, ROOT)
    }

    /// Blocks attached to the root (a session root)
    pub(crate) fn into_blocks(self) -> Vec<SessionBlock> {
        let (_, _, mut blocks) = self.block_groups();
        take_group(&mut blocks, ROOT)
    }

    /// Exercises of a standalone workout root
    pub(crate) fn into_root_exercises(self, workout_id: &str) -> Vec<WorkoutExercise> {
        let mut groups = Self::exercise_groups(self.exercises, &[workout_id.to_owned()]);
        take_group(&mut groups, ROOT)
    }
}

fn workout_exercise(workout_id: String, columns: ExerciseColumns) -> WorkoutExercise {
    let catalog = columns.catalog.unwrap_or_else(|| {
        debug!(
            workout.id = %workout_id,
            exercise.id = %columns.exercise_id,
            "Workout references a missing catalog exercise"
        );
        Exercise {
            id: columns.exercise_id.clone(),
            name: String::new(),
            description: None,
            image_url: None,
            video_url: None,
        }
    });
    WorkoutExercise {
        workout_id,
        exercise_id: columns.exercise_id,
        position: columns.position,
        reps: columns.reps,
        weight: columns.weight,
        rest: columns.rest,
        notes: columns.notes,
        exercise_name: catalog.name,
        exercise_image_url: catalog.image_url.unwrap_or_default(),
        exercise_description: catalog.description,
        exercise_video_url: embed_or_passthrough(catalog.video_url),
    }
}

pub(crate) fn workout(link: LinkColumns, exercises: Vec<WorkoutExercise>) -> Workout {
    let workout_type = link.workout.workout_type();
    let columns = link.workout;
    Workout {
        id: columns.id,
        name: columns.name,
        description: columns.description,
        workout_type,
        workout_value: columns.workout_value,
        exercises,
    }
}

fn block(columns: BlockColumns, workouts: Vec<BlockWorkout>) -> SessionBlock {
    SessionBlock {
        id: columns.id,
        session_id: columns.session_id,
        name: columns.name,
        description: columns.description,
        video_url: embed_or_passthrough(columns.video_url),
        position: columns.position,
        workouts,
    }
}

pub(crate) fn session(columns: SessionColumns, blocks: Vec<SessionBlock>) -> Session {
    Session {
        id: columns.id,
        plan_id: columns.plan_id,
        cicle_id: columns.cicle_id,
        name: columns.name,
        description: columns.description,
        position: columns.position,
        image_url: columns.image_url,
        video_url: embed_or_passthrough(columns.video_url),
        blocks,
    }
}

pub(crate) fn cicle(columns: CicleColumns, sessions: Vec<Session>) -> Cicle {
    Cicle {
        id: columns.id,
        plan_id: columns.plan_id,
        name: columns.name,
        description: columns.description,
        position: columns.position,
        image_url: columns.image_url,
        video_url: embed_or_passthrough(columns.video_url),
        sessions,
    }
}
