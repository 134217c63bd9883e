// ABOUTME: Integration tests for the exercise catalog and workout library store
// ABOUTME: Tests paged searches, exercise updates, workout list replacement and dangling references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use coach_plans::errors::ErrorCode;
use coach_plans::models::{
    NewExercise, NewWorkoutExercise, NodeDraft, WorkoutExerciseDraft, WorkoutType,
};
use common::{
    count_rows, create_exercise, create_test_database, exercise_rows, inject_failure, named,
    seed_plan, unnamed, workout_attributes,
};

#[tokio::test]
async fn test_exercise_names_are_sorted() {
    let database = create_test_database().await;
    for name in ["Remo", "Dominadas", "Peso muerto"] {
        create_exercise(&database, name).await;
    }

    let names: Vec<String> = database
        .catalog()
        .list_exercise_names()
        .await
        .unwrap()
        .into_iter()
        .map(|exercise| exercise.name)
        .collect();
    assert_eq!(names, vec!["Dominadas", "Peso muerto", "Remo"]);
}

#[tokio::test]
async fn test_search_exercises_pages_by_ten() {
    let database = create_test_database().await;
    for index in 0..23 {
        create_exercise(&database, &format!("Curl {index:02}")).await;
    }
    create_exercise(&database, "Plancha").await;
    let catalog = database.catalog();

    let page = catalog.search_exercises("curl", 3).await.unwrap();
    assert_eq!(page.page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.items.len(), 3);
    assert_eq!(page.items[0].name, "Curl 20");

    assert_eq!(catalog.exercise_pages("").await.unwrap(), 3);
    assert_eq!(catalog.exercise_pages("plancha").await.unwrap(), 1);
    assert_eq!(catalog.exercise_pages("nada").await.unwrap(), 0);
}

#[tokio::test]
async fn test_exercise_create_fetch_update() {
    let database = create_test_database().await;
    let catalog = database.catalog();
    let created = create_exercise(&database, "Zancada").await;

    let fetched = catalog.fetch_exercise(&created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);
    assert!(catalog.fetch_exercise("missing").await.unwrap().is_none());

    let update = NewExercise::new(NodeDraft {
        name: Some("Zancada búlgara".into()),
        description: Some("Pie trasero elevado".into()),
        image_url: None,
        video_url: Some("youtube.com/watch?v=dQw4w9WgXcQ".into()),
    })
    .unwrap();
    let updated = catalog.update_exercise(&created.id, &update).await.unwrap();
    assert_eq!(updated.name, "Zancada búlgara");
    assert_eq!(
        updated.video_url.as_deref(),
        Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
    );
    assert_eq!(
        catalog.fetch_exercise(&created.id).await.unwrap().unwrap(),
        updated
    );

    let err = catalog.update_exercise("missing", &update).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_update_workout_replaces_exercise_list() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 1).await;
    let catalog = database.catalog();
    let session = database
        .plans()
        .fetch_session(&seeded.sessions[0].id)
        .await
        .unwrap()
        .unwrap();
    let workout_id = session.blocks[0].workouts[0].workout.id.clone();
    let burpee = create_exercise(&database, "Burpee").await;

    let rows = NewWorkoutExercise::list(vec![
        WorkoutExerciseDraft {
            exercise_id: burpee.id.clone(),
            position: 4,
            reps: Some("15".into()),
            ..WorkoutExerciseDraft::default()
        },
        WorkoutExerciseDraft {
            exercise_id: seeded.exercises[1].id.clone(),
            position: 1,
            reps: Some("10".into()),
            notes: Some("Agarre cerrado".into()),
            ..WorkoutExerciseDraft::default()
        },
    ])
    .unwrap();

    let workout = catalog
        .update_workout(
            &workout_id,
            &workout_attributes("Metcon", "amrap", "12"),
            &rows,
        )
        .await
        .unwrap();
    assert_eq!(workout.name.as_deref(), Some("Metcon"));
    assert_eq!(workout.workout_type, WorkoutType::Amrap);
    assert_eq!(workout.workout_value.as_deref(), Some("12"));
    assert_eq!(
        workout
            .exercises
            .iter()
            .map(|e| (e.position, e.exercise_name.as_str()))
            .collect::<Vec<_>>(),
        vec![(1, "Press banca"), (4, "Burpee")]
    );
    assert_eq!(workout.exercises[0].notes.as_deref(), Some("Agarre cerrado"));
    assert_eq!(count_rows(&database, "workout_exercises").await, 2);
}

#[tokio::test]
async fn test_update_workout_rejects_unknown_exercise_before_writing() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 1).await;
    let session = database
        .plans()
        .fetch_session(&seeded.sessions[0].id)
        .await
        .unwrap()
        .unwrap();
    let original = session.blocks[0].workouts[0].workout.clone();

    let rows = NewWorkoutExercise::list(vec![WorkoutExerciseDraft {
        exercise_id: "missing".into(),
        position: 0,
        ..WorkoutExerciseDraft::default()
    }])
    .unwrap();
    let err = database
        .catalog()
        .update_workout(&original.id, &workout_attributes("X", "emom", "10"), &rows)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidInput);

    let unchanged = database
        .catalog()
        .fetch_workout(&original.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, original);
}

#[tokio::test]
async fn test_update_workout_is_atomic() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 1).await;
    let session = database
        .plans()
        .fetch_session(&seeded.sessions[0].id)
        .await
        .unwrap()
        .unwrap();
    let original = session.blocks[0].workouts[0].workout.clone();
    inject_failure(&database, "BEFORE INSERT", "workout_exercises").await;

    let refs: Vec<_> = seeded.exercises.iter().collect();
    let err = database
        .catalog()
        .update_workout(
            &original.id,
            &workout_attributes("Cambiado", "other", ""),
            &exercise_rows(&refs),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DatabaseError);

    let unchanged = database
        .catalog()
        .fetch_workout(&original.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(unchanged, original);
}

#[tokio::test]
async fn test_update_missing_workout_is_not_found() {
    let database = create_test_database().await;
    let err = database
        .catalog()
        .update_workout("missing", &workout_attributes("X", "rounds", "3"), &[])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_search_workouts_hydrates_each_workout() {
    let database = create_test_database().await;
    let store = database.plans();
    let squat = create_exercise(&database, "Sentadilla").await;
    let plan = store.create_plan(&named("Biblioteca")).await.unwrap();
    let cicle = store.add_cicle(&plan.id, &unnamed()).await.unwrap();
    let session = store.add_session(&cicle.id, &unnamed()).await.unwrap();
    let block = store.add_session_block(&session.id, &unnamed()).await.unwrap();

    for index in 0..12 {
        let link = store.add_block_workout(&block.id).await.unwrap();
        database
            .catalog()
            .update_workout(
                &link.workout.id,
                &workout_attributes(&format!("WOD {index:02}"), "rounds", "5"),
                &exercise_rows(&[&squat]),
            )
            .await
            .unwrap();
    }

    let catalog = database.catalog();
    let first = catalog.search_workouts("wod", 1).await.unwrap();
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].name.as_deref(), Some("WOD 00"));
    assert!(first.items.iter().all(|w| w.exercises.len() == 1));

    let second = catalog.search_workouts("wod", 2).await.unwrap();
    assert_eq!(
        second
            .items
            .iter()
            .map(|w| w.name.as_deref().unwrap_or_default())
            .collect::<Vec<_>>(),
        vec!["WOD 10", "WOD 11"]
    );
}

#[tokio::test]
async fn test_dangling_exercise_reference_hydrates_with_empty_fields() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 1).await;
    let removed = &seeded.exercises[0];

    // the in-memory pool has exactly one connection, so the pragma sticks
    sqlx::query("PRAGMA foreign_keys = OFF")
        .execute(database.pool())
        .await
        .unwrap();
    sqlx::query("DELETE FROM exercises WHERE id = $1")
        .bind(&removed.id)
        .execute(database.pool())
        .await
        .unwrap();

    let session = database
        .plans()
        .fetch_session(&seeded.sessions[0].id)
        .await
        .unwrap()
        .unwrap();
    let exercises = &session.blocks[0].workouts[0].workout.exercises;
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0].exercise_id, removed.id);
    assert_eq!(exercises[0].exercise_name, "");
    assert_eq!(exercises[0].exercise_image_url, "");
    assert_eq!(exercises[1].exercise_name, "Press banca");
}
