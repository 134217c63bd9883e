// ABOUTME: Integration tests for the plan store
// ABOUTME: Tests hydrated fetches, paged listing, ordered appends, default names and attribute updates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use coach_plans::errors::ErrorCode;
use coach_plans::models::{NodeAttributes, NodeDraft, WorkoutType};
use common::{create_test_database, named, seed_plan, unnamed};

#[tokio::test]
async fn test_fetch_missing_nodes_is_none() {
    let database = create_test_database().await;
    let store = database.plans();

    assert!(store.fetch_plan("missing").await.unwrap().is_none());
    assert!(store.fetch_plan_tree("missing").await.unwrap().is_none());
    assert!(store.fetch_cicle("missing").await.unwrap().is_none());
    assert!(store.fetch_session("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_empty_plan_has_no_ghost_cicles() {
    let database = create_test_database().await;
    let store = database.plans();
    let plan = store.create_plan(&named("Vacío")).await.unwrap();

    let tree = store.fetch_plan_tree(&plan.id).await.unwrap().unwrap();
    assert_eq!(tree.name, "Vacío");
    assert!(tree.cicles.is_empty());

    let cicle = store.add_cicle(&plan.id, &unnamed()).await.unwrap();
    let tree = store.fetch_plan_tree(&plan.id).await.unwrap().unwrap();
    assert_eq!(tree.cicles.len(), 1);
    assert_eq!(tree.cicles[0].id, cicle.id);
    assert!(tree.cicles[0].sessions.is_empty());
}

#[tokio::test]
async fn test_plan_tree_is_fully_hydrated_in_order() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 2).await;

    let tree = database
        .plans()
        .fetch_plan_tree(&seeded.plan.id)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(tree.cicles.len(), 1);
    let sessions = &tree.cicles[0].sessions;
    assert_eq!(sessions.len(), 2);
    assert_eq!(
        sessions.iter().map(|s| s.position).collect::<Vec<_>>(),
        vec![0, 1]
    );
    for session in sessions {
        assert_eq!(session.blocks.len(), 1);
        let block = &session.blocks[0];
        assert_eq!(block.workouts.len(), 1);
        let workout = &block.workouts[0].workout;
        assert_eq!(workout.workout_type, WorkoutType::Rounds);
        assert_eq!(
            workout
                .exercises
                .iter()
                .map(|e| e.exercise_name.as_str())
                .collect::<Vec<_>>(),
            vec!["Sentadilla", "Press banca"]
        );
    }
    assert_eq!(tree.session_count(), 2);
}

#[tokio::test]
async fn test_shallow_fetch_stops_at_cicles() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 1).await;

    let plan = database
        .plans()
        .fetch_plan(&seeded.plan.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.cicles.len(), 1);
    assert!(plan.cicles[0].sessions.is_empty());
}

#[tokio::test]
async fn test_fetch_cicle_and_session_match_plan_tree() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 2).await;
    let store = database.plans();

    let tree = store.fetch_plan_tree(&seeded.plan.id).await.unwrap().unwrap();
    let cicle = store.fetch_cicle(&seeded.cicle.id).await.unwrap().unwrap();
    assert_eq!(cicle, tree.cicles[0]);

    let session = store
        .fetch_session(&seeded.sessions[1].id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(session, tree.cicles[0].sessions[1]);
}

#[tokio::test]
async fn test_appends_use_next_position_and_default_names() {
    let database = create_test_database().await;
    let store = database.plans();
    let plan = store.create_plan(&named("Resistencia")).await.unwrap();

    let first = store.add_cicle(&plan.id, &unnamed()).await.unwrap();
    let second = store.add_cicle(&plan.id, &named("Pico")).await.unwrap();
    let third = store.add_cicle(&plan.id, &unnamed()).await.unwrap();
    assert_eq!((first.position, second.position, third.position), (0, 1, 2));
    assert_eq!(first.name, "Ciclo 1");
    assert_eq!(second.name, "Pico");
    assert_eq!(third.name, "Ciclo 3");

    let session = store.add_session(&first.id, &unnamed()).await.unwrap();
    assert_eq!(session.name, "Día 1");
    assert_eq!(session.plan_id, plan.id);
    assert_eq!(session.cicle_id.as_deref(), Some(first.id.as_str()));

    let block = store.add_session_block(&session.id, &unnamed()).await.unwrap();
    let other = store.add_session_block(&session.id, &unnamed()).await.unwrap();
    assert_eq!(block.name, "Bloque 1");
    assert_eq!((block.position, other.name.as_str()), (0, "Bloque 2"));

    let link = store.add_block_workout(&block.id).await.unwrap();
    let next = store.add_block_workout(&block.id).await.unwrap();
    assert_eq!((link.position, next.position), (0, 1));
    assert_eq!(link.workout.workout_type, WorkoutType::Rounds);
    assert_ne!(link.workout.id, next.workout.id);
}

#[tokio::test]
async fn test_append_after_gap_does_not_reuse_positions() {
    let database = create_test_database().await;
    let store = database.plans();
    let plan = store.create_plan(&named("Huecos")).await.unwrap();
    let cicle = store.add_cicle(&plan.id, &unnamed()).await.unwrap();
    for _ in 0..3 {
        store.add_session(&cicle.id, &unnamed()).await.unwrap();
    }
    let tree = store.fetch_cicle(&cicle.id).await.unwrap().unwrap();
    database
        .deleter()
        .delete_subtree(&coach_plans::database::SubtreeRoot::Session(
            tree.sessions[1].id.clone(),
        ))
        .await
        .unwrap();

    let appended = store.add_session(&cicle.id, &unnamed()).await.unwrap();
    assert_eq!(appended.position, 3);
    // two siblings remain, so the default ordinal is 3
    assert_eq!(appended.name, "Día 3");

    let positions: Vec<i64> = store
        .fetch_cicle(&cicle.id)
        .await
        .unwrap()
        .unwrap()
        .sessions
        .iter()
        .map(|s| s.position)
        .collect();
    assert_eq!(positions, vec![0, 2, 3]);
}

#[tokio::test]
async fn test_appends_to_missing_parents_fail_with_not_found() {
    let database = create_test_database().await;
    let store = database.plans();

    let err = store.add_cicle("missing", &unnamed()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    let err = store.add_session("missing", &unnamed()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    let err = store.add_session_block("missing", &unnamed()).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
    let err = store.add_block_workout("missing").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_create_plan_requires_a_name() {
    let database = create_test_database().await;
    let err = database
        .plans()
        .create_plan(&unnamed())
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::MissingRequiredField);
}

#[tokio::test]
async fn test_updates_replace_attributes_and_keep_blank_names() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 1).await;
    let store = database.plans();

    let attributes = NodeAttributes::child(NodeDraft {
        name: Some("   ".into()),
        description: Some("Semana de carga".into()),
        image_url: Some("https://cdn.example.com/cicle.png".into()),
        video_url: Some("https://youtu.be/dQw4w9WgXcQ".into()),
    })
    .unwrap();
    let updated = store
        .update_cicle(&seeded.cicle.id, &attributes)
        .await
        .unwrap();
    assert_eq!(updated.name(), Some("Ciclo 1"));
    assert_eq!(updated.description(), Some("Semana de carga"));

    let cicle = store.fetch_cicle(&seeded.cicle.id).await.unwrap().unwrap();
    assert_eq!(cicle.name, "Ciclo 1");
    assert_eq!(
        cicle.video_url.as_deref(),
        Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
    );
    assert_eq!(
        cicle.image_url.as_deref(),
        Some("https://cdn.example.com/cicle.png")
    );

    let renamed = store
        .update_plan(&seeded.plan.id, &named("Fuerza avanzada"))
        .await
        .unwrap();
    assert_eq!(renamed.name(), Some("Fuerza avanzada"));

    let session = &seeded.sessions[0];
    let updated = store
        .update_session(&session.id, &named("Día pesado"))
        .await
        .unwrap();
    assert_eq!(updated.name(), Some("Día pesado"));

    let tree = store.fetch_session(&session.id).await.unwrap().unwrap();
    let block_id = tree.blocks[0].id.clone();
    let updated = store
        .update_session_block(&block_id, &attributes)
        .await
        .unwrap();
    assert_eq!(updated.name(), Some("Bloque 1"));
    assert_eq!(updated.image_url(), None);
}

#[tokio::test]
async fn test_update_missing_node_is_not_found() {
    let database = create_test_database().await;
    let err = database
        .plans()
        .update_session("missing", &named("X"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ResourceNotFound);
}

#[tokio::test]
async fn test_list_plans_pages_and_filters() {
    let database = create_test_database().await;
    let store = database.plans();
    for index in 0..25 {
        store
            .create_plan(&named(&format!("Plan {index:02}")))
            .await
            .unwrap();
    }
    store.create_plan(&named("Movilidad 100%")).await.unwrap();

    let first = store.list_plans("plan", 1).await.unwrap();
    assert_eq!(first.items.len(), 20);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.items[0].name, "Plan 00");

    let second = store.list_plans("plan", 2).await.unwrap();
    assert_eq!(second.items.len(), 5);
    assert_eq!(second.items[4].name, "Plan 24");

    let literal = store.list_plans("100%", 1).await.unwrap();
    assert_eq!(literal.items.len(), 1);
    assert_eq!(literal.items[0].name, "Movilidad 100%");

    let everything = store.list_plans("", 1).await.unwrap();
    assert_eq!(everything.total_pages, 2);
}

#[tokio::test]
async fn test_workout_linked_from_two_blocks_hydrates_once() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 1).await;
    let store = database.plans();
    let session_id = seeded.sessions[0].id.clone();

    let session = store.fetch_session(&session_id).await.unwrap().unwrap();
    let workout_id = session.blocks[0].workouts[0].workout.id.clone();
    let second = store.add_session_block(&session_id, &unnamed()).await.unwrap();
    sqlx::query(
        "INSERT INTO session_blocks_workouts (session_block_id, workout_id, position) \
         VALUES ($1, $2, 0)",
    )
    .bind(&second.id)
    .bind(&workout_id)
    .execute(database.pool())
    .await
    .unwrap();

    let session = store.fetch_session(&session_id).await.unwrap().unwrap();
    let per_block: Vec<usize> = session.blocks.iter().map(|b| b.workouts.len()).collect();
    assert_eq!(per_block, vec![1, 0]);
    assert_eq!(session.blocks[0].workouts[0].workout.id, workout_id);
    assert_eq!(session.blocks[0].workouts[0].workout.exercises.len(), 2);
}
