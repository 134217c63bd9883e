// ABOUTME: Integration tests for file-backed databases and schema bootstrap
// ABOUTME: Tests that the schema is created once, is idempotent and that data survives reconnects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use coach_plans::config::{DatabaseConfig, DatabaseUrl, PaginationConfig};
use coach_plans::database::Database;
use common::{init_test_logging, seed_plan};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> DatabaseConfig {
    DatabaseConfig {
        url: DatabaseUrl::SQLite {
            path: dir.path().join("coach.db"),
        },
        max_connections: 4,
        auto_migrate: true,
    }
}

#[tokio::test]
async fn test_plan_survives_reconnect() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let config = file_config(&dir);

    let plan_id = {
        let database = Database::connect(&config, PaginationConfig::default())
            .await
            .unwrap();
        let seeded = seed_plan(&database, 2).await;
        database.pool().close().await;
        seeded.plan.id
    };

    let database = Database::connect(&config, PaginationConfig::default())
        .await
        .unwrap();
    // bootstrap is idempotent
    database.migrate().await.unwrap();

    let plan = database
        .plans()
        .fetch_plan_tree(&plan_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(plan.session_count(), 2);
}

#[tokio::test]
async fn test_foreign_keys_are_enforced_on_pooled_connections() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let database = Database::connect(&file_config(&dir), PaginationConfig::default())
        .await
        .unwrap();

    let result = sqlx::query("INSERT INTO cicles (plan_id, name, position) VALUES ('nope', 'x', 0)")
        .execute(database.pool())
        .await;
    assert!(result.is_err());
}
