// ABOUTME: Integration tests for the RAII transaction guard
// ABOUTME: Tests commit, explicit rollback, rollback on drop and the rollback log event
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

// Test files: allow missing_docs (rustc lint) and unwrap (valid in tests)
#![allow(missing_docs, clippy::unwrap_used)]

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use coach_plans::database::{Database, SqliteTransactionGuard};
use common::{count_rows, create_test_database, seed_plan};

/// Log sink shared between the subscriber and the test
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

async fn insert_plan(guard: &mut SqliteTransactionGuard, name: &str) {
    sqlx::query("INSERT INTO plans (name) VALUES ($1)")
        .bind(name)
        .execute(guard.executor().unwrap())
        .await
        .unwrap();
}

async fn begin(database: &Database) -> SqliteTransactionGuard {
    SqliteTransactionGuard::begin(database.pool(), "test")
        .await
        .unwrap()
}

#[tokio::test]
async fn test_commit_persists_changes() {
    let database = create_test_database().await;
    let mut guard = begin(&database).await;
    insert_plan(&mut guard, "Committed").await;
    assert!(!guard.is_committed());
    guard.commit().await.unwrap();

    assert_eq!(count_rows(&database, "plans").await, 1);
}

#[tokio::test]
async fn test_explicit_rollback_discards_changes() {
    let database = create_test_database().await;
    let mut guard = begin(&database).await;
    insert_plan(&mut guard, "Rolled back").await;
    guard.rollback().await.unwrap();

    assert_eq!(count_rows(&database, "plans").await, 0);
}

#[tokio::test]
async fn test_drop_without_commit_rolls_back() {
    let database = create_test_database().await;
    {
        let mut guard = begin(&database).await;
        insert_plan(&mut guard, "Dropped").await;
    }

    assert_eq!(count_rows(&database, "plans").await, 0);
}

#[tokio::test]
async fn test_failed_future_rolls_back_earlier_statements() {
    let database = create_test_database().await;
    let result: Result<(), sqlx::Error> = async {
        let mut guard = begin(&database).await;
        insert_plan(&mut guard, "First").await;
        // cicles.plan_id must reference an existing plan
        sqlx::query("INSERT INTO cicles (plan_id, name, position) VALUES ('nope', 'x', 0)")
            .execute(guard.executor().unwrap())
            .await?;
        guard.commit().await.unwrap();
        Ok(())
    }
    .await;

    assert!(result.is_err());
    assert_eq!(count_rows(&database, "plans").await, 0);
    assert_eq!(count_rows(&database, "cicles").await, 0);
}

#[tokio::test]
async fn test_failed_mutation_logs_rollback_warning() {
    let database = create_test_database().await;
    let seeded = seed_plan(&database, 2).await;

    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _default = tracing::subscriber::set_default(subscriber);

    // position 1 is taken by the second session
    let result = database
        .duplicator()
        .duplicate_session(&seeded.sessions[0].id, 1)
        .await;
    assert!(result.is_err());

    let output = logs.contents();
    assert!(output.contains("WARN"));
    assert!(output.contains("rolling back"));
    assert!(output.contains("duplicate_session"));
}
