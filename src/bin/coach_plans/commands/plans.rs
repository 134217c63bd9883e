// ABOUTME: Inspection commands for coach-plans
// ABOUTME: Handles migrate, show-plan, list-plans and show-session
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use coach_plans::database::Database;
use coach_plans::errors::AppError;
use tracing::info;

use crate::helpers::output::print_json;

/// Create missing tables
pub async fn migrate(database: &Database) -> Result<()> {
    database.migrate().await?;
    info!("Schema is up to date");
    print_json(&serde_json::json!({ "migrated": true }))
}

/// Print a plan, either shallow (cicles only) or the full tree
pub async fn show_plan(database: &Database, plan_id: &str, shallow: bool) -> Result<()> {
    let store = database.plans();
    let plan = if shallow {
        store.fetch_plan(plan_id).await?
    } else {
        store.fetch_plan_tree(plan_id).await?
    };
    let Some(plan) = plan else {
        return Err(AppError::not_found(format!("Plan {plan_id}"))
            .with_resource_id(plan_id)
            .into());
    };
    print_json(&plan)
}

/// Print one page of a plan search
pub async fn list_plans(database: &Database, query: &str, page: u32) -> Result<()> {
    let listing = database.plans().list_plans(query, page).await?;
    print_json(&listing)
}

/// Print a session subtree
pub async fn show_session(database: &Database, session_id: &str) -> Result<()> {
    match database.plans().fetch_session(session_id).await? {
        Some(session) => print_json(&session),
        None => Err(AppError::not_found(format!("Session {session_id}"))
            .with_resource_id(session_id)
            .into()),
    }
}
