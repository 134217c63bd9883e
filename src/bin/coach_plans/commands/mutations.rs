// ABOUTME: Mutation commands for coach-plans
// ABOUTME: Handles duplicate-session and cascade delete of any subtree
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use coach_plans::database::{Database, SubtreeRoot};
use tracing::info;

use crate::helpers::output::print_json;

/// Copy a session at `position`, or after its last sibling
pub async fn duplicate_session(
    database: &Database,
    session_id: &str,
    position: Option<i64>,
) -> Result<()> {
    let duplicator = database.duplicator();
    let copy = match position {
        Some(position) => duplicator.duplicate_session(session_id, position).await?,
        None => duplicator.duplicate_session_at_end(session_id).await?,
    };
    info!(session.id = %copy.id, "Session copy created");
    print_json(&copy)
}

/// Delete a subtree addressed by kind and id
pub async fn delete(database: &Database, kind: &str, id: &str) -> Result<()> {
    let root = SubtreeRoot::from_kind(kind, id)?;
    let summary = database.deleter().delete_subtree(&root).await?;
    print_json(&serde_json::json!({
        "deleted": root.to_string(),
        "rows": summary,
        "total": summary.total(),
    }))
}
