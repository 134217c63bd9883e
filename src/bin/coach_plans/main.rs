// ABOUTME: coach-plans CLI - operator tool for inspecting and maintaining stored training plans
// ABOUTME: Bootstraps the schema, prints hydrated trees as JSON, duplicates sessions and deletes subtrees
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Create missing tables
//! coach-plans migrate
//!
//! # Print a plan with its full tree (or only its cicles)
//! coach-plans show-plan 3f2a...
//! coach-plans show-plan 3f2a... --shallow
//!
//! # Search plans by name or description
//! coach-plans list-plans --query fuerza --page 2
//!
//! # Print one session subtree
//! coach-plans show-session 9c1d...
//!
//! # Copy a session to position 4 of its cicle (or after the last one)
//! coach-plans duplicate-session 9c1d... --position 4
//!
//! # Delete a subtree: plan, cicle, session, block, or link <block_id>:<position>
//! coach-plans delete session 9c1d...
//! ```
//!
//! Failures are printed to stderr as an error JSON body and exit non-zero.

mod commands;
mod helpers;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use coach_plans::{
    config::{AppConfig, DatabaseUrl},
    database::Database,
    logging::LoggingConfig,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "coach-plans",
    about = "Training plan store maintenance CLI",
    long_about = "Inspect, duplicate and delete training plan hierarchies stored in SQLite. \
                  Results are printed to stdout as JSON; logs go to stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database URL override (defaults to `DATABASE_URL`)
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Create missing tables and indexes
    Migrate,

    /// Print a plan as JSON
    ShowPlan {
        /// Plan id
        plan_id: String,

        /// Only include the plan's cicles
        #[arg(long)]
        shallow: bool,
    },

    /// Search plans by name or description
    ListPlans {
        /// Free-text filter
        #[arg(long, default_value = "")]
        query: String,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Print one session with its blocks, workouts and exercises
    ShowSession {
        /// Session id
        session_id: String,
    },

    /// Deep-copy a session under the same cicle
    DuplicateSession {
        /// Source session id
        session_id: String,

        /// Position of the copy (defaults to after the last session)
        #[arg(long)]
        position: Option<i64>,
    },

    /// Delete a node and everything below it
    Delete {
        /// One of plan, cicle, session, block, link
        kind: String,

        /// Node id; links are addressed as `<block_id>:<position>`
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            helpers::output::print_error(&error);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        "debug".clone_into(&mut logging.level);
    }
    logging.init()?;

    let mut config = AppConfig::from_env()?;
    if let Some(url) = &cli.database_url {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }

    info!(database.url = %config.database.url, "Connecting to database");
    let database = Database::connect(&config.database, config.pagination)
        .await
        .with_context(|| format!("Cannot open {}", config.database.url))?;

    match cli.command {
        Command::Migrate => commands::plans::migrate(&database).await?,
        Command::ShowPlan { plan_id, shallow } => {
            commands::plans::show_plan(&database, &plan_id, shallow).await?;
        }
        Command::ListPlans { query, page } => {
            commands::plans::list_plans(&database, &query, page).await?;
        }
        Command::ShowSession { session_id } => {
            commands::plans::show_session(&database, &session_id).await?;
        }
        Command::DuplicateSession {
            session_id,
            position,
        } => {
            commands::mutations::duplicate_session(&database, &session_id, position).await?;
        }
        Command::Delete { kind, id } => {
            commands::mutations::delete(&database, &kind, &id).await?;
        }
    }

    Ok(())
}
