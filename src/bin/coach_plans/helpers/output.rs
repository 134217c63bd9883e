// ABOUTME: Output formatting helpers for coach-plans
// ABOUTME: Prints command results to stdout and failures to stderr as pretty JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{Context, Result};
use coach_plans::errors::{AppError, ErrorResponse};
use serde::Serialize;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
    println!("{rendered}");
    Ok(())
}

/// Structured body for a failed command
///
/// Store and validation failures keep their code and context; anything else
/// is reported as an internal error with the full context chain.
pub fn error_response(error: &anyhow::Error) -> ErrorResponse {
    error.downcast_ref::<AppError>().map_or_else(
        || ErrorResponse::from(&AppError::internal(format!("{error:#}"))),
        ErrorResponse::from,
    )
}

/// Print a failed command as pretty JSON on stderr
pub fn print_error(error: &anyhow::Error) {
    let response = error_response(error);
    match serde_json::to_string_pretty(&response) {
        Ok(rendered) => eprintln!("{rendered}"),
        Err(_) => eprintln!("{error:#}"),
    }
}
