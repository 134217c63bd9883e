// ABOUTME: Domain constants for the training-plan engine
// ABOUTME: Page sizes, default child names, and service identifiers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped by domain rather than kept in one flat list.

/// Service identification used by structured logging
pub mod service_names {
    /// Name reported by the plan engine and its CLI
    pub const COACH_PLANS: &str = "coach-plans";
}

/// Listing page sizes
pub mod pagination {
    /// Plans shown per listing page
    pub const PLANS_PER_PAGE: u32 = 20;
    /// Exercises shown per catalog page
    pub const EXERCISES_PER_PAGE: u32 = 10;
    /// Workouts shown per library page
    pub const WORKOUTS_PER_PAGE: u32 = 10;
    /// Upper bound accepted for any configured page size
    pub const MAX_PAGE_SIZE: u32 = 200;
}

/// Name prefixes used when a child is added without a name
pub mod default_names {
    /// Prefix for cicles ("Ciclo 1", "Ciclo 2", ...)
    pub const CICLE_PREFIX: &str = "Ciclo";
    /// Prefix for sessions ("Día 1", "Día 2", ...)
    pub const SESSION_PREFIX: &str = "Día";
    /// Prefix for session blocks ("Bloque 1", ...)
    pub const BLOCK_PREFIX: &str = "Bloque";
}

/// Attribute length limits mirroring the `VARCHAR(255)` columns of the schema
pub mod limits {
    /// Maximum length of any free-text attribute
    pub const MAX_TEXT_LENGTH: usize = 255;
}

/// Canonical embed location for normalized video references
pub mod media {
    /// Prefix every normalized video reference starts with
    pub const YOUTUBE_EMBED_PREFIX: &str = "https://www.youtube.com/embed/";
}
