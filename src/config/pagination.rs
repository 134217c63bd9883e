// ABOUTME: Page-size configuration for plan, exercise and workout listings
// ABOUTME: Defaults match the editor's listing pages and can be overridden per environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::database::parse_env;
use crate::constants::pagination::{
    EXERCISES_PER_PAGE, MAX_PAGE_SIZE, PLANS_PER_PAGE, WORKOUTS_PER_PAGE,
};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Listing page sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Plans per listing page
    pub plans_per_page: u32,
    /// Exercises per catalog page
    pub exercises_per_page: u32,
    /// Workouts per library page
    pub workouts_per_page: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            plans_per_page: PLANS_PER_PAGE,
            exercises_per_page: EXERCISES_PER_PAGE,
            workouts_per_page: WORKOUTS_PER_PAGE,
        }
    }
}

impl PaginationConfig {
    /// Load page sizes from `PLANS_PER_PAGE`, `EXERCISES_PER_PAGE`, `WORKOUTS_PER_PAGE`
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a zero or oversized page
    pub fn from_env() -> AppResult<Self> {
        let config = Self {
            plans_per_page: parse_env("PLANS_PER_PAGE", PLANS_PER_PAGE)?,
            exercises_per_page: parse_env("EXERCISES_PER_PAGE", EXERCISES_PER_PAGE)?,
            workouts_per_page: parse_env("WORKOUTS_PER_PAGE", WORKOUTS_PER_PAGE)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every page size is within `1..=MAX_PAGE_SIZE`
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` naming the offending setting
    pub fn validate(&self) -> AppResult<()> {
        for (field, value) in [
            ("plans_per_page", self.plans_per_page),
            ("exercises_per_page", self.exercises_per_page),
            ("workouts_per_page", self.workouts_per_page),
        ] {
            if value == 0 || value > MAX_PAGE_SIZE {
                return Err(AppError::out_of_range(
                    field,
                    format!("{field} must be between 1 and {MAX_PAGE_SIZE} (got {value})"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PaginationConfig::default();
        assert_eq!(config.plans_per_page, 20);
        assert_eq!(config.exercises_per_page, 10);
        assert_eq!(config.workouts_per_page, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let config = PaginationConfig {
            plans_per_page: 0,
            ..PaginationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
