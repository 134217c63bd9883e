// ABOUTME: Database configuration types for the SQLite plan store
// ABOUTME: Parses DATABASE_URL and pool settings from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;

/// Default pool size for file-backed databases
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Type-safe database location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// `SQLite` database with file path
    SQLite {
        /// Path to `SQLite` database file
        path: PathBuf,
    },
    /// In-memory `SQLite` (for testing)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    ///
    /// `sqlite:<path>` and `sqlite::memory:` are recognized; any other
    /// non-empty value is treated as a file path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for an empty value or a non-SQLite scheme
    pub fn parse_url(s: &str) -> AppResult<Self> {
        let s = s.trim();
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            let path_str = path_str.trim_start_matches("//");
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else if path_str.is_empty() {
                Err(invalid_config("DATABASE_URL has no path"))
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Err(invalid_config("Only SQLite databases are supported"))
        } else if s.is_empty() {
            Err(invalid_config("DATABASE_URL is empty"))
        } else {
            // Fallback: treat as SQLite file path
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".into(),
        }
    }

    /// Check if this is an in-memory database
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/coach.db"),
        }
    }
}

impl Display for DatabaseUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_connection_string())
    }
}

/// Database connection and bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database location
    pub url: DatabaseUrl,
    /// Maximum pooled connections; forced to 1 for in-memory databases
    pub max_connections: u32,
    /// Create missing tables on connect
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DatabaseUrl::default(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for an explicit URL with default pool settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the URL cannot be parsed
    pub fn for_url(url: &str) -> AppResult<Self> {
        Ok(Self {
            url: DatabaseUrl::parse_url(url)?,
            ..Self::default()
        })
    }

    /// Load database configuration from environment
    ///
    /// # Errors
    ///
    /// Returns an error if database environment variables are invalid
    pub fn from_env() -> AppResult<Self> {
        let url = match env::var("DATABASE_URL") {
            Ok(value) => DatabaseUrl::parse_url(&value)?,
            Err(_) => DatabaseUrl::default(),
        };
        Ok(Self {
            url,
            max_connections: parse_env("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            auto_migrate: parse_env("DATABASE_AUTO_MIGRATE", true)?,
        })
    }

    /// Pool size to actually use
    ///
    /// Every connection to `sqlite::memory:` opens a distinct database, so an
    /// in-memory pool is pinned to one connection.
    #[must_use]
    pub const fn effective_max_connections(&self) -> u32 {
        if self.url.is_memory() || self.max_connections == 0 {
            1
        } else {
            self.max_connections
        }
    }
}

/// Read and parse an environment variable, falling back to a default when unset
///
/// # Errors
///
/// Returns `ConfigInvalid` when the variable is set but does not parse
pub(crate) fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| invalid_config(format!("Invalid {key} value '{raw}': {e}"))),
        Err(_) => Ok(default),
    }
}

fn invalid_config(message: impl Into<String>) -> AppError {
    AppError::new(crate::errors::ErrorCode::ConfigInvalid, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sqlite_urls() {
        assert_eq!(
            DatabaseUrl::parse_url("sqlite::memory:").unwrap(),
            DatabaseUrl::Memory
        );
        assert_eq!(
            DatabaseUrl::parse_url("sqlite:./data/plans.db").unwrap(),
            DatabaseUrl::SQLite {
                path: PathBuf::from("./data/plans.db")
            }
        );
        assert_eq!(
            DatabaseUrl::parse_url("/var/lib/coach.db")
                .unwrap()
                .to_connection_string(),
            "sqlite:/var/lib/coach.db"
        );
    }

    #[test]
    fn test_rejects_unsupported_urls() {
        assert!(DatabaseUrl::parse_url("postgres://localhost/coach").is_err());
        assert!(DatabaseUrl::parse_url("  ").is_err());
        assert!(DatabaseUrl::parse_url("sqlite:").is_err());
    }

    #[test]
    fn test_memory_pool_is_single_connection() {
        let config = DatabaseConfig {
            url: DatabaseUrl::Memory,
            max_connections: 8,
            auto_migrate: true,
        };
        assert_eq!(config.effective_max_connections(), 1);
    }
}
