// ABOUTME: Structural checks applied to caller-supplied attributes before any store call
// ABOUTME: Trims text, enforces column limits, and canonicalizes media references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Input validation shared by every attribute constructor
//!
//! All functions here are pure. A failure is reported as an [`AppError`] in the
//! validation family (`InvalidInput`, `MissingRequiredField`,
//! `ValueOutOfRange`) so callers can reject a request without opening a
//! transaction.

use crate::constants::limits::MAX_TEXT_LENGTH;
use crate::errors::{AppError, AppResult};
use crate::media;

/// Trim a free-text attribute; blank becomes `None`
///
/// # Errors
///
/// Returns `ValueOutOfRange` when the trimmed value exceeds the column limit
///
/// # Examples
/// ```
/// # use coach_plans::validation::optional_text;
/// assert_eq!(optional_text("description", Some("  ".into())).unwrap(), None);
/// assert_eq!(optional_text("description", Some(" Legs ".into())).unwrap().as_deref(), Some("Legs"));
/// ```
pub fn optional_text(field: &str, value: Option<String>) -> AppResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_TEXT_LENGTH {
        return Err(AppError::out_of_range(
            field,
            format!("Field '{field}' must be at most {MAX_TEXT_LENGTH} characters"),
        ));
    }
    Ok(Some(trimmed.to_owned()))
}

/// Trim a required free-text attribute
///
/// # Errors
///
/// Returns `MissingRequiredField` when blank, `ValueOutOfRange` when too long
pub fn required_text(field: &str, value: Option<String>) -> AppResult<String> {
    optional_text(field, value)?.ok_or_else(|| AppError::missing_field(field))
}

/// Validate an uploaded image location
///
/// Image upload happens elsewhere; only the resulting absolute URL is accepted.
///
/// # Errors
///
/// Returns `InvalidInput` when the value is not an http(s) URL
pub fn image_url(value: Option<String>) -> AppResult<Option<String>> {
    let Some(url) = optional_text("image_url", value)? else {
        return Ok(None);
    };
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(Some(url))
    } else {
        Err(AppError::invalid_input("Image URL must be an absolute http(s) URL")
            .with_details(serde_json::json!({ "field": "image_url" })))
    }
}

/// Canonicalize a pasted video link into its embed form
///
/// # Errors
///
/// Returns `InvalidInput` when a non-blank link is not a recognizable video reference
pub fn video_url(value: Option<String>) -> AppResult<Option<String>> {
    let Some(link) = optional_text("video_url", value)? else {
        return Ok(None);
    };
    media::normalize_video_url(&link).map(Some).ok_or_else(|| {
        AppError::invalid_input(format!("Unrecognized video link: {link}"))
            .with_details(serde_json::json!({ "field": "video_url" }))
    })
}

/// Require a non-blank identifier
///
/// # Errors
///
/// Returns `MissingRequiredField` when the id is blank
pub fn identifier(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::missing_field(field));
    }
    Ok(trimmed.to_owned())
}

/// Require a non-negative position
///
/// # Errors
///
/// Returns `ValueOutOfRange` for negative positions
pub fn position(field: &str, value: i64) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::out_of_range(
            field,
            format!("Field '{field}' must not be negative (got {value})"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn test_required_text_rejects_blank() {
        let err = required_text("name", Some("   ".into())).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
        let err = required_text("name", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::MissingRequiredField);
    }

    #[test]
    fn test_text_longer_than_column_is_rejected() {
        let long = "x".repeat(MAX_TEXT_LENGTH + 1);
        let err = optional_text("notes", Some(long)).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
    }

    #[test]
    fn test_video_url_is_canonicalized() {
        let url = video_url(Some("https://youtu.be/dQw4w9WgXcQ".into())).unwrap();
        assert_eq!(
            url.as_deref(),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ")
        );
        assert_eq!(video_url(Some(String::new())).unwrap(), None);
        assert_eq!(
            video_url(Some("not a video".into())).unwrap_err().code,
            ErrorCode::InvalidInput
        );
    }

    #[test]
    fn test_image_url_must_be_absolute() {
        assert!(image_url(Some("https://cdn.example.com/a.png".into())).is_ok());
        assert!(image_url(Some("/tmp/a.png".into())).is_err());
    }

    #[test]
    fn test_position_and_identifier() {
        assert_eq!(position("position", 0).unwrap(), 0);
        assert!(position("position", -1).is_err());
        assert!(identifier("exercise_id", " ").is_err());
        assert_eq!(identifier("exercise_id", " abc ").unwrap(), "abc");
    }
}
