// ABOUTME: Canonicalizes pasted video links into embeddable YouTube references
// ABOUTME: Used by attribute validation on writes and by hydration on reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Video reference normalization
//!
//! Coaches paste whatever link their browser shows (`watch?v=`, `youtu.be`,
//! `/embed/`, channel-scoped paths). The plan tree only ever stores and serves
//! `https://www.youtube.com/embed/<id>`.

use std::sync::OnceLock;

use regex::Regex;

use crate::constants::media::YOUTUBE_EMBED_PREFIX;

static YOUTUBE_ID: OnceLock<Option<Regex>> = OnceLock::new();

fn youtube_id_pattern() -> Option<&'static Regex> {
    YOUTUBE_ID
        .get_or_init(|| {
            Regex::new(
                r"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:[^/\n\s]+/\S+/|(?:v|e(?:mbed)?)/|\S*?[?&]v=)|youtu\.be/)([a-zA-Z0-9_-]{11})",
            )
            .ok()
        })
        .as_ref()
}

/// Extract the 11-character video id from a YouTube link
#[must_use]
pub fn youtube_video_id(link: &str) -> Option<&str> {
    let captures = youtube_id_pattern()?.captures(link.trim())?;
    captures.get(1).map(|m| m.as_str())
}

/// Convert a pasted link into its canonical embed URL
///
/// Returns `None` when the link is not a recognizable YouTube reference.
#[must_use]
pub fn normalize_video_url(link: &str) -> Option<String> {
    youtube_video_id(link).map(|id| format!("{YOUTUBE_EMBED_PREFIX}{id}"))
}

/// Normalize a stored reference for display, leaving unrecognized values untouched
#[must_use]
pub fn embed_or_passthrough(stored: Option<String>) -> Option<String> {
    stored.map(|value| normalize_video_url(&value).unwrap_or(value))
}
