// ABOUTME: Offset-based pagination for plan, exercise and workout listings
// ABOUTME: Converts 1-based page numbers to LIMIT/OFFSET and computes page counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Requested page of a listing (1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number, starting at 1
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl PageRequest {
    /// Create a page request; page 0 is treated as page 1
    #[must_use]
    pub const fn new(page: u32, per_page: u32) -> Self {
        let page = if page == 0 { 1 } else { page };
        Self { page, per_page }
    }

    /// SQL `LIMIT` value
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    /// SQL `OFFSET` value
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

/// One page of a listing plus its total page count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in this page
    pub items: Vec<T>,
    /// Page number that was served
    pub page: u32,
    /// Total number of pages for the same query
    pub total_pages: u32,
}

/// Number of pages needed for `total_items` rows at `per_page` rows per page
#[must_use]
pub fn total_pages(total_items: i64, per_page: u32) -> u32 {
    if per_page == 0 || total_items <= 0 {
        return 0;
    }
    let per_page = i64::from(per_page);
    let pages = (total_items + per_page - 1) / per_page;
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_for_first_and_third_page() {
        assert_eq!(PageRequest::new(1, 10).offset(), 0);
        assert_eq!(PageRequest::new(3, 10).offset(), 20);
        assert_eq!(PageRequest::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 0);
    }
}
