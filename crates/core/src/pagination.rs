//! Page arithmetic shared by song listings and verse listings.
//!
//! An empty collection has zero pages, but page 1 of it is still a valid
//! (empty) page. Any other page past the last one is out of range.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Requested page, 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    /// Number of items preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Resolve this request against a collection of `total_items`.
    pub fn window(&self, total_items: u64) -> Result<PageWindow, PageOutOfRange> {
        let total_pages = total_pages(total_items, self.limit);

        if self.page == 0 || u64::from(self.page) > total_pages.max(1) {
            return Err(PageOutOfRange {
                page: self.page,
                total_pages,
            });
        }

        let offset = self.offset();
        let end = (offset + u64::from(self.limit)).min(total_items);

        Ok(PageWindow {
            total_pages,
            offset,
            len: end.saturating_sub(offset),
        })
    }
}

/// The slice of a collection a valid [`PageRequest`] selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub total_pages: u64,
    pub offset: u64,
    /// Items on this page (0 only for the empty collection).
    pub len: u64,
}

impl PageWindow {
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// The requested page lies beyond the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Page {page} does not exist (total pages: {total_pages})")]
pub struct PageOutOfRange {
    pub page: u32,
    pub total_pages: u64,
}

/// `ceil(total_items / limit)`; zero items means zero pages.
pub fn total_pages(total_items: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(limit))
}
