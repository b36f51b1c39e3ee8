//! Fixed-size pagination with clamping.

use std::ops::Range;

use serde::Serialize;

/// Page size used by the station listing.
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Pagination metadata for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number actually served (after clamping).
    pub current_page: usize,
    /// Always at least 1, even for an empty result.
    pub total_pages: usize,
    pub total_count: usize,
    pub page_size: usize,
}

impl Pagination {
    /// Compute metadata for `total_count` items.
    ///
    /// A page size of zero is treated as one. Page numbers below 1 clamp to
    /// the first page and numbers past the end clamp to the last.
    pub fn new(total_count: usize, requested_page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_count.div_ceil(page_size).max(1);
        let current_page = requested_page.clamp(1, total_pages);

        Self {
            current_page,
            total_pages,
            total_count,
            page_size,
        }
    }

    /// Index range of the current page within the full list.
    pub fn range(&self) -> Range<usize> {
        let start = (self.current_page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.total_count);
        start.min(end)..end
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Slice one page out of `items`.
pub fn paginate<T>(mut items: Vec<T>, page: usize, page_size: usize) -> (Vec<T>, Pagination) {
    let pagination = Pagination::new(items.len(), page, page_size);
    let range = pagination.range();
    items.truncate(range.end);
    let page_items = items.split_off(range.start);
    (page_items, pagination)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Concatenating every page reproduces the input exactly
        #[test]
        fn pages_concatenate_to_input(len in 0usize..100, page_size in 1usize..20) {
            let items: Vec<usize> = (0..len).collect();
            let total_pages = Pagination::new(len, 1, page_size).total_pages;

            let mut rebuilt = Vec::new();
            for page in 1..=total_pages {
                let (chunk, p) = paginate(items.clone(), page, page_size);
                prop_assert_eq!(p.current_page, page);
                prop_assert!(chunk.len() <= page_size);
                rebuilt.extend(chunk);
            }

            prop_assert_eq!(rebuilt, items);
        }

        /// The served page is always within bounds
        #[test]
        fn current_page_in_bounds(len in 0usize..100, page in 0usize..50, page_size in 0usize..20) {
            let p = Pagination::new(len, page, page_size);
            prop_assert!(p.current_page >= 1);
            prop_assert!(p.current_page <= p.total_pages);
            prop_assert!(p.range().end <= len);
        }
    }
}
