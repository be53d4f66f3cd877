//! Offset pagination and page metadata
//!
//! # Example
//!
//! ```rust
//! use roster_service::query::paginate;
//!
//! let page = paginate(1..=25, 2, 10);
//! assert_eq!(page.items(), &[11, 12, 13, 14, 15, 16, 17, 18, 19, 20]);
//! assert_eq!(page.meta().total_pages, 3);
//! assert!(page.meta().has_previous);
//! assert!(page.meta().has_next);
//! ```

use serde::{Deserialize, Serialize};

/// A window into an ordered sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of records to skip
    pub offset: u64,
    /// Maximum number of records to take
    pub limit: u32,
}

impl Pagination {
    /// Create a window from a raw offset and limit
    #[must_use]
    pub const fn new(offset: u64, limit: u32) -> Self {
        Self { offset, limit }
    }

    /// Create a window from a 1-indexed page number
    ///
    /// Page 0 is treated as page 1.
    ///
    /// # Example
    ///
    /// ```rust
    /// use roster_service::query::Pagination;
    ///
    /// let window = Pagination::page(3, 10);
    /// assert_eq!(window.offset, 20);
    /// assert_eq!(window.limit, 10);
    /// ```
    #[must_use]
    pub const fn page(page_number: u32, page_size: u32) -> Self {
        let skipped = page_number.saturating_sub(1) as u64;
        Self {
            offset: skipped * page_size as u64,
            limit: page_size,
        }
    }

    /// Apply this window to an iterator
    pub fn slice<I: IntoIterator>(&self, records: I) -> impl Iterator<Item = I::Item> {
        let skip = usize::try_from(self.offset).unwrap_or(usize::MAX);
        records.into_iter().skip(skip).take(self.limit as usize)
    }
}

/// Pagination metadata, written to the `X-Pagination` header
///
/// # Example
///
/// ```rust
/// use roster_service::query::PaginationMeta;
///
/// let meta = PaginationMeta::new(2, 20, 50);
/// assert_eq!(meta.total_pages, 3);
/// assert!(meta.has_next);
/// assert!(meta.has_previous);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Number of records matching the filter, across all pages
    pub total_count: u64,
    /// Number of records per page
    pub page_size: u32,
    /// Current page number (1-indexed)
    pub current_page: u32,
    /// Total number of pages
    pub total_pages: u32,
    /// Whether a previous page exists
    pub has_previous: bool,
    /// Whether a next page exists
    pub has_next: bool,
}

impl PaginationMeta {
    /// Create page metadata
    ///
    /// Derives `total_pages`, `has_previous` and `has_next`. A zero page size
    /// is treated as one.
    #[must_use]
    pub fn new(current_page: u32, page_size: u32, total_count: u64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = calculate_total_pages(total_count, page_size);

        Self {
            total_count,
            page_size,
            current_page,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}

/// Calculate total pages, rounding up
fn calculate_total_pages(total: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size);
    let pages = total.div_ceil(page_size);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of records plus its metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PagedResult<T> {
    items: Vec<T>,
    meta: PaginationMeta,
}

impl<T> PagedResult<T> {
    /// Create a paged result
    #[must_use]
    pub const fn new(items: Vec<T>, meta: PaginationMeta) -> Self {
        Self { items, meta }
    }

    /// Records on this page, in order
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Page metadata
    #[must_use]
    pub const fn meta(&self) -> &PaginationMeta {
        &self.meta
    }

    /// Number of records on this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check whether this page is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Convert the records, keeping the metadata
    ///
    /// # Example
    ///
    /// ```rust
    /// use roster_service::query::paginate;
    ///
    /// let page = paginate(vec![1, 2, 3], 1, 2).map(|n| n * 10);
    /// assert_eq!(page.items(), &[10, 20]);
    /// assert_eq!(page.meta().total_count, 3);
    /// ```
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// Split into records and metadata
    pub fn into_parts(self) -> (Vec<T>, PaginationMeta) {
        (self.items, self.meta)
    }
}

/// Paginate an already filtered and sorted sequence
///
/// The total count covers the whole sequence. A page past the end yields no
/// items while the metadata still reports the true totals.
pub fn paginate<T, I>(records: I, page_number: u32, page_size: u32) -> PagedResult<T>
where
    I: IntoIterator<Item = T>,
{
    let page_size = page_size.max(1);
    let window = Pagination::page(page_number, page_size);
    let skip = usize::try_from(window.offset).unwrap_or(usize::MAX);

    let take = usize::try_from(page_size).unwrap_or(usize::MAX);

    let mut total: u64 = 0;
    let mut items = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        total += 1;
        if index >= skip && items.len() < take {
            items.push(record);
        }
    }

    PagedResult::new(items, PaginationMeta::new(page_number, page_size, total))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_page() {
        assert_eq!(Pagination::page(1, 10), Pagination::new(0, 10));
        assert_eq!(Pagination::page(4, 25), Pagination::new(75, 25));
        assert_eq!(Pagination::page(0, 10), Pagination::new(0, 10));
    }

    #[test]
    fn test_pagination_slice() {
        let window = Pagination::page(2, 3);
        let sliced: Vec<_> = window.slice(1..=10).collect();
        assert_eq!(sliced, vec![4, 5, 6]);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(PaginationMeta::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(1, 10, 1).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(1, 10, 11).total_pages, 2);
        assert_eq!(PaginationMeta::new(1, 10, 25).total_pages, 3);
    }

    #[test]
    fn test_zero_page_size_is_guarded() {
        let meta = PaginationMeta::new(1, 0, 5);
        assert_eq!(meta.page_size, 1);
        assert_eq!(meta.total_pages, 5);
    }

    #[test]
    fn test_huge_page_size_holds_only_present_records() {
        let page = paginate(vec![[0_u8; 256]; 3], 1, u32::MAX);
        assert_eq!(page.len(), 3);
        assert_eq!(page.meta().total_count, 3);
        assert_eq!(page.meta().total_pages, 1);
        assert!(!page.meta().has_next);
    }

    #[test]
    fn test_empty_result_has_no_neighbours() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert!(!meta.has_previous);
        assert!(!meta.has_next);
    }

    #[test]
    fn test_meta_serializes_camel_case() {
        let json = serde_json::to_value(PaginationMeta::new(2, 10, 25)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "totalCount": 25,
                "pageSize": 10,
                "currentPage": 2,
                "totalPages": 3,
                "hasPrevious": true,
                "hasNext": true
            })
        );
    }

    #[test]
    fn test_paginate_middle_page() {
        let page = paginate(1..=25, 2, 10);
        assert_eq!(page.items(), (11..=20).collect::<Vec<_>>().as_slice());
        assert_eq!(page.meta().total_count, 25);
        assert_eq!(page.meta().current_page, 2);
        assert!(page.meta().has_previous);
        assert!(page.meta().has_next);
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let page = paginate(1..=25, 3, 10);
        assert_eq!(page.items(), &[21, 22, 23, 24, 25]);
        assert!(!page.meta().has_next);
    }

    #[test]
    fn test_page_beyond_end_reports_true_totals() {
        let page = paginate(1..=25, 9, 10);
        assert!(page.is_empty());
        assert_eq!(page.meta().total_count, 25);
        assert_eq!(page.meta().total_pages, 3);
        assert_eq!(page.meta().current_page, 9);
        assert!(page.meta().has_previous);
        assert!(!page.meta().has_next);
    }

    #[test]
    fn test_concatenated_pages_equal_input() {
        let input: Vec<u32> = (1..=23).collect();
        let mut collected = Vec::new();
        for page_number in 1..=3 {
            collected.extend(paginate(input.clone(), page_number, 10).into_parts().0);
        }
        assert_eq!(collected, input);
    }

    #[test]
    fn test_map_keeps_meta() {
        let page = paginate(vec!["a", "b", "c"], 1, 2);
        let meta = *page.meta();
        let mapped = page.map(str::to_uppercase);
        assert_eq!(mapped.items(), &["A".to_string(), "B".to_string()]);
        assert_eq!(mapped.meta(), &meta);
        assert_eq!(mapped.len(), 2);
    }
}
