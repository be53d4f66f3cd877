//! Request parameters for list operations
//!
//! [`QueryParameters`] carries the paging, ordering and field selection a
//! client asked for. Out-of-range values are clamped as they are set, so a
//! constructed value is always within bounds.
//!
//! # Example
//!
//! ```rust
//! use roster_service::query::{QueryParameters, MAX_PAGE_SIZE};
//!
//! let params = QueryParameters::default()
//!     .with_page_number(2)
//!     .with_page_size(500)
//!     .with_order_by("name desc");
//!
//! assert_eq!(params.page_number(), 2);
//! assert_eq!(params.page_size(), MAX_PAGE_SIZE);
//! assert_eq!(params.offset(), 50);
//! ```

use serde::{Deserialize, Serialize};

use super::page::Pagination;

/// Default number of records per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Maximum allowed records per page
pub const MAX_PAGE_SIZE: u32 = 50;

/// Paging, ordering and field selection for one request
///
/// Deserializes from `pageNumber`, `pageSize`, `orderBy` and `fields`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawQueryParameters", rename_all = "camelCase")]
pub struct QueryParameters {
    page_number: u32,
    page_size: u32,
    order_by: String,
    fields: String,
}

impl Default for QueryParameters {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            order_by: String::new(),
            fields: String::new(),
        }
    }
}

impl QueryParameters {
    /// Create parameters with the defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page number (values below 1 become 1)
    #[must_use]
    pub fn with_page_number(mut self, page_number: u32) -> Self {
        self.page_number = page_number.max(1);
        self
    }

    /// Set the page size (clamped to `1..=MAX_PAGE_SIZE`)
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// Set the sort string, e.g. `"name desc, age"`
    #[must_use]
    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = order_by.into();
        self
    }

    /// Set the field selection, e.g. `"name,age"`
    #[must_use]
    pub fn with_fields(mut self, fields: impl Into<String>) -> Self {
        self.fields = fields.into();
        self
    }

    /// Current page number (1-indexed)
    #[must_use]
    pub const fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Records per page
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Raw sort string
    #[must_use]
    pub fn order_by(&self) -> &str {
        &self.order_by
    }

    /// Raw field selection
    #[must_use]
    pub fn fields(&self) -> &str {
        &self.fields
    }

    /// Number of records skipped before this page
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.pagination().offset
    }

    /// The page window these parameters describe
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        Pagination::page(self.page_number, self.page_size)
    }
}

/// Wire form of [`QueryParameters`], before clamping
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawQueryParameters {
    page_number: Option<u32>,
    page_size: Option<u32>,
    order_by: Option<String>,
    fields: Option<String>,
}

impl RawQueryParameters {
    pub(crate) fn new(
        page_number: Option<u32>,
        page_size: Option<u32>,
        order_by: Option<String>,
        fields: Option<String>,
    ) -> Self {
        Self {
            page_number,
            page_size,
            order_by,
            fields,
        }
    }
}

impl From<RawQueryParameters> for QueryParameters {
    fn from(raw: RawQueryParameters) -> Self {
        Self::default()
            .with_page_number(raw.page_number.unwrap_or(1))
            .with_page_size(raw.page_size.unwrap_or(DEFAULT_PAGE_SIZE))
            .with_order_by(raw.order_by.unwrap_or_default())
            .with_fields(raw.fields.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = QueryParameters::default();
        assert_eq!(params.page_number(), 1);
        assert_eq!(params.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.order_by(), "");
        assert_eq!(params.fields(), "");
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_page_size_is_clamped() {
        assert_eq!(QueryParameters::new().with_page_size(500).page_size(), MAX_PAGE_SIZE);
        assert_eq!(QueryParameters::new().with_page_size(0).page_size(), 1);
        assert_eq!(QueryParameters::new().with_page_size(25).page_size(), 25);
    }

    #[test]
    fn test_page_number_is_clamped() {
        assert_eq!(QueryParameters::new().with_page_number(0).page_number(), 1);
    }

    #[test]
    fn test_offset() {
        let params = QueryParameters::new().with_page_number(3).with_page_size(20);
        assert_eq!(params.offset(), 40);
        assert_eq!(params.pagination(), Pagination::new(40, 20));
    }

    #[test]
    fn test_deserialize_camel_case_and_clamp() {
        let params: QueryParameters = serde_json::from_value(serde_json::json!({
            "pageNumber": 2,
            "pageSize": 100,
            "orderBy": "name desc",
            "fields": "name,age"
        }))
        .unwrap();

        assert_eq!(params.page_number(), 2);
        assert_eq!(params.page_size(), MAX_PAGE_SIZE);
        assert_eq!(params.order_by(), "name desc");
        assert_eq!(params.fields(), "name,age");
    }

    #[test]
    fn test_deserialize_missing_uses_defaults() {
        let params: QueryParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(params, QueryParameters::default());
    }
}
