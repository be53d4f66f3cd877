//! Filter → sort → page, as one reusable query
//!
//! A [`QueryPipeline`] holds the compiled filter, the ordering and the page
//! window as plain data. It can run against an in-memory collection or
//! against any [`RecordSource`]; both paths count with the same filter they
//! page with.
//!
//! # Example
//!
//! ```rust,ignore
//! let params = EmployeeParameters::default().with_min_age(26);
//! let page = QueryPipeline::<Employee>::from_parameters(params.query())
//!     .with_conditions(&params.filters())
//!     .execute(&employees)
//!     .await?;
//! ```

use std::fmt;

use super::fields::Fields;
use super::filter::{FilterCondition, FilterSet};
use super::page::{paginate, PagedResult, Pagination, PaginationMeta};
use super::params::{QueryParameters, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use super::sort::SortSpec;
use crate::source::{RecordSource, SourceResult};

/// An accumulated list query over `T`
pub struct QueryPipeline<T> {
    filter: FilterSet<T>,
    sort: SortSpec<T>,
    page_number: u32,
    page_size: u32,
}

impl<T: Fields> QueryPipeline<T> {
    /// A pipeline matching everything, in default order, first page
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: FilterSet::all(),
            sort: SortSpec::by_default(),
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Take ordering and paging from request parameters
    #[must_use]
    pub fn from_parameters(params: &QueryParameters) -> Self {
        Self::new()
            .sort_by(SortSpec::parse(params.order_by()))
            .page(params.page_number(), params.page_size())
    }

    /// Compile and add filter conditions
    #[must_use]
    pub fn with_conditions(self, conditions: &[FilterCondition]) -> Self {
        self.with_filter(FilterSet::compile(conditions))
    }
}

impl<T: Fields> Default for QueryPipeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> QueryPipeline<T> {
    /// Add a compiled filter; every added filter must hold
    #[must_use]
    pub fn with_filter(mut self, filter: FilterSet<T>) -> Self {
        self.filter = self.filter.and(filter);
        self
    }

    /// Replace the ordering
    #[must_use]
    pub fn sort_by(mut self, sort: SortSpec<T>) -> Self {
        self.sort = sort;
        self
    }

    /// Select the page to return
    ///
    /// The page size is clamped to `1..=MAX_PAGE_SIZE`.
    #[must_use]
    pub fn page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = page_number.max(1);
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    /// The compiled filter
    #[must_use]
    pub const fn filter(&self) -> &FilterSet<T> {
        &self.filter
    }

    /// The ordering
    #[must_use]
    pub const fn sort(&self) -> &SortSpec<T> {
        &self.sort
    }

    /// The page window
    #[must_use]
    pub const fn window(&self) -> Pagination {
        Pagination::page(self.page_number, self.page_size)
    }

    /// Run against an in-memory collection
    pub fn run<I>(&self, records: I) -> PagedResult<T>
    where
        I: IntoIterator<Item = T>,
    {
        let matching: Vec<T> = records
            .into_iter()
            .filter(|record| self.filter.matches(record))
            .collect();

        paginate(self.sort.sort(matching), self.page_number, self.page_size)
    }

    /// Run against a record source
    ///
    /// Source errors are returned unchanged and no partial page is built.
    pub async fn execute<S>(&self, source: &S) -> SourceResult<PagedResult<T>>
    where
        S: RecordSource<T>,
    {
        let total = source.count(&self.filter).await?;
        let items = source
            .fetch(&self.filter, &self.sort, self.window())
            .await?;

        tracing::debug!(
            total,
            returned = items.len(),
            page = self.page_number,
            sort = %self.sort,
            "Executed list query"
        );

        Ok(PagedResult::new(
            items,
            PaginationMeta::new(self.page_number, self.page_size, total),
        ))
    }
}

impl<T> Clone for QueryPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

impl<T> fmt::Debug for QueryPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryPipeline")
            .field("filter", &self.filter)
            .field("sort", &self.sort)
            .field("page_number", &self.page_number)
            .field("page_size", &self.page_size)
            .finish()
    }
}
