//! Record source trait
//!
//! A [`RecordSource`] is anything that can count, page through and look up
//! homogeneous records given a compiled filter and ordering. The trait uses
//! return-position `impl Future` so implementations can be written with plain
//! `async fn`.
//!
//! # Example
//!
//! ```rust,ignore
//! use roster_service::query::{FilterSet, Pagination, SortSpec};
//! use roster_service::source::{RecordSource, SourceResult};
//!
//! struct PgEmployees { pool: PgPool }
//!
//! impl RecordSource<Employee> for PgEmployees {
//!     async fn count(&self, filter: &FilterSet<Employee>) -> SourceResult<u64> {
//!         // translate the filter into a WHERE clause
//!         todo!()
//!     }
//!     // ... fetch and find_one
//! }
//! ```

use std::future::Future;

use super::error::SourceError;
use crate::query::{FilterSet, Pagination, SortSpec};

/// Result type for record source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// An ordered, filterable collection of records of type `T`
pub trait RecordSource<T>: Send + Sync {
    /// Count records matching the filter, ignoring any page window
    fn count(&self, filter: &FilterSet<T>) -> impl Future<Output = SourceResult<u64>> + Send;

    /// Fetch one window of matching records in the given order
    ///
    /// Equal records keep the source's natural order.
    fn fetch(
        &self,
        filter: &FilterSet<T>,
        sort: &SortSpec<T>,
        window: Pagination,
    ) -> impl Future<Output = SourceResult<Vec<T>>> + Send;

    /// Find the first record matching the filter
    fn find_one(
        &self,
        filter: &FilterSet<T>,
    ) -> impl Future<Output = SourceResult<Option<T>>> + Send;
}

/// A record source that also accepts changes
///
/// Writes take the same compiled filters as reads, so a handler that found a
/// record can change exactly the records it matched.
pub trait RecordStore<T>: RecordSource<T> {
    /// Store one new record
    fn create(&self, record: T) -> impl Future<Output = SourceResult<()>> + Send;

    /// Store several new records, keeping their order
    fn create_many(&self, records: Vec<T>) -> impl Future<Output = SourceResult<()>> + Send;

    /// Change the first record matching the filter
    ///
    /// Returns the changed record, or `None` when nothing matched.
    fn update<F>(
        &self,
        filter: &FilterSet<T>,
        apply: F,
    ) -> impl Future<Output = SourceResult<Option<T>>> + Send
    where
        F: FnOnce(&mut T) + Send;

    /// Remove every record matching the filter, returning how many went
    fn delete(&self, filter: &FilterSet<T>) -> impl Future<Output = SourceResult<u64>> + Send;
}
