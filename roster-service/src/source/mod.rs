//! Record sources
//!
//! The query pipeline reads records through the [`RecordSource`] trait and
//! handlers change them through [`RecordStore`]. The
//! crate ships [`MemorySource`]; a database-backed source would translate the
//! compiled [`FilterSet`](crate::query::FilterSet) and
//! [`SortSpec`](crate::query::SortSpec) into its own query language.

mod error;
mod memory;
mod traits;

pub use error::{SourceError, SourceErrorKind, SourceOperation};
pub use memory::MemorySource;
pub use traits::{RecordSource, RecordStore, SourceResult};
