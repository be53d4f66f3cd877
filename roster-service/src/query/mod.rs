//! The query-shaping core
//!
//! Turns list request parameters into a filtered, sorted, paginated and
//! field-shaped result. Each stage works from an entity's
//! [`FieldRegistry`]:
//!
//! - [`filter`]: [`FilterCondition`] data compiled into a [`FilterSet`]
//! - [`sort`]: comma-separated sort strings parsed into a [`SortSpec`]
//! - [`page`]: offset windows, [`paginate`] and [`PaginationMeta`]
//! - [`shape`]: projection of records onto requested fields
//! - [`pipeline`]: the stages combined over a record source
//!
//! All stages are synchronous and side-effect free; only record sources
//! await.

pub mod fields;
pub mod filter;
pub mod page;
pub mod params;
pub mod pipeline;
pub mod shape;
pub mod sort;

pub use fields::{Accessor, FieldDef, FieldRegistry, FieldRegistryBuilder, FieldValue, Fields};
pub use filter::{FilterCondition, FilterOperator, FilterSet, FilterValue};
pub use page::{paginate, PagedResult, Pagination, PaginationMeta};
pub use params::{QueryParameters, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use pipeline::QueryPipeline;
pub use shape::{shape, shape_one, FieldSelection, ShapedEntity};
pub use sort::{SortDirection, SortKey, SortSpec};
