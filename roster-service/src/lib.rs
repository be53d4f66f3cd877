//! # roster-service
//!
//! REST backend for companies and their employees, built around a reusable
//! query-shaping core.
//!
//! ## Features
//!
//! - **Dynamic sorting**: `orderBy=name desc, age` parsed against a per-entity field registry
//! - **Data shaping**: `fields=name,age` projects records, always keeping the identifier
//! - **Offset pagination**: page metadata in an `X-Pagination` header
//! - **Filtering**: equality, range, substring and membership conditions
//! - **Writes**: validated create, replace and delete, plus JSON Patch for employees
//! - **Middleware stack**: request tracing, timeouts, body limits, compression, CORS, panic recovery
//! - **Graceful shutdown**: SIGTERM and SIGINT handling
//!
//! ## Example
//!
//! ```rust,no_run
//! use roster_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config);
//!
//!     let state = SeedData::load(&config.data).await?.into_state(config.clone());
//!
//!     Server::new(config).serve(routes(state)).await?;
//!     Ok(())
//! }
//! ```
//!
//! The query core is usable on its own:
//!
//! ```rust
//! use roster_service::domain::{Employee, EmployeeDto};
//! use roster_service::query::{shape, QueryParameters, QueryPipeline};
//! use uuid::Uuid;
//!
//! let company = Uuid::new_v4();
//! let staff = vec![
//!     Employee::new(company, "Kane Miller", 35, "Administrator"),
//!     Employee::new(company, "Jana McLeary", 30, "Software developer"),
//! ];
//!
//! let params = QueryParameters::default().with_order_by("age");
//! let page = QueryPipeline::<Employee>::from_parameters(&params).run(staff);
//!
//! let dtos: Vec<EmployeeDto> = page.items().iter().cloned().map(Into::into).collect();
//! let shaped = shape(&dtos, "name");
//! assert_eq!(shaped[0].keys().collect::<Vec<_>>(), vec!["id", "name"]);
//! ```

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod health;
pub mod observability;
pub mod query;
pub mod seed;
pub mod server;
pub mod source;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{routes, ApiError, JsonPatch, PagedResponse};
    pub use crate::config::Config;
    pub use crate::domain::{
        Company, CompanyDto, CompanyForManipulation, Employee, EmployeeDto,
        EmployeeForManipulation, EmployeeParameters,
    };
    pub use crate::error::{Error, Result};
    pub use crate::health::health;
    pub use crate::observability::{init_tracing, shutdown_tracing};
    pub use crate::query::{
        FieldSelection, Fields, FilterCondition, FilterSet, PagedResult, PaginationMeta,
        QueryParameters, QueryPipeline, ShapedEntity, SortSpec,
    };
    pub use crate::seed::SeedData;
    pub use crate::server::Server;
    pub use crate::source::{MemorySource, RecordSource, RecordStore, SourceError};
    pub use crate::state::AppState;

    pub use axum::{
        extract::{Path, Query, State},
        routing::get,
        Json, Router,
    };
}
