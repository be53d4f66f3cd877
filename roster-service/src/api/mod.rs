//! HTTP surface
//!
//! Routes:
//!
//! | Method | Path |
//! |---|---|
//! | GET, HEAD, POST, OPTIONS | `/api/companies` |
//! | POST | `/api/companies/collection` |
//! | GET | `/api/companies/collection/{ids}` |
//! | GET, PUT, DELETE | `/api/companies/{companyId}` |
//! | GET, HEAD, POST | `/api/companies/{companyId}/employees` |
//! | GET, PUT, PATCH, DELETE | `/api/companies/{companyId}/employees/{employeeId}` |
//! | GET | `/health` |
//!
//! List bodies are plain JSON arrays; paging metadata travels in the
//! `X-Pagination` header. Write bodies are JSON: a `null` or malformed body
//! is a 400, a body that fails validation is a 422.

mod companies;
mod employees;
mod error;
mod ids;
mod patch;
mod response;

use std::future::Future;

use axum::{
    extract::rejection::JsonRejection,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use validator::Validate;

pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use ids::{IdList, IdListError};
pub use patch::{JsonPatch, PatchError, PatchOperation};
pub use response::{PagedResponse, PAGINATION_HEADER};

use crate::{
    health::health,
    source::{SourceError, SourceOperation, SourceResult},
    state::AppState,
};

/// Field selection for single-record endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FieldsQuery {
    /// Comma-separated field names; empty selects every field
    #[serde(default)]
    pub fields: String,
}

/// Build the application router
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/companies",
            get(companies::list_companies)
                .post(companies::create_company)
                .options(companies::company_options),
        )
        .route(
            "/api/companies/collection",
            post(companies::create_company_collection),
        )
        .route(
            "/api/companies/collection/{ids}",
            get(companies::get_company_collection),
        )
        .route(
            "/api/companies/{company_id}",
            get(companies::get_company)
                .put(companies::update_company)
                .delete(companies::delete_company),
        )
        .route(
            "/api/companies/{company_id}/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/api/companies/{company_id}/employees/{employee_id}",
            get(employees::get_employee)
                .put(employees::update_employee)
                .patch(employees::patch_employee)
                .delete(employees::delete_employee),
        )
        .with_state(state)
}

/// Await a record source call, bounded by the configured source timeout
async fn within_timeout<T, F>(
    state: &AppState,
    operation: ApiOperation,
    source_operation: SourceOperation,
    call: F,
) -> Result<T, ApiError>
where
    F: Future<Output = SourceResult<T>>,
{
    let limit = state.source_timeout();
    let result = match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(SourceError::timeout(
            source_operation,
            format!("No response within {} ms", limit.as_millis()),
        )),
    };

    result.map_err(|err| ApiError::from(err).with_operation(operation))
}

/// Unwrap a JSON request body
///
/// `null` and malformed JSON are 400s. Well-formed JSON of the wrong shape
/// is a 422.
fn read_body<T>(
    payload: Result<Json<Option<T>>, JsonRejection>,
    operation: ApiOperation,
    what: &str,
) -> Result<T, ApiError> {
    match payload {
        Ok(Json(Some(body))) => Ok(body),
        Ok(Json(None)) => Err(ApiError::bad_request(format!(
            "{what} object sent from client is null."
        ))
        .with_operation(operation)),
        Err(JsonRejection::JsonDataError(err)) => {
            Err(ApiError::validation_failed(err.body_text()).with_operation(operation))
        }
        Err(err) => Err(ApiError::bad_request(err.body_text()).with_operation(operation)),
    }
}

/// Run a body's validation rules, mapping failures to 422
fn validate<T: Validate>(body: &T, operation: ApiOperation) -> Result<(), ApiError> {
    body.validate().map_err(|errors| {
        tracing::debug!(%errors, "Invalid request body");
        ApiError::validation_failed(errors.to_string()).with_operation(operation)
    })
}
