//! Employee handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::{
    companies::find_company,
    error::{ApiError, ApiOperation},
    patch::JsonPatch,
    read_body,
    response::PagedResponse,
    validate, within_timeout, FieldsQuery,
};
use crate::{
    domain::{Employee, EmployeeDto, EmployeeForManipulation, EmployeeParameters},
    query::{FieldSelection, FilterCondition, FilterSet, QueryPipeline, ShapedEntity},
    source::{RecordSource, RecordStore, SourceOperation},
    state::AppState,
};

const INVALID_AGE_RANGE: &str = "Max age can't be greater than min age.";

/// `GET /api/companies/{companyId}/employees`
///
/// Supports `minAge`, `maxAge` and `searchTerm` on top of the usual paging,
/// ordering and field selection.
pub async fn list_employees(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(params): Query<EmployeeParameters>,
) -> Result<PagedResponse<ShapedEntity>, ApiError> {
    if !params.valid_age_range() {
        return Err(ApiError::bad_request(INVALID_AGE_RANGE));
    }

    find_company(&state, company_id)
        .await
        .map_err(|err| err.with_operation(ApiOperation::List))?;

    let pipeline = QueryPipeline::<Employee>::from_parameters(params.query())
        .with_conditions(&[FilterCondition::eq("companyId", company_id)])
        .with_conditions(&params.filters());

    let page = within_timeout(
        &state,
        ApiOperation::List,
        SourceOperation::FindAll,
        pipeline.execute(state.employees()),
    )
    .await?;

    let selection = FieldSelection::<EmployeeDto>::parse(params.query().fields());
    Ok(page
        .map(|employee| selection.shape(&EmployeeDto::from(employee)))
        .into())
}

/// `GET /api/companies/{companyId}/employees/{employeeId}`
pub async fn get_employee(
    State(state): State<AppState>,
    Path((company_id, employee_id)): Path<(Uuid, Uuid)>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<ShapedEntity>, ApiError> {
    let employee = find_employee(&state, company_id, employee_id).await?;
    let selection = FieldSelection::<EmployeeDto>::parse(&query.fields);
    Ok(Json(selection.shape(&EmployeeDto::from(employee))))
}

/// `POST /api/companies/{companyId}/employees`
pub async fn create_employee(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    payload: Result<Json<Option<EmployeeForManipulation>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_body(payload, ApiOperation::Create, "Employee")?;
    validate(&form, ApiOperation::Create)?;
    find_company(&state, company_id)
        .await
        .map_err(|err| err.with_operation(ApiOperation::Create))?;

    let employee = form.into_employee(company_id);
    within_timeout(
        &state,
        ApiOperation::Create,
        SourceOperation::Create,
        state.employees().create(employee.clone()),
    )
    .await?;

    tracing::info!(%company_id, employee_id = %employee.id, "Created employee");
    let location = format!("/api/companies/{company_id}/employees/{}", employee.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(EmployeeDto::from(employee)),
    ))
}

/// `PUT /api/companies/{companyId}/employees/{employeeId}`
pub async fn update_employee(
    State(state): State<AppState>,
    Path((company_id, employee_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<Option<EmployeeForManipulation>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let form = read_body(payload, ApiOperation::Update, "Employee")?;
    validate(&form, ApiOperation::Update)
        .map_err(|err| err.with_entity("Employee", employee_id.to_string()))?;

    replace_employee(&state, company_id, employee_id, form).await?;
    tracing::info!(%company_id, %employee_id, "Updated employee");
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /api/companies/{companyId}/employees/{employeeId}`
///
/// Takes a JSON Patch document over the employee's editable fields. The
/// patched employee must pass the same validation as a `PUT`.
pub async fn patch_employee(
    State(state): State<AppState>,
    Path((company_id, employee_id)): Path<(Uuid, Uuid)>,
    payload: Result<Json<Option<JsonPatch>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let patch = read_body(payload, ApiOperation::Update, "patchDoc")?;
    let employee = find_employee(&state, company_id, employee_id)
        .await
        .map_err(|err| err.with_operation(ApiOperation::Update))?;

    let invalid = |message: String| {
        ApiError::validation_failed(message)
            .with_operation(ApiOperation::Update)
            .with_entity("Employee", employee_id.to_string())
    };
    let form = patch
        .apply(&EmployeeForManipulation::from(&employee))
        .map_err(|err| invalid(err.to_string()))?;
    validate(&form, ApiOperation::Update).map_err(|err| invalid(err.message))?;

    replace_employee(&state, company_id, employee_id, form).await?;
    tracing::info!(%company_id, %employee_id, operations = patch.len(), "Patched employee");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/companies/{companyId}/employees/{employeeId}`
pub async fn delete_employee(
    State(state): State<AppState>,
    Path((company_id, employee_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    find_company(&state, company_id)
        .await
        .map_err(|err| err.with_operation(ApiOperation::Delete))?;

    let removed = within_timeout(
        &state,
        ApiOperation::Delete,
        SourceOperation::Delete,
        state.employees().delete(&employee_filter(company_id, employee_id)),
    )
    .await?;

    if removed == 0 {
        return Err(ApiError::not_found("Employee", employee_id.to_string())
            .with_operation(ApiOperation::Delete));
    }

    tracing::info!(%company_id, %employee_id, "Deleted employee");
    Ok(StatusCode::NO_CONTENT)
}

fn employee_filter(company_id: Uuid, employee_id: Uuid) -> FilterSet<Employee> {
    FilterSet::<Employee>::compile(&[
        FilterCondition::eq("companyId", company_id),
        FilterCondition::eq("id", employee_id),
    ])
}

/// Look up an employee of a company, failing with 404 for either
async fn find_employee(
    state: &AppState,
    company_id: Uuid,
    employee_id: Uuid,
) -> Result<Employee, ApiError> {
    find_company(state, company_id).await?;

    within_timeout(
        state,
        ApiOperation::Get,
        SourceOperation::FindOne,
        state
            .employees()
            .find_one(&employee_filter(company_id, employee_id)),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("Employee", employee_id.to_string()))
}

async fn replace_employee(
    state: &AppState,
    company_id: Uuid,
    employee_id: Uuid,
    form: EmployeeForManipulation,
) -> Result<(), ApiError> {
    find_company(state, company_id)
        .await
        .map_err(|err| err.with_operation(ApiOperation::Update))?;

    let updated = within_timeout(
        state,
        ApiOperation::Update,
        SourceOperation::Update,
        state.employees().update(
            &employee_filter(company_id, employee_id),
            |employee| form.apply_to(employee),
        ),
    )
    .await?;

    updated.map(|_| ()).ok_or_else(|| {
        ApiError::not_found("Employee", employee_id.to_string())
            .with_operation(ApiOperation::Update)
    })
}
