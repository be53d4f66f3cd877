//! Company handlers

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use super::{
    error::{ApiError, ApiOperation},
    ids::{IdList, IdListError},
    read_body,
    response::PagedResponse,
    validate, within_timeout, FieldsQuery,
};
use crate::{
    domain::{Company, CompanyDto, CompanyForManipulation, Employee},
    query::{
        FieldSelection, FilterCondition, FilterSet, QueryParameters, QueryPipeline, ShapedEntity,
    },
    source::{RecordSource, RecordStore, SourceOperation},
    state::AppState,
};

/// Methods served on the company collection
const COMPANY_METHODS: &str = "GET, OPTIONS, POST";

/// `GET /api/companies`
///
/// Sorted by name unless `orderBy` names another field.
pub async fn list_companies(
    State(state): State<AppState>,
    Query(params): Query<QueryParameters>,
) -> Result<PagedResponse<ShapedEntity>, ApiError> {
    let pipeline = QueryPipeline::<Company>::from_parameters(&params);
    let page = within_timeout(
        &state,
        ApiOperation::List,
        SourceOperation::FindAll,
        pipeline.execute(state.companies()),
    )
    .await?;

    let selection = FieldSelection::<CompanyDto>::parse(params.fields());
    Ok(page
        .map(|company| selection.shape(&CompanyDto::from(company)))
        .into())
}

/// `GET /api/companies/{companyId}`
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Query(query): Query<FieldsQuery>,
) -> Result<Json<ShapedEntity>, ApiError> {
    let company = find_company(&state, company_id).await?;
    let selection = FieldSelection::<CompanyDto>::parse(&query.fields);
    Ok(Json(selection.shape(&CompanyDto::from(company))))
}

/// `GET /api/companies/collection/{ids}`
///
/// Every requested id must exist; otherwise the whole request is a 404.
pub async fn get_company_collection(
    State(state): State<AppState>,
    Path(raw_ids): Path<String>,
    Query(params): Query<QueryParameters>,
) -> Result<PagedResponse<ShapedEntity>, ApiError> {
    let ids: IdList = raw_ids.parse().map_err(|err: IdListError| {
        ApiError::bad_request(err.to_string()).with_operation(ApiOperation::GetCollection)
    })?;

    let pipeline = QueryPipeline::<Company>::from_parameters(&params)
        .with_conditions(&[FilterCondition::in_list("id", ids.as_slice().iter().copied())]);

    let page = within_timeout(
        &state,
        ApiOperation::GetCollection,
        SourceOperation::FindAll,
        pipeline.execute(state.companies()),
    )
    .await?;

    if page.meta().total_count != ids.len() as u64 {
        tracing::info!(
            requested = ids.len(),
            found = page.meta().total_count,
            "Some ids are not valid in a collection"
        );
        return Err(ApiError::not_found("Company", raw_ids.trim())
            .with_operation(ApiOperation::GetCollection));
    }

    let selection = FieldSelection::<CompanyDto>::parse(params.fields());
    Ok(page
        .map(|company| selection.shape(&CompanyDto::from(company)))
        .into())
}

/// `OPTIONS /api/companies`
pub async fn company_options() -> impl IntoResponse {
    (StatusCode::OK, [(header::ALLOW, COMPANY_METHODS)])
}

/// `POST /api/companies`
///
/// Employees listed in the body are created with the company. Responds 201
/// with the new company and its `Location`.
pub async fn create_company(
    State(state): State<AppState>,
    payload: Result<Json<Option<CompanyForManipulation>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_body(payload, ApiOperation::Create, "Company")?;
    validate(&form, ApiOperation::Create)?;

    let (company, employees) = form.into_records();
    within_timeout(
        &state,
        ApiOperation::Create,
        SourceOperation::Create,
        state.companies().create(company.clone()),
    )
    .await?;
    store_employees(&state, employees).await?;

    tracing::info!(company_id = %company.id, "Created company");
    let location = format!("/api/companies/{}", company.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(CompanyDto::from(company)),
    ))
}

/// `POST /api/companies/collection`
///
/// Creates every company or none. The `Location` points at the collection
/// lookup for the new ids.
pub async fn create_company_collection(
    State(state): State<AppState>,
    payload: Result<Json<Option<Vec<CompanyForManipulation>>>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let forms = read_body(payload, ApiOperation::Create, "Company collection")?;
    if forms.is_empty() {
        return Err(ApiError::bad_request("Company collection is empty.")
            .with_operation(ApiOperation::Create));
    }
    for form in &forms {
        validate(form, ApiOperation::Create)?;
    }

    let (companies, staff): (Vec<Company>, Vec<Vec<Employee>>) = forms
        .into_iter()
        .map(CompanyForManipulation::into_records)
        .unzip();
    let created: Vec<CompanyDto> = companies.iter().map(CompanyDto::from).collect();
    let ids = companies
        .iter()
        .map(|company| company.id.to_string())
        .collect::<Vec<_>>()
        .join(",");

    within_timeout(
        &state,
        ApiOperation::Create,
        SourceOperation::Create,
        state.companies().create_many(companies),
    )
    .await?;
    store_employees(&state, staff.into_iter().flatten().collect()).await?;

    tracing::info!(count = created.len(), "Created company collection");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/companies/collection/{ids}"))],
        Json(created),
    ))
}

/// `PUT /api/companies/{companyId}`
///
/// Replaces the company's details. Employees in the body are added to the
/// company; existing employees are kept.
pub async fn update_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    payload: Result<Json<Option<CompanyForManipulation>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let form = read_body(payload, ApiOperation::Update, "Company")?;
    validate(&form, ApiOperation::Update)
        .map_err(|err| err.with_entity("Company", company_id.to_string()))?;

    let filter = FilterSet::<Company>::compile(&[FilterCondition::eq("id", company_id)]);
    let mut added = Vec::new();
    let updated = within_timeout(
        &state,
        ApiOperation::Update,
        SourceOperation::Update,
        state
            .companies()
            .update(&filter, |company| added = form.apply_to(company)),
    )
    .await?;

    if updated.is_none() {
        return Err(ApiError::not_found("Company", company_id.to_string())
            .with_operation(ApiOperation::Update));
    }
    store_employees(&state, added).await?;

    tracing::info!(%company_id, "Updated company");
    Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /api/companies/{companyId}`
///
/// The company's employees are deleted with it.
pub async fn delete_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let filter = FilterSet::<Company>::compile(&[FilterCondition::eq("id", company_id)]);
    let removed = within_timeout(
        &state,
        ApiOperation::Delete,
        SourceOperation::Delete,
        state.companies().delete(&filter),
    )
    .await?;

    if removed == 0 {
        return Err(ApiError::not_found("Company", company_id.to_string())
            .with_operation(ApiOperation::Delete));
    }

    let staff = FilterSet::<Employee>::compile(&[FilterCondition::eq("companyId", company_id)]);
    let employees = within_timeout(
        &state,
        ApiOperation::Delete,
        SourceOperation::Delete,
        state.employees().delete(&staff),
    )
    .await?;

    tracing::info!(%company_id, employees, "Deleted company");
    Ok(StatusCode::NO_CONTENT)
}

async fn store_employees(state: &AppState, employees: Vec<Employee>) -> Result<(), ApiError> {
    if employees.is_empty() {
        return Ok(());
    }
    within_timeout(
        state,
        ApiOperation::Create,
        SourceOperation::Create,
        state.employees().create_many(employees),
    )
    .await
}

/// Look up a company or fail with 404
pub(crate) async fn find_company(state: &AppState, company_id: Uuid) -> Result<Company, ApiError> {
    let filter = FilterSet::<Company>::compile(&[FilterCondition::eq("id", company_id)]);
    let company = within_timeout(
        state,
        ApiOperation::Get,
        SourceOperation::FindOne,
        state.companies().find_one(&filter),
    )
    .await?;

    company.ok_or_else(|| ApiError::not_found("Company", company_id.to_string()))
}
