//! Employees and their list parameters

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::query::{FieldRegistry, Fields, FilterCondition, QueryParameters};

/// A stored employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Employee identifier
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Job title
    pub position: String,
    /// Owning company
    pub company_id: Uuid,
}

impl Employee {
    /// Create an employee of a company with a fresh identifier
    pub fn new(
        company_id: Uuid,
        name: impl Into<String>,
        age: u32,
        position: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            age,
            position: position.into(),
            company_id,
        }
    }

    /// Replace the identifier
    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

static EMPLOYEE_FIELDS: Lazy<FieldRegistry<Employee>> = Lazy::new(|| {
    FieldRegistry::<Employee>::builder("Employee")
        .field("id", |e| e.id.into())
        .field("name", |e| e.name.as_str().into())
        .field("age", |e| e.age.into())
        .field("position", |e| e.position.as_str().into())
        .field("companyId", |e| e.company_id.into())
        .identifier("id")
        .default_sort("name")
        .build()
});

impl Fields for Employee {
    fn registry() -> &'static FieldRegistry<Self> {
        &EMPLOYEE_FIELDS
    }
}

/// An employee as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    /// Employee identifier
    pub id: Uuid,
    /// Full name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Job title
    pub position: String,
}

impl From<Employee> for EmployeeDto {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            age: employee.age,
            position: employee.position,
        }
    }
}

static EMPLOYEE_DTO_FIELDS: Lazy<FieldRegistry<EmployeeDto>> = Lazy::new(|| {
    FieldRegistry::<EmployeeDto>::builder("Employee")
        .field("id", |e| e.id.into())
        .field("name", |e| e.name.as_str().into())
        .field("age", |e| e.age.into())
        .field("position", |e| e.position.as_str().into())
        .identifier("id")
        .default_sort("name")
        .build()
});

impl Fields for EmployeeDto {
    fn registry() -> &'static FieldRegistry<Self> {
        &EMPLOYEE_DTO_FIELDS
    }
}

/// Request body for creating, replacing or patching an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForManipulation {
    /// Full name
    #[validate(length(
        min = 1,
        max = 30,
        message = "Employee name is required and can't be longer than 30 characters."
    ))]
    pub name: String,
    /// Age in years
    #[validate(range(min = 18, message = "Age is required and it can't be lower than 18."))]
    pub age: u32,
    /// Job title
    #[validate(length(
        min = 1,
        max = 20,
        message = "Position is required and can't be longer than 20 characters."
    ))]
    pub position: String,
}

impl EmployeeForManipulation {
    /// Build a new employee of the given company
    pub fn into_employee(self, company_id: Uuid) -> Employee {
        Employee::new(company_id, self.name, self.age, self.position)
    }

    /// Overwrite an employee's details
    pub fn apply_to(self, employee: &mut Employee) {
        employee.name = self.name;
        employee.age = self.age;
        employee.position = self.position;
    }
}

impl From<&Employee> for EmployeeForManipulation {
    fn from(employee: &Employee) -> Self {
        Self {
            name: employee.name.clone(),
            age: employee.age,
            position: employee.position.clone(),
        }
    }
}

/// List parameters for employees
///
/// Adds an inclusive age range and a name search to [`QueryParameters`].
/// The range defaults (`0` and `u32::MAX`) add no condition.
///
/// # Example
///
/// ```rust
/// use roster_service::domain::EmployeeParameters;
///
/// let params = EmployeeParameters::default()
///     .with_min_age(26)
///     .with_max_age(40)
///     .with_search_term("ra");
///
/// assert!(params.valid_age_range());
/// assert_eq!(params.filters().len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawEmployeeParameters")]
pub struct EmployeeParameters {
    query: QueryParameters,
    min_age: u32,
    max_age: u32,
    search_term: String,
}

impl Default for EmployeeParameters {
    fn default() -> Self {
        Self {
            query: QueryParameters::default(),
            min_age: 0,
            max_age: u32::MAX,
            search_term: String::new(),
        }
    }
}

impl EmployeeParameters {
    /// Replace the paging, ordering and field selection
    #[must_use]
    pub fn with_query(mut self, query: QueryParameters) -> Self {
        self.query = query;
        self
    }

    /// Set the inclusive lower age bound
    #[must_use]
    pub const fn with_min_age(mut self, min_age: u32) -> Self {
        self.min_age = min_age;
        self
    }

    /// Set the inclusive upper age bound
    #[must_use]
    pub const fn with_max_age(mut self, max_age: u32) -> Self {
        self.max_age = max_age;
        self
    }

    /// Set the name search term
    #[must_use]
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Paging, ordering and field selection
    #[must_use]
    pub const fn query(&self) -> &QueryParameters {
        &self.query
    }

    /// Inclusive lower age bound
    #[must_use]
    pub const fn min_age(&self) -> u32 {
        self.min_age
    }

    /// Inclusive upper age bound
    #[must_use]
    pub const fn max_age(&self) -> u32 {
        self.max_age
    }

    /// Name search term, as given
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Whether the upper age bound is not below the lower one
    #[must_use]
    pub const fn valid_age_range(&self) -> bool {
        self.max_age >= self.min_age
    }

    /// Filter conditions for these parameters
    ///
    /// Unset bounds and blank search terms contribute nothing.
    #[must_use]
    pub fn filters(&self) -> Vec<FilterCondition> {
        let mut conditions = Vec::new();
        if self.min_age > 0 {
            conditions.push(FilterCondition::gte("age", self.min_age));
        }
        if self.max_age < u32::MAX {
            conditions.push(FilterCondition::lte("age", self.max_age));
        }
        let term = self.search_term.trim();
        if !term.is_empty() {
            conditions.push(FilterCondition::contains("name", term));
        }
        conditions
    }
}

/// Wire form of [`EmployeeParameters`]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEmployeeParameters {
    page_number: Option<u32>,
    page_size: Option<u32>,
    order_by: Option<String>,
    fields: Option<String>,
    min_age: Option<u32>,
    max_age: Option<u32>,
    search_term: Option<String>,
}

impl From<RawEmployeeParameters> for EmployeeParameters {
    fn from(raw: RawEmployeeParameters) -> Self {
        let query = QueryParameters::from(crate::query::params::RawQueryParameters::new(
            raw.page_number,
            raw.page_size,
            raw.order_by,
            raw.fields,
        ));

        Self {
            query,
            min_age: raw.min_age.unwrap_or(0),
            max_age: raw.max_age.unwrap_or(u32::MAX),
            search_term: raw.search_term.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{FilterOperator, FilterSet, MAX_PAGE_SIZE};

    fn employee(name: &str, age: u32) -> Employee {
        Employee::new(Uuid::from_u128(1), name, age, "Developer")
    }

    #[test]
    fn test_default_parameters_have_no_filters() {
        let params = EmployeeParameters::default();
        assert!(params.valid_age_range());
        assert!(params.filters().is_empty());
    }

    #[test]
    fn test_invalid_age_range() {
        let params = EmployeeParameters::default().with_min_age(40).with_max_age(30);
        assert!(!params.valid_age_range());
    }

    #[test]
    fn test_equal_bounds_are_valid() {
        let params = EmployeeParameters::default().with_min_age(30).with_max_age(30);
        assert!(params.valid_age_range());
    }

    #[test]
    fn test_filters_from_parameters() {
        let params = EmployeeParameters::default()
            .with_min_age(26)
            .with_search_term("  ");
        let filters = params.filters();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].operator, FilterOperator::GreaterThanOrEqual);
    }

    #[test]
    fn test_filters_select_expected_employees() {
        let params = EmployeeParameters::default()
            .with_min_age(26)
            .with_max_age(35)
            .with_search_term("RA");
        let filter = FilterSet::<Employee>::compile(&params.filters());

        assert!(filter.matches(&employee("Sam Raiden", 26)));
        assert!(!filter.matches(&employee("Martha Ray", 19)));
        assert!(!filter.matches(&employee("Kane Miller", 35)));
    }

    #[test]
    fn test_with_query_keeps_age_filters() {
        let params = EmployeeParameters::default()
            .with_min_age(30)
            .with_query(QueryParameters::default().with_order_by("age desc").with_page_size(5));

        assert_eq!(params.query().order_by(), "age desc");
        assert_eq!(params.query().page_size(), 5);
        assert_eq!(params.filters().len(), 1);
    }

    #[test]
    fn test_deserialize_from_query_names() {
        let params: EmployeeParameters = serde_json::from_value(serde_json::json!({
            "pageNumber": 3,
            "pageSize": 80,
            "orderBy": "age desc",
            "minAge": 20,
            "maxAge": 40,
            "searchTerm": "ja"
        }))
        .unwrap();

        assert_eq!(params.query().page_number(), 3);
        assert_eq!(params.query().page_size(), MAX_PAGE_SIZE);
        assert_eq!(params.query().order_by(), "age desc");
        assert_eq!(params.min_age(), 20);
        assert_eq!(params.max_age(), 40);
        assert_eq!(params.search_term(), "ja");
    }

    #[test]
    fn test_deserialize_defaults() {
        let params: EmployeeParameters = serde_json::from_str("{}").unwrap();
        assert_eq!(params, EmployeeParameters::default());
    }

    #[test]
    fn test_form_validation() {
        let form = EmployeeForManipulation {
            name: "Ada".to_string(),
            age: 36,
            position: "Engineer".to_string(),
        };
        assert!(form.validate().is_ok());

        let too_young = EmployeeForManipulation { age: 17, ..form.clone() };
        let errors = too_young.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("age"));

        let long_position = EmployeeForManipulation {
            position: "p".repeat(21),
            ..form
        };
        assert!(long_position.validate().is_err());
    }

    #[test]
    fn test_form_round_trips_through_employee() {
        let company = Uuid::new_v4();
        let mut stored = employee("Sam Raiden", 26);
        let form = EmployeeForManipulation::from(&stored);
        assert_eq!(form.name, "Sam Raiden");

        let created = form.clone().into_employee(company);
        assert_eq!(created.company_id, company);
        assert_ne!(created.id, stored.id);

        let id = stored.id;
        EmployeeForManipulation { age: 27, ..form }.apply_to(&mut stored);
        assert_eq!(stored.age, 27);
        assert_eq!(stored.id, id);
    }

    #[test]
    fn test_dto_drops_company_id() {
        let json = serde_json::to_value(EmployeeDto::from(employee("Jana McLeary", 30))).unwrap();
        assert!(json.get("companyId").is_none());
        assert_eq!(json["age"], 30);
    }
}
