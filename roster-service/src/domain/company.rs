//! Companies

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::employee::{Employee, EmployeeForManipulation};
use crate::query::{FieldRegistry, Fields};

/// A stored company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Company identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Street address
    pub address: String,
    /// Country name
    pub country: String,
}

impl Company {
    /// Create a company with a fresh identifier
    pub fn new(
        name: impl Into<String>,
        address: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            country: country.into(),
        }
    }

    /// Replace the identifier
    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

static COMPANY_FIELDS: Lazy<FieldRegistry<Company>> = Lazy::new(|| {
    FieldRegistry::<Company>::builder("Company")
        .field("id", |c| c.id.into())
        .field("name", |c| c.name.as_str().into())
        .field("address", |c| c.address.as_str().into())
        .field("country", |c| c.country.as_str().into())
        .identifier("id")
        .default_sort("name")
        .build()
});

impl Fields for Company {
    fn registry() -> &'static FieldRegistry<Self> {
        &COMPANY_FIELDS
    }
}

/// A company as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    /// Company identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Address and country, space separated
    pub full_address: String,
}

impl From<&Company> for CompanyDto {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            name: company.name.clone(),
            full_address: format!("{} {}", company.address, company.country),
        }
    }
}

impl From<Company> for CompanyDto {
    fn from(company: Company) -> Self {
        Self::from(&company)
    }
}

static COMPANY_DTO_FIELDS: Lazy<FieldRegistry<CompanyDto>> = Lazy::new(|| {
    FieldRegistry::<CompanyDto>::builder("Company")
        .field("id", |c| c.id.into())
        .field("name", |c| c.name.as_str().into())
        .field("fullAddress", |c| c.full_address.as_str().into())
        .identifier("id")
        .default_sort("name")
        .build()
});

impl Fields for CompanyDto {
    fn registry() -> &'static FieldRegistry<Self> {
        &COMPANY_DTO_FIELDS
    }
}

/// Request body for creating or replacing a company
///
/// Employees listed here are created for the company. On update they are
/// added next to the existing ones.
///
/// ```rust
/// use roster_service::domain::CompanyForManipulation;
/// use validator::Validate;
///
/// let form: CompanyForManipulation = serde_json::from_value(serde_json::json!({
///     "name": "Acme Ltd",
///     "address": "1 Main St",
///     "country": "USA"
/// }))
/// .unwrap();
/// assert!(form.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyForManipulation {
    /// Display name
    #[validate(length(
        min = 1,
        max = 30,
        message = "Company name is required and can't be longer than 30 characters."
    ))]
    pub name: String,
    /// Street address
    #[validate(length(
        min = 1,
        max = 60,
        message = "Company address is required and can't be longer than 60 characters."
    ))]
    pub address: String,
    /// Country name
    #[serde(default)]
    pub country: String,
    /// Employees to create alongside the company
    #[serde(default)]
    #[validate(nested)]
    pub employees: Vec<EmployeeForManipulation>,
}

impl CompanyForManipulation {
    /// Build a new company and its employees
    pub fn into_records(self) -> (Company, Vec<Employee>) {
        let company = Company::new(self.name, self.address, self.country);
        let employees = self
            .employees
            .into_iter()
            .map(|form| form.into_employee(company.id))
            .collect();
        (company, employees)
    }

    /// Overwrite a company's details, returning the employees to add
    pub fn apply_to(self, company: &mut Company) -> Vec<Employee> {
        company.name = self.name;
        company.address = self.address;
        company.country = self.country;
        self.employees
            .into_iter()
            .map(|form| form.into_employee(company.id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{shape_one, FieldValue};

    fn it_solutions() -> Company {
        Company::new("IT_Solutions Ltd", "583 Wall Dr. Gwynn Oak, MD 21207", "USA")
            .with_id(Uuid::from_u128(1))
    }

    #[test]
    fn test_dto_joins_address_and_country() {
        let dto = CompanyDto::from(it_solutions());
        assert_eq!(dto.full_address, "583 Wall Dr. Gwynn Oak, MD 21207 USA");
    }

    #[test]
    fn test_dto_serializes_camel_case() {
        let json = serde_json::to_value(CompanyDto::from(it_solutions())).unwrap();
        assert!(json.get("fullAddress").is_some());
    }

    #[test]
    fn test_shape_by_camel_case_field() {
        let shaped = shape_one(&CompanyDto::from(it_solutions()), "FULLADDRESS");
        assert_eq!(shaped.keys().collect::<Vec<_>>(), vec!["id", "fullAddress"]);
        assert_eq!(shaped.get("id"), Some(&FieldValue::Uuid(Uuid::from_u128(1))));
    }

    fn form(value: serde_json::Value) -> CompanyForManipulation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_form_validation() {
        let valid = form(serde_json::json!({"name": "Acme", "address": "1 Main St"}));
        assert!(valid.validate().is_ok());
        assert!(valid.employees.is_empty());

        let blank = form(serde_json::json!({"name": "", "address": "1 Main St"}));
        let errors = blank.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let long = form(serde_json::json!({"name": "Acme", "address": "x".repeat(61)}));
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_form_validates_nested_employees() {
        let minor = form(serde_json::json!({
            "name": "Acme",
            "address": "1 Main St",
            "employees": [{"name": "Kid", "age": 12, "position": "Intern"}]
        }));
        assert!(minor.validate().is_err());
    }

    #[test]
    fn test_into_records_links_employees() {
        let (company, employees) = form(serde_json::json!({
            "name": "Acme",
            "address": "1 Main St",
            "country": "USA",
            "employees": [{"name": "Ada", "age": 36, "position": "Engineer"}]
        }))
        .into_records();

        assert_eq!(company.name, "Acme");
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].company_id, company.id);
    }

    #[test]
    fn test_apply_to_keeps_id() {
        let mut company = it_solutions();
        let added = form(serde_json::json!({
            "name": "IT Ltd",
            "address": "2 New Rd",
            "country": "UK",
            "employees": [{"name": "Ada", "age": 36, "position": "Engineer"}]
        }))
        .apply_to(&mut company);

        assert_eq!(company.id, Uuid::from_u128(1));
        assert_eq!(CompanyDto::from(&company).full_address, "2 New Rd UK");
        assert_eq!(added[0].company_id, Uuid::from_u128(1));
    }

    #[test]
    fn test_registry_defaults() {
        assert_eq!(Company::registry().default_sort().name(), "name");
        assert_eq!(Company::registry().identifier().name(), "id");
        assert_eq!(CompanyDto::registry().len(), 3);
    }
}
