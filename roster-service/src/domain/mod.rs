//! Company and employee records with their field registries

mod company;
mod employee;

pub use company::{Company, CompanyDto, CompanyForManipulation};
pub use employee::{Employee, EmployeeDto, EmployeeForManipulation, EmployeeParameters};
