//! Application state management

use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    domain::{Company, Employee},
    source::MemorySource,
};

/// Application state shared across handlers
///
/// Cheap to clone; the record sources share their storage.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    companies: MemorySource<Company>,
    employees: MemorySource<Employee>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl AppState {
    /// Create state with empty record sources
    pub fn new(config: Config) -> Self {
        Self::with_sources(config, MemorySource::default(), MemorySource::default())
    }

    /// Create state over existing record sources
    pub fn with_sources(
        config: Config,
        companies: MemorySource<Company>,
        employees: MemorySource<Employee>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            companies,
            employees,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Company records
    pub fn companies(&self) -> &MemorySource<Company> {
        &self.companies
    }

    /// Employee records
    pub fn employees(&self) -> &MemorySource<Employee> {
        &self.employees
    }

    /// Upper bound on one record source round trip
    pub fn source_timeout(&self) -> Duration {
        self.config.query.source_timeout()
    }
}
