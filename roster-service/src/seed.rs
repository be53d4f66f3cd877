//! Initial records
//!
//! Records come from the JSON file named by `data.seed_path`, or from a small
//! built-in data set when no file is configured. A seed file looks like:
//!
//! ```json
//! {
//!   "companies": [
//!     { "id": "c9d4c053-49b6-410c-bc78-2d54a9991870", "name": "IT_Solutions Ltd",
//!       "address": "583 Wall Dr. Gwynn Oak, MD 21207", "country": "USA" }
//!   ],
//!   "employees": [
//!     { "id": "80abbca8-664d-4b20-b5de-024705497d4a", "name": "Sam Raiden", "age": 26,
//!       "position": "Software developer", "companyId": "c9d4c053-49b6-410c-bc78-2d54a9991870" }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{Config, DataConfig},
    domain::{Company, Employee},
    error::Result,
    source::{MemorySource, SourceError},
    state::AppState,
};

const IT_SOLUTIONS: Uuid = Uuid::from_u128(0xc9d4c053_49b6_410c_bc78_2d54a9991870);
const ADMIN_SOLUTIONS: Uuid = Uuid::from_u128(0x3d490a70_94ce_4d15_9494_5248280c2ce3);

/// Companies and employees to start with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    /// Company records
    #[serde(default)]
    pub companies: Vec<Company>,
    /// Employee records
    #[serde(default)]
    pub employees: Vec<Employee>,
}

impl SeedData {
    /// Load the configured seed file, or the built-in data set
    pub async fn load(config: &DataConfig) -> Result<Self> {
        match &config.seed_path {
            Some(path) => Self::from_file(path).await,
            None => {
                tracing::info!("No seed file configured, using built-in data");
                Ok(Self::demo())
            }
        }
    }

    /// Read records from a JSON file
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let seed: Self = serde_json::from_str(&raw).map_err(|err| {
            SourceError::from(err).with_entity("SeedData", path.display().to_string())
        })?;

        tracing::info!(
            path = %path.display(),
            companies = seed.companies.len(),
            employees = seed.employees.len(),
            "Loaded seed data"
        );

        Ok(seed.without_orphans())
    }

    /// The built-in data set
    pub fn demo() -> Self {
        let companies = vec![
            Company::new("IT_Solutions Ltd", "583 Wall Dr. Gwynn Oak, MD 21207", "USA")
                .with_id(IT_SOLUTIONS),
            Company::new("Admin_Solutions Ltd", "312 Forest Avenue, BF 923", "USA")
                .with_id(ADMIN_SOLUTIONS),
        ];

        let people: [(u128, &str, u32, &str, Uuid); 8] = [
            (0x80abbca8_664d_4b20_b5de_024705497d4a, "Sam Raiden", 26, "Software developer", IT_SOLUTIONS),
            (0x86dba8c0_d178_41e7_938c_ed49778fb52a, "Jana McLeary", 30, "Software developer", IT_SOLUTIONS),
            (0x021ca3c1_0deb_4afd_ae94_2159a8479811, "Kane Miller", 35, "Administrator", ADMIN_SOLUTIONS),
            (0x5b4f0d2e_8a1c_4e3b_9f6d_1c2a3b4c5d01, "Martha Ray", 41, "Team lead", IT_SOLUTIONS),
            (0x5b4f0d2e_8a1c_4e3b_9f6d_1c2a3b4c5d02, "Rafael Ortiz", 23, "QA engineer", IT_SOLUTIONS),
            (0x5b4f0d2e_8a1c_4e3b_9f6d_1c2a3b4c5d03, "Lena Hoffmann", 29, "Software developer", IT_SOLUTIONS),
            (0x5b4f0d2e_8a1c_4e3b_9f6d_1c2a3b4c5d04, "Priya Nair", 38, "Accountant", ADMIN_SOLUTIONS),
            (0x5b4f0d2e_8a1c_4e3b_9f6d_1c2a3b4c5d05, "Tom Becker", 52, "Office manager", ADMIN_SOLUTIONS),
        ];

        let employees = people
            .into_iter()
            .map(|(id, name, age, position, company)| {
                Employee::new(company, name, age, position).with_id(Uuid::from_u128(id))
            })
            .collect();

        Self {
            companies,
            employees,
        }
    }

    /// Drop employees whose company is not in the data set
    fn without_orphans(mut self) -> Self {
        let known: HashSet<Uuid> = self.companies.iter().map(|c| c.id).collect();
        let before = self.employees.len();
        self.employees.retain(|e| known.contains(&e.company_id));

        let dropped = before - self.employees.len();
        if dropped > 0 {
            tracing::warn!(dropped, "Skipping employees of unknown companies");
        }
        self
    }

    /// Build application state holding these records
    pub fn into_state(self, config: Config) -> AppState {
        AppState::with_sources(
            config,
            MemorySource::new(self.companies),
            MemorySource::new(self.employees),
        )
    }
}
