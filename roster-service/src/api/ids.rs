//! Comma-separated identifier lists in path segments
//!
//! Parses `/collection/{ids}` values such as
//! `(3d490a70-94ce-4d15-9494-5248280c2ce3,c9d4c053-49b6-410c-bc78-2d54a9991870)`.
//! Surrounding parentheses are optional and blank entries are skipped.

use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

/// Errors from parsing an identifier list
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdListError {
    /// No identifiers were given
    #[error("Parameter ids is null")]
    Empty,

    /// An entry was not a valid UUID
    #[error("Invalid id in collection: {0}")]
    Invalid(String),
}

/// A non-empty, de-duplicated list of UUIDs in request order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList(Vec<Uuid>);

impl IdList {
    /// The identifiers, first occurrence order
    #[must_use]
    pub fn as_slice(&self) -> &[Uuid] {
        &self.0
    }

    /// Number of distinct identifiers
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; parsing rejects empty lists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for IdList {
    type Err = IdListError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        let mut ids: Vec<Uuid> = Vec::new();
        for entry in inner.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let id = Uuid::parse_str(entry).map_err(|_| IdListError::Invalid(entry.to_string()))?;
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        if ids.is_empty() {
            return Err(IdListError::Empty);
        }

        Ok(Self(ids))
    }
}
