//! Record source error types
//!
//! # Example
//!
//! ```rust
//! use roster_service::source::{SourceError, SourceErrorKind, SourceOperation};
//!
//! let error = SourceError::timeout(SourceOperation::FindAll, "Query timed out after 5s");
//! assert!(matches!(error.kind, SourceErrorKind::Timeout));
//! assert!(error.is_retriable());
//! ```

use std::fmt;

/// Operation being performed when the source error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceOperation {
    /// Finding a single record
    FindOne,
    /// Fetching a page of records
    FindAll,
    /// Counting records matching a filter
    Count,
    /// Loading records into the source
    Load,
    /// Storing new records
    Create,
    /// Changing a stored record
    Update,
    /// Removing records
    Delete,
}

impl fmt::Display for SourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindOne => write!(f, "find_one"),
            Self::FindAll => write!(f, "find_all"),
            Self::Count => write!(f, "count"),
            Self::Load => write!(f, "load"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of source error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceErrorKind {
    /// Operation did not finish in time
    Timeout,
    /// The backing store could not be reached
    Unavailable,
    /// Stored data could not be decoded
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for SourceErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Unavailable => write!(f, "unavailable"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured record source error with operation context
///
/// Sources report failures with this type and the query pipeline passes them
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    /// The operation being performed when the error occurred
    pub operation: SourceOperation,
    /// The category of error
    pub kind: SourceErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of record involved (e.g., "Company")
    pub entity_type: Option<String>,
    /// The ID of the record involved
    pub entity_id: Option<String>,
}

impl SourceError {
    /// Create a new source error
    pub fn new(
        operation: SourceOperation,
        kind: SourceErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: SourceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, SourceErrorKind::Timeout, message)
    }

    /// Create an unavailable error
    pub fn unavailable(operation: SourceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, SourceErrorKind::Unavailable, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: SourceOperation, message: impl Into<String>) -> Self {
        Self::new(operation, SourceErrorKind::SerializationError, message)
    }

    /// Add entity context to an existing error
    ///
    /// # Example
    ///
    /// ```rust
    /// use roster_service::source::{SourceError, SourceOperation};
    ///
    /// let error = SourceError::unavailable(SourceOperation::FindOne, "store offline")
    ///     .with_entity("Company", "c9d4c053");
    /// assert_eq!(error.entity_type.as_deref(), Some("Company"));
    /// ```
    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    /// Set the operation that caused the error
    #[must_use]
    pub fn with_operation(mut self, operation: SourceOperation) -> Self {
        self.operation = operation;
        self
    }

    /// Check if this error is transient
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            SourceErrorKind::Unavailable | SourceErrorKind::Timeout
        )
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Source {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{entity_type}: {entity_id}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for SourceError {}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_error(SourceOperation::Load, err.to_string())
    }
}
