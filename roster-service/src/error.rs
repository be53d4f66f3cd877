//! Crate-level error types

use thiserror::Error;

use crate::source::SourceError;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while starting or running the service
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record source error, including undecodable seed records
    #[error("{0}")]
    Source(#[from] SourceError),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceErrorKind, SourceOperation};

    #[test]
    fn test_source_error_converts() {
        let err: Error = SourceError::unavailable(SourceOperation::Load, "gone").into();
        assert!(matches!(err, Error::Source(_)));
        assert_eq!(err.to_string(), "Source unavailable error during load: gone");
    }

    #[test]
    fn test_json_error_becomes_serialization_source_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1,").unwrap_err();
        let err: Error = SourceError::from(json_err).into();
        match err {
            Error::Source(source) => {
                assert_eq!(source.kind, SourceErrorKind::SerializationError);
                assert_eq!(source.operation, SourceOperation::Load);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_figment_error_is_boxed() {
        let err: Error = figment::Error::from("missing field".to_string()).into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
