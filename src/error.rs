//! Error types for leadlink.
//!
//! All errors are strongly typed using thiserror. Load-time failures and
//! query-time failures are separate enums so callers can pattern match on
//! the condition that actually occurred.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or writing the canonical store.
///
/// These are fatal to resolver initialization: a resolver cannot be built
/// without a readable canonical snapshot. [`crate::bootstrap::load_or_bootstrap`]
/// may synthesize a snapshot and retry once when the backing file is missing.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("canonical source not found: {path}")]
    SourceMissing {
        path: PathBuf,
    },

    #[error("failed to read canonical source '{source_name}': {message}")]
    Unreadable {
        source_name: String,
        message: String,
    },

    #[error("malformed canonical row {row}: {message}")]
    MalformedRow {
        row: usize,
        message: String,
    },

    #[error("duplicate record id: {id}")]
    DuplicateId {
        id: String,
    },

    #[error("failed to write canonical snapshot {path}: {message}")]
    SnapshotWrite {
        path: PathBuf,
        message: String,
    },
}

/// Errors raised while scoring a single query against the similarity index.
///
/// These never escape the public resolution path: [`crate::Resolver::resolve`]
/// captures them into the result's `error` field and reports a zero score.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("query text is empty")]
    EmptyQuery,

    #[error("similarity index has no fitted records")]
    EmptyIndex,

    #[error("similarity scoring failed: {message}")]
    Scoring {
        message: String,
    },
}

/// Top-level error type for leadlink.
#[derive(Debug, Error)]
pub enum LeadError {
    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("internal error: {message}")]
    Internal {
        message: String,
    },
}

impl LeadError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a load-time data error.
    #[must_use]
    pub const fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    /// Returns true if this is a query-time error.
    #[must_use]
    pub const fn is_query(&self) -> bool {
        matches!(self, Self::Query(_))
    }
}

/// Result type alias for leadlink operations.
pub type LeadResult<T> = Result<T, LeadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_source_missing() {
        let err = DataError::SourceMissing {
            path: PathBuf::from("/tmp/nope.csv"),
        };
        let msg = format!("{err}");
        assert!(msg.contains("not found"));
        assert!(msg.contains("nope.csv"));
    }

    #[test]
    fn test_data_error_malformed_row() {
        let err = DataError::MalformedRow {
            row: 7,
            message: "unexpected field count".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("row 7"));
        assert!(msg.contains("unexpected field count"));
    }

    #[test]
    fn test_data_error_duplicate_id() {
        let err = DataError::DuplicateId {
            id: "lead-42".to_string(),
        };
        assert!(format!("{err}").contains("lead-42"));
    }

    #[test]
    fn test_query_error_messages() {
        assert!(format!("{}", QueryError::EmptyQuery).contains("empty"));
        assert!(format!("{}", QueryError::EmptyIndex).contains("no fitted records"));

        let err = QueryError::Scoring {
            message: "non-finite score".to_string(),
        };
        assert!(format!("{err}").contains("non-finite score"));
    }

    #[test]
    fn test_lead_error_from_data() {
        let data_err = DataError::DuplicateId {
            id: "x".to_string(),
        };
        let err: LeadError = data_err.into();
        assert!(err.is_data());
        assert!(!err.is_query());
    }

    #[test]
    fn test_lead_error_from_query() {
        let err: LeadError = QueryError::EmptyQuery.into();
        assert!(err.is_query());
    }

    #[test]
    fn test_lead_error_internal() {
        let err = LeadError::internal("unexpected state");
        assert!(!err.is_data());
        assert!(format!("{err}").contains("unexpected state"));
    }
}
