//! Error types for timetable operations.

use thiserror::Error;

/// Result type alias for timetable operations
pub type Result<T> = std::result::Result<T, TimeTableError>;

/// Errors that can occur while building, loading or saving a timetable.
#[derive(Debug, Error)]
pub enum TimeTableError {
    /// The file belongs to a different dataset than the one it is loaded against
    #[error("time table id mismatch: expected {expected:?}, found {found:?}")]
    IdMismatch { expected: String, found: String },

    /// The file could not be parsed (bad xml, bad integer, missing attribute)
    #[error("malformed time table file: {0}")]
    MalformedFile(String),

    /// Caller passed a value outside the accepted domain
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Event id not present in the dataset (strict loading only)
    #[error("unknown event id {0}")]
    UnknownEvent(i32),

    /// Room id not present in the dataset (strict loading only)
    #[error("unknown room id {0}")]
    UnknownRoom(i32),

    /// A subject or lecturer referenced by an event is missing from the dataset
    #[error("missing {kind} with id {id}")]
    MissingReference { kind: &'static str, id: i32 },

    /// Reading a catalog table failed
    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<quick_xml::DeError> for TimeTableError {
    fn from(err: quick_xml::DeError) -> Self {
        TimeTableError::MalformedFile(err.to_string())
    }
}

impl From<quick_xml::Error> for TimeTableError {
    fn from(err: quick_xml::Error) -> Self {
        TimeTableError::MalformedFile(err.to_string())
    }
}

impl From<polars::prelude::PolarsError> for TimeTableError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        TimeTableError::Catalog(err.to_string())
    }
}

impl From<tempfile::PersistError> for TimeTableError {
    fn from(err: tempfile::PersistError) -> Self {
        TimeTableError::Io(err.error)
    }
}
