use crate::db::error::DatabaseError;
use crate::sheets::error::SheetError;
use thiserror::Error;

/// Errors that reject a submission. Everything here happens before or during
/// the durable write; failures after it never become a RecordError.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Required field {0} is missing")]
    MissingField(String),

    #[error("No student named {0} in the roster")]
    UnknownStudent(String),

    #[error("No question registered for {0}")]
    UnknownQuestion(String),

    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

/// Why a mirror attempt was abandoned. Observed in the record outcome and in
/// logs, never by the submitting client.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Mirror failed: {0}")]
    Sheet(#[from] SheetError),

    #[error("Mirror attempt timed out")]
    Timeout,
}
