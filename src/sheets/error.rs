use thiserror::Error;

/// Errors that can occur when interacting with the sheet service
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("No roster row found for {0}")]
    RowNotFound(String),

    #[error("Worksheet {0} not found")]
    UnknownSheet(String),

    #[error("Request to sheet service failed: {0}")]
    Request(String),

    #[error("Sheet service returned status {0}: {1}")]
    Api(u16, String),

    #[error("Other sheet error: {0}")]
    Other(#[from] anyhow::Error),
}
