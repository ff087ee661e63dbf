use thiserror::Error;

/// Errors that can occur when interacting with the document store
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Failed to convert database document: {0}")]
    Document(String),

    #[error("Other database error: {0}")]
    Other(#[from] anyhow::Error),
}
