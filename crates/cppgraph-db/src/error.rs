//! Error types for cppgraph-db

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbError {
    #[error("database error: {0}")]
    Cozo(String),

    #[error("query execution error: {0}")]
    QueryExecution(String),

    #[error("unexpected result shape: {0}")]
    ResultShape(String),

    #[error("item not found")]
    NotFound,
}

impl From<DbError> for cppgraph_error::Error {
    fn from(err: DbError) -> Self {
        cppgraph_error::Error::Internal(err.to_string())
    }
}
