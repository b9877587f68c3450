use cppgraph_error::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("database operation failed: {0}")]
    Database(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    #[error("data transformation failed: {0}")]
    Transformation(String),
}

impl From<cozo::Error> for TransformError {
    fn from(err: cozo::Error) -> Self {
        TransformError::Database(err.to_string())
    }
}

impl From<TransformError> for StoreError {
    fn from(err: TransformError) -> Self {
        match &err {
            // The embedded store reports disk-level trouble in its message;
            // only those are worth one retry.
            TransformError::Database(msg)
                if msg.contains("lock") || msg.contains("I/O") || msg.contains("busy") =>
            {
                StoreError::Transient(err.to_string())
            }
            _ => StoreError::Fatal(err.to_string()),
        }
    }
}
