use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Stale element reference: {0}")]
    StaleReference(String),

    #[error("Script execution failed: {0}")]
    ScriptFailed(String),

    #[error("Unexpected script result shape: {0}")]
    UnexpectedResultShape(String),

    #[error("Selection contains no elements")]
    EmptySelection,

    #[error("jQuery injection failed: {0}")]
    InjectionFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Anyhow error: {0}")]
    AnyhowError(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;

// Convert anyhow::Error to QueryError
impl From<anyhow::Error> for QueryError {
    fn from(err: anyhow::Error) -> Self {
        QueryError::AnyhowError(err.to_string())
    }
}

// Helper for driver adapters wrapping arbitrary driver errors
impl QueryError {
    pub fn from_driver_error<E: std::fmt::Display>(err: E) -> Self {
        QueryError::ScriptFailed(err.to_string())
    }
}
