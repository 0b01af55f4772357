use connectors::error::{ConnectorError, DbError};
use engine_runtime::{
    error::{PageError, RepositoryError},
    services::error::ServiceError,
};
use planner::error::{CompilationError, ValidationError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to read or write a file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Invalid connection format provided: {0}")]
    InvalidConnectionFormat(String),

    #[error("Connection failed: {0}")]
    Connector(#[from] ConnectorError),

    #[error("Connection check failed: {0}")]
    Ping(#[from] DbError),

    #[error("Invalid query: {0}")]
    Validation(#[from] ValidationError),

    #[error("Query compilation failed: {0}")]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Service(ServiceError),

    #[error("Shutdown requested")]
    ShutdownRequested,
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repository(RepositoryError::Page(PageError::Cancelled)) => {
                CliError::ShutdownRequested
            }
            other => CliError::Service(other),
        }
    }
}
