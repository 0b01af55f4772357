use connectors::error::DbError;
use planner::{
    error::{CompilationError, ValidationError},
    query::compiler::StatementKind,
};
use thiserror::Error;

/// A failure reported by the relational executor, with the statement that
/// was running. The driver error is kept as the source.
#[derive(Debug, Error)]
#[error("Storage failure while running the {kind} statement: {source}")]
pub struct StorageError {
    pub kind: StatementKind,
    #[source]
    pub source: DbError,
}

/// Errors of a single page request.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Invalid query: {0}")]
    Validation(#[from] ValidationError),

    #[error("Query compilation failed: {0}")]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The caller gave up before the page was assembled.
    #[error("Page request cancelled")]
    Cancelled,
}

/// Errors of the mapping-domain repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error(transparent)]
    Page(#[from] PageError),

    /// A row did not have the shape the record expects.
    #[error("Invalid {entity} row: {reason}")]
    Decode { entity: &'static str, reason: String },
}

impl From<ValidationError> for RepositoryError {
    fn from(err: ValidationError) -> Self {
        RepositoryError::Page(PageError::Validation(err))
    }
}
