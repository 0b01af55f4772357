use crate::error::RepositoryError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// A search matched nothing on the requested page.
    #[error("Could not find any {0}")]
    NoEntriesFound(&'static str),

    #[error("Could not find {entity} with id {id}")]
    EntryNotFound { id: Uuid, entity: &'static str },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::NoEntriesFound(_) | ServiceError::EntryNotFound { .. }
        )
    }
}
