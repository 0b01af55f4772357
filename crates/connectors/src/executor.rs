use crate::error::DbError;
use async_trait::async_trait;
use model::records::row::RowData;
use planner::query::{compiler::Statement, dialect::Dialect};

/// Runs compiled statements against storage.
///
/// Implementations borrow a connection for the duration of a single call
/// and release it on every exit path, including when the returned future
/// is dropped before completion.
#[async_trait]
pub trait RelationalExecutor: Send + Sync {
    /// The dialect statements for this executor must be compiled with.
    fn dialect(&self) -> &dyn Dialect;

    /// Runs a data statement and decodes its rows using the statement's
    /// declared columns.
    async fn fetch_rows(&self, statement: &Statement) -> Result<Vec<RowData>, DbError>;

    /// Runs a count statement and returns its single integer.
    async fn fetch_count(&self, statement: &Statement) -> Result<u64, DbError>;

    /// Round-trips a trivial query to check connectivity.
    async fn ping(&self) -> Result<(), DbError>;
}
